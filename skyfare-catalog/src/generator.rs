use std::collections::HashSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use skyfare_core::models::Flight;

const AIRLINES: &[(&str, &str)] = &[
    ("SkyFare Air", "SK"),
    ("Horizon Express", "IX"),
    ("IndusJet", "6J"),
    ("Vistara Blue", "VB"),
    ("Akash Connect", "QA"),
];

const AIRCRAFT: &[&str] = &[
    "Airbus A320neo",
    "Boeing 737-800",
    "Airbus A321",
    "ATR 72-600",
    "Boeing 787-8",
];

const AIRPORTS: &[(&str, &str, &str)] = &[
    ("Delhi", "Indira Gandhi International Airport", "DEL"),
    (
        "Mumbai",
        "Chhatrapati Shivaji Maharaj International Airport",
        "BOM",
    ),
    ("Bangalore", "Kempegowda International Airport", "BLR"),
    ("Chennai", "Chennai International Airport", "MAA"),
    ("Kolkata", "Netaji Subhas Chandra Bose International Airport", "CCU"),
    ("Hyderabad", "Rajiv Gandhi International Airport", "HYD"),
    ("Goa", "Manohar International Airport", "GOX"),
    ("Pune", "Pune Airport", "PNQ"),
];

// Flights are spread over a 16-hour operating day starting at 06:00.
const DAY_START_MINUTES: i64 = 6 * 60;
const DAY_SPAN_MINUTES: i64 = 16 * 60;

/// Synthesizes flights for routes the inventory has never seen.
pub struct RouteGenerator;

impl RouteGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produce 5-8 flights for the route on the given day, spread across the
    /// operating day, with randomized airline, aircraft, price band and seat
    /// count. Flight numbers are unique within the batch; the caller is
    /// responsible for store-wide uniqueness.
    pub fn generate(
        &self,
        departure_city: &str,
        arrival_city: &str,
        date: NaiveDate,
    ) -> Vec<Flight> {
        let mut rng = rand::thread_rng();
        let count = rng.gen_range(5..=8);
        let slot = DAY_SPAN_MINUTES / count;

        let (departure_airport, departure_code) = airport_for(departure_city);
        let (arrival_airport, arrival_code) = airport_for(arrival_city);
        let day_start = date.and_time(NaiveTime::MIN).and_utc();

        let mut taken = HashSet::new();
        let mut flights = Vec::with_capacity(count as usize);
        for i in 0..count {
            let (airline, code) = AIRLINES
                .choose(&mut rng)
                .copied()
                .unwrap_or(("SkyFare Air", "SK"));

            let mut number = flight_number(code, &mut rng);
            while !taken.insert(number.clone()) {
                number = flight_number(code, &mut rng);
            }

            let jitter = rng.gen_range(0..slot.max(1));
            let departure_time =
                day_start + Duration::minutes(DAY_START_MINUTES + i * slot + jitter);
            let duration_minutes = rng.gen_range(75..=240);
            // Fares land on a 50-unit grid between 1800 and 6000.
            let base_price = rng.gen_range(36..=120) * 50;

            flights.push(Flight {
                id: Uuid::new_v4(),
                flight_number: number,
                airline: airline.to_string(),
                departure_city: departure_city.to_string(),
                arrival_city: arrival_city.to_string(),
                departure_airport: departure_airport.clone(),
                arrival_airport: arrival_airport.clone(),
                departure_code: departure_code.clone(),
                arrival_code: arrival_code.clone(),
                departure_time,
                arrival_time: departure_time + Duration::minutes(duration_minutes),
                duration_minutes,
                base_price,
                current_price: base_price,
                seats_available: rng.gen_range(90..=186),
                aircraft: AIRCRAFT
                    .choose(&mut rng)
                    .copied()
                    .unwrap_or("Airbus A320neo")
                    .to_string(),
            });
        }
        flights
    }
}

impl Default for RouteGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A fresh flight number for the airline code, e.g. "SK-412".
pub fn flight_number<R: Rng>(airline_code: &str, rng: &mut R) -> String {
    format!("{}-{}", airline_code, rng.gen_range(100..=999))
}

/// Airport name and 3-letter code for a city, falling back to a derived code
/// for cities outside the known table.
fn airport_for(city: &str) -> (String, String) {
    if let Some((_, airport, code)) = AIRPORTS
        .iter()
        .find(|(name, _, _)| name.eq_ignore_ascii_case(city))
    {
        return ((*airport).to_string(), (*code).to_string());
    }

    let mut code: String = city
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .take(3)
        .collect::<String>()
        .to_uppercase();
    while code.len() < 3 {
        code.push('X');
    }
    (format!("{} International Airport", city), code)
}
