use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use skyfare_core::models::{Flight, User};
use skyfare_core::CoreResult;

use crate::memory::MemStore;

pub struct SeedSummary {
    pub users: Vec<User>,
    pub flight_count: usize,
}

fn seed_flight(
    number: &str,
    airline: &str,
    route: (&str, &str, &str, &str, &str, &str),
    hours_from_now: i64,
    duration_minutes: i64,
    base_price: i64,
    seats: i32,
    aircraft: &str,
) -> Flight {
    let (dep_city, dep_airport, dep_code, arr_city, arr_airport, arr_code) = route;
    let departure_time = Utc::now() + Duration::hours(hours_from_now);
    Flight {
        id: Uuid::new_v4(),
        flight_number: number.to_string(),
        airline: airline.to_string(),
        departure_city: dep_city.to_string(),
        arrival_city: arr_city.to_string(),
        departure_airport: dep_airport.to_string(),
        arrival_airport: arr_airport.to_string(),
        departure_code: dep_code.to_string(),
        arrival_code: arr_code.to_string(),
        departure_time,
        arrival_time: departure_time + Duration::minutes(duration_minutes),
        duration_minutes,
        base_price,
        current_price: base_price,
        seats_available: seats,
        aircraft: aircraft.to_string(),
    }
}

/// Load the demo dataset: two funded accounts and a handful of flights on
/// popular routes, departing over the next two days.
pub async fn seed_demo_data(store: &MemStore, opening_balance: i64) -> CoreResult<SeedSummary> {
    let delhi = (
        "Delhi",
        "Indira Gandhi International Airport",
        "DEL",
    );
    let mumbai = (
        "Mumbai",
        "Chhatrapati Shivaji Maharaj International Airport",
        "BOM",
    );
    let bangalore = ("Bangalore", "Kempegowda International Airport", "BLR");
    let goa = ("Goa", "Manohar International Airport", "GOX");

    let route = |from: (&'static str, &'static str, &'static str),
                 to: (&'static str, &'static str, &'static str)| {
        (from.0, from.1, from.2, to.0, to.1, to.2)
    };

    let flights = vec![
        seed_flight(
            "SK-101",
            "SkyFare Air",
            route(delhi, mumbai),
            26,
            130,
            2500,
            156,
            "Airbus A320neo",
        ),
        seed_flight(
            "SK-102",
            "SkyFare Air",
            route(mumbai, delhi),
            32,
            135,
            2600,
            156,
            "Airbus A320neo",
        ),
        seed_flight(
            "IX-214",
            "Horizon Express",
            route(delhi, bangalore),
            28,
            165,
            3400,
            180,
            "Boeing 737-800",
        ),
        seed_flight(
            "IX-215",
            "Horizon Express",
            route(bangalore, goa),
            49,
            80,
            2000,
            72,
            "ATR 72-600",
        ),
    ];

    let flight_count = flights.len();
    store.insert_flights(flights).await?;

    let mut users = Vec::new();
    for (name, email) in [
        ("Asha Rao", "asha@example.com"),
        ("Ravi Iyer", "ravi@example.com"),
    ] {
        let user = store.register_user(name, email, opening_balance).await?;
        info!(
            user = %user.email,
            token = %user.api_token,
            "seeded demo account"
        );
        users.push(user);
    }

    info!(flight_count, "seeded demo flights");
    Ok(SeedSummary {
        users,
        flight_count,
    })
}
