use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use skyfare_core::models::{Booking, Flight};
use skyfare_store::app_config::BusinessRules;

/// Booking-side policy values.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    /// Percentage of the booking total retained on cancellation. The refund
    /// is `total * (100 - fee) / 100`, floored by integer division.
    pub cancellation_fee_percent: i64,
    pub max_passengers: usize,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            cancellation_fee_percent: 10,
            max_passengers: 9,
        }
    }
}

impl From<&BusinessRules> for BookingPolicy {
    fn from(rules: &BusinessRules) -> Self {
        Self {
            cancellation_fee_percent: rules.cancellation_fee_percent,
            ..Self::default()
        }
    }
}

/// Aggregate figures for one user's booking history.
#[derive(Debug, Clone, Serialize)]
pub struct BookingStats {
    pub total_bookings: usize,
    /// Confirmed bookings whose flight departs in the future.
    pub upcoming_bookings: usize,
    pub cancelled_bookings: usize,
    /// Sum of `total_amount` across all bookings, regardless of status.
    pub total_spent: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingPage {
    pub bookings: Vec<Booking>,
    pub total: usize,
    pub page: u32,
    pub pages: u32,
}

/// Booking joined with its flight, for ticket display.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetails {
    pub booking_id: Uuid,
    pub reference: String,
    pub status: skyfare_core::models::BookingStatus,
    pub passengers: Vec<skyfare_core::models::Passenger>,
    pub seats: Vec<String>,
    pub total_amount: i64,
    pub booked_at: DateTime<Utc>,
    pub flight_number: String,
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_code: String,
    pub arrival_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub aircraft: String,
}

impl TicketDetails {
    pub fn from_parts(booking: Booking, flight: Flight) -> Self {
        Self {
            booking_id: booking.id,
            reference: booking.reference,
            status: booking.status,
            passengers: booking.passengers,
            seats: booking.seats,
            total_amount: booking.total_amount,
            booked_at: booking.created_at,
            flight_number: flight.flight_number,
            airline: flight.airline,
            departure_city: flight.departure_city,
            arrival_city: flight.arrival_city,
            departure_code: flight.departure_code,
            arrival_code: flight.arrival_code,
            departure_time: flight.departure_time,
            arrival_time: flight.arrival_time,
            aircraft: flight.aircraft,
        }
    }
}
