use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// All monetary amounts are i64 in whole currency units. The wallet is a
// closed-loop ledger, so no sub-unit amounts appear anywhere in the flows.

/// A scheduled flight. Shared/global: seats and current price are the only
/// fields mutated after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    pub id: Uuid,
    pub flight_number: String,
    pub airline: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_code: String,
    pub arrival_code: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub duration_minutes: i64,
    pub base_price: i64,
    pub current_price: i64,
    pub seats_available: i32,
    pub aircraft: String,
}

/// How a caller refers to a flight: by primary key, or by flight number
/// (legacy/demo identifiers). Resolution tries the variants in this order.
#[derive(Debug, Clone)]
pub enum FlightRef {
    Id(Uuid),
    Number(String),
}

impl FlightRef {
    /// Build a reference from a raw path/request key. A key that parses as a
    /// UUID is treated as a primary key; anything else as a flight number.
    pub fn from_key(key: &str) -> Self {
        match Uuid::parse_str(key) {
            Ok(id) => FlightRef::Id(id),
            Err(_) => FlightRef::Number(key.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Credit,
    Debit,
}

/// Immutable ledger entry. Insertion order in the wallet is meaningful and
/// drives chronological display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl WalletTransaction {
    pub fn new(kind: TransactionKind, amount: i64, description: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description,
            created_at: Utc::now(),
        }
    }
}

/// Per-user closed-loop balance. Invariant: balance equals the opening credit
/// plus all credits minus all debits, and never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: Uuid,
    pub balance: i64,
    pub transactions: Vec<WalletTransaction>,
}

impl Wallet {
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            balance: 0,
            transactions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Reserved for forward compatibility; unreachable from the public flow.
    Pending,
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: u8,
    pub gender: String,
}

/// A confirmed (or cancelled) reservation. The only status transition is
/// Confirmed -> Cancelled, exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub passengers: Vec<Passenger>,
    pub total_amount: i64,
    pub status: BookingStatus,
    /// 6-character alphanumeric booking reference (PNR).
    pub reference: String,
    /// One seat label per passenger, unique within this booking.
    pub seats: Vec<String>,
}

impl Booking {
    pub fn new(
        user_id: Uuid,
        flight_id: Uuid,
        passengers: Vec<Passenger>,
        total_amount: i64,
        reference: String,
        seats: Vec<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            flight_id,
            created_at: Utc::now(),
            passengers,
            total_amount,
            status: BookingStatus::Confirmed,
            reference,
            seats,
        }
    }

    pub fn passenger_count(&self) -> i32 {
        self.passengers.len() as i32
    }
}

/// Search-frequency record for one (user, flight) pair. Drives the surge
/// decision only; never user-visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceHistory {
    pub user_id: Uuid,
    pub flight_id: Uuid,
    pub search_count: u32,
    pub last_searched_at: DateTime<Utc>,
    pub base_price: i64,
    pub last_price: i64,
}

/// Minimal account record. The token is opaque: the HTTP layer looks it up,
/// it is never parsed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub api_token: String,
    pub created_at: DateTime<Utc>,
}
