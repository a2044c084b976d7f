use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use skyfare_core::auth::TokenResolver;
use skyfare_core::models::{
    Booking, BookingStatus, Flight, PriceHistory, TransactionKind, User, Wallet,
    WalletTransaction,
};
use skyfare_core::{CoreError, CoreResult};

/// A single mutation intent. Multi-step operations submit all their intents
/// as one batch to [`MemStore::apply`], which is the unit-of-work boundary.
#[derive(Debug, Clone)]
pub enum Mutation {
    InsertBooking(Booking),
    SetBookingStatus {
        booking_id: Uuid,
        status: BookingStatus,
    },
    DebitWallet {
        user_id: Uuid,
        amount: i64,
        description: String,
    },
    CreditWallet {
        user_id: Uuid,
        amount: i64,
        description: String,
    },
    /// Positive delta releases seats, negative delta takes them. Fails if the
    /// flight would be driven below zero seats.
    AdjustSeats {
        flight_id: Uuid,
        delta: i32,
    },
}

/// Outcome of one pricing-engine evaluation, persisted in a single locked
/// write. `flight_price` carries a surge or reset write-back when present.
#[derive(Debug, Clone)]
pub struct PriceObservation {
    pub history: PriceHistory,
    pub flight_price: Option<i64>,
}

#[derive(Default)]
struct StoreState {
    users: HashMap<Uuid, User>,
    tokens: HashMap<String, Uuid>,
    flights: HashMap<Uuid, Flight>,
    flight_numbers: HashMap<String, Uuid>,
    wallets: HashMap<Uuid, Wallet>,
    bookings: HashMap<Uuid, Booking>,
    price_history: HashMap<(Uuid, Uuid), PriceHistory>,
}

/// In-process store for all persisted entities.
///
/// Every entity lives behind one `RwLock`: reads take the read lock, and all
/// mutations go through [`MemStore::apply`], which validates the whole batch
/// under the write lock before touching anything. Concurrent operations
/// against the same flight or wallet therefore serialize, and a failing
/// intent leaves the state exactly as it was.
pub struct MemStore {
    state: RwLock<StoreState>,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Apply a batch of mutation intents atomically: either every intent
    /// applies, or the first invalid one is reported and none do.
    pub async fn apply(&self, mutations: Vec<Mutation>) -> CoreResult<()> {
        let mut state = self.state.write().await;

        // Validation pass: check each intent against the current state plus
        // the accumulated effect of the intents before it in the batch.
        let mut wallet_deltas: HashMap<Uuid, i64> = HashMap::new();
        let mut seat_deltas: HashMap<Uuid, i32> = HashMap::new();
        let mut new_bookings: HashSet<Uuid> = HashSet::new();

        for mutation in &mutations {
            match mutation {
                Mutation::InsertBooking(booking) => {
                    if state.bookings.contains_key(&booking.id)
                        || !new_bookings.insert(booking.id)
                    {
                        return Err(CoreError::Internal(format!(
                            "duplicate booking id {}",
                            booking.id
                        )));
                    }
                }
                Mutation::SetBookingStatus { booking_id, status } => {
                    let booking = state.bookings.get(booking_id).ok_or_else(|| {
                        CoreError::NotFound(format!("booking {booking_id}"))
                    })?;
                    if booking.status == BookingStatus::Cancelled
                        && *status == BookingStatus::Cancelled
                    {
                        return Err(CoreError::AlreadyCancelled(*booking_id));
                    }
                }
                Mutation::DebitWallet {
                    user_id, amount, ..
                } => {
                    if *amount <= 0 {
                        return Err(CoreError::Validation(format!(
                            "debit amount must be positive, got {amount}"
                        )));
                    }
                    let wallet = state.wallets.get(user_id).ok_or_else(|| {
                        CoreError::NotFound(format!("wallet for user {user_id}"))
                    })?;
                    let delta = wallet_deltas.entry(*user_id).or_insert(0);
                    let available = wallet.balance + *delta;
                    if available < *amount {
                        return Err(CoreError::InsufficientWalletBalance {
                            required: *amount,
                            available,
                        });
                    }
                    *delta -= amount;
                }
                Mutation::CreditWallet {
                    user_id, amount, ..
                } => {
                    if *amount <= 0 {
                        return Err(CoreError::Validation(format!(
                            "credit amount must be positive, got {amount}"
                        )));
                    }
                    if !state.wallets.contains_key(user_id) {
                        return Err(CoreError::NotFound(format!("wallet for user {user_id}")));
                    }
                    *wallet_deltas.entry(*user_id).or_insert(0) += amount;
                }
                Mutation::AdjustSeats { flight_id, delta } => {
                    let flight = state.flights.get(flight_id).ok_or_else(|| {
                        CoreError::NotFound(format!("flight {flight_id}"))
                    })?;
                    let accumulated = seat_deltas.entry(*flight_id).or_insert(0);
                    let available = flight.seats_available + *accumulated;
                    if available + delta < 0 {
                        return Err(CoreError::InsufficientSeats {
                            requested: -delta,
                            available,
                        });
                    }
                    *accumulated += delta;
                }
            }
        }

        // Apply pass: every intent was validated above, under this same lock.
        for mutation in mutations {
            match mutation {
                Mutation::InsertBooking(booking) => {
                    state.bookings.insert(booking.id, booking);
                }
                Mutation::SetBookingStatus { booking_id, status } => {
                    if let Some(booking) = state.bookings.get_mut(&booking_id) {
                        booking.status = status;
                    }
                }
                Mutation::DebitWallet {
                    user_id,
                    amount,
                    description,
                } => {
                    if let Some(wallet) = state.wallets.get_mut(&user_id) {
                        wallet.balance -= amount;
                        wallet.transactions.push(WalletTransaction::new(
                            TransactionKind::Debit,
                            amount,
                            description,
                        ));
                    }
                }
                Mutation::CreditWallet {
                    user_id,
                    amount,
                    description,
                } => {
                    if let Some(wallet) = state.wallets.get_mut(&user_id) {
                        wallet.balance += amount;
                        wallet.transactions.push(WalletTransaction::new(
                            TransactionKind::Credit,
                            amount,
                            description,
                        ));
                    }
                }
                Mutation::AdjustSeats { flight_id, delta } => {
                    if let Some(flight) = state.flights.get_mut(&flight_id) {
                        flight.seats_available += delta;
                    }
                }
            }
        }

        Ok(())
    }

    // ------------------------------------------------------------------
    // Flights
    // ------------------------------------------------------------------

    pub async fn flight(&self, id: Uuid) -> Option<Flight> {
        self.state.read().await.flights.get(&id).cloned()
    }

    pub async fn flight_by_number(&self, number: &str) -> Option<Flight> {
        let state = self.state.read().await;
        state
            .flight_numbers
            .get(number)
            .and_then(|id| state.flights.get(id))
            .cloned()
    }

    /// Flights matching a route and departure date, case-insensitive on the
    /// city names.
    pub async fn flights_for_route(
        &self,
        departure_city: &str,
        arrival_city: &str,
        date: NaiveDate,
    ) -> Vec<Flight> {
        let dep = departure_city.to_lowercase();
        let arr = arrival_city.to_lowercase();
        let state = self.state.read().await;
        let mut flights: Vec<Flight> = state
            .flights
            .values()
            .filter(|f| {
                f.departure_city.to_lowercase() == dep
                    && f.arrival_city.to_lowercase() == arr
                    && f.departure_time.date_naive() == date
            })
            .cloned()
            .collect();
        flights.sort_by_key(|f| f.departure_time);
        flights
    }

    pub async fn insert_flights(&self, flights: Vec<Flight>) -> CoreResult<()> {
        let mut state = self.state.write().await;
        for flight in &flights {
            if state.flight_numbers.contains_key(&flight.flight_number) {
                return Err(CoreError::Validation(format!(
                    "duplicate flight number {}",
                    flight.flight_number
                )));
            }
        }
        for flight in flights {
            state
                .flight_numbers
                .insert(flight.flight_number.clone(), flight.id);
            state.flights.insert(flight.id, flight);
        }
        Ok(())
    }

    /// Administrative bulk reset: drops every flight and all pricing history.
    /// The only path that deletes flight records.
    pub async fn reset_flights(&self) {
        let mut state = self.state.write().await;
        let dropped = state.flights.len();
        state.flights.clear();
        state.flight_numbers.clear();
        state.price_history.clear();
        debug!(dropped, "flight inventory reset");
    }

    // ------------------------------------------------------------------
    // Wallets & users
    // ------------------------------------------------------------------

    pub async fn wallet(&self, user_id: Uuid) -> Option<Wallet> {
        self.state.read().await.wallets.get(&user_id).cloned()
    }

    /// Create an account plus its wallet, funded with the opening balance and
    /// one opening credit transaction, in one locked section.
    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        opening_balance: i64,
    ) -> CoreResult<User> {
        if name.trim().is_empty() || email.trim().is_empty() {
            return Err(CoreError::Validation(
                "name and email are required".to_string(),
            ));
        }
        let mut state = self.state.write().await;
        if state
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(email))
        {
            return Err(CoreError::Validation(format!(
                "email {email} is already registered"
            )));
        }

        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            api_token: Uuid::new_v4().simple().to_string(),
            created_at: chrono::Utc::now(),
        };

        let mut wallet = Wallet::new(user.id);
        if opening_balance > 0 {
            wallet.balance = opening_balance;
            wallet.transactions.push(WalletTransaction::new(
                TransactionKind::Credit,
                opening_balance,
                "Opening balance credit".to_string(),
            ));
        }

        state.tokens.insert(user.api_token.clone(), user.id);
        state.wallets.insert(user.id, wallet);
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    // ------------------------------------------------------------------
    // Bookings
    // ------------------------------------------------------------------

    pub async fn booking(&self, id: Uuid) -> Option<Booking> {
        self.state.read().await.bookings.get(&id).cloned()
    }

    /// All bookings owned by a user, newest first.
    pub async fn bookings_for_user(&self, user_id: Uuid) -> Vec<Booking> {
        let state = self.state.read().await;
        let mut bookings: Vec<Booking> = state
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        bookings
    }

    // ------------------------------------------------------------------
    // Pricing history
    // ------------------------------------------------------------------

    pub async fn price_history(&self, user_id: Uuid, flight_id: Uuid) -> Option<PriceHistory> {
        self.state
            .read()
            .await
            .price_history
            .get(&(user_id, flight_id))
            .cloned()
    }

    /// Persist the outcome of one pricing evaluation: the updated history
    /// entry, and the flight's displayed price when the decision changed it.
    /// Best-effort with respect to concurrent evaluations of the same pair;
    /// the write itself is a single locked section.
    pub async fn record_price_observation(&self, observation: PriceObservation) {
        let mut state = self.state.write().await;
        if let Some(price) = observation.flight_price {
            if let Some(flight) = state.flights.get_mut(&observation.history.flight_id) {
                flight.current_price = price;
            }
        }
        let key = (
            observation.history.user_id,
            observation.history.flight_id,
        );
        state.price_history.insert(key, observation.history);
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenResolver for MemStore {
    async fn resolve_token(&self, token: &str) -> Option<User> {
        let state = self.state.read().await;
        state
            .tokens
            .get(token)
            .and_then(|id| state.users.get(id))
            .cloned()
    }
}
