use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use skyfare_core::models::{Flight, PriceHistory};
use skyfare_core::CoreResult;
use skyfare_store::app_config::BusinessRules;
use skyfare_store::{MemStore, PriceObservation};

/// Search-frequency pricing policy. These are policy values, not derived;
/// defaults carry the documented behavior (3 searches within 5 minutes
/// trigger a 10% surge, a gap over 10 minutes resets everything).
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub surge_search_threshold: u32,
    pub surge_window: Duration,
    pub reset_window: Duration,
    pub surge_percent: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            surge_search_threshold: 3,
            surge_window: Duration::minutes(5),
            reset_window: Duration::minutes(10),
            surge_percent: 10,
        }
    }
}

impl From<&BusinessRules> for PricingConfig {
    fn from(rules: &BusinessRules) -> Self {
        Self {
            surge_search_threshold: rules.surge_search_threshold,
            surge_window: Duration::seconds(rules.surge_window_seconds),
            reset_window: Duration::seconds(rules.reset_window_seconds),
            surge_percent: rules.surge_percent,
        }
    }
}

/// Outcome of one pricing evaluation: the observation to persist plus the
/// amount quoted to the caller.
#[derive(Debug, Clone)]
pub struct PriceDecision {
    pub observation: PriceObservation,
    pub quoted: i64,
}

/// Search-driven dynamic pricing.
///
/// The per-(user, flight) counter lives in an explicit keyed store entry,
/// never in ambient state. The elapsed-time checks anchor on the previous
/// search timestamp, so steady sub-window searching keeps the counter alive
/// until a gap longer than the reset window occurs.
pub struct PricingEngine {
    store: Arc<MemStore>,
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(store: Arc<MemStore>, config: PricingConfig) -> Self {
        Self { store, config }
    }

    /// Current per-seat price of a flight for a user, at wall-clock time.
    /// Every call persists the updated counter and timestamp.
    pub async fn price_for(&self, flight: &Flight, user_id: Uuid) -> CoreResult<i64> {
        self.price_for_at(flight, user_id, Utc::now()).await
    }

    /// Deterministic variant: the caller supplies the observation time.
    pub async fn price_for_at(
        &self,
        flight: &Flight,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> CoreResult<i64> {
        let history = self.store.price_history(user_id, flight.id).await;
        let decision = self.evaluate(history, flight, user_id, now);
        let quoted = decision.quoted;
        self.store.record_price_observation(decision.observation).await;
        Ok(quoted)
    }

    /// Pure decision logic. Exposed separately so the price sequence for a
    /// fixed series of timestamps can be verified without a store.
    pub fn evaluate(
        &self,
        history: Option<PriceHistory>,
        flight: &Flight,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> PriceDecision {
        let base = flight.base_price;

        let (search_count, flight_price, quoted) = match history {
            None => (1, None, base),
            Some(previous) => {
                let elapsed = now - previous.last_searched_at;
                if elapsed > self.config.reset_window {
                    // Cooled off: counter and displayed price both reset.
                    (1, Some(base), base)
                } else {
                    let count = previous.search_count + 1;
                    if count >= self.config.surge_search_threshold
                        && elapsed <= self.config.surge_window
                    {
                        let surged = base * (100 + self.config.surge_percent) / 100;
                        (count, Some(surged), surged)
                    } else {
                        (count, None, base)
                    }
                }
            }
        };

        PriceDecision {
            observation: PriceObservation {
                history: PriceHistory {
                    user_id,
                    flight_id: flight.id,
                    search_count,
                    last_searched_at: now,
                    base_price: base,
                    last_price: quoted,
                },
                flight_price,
            },
            quoted,
        }
    }
}
