use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use skyfare_core::models::{Flight, FlightRef};
use skyfare_core::{CoreError, CoreResult};
use skyfare_store::MemStore;

use crate::generator::{self, RouteGenerator};

pub const MAX_PASSENGERS: u32 = 9;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchCriteria {
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_date: NaiveDate,
    pub passengers: u32,
}

impl SearchCriteria {
    pub fn validate(&self) -> CoreResult<()> {
        if self.departure_city.trim().is_empty() || self.arrival_city.trim().is_empty() {
            return Err(CoreError::Validation(
                "departure and arrival cities are required".to_string(),
            ));
        }
        if self.passengers == 0 || self.passengers > MAX_PASSENGERS {
            return Err(CoreError::Validation(format!(
                "passenger count must be between 1 and {MAX_PASSENGERS}"
            )));
        }
        Ok(())
    }
}

/// Flight inventory: route search with on-demand synthesis, and flight
/// resolution by primary key or flight number. Seat arithmetic itself lives
/// in store mutations so it shares the booking unit of work.
pub struct FlightInventory {
    store: Arc<MemStore>,
    generator: RouteGenerator,
}

impl FlightInventory {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self {
            store,
            generator: RouteGenerator::new(),
        }
    }

    /// Flights for the route with enough seats for the party. A route/date
    /// with no flights at all gets a synthesized schedule first.
    pub async fn search(&self, criteria: &SearchCriteria) -> CoreResult<Vec<Flight>> {
        criteria.validate()?;

        let mut flights = self
            .store
            .flights_for_route(
                &criteria.departure_city,
                &criteria.arrival_city,
                criteria.departure_date,
            )
            .await;

        if flights.is_empty() {
            flights = self.synthesize_route(criteria).await?;
        }

        Ok(flights
            .into_iter()
            .filter(|f| f.seats_available >= criteria.passengers as i32)
            .collect())
    }

    async fn synthesize_route(&self, criteria: &SearchCriteria) -> CoreResult<Vec<Flight>> {
        let mut generated = self.generator.generate(
            &criteria.departure_city,
            &criteria.arrival_city,
            criteria.departure_date,
        );

        // Batch numbers are unique; re-roll any that clash store-wide.
        for flight in &mut generated {
            let code = flight
                .flight_number
                .split('-')
                .next()
                .unwrap_or("SK")
                .to_string();
            while self
                .store
                .flight_by_number(&flight.flight_number)
                .await
                .is_some()
            {
                flight.flight_number =
                    generator::flight_number(&code, &mut rand::thread_rng());
            }
        }

        self.store
            .insert_flights(generated.clone())
            .await
            .map_err(|_| {
                CoreError::ConflictRetry(
                    "flight synthesis collided with a concurrent search".to_string(),
                )
            })?;

        info!(
            departure = %criteria.departure_city,
            arrival = %criteria.arrival_city,
            date = %criteria.departure_date,
            count = generated.len(),
            "synthesized flights for unseen route"
        );
        Ok(generated)
    }

    /// Resolve a reference against the store. The [`FlightRef`] variant fixes
    /// which index is consulted; build one from a raw request key with
    /// [`FlightRef::from_key`].
    pub async fn resolve(&self, flight_ref: &FlightRef) -> Option<Flight> {
        match flight_ref {
            FlightRef::Id(id) => self.store.flight(*id).await,
            FlightRef::Number(number) => self.store.flight_by_number(number).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn criteria(passengers: u32) -> SearchCriteria {
        SearchCriteria {
            departure_city: "Delhi".to_string(),
            arrival_city: "Mumbai".to_string(),
            departure_date: (Utc::now() + Duration::days(7)).date_naive(),
            passengers,
        }
    }

    #[tokio::test]
    async fn test_search_synthesizes_unseen_route_once() {
        let store = Arc::new(MemStore::new());
        let inventory = FlightInventory::new(store.clone());

        let first = inventory.search(&criteria(1)).await.unwrap();
        assert!((5..=8).contains(&first.len()));

        // A second search returns the persisted schedule, not a new one.
        let second = inventory.search(&criteria(1)).await.unwrap();
        assert_eq!(first.len(), second.len());
        let mut first_ids: Vec<Uuid> = first.iter().map(|f| f.id).collect();
        let mut second_ids: Vec<Uuid> = second.iter().map(|f| f.id).collect();
        first_ids.sort();
        second_ids.sort();
        assert_eq!(first_ids, second_ids);
    }

    #[tokio::test]
    async fn test_search_filters_by_party_size() {
        let store = Arc::new(MemStore::new());
        let inventory = FlightInventory::new(store.clone());

        let flights = inventory.search(&criteria(1)).await.unwrap();
        let flight = &flights[0];

        // Drain the first flight to a single seat.
        store
            .apply(vec![skyfare_store::Mutation::AdjustSeats {
                flight_id: flight.id,
                delta: -(flight.seats_available - 1),
            }])
            .await
            .unwrap();

        let for_two = inventory.search(&criteria(2)).await.unwrap();
        assert!(for_two.iter().all(|f| f.id != flight.id));
        assert!(!for_two.is_empty());
    }

    #[tokio::test]
    async fn test_search_rejects_bad_criteria() {
        let store = Arc::new(MemStore::new());
        let inventory = FlightInventory::new(store);

        let mut bad = criteria(0);
        assert!(matches!(
            inventory.search(&bad).await.unwrap_err(),
            skyfare_core::CoreError::Validation(_)
        ));

        bad = criteria(1);
        bad.departure_city = "  ".to_string();
        assert!(matches!(
            inventory.search(&bad).await.unwrap_err(),
            skyfare_core::CoreError::Validation(_)
        ));
    }

    #[tokio::test]
    async fn test_resolve_handles_raw_request_keys() {
        let store = Arc::new(MemStore::new());
        let inventory = FlightInventory::new(store.clone());
        let flights = inventory.search(&criteria(1)).await.unwrap();
        let flight = &flights[0];

        let by_id = inventory
            .resolve(&FlightRef::from_key(&flight.id.to_string()))
            .await
            .unwrap();
        assert_eq!(by_id.id, flight.id);

        let by_number = inventory
            .resolve(&FlightRef::from_key(&flight.flight_number))
            .await
            .unwrap();
        assert_eq!(by_number.id, flight.id);

        assert!(inventory
            .resolve(&FlightRef::from_key("ZZ-000"))
            .await
            .is_none());
        assert!(inventory
            .resolve(&FlightRef::from_key(&Uuid::new_v4().to_string()))
            .await
            .is_none());
    }
}
