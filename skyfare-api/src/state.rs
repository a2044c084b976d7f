use std::sync::Arc;

use skyfare_catalog::{FlightInventory, PricingConfig, PricingEngine};
use skyfare_order::{BookingPolicy, BookingService, WalletLedger};
use skyfare_store::app_config::BusinessRules;
use skyfare_store::MemStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemStore>,
    pub inventory: Arc<FlightInventory>,
    pub pricing: Arc<PricingEngine>,
    pub wallet: Arc<WalletLedger>,
    pub bookings: Arc<BookingService>,
    pub rules: BusinessRules,
}

impl AppState {
    /// Wire the store and all services from one set of business rules.
    pub fn build(rules: BusinessRules) -> Self {
        let store = Arc::new(MemStore::new());
        let inventory = Arc::new(FlightInventory::new(store.clone()));
        let pricing = Arc::new(PricingEngine::new(
            store.clone(),
            PricingConfig::from(&rules),
        ));
        let wallet = Arc::new(WalletLedger::new(store.clone()));
        let bookings = Arc::new(BookingService::new(
            store.clone(),
            inventory.clone(),
            pricing.clone(),
            BookingPolicy::from(&rules),
        ));

        Self {
            store,
            inventory,
            pricing,
            wallet,
            bookings,
            rules,
        }
    }
}
