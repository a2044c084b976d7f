pub mod generator;
pub mod inventory;
pub mod pricing;

pub use generator::RouteGenerator;
pub use inventory::{FlightInventory, SearchCriteria};
pub use pricing::{PricingConfig, PricingEngine};
