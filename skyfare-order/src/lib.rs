pub mod models;
pub mod orchestrator;
pub mod reference;
pub mod wallet;

pub use models::{BookingPage, BookingPolicy, BookingStats, TicketDetails};
pub use orchestrator::BookingService;
pub use wallet::{TransactionPage, WalletLedger};
