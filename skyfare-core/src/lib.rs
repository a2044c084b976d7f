pub mod auth;
pub mod models;

use uuid::Uuid;

/// Error taxonomy shared across the whole engine.
///
/// Every multi-step mutation re-signals errors from collaborators unchanged,
/// so all crates speak this one enum. `ConflictRetry` is the only kind a
/// caller may retry automatically.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Insufficient seats: requested {requested}, available {available}")]
    InsufficientSeats { requested: i32, available: i32 },
    #[error("Insufficient wallet balance: required {required}, available {available}")]
    InsufficientWalletBalance { required: i64, available: i64 },
    #[error("Booking already cancelled: {0}")]
    AlreadyCancelled(Uuid),
    #[error("Transient conflict, retry the operation: {0}")]
    ConflictRetry(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
