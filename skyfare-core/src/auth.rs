use async_trait::async_trait;

use crate::models::User;

/// Resolves an opaque bearer token to the account it was issued to.
///
/// Token issuance and verification protocols are outside this engine; the
/// HTTP layer only needs a lookup.
#[async_trait]
pub trait TokenResolver: Send + Sync {
    async fn resolve_token(&self, token: &str) -> Option<User>;
}
