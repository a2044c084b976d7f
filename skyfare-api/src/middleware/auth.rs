use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use skyfare_core::auth::TokenResolver;

use crate::state::AppState;

/// The authenticated caller, injected into request extensions once the
/// bearer token resolves.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Opaque bearer-token check: the token is looked up, never parsed.
pub async fn bearer_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user = state
        .store
        .resolve_token(token)
        .await
        .ok_or(StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(AuthUser {
        id: user.id,
        name: user.name,
        email: user.email,
    });

    Ok(next.run(req).await)
}
