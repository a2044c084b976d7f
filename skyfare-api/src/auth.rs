use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::post,
    Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
}

#[derive(Debug, Serialize)]
struct RegisterResponse {
    user_id: Uuid,
    name: String,
    email: String,
    /// Opaque bearer token for subsequent requests.
    token: String,
    wallet_balance: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/auth/register", post(register))
}

/// Create an account; the wallet is provisioned with the opening balance in
/// the same step.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let user = state
        .store
        .register_user(&req.name, &req.email, state.rules.opening_balance)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user_id: user.id,
            name: user.name,
            email: user.email,
            token: user.api_token,
            wallet_balance: state.rules.opening_balance,
        }),
    ))
}
