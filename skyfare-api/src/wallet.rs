use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct Pagination {
    #[serde(default = "default_page")]
    page: u32,
    #[serde(default = "default_limit")]
    limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallet", get(get_wallet))
        .route("/wallet/transactions", get(list_transactions))
}

async fn get_wallet(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let wallet = state.wallet.wallet(user.id).await?;
    Ok(Json(json!({
        "wallet": {
            "user_id": wallet.user_id,
            "balance": wallet.balance,
        }
    })))
}

async fn list_transactions(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .wallet
        .transactions(user.id, pagination.page, pagination.limit)
        .await?;
    Ok(Json(json!({
        "transactions": page.transactions,
        "total": page.total,
        "page": page.page,
        "pages": page.pages,
    })))
}
