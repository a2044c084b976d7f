use axum::{
    extract::{Extension, Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};

use skyfare_catalog::SearchCriteria;
use skyfare_core::models::FlightRef;
use skyfare_core::CoreError;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    departure_city: String,
    arrival_city: String,
    departure_date: NaiveDate,
    #[serde(default = "default_passengers")]
    passengers: u32,
}

fn default_passengers() -> u32 {
    1
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/flights/search", get(search_flights))
        .route("/flights/{key}", get(get_flight))
}

/// Search flights and recompute the displayed price per result for this
/// user. The quoted price replaces `current_price` in the response.
async fn search_flights(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Value>, AppError> {
    let criteria = SearchCriteria {
        departure_city: query.departure_city,
        arrival_city: query.arrival_city,
        departure_date: query.departure_date,
        passengers: query.passengers,
    };

    let mut flights = state.inventory.search(&criteria).await?;
    for flight in &mut flights {
        let quoted = state.pricing.price_for(flight, user.id).await?;
        flight.current_price = quoted;
    }

    let count = flights.len();
    Ok(Json(json!({
        "flights": flights,
        "count": count,
    })))
}

/// Lookup by primary key or flight number, per [`FlightRef::from_key`].
async fn get_flight(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthUser>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let flight = state
        .inventory
        .resolve(&FlightRef::from_key(&key))
        .await
        .ok_or_else(|| CoreError::NotFound(format!("flight {key}")))?;
    Ok(Json(json!({ "flight": flight })))
}
