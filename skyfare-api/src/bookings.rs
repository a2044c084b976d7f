use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use skyfare_core::models::{FlightRef, Passenger};

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBookingRequest {
    /// Flight primary key, or a flight number as fallback.
    flight_id: String,
    passengers: Vec<Passenger>,
}

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
        .route("/bookings", post(create_booking).get(list_bookings))
        .route("/bookings/stats", get(booking_stats))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/ticket", get(get_ticket))
        .route("/bookings/{id}/cancel", post(cancel_booking))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let flight_ref = FlightRef::from_key(&req.flight_id);
    let booking = state
        .bookings
        .create_booking(user.id, &flight_ref, req.passengers)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "booking": booking }))))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<Value>, AppError> {
    let page = state
        .bookings
        .user_bookings(user.id, pagination.page, pagination.limit)
        .await?;
    Ok(Json(json!({
        "bookings": page.bookings,
        "total": page.total,
        "page": page.page,
        "pages": page.pages,
    })))
}

async fn booking_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let stats = state.bookings.stats(user.id).await?;
    Ok(Json(json!({ "stats": stats })))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state.bookings.booking(id, user.id).await?;
    Ok(Json(json!({ "booking": booking })))
}

async fn get_ticket(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.bookings.ticket(id, user.id).await?;
    Ok(Json(json!({ "ticket": ticket })))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let booking = state.bookings.cancel_booking(id, user.id).await?;
    Ok(Json(json!({ "booking": booking })))
}
