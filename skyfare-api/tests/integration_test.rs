use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use skyfare_api::{app, AppState};
use skyfare_store::app_config::BusinessRules;

fn test_app() -> Router {
    app(AppState::build(BusinessRules::default()))
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

fn get(path: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(path: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/auth/register",
            None,
            &json!({ "name": name, "email": email }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["token"].as_str().unwrap().to_string()
}

fn search_path(passengers: u32) -> String {
    let date = (Utc::now() + Duration::days(10)).date_naive();
    format!(
        "/flights/search?departureCity=Delhi&arrivalCity=Mumbai&departureDate={date}&passengers={passengers}"
    )
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = test_app();
    let (status, _) = send(&app, get("/wallet", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/wallet", Some("not-a-real-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_search_returns_flights_for_unseen_route() {
    let app = test_app();
    let token = register(&app, "Asha Rao", "asha@example.com").await;

    let (status, body) = send(&app, get(&search_path(2), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    let flights = body["flights"].as_array().unwrap();
    assert!((5..=8).contains(&flights.len()));
    assert!(flights.iter().all(|f| f["departure_code"] == "DEL"));
}

#[tokio::test]
async fn test_get_flight_by_id_and_number() {
    let app = test_app();
    let token = register(&app, "Asha Rao", "asha@example.com").await;
    let (_, body) = send(&app, get(&search_path(1), Some(&token))).await;
    let flight = &body["flights"][0];

    let id = flight["id"].as_str().unwrap();
    let (status, found) = send(&app, get(&format!("/flights/{id}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["flight"]["id"].as_str().unwrap(), id);

    let number = flight["flight_number"].as_str().unwrap();
    let (status, found) = send(&app, get(&format!("/flights/{number}"), Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["flight"]["id"].as_str().unwrap(), id);

    let (status, _) = send(
        &app,
        get(&format!("/flights/{}", uuid::Uuid::new_v4()), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_booking_lifecycle_over_http() {
    let app = test_app();
    let token = register(&app, "Asha Rao", "asha@example.com").await;

    let (_, body) = send(&app, get(&search_path(2), Some(&token))).await;
    let flight = &body["flights"][0];
    let flight_id = flight["id"].as_str().unwrap().to_string();
    let base_price = flight["base_price"].as_i64().unwrap();

    // Book two passengers at the quoted (base) price.
    let (status, body) = send(
        &app,
        post_json(
            "/bookings",
            Some(&token),
            &json!({
                "flightId": flight_id,
                "passengers": [
                    { "name": "Asha Rao", "age": 34, "gender": "female" },
                    { "name": "Ravi Iyer", "age": 41, "gender": "male" },
                ],
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let booking = &body["booking"];
    let total = 2 * base_price;
    assert_eq!(booking["total_amount"].as_i64().unwrap(), total);
    assert_eq!(booking["status"], "CONFIRMED");
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // Wallet reflects the debit.
    let (_, body) = send(&app, get("/wallet", Some(&token))).await;
    assert_eq!(
        body["wallet"]["balance"].as_i64().unwrap(),
        50_000 - total
    );

    // Ticket joins the flight.
    let (status, body) = send(
        &app,
        get(&format!("/bookings/{booking_id}/ticket"), Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["ticket"]["flight_number"],
        flight["flight_number"]
    );

    // Cancel: 90% refund, status flips, second cancel rejected.
    let (status, body) = send(
        &app,
        post_json(
            &format!("/bookings/{booking_id}/cancel"),
            Some(&token),
            &json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["booking"]["status"], "CANCELLED");

    let refund = total * 90 / 100;
    let (_, body) = send(&app, get("/wallet", Some(&token))).await;
    assert_eq!(
        body["wallet"]["balance"].as_i64().unwrap(),
        50_000 - total + refund
    );

    let (status, _) = send(
        &app,
        post_json(
            &format!("/bookings/{booking_id}/cancel"),
            Some(&token),
            &json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Ledger holds opening credit, debit and refund, newest first.
    let (_, body) = send(&app, get("/wallet/transactions", Some(&token))).await;
    assert_eq!(body["total"].as_u64().unwrap(), 3);
    assert_eq!(body["transactions"][0]["kind"], "CREDIT");

    // Stats see one booking, now cancelled.
    let (_, body) = send(&app, get("/bookings/stats", Some(&token))).await;
    assert_eq!(body["stats"]["total_bookings"].as_u64().unwrap(), 1);
    assert_eq!(body["stats"]["cancelled_bookings"].as_u64().unwrap(), 1);
    assert_eq!(body["stats"]["upcoming_bookings"].as_u64().unwrap(), 0);
}

#[tokio::test]
async fn test_booking_access_is_owner_scoped() {
    let app = test_app();
    let owner = register(&app, "Asha Rao", "asha@example.com").await;
    let stranger = register(&app, "Ravi Iyer", "ravi@example.com").await;

    let (_, body) = send(&app, get(&search_path(1), Some(&owner))).await;
    let flight_id = body["flights"][0]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &app,
        post_json(
            "/bookings",
            Some(&owner),
            &json!({
                "flightId": flight_id,
                "passengers": [{ "name": "Asha Rao", "age": 34, "gender": "female" }],
            }),
        ),
    )
    .await;
    let booking_id = body["booking"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        get(&format!("/bookings/{booking_id}"), Some(&stranger)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        post_json(
            &format!("/bookings/{booking_id}/cancel"),
            Some(&stranger),
            &json!({}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        get(&format!("/bookings/{}", uuid::Uuid::new_v4()), Some(&owner)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_booking_validates_passengers() {
    let app = test_app();
    let token = register(&app, "Asha Rao", "asha@example.com").await;
    let (_, body) = send(&app, get(&search_path(1), Some(&token))).await;
    let flight_id = body["flights"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            "/bookings",
            Some(&token),
            &json!({ "flightId": flight_id, "passengers": [] }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("passenger"));
}

#[tokio::test]
async fn test_pagination_extremes_return_empty_pages() {
    let app = test_app();
    let token = register(&app, "Asha Rao", "asha@example.com").await;

    let (status, body) = send(
        &app,
        get("/wallet/transactions?page=4294967295&limit=100", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["transactions"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &app,
        get("/bookings?page=4294967295&limit=4294967295", Some(&token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["bookings"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_registration_rejects_duplicate_email() {
    let app = test_app();
    register(&app, "Asha Rao", "asha@example.com").await;

    let (status, _) = send(
        &app,
        post_json(
            "/auth/register",
            None,
            &json!({ "name": "Other", "email": "asha@example.com" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
