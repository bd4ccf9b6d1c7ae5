//! End-to-end tests for the ticket sales HTTP API.
//!
//! Each test drives the full router against a temp-directory store with the
//! simulation checkout stub, so no network access is needed.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use tombola_server::api::{create_router, AppState};
use tombola_server::checkout::SimulatedCheckout;
use tombola_server::store::TicketStore;

fn test_app(dir: &tempfile::TempDir, admin_password: Option<&str>) -> Router {
    let state = AppState {
        store: Arc::new(TicketStore::new(dir.path().join("payments_database.json"))),
        checkout: Arc::new(SimulatedCheckout::new()),
        default_origin: "http://localhost:8000".to_string(),
        default_ticket_price: dec!(5),
        admin_password: admin_password.map(str::to_string),
    };
    create_router(state, dir.path().to_str().unwrap())
}

async fn request_json(
    app: Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn save_payment_body(first_name: &str, tickets: u32, amount: Value, vendeur: Option<&str>) -> Value {
    let mut body = json!({
        "firstName": first_name,
        "lastName": "Tester",
        "email": "buyer@example.com",
        "phone": "0600000000",
        "tickets": tickets,
        "amount": amount,
    });
    if let Some(v) = vendeur {
        body["vendeur"] = json!(v);
    }
    body
}

#[tokio::test]
async fn purchase_flow_numbers_tickets_and_aggregates_stats() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, None);

    // Buyer A: 3 tickets for 15, no seller.
    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/save-payment",
        Some(save_payment_body("Alice", 3, json!(15), None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["ticketNumbers"], json!([1, 2, 3]));

    // Buyer B: 2 tickets for 10, sold by Sam.
    let (status, body) = request_json(
        app.clone(),
        "POST",
        "/save-payment",
        Some(save_payment_body("Bob", 2, json!(10), Some("Sam"))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ticketNumbers"], json!([4, 5]));

    // Listing returns the stored sequence, unmodified.
    let (status, payments) = request_json(app.clone(), "GET", "/admin/payments", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = payments.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row["id"], json!(i as u64 + 1));
    }
    assert_eq!(rows[0]["firstName"], "Alice");
    assert_eq!(rows[0]["vendeur"], "None");
    assert_eq!(rows[4]["vendeur"], "Sam");

    // Stats: 5 tickets, revenue 25, sellers sorted by descending revenue.
    let (status, stats) = request_json(app, "GET", "/admin/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalTickets"], json!(5));
    assert_eq!(stats["totalRevenue"].as_f64(), Some(25.0));

    let vendeurs = stats["vendeurs"].as_array().unwrap();
    assert_eq!(vendeurs.len(), 2);
    assert_eq!(vendeurs[0]["nom"], "None");
    assert_eq!(vendeurs[0]["tickets"], json!(3));
    assert_eq!(vendeurs[0]["montant"].as_f64(), Some(15.0));
    assert_eq!(vendeurs[1]["nom"], "Sam");
    assert_eq!(vendeurs[1]["montant"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn payment_without_amount_defaults_to_five_per_ticket() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, None);

    let body = json!({
        "firstName": "Carol",
        "lastName": "Tester",
        "email": "carol@example.com",
        "phone": "0600000000",
        "tickets": 2,
    });
    let (status, response) = request_json(app.clone(), "POST", "/save-payment", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ticketNumbers"], json!([1, 2]));

    let (_, stats) = request_json(app, "GET", "/admin/stats", None).await;
    assert_eq!(stats["totalRevenue"].as_f64(), Some(10.0));
}

#[tokio::test]
async fn uneven_total_is_rounded_to_cents_per_ticket() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, None);

    // 10 split across 3 tickets does not divide evenly.
    let (status, response) = request_json(
        app.clone(),
        "POST",
        "/save-payment",
        Some(save_payment_body("Frank", 3, json!(10), None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ticketNumbers"], json!([1, 2, 3]));

    let (_, payments) = request_json(app.clone(), "GET", "/admin/payments", None).await;
    let rows = payments.as_array().unwrap();
    assert_eq!(rows[0]["amount"].as_f64(), Some(3.33));

    let (_, stats) = request_json(app, "GET", "/admin/stats", None).await;
    assert_eq!(stats["totalRevenue"].as_f64(), Some(9.99));
}

#[tokio::test]
async fn zero_ticket_payment_saves_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, None);

    let (status, response) = request_json(
        app.clone(),
        "POST",
        "/save-payment",
        Some(save_payment_body("Dave", 0, json!(0), None)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["ticketNumbers"], json!([]));

    let (_, payments) = request_json(app, "GET", "/admin/payments", None).await;
    assert_eq!(payments, json!([]));
}

#[tokio::test]
async fn checkout_in_simulation_mode_returns_simulation_url() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, None);

    let body = json!({
        "firstName": "Eve",
        "lastName": "Tester",
        "email": "eve@example.com",
        "phone": "0600000000",
        "tickets": 2,
        "amount": 10,
    });
    let (status, response) =
        request_json(app, "POST", "/create-checkout-session", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["url"], "/success.html?simulation=true");
}

#[tokio::test]
async fn admin_import_replaces_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(&dir, Some("letmein"));

    request_json(
        app.clone(),
        "POST",
        "/save-payment",
        Some(save_payment_body("Alice", 3, json!(15), None)),
    )
    .await;

    // Wrong password is rejected without touching the store.
    let (status, response) = request_json(
        app.clone(),
        "POST",
        "/admin/import",
        Some(json!({"password": "guess", "payments": []})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(response["error"].is_string());

    let (_, payments) = request_json(app.clone(), "GET", "/admin/payments", None).await;
    assert_eq!(payments.as_array().unwrap().len(), 3);

    // Correct password replaces everything.
    let imported = json!([{
        "id": 1,
        "firstName": "Zoe",
        "lastName": "Importer",
        "email": "zoe@example.com",
        "phone": "0611111111",
        "vendeur": "Sam",
        "amount": 2,
        "date": "2025-01-01T00:00:00Z",
    }]);
    let (status, response) = request_json(
        app.clone(),
        "POST",
        "/admin/import",
        Some(json!({"password": "letmein", "payments": imported})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["message"], "1 payments imported");

    let (_, payments) = request_json(app, "GET", "/admin/payments", None).await;
    let rows = payments.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["firstName"], "Zoe");
}
