//! Integration tests for the Tradeflow API endpoints.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use tower::ServiceExt;

use tradeflow_api::routes::create_router;
use tradeflow_core::Date;
use tradeflow_engine::{FinancingEngineBuilder, FixedClock};
use tradeflow_storage::InMemoryStorage;

/// Create a router over an in-memory engine pinned to 2025-01-15.
fn create_test_app() -> Router {
    let clock = Arc::new(FixedClock::at_date(Date::from_ymd(2025, 1, 15).unwrap()));
    let engine = FinancingEngineBuilder::new()
        .with_storage(Arc::new(InMemoryStorage::new()))
        .with_clock(clock)
        .build()
        .unwrap();
    create_router(Arc::new(engine))
}

/// Money and rates travel as decimal strings.
fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn register(app: &Router, name: &str, category: &str, rating: u8) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/participants",
        Some(json!({
            "name": name,
            "category": category,
            "credit_rating": rating,
            "verification": "verified",
            "monthly_volume": 80000,
            "on_time_rate": 95
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

async fn create_invoice(app: &Router, supplier: &str, buyer: &str, amount: u64) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/invoices",
        Some(json!({
            "supplier_id": supplier,
            "buyer_id": buyer,
            "amount": amount,
            "currency": "KES",
            "issue_date": "2025-01-10",
            "due_date": "2025-02-09"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_str().unwrap().to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

// =============================================================================
// Participants
// =============================================================================

#[tokio::test]
async fn test_register_and_quote() {
    let app = create_test_app();
    let id = register(&app, "Kampala Wholesale", "distributor", 9).await;
    assert_eq!(id, "PRT-00000001");

    let (status, body) = send(&app, "GET", &format!("/api/v1/participants/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Kampala Wholesale");

    let (status, quote) = send(
        &app,
        "GET",
        &format!("/api/v1/participants/{id}/quote?product=purchase_order"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&quote["rate"]), dec!(5.5));
    assert_eq!(quote["risk_tier"], "low");

    let (_, quote) = send(
        &app,
        "GET",
        &format!("/api/v1/participants/{id}/quote?product=inventory"),
        None,
    )
    .await;
    assert_eq!(decimal(&quote["rate"]), dec!(8.3));
}

#[tokio::test]
async fn test_duplicate_participant_conflict() {
    let app = create_test_app();
    register(&app, "Kampala Wholesale", "distributor", 9).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/participants",
        Some(json!({"name": "kampala  wholesale", "category": "distributor", "credit_rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_PARTICIPANT");
}

#[tokio::test]
async fn test_invalid_rating_unprocessable() {
    let app = create_test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/participants",
        Some(json!({"name": "Zero Rated", "category": "retailer", "credit_rating": 11})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_CREDIT_RATING");
}

#[tokio::test]
async fn test_list_participants_by_category() {
    let app = create_test_app();
    register(&app, "Kiambu Coffee Coop", "supplier", 8).await;
    register(&app, "Java House", "retailer", 6).await;

    let (status, body) = send(&app, "GET", "/api/v1/participants?category=retailer", None).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["name"], "Java House");
}

#[tokio::test]
async fn test_participant_not_found() {
    let app = create_test_app();
    let (status, body) = send(&app, "GET", "/api/v1/participants/PRT-00000042", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

// =============================================================================
// Invoices
// =============================================================================

#[tokio::test]
async fn test_factoring_flow() {
    let app = create_test_app();
    let supplier = register(&app, "Thika Textiles", "manufacturer", 7).await;
    let buyer = register(&app, "Nairobi Outfitters", "retailer", 6).await;
    let invoice = create_invoice(&app, &supplier, &buyer, 25000).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/invoices/{invoice}/factor"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NO_FACTORING_OFFER");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/invoices/{invoice}/offer"),
        Some(json!({"fee_rate": 3.5})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["factoring"]["net_payout"]), dec!(24125));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/invoices/{invoice}/factor"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "factored");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/invoices/{invoice}/factor"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/v1/invoices?status=factored&participant={buyer}"),
        None,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invoice_with_unknown_buyer() {
    let app = create_test_app();
    let supplier = register(&app, "Thika Textiles", "manufacturer", 7).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/invoices",
        Some(json!({
            "supplier_id": supplier,
            "buyer_id": "PRT-00000099",
            "amount": 1000,
            "issue_date": "2025-01-10",
            "due_date": "2025-02-09"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "UNKNOWN_PARTICIPANT");
}

// =============================================================================
// Purchase orders
// =============================================================================

#[tokio::test]
async fn test_po_financing() {
    let app = create_test_app();
    let buyer = register(&app, "Accra Distributors", "distributor", 9).await;
    let supplier = register(&app, "Kumasi Cocoa", "supplier", 5).await;

    let (status, po) = send(
        &app,
        "POST",
        "/api/v1/purchase-orders",
        Some(json!({
            "buyer_id": buyer,
            "supplier_id": supplier,
            "amount": 35000,
            "issue_date": "2025-01-12",
            "expected_delivery": "2025-03-01"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(po["status"], "draft");
    let id = po["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/purchase-orders/{id}/financing"),
        Some(json!({"amount": 40000})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "FINANCING_EXCEEDS_ORDER_VALUE");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/purchase-orders/{id}/financing"),
        Some(json!({"amount": 35000})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "financed");
    assert_eq!(decimal(&body["financing"]["rate"]), dec!(5.5));

    let (status, _) = send(&app, "POST", &format!("/api/v1/purchase-orders/{id}/deliver"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) =
        send(&app, "POST", &format!("/api/v1/purchase-orders/{id}/complete"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "completed");
}

// =============================================================================
// Inventory financing
// =============================================================================

#[tokio::test]
async fn test_inventory_financing_flow() {
    let app = create_test_app();
    let borrower = register(&app, "Kiambu Coffee Coop", "supplier", 8).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/v1/inventory-financings",
        Some(json!({
            "participant_id": borrower,
            "inventory_value": 100000,
            "requested_amount": 150000,
            "collateral": []
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "COLLATERAL_INSUFFICIENT");

    let (status, financing) = send(
        &app,
        "POST",
        "/api/v1/inventory-financings",
        Some(json!({
            "participant_id": borrower,
            "inventory_value": 150000,
            "requested_amount": 120000,
            "collateral": [{
                "name": "Arabica coffee",
                "category": "coffee",
                "quantity": 3000,
                "unit_value": 50,
                "condition": "good"
            }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{financing}");
    assert_eq!(financing["status"], "applied");
    let id = financing["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/inventory-financings/{id}/approve"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["interest_rate"]), dec!(8.6));
    let schedule = body["schedule"].as_array().unwrap();
    assert_eq!(schedule.len(), 6);
    assert_eq!(decimal(&schedule[0]["amount"]), dec!(20860));
    assert_eq!(schedule[0]["due_date"], "2025-02-15");

    send(&app, "POST", &format!("/api/v1/inventory-financings/{id}/activate"), None).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/v1/inventory-financings/{id}/payments/0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/inventory-financings/{id}/payments/0"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_PAID");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/v1/inventory-financings/{id}/payments/9"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INDEX_OUT_OF_RANGE");

    let (_, list) = send(
        &app,
        "GET",
        &format!("/api/v1/inventory-financings?participant={borrower}"),
        None,
    )
    .await;
    assert_eq!(list.as_array().unwrap().len(), 1);
}

// =============================================================================
// Portfolio
// =============================================================================

#[tokio::test]
async fn test_sweep_and_metrics() {
    let app = create_test_app();
    let supplier = register(&app, "Mwanza Fisheries", "supplier", 6).await;
    let buyer = register(&app, "Dodoma Foods", "retailer", 9).await;
    create_invoice(&app, &supplier, &buyer, 4000).await;

    let (status, report) = send(
        &app,
        "POST",
        "/api/v1/maintenance/sweep-overdue?as_of=2025-03-01",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["invoices_marked_overdue"], 1);
    assert_eq!(report["installments_marked_overdue"], 0);

    let (status, metrics) = send(&app, "GET", "/api/v1/metrics", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(metrics["total_participants"], 2);
    assert_eq!(metrics["verified_participants"], 2);
    assert_eq!(metrics["invoice_count"], 1);
    assert_eq!(metrics["risk_tiers"]["low"], 1);
    assert_eq!(metrics["risk_tiers"]["medium"], 1);
    assert!(metrics["top_categories"].as_array().unwrap().is_empty());
}
