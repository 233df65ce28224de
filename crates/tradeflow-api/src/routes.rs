//! Route definitions.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use tradeflow_engine::FinancingEngine;

use crate::handlers::{self, AppState};

/// Create the API router.
///
/// # Arguments
/// * `engine` - The financing engine
pub fn create_router(engine: Arc<FinancingEngine>) -> Router {
    let state = Arc::new(AppState { engine });

    Router::new()
        // Health
        .route("/health", get(handlers::health))
        .route("/api/v1/health", get(handlers::health))
        // Participants
        .route("/api/v1/participants", get(handlers::list_participants).post(handlers::register_participant))
        .route("/api/v1/participants/{id}", get(handlers::get_participant))
        .route("/api/v1/participants/{id}/quote", get(handlers::quote_rate))
        // Invoices
        .route("/api/v1/invoices", get(handlers::list_invoices).post(handlers::create_invoice))
        .route("/api/v1/invoices/{id}", get(handlers::get_invoice))
        .route("/api/v1/invoices/{id}/offer", post(handlers::offer_factoring))
        .route("/api/v1/invoices/{id}/factor", post(handlers::factor_invoice))
        .route("/api/v1/invoices/{id}/approve", post(handlers::approve_invoice))
        .route("/api/v1/invoices/{id}/overdue", post(handlers::mark_invoice_overdue))
        .route("/api/v1/invoices/{id}/paid", post(handlers::mark_invoice_paid))
        // Purchase orders
        .route("/api/v1/purchase-orders", get(handlers::list_purchase_orders).post(handlers::create_purchase_order))
        .route("/api/v1/purchase-orders/{id}", get(handlers::get_purchase_order))
        .route("/api/v1/purchase-orders/{id}/send", post(handlers::send_purchase_order))
        .route("/api/v1/purchase-orders/{id}/confirm", post(handlers::confirm_purchase_order))
        .route("/api/v1/purchase-orders/{id}/financing", post(handlers::request_po_financing))
        .route("/api/v1/purchase-orders/{id}/deliver", post(handlers::mark_po_delivered))
        .route("/api/v1/purchase-orders/{id}/complete", post(handlers::complete_purchase_order))
        // Inventory financing
        .route("/api/v1/inventory-financings", get(handlers::list_inventory_financings).post(handlers::apply_inventory_financing))
        .route("/api/v1/inventory-financings/{id}", get(handlers::get_inventory_financing))
        .route("/api/v1/inventory-financings/{id}/approve", post(handlers::approve_inventory_financing))
        .route("/api/v1/inventory-financings/{id}/activate", post(handlers::activate_inventory_financing))
        .route("/api/v1/inventory-financings/{id}/default", post(handlers::mark_defaulted))
        .route("/api/v1/inventory-financings/{id}/payments/{index}", post(handlers::record_payment))
        .route("/api/v1/inventory-financings/{id}/installments/{index}/overdue", post(handlers::mark_installment_overdue))
        // Portfolio
        .route("/api/v1/metrics", get(handlers::metrics))
        .route("/api/v1/maintenance/sweep-overdue", post(handlers::sweep_overdue))
        // State
        .with_state(state)
}
