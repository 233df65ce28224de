//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use tradeflow_core::model::{
    InventoryFinancing, Invoice, InvoiceStatus, NewInventoryFinancing, NewInvoice,
    NewParticipant, NewPurchaseOrder, Participant, ParticipantCategory, PurchaseOrder,
    PurchaseOrderStatus,
};
use tradeflow_core::types::{FinancingId, InvoiceId, ParticipantId, PurchaseOrderId};
use tradeflow_core::Date;
use tradeflow_engine::{
    FinancingEngine, FinancingProduct, InvoiceFilter, RateQuote, SupplyChainMetrics, SweepReport,
};

use crate::error::ApiResult;

/// Application state.
pub struct AppState {
    /// The financing engine
    pub engine: Arc<FinancingEngine>,
}

type SharedState = State<Arc<AppState>>;
type Created<T> = (StatusCode, Json<T>);

fn created<T>(body: T) -> Created<T> {
    (StatusCode::CREATED, Json(body))
}

// =============================================================================
// HEALTH
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    storage: &'static str,
}

/// Health check handler.
pub async fn health(State(state): SharedState) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.engine.is_healthy();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            storage: state.engine.backend_name(),
        }),
    )
}

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// Query parameters for listing participants.
#[derive(Debug, Deserialize)]
pub struct ParticipantQuery {
    /// Only participants in this category.
    pub category: Option<ParticipantCategory>,
}

/// Query parameters for a rate quote.
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    /// Product to price. Defaults to purchase-order financing.
    pub product: Option<FinancingProduct>,
}

/// Register a participant.
pub async fn register_participant(
    State(state): SharedState,
    Json(request): Json<NewParticipant>,
) -> ApiResult<Created<Participant>> {
    let id = state.engine.register_participant(request)?;
    Ok(created(state.engine.get_participant(&id)?))
}

/// List participants.
pub async fn list_participants(
    State(state): SharedState,
    Query(query): Query<ParticipantQuery>,
) -> ApiResult<Json<Vec<Participant>>> {
    Ok(Json(state.engine.list_participants(query.category)?))
}

/// Get a participant.
pub async fn get_participant(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Participant>> {
    Ok(Json(state.engine.get_participant(&ParticipantId::new(id))?))
}

/// Quote a participant's current financing rate.
pub async fn quote_rate(
    State(state): SharedState,
    Path(id): Path<String>,
    Query(query): Query<QuoteQuery>,
) -> ApiResult<Json<RateQuote>> {
    let product = query.product.unwrap_or(FinancingProduct::PurchaseOrder);
    Ok(Json(
        state.engine.quote_rate(&ParticipantId::new(id), product)?,
    ))
}

// =============================================================================
// INVOICES
// =============================================================================

/// Query parameters for listing invoices.
#[derive(Debug, Deserialize)]
pub struct InvoiceQuery {
    /// Only invoices in this status.
    pub status: Option<InvoiceStatus>,
    /// Only invoices where this participant is supplier or buyer.
    pub participant: Option<String>,
}

/// Factoring offer request.
#[derive(Debug, Deserialize)]
pub struct FactoringOfferRequest {
    /// Fee in percent of face value.
    pub fee_rate: Decimal,
}

/// Issue an invoice.
pub async fn create_invoice(
    State(state): SharedState,
    Json(request): Json<NewInvoice>,
) -> ApiResult<Created<Invoice>> {
    let id = state.engine.create_invoice(request)?;
    Ok(created(state.engine.get_invoice(&id)?))
}

/// List invoices.
pub async fn list_invoices(
    State(state): SharedState,
    Query(query): Query<InvoiceQuery>,
) -> ApiResult<Json<Vec<Invoice>>> {
    let filter = InvoiceFilter {
        status: query.status,
        participant: query.participant.map(ParticipantId::new),
    };
    Ok(Json(state.engine.list_invoices(&filter)?))
}

/// Get an invoice.
pub async fn get_invoice(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.engine.get_invoice(&InvoiceId::new(id))?))
}

/// Attach a factoring offer.
pub async fn offer_factoring(
    State(state): SharedState,
    Path(id): Path<String>,
    Json(request): Json<FactoringOfferRequest>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(
        state
            .engine
            .offer_factoring(&InvoiceId::new(id), request.fee_rate)?,
    ))
}

/// Factor an invoice.
pub async fn factor_invoice(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.engine.factor_invoice(&InvoiceId::new(id))?))
}

/// Record buyer acceptance.
pub async fn approve_invoice(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.engine.approve_invoice(&InvoiceId::new(id))?))
}

/// Flag an invoice overdue if its due date has passed.
pub async fn mark_invoice_overdue(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.engine.mark_invoice_overdue(&InvoiceId::new(id))?))
}

/// Record settlement.
pub async fn mark_invoice_paid(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(state.engine.mark_invoice_paid(&InvoiceId::new(id))?))
}

// =============================================================================
// PURCHASE ORDERS
// =============================================================================

/// Query parameters for listing purchase orders.
#[derive(Debug, Deserialize)]
pub struct PurchaseOrderQuery {
    /// Only orders in this status.
    pub status: Option<PurchaseOrderStatus>,
}

/// PO financing request.
#[derive(Debug, Deserialize)]
pub struct FinancingRequest {
    /// Amount to finance.
    pub amount: Decimal,
}

/// Create a purchase order.
pub async fn create_purchase_order(
    State(state): SharedState,
    Json(request): Json<NewPurchaseOrder>,
) -> ApiResult<Created<PurchaseOrder>> {
    let id = state.engine.create_purchase_order(request)?;
    Ok(created(state.engine.get_purchase_order(&id)?))
}

/// List purchase orders.
pub async fn list_purchase_orders(
    State(state): SharedState,
    Query(query): Query<PurchaseOrderQuery>,
) -> ApiResult<Json<Vec<PurchaseOrder>>> {
    Ok(Json(state.engine.list_purchase_orders(query.status)?))
}

/// Get a purchase order.
pub async fn get_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state.engine.get_purchase_order(&PurchaseOrderId::new(id))?,
    ))
}

/// Request financing for a purchase order.
pub async fn request_po_financing(
    State(state): SharedState,
    Path(id): Path<String>,
    Json(request): Json<FinancingRequest>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state
            .engine
            .request_po_financing(&PurchaseOrderId::new(id), request.amount)?,
    ))
}

/// Send a draft order.
pub async fn send_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state.engine.send_purchase_order(&PurchaseOrderId::new(id))?,
    ))
}

/// Confirm a sent order.
pub async fn confirm_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state.engine.confirm_purchase_order(&PurchaseOrderId::new(id))?,
    ))
}

/// Record delivery.
pub async fn mark_po_delivered(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state.engine.mark_po_delivered(&PurchaseOrderId::new(id))?,
    ))
}

/// Close out a delivered order.
pub async fn complete_purchase_order(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<PurchaseOrder>> {
    Ok(Json(
        state.engine.complete_purchase_order(&PurchaseOrderId::new(id))?,
    ))
}

// =============================================================================
// INVENTORY FINANCING
// =============================================================================

/// Query parameters for listing agreements.
#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    /// Only agreements for this borrower.
    pub participant: Option<String>,
}

/// Apply for inventory financing.
pub async fn apply_inventory_financing(
    State(state): SharedState,
    Json(request): Json<NewInventoryFinancing>,
) -> ApiResult<Created<InventoryFinancing>> {
    let id = state.engine.apply_inventory_financing(request)?;
    Ok(created(state.engine.get_inventory_financing(&id)?))
}

/// List agreements.
pub async fn list_inventory_financings(
    State(state): SharedState,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<Vec<InventoryFinancing>>> {
    let participant = query.participant.map(ParticipantId::new);
    Ok(Json(
        state
            .engine
            .list_inventory_financings(participant.as_ref())?,
    ))
}

/// Get an agreement.
pub async fn get_inventory_financing(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(
        state.engine.get_inventory_financing(&FinancingId::new(id))?,
    ))
}

/// Price an application and generate its schedule.
pub async fn approve_inventory_financing(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(
        state
            .engine
            .approve_inventory_financing(&FinancingId::new(id))?,
    ))
}

/// Record drawdown.
pub async fn activate_inventory_financing(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(
        state
            .engine
            .activate_inventory_financing(&FinancingId::new(id))?,
    ))
}

/// Declare an active agreement in default.
pub async fn mark_defaulted(
    State(state): SharedState,
    Path(id): Path<String>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(state.engine.mark_defaulted(&FinancingId::new(id))?))
}

/// Mark an installment paid.
pub async fn record_payment(
    State(state): SharedState,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(
        state.engine.record_payment(&FinancingId::new(id), index)?,
    ))
}

/// Flag an installment overdue.
pub async fn mark_installment_overdue(
    State(state): SharedState,
    Path((id, index)): Path<(String, usize)>,
) -> ApiResult<Json<InventoryFinancing>> {
    Ok(Json(
        state
            .engine
            .mark_installment_overdue(&FinancingId::new(id), index)?,
    ))
}

// =============================================================================
// PORTFOLIO
// =============================================================================

/// Query parameters for the overdue sweep.
#[derive(Debug, Deserialize)]
pub struct SweepQuery {
    /// Sweep as of this date. Defaults to the engine's today.
    pub as_of: Option<Date>,
}

/// Portfolio metrics.
pub async fn metrics(State(state): SharedState) -> ApiResult<Json<SupplyChainMetrics>> {
    Ok(Json(state.engine.compute_metrics()?))
}

/// Flag overdue invoices and past-due installments.
pub async fn sweep_overdue(
    State(state): SharedState,
    Query(query): Query<SweepQuery>,
) -> ApiResult<Json<SweepReport>> {
    let as_of = query.as_of.unwrap_or_else(|| state.engine.today());
    Ok(Json(state.engine.sweep_overdue(as_of)?))
}
