//! Portfolio metrics aggregation.
//!
//! Metrics are recomputed on demand from one read of each table. Nothing is
//! cached between calls.

use std::collections::HashMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tradeflow_core::model::{
    InventoryFinancing, InventoryFinancingStatus, Invoice, Participant, ParticipantCategory,
    PurchaseOrder,
};
use tradeflow_core::{FinanceError, FinanceResult};
use tradeflow_storage::StorageAdapter;

use crate::rates::RiskTier;

/// Financed volume attributed to one participant category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryVolume {
    /// Category.
    pub category: ParticipantCategory,
    /// Sum of financed amounts.
    pub volume: Decimal,
}

/// Participant counts per risk tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskTierCounts {
    /// Rating 8-10.
    pub low: usize,
    /// Rating 5-7.
    pub medium: usize,
    /// Rating 1-4.
    pub high: usize,
}

/// Cross-ledger summary statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupplyChainMetrics {
    /// Registered participants.
    pub total_participants: usize,
    /// Participants with completed KYC.
    pub verified_participants: usize,
    /// Invoices on the ledger.
    pub invoice_count: usize,
    /// Purchase orders on the ledger.
    pub purchase_order_count: usize,
    /// Inventory financing agreements on the ledger.
    pub inventory_financing_count: usize,
    /// Sum of all inventory financing principals.
    pub total_inventory_financing: Decimal,
    /// Mean interest rate of priced inventory agreements; zero when none.
    pub average_financing_rate: Decimal,
    /// Mean rate of financed purchase orders; zero when none.
    pub average_po_financing_rate: Decimal,
    /// Mean participant on-time payment rate; zero when no participants.
    pub average_on_time_rate: Decimal,
    /// Face value of every invoice that has been factored.
    pub total_factored_volume: Decimal,
    /// Sum of approved purchase-order financing.
    pub total_po_financed: Decimal,
    /// Unpaid principal of approved and active agreements.
    pub outstanding_inventory_principal: Decimal,
    /// Participants per risk tier.
    pub risk_tiers: RiskTierCounts,
    /// Categories ranked by financed volume, largest first.
    pub top_categories: Vec<CategoryVolume>,
}

/// Reads the ledgers and computes [`SupplyChainMetrics`].
pub struct MetricsAggregator {
    storage: Arc<dyn StorageAdapter>,
    top_n: usize,
}

impl MetricsAggregator {
    pub(crate) fn new(storage: Arc<dyn StorageAdapter>, top_n: usize) -> Self {
        Self { storage, top_n }
    }

    /// Computes metrics from the current ledger state.
    ///
    /// Each table is read once, so every figure derived from a table is
    /// consistent with the others from that table. Tables are read one
    /// after another, so figures that span tables may reflect mutations
    /// that landed in between.
    pub fn compute(&self) -> FinanceResult<SupplyChainMetrics> {
        let participants = self.storage.list_participants()?;
        let invoices = self.storage.list_invoices()?;
        let orders = self.storage.list_purchase_orders()?;
        let financings = self.storage.list_inventory_financings()?;

        let metrics = compute_metrics(&participants, &invoices, &orders, &financings, self.top_n)?;
        debug!(
            participants = metrics.total_participants,
            invoices = metrics.invoice_count,
            purchase_orders = metrics.purchase_order_count,
            financings = metrics.inventory_financing_count,
            "Metrics computed"
        );
        Ok(metrics)
    }
}

/// Pure metrics computation over ledger snapshots.
///
/// Records must be in creation order. Category volume counts factored
/// invoices against the supplier, financed purchase orders against the
/// buyer, and approved inventory agreements against the borrower. Categories
/// with equal volume keep the order in which they first appear among
/// participants; categories with no volume are omitted.
pub fn compute_metrics(
    participants: &[Participant],
    invoices: &[Invoice],
    orders: &[PurchaseOrder],
    financings: &[InventoryFinancing],
    top_n: usize,
) -> FinanceResult<SupplyChainMetrics> {
    let total_inventory_financing = checked_sum(financings.iter().map(|f| f.principal))?;
    let average_financing_rate = mean(financings.iter().filter_map(|f| f.interest_rate))?;
    let average_po_financing_rate = mean(
        orders
            .iter()
            .filter_map(|po| po.financing.as_ref().filter(|t| t.approved).map(|t| t.rate)),
    )?;
    let average_on_time_rate = mean(participants.iter().map(|p| p.on_time_rate))?;

    let total_factored_volume = checked_sum(
        invoices
            .iter()
            .filter(|i| i.was_factored())
            .map(|i| i.amount),
    )?;
    let total_po_financed = checked_sum(orders.iter().filter_map(PurchaseOrder::financed_amount))?;
    let outstanding_inventory_principal = checked_sum(
        financings
            .iter()
            .filter(|f| {
                matches!(
                    f.status,
                    InventoryFinancingStatus::Approved | InventoryFinancingStatus::Active
                )
            })
            .map(InventoryFinancing::outstanding_principal),
    )?;

    let mut risk_tiers = RiskTierCounts::default();
    for participant in participants {
        match RiskTier::from_rating(participant.credit_rating) {
            Ok(RiskTier::Low) => risk_tiers.low += 1,
            Ok(RiskTier::Medium) => risk_tiers.medium += 1,
            Ok(RiskTier::High) => risk_tiers.high += 1,
            Err(_) => {}
        }
    }

    Ok(SupplyChainMetrics {
        total_participants: participants.len(),
        verified_participants: participants.iter().filter(|p| p.is_verified()).count(),
        invoice_count: invoices.len(),
        purchase_order_count: orders.len(),
        inventory_financing_count: financings.len(),
        total_inventory_financing,
        average_financing_rate,
        average_po_financing_rate,
        average_on_time_rate,
        total_factored_volume,
        total_po_financed,
        outstanding_inventory_principal,
        risk_tiers,
        top_categories: top_categories(participants, invoices, orders, financings, top_n)?,
    })
}

fn top_categories(
    participants: &[Participant],
    invoices: &[Invoice],
    orders: &[PurchaseOrder],
    financings: &[InventoryFinancing],
    top_n: usize,
) -> FinanceResult<Vec<CategoryVolume>> {
    let category_of: HashMap<&str, ParticipantCategory> = participants
        .iter()
        .map(|p| (p.id.as_str(), p.category))
        .collect();

    // First-appearance order of each category among participants.
    let mut ranked: Vec<CategoryVolume> = Vec::new();
    for participant in participants {
        if !ranked.iter().any(|c| c.category == participant.category) {
            ranked.push(CategoryVolume {
                category: participant.category,
                volume: Decimal::ZERO,
            });
        }
    }

    let financed = invoices
        .iter()
        .filter(|i| i.was_factored())
        .map(|i| (i.supplier_id.as_str(), i.amount))
        .chain(
            orders
                .iter()
                .filter_map(|po| po.financed_amount().map(|a| (po.buyer_id.as_str(), a))),
        )
        .chain(
            financings
                .iter()
                .filter(|f| f.approval_date.is_some())
                .map(|f| (f.participant_id.as_str(), f.principal)),
        );

    for (participant_id, amount) in financed {
        let Some(category) = category_of.get(participant_id) else {
            continue;
        };
        if let Some(entry) = ranked.iter_mut().find(|c| c.category == *category) {
            entry.volume = entry.volume.checked_add(amount).ok_or_else(total_overflow)?;
        }
    }

    // Stable sort keeps first-appearance order among equal volumes.
    ranked.sort_by(|a, b| b.volume.cmp(&a.volume));
    Ok(ranked
        .into_iter()
        .filter(|c| c.volume > Decimal::ZERO)
        .take(top_n)
        .collect())
}

fn checked_sum(mut values: impl Iterator<Item = Decimal>) -> FinanceResult<Decimal> {
    values.try_fold(Decimal::ZERO, |sum, v| sum.checked_add(v).ok_or_else(total_overflow))
}

fn mean(values: impl Iterator<Item = Decimal>) -> FinanceResult<Decimal> {
    let mut sum = Decimal::ZERO;
    let mut count = 0u64;
    for value in values {
        sum = sum.checked_add(value).ok_or_else(total_overflow)?;
        count += 1;
    }
    if count == 0 {
        return Ok(Decimal::ZERO);
    }
    sum.checked_div(Decimal::from(count)).ok_or_else(total_overflow)
}

fn total_overflow() -> FinanceError {
    FinanceError::invalid_input("metrics", "portfolio total is not representable")
}
