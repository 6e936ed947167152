//! Result Aggregator: derives the three published views from
//! the engine's output. No I/O — this module is a stateless set of free
//! functions operating purely on `&[SoResult]` plus the input snapshots
//! the shortage report needs for on-hand/open-PO totals.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{SoResult, SoStatus};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub ready_to_ship: usize,
    pub pending_qc: usize,
    pub job_created: usize,
    pub full_production: usize,
    pub partial_production: usize,
    pub partial_ship: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub orders: Vec<SoResult>,
    pub summary: DashboardSummary,
}

/// Buckets a status into the dashboard's three-way bucket:
/// `production-needed` unions {Full Production Ready, Partial Production
/// Ready, Partial Ship, Job Created}; `action-required` unions {Critical
/// Shortage, Pending QC}.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    ReadyToShip,
    ProductionNeeded,
    ActionRequired,
}

pub fn status_bucket(status: SoStatus) -> StatusBucket {
    match status {
        SoStatus::ReadyToShip => StatusBucket::ReadyToShip,
        SoStatus::FullProductionReady
        | SoStatus::PartialProductionReady
        | SoStatus::PartialShip
        | SoStatus::JobCreated => StatusBucket::ProductionNeeded,
        SoStatus::CriticalShortage | SoStatus::PendingQc => StatusBucket::ActionRequired,
    }
}

/// Builds the unfiltered dashboard view over a full run's results. Filtering
/// by business_unit/customer/fg/due_ship/status bucket is applied by the
/// handler on top of this view, not here.
pub fn dashboard_view(results: &[SoResult]) -> DashboardView {
    let mut summary = DashboardSummary {
        total: results.len(),
        ready_to_ship: 0,
        pending_qc: 0,
        job_created: 0,
        full_production: 0,
        partial_production: 0,
        partial_ship: 0,
        critical: 0,
    };

    for r in results {
        match r.status {
            SoStatus::ReadyToShip => summary.ready_to_ship += 1,
            SoStatus::PendingQc => summary.pending_qc += 1,
            SoStatus::JobCreated => summary.job_created += 1,
            SoStatus::FullProductionReady => summary.full_production += 1,
            SoStatus::PartialProductionReady => summary.partial_production += 1,
            SoStatus::PartialShip => summary.partial_ship += 1,
            SoStatus::CriticalShortage => summary.critical += 1,
        }
    }

    DashboardView {
        orders: results.to_vec(),
        summary,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub customer: String,
    pub total: usize,
    pub on_track: usize,
    pub at_risk: usize,
    pub critical: usize,
    pub orders: Vec<SoResult>,
}

/// Groups by customer : On-Track = {Ready to Ship, Full
/// Production Ready, Job Created}; At-Risk = {Partial Ship, Partial
/// Production Ready, Pending QC}; Critical = {Critical Shortage}.
pub fn customer_summary(results: &[SoResult], customer: &str) -> CustomerSummary {
    let orders: Vec<SoResult> = results.iter().filter(|r| r.customer == customer).cloned().collect();

    let mut on_track = 0;
    let mut at_risk = 0;
    let mut critical = 0;

    for r in &orders {
        match r.status {
            SoStatus::ReadyToShip | SoStatus::FullProductionReady | SoStatus::JobCreated => on_track += 1,
            SoStatus::PartialShip | SoStatus::PartialProductionReady | SoStatus::PendingQc => at_risk += 1,
            SoStatus::CriticalShortage => critical += 1,
        }
    }

    CustomerSummary {
        customer: customer.to_string(),
        total: orders.len(),
        on_track,
        at_risk,
        critical,
        orders,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AffectedSo {
    pub so_number: String,
    pub customer: String,
    pub shortfall: Decimal,
    pub due_ship: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShortageReportEntry {
    pub component_part: String,
    /// Not sourced by the ERP Read Gateway (no parts-master lookup in
    /// scope); reserved for a future description join.
    pub description: Option<String>,
    pub on_hand_approved: Decimal,
    pub open_po_qty: Decimal,
    pub total_shortfall: Decimal,
    pub affected: Vec<AffectedSo>,
    pub earliest_due_ship: Option<NaiveDate>,
}

/// Aggregates every per-SO component shortfall by component_part.
/// `approved`/`open_po` are the same input snapshots the run used,
/// passed through rather than re-queried.
pub fn purchasing_shortage_report(
    results: &[SoResult],
    approved: &HashMap<String, Decimal>,
    open_po: &HashMap<String, Decimal>,
) -> Vec<ShortageReportEntry> {
    let mut by_component: HashMap<String, ShortageReportEntry> = HashMap::new();

    for so in results {
        for detail in &so.component_details {
            if detail.shortfall <= Decimal::ZERO {
                continue;
            }

            let entry = by_component
                .entry(detail.component.clone())
                .or_insert_with(|| ShortageReportEntry {
                    component_part: detail.component.clone(),
                    description: None,
                    on_hand_approved: approved.get(&detail.component).copied().unwrap_or(Decimal::ZERO),
                    open_po_qty: open_po.get(&detail.component).copied().unwrap_or(Decimal::ZERO),
                    total_shortfall: Decimal::ZERO,
                    affected: Vec::new(),
                    earliest_due_ship: None,
                });

            entry.total_shortfall += detail.shortfall;
            entry.affected.push(AffectedSo {
                so_number: so.so_number.clone(),
                customer: so.customer.clone(),
                shortfall: detail.shortfall,
                due_ship: so.due_ship,
            });
            entry.earliest_due_ship = earlier(entry.earliest_due_ship, so.due_ship);
        }
    }

    let mut report: Vec<ShortageReportEntry> = by_component.into_values().collect();
    report.sort_by(|a, b| {
        a.earliest_due_ship
            .cmp(&b.earliest_due_ship)
            .then_with(|| a.component_part.cmp(&b.component_part))
    });
    report
}

fn earlier(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Option<NaiveDate> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}
