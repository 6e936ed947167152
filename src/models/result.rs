use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The disposition the allocation engine assigns to a sales order.
/// Variant order matches the tie-break precedence defined top to bottom —
/// `status_rank` depends on this order, so do not reorder without
/// re-checking the status-derivation tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum SoStatus {
    #[strum(serialize = "Ready to Ship")]
    #[serde(rename = "Ready to Ship")]
    ReadyToShip,
    #[strum(serialize = "Job Created")]
    #[serde(rename = "Job Created")]
    JobCreated,
    #[strum(serialize = "Partial Ship")]
    #[serde(rename = "Partial Ship")]
    PartialShip,
    #[strum(serialize = "Pending QC")]
    #[serde(rename = "Pending QC")]
    PendingQc,
    #[strum(serialize = "Full Production Ready")]
    #[serde(rename = "Full Production Ready")]
    FullProductionReady,
    #[strum(serialize = "Partial Production Ready")]
    #[serde(rename = "Partial Production Ready")]
    PartialProductionReady,
    #[strum(serialize = "Critical Shortage")]
    #[serde(rename = "Critical Shortage")]
    CriticalShortage,
}

/// One allocation recorded against a component's pools by a prior SO, kept
/// only for dashboard tooltips (`LiveInventory`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub so_number: String,
    pub qty: Decimal,
}

/// Per-component detail for the component pass of a single SO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDetail {
    pub component: String,
    pub required: Decimal,
    pub approved_consumed: Decimal,
    pub qc_consumed: Decimal,
    pub po_consumed: Decimal,
    pub shortfall: Decimal,
    pub prior_allocations: Vec<Allocation>,
}

/// The complete result the engine emits for one sales order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoResult {
    pub so_number: String,
    pub line_key: String,
    pub customer: String,
    pub business_unit: String,
    pub facility: String,
    pub part_number: String,
    pub due_ship: Option<chrono::NaiveDate>,
    pub required_qty: Decimal,
    pub status: SoStatus,
    pub job_created: bool,
    pub shippable_from_stock: Decimal,
    pub producible_qty: Decimal,
    pub total_deliverable: Decimal,
    pub bottleneck_components: Vec<String>,
    pub component_details: Vec<ComponentDetail>,
}
