use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One component line of a single-level BOM. The engine never
/// traverses a component's own BOM — multi-level explosion is an explicit
/// non-goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub parent_part: String,
    pub component_part: String,
    pub qty_per_unit: Decimal,
    pub scrap_percent: Decimal,
}

impl BomLine {
    /// Effective per-unit requirement: `qty_per_unit * (1 + scrap_percent / 100)`.
    pub fn effective_qty_per_unit(&self) -> Decimal {
        self.qty_per_unit * (Decimal::ONE + self.scrap_percent / Decimal::from(100))
    }
}
