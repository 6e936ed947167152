use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One open sales-order line as returned by the ERP Read Gateway.
///
/// `net_qty` is always `required_qty - shipped_qty`; lines with
/// `net_qty == 0` are filtered out by the gateway and never reach the
/// engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesOrderLine {
    pub so_number: String,
    pub line_key: String,
    pub part_number: String,
    pub customer: String,
    pub business_unit: String,
    pub so_type: String,
    pub facility: String,
    pub due_ship: Option<NaiveDate>,
    pub unit_price: Decimal,
    pub required_qty: Decimal,
    pub shipped_qty: Decimal,
}

impl SalesOrderLine {
    /// `required_qty - shipped_qty`.
    pub fn net_qty(&self) -> Decimal {
        self.required_qty - self.shipped_qty
    }
}
