use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of an ERP sales order. `shipped_qty < required_qty` is the
/// gateway's "open" filter; fully-shipped lines stay in
/// this table but never come back from `open_sales_orders`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales_order_lines")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(indexed)]
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

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
