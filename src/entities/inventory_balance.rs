use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One part's `approved` and `qc_pending` pools (`InventoryPool`).
/// `open_po` lives separately in `purchase_order_lines` since it is a sum
/// over open PO lines rather than a single balance. Quantities issued to
/// a job are never represented here — they simply don't count
/// toward `approved`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_balances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub part_number: String,
    pub approved_qty: Decimal,
    pub qc_pending_qty: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
