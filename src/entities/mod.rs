//! SeaORM entities backing the ERP Read Gateway and the Local Projection
//! Store. These are intentionally thin, ERP-shaped tables — the gateway
//! (`crate::gateway`) is the only code allowed to query them; the engine
//! only ever sees the normalized value types in `crate::models`.

pub mod bom_line;
pub mod inventory_balance;
pub mod open_job;
pub mod purchase_order_line;
pub mod sales_order_line;
pub mod user_projection;
