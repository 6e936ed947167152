//! ERP Read Gateway: pure read-side adapters returning
//! normalized records regardless of upstream schema. The engine depends
//! only on the `ErpGateway` trait, never on the concrete SeaORM adapter
//! or its entities.

mod sea_orm_gateway;

use crate::errors::ServiceError;
use crate::models::{BomLine, OpenJob, SalesOrderLine};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;

pub use sea_orm_gateway::SeaOrmErpGateway;

/// The six read operations the engine needs. Every method returns a
/// self-consistent snapshot or fails with `ServiceError::UpstreamUnavailable`
/// — partial snapshots are never returned.
#[async_trait]
pub trait ErpGateway: Send + Sync {
    async fn open_sales_orders(&self) -> Result<Vec<SalesOrderLine>, ServiceError>;
    async fn inventory_approved(&self) -> Result<HashMap<String, Decimal>, ServiceError>;
    async fn inventory_qc_pending(&self) -> Result<HashMap<String, Decimal>, ServiceError>;
    async fn open_po_quantities(&self) -> Result<HashMap<String, Decimal>, ServiceError>;
    async fn open_jobs(&self) -> Result<Vec<OpenJob>, ServiceError>;
    async fn bom_for(&self, part_numbers: &[String]) -> Result<Vec<BomLine>, ServiceError>;
}
