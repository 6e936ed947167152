use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use tracing::{error, instrument};

use crate::db::DbPool;
use crate::entities::{bom_line, inventory_balance, open_job, purchase_order_line, sales_order_line};
use crate::errors::ServiceError;
use crate::models::{BomLine, OpenJob, SalesOrderLine};

use super::ErpGateway;

/// SeaORM-backed ERP Read Gateway. Maps entity rows onto the engine's
/// normalized value types (no downstream string-keyed access).
pub struct SeaOrmErpGateway {
    db: Arc<DbPool>,
    call_timeout: Duration,
}

impl SeaOrmErpGateway {
    pub fn new(db: Arc<DbPool>, call_timeout: Duration) -> Self {
        Self { db, call_timeout }
    }

    async fn with_timeout<T, F>(&self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::UpstreamUnavailable(
                "ERP gateway call exceeded its timeout".to_string(),
            )),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[async_trait]
impl ErpGateway for SeaOrmErpGateway {
    #[instrument(skip(self))]
    async fn open_sales_orders(&self) -> Result<Vec<SalesOrderLine>, ServiceError> {
        self.with_timeout(async {
            let rows = sales_order_line::Entity::find()
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read open sales orders");
                    ServiceError::from_gateway_db_err(e)
                })?;

            Ok(rows
                .into_iter()
                .filter(|r| r.shipped_qty < r.required_qty)
                .map(|r| SalesOrderLine {
                    so_number: r.so_number,
                    line_key: r.line_key,
                    part_number: r.part_number,
                    customer: r.customer,
                    business_unit: r.business_unit,
                    so_type: r.so_type,
                    facility: r.facility,
                    due_ship: r.due_ship,
                    unit_price: r.unit_price,
                    required_qty: r.required_qty,
                    shipped_qty: r.shipped_qty,
                })
                .collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn inventory_approved(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
        self.with_timeout(async {
            let rows = inventory_balance::Entity::find()
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read approved inventory");
                    ServiceError::from_gateway_db_err(e)
                })?;
            Ok(rows
                .into_iter()
                .map(|r| (r.part_number, r.approved_qty.max(Decimal::ZERO)))
                .collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn inventory_qc_pending(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
        self.with_timeout(async {
            let rows = inventory_balance::Entity::find()
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read QC-pending inventory");
                    ServiceError::from_gateway_db_err(e)
                })?;
            Ok(rows
                .into_iter()
                .map(|r| (r.part_number, r.qc_pending_qty.max(Decimal::ZERO)))
                .collect())
        })
        .await
    }

    #[instrument(skip(self))]
    async fn open_po_quantities(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
        self.with_timeout(async {
            let rows = purchase_order_line::Entity::find()
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read open PO quantities");
                    ServiceError::from_gateway_db_err(e)
                })?;

            let mut totals: HashMap<String, Decimal> = HashMap::new();
            for row in rows {
                *totals.entry(row.part_number).or_insert(Decimal::ZERO) +=
                    row.open_qty.max(Decimal::ZERO);
            }
            Ok(totals)
        })
        .await
    }

    #[instrument(skip(self))]
    async fn open_jobs(&self) -> Result<Vec<OpenJob>, ServiceError> {
        self.with_timeout(async {
            let rows = open_job::Entity::find()
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read open jobs");
                    ServiceError::from_gateway_db_err(e)
                })?;
            Ok(rows
                .into_iter()
                .map(|r| OpenJob {
                    job_number: r.job_number,
                    so_number: r.so_number,
                    part_number: r.part_number,
                    required_qty: r.required_qty,
                    completed_qty: r.completed_qty,
                })
                .collect())
        })
        .await
    }

    #[instrument(skip(self, part_numbers))]
    async fn bom_for(&self, part_numbers: &[String]) -> Result<Vec<BomLine>, ServiceError> {
        self.with_timeout(async {
            let rows = bom_line::Entity::find()
                .filter(bom_line::Column::ParentPart.is_in(part_numbers.to_vec()))
                .all(self.db())
                .await
                .map_err(|e| {
                    error!(%e, "failed to read BOM lines");
                    ServiceError::from_gateway_db_err(e)
                })?;
            Ok(rows
                .into_iter()
                .map(|r| BomLine {
                    parent_part: r.parent_part,
                    component_part: r.component_part,
                    qty_per_unit: r.qty_per_unit,
                    scrap_percent: r.scrap_percent,
                })
                .collect())
        })
        .await
    }
}
