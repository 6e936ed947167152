//! Local Projection Store: read/write access to user-entered
//! "no/low risk" and "high risk" quantities keyed by `(so_number,
//! part_number, risk_type)`.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::user_projection;
use crate::errors::ServiceError;
use crate::models::{RiskType, UserProjection};

#[async_trait]
pub trait ProjectionStore: Send + Sync {
    /// Missing entries imply quantity 0 — they are not auto-created.
    async fn read_projections_for(
        &self,
        so_numbers: &HashSet<String>,
    ) -> Result<Vec<UserProjection>, ServiceError>;

    async fn upsert_projection(
        &self,
        so_number: &str,
        part_number: &str,
        risk_type: RiskType,
        quantity: Decimal,
        actor: &str,
    ) -> Result<UserProjection, ServiceError>;
}

/// SeaORM-backed projection store. Writes serialize on the natural key via
/// a sharded in-process lock (one `Mutex<()>` per `(so_number, part_number,
/// risk_type)`, following the sharded-lock idiom also used by the MRP run
/// cache's single-flight guard) — readers never block on it.
pub struct SeaOrmProjectionStore {
    db: Arc<DbPool>,
    write_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl SeaOrmProjectionStore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self {
            db,
            write_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, key: &str) -> Arc<Mutex<()>> {
        self.write_locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

fn natural_key(so_number: &str, part_number: &str, risk_type: RiskType) -> String {
    format!("{so_number}\u{1f}{part_number}\u{1f}{risk_type}")
}

#[async_trait]
impl ProjectionStore for SeaOrmProjectionStore {
    #[instrument(skip(self))]
    async fn read_projections_for(
        &self,
        so_numbers: &HashSet<String>,
    ) -> Result<Vec<UserProjection>, ServiceError> {
        if so_numbers.is_empty() {
            return Ok(Vec::new());
        }
        let so_list: Vec<String> = so_numbers.iter().cloned().collect();

        let rows = user_projection::Entity::find()
            .filter(user_projection::Column::SoNumber.is_in(so_list))
            .all(self.db.as_ref())
            .await
            .map_err(ServiceError::from_store_db_err)?;

        rows.into_iter()
            .map(|r| {
                let risk_type: RiskType = r.risk_type.parse().map_err(|_| {
                    ServiceError::DataIntegrityError(format!(
                        "unknown risk_type '{}' stored for {}/{}",
                        r.risk_type, r.so_number, r.part_number
                    ))
                })?;
                Ok(UserProjection {
                    so_number: r.so_number,
                    part_number: r.part_number,
                    risk_type,
                    quantity: r.quantity,
                    updated_at: r.updated_at,
                    updated_by: r.updated_by,
                })
            })
            .collect()
    }

    #[instrument(skip(self))]
    async fn upsert_projection(
        &self,
        so_number: &str,
        part_number: &str,
        risk_type: RiskType,
        quantity: Decimal,
        actor: &str,
    ) -> Result<UserProjection, ServiceError> {
        if quantity < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "quantity must be non-negative".to_string(),
            ));
        }

        let key = natural_key(so_number, part_number, risk_type);
        let lock = self.lock_for(&key);
        let _guard = lock.lock().await;

        let risk_type_str = risk_type.to_string();
        let existing = user_projection::Entity::find()
            .filter(user_projection::Column::SoNumber.eq(so_number))
            .filter(user_projection::Column::PartNumber.eq(part_number))
            .filter(user_projection::Column::RiskType.eq(risk_type_str.clone()))
            .one(self.db.as_ref())
            .await
            .map_err(ServiceError::from_store_db_err)?;

        let saved = match existing {
            Some(model) => {
                let mut active: user_projection::ActiveModel = model.into();
                active.quantity = Set(quantity);
                active.updated_by = Set(actor.to_string());
                active
                    .update(self.db.as_ref())
                    .await
                    .map_err(ServiceError::from_store_db_err)?
            }
            None => {
                let active = user_projection::ActiveModel {
                    id: Set(uuid::Uuid::new_v4()),
                    so_number: Set(so_number.to_string()),
                    part_number: Set(part_number.to_string()),
                    risk_type: Set(risk_type_str),
                    quantity: Set(quantity),
                    updated_at: Set(Utc::now()),
                    updated_by: Set(actor.to_string()),
                };
                active
                    .insert(self.db.as_ref())
                    .await
                    .map_err(ServiceError::from_store_db_err)?
            }
        };

        info!(
            so_number,
            part_number,
            risk_type = %risk_type,
            %quantity,
            "projection upserted"
        );

        Ok(UserProjection {
            so_number: saved.so_number,
            part_number: saved.part_number,
            risk_type,
            quantity: saved.quantity,
            updated_at: saved.updated_at,
            updated_by: saved.updated_by,
        })
    }
}
