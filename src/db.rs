use crate::config::AppConfig;
use crate::entities::{bom_line, inventory_balance, open_job, purchase_order_line, sales_order_line, user_projection};
use crate::errors::ServiceError;
use sea_orm::sea_query::{Index, TableCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, Schema};
use std::time::Duration;
use tracing::{debug, info, warn};

pub type DbPool = DatabaseConnection;

/// Establishes the connection pool: tuned pool sizing from `AppConfig`,
/// then an idempotent schema bootstrap for the tables this crate owns.
pub async fn establish_connection(config: &AppConfig) -> Result<DbPool, ServiceError> {
    let mut opt = ConnectOptions::new(config.database_url.clone());
    opt.max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .connect_timeout(Duration::from_secs(config.db_connect_timeout_secs))
        .sqlx_logging(true);

    info!(
        max_connections = config.db_max_connections,
        "connecting to database"
    );

    let pool = Database::connect(opt)
        .await
        .map_err(ServiceError::from_gateway_db_err)?;

    ensure_core_tables(&pool).await?;

    info!("database connection pool established");
    Ok(pool)
}

/// Lightweight liveness probe for the readiness/health endpoints.
pub async fn check_connection(pool: &DbPool) -> Result<(), ServiceError> {
    pool.ping().await.map_err(ServiceError::from_gateway_db_err)
}

async fn ensure_core_tables(pool: &DbPool) -> Result<(), ServiceError> {
    let backend = pool.get_database_backend();
    debug!(?backend, "ensuring core tables via entity schema");

    let schema = Schema::new(backend);
    let tables: Vec<(&'static str, TableCreateStatement)> = vec![
        (
            "sales_order_lines",
            schema.create_table_from_entity(sales_order_line::Entity),
        ),
        (
            "inventory_balances",
            schema.create_table_from_entity(inventory_balance::Entity),
        ),
        (
            "purchase_order_lines",
            schema.create_table_from_entity(purchase_order_line::Entity),
        ),
        ("open_jobs", schema.create_table_from_entity(open_job::Entity)),
        ("bom_lines", schema.create_table_from_entity(bom_line::Entity)),
        (
            "user_projections",
            schema.create_table_from_entity(user_projection::Entity),
        ),
    ];

    for (name, mut table) in tables {
        table.if_not_exists();
        let statement = backend.build(&table);
        if let Err(err) = pool.execute(statement).await {
            warn!(table = name, %err, "failed to ensure existence of table");
            return Err(ServiceError::from_gateway_db_err(err));
        }
    }

    // `user_projections`' natural key (so_number, part_number, risk_type)
    // is unique at the database level, not just via the in-process write
    // lock in `SeaOrmProjectionStore`.
    let unique_index = Index::create()
        .name("idx_user_projections_natural_key")
        .table(user_projection::Entity)
        .col(user_projection::Column::SoNumber)
        .col(user_projection::Column::PartNumber)
        .col(user_projection::Column::RiskType)
        .unique()
        .if_not_exists()
        .to_owned();
    let statement = backend.build(&unique_index);
    if let Err(err) = pool.execute(statement).await {
        warn!(%err, "failed to ensure unique index on user_projections");
        return Err(ServiceError::from_gateway_db_err(err));
    }

    Ok(())
}
