//! HTTP Read Surface: stateless axum handlers trigering a run
//! (or reusing a cached one), applying filtering/sorting in memory on the
//! aggregator output, and serializing JSON.

pub mod common;
pub mod health;
pub mod mrp;
pub mod projections;

use std::sync::Arc;

use axum::Router;

use crate::cache::MrpCache;
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::engine::AllocationEngine;
use crate::projections::ProjectionStore as ProjectionStoreTrait;

/// Shared application state injected into every handler via
/// `State<Arc<AppState>>`: one struct per request-scoped dependency,
/// constructed once in `main.rs`.
pub struct AppState {
    pub engine: AllocationEngine,
    pub cache: MrpCache,
    pub projections: Arc<dyn ProjectionStoreTrait>,
    pub db: Arc<DbPool>,
    pub config: AppConfig,
}

/// Assembles the full `/mrp` + `/scheduling` + `/health` routes nested under
/// the main router in `main.rs`, mirroring `handlers::bom::router()` /
/// `handlers::purchase_orders::purchase_order_routes()`.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/mrp", mrp::router())
        .nest("/scheduling/api", projections::router())
        .merge(health::router())
}
