mod aggregator;
mod cache;
mod config;
mod db;
mod engine;
mod entities;
mod errors;
mod gateway;
mod handlers;
mod inventory_model;
mod metrics;
mod models;
mod projections;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::response::{IntoResponse, Response};
use axum::BoxError;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cache::MrpCache;
use crate::config::AppConfig;
use crate::engine::AllocationEngine;
use crate::errors::{ApiError, ServiceError};
use crate::gateway::SeaOrmErpGateway;
use crate::handlers::AppState;
use crate::projections::SeaOrmProjectionStore;

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG_ERROR: i32 = 1;
const EXIT_UPSTREAM_UNAVAILABLE: i32 = 2;
const EXIT_INVARIANT_VIOLATION: i32 = 3;

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() {
    std::process::exit(run().await);
}

async fn run() -> i32 {
    let config = match config::load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return EXIT_CONFIG_ERROR;
        }
    };

    init_tracing(&config);
    metrics::register_all();
    info!("mrp-portal starting");

    let db = match db::establish_connection(&config).await {
        Ok(db) => Arc::new(db),
        Err(err) => {
            error!(%err, "failed to connect to the database");
            return EXIT_UPSTREAM_UNAVAILABLE;
        }
    };

    match serve(config, db).await {
        Ok(()) => EXIT_SUCCESS,
        Err(ServiceError::InvariantViolation(msg)) => {
            error!(%msg, "invariant violation at startup");
            EXIT_INVARIANT_VIOLATION
        }
        Err(err) => {
            error!(%err, "fatal error");
            EXIT_UPSTREAM_UNAVAILABLE
        }
    }
}

/// Converts a timed-out request into the documented `Timeout` error
/// response rather than the generic 500 `HandleErrorLayer` would otherwise
/// produce.
async fn handle_timeout_error(_err: BoxError) -> Response {
    ApiError::from(ServiceError::Timeout).into_response()
}

async fn serve(config: AppConfig, db: Arc<db::DbPool>) -> Result<(), ServiceError> {
    let upstream_timeout = Duration::from_secs(config.upstream_call_timeout_secs);
    let request_deadline = Duration::from_secs(config.request_deadline_secs);
    let cache_ttl = Duration::from_secs(config.cache_ttl_secs);

    let gateway = Arc::new(SeaOrmErpGateway::new(db.clone(), upstream_timeout));
    let projections = Arc::new(SeaOrmProjectionStore::new(db.clone()));

    let engine = AllocationEngine::new(
        gateway,
        projections.clone(),
        config.qty_tolerance,
        config.scrap_cap,
    );
    let cache = MrpCache::new(cache_ttl);

    let cors = if config.cors_allow_any_origin {
        CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
    } else {
        match &config.cors_allowed_origins {
            Some(origins) => {
                let parsed: Vec<_> = origins
                    .split(',')
                    .filter_map(|o| o.trim().parse().ok())
                    .collect();
                CorsLayer::new().allow_origin(parsed).allow_methods(Any).allow_headers(Any)
            }
            None => CorsLayer::new(),
        }
    };

    let state = Arc::new(AppState {
        engine,
        cache,
        projections,
        db,
        config: config.clone(),
    });

    // `TimeoutLayer`'s `Error` is a `BoxError`, not `Infallible`, so
    // `Router::layer` can't accept it directly — `HandleErrorLayer` converts
    // an elapsed timeout into the `ServiceError::Timeout` response before it
    // reaches the router.
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(HandleErrorLayer::new(handle_timeout_error))
        .layer(TimeoutLayer::new(request_deadline));

    let app = handlers::router().layer(middleware).with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ServiceError::UpstreamUnavailable(format!("failed to bind {addr}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| ServiceError::UpstreamUnavailable(format!("server error: {e}")))?;

    Ok(())
}
