//! Counters for MRP runs, cache behavior, and per-status SO counts.

use lazy_static::lazy_static;
use prometheus::{IntCounter, IntCounterVec};

lazy_static! {
    pub static ref MRP_RUNS_TOTAL: IntCounter = IntCounter::new(
        "mrp_runs_total",
        "Total number of MRP allocation runs executed"
    )
    .expect("metric can be created");
    pub static ref MRP_CACHE_HITS_TOTAL: IntCounter = IntCounter::new(
        "mrp_cache_hits_total",
        "Total number of MRP requests served from the cached run"
    )
    .expect("metric can be created");
    pub static ref MRP_CACHE_MISSES_TOTAL: IntCounter = IntCounter::new(
        "mrp_cache_misses_total",
        "Total number of MRP requests that triggered a fresh run"
    )
    .expect("metric can be created");
    pub static ref MRP_CACHE_SINGLE_FLIGHT_WAITS_TOTAL: IntCounter = IntCounter::new(
        "mrp_cache_single_flight_waits_total",
        "Total number of requests that waited on an in-flight run instead of starting one"
    )
    .expect("metric can be created");
    pub static ref MRP_SO_STATUS_TOTAL: IntCounterVec = IntCounterVec::new(
        prometheus::Opts::new(
            "mrp_so_status_total",
            "Per-run count of sales orders by disposition status"
        ),
        &["status"]
    )
    .expect("metric can be created");
}

/// Registers every metric declared above with the default prometheus
/// registry. Safe to call more than once across tests; a second
/// registration attempt is ignored (`AlreadyReg` is not an error here).
pub fn register_all() {
    let _ = prometheus::register(Box::new(MRP_RUNS_TOTAL.clone()));
    let _ = prometheus::register(Box::new(MRP_CACHE_HITS_TOTAL.clone()));
    let _ = prometheus::register(Box::new(MRP_CACHE_MISSES_TOTAL.clone()));
    let _ = prometheus::register(Box::new(MRP_CACHE_SINGLE_FLIGHT_WAITS_TOTAL.clone()));
    let _ = prometheus::register(Box::new(MRP_SO_STATUS_TOTAL.clone()));
}

/// Records one run's per-status SO counts (`DashboardSummary` buckets,
/// reused here as metric labels).
pub fn record_so_statuses(results: &[crate::models::SoResult]) {
    for result in results {
        MRP_SO_STATUS_TOTAL
            .with_label_values(&[result.status.to_string().as_str()])
            .inc();
    }
}
