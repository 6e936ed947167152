//! Process-wide MRP run cache: a `CACHE_TTL` freshness window
//! plus a single-flight guard so that concurrent stale-cache requests
//! await one in-flight run instead of each triggering one. Generalizes
//! `cache::InMemoryCache`'s TTL idiom from a key-value store to a single
//! computed-value cache with a stampede guard.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, Notify};
use tracing::{debug, instrument};

use crate::engine::{AllocationEngine, MrpRunOutput};
use crate::errors::ServiceError;

struct CacheState {
    snapshot: Option<Arc<MrpRunOutput>>,
    computed_at: Option<Instant>,
    in_flight: Option<Arc<Notify>>,
}

/// Holds the most recently computed full result set. `get_or_run` is the
/// only entry point: it returns the cached snapshot if it's within
/// `CACHE_TTL`, otherwise drives (or awaits) exactly one fresh run.
pub struct MrpCache {
    ttl: Duration,
    state: Mutex<CacheState>,
}

impl MrpCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            state: Mutex::new(CacheState {
                snapshot: None,
                computed_at: None,
                in_flight: None,
            }),
        }
    }

    #[instrument(skip(self, engine))]
    pub async fn get_or_run(&self, engine: &AllocationEngine) -> Result<Arc<MrpRunOutput>, ServiceError> {
        loop {
            let mut guard = self.state.lock().await;

            if let (Some(snapshot), Some(computed_at)) = (&guard.snapshot, guard.computed_at) {
                if computed_at.elapsed() < self.ttl {
                    debug!("serving MRP run from cache");
                    crate::metrics::MRP_CACHE_HITS_TOTAL.inc();
                    return Ok(snapshot.clone());
                }
            }

            if let Some(notify) = guard.in_flight.clone() {
                // Another request is already computing a fresh run; drop
                // the lock and wait for it instead of racing a second run.
                crate::metrics::MRP_CACHE_SINGLE_FLIGHT_WAITS_TOTAL.inc();
                drop(guard);
                notify.notified().await;
                continue;
            }

            crate::metrics::MRP_CACHE_MISSES_TOTAL.inc();

            let notify = Arc::new(Notify::new());
            guard.in_flight = Some(notify.clone());
            drop(guard);

            let run_result = engine.run_for_cache().await;

            let mut guard = self.state.lock().await;
            guard.in_flight = None;
            match run_result {
                Ok(output) => {
                    let snapshot = Arc::new(output);
                    guard.snapshot = Some(snapshot.clone());
                    guard.computed_at = Some(Instant::now());
                    drop(guard);
                    notify.notify_waiters();
                    return Ok(snapshot);
                }
                Err(err) => {
                    drop(guard);
                    notify.notify_waiters();
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ErpGateway;
    use crate::models::{BomLine, OpenJob, SalesOrderLine};
    use crate::projections::ProjectionStore;
    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingGateway {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ErpGateway for CountingGateway {
        async fn open_sales_orders(&self) -> Result<Vec<SalesOrderLine>, ServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }
        async fn inventory_approved(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
            Ok(HashMap::new())
        }
        async fn inventory_qc_pending(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
            Ok(HashMap::new())
        }
        async fn open_po_quantities(&self) -> Result<HashMap<String, Decimal>, ServiceError> {
            Ok(HashMap::new())
        }
        async fn open_jobs(&self) -> Result<Vec<OpenJob>, ServiceError> {
            Ok(Vec::new())
        }
        async fn bom_for(&self, _parts: &[String]) -> Result<Vec<BomLine>, ServiceError> {
            Ok(Vec::new())
        }
    }

    struct NullProjectionStore;

    #[async_trait]
    impl ProjectionStore for NullProjectionStore {
        async fn read_projections_for(
            &self,
            _so_numbers: &HashSet<String>,
        ) -> Result<Vec<crate::models::UserProjection>, ServiceError> {
            Ok(Vec::new())
        }
        async fn upsert_projection(
            &self,
            so_number: &str,
            part_number: &str,
            risk_type: crate::models::RiskType,
            quantity: Decimal,
            actor: &str,
        ) -> Result<crate::models::UserProjection, ServiceError> {
            Ok(crate::models::UserProjection {
                so_number: so_number.to_string(),
                part_number: part_number.to_string(),
                risk_type,
                quantity,
                updated_at: chrono::Utc::now(),
                updated_by: actor.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn repeated_calls_within_ttl_hit_the_cache_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = Arc::new(CountingGateway { calls: calls.clone() });
        let engine = AllocationEngine::new(gateway, Arc::new(NullProjectionStore), dec!(0.01), dec!(100));
        let cache = MrpCache::new(Duration::from_secs(60));

        cache.get_or_run(&engine).await.unwrap();
        cache.get_or_run(&engine).await.unwrap();
        cache.get_or_run(&engine).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_a_fresh_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = Arc::new(CountingGateway { calls: calls.clone() });
        let engine = AllocationEngine::new(gateway, Arc::new(NullProjectionStore), dec!(0.01), dec!(100));
        let cache = MrpCache::new(Duration::from_millis(1));

        cache.get_or_run(&engine).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        cache.get_or_run(&engine).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn concurrent_requests_single_flight_to_one_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let gateway = Arc::new(CountingGateway { calls: calls.clone() });
        let engine = Arc::new(AllocationEngine::new(
            gateway,
            Arc::new(NullProjectionStore),
            dec!(0.01),
            dec!(100),
        ));
        let cache = Arc::new(MrpCache::new(Duration::from_secs(60)));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let engine = engine.clone();
            handles.push(tokio::spawn(async move { cache.get_or_run(&engine).await.unwrap() }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
