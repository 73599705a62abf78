use std::future::Future;
use std::time::Duration;

use moka::future::Cache;
use stockcrew_models::MarketContext;

const SNAPSHOT_KEY: &str = "market_context";

/// In-memory snapshot cache backed by moka.
///
/// Concurrent runs within the TTL reuse one fetched market context instead
/// of hitting the quote API again.
pub struct SnapshotCache {
    inner: Cache<String, MarketContext>,
}

impl SnapshotCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().max_capacity(1).time_to_live(ttl).build(),
        }
    }

    pub async fn get(&self) -> Option<MarketContext> {
        self.inner.get(SNAPSHOT_KEY).await
    }

    /// Return the cached snapshot, or run `fetch` to produce one.
    ///
    /// Concurrent callers that miss share a single `fetch`. A `None` from
    /// `fetch` is not cached.
    pub async fn get_or_fetch<F>(&self, fetch: F) -> Option<MarketContext>
    where
        F: Future<Output = Option<MarketContext>>,
    {
        self.inner
            .optionally_get_with(SNAPSHOT_KEY.to_string(), fetch)
            .await
    }

    pub async fn insert(&self, snapshot: MarketContext) {
        self.inner.insert(SNAPSHOT_KEY.to_string(), snapshot).await;
    }

    pub async fn invalidate(&self) {
        self.inner.invalidate(SNAPSHOT_KEY).await;
    }
}
