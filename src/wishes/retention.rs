//! Background eviction task for aged-out wishes.
//!
//! Spawns a tokio task that periodically drops wishes older than the
//! configured retention window. Decoupled from the submission path so
//! cleanup cost never lands on request latency.

use chrono::{Duration as ChronoDuration, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::wishes::store::WishStore;

/// Spawn a background task that evicts wishes older than `retention_secs`
/// every `interval_secs` seconds. Eviction failures are logged, never
/// propagated.
pub fn spawn_eviction_task(store: Arc<WishStore>, retention_secs: u64, interval_secs: u64) {
    let interval = Duration::from_secs(interval_secs);
    let retention = ChronoDuration::seconds(retention_secs as i64);

    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;

            let cutoff = Utc::now() - retention;
            match store.evict_older_than(cutoff) {
                Ok(count) => {
                    if count > 0 {
                        tracing::info!("Wish eviction: dropped {} aged-out wishes", count);
                    } else {
                        tracing::debug!("Wish eviction: nothing past retention");
                    }
                }
                Err(e) => {
                    tracing::error!("Wish eviction failed: {}", e);
                }
            }
        }
    });
}
