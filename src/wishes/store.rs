//! Rolling in-memory store for submitted wishes.
//!
//! Time-ordered, bounded two ways: a hard count cap enforced at insert,
//! and a retention window enforced by periodic eviction (see retention.rs).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::RwLock;

/// A single accepted wish. Immutable once stored; no explicit id,
/// duplicates allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wish {
    pub author: String,
    pub message: String,
    pub region: String,
    pub submitted_at: DateTime<Utc>,
}

/// The backing store could not be read or written (poisoned lock).
/// Mutating callers must fail fast on this rather than degrade silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreUnavailable;

impl std::fmt::Display for StoreUnavailable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "wish store unavailable")
    }
}

impl std::error::Error for StoreUnavailable {}

/// Bounded, time-ordered wish store.
///
/// Entries are kept in insertion order in a VecDeque; `submitted_at` is
/// non-decreasing front-to-back, so age-based eviction is a front-prefix
/// drop and "recent N" is a back-to-front walk.
pub struct WishStore {
    entries: RwLock<VecDeque<Wish>>,
    max_entries: usize,
}

impl WishStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(VecDeque::with_capacity(max_entries)),
            max_entries,
        }
    }

    /// Append a wish, dropping the oldest entries when the count cap is hit.
    /// Returns the wish as stored. The stored `submitted_at` is clamped so
    /// the queue stays non-decreasing even if two submissions race the clock.
    pub fn insert(&self, mut wish: Wish) -> Result<Wish, StoreUnavailable> {
        let mut entries = self.entries.write().map_err(|_| StoreUnavailable)?;
        if let Some(last) = entries.back() {
            if wish.submitted_at < last.submitted_at {
                wish.submitted_at = last.submitted_at;
            }
        }
        while entries.len() >= self.max_entries {
            if entries.pop_front().is_none() {
                break;
            }
        }
        entries.push_back(wish.clone());
        Ok(wish)
    }

    /// Most recent wishes, newest first, truncated to `limit`.
    /// Ties in timestamp resolve to last-inserted-first.
    pub fn recent(&self, limit: usize) -> Result<Vec<Wish>, StoreUnavailable> {
        let entries = self.entries.read().map_err(|_| StoreUnavailable)?;
        Ok(entries.iter().rev().take(limit).cloned().collect())
    }

    /// Drop every wish with `submitted_at < cutoff`. Idempotent.
    /// Returns how many entries were evicted.
    pub fn evict_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize, StoreUnavailable> {
        let mut entries = self.entries.write().map_err(|_| StoreUnavailable)?;
        let before = entries.len();
        while entries.front().is_some_and(|w| w.submitted_at < cutoff) {
            entries.pop_front();
        }
        Ok(before - entries.len())
    }

    pub fn len(&self) -> Result<usize, StoreUnavailable> {
        let entries = self.entries.read().map_err(|_| StoreUnavailable)?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreUnavailable> {
        Ok(self.len()? == 0)
    }
}
