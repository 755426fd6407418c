// src/model/cell.rs
//! Lazy-fill cache cells backing every object handle.
//!
//! Each remote-derived piece of state (raw representation, child list,
//! property table) lives in its own [`CacheCell`]. The cell is explicit
//! about its lifecycle: `Unfetched` until first read, `Fetched` while the
//! cached value is authoritative, `Stale` after an invalidation. A
//! successful mutation transitions straight to `Fetched` with the
//! server's response, never through `Stale`.

use crate::error::Error;
use std::future::Future;

/// Three-state cell for lazily fetched, eagerly replaced remote state.
#[derive(Debug, Clone, Default)]
pub enum CacheCell<T> {
    /// Nothing fetched yet; the next read issues the fetch.
    #[default]
    Unfetched,
    /// The cached value is the latest state observed from the server.
    Fetched(T),
    /// A previous value was discarded; the next read re-fetches.
    Stale,
}

impl<T> CacheCell<T> {
    /// Whether a cached value is present and authoritative.
    pub fn is_fresh(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    /// The cached value, if fresh.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Fetched(value) => Some(value),
            _ => None,
        }
    }

    /// Replaces the cell content wholesale, transitioning to `Fetched`.
    pub fn fill(&mut self, value: T) -> &mut T {
        *self = Self::Fetched(value);
        match self {
            Self::Fetched(value) => value,
            _ => unreachable!("cell was just filled"),
        }
    }

    /// Discards any cached value; the next read re-fetches.
    pub fn invalidate(&mut self) {
        if self.is_fresh() {
            *self = Self::Stale;
        }
    }

    /// Returns the cached value, running `fetch` first when the cell does
    /// not hold a fresh one.
    pub async fn get_or_fetch<F, Fut>(&mut self, fetch: F) -> Result<&mut T, Error>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
    {
        if !self.is_fresh() {
            let value = fetch().await?;
            *self = Self::Fetched(value);
        }
        match self {
            Self::Fetched(value) => Ok(value),
            _ => unreachable!("cell was just filled"),
        }
    }
}
