// src/api/mod.rs
//! Notion API interaction — the calls this crate issues against the
//! remote workspace service.
//!
//! Object handles depend on the [`NotionApi`] trait, never on HTTP
//! details. The request/response shapes are the external service's wire
//! contract; raw representations travel as [`serde_json::Value`].

pub mod client;
mod types;

use crate::error::Error;
use crate::retry::RetryPolicy;
use crate::types::{BlockId, DatabaseId, PageId, PropertyId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

pub use client::NotionHttpClient;
pub use types::{NotionApiErrorResponse, PaginatedList};

/// The operations this crate issues against the workspace service.
///
/// This is the fundamental algebra for API interaction. Implementations
/// own transport, auth, and (de)serialization; callers own navigation
/// and caching.
#[async_trait::async_trait]
pub trait NotionApi: Send + Sync {
    async fn retrieve_block(&self, id: &BlockId) -> Result<Value, Error>;

    /// Lists a block's direct children. A single page of results; callers
    /// that need more re-issue with their own cursor handling.
    async fn list_children(&self, parent: &BlockId) -> Result<PaginatedList, Error>;

    /// Appends children to a block. The response carries the server's
    /// authoritative view of the nodes created by this call.
    async fn append_children(&self, parent: &BlockId, body: Value) -> Result<PaginatedList, Error>;

    async fn update_block(&self, id: &BlockId, body: Value) -> Result<Value, Error>;

    async fn retrieve_page(&self, id: &PageId) -> Result<Value, Error>;

    async fn update_page(&self, id: &PageId, body: Value) -> Result<Value, Error>;

    async fn retrieve_page_property(
        &self,
        page: &PageId,
        property: &PropertyId,
    ) -> Result<Value, Error>;

    async fn retrieve_database(&self, id: &DatabaseId) -> Result<Value, Error>;

    async fn query_database(
        &self,
        database: &DatabaseId,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
        page_size: u32,
    ) -> Result<PaginatedList, Error>;

    async fn create_page(&self, parent: &DatabaseId, properties: Value) -> Result<Value, Error>;
}

/// Shared transport state handed to every object handle.
///
/// Cloning is cheap; all handles spawned while navigating a tree share
/// the same underlying [`NotionApi`] and retry policy.
#[derive(Clone)]
pub struct ApiHandle {
    api: Arc<dyn NotionApi>,
    retry: RetryPolicy,
}

impl ApiHandle {
    pub fn new(api: Arc<dyn NotionApi>, retry: RetryPolicy) -> Self {
        Self { api, retry }
    }

    pub fn api(&self) -> &dyn NotionApi {
        self.api.as_ref()
    }

    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }
}

impl fmt::Debug for ApiHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiHandle")
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}
