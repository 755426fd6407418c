// src/client.rs
//! The entry-point facade: resolves opaque identifiers into typed object
//! handles.

use crate::api::{ApiHandle, NotionApi, NotionHttpClient};
use crate::config::NotionConfig;
use crate::error::Error;
use crate::model::{AnyBlock, Database, Page};
use crate::retry::RetryPolicy;
use crate::types::{BlockId, DatabaseId, PageId};
use std::sync::Arc;

/// The client facade.
///
/// Page and database handles are resolved structurally — the caller names
/// the kind by choosing the accessor, and nothing is fetched until first
/// read. Bare blocks carry no structural hint, so [`NotionClient::block`]
/// retrieves the representation up front to pick the typed view.
///
/// ```no_run
/// # async fn demo() -> Result<(), notion_objects::Error> {
/// use notion_objects::NotionClient;
///
/// let notion = NotionClient::from_env()?;
/// let mut database = notion.database("059a1599344841d09153c461ff8677fe")?;
/// for page in database.children(None).await? {
///     let title = page.retrieve_property("Name").await?;
///     println!("{:?}", title);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct NotionClient {
    handle: ApiHandle,
}

impl NotionClient {
    /// Builds a client over the public HTTP API.
    pub fn new(config: NotionConfig) -> Result<Self, Error> {
        let http = NotionHttpClient::with_base_url(&config.api_key, &config.base_url)?;
        Ok(Self {
            handle: ApiHandle::new(Arc::new(http), config.retry),
        })
    }

    /// Builds a client from the `NOTION_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(NotionConfig::from_env()?)
    }

    /// Builds a client over any [`NotionApi`] implementation — stubs in
    /// tests, alternate transports in production.
    pub fn with_api(api: Arc<dyn NotionApi>, retry: RetryPolicy) -> Self {
        Self {
            handle: ApiHandle::new(api, retry),
        }
    }

    /// A page handle for the given id, URL, or dashed UUID. Nothing is
    /// fetched until first read.
    pub fn page(&self, id: &str) -> Result<Page, Error> {
        let id = PageId::parse(id)?;
        Ok(Page::new(self.handle.clone(), id))
    }

    /// A database handle for the given id, URL, or dashed UUID. Nothing
    /// is fetched until first read.
    pub fn database(&self, id: &str) -> Result<Database, Error> {
        let id = DatabaseId::parse(id)?;
        Ok(Database::new(self.handle.clone(), id))
    }

    /// Retrieves a block and resolves it to its typed view.
    pub async fn block(&self, id: &str) -> Result<AnyBlock, Error> {
        let id = BlockId::parse(id)?;
        let raw = self.handle.api().retrieve_block(&id).await?;
        AnyBlock::from_raw(self.handle.clone(), raw)
    }
}
