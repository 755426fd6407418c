// src/model/database.rs
//! The database view: a container whose children are pages sharing a
//! property schema, reached through a cursor-driven query protocol.

use super::cell::CacheCell;
use super::common::property_id_map;
use super::page::Page;
use crate::api::{ApiHandle, PaginatedList};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::Error;
use crate::types::{DatabaseId, PageId, PropertyId, RichText};
use indexmap::IndexMap;
use serde_json::Value;

/// A database handle: lazily fetched schema state, a paginated query
/// protocol, and page creation.
#[derive(Debug, Clone)]
pub struct Database {
    handle: ApiHandle,
    id: DatabaseId,
    raw: CacheCell<Value>,
    properties: CacheCell<IndexMap<String, PropertyId>>,
    children: CacheCell<Vec<Page>>,
}

impl Database {
    pub(crate) fn new(handle: ApiHandle, id: DatabaseId) -> Self {
        Self {
            handle,
            id,
            raw: CacheCell::Unfetched,
            properties: CacheCell::Unfetched,
            children: CacheCell::Unfetched,
        }
    }

    pub fn id(&self) -> &DatabaseId {
        &self.id
    }

    /// The raw database representation, fetched on first access.
    pub async fn raw(&mut self) -> Result<&Value, Error> {
        let Self { handle, id, raw, .. } = self;
        raw.get_or_fetch(|| async move { handle.api().retrieve_database(id).await })
            .await
            .map(|value| &*value)
    }

    /// The database title, flattened from its rich text spans.
    pub async fn title(&mut self) -> Result<String, Error> {
        let raw = self.raw().await?;
        let spans = raw.get("title").cloned().unwrap_or(Value::Null);
        Ok(RichText::from_wire(&spans)?.plain_text())
    }

    /// The property-name → property-id mapping, derived once from the raw
    /// representation (same lifecycle as [`Page::properties`]).
    pub async fn properties(&mut self) -> Result<&IndexMap<String, PropertyId>, Error> {
        let Self {
            handle,
            id,
            raw,
            properties,
            ..
        } = self;
        properties
            .get_or_fetch(|| async move {
                let representation = raw
                    .get_or_fetch(|| async move { handle.api().retrieve_database(id).await })
                    .await?;
                property_id_map(representation)
            })
            .await
            .map(|map| &*map)
    }

    /// Fetches a single page of query results.
    ///
    /// Sends the filter, the cursor, and the fixed page size under the
    /// rate-limit retry policy. The returned list carries the has-more
    /// flag and the cursor for the next page.
    pub async fn query(
        &self,
        filter: Option<&Value>,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList, Error> {
        query_page(&self.handle, &self.id, filter, start_cursor).await
    }

    /// Accumulates every query result, following cursors until the
    /// server reports no more pages. Result order is preserved across
    /// page boundaries.
    pub async fn query_all(&self, filter: Option<&Value>) -> Result<Vec<Value>, Error> {
        query_all_pages(&self.handle, &self.id, filter).await
    }

    /// The database's pages, fetched with `query_all` on first access and
    /// cached. Each row is wrapped as a [`Page`] with its representation
    /// pre-filled.
    pub async fn children(&mut self, filter: Option<&Value>) -> Result<&mut Vec<Page>, Error> {
        let Self {
            handle,
            id,
            children,
            ..
        } = self;
        children
            .get_or_fetch(|| async move {
                let rows = query_all_pages(handle, id, filter).await?;
                rows.into_iter()
                    .map(|row| page_from_row(handle.clone(), row))
                    .collect()
            })
            .await
    }

    /// Creates a new page parented to this database with the given
    /// property payload map.
    pub async fn add_page(&self, properties: Value) -> Result<Page, Error> {
        let created = self.handle.api().create_page(&self.id, properties).await?;
        page_from_row(self.handle.clone(), created)
    }

    /// Discards the cached representation and child list. The
    /// property-name mapping is kept; build a fresh handle to re-derive
    /// it.
    pub fn invalidate(&mut self) {
        self.raw.invalidate();
        self.children.invalidate();
    }
}

/// Wraps one query row (a raw page representation) as a page handle.
fn page_from_row(handle: ApiHandle, row: Value) -> Result<Page, Error> {
    let id = row
        .get("id")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::MalformedResponse("page representation has no 'id'".to_string()))?;
    let id = PageId::parse(id)?;
    Ok(Page::with_raw(handle, id, row))
}

/// One page of query results under the retry policy.
async fn query_page(
    handle: &ApiHandle,
    database: &DatabaseId,
    filter: Option<&Value>,
    start_cursor: Option<&str>,
) -> Result<PaginatedList, Error> {
    handle
        .retry()
        .run(|| async move {
            handle
                .api()
                .query_database(database, filter, start_cursor, NOTION_API_PAGE_SIZE)
                .await
        })
        .await
}

/// Drives `query_page` until the server reports no more results.
async fn query_all_pages(
    handle: &ApiHandle,
    database: &DatabaseId,
    filter: Option<&Value>,
) -> Result<Vec<Value>, Error> {
    let mut results = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = query_page(handle, database, filter, cursor.as_deref()).await?;
        results.extend(page.results);
        log::debug!("query_all: {} results accumulated", results.len());

        if !page.has_more {
            break;
        }
        cursor = page.next_cursor;
        if cursor.is_none() {
            break;
        }
    }

    Ok(results)
}
