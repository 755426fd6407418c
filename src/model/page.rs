// src/model/page.rs
//! The page view: a document with both tree-child behavior and a
//! structured property table.

use super::block::AnyBlock;
use super::blocks::PageBlock;
use super::cell::CacheCell;
use super::common::{property_id_map, BlockCore};
use super::property_value::{PropertyValue, TitleValue};
use crate::api::ApiHandle;
use crate::error::Error;
use crate::types::{Annotations, PageId, PropertyId};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// A page handle: lazily fetched page state plus the block view of the
/// same id.
///
/// A `Page` and a [`PageBlock`] can refer to the same underlying id while
/// exposing different capability sets; the block-side caches here are
/// independent of any other handle's.
#[derive(Debug, Clone)]
pub struct Page {
    handle: ApiHandle,
    id: PageId,
    raw: CacheCell<Value>,
    properties: CacheCell<IndexMap<String, PropertyId>>,
    block: BlockCore,
}

impl Page {
    pub(crate) fn new(handle: ApiHandle, id: PageId) -> Self {
        let block = BlockCore::new(handle.clone(), id.cast());
        Self {
            handle,
            id,
            raw: CacheCell::Unfetched,
            properties: CacheCell::Unfetched,
            block,
        }
    }

    /// Builds a page whose representation is already known — rows
    /// returned by a database query, or a freshly created page.
    pub(crate) fn with_raw(handle: ApiHandle, id: PageId, raw: Value) -> Self {
        let block = BlockCore::new(handle.clone(), id.cast());
        Self {
            handle,
            id,
            raw: CacheCell::Fetched(raw),
            properties: CacheCell::Unfetched,
            block,
        }
    }

    pub fn id(&self) -> &PageId {
        &self.id
    }

    /// The raw page representation, fetched on first access.
    pub async fn raw(&mut self) -> Result<&Value, Error> {
        let Self { handle, id, raw, .. } = self;
        raw.get_or_fetch(|| async move { handle.api().retrieve_page(id).await })
            .await
            .map(|value| &*value)
    }

    /// The property-name → property-id mapping.
    ///
    /// Derived once from the raw page representation. Later updates do
    /// not re-derive it, so a property renamed after first access keeps
    /// its old name here until a fresh handle is built.
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
                    .get_or_fetch(|| async move { handle.api().retrieve_page(id).await })
                    .await?;
                property_id_map(representation)
            })
            .await
            .map(|map| &*map)
    }

    /// Retrieves one property value by name, resolved to its typed
    /// variant.
    ///
    /// Unknown names fail locally with `InvalidArgument`; the remote call
    /// runs under the rate-limit retry policy.
    pub async fn retrieve_property(&mut self, name: &str) -> Result<PropertyValue, Error> {
        let property_id = {
            let properties = self.properties().await?;
            match properties.get(name) {
                Some(id) => id.clone(),
                None => {
                    let available = properties
                        .keys()
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(Error::InvalidArgument(format!(
                        "property '{}' not found, available names are: {}",
                        name, available
                    )));
                }
            }
        };

        let retry = self.handle.retry().clone();
        let handle = &self.handle;
        let id = &self.id;
        let raw = retry
            .run(|| {
                let property_id = property_id.clone();
                async move { handle.api().retrieve_page_property(id, &property_id).await }
            })
            .await?;
        Ok(PropertyValue::from_raw(raw))
    }

    /// Replaces the page title, refreshing the cached page state from the
    /// response.
    pub async fn set_title(&mut self, text: &str, annotations: Annotations) -> Result<(), Error> {
        let body = json!({
            "properties": { "title": TitleValue::template(text, annotations) },
        });
        self.update(body).await
    }

    /// Sets one property to a payload built by a property template.
    pub async fn set_property(&mut self, name: &str, payload: Value) -> Result<(), Error> {
        let body = json!({
            "properties": { name: payload },
        });
        self.update(body).await
    }

    /// Archives the page remotely.
    pub async fn archive(&mut self) -> Result<(), Error> {
        self.update(json!({ "archived": true })).await
    }

    async fn update(&mut self, body: Value) -> Result<(), Error> {
        let updated = self.handle.api().update_page(&self.id, body).await?;
        self.raw.fill(updated);
        Ok(())
    }

    /// Projects this page to its tree-node view over the same id.
    pub fn as_block(&self) -> PageBlock {
        PageBlock::from_core(BlockCore::new(self.handle.clone(), self.id.cast()))
    }

    /// The page's block children, fetched through the block view.
    pub async fn children(&mut self) -> Result<&mut Vec<AnyBlock>, Error> {
        self.block.children().await
    }

    /// Appends one child block to the page body.
    pub async fn append_child(&mut self, template: Value) -> Result<&mut Vec<AnyBlock>, Error> {
        self.block.append_child(template).await
    }

    /// Discards the cached page state and child list. The property-name
    /// mapping is kept; build a fresh handle to re-derive it.
    pub fn invalidate(&mut self) {
        self.raw.invalidate();
        self.block.invalidate();
    }
}
