// src/model/common.rs
//! State shared by every block view: the transport handle, the block id,
//! and the lazy caches for the raw representation and the child list.

use super::block::{AnyBlock, BlockType};
use super::cell::CacheCell;
use crate::api::ApiHandle;
use crate::error::Error;
use crate::types::{BlockId, PropertyId};
use indexmap::IndexMap;
use serde_json::{json, Value};

/// The common core of every block view.
///
/// Caches are private to this instance; two handles for the same id do
/// not observe each other's fetches.
#[derive(Debug, Clone)]
pub struct BlockCore {
    pub(crate) handle: ApiHandle,
    pub(crate) id: BlockId,
    pub(crate) raw: CacheCell<Value>,
    pub(crate) children: CacheCell<Vec<AnyBlock>>,
}

impl BlockCore {
    pub(crate) fn new(handle: ApiHandle, id: BlockId) -> Self {
        Self {
            handle,
            id,
            raw: CacheCell::Unfetched,
            children: CacheCell::Unfetched,
        }
    }

    pub(crate) fn with_raw(handle: ApiHandle, id: BlockId, raw: Value) -> Self {
        Self {
            handle,
            id,
            raw: CacheCell::Fetched(raw),
            children: CacheCell::Unfetched,
        }
    }

    /// The raw block representation, fetched on first access.
    pub(crate) async fn raw(&mut self) -> Result<&Value, Error> {
        let Self { handle, id, raw, .. } = self;
        raw.get_or_fetch(|| async move { handle.api().retrieve_block(id).await })
            .await
            .map(|value| &*value)
    }

    /// The block's type tag, fetching the representation first if absent.
    pub(crate) async fn block_type(&mut self) -> Result<BlockType, Error> {
        let raw = self.raw().await?;
        let tag = raw
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::MalformedResponse("block representation has no 'type' tag".to_string())
            })?;
        Ok(BlockType::from_tag(tag))
    }

    /// The ordered child list, fetched with a single listing call on
    /// first access. Children share this block's transport handle.
    pub(crate) async fn children(&mut self) -> Result<&mut Vec<AnyBlock>, Error> {
        let Self {
            handle,
            id,
            children,
            ..
        } = self;
        children
            .get_or_fetch(|| async move {
                let listing = handle.api().list_children(id).await?;
                listing
                    .results
                    .into_iter()
                    .map(|raw| AnyBlock::from_raw(handle.clone(), raw))
                    .collect()
            })
            .await
    }

    /// Appends one child built from a template payload.
    ///
    /// The cached child list is replaced with exactly the set of nodes the
    /// server returned for this call — the last write defines the cache,
    /// it is not merged with previous contents.
    pub(crate) async fn append_child(
        &mut self,
        template: Value,
    ) -> Result<&mut Vec<AnyBlock>, Error> {
        let body = json!({ "children": [template] });
        let appended = self.handle.api().append_children(&self.id, body).await?;
        let children = appended
            .results
            .into_iter()
            .map(|raw| AnyBlock::from_raw(self.handle.clone(), raw))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.children.fill(children))
    }

    /// Archives the block remotely and replaces the cached representation
    /// with the server's response.
    pub(crate) async fn archive(&mut self) -> Result<&Value, Error> {
        let updated = self
            .handle
            .api()
            .update_block(&self.id, json!({ "archived": true }))
            .await?;
        Ok(&*self.raw.fill(updated))
    }

    /// Discards the cached representation and child list.
    pub(crate) fn invalidate(&mut self) {
        self.raw.invalidate();
        self.children.invalidate();
    }
}

/// Derives the property-name → property-id table from a raw page or
/// database representation, preserving the server's property order.
pub(crate) fn property_id_map(raw: &Value) -> Result<IndexMap<String, PropertyId>, Error> {
    let properties = raw
        .get("properties")
        .and_then(Value::as_object)
        .ok_or_else(|| {
            Error::MalformedResponse("representation has no 'properties' table".to_string())
        })?;

    let mut map = IndexMap::with_capacity(properties.len());
    for (name, property) in properties {
        let id = property.get("id").and_then(Value::as_str).ok_or_else(|| {
            Error::MalformedResponse(format!("property '{}' has no id", name))
        })?;
        map.insert(name.clone(), PropertyId::new(id));
    }
    Ok(map)
}

/// Builds `{ "<tag>": inner }` — the update-payload shape where the key
/// is the block's own type tag.
pub(crate) fn tagged_body(tag: &str, inner: Value) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(tag.to_string(), inner);
    Value::Object(body)
}
