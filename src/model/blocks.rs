// src/model/blocks.rs
//! Concrete block views: text-bearing blocks, file blocks, and the
//! page/database container blocks.

use super::block::{AnyBlock, Block, BlockType};
use super::cell::CacheCell;
use super::common::{tagged_body, BlockCore};
use super::database::Database;
use super::page::Page;
use crate::error::Error;
use crate::types::{Annotations, BlockId, RichText};
use serde_json::{json, Value};

/// Macro to reduce boilerplate in the per-view delegation methods.
macro_rules! impl_block_view {
    ($($view:ty),+ $(,)?) => {$(
        impl $view {
            /// The opaque id of this block.
            pub fn id(&self) -> &BlockId {
                &self.core.id
            }

            /// The type tag from the cached representation, fetching it
            /// first if absent.
            pub async fn block_type(&mut self) -> Result<BlockType, Error> {
                self.core.block_type().await
            }

            /// The raw representation, fetched by id on first access.
            pub async fn raw(&mut self) -> Result<&Value, Error> {
                self.core.raw().await
            }

            /// The cached ordered child list; the first access issues a
            /// single children-listing call.
            pub async fn children(&mut self) -> Result<&mut Vec<AnyBlock>, Error> {
                self.core.children().await
            }

            /// Appends one child from a template payload and replaces the
            /// cached child list with the server's returned set.
            pub async fn append_child(
                &mut self,
                template: Value,
            ) -> Result<&mut Vec<AnyBlock>, Error> {
                self.core.append_child(template).await
            }

            /// Archives this block remotely, refreshing the cached
            /// representation from the response.
            pub async fn archive(&mut self) -> Result<(), Error> {
                self.core.archive().await.map(|_| ())
            }

            /// Discards cached state so the next read re-fetches.
            pub fn invalidate(&mut self) {
                self.core.invalidate();
            }
        }
    )+};
}

impl_block_view!(Block, TextBlock, FileBlock, PageBlock, DatabaseBlock);

// ---------------------------------------------------------------------------
// TextBlock
// ---------------------------------------------------------------------------

/// A block whose body is a rich text sequence: paragraphs and headings.
#[derive(Debug, Clone)]
pub struct TextBlock {
    pub(crate) core: BlockCore,
    rich_text: CacheCell<RichText>,
}

impl TextBlock {
    pub(crate) fn from_core(core: BlockCore) -> Self {
        Self {
            core,
            rich_text: CacheCell::Unfetched,
        }
    }

    /// The block's rich text content, derived from the representation on
    /// first access and cached.
    pub async fn rich_text(&mut self) -> Result<&RichText, Error> {
        if !self.rich_text.is_fresh() {
            let tag = self.core.block_type().await?;
            let raw = self.core.raw().await?;
            let spans = raw
                .get(tag.as_str())
                .and_then(|body| body.get("rich_text"))
                .cloned()
                .unwrap_or(Value::Null);
            let parsed = RichText::from_wire(&spans)?;
            self.rich_text.fill(parsed);
        }
        self.rich_text.get().ok_or_else(|| {
            Error::MalformedResponse("rich text cache lost between fill and read".to_string())
        })
    }

    /// The flattened display text of the block.
    pub async fn plain_text(&mut self) -> Result<String, Error> {
        self.rich_text().await.map(RichText::plain_text)
    }

    /// Replaces the block's entire content with a single styled span.
    pub async fn set_plain_text(
        &mut self,
        text: &str,
        annotations: Annotations,
    ) -> Result<(), Error> {
        let mut replacement = RichText::new();
        replacement.set_plain_text(text, annotations);
        self.push_rich_text(replacement).await
    }

    /// Replaces the block's content with a pre-built span sequence.
    pub async fn set_rich_text(&mut self, rich_text: &RichText) -> Result<(), Error> {
        self.push_rich_text(rich_text.clone()).await
    }

    /// Appends spans to the cached sequence, then pushes the full result
    /// as an update. Every add is a whole overwrite on the remote side.
    pub async fn add_rich_text(&mut self, rich_text: &RichText) -> Result<(), Error> {
        let mut merged = self.rich_text().await?.clone();
        merged.add_rich_text(rich_text);
        self.push_rich_text(merged).await
    }

    /// Sends the full span sequence as the block's new content and
    /// refreshes both caches from the response.
    async fn push_rich_text(&mut self, rich_text: RichText) -> Result<(), Error> {
        let tag = self.core.block_type().await?;
        let body = tagged_body(tag.as_str(), json!({ "rich_text": rich_text.to_wire() }));
        let updated = self.core.handle.api().update_block(&self.core.id, body).await?;

        let spans = updated
            .get(tag.as_str())
            .and_then(|content| content.get("rich_text"))
            .cloned()
            .unwrap_or(Value::Null);
        self.rich_text.fill(RichText::from_wire(&spans)?);
        self.core.raw.fill(updated);
        Ok(())
    }

    /// Builds a creation payload for any text-bearing kind.
    pub fn template(
        kind: BlockType,
        text: &str,
        annotations: Annotations,
    ) -> Result<Value, Error> {
        if !kind.is_text_bearing() {
            return Err(Error::InvalidArgument(format!(
                "'{}' is not a text-bearing block kind",
                kind
            )));
        }
        let mut rich_text = RichText::new();
        rich_text.set_plain_text(text, annotations);
        let mut payload = tagged_body(
            kind.as_str(),
            json!({ "rich_text": rich_text.to_wire() }),
        );
        payload["object"] = json!("block");
        payload["type"] = json!(kind.as_str());
        Ok(payload)
    }

    /// Creation payload for the default text-bearing kind.
    pub fn paragraph(text: &str, annotations: Annotations) -> Value {
        let mut rich_text = RichText::new();
        rich_text.set_plain_text(text, annotations);
        json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": rich_text.to_wire() },
        })
    }
}

// ---------------------------------------------------------------------------
// FileBlock
// ---------------------------------------------------------------------------

/// A block referencing an externally hosted file.
///
/// Only external files are modeled; Notion-hosted uploads are reachable
/// through the raw representation.
#[derive(Debug, Clone)]
pub struct FileBlock {
    pub(crate) core: BlockCore,
}

impl FileBlock {
    pub(crate) fn from_core(core: BlockCore) -> Self {
        Self { core }
    }

    /// The external URL of the file.
    pub async fn file_url(&mut self) -> Result<String, Error> {
        let raw = self.core.raw().await?;
        raw.pointer("/file/external/url")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::MalformedResponse("file block has no external url".to_string())
            })
    }

    /// Builds a creation payload for an external-file block.
    pub fn template(external_url: &str) -> Value {
        json!({
            "object": "block",
            "type": "file",
            "file": {
                "type": "external",
                "external": { "url": external_url },
            },
        })
    }
}

// ---------------------------------------------------------------------------
// PageBlock
// ---------------------------------------------------------------------------

/// The tree-node view of a page: a `child_page` block.
///
/// Navigation and appends happen here; the property table lives on the
/// [`Page`] view reached through [`PageBlock::as_page`].
#[derive(Debug, Clone)]
pub struct PageBlock {
    pub(crate) core: BlockCore,
}

impl PageBlock {
    pub(crate) fn from_core(core: BlockCore) -> Self {
        Self { core }
    }

    /// The page title carried in the child_page payload.
    pub async fn title(&mut self) -> Result<String, Error> {
        let raw = self.core.raw().await?;
        raw.pointer("/child_page/title")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::MalformedResponse("child_page block has no title".to_string())
            })
    }

    /// Projects this block to the full page view over the same id.
    pub fn as_page(&self) -> Page {
        Page::new(self.core.handle.clone(), self.core.id.cast())
    }
}

// ---------------------------------------------------------------------------
// DatabaseBlock
// ---------------------------------------------------------------------------

/// The tree-node view of a database: a `child_database` block.
#[derive(Debug, Clone)]
pub struct DatabaseBlock {
    pub(crate) core: BlockCore,
}

impl DatabaseBlock {
    pub(crate) fn from_core(core: BlockCore) -> Self {
        Self { core }
    }

    /// The database title carried in the child_database payload.
    pub async fn title(&mut self) -> Result<String, Error> {
        let raw = self.core.raw().await?;
        raw.pointer("/child_database/title")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                Error::MalformedResponse("child_database block has no title".to_string())
            })
    }

    /// Projecting a child_database block to a queryable [`Database`] is
    /// an unmodeled relation; build the database handle from the facade
    /// instead.
    pub fn as_database(&self) -> Result<Database, Error> {
        Err(Error::NotImplemented(
            "child_database blocks cannot be projected to a database view",
        ))
    }
}
