// src/model/block.rs
//! The polymorphic block node: the closed type-tag vocabulary, the
//! generic block handle, and the total resolution from raw
//! representations to typed views.

use super::blocks::{DatabaseBlock, FileBlock, PageBlock, TextBlock};
use super::common::BlockCore;
use crate::api::ApiHandle;
use crate::error::Error;
use crate::types::BlockId;
use serde_json::Value;

/// The closed vocabulary of block type tags.
///
/// `from_tag` is total: tags outside the known set resolve to
/// [`BlockType::Unsupported`] instead of failing, so new server-side
/// kinds degrade gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockType {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    BulletedListItem,
    NumberedListItem,
    ToDo,
    Toggle,
    ChildPage,
    ChildDatabase,
    Embed,
    Image,
    Video,
    File,
    Pdf,
    Bookmark,
    Callout,
    Quote,
    Equation,
    Divider,
    TableOfContents,
    Column,
    ColumnList,
    LinkPreview,
    SyncedBlock,
    Template,
    LinkToPage,
    Table,
    TableRow,
    Unsupported,
}

impl BlockType {
    /// Resolves a wire tag into the typed vocabulary. Total: unknown tags
    /// map to `Unsupported`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "paragraph" => Self::Paragraph,
            "heading_1" => Self::Heading1,
            "heading_2" => Self::Heading2,
            "heading_3" => Self::Heading3,
            "bulleted_list_item" => Self::BulletedListItem,
            "numbered_list_item" => Self::NumberedListItem,
            "to_do" => Self::ToDo,
            "toggle" => Self::Toggle,
            "child_page" => Self::ChildPage,
            "child_database" => Self::ChildDatabase,
            "embed" => Self::Embed,
            "image" => Self::Image,
            "video" => Self::Video,
            "file" => Self::File,
            "pdf" => Self::Pdf,
            "bookmark" => Self::Bookmark,
            "callout" => Self::Callout,
            "quote" => Self::Quote,
            "equation" => Self::Equation,
            "divider" => Self::Divider,
            "table_of_contents" => Self::TableOfContents,
            "column" => Self::Column,
            "column_list" => Self::ColumnList,
            "link_preview" => Self::LinkPreview,
            "synced_block" => Self::SyncedBlock,
            "template" => Self::Template,
            "link_to_page" => Self::LinkToPage,
            "table" => Self::Table,
            "table_row" => Self::TableRow,
            _ => Self::Unsupported,
        }
    }

    /// The wire tag for this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Heading1 => "heading_1",
            Self::Heading2 => "heading_2",
            Self::Heading3 => "heading_3",
            Self::BulletedListItem => "bulleted_list_item",
            Self::NumberedListItem => "numbered_list_item",
            Self::ToDo => "to_do",
            Self::Toggle => "toggle",
            Self::ChildPage => "child_page",
            Self::ChildDatabase => "child_database",
            Self::Embed => "embed",
            Self::Image => "image",
            Self::Video => "video",
            Self::File => "file",
            Self::Pdf => "pdf",
            Self::Bookmark => "bookmark",
            Self::Callout => "callout",
            Self::Quote => "quote",
            Self::Equation => "equation",
            Self::Divider => "divider",
            Self::TableOfContents => "table_of_contents",
            Self::Column => "column",
            Self::ColumnList => "column_list",
            Self::LinkPreview => "link_preview",
            Self::SyncedBlock => "synced_block",
            Self::Template => "template",
            Self::LinkToPage => "link_to_page",
            Self::Table => "table",
            Self::TableRow => "table_row",
            Self::Unsupported => "unsupported",
        }
    }

    /// Whether this kind carries a `rich_text` body and resolves to a
    /// [`TextBlock`] view.
    pub fn is_text_bearing(&self) -> bool {
        matches!(
            self,
            Self::Paragraph | Self::Heading1 | Self::Heading2 | Self::Heading3
        )
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Macro to reduce boilerplate in AnyBlock delegation methods
macro_rules! for_each_view {
    ($self:expr, $block:pat => $result:expr) => {
        match $self {
            AnyBlock::Text($block) => $result,
            AnyBlock::File($block) => $result,
            AnyBlock::Page($block) => $result,
            AnyBlock::Database($block) => $result,
            AnyBlock::Other($block) => $result,
        }
    };
}

/// A block resolved to its most capable view.
///
/// Resolution inspects the raw `type` tag: text-bearing kinds become
/// [`TextBlock`], `file` becomes [`FileBlock`], `child_page` becomes
/// [`PageBlock`], `child_database` becomes [`DatabaseBlock`], and every
/// other tag falls back to the generic [`Block`].
#[derive(Debug, Clone)]
pub enum AnyBlock {
    Text(TextBlock),
    File(FileBlock),
    Page(PageBlock),
    Database(DatabaseBlock),
    Other(Block),
}

impl AnyBlock {
    /// Resolves a raw block representation into a typed view sharing the
    /// given transport handle.
    pub fn from_raw(handle: ApiHandle, raw: Value) -> Result<Self, Error> {
        let id = raw
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                Error::MalformedResponse("block representation has no 'id'".to_string())
            })?;
        let id = BlockId::parse(id)?;
        let kind = raw
            .get("type")
            .and_then(Value::as_str)
            .map(BlockType::from_tag)
            .ok_or_else(|| {
                Error::MalformedResponse("block representation has no 'type' tag".to_string())
            })?;

        let core = BlockCore::with_raw(handle, id, raw);
        Ok(match kind {
            kind if kind.is_text_bearing() => Self::Text(TextBlock::from_core(core)),
            BlockType::File => Self::File(FileBlock::from_core(core)),
            BlockType::ChildPage => Self::Page(PageBlock::from_core(core)),
            BlockType::ChildDatabase => Self::Database(DatabaseBlock::from_core(core)),
            _ => Self::Other(Block::from_core(core)),
        })
    }

    pub fn id(&self) -> &BlockId {
        for_each_view!(self, block => block.id())
    }

    pub async fn block_type(&mut self) -> Result<BlockType, Error> {
        for_each_view!(self, block => block.block_type().await)
    }

    pub async fn raw(&mut self) -> Result<&Value, Error> {
        for_each_view!(self, block => block.raw().await)
    }

    pub async fn children(&mut self) -> Result<&mut Vec<AnyBlock>, Error> {
        for_each_view!(self, block => block.children().await)
    }

    pub async fn append_child(&mut self, template: Value) -> Result<&mut Vec<AnyBlock>, Error> {
        for_each_view!(self, block => block.append_child(template).await)
    }

    pub async fn archive(&mut self) -> Result<(), Error> {
        for_each_view!(self, block => block.archive().await)
    }

    pub fn invalidate(&mut self) {
        for_each_view!(self, block => block.invalidate())
    }

    pub fn as_text(&mut self) -> Option<&mut TextBlock> {
        match self {
            Self::Text(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_file(&mut self) -> Option<&mut FileBlock> {
        match self {
            Self::File(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_page_block(&mut self) -> Option<&mut PageBlock> {
        match self {
            Self::Page(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_database_block(&mut self) -> Option<&mut DatabaseBlock> {
        match self {
            Self::Database(block) => Some(block),
            _ => None,
        }
    }
}

/// A generic node in the remote document tree.
///
/// Kinds without a dedicated view (dividers, toggles, tables, ...) are
/// navigated through this handle: representation, children, append,
/// archive. It has no creation template of its own.
#[derive(Debug, Clone)]
pub struct Block {
    pub(crate) core: BlockCore,
}

impl Block {
    pub(crate) fn from_core(core: BlockCore) -> Self {
        Self { core }
    }

    /// Creation payloads exist only for kinds with a concrete view;
    /// generic blocks cannot be built client-side.
    pub fn template() -> Result<Value, Error> {
        Err(Error::NotImplemented(
            "generic blocks have no creation template",
        ))
    }
}
