// src/lib.rs
//! notion-objects — an object-oriented facade over the Notion API.
//!
//! The crate resolves opaque identifiers into typed handles (pages,
//! databases, blocks) that lazily fetch and cache their own remote state,
//! replace that cache wholesale on every successful write, and retry
//! rate-limited calls transparently.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — [`Error`], [`NotionErrorCode`], [`ValidationError`]
//! - **Configuration** — [`NotionConfig`], [`RetryPolicy`], [`ApiKey`]
//! - **Object graph** — [`NotionClient`], [`Page`], [`Database`], [`AnyBlock`]
//!   and its typed views
//! - **Rich text** — [`RichText`], [`Annotations`], [`Color`]
//! - **Property values** — [`PropertyValue`] and its typed variants
//! - **Transport** — the [`NotionApi`] trait and its HTTP implementation

mod api;
mod client;
mod config;
mod constants;
mod error;
mod model;
mod retry;
mod types;

// --- Error Handling ---
pub use crate::error::{Error, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::NotionConfig;
pub use crate::retry::RetryPolicy;

// --- Object Graph ---
pub use crate::client::NotionClient;
pub use crate::model::{
    AnyBlock, Block, BlockType, Database, DatabaseBlock, FileBlock, Page, PageBlock, TextBlock,
};

// --- Property Values ---
pub use crate::model::{
    MultiSelectValue, NumberValue, PropertyItem, PropertyValue, RichTextValue, SelectValue,
    TitleValue,
};

// --- Rich Text & Domain Types ---
pub use crate::types::{
    Annotations, ApiKey, BlockId, Color, DatabaseId, EquationContent, Link, PageId, PropertyId,
    RichText, RichTextItem, RichTextKind, TextContent,
};

// --- Transport ---
pub use crate::api::{ApiHandle, NotionApi, NotionHttpClient, PaginatedList};

// --- Constants ---
pub use crate::constants::NOTION_API_PAGE_SIZE;
