// src/constants.rs
//! Domain constants that define the operational boundaries of the crate.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. Database queries always request the
/// maximum to minimize round-trips while paginating.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Base URL for all Notion API requests.
pub const NOTION_API_BASE_URL: &str = "https://api.notion.com/v1";

// ---------------------------------------------------------------------------
// Rate-limit retry boundaries
// ---------------------------------------------------------------------------

/// How many times a rate-limited call is attempted before giving up.
pub const RETRY_MAX_ATTEMPTS: u32 = 5;

/// Delay before the first rate-limit retry. Doubles on each subsequent
/// attempt up to [`RETRY_MAX_DELAY`].
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

/// Upper bound on the backoff delay between rate-limit retries.
pub const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing unparseable response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
