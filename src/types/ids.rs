use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Strong typing for object identifiers with phantom types.
///
/// Every Notion entity is addressed by an opaque id scoped to its kind.
/// The phantom marker keeps a block id from being passed where a page id
/// is expected, while all kinds share one normalization path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _kind: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

pub type BlockId = Id<BlockMarker>;
pub type PageId = Id<PageMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T> Id<T> {
    /// Parse various Notion ID formats into a normalized ID.
    ///
    /// Accepts bare 32-char hex, dashed UUIDs, and Notion URLs.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_notion_id(input)?;
        Ok(Self {
            value: normalized,
            _kind: PhantomData,
        })
    }

    /// Returns the canonical non-hyphenated ID.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the hyphenated UUID format for API paths.
    pub fn to_hyphenated(&self) -> String {
        if self.value.len() == 32 && !self.value.contains('-') {
            format!(
                "{}-{}-{}-{}-{}",
                &self.value[0..8],
                &self.value[8..12],
                &self.value[12..16],
                &self.value[16..20],
                &self.value[20..32]
            )
        } else {
            self.value.clone()
        }
    }

    /// Re-scopes this id to another kind.
    ///
    /// A page and its child_page block share one underlying id; the two
    /// capability views are reached by recasting, never by re-parsing.
    pub(crate) fn cast<U>(&self) -> Id<U> {
        Id {
            value: self.value.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Id::parse(&value).map_err(serde::de::Error::custom)
    }
}

/// Normalize various Notion ID formats into the canonical 32-char hex form.
fn normalize_notion_id(input: &str) -> Result<String, ValidationError> {
    let cleaned = input.trim().trim_end_matches('/');

    // 1. UUID format with dashes
    if let Ok(uuid) = Uuid::parse_str(cleaned) {
        return Ok(uuid.as_simple().to_string());
    }

    // 2. Direct 32-char hex ID
    if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(cleaned.to_lowercase());
    }

    // 3. Extract from URLs
    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        return extract_id_from_url(cleaned);
    }

    Err(ValidationError::InvalidId(format!(
        "Could not parse Notion ID from: {}",
        input
    )))
}

/// Extracts the trailing object id from a Notion URL.
fn extract_id_from_url(url: &str) -> Result<String, ValidationError> {
    lazy_static::lazy_static! {
        static ref ID_REGEX: Regex = Regex::new(
            r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
        ).expect("Notion ID regex is valid");
    }

    if let Some(captures) = ID_REGEX.captures(url) {
        if let Some(id_match) = captures.get(1) {
            let id = id_match.as_str().replace('-', "").to_lowercase();
            return Ok(id);
        }
    }

    Err(ValidationError::InvalidId(format!(
        "No valid ID found in URL: {}",
        url
    )))
}

/// Identifier of a property on a page or database schema.
///
/// Property ids are short opaque tokens ("title", "fVc%3F", ...) assigned
/// by the service. They are not UUIDs and get no normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_bare_hex_ids() {
        let id = PageId::parse("550E8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn parses_dashed_uuids() {
        let id = BlockId::parse("550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn parses_notion_urls() {
        let id = DatabaseId::parse(
            "https://www.notion.so/Test-Page-550e8400e29b41d4a716446655440000",
        )
        .unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");

        let id = PageId::parse("https://www.notion.so/550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.as_str(), "550e8400e29b41d4a716446655440000");
    }

    #[test]
    fn rejects_invalid_ids() {
        assert!(PageId::parse("too-short").is_err());
        assert!(PageId::parse("not-hex-chars-zz000000000000000").is_err());
        assert!(PageId::parse("").is_err());
    }

    #[test]
    fn hyphenates_for_api_paths() {
        let id = PageId::parse("550e8400e29b41d4a716446655440000").unwrap();
        assert_eq!(id.to_hyphenated(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn casting_preserves_the_underlying_id() {
        let block = BlockId::parse("550e8400e29b41d4a716446655440000").unwrap();
        let page: PageId = block.cast();
        assert_eq!(page.as_str(), block.as_str());
    }

    #[test]
    fn property_ids_pass_through_untouched() {
        let id = PropertyId::new("fVc%3F");
        assert_eq!(id.as_str(), "fVc%3F");
    }
}
