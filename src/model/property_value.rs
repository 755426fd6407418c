// src/model/property_value.rs
//! Typed property values: each kind knows how to decode itself from a
//! wire object and how to build a wire payload from caller arguments.

use crate::types::{Annotations, RichText};
use serde_json::{json, Value};

/// A property value resolved to its typed variant.
///
/// Resolution is total over the tag vocabulary: known tags map to their
/// typed variant, anything else lands in [`PropertyValue::Other`], which
/// exposes only the raw payload.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Title(TitleValue),
    RichText(RichTextValue),
    Number(NumberValue),
    Select(SelectValue),
    MultiSelect(MultiSelectValue),
    Item(PropertyItem),
    Other(Value),
}

impl PropertyValue {
    /// Resolves a raw property payload by its `type` tag.
    pub fn from_raw(raw: Value) -> Self {
        match raw.get("type").and_then(Value::as_str) {
            Some("title") => Self::Title(TitleValue { raw }),
            Some("rich_text") => Self::RichText(RichTextValue { raw }),
            Some("number") => Self::Number(NumberValue { raw }),
            Some("select") => Self::Select(SelectValue { raw }),
            Some("multi_select") => Self::MultiSelect(MultiSelectValue { raw }),
            Some("property_item") => Self::Item(PropertyItem::from_raw(raw)),
            _ => Self::Other(raw),
        }
    }

    /// The wire tag this value resolved under.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Title(_) => "title",
            Self::RichText(_) => "rich_text",
            Self::Number(_) => "number",
            Self::Select(_) => "select",
            Self::MultiSelect(_) => "multi_select",
            Self::Item(_) => "property_item",
            Self::Other(raw) => raw
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("unknown"),
        }
    }

    /// The raw wire payload behind this value.
    pub fn raw(&self) -> &Value {
        match self {
            Self::Title(value) => &value.raw,
            Self::RichText(value) => &value.raw,
            Self::Number(value) => &value.raw,
            Self::Select(value) => &value.raw,
            Self::MultiSelect(value) => &value.raw,
            Self::Item(value) => &value.raw,
            Self::Other(raw) => raw,
        }
    }
}

/// Reads a rich-text-bearing field that may arrive as a span array (page
/// retrieval) or a single span object (paginated property endpoint).
fn flatten_rich_text_field(raw: &Value, field: &str) -> String {
    let spans = raw.get(field).cloned().unwrap_or(Value::Null);
    RichText::from_wire(&spans)
        .map(|text| text.plain_text())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// The page-title property.
#[derive(Debug, Clone, PartialEq)]
pub struct TitleValue {
    pub(crate) raw: Value,
}

impl TitleValue {
    /// Builds the wire payload for a title value.
    pub fn template(text: &str, annotations: Annotations) -> Value {
        let mut rich_text = RichText::new();
        rich_text.set_plain_text(text, annotations);
        json!({ "title": rich_text.to_wire() })
    }

    /// The flattened display text of the title.
    pub fn plain_text(&self) -> String {
        flatten_rich_text_field(&self.raw, "title")
    }
}

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// A free-form rich text property.
#[derive(Debug, Clone, PartialEq)]
pub struct RichTextValue {
    pub(crate) raw: Value,
}

impl RichTextValue {
    pub fn template(text: &str, annotations: Annotations) -> Value {
        let mut rich_text = RichText::new();
        rich_text.set_plain_text(text, annotations);
        json!({ "rich_text": rich_text.to_wire() })
    }

    pub fn plain_text(&self) -> String {
        flatten_rich_text_field(&self.raw, "rich_text")
    }
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// A numeric property.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberValue {
    pub(crate) raw: Value,
}

impl NumberValue {
    pub fn template(number: f64) -> Value {
        json!({ "number": number })
    }

    /// The numeric value; an empty cell reads as `None`.
    pub fn value(&self) -> Option<f64> {
        self.raw.get("number").and_then(Value::as_f64)
    }
}

// ---------------------------------------------------------------------------
// Select
// ---------------------------------------------------------------------------

/// A single-choice select property.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectValue {
    pub(crate) raw: Value,
}

impl SelectValue {
    pub fn template(name: &str) -> Value {
        json!({ "select": { "name": name } })
    }

    /// The selected option name; a cleared select reads as `None`.
    pub fn select(&self) -> Option<String> {
        self.raw
            .pointer("/select/name")
            .and_then(Value::as_str)
            .map(str::to_owned)
    }
}

// ---------------------------------------------------------------------------
// Multi-select
// ---------------------------------------------------------------------------

/// A multi-choice tag property.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSelectValue {
    pub(crate) raw: Value,
}

impl MultiSelectValue {
    pub fn template<S: AsRef<str>>(tags: &[S]) -> Value {
        let options: Vec<Value> = tags
            .iter()
            .map(|tag| json!({ "name": tag.as_ref() }))
            .collect();
        json!({ "multi_select": options })
    }

    /// The selected tag names, in order; an empty cell reads as an empty
    /// list.
    pub fn tags(&self) -> Vec<String> {
        self.raw
            .get("multi_select")
            .and_then(Value::as_array)
            .map(|options| {
                options
                    .iter()
                    .filter_map(|option| {
                        option.get("name").and_then(Value::as_str).map(str::to_owned)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Paginated property item
// ---------------------------------------------------------------------------

/// A paginated property-item list: an ordered sequence of nested values
/// of arbitrary, possibly mixed, underlying kind.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyItem {
    pub(crate) raw: Value,
    items: Vec<PropertyValue>,
}

impl PropertyItem {
    fn from_raw(raw: Value) -> Self {
        let items = raw
            .get("results")
            .and_then(Value::as_array)
            .map(|results| {
                results
                    .iter()
                    .map(|sub| PropertyValue::from_raw(sub.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Self { raw, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PropertyValue> {
        self.items.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PropertyValue> {
        self.items.iter()
    }
}

impl std::ops::Index<usize> for PropertyItem {
    type Output = PropertyValue;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}
