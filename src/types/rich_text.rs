use super::Color;
use crate::error::Error;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Formatting annotations carried by every rich text span.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
    pub color: Color,
}

impl Annotations {
    /// Annotations with a single style flag set — the common case when
    /// building spans by hand.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn code() -> Self {
        Self {
            code: true,
            ..Self::default()
        }
    }

    pub fn with_color(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

/// Text content of a `text`-kind span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    pub link: Option<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub url: String,
}

/// The kind of rich text content — a typed vocabulary replacing
/// stringly-typed dispatch.
///
/// Only `Text` is constructible client-side; mentions and equations are
/// read from the wire and carried opaquely so round-trips never lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RichTextKind {
    Text { text: TextContent },
    Mention { mention: Value },
    Equation { equation: EquationContent },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquationContent {
    pub expression: String,
}

/// A single styled span: content variant plus annotations, with
/// `plain_text` as the fallback rendering for any variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichTextItem {
    #[serde(flatten)]
    pub kind: RichTextKind,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
}

impl RichTextItem {
    /// Create a styled text span — the only span kind built client-side.
    pub fn text(content: &str, annotations: Annotations) -> Self {
        Self {
            kind: RichTextKind::Text {
                text: TextContent {
                    content: content.to_string(),
                    link: None,
                },
            },
            annotations,
            plain_text: content.to_string(),
            href: None,
        }
    }
}

/// An ordered sequence of styled spans composing the displayed content of
/// a text-bearing field.
///
/// Mutators return `&mut Self` so construction chains read naturally:
///
/// ```
/// use notion_objects::{Annotations, RichText};
///
/// let mut text = RichText::new();
/// text.set_plain_text("hello ", Annotations::default())
///     .add_plain_text("world", Annotations::bold());
/// assert_eq!(text.plain_text(), "hello world");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    items: Vec<RichTextItem>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// A one-span sequence with default styling.
    pub fn plain(text: &str) -> Self {
        Self {
            items: vec![RichTextItem::text(text, Annotations::default())],
        }
    }

    /// Parses the wire representation of a rich text field.
    ///
    /// Accepts the usual span array, the single-object shape returned by
    /// the paginated property endpoint, and null (an empty field).
    pub fn from_wire(value: &Value) -> Result<Self, Error> {
        let items = match value {
            Value::Null => Vec::new(),
            Value::Array(entries) => entries
                .iter()
                .map(|entry| serde_json::from_value(entry.clone()))
                .collect::<Result<Vec<_>, _>>()?,
            Value::Object(_) => vec![serde_json::from_value(value.clone())?],
            other => {
                return Err(Error::MalformedResponse(format!(
                    "expected rich text spans, got: {}",
                    other
                )))
            }
        };
        Ok(Self { items })
    }

    /// The wire representation: an array of span objects.
    pub fn to_wire(&self) -> Value {
        serde_json::to_value(&self.items).expect("rich text spans serialize to JSON")
    }

    /// Replaces the whole sequence with a single styled span.
    pub fn set_plain_text(&mut self, text: &str, annotations: Annotations) -> &mut Self {
        self.items = vec![RichTextItem::text(text, annotations)];
        self
    }

    /// Appends one styled span.
    pub fn add_plain_text(&mut self, text: &str, annotations: Annotations) -> &mut Self {
        self.items.push(RichTextItem::text(text, annotations));
        self
    }

    /// Concatenates another sequence's spans in place.
    pub fn add_rich_text(&mut self, other: &RichText) -> &mut Self {
        self.items.extend(other.items.iter().cloned());
        self
    }

    /// Flattens all spans' display text in original order.
    pub fn plain_text(&self) -> String {
        self.items
            .iter()
            .map(|item| item.plain_text.as_str())
            .collect()
    }

    /// A single-span view at the given position.
    pub fn get(&self, index: usize) -> Option<RichText> {
        self.items.get(index).map(|item| RichText {
            items: vec![item.clone()],
        })
    }

    pub fn items(&self) -> &[RichTextItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
