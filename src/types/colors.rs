use serde::{Deserialize, Serialize};
use std::fmt;

/// Type-safe color enum instead of strings.
///
/// Covers the annotation colors the Notion API accepts, including the
/// `*_background` family. Unknown wire values fall back to `Default`
/// rather than failing the whole span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[default]
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
    GrayBackground,
    BrownBackground,
    OrangeBackground,
    YellowBackground,
    GreenBackground,
    BlueBackground,
    PurpleBackground,
    PinkBackground,
    RedBackground,
}

impl Color {
    /// Resolves a wire name into the typed vocabulary. Total: unknown
    /// names map to `Default`.
    pub fn from_wire(name: &str) -> Self {
        match name {
            "gray" => Color::Gray,
            "brown" => Color::Brown,
            "orange" => Color::Orange,
            "yellow" => Color::Yellow,
            "green" => Color::Green,
            "blue" => Color::Blue,
            "purple" => Color::Purple,
            "pink" => Color::Pink,
            "red" => Color::Red,
            "gray_background" => Color::GrayBackground,
            "brown_background" => Color::BrownBackground,
            "orange_background" => Color::OrangeBackground,
            "yellow_background" => Color::YellowBackground,
            "green_background" => Color::GreenBackground,
            "blue_background" => Color::BlueBackground,
            "purple_background" => Color::PurpleBackground,
            "pink_background" => Color::PinkBackground,
            "red_background" => Color::RedBackground,
            _ => Color::Default,
        }
    }

    /// The wire name of this color.
    pub fn as_str(&self) -> &'static str {
        match self {
            Color::Default => "default",
            Color::Gray => "gray",
            Color::Brown => "brown",
            Color::Orange => "orange",
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Red => "red",
            Color::GrayBackground => "gray_background",
            Color::BrownBackground => "brown_background",
            Color::OrangeBackground => "orange_background",
            Color::YellowBackground => "yellow_background",
            Color::GreenBackground => "green_background",
            Color::BlueBackground => "blue_background",
            Color::PurpleBackground => "purple_background",
            Color::PinkBackground => "pink_background",
            Color::RedBackground => "red_background",
        }
    }

    /// Check if this is a background color
    pub fn is_background(&self) -> bool {
        matches!(
            self,
            Color::GrayBackground
                | Color::BrownBackground
                | Color::OrangeBackground
                | Color::YellowBackground
                | Color::GreenBackground
                | Color::BlueBackground
                | Color::PurpleBackground
                | Color::PinkBackground
                | Color::RedBackground
        )
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Color::from_wire(&name))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&Color::Red).unwrap(), "\"red\"");
        assert_eq!(
            serde_json::to_string(&Color::GrayBackground).unwrap(),
            "\"gray_background\""
        );
    }

    #[test]
    fn deserializes_wire_names() {
        let color: Color = serde_json::from_str("\"blue_background\"").unwrap();
        assert_eq!(color, Color::BlueBackground);
    }

    #[test]
    fn unknown_colors_fall_back_to_default() {
        let color: Color = serde_json::from_str("\"chartreuse\"").unwrap();
        assert_eq!(color, Color::Default);
    }

    #[test]
    fn wire_names_round_trip() {
        for color in [Color::Default, Color::Pink, Color::RedBackground] {
            assert_eq!(Color::from_wire(color.as_str()), color);
        }
    }

    #[test]
    fn background_classification() {
        assert!(!Color::Red.is_background());
        assert!(Color::RedBackground.is_background());
    }
}
