//! Illustration naming, prompts and the vector fallback.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::Level;

/// Stored image format of an illustration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Png,
    Svg,
}

impl ImageFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg => "image/svg+xml",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }
}

/// Public reference to the illustration of a content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Illustration {
    pub url: String,
    pub alt: String,
}

/// Object-store path for a content item's illustration.
pub fn object_path(content_id: Uuid, format: ImageFormat) -> String {
    format!("dailyword-{}.{}", content_id, format.extension())
}

/// Prompt sent to the image provider.
pub fn image_prompt(word: &str) -> String {
    format!(
        "Norwegian word: {}. Illustration. Simple, clear, high contrast, SFW, educational.",
        word
    )
}

/// Alt text of the content item illustration.
pub fn alt_text(word: &str) -> String {
    format!("Illustration of {}", word)
}

/// Alt text of the illustration shown next to one leveled text.
pub fn level_alt_text(level: Level, word: &str) -> String {
    format!("Nivå {}: {}", level, word)
}

/// Self-contained SVG card showing the word on a two-stop gradient.
///
/// Output depends only on `word`.
pub fn fallback_svg(word: &str) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' width='1200' height='800'>\n\
        \x20 <defs><linearGradient id='g' x1='0' x2='1'><stop offset='0%' stop-color='hsl(226,75%,45%)'/><stop offset='100%' stop-color='hsl(190,90%,42%)'/></linearGradient></defs>\n\
        \x20 <rect width='100%' height='100%' fill='url(#g)'/>\n\
        \x20 <text x='50%' y='50%' dominant-baseline='middle' text-anchor='middle' font-size='80' fill='white' font-family='sans-serif'>{}</text>\n\
        </svg>",
        escape_xml(word)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_path() {
        let id = Uuid::nil();
        assert_eq!(
            object_path(id, ImageFormat::Svg),
            "dailyword-00000000-0000-0000-0000-000000000000.svg"
        );
        assert_eq!(ImageFormat::Png.content_type(), "image/png");
    }

    #[test]
    fn test_fallback_svg_is_deterministic() {
        let a = fallback_svg("bibliotek");
        let b = fallback_svg("bibliotek");
        assert_eq!(a, b);
        assert!(a.starts_with("<svg xmlns='http://www.w3.org/2000/svg'"));
        assert!(a.contains("linearGradient"));
        assert!(a.contains(">bibliotek</text>"));
    }

    #[test]
    fn test_fallback_svg_escapes_word() {
        let svg = fallback_svg("fisk & <chips>");
        assert!(svg.contains("fisk &amp; &lt;chips&gt;"));
        assert!(!svg.contains("<chips>"));
    }

    #[test]
    fn test_alt_texts() {
        assert_eq!(alt_text("sol"), "Illustration of sol");
        assert_eq!(level_alt_text(Level::Three, "sol"), "Nivå 3: sol");
    }
}
