//! # Color Selection
//!
//! Tracks the target color across the three ways a user can express it:
//!
//! - **Preset**: a swatch from [`COLOR_PRESETS`]
//! - **Custom text**: free-form wording or a hex code, sent verbatim
//! - **Picker**: a color-wheel hex value
//!
//! Exactly one of them is authoritative at a time. The selection is a tagged
//! union ([`ColorSelection`]) and the two values other components read,
//! `prompt_text` and `display_hex`, are derived from it.

mod presets;
mod selection;

pub use presets::{COLOR_PRESETS, ColorPreset, find_preset};
pub use selection::{ColorSelection, ColorSelectionState, DEFAULT_DISPLAY_HEX, SelectionMode};

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::RecolorError;

static HEX_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#[0-9A-F]{6}$").expect("static hex pattern"));

/// A validated `#RRGGBB` color, kept exactly as entered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    /// Accepts `#` followed by exactly six hex digits, any case.
    pub fn parse(value: &str) -> Option<Self> {
        HEX_PATTERN.is_match(value).then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used for swatches.
    pub fn normalized(&self) -> Self {
        Self(self.0.to_ascii_uppercase())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HexColor {
    type Err = RecolorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| {
            RecolorError::config("color", format!("'{}' is not a #RRGGBB hex color", s))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_pattern_is_strict() {
        assert_eq!(HexColor::parse("#abcdef").unwrap().as_str(), "#abcdef");
        assert!(HexColor::parse("#ABCDEF").is_some());
        assert!(HexColor::parse("ABCDEF").is_none());
        assert!(HexColor::parse("#ABCDE").is_none());
        assert!(HexColor::parse("#ABCDEF0").is_none());
        assert!(HexColor::parse("#GHIJKL").is_none());
        assert!(HexColor::parse(" #ABCDEF").is_none());
        assert!(HexColor::parse("Rose Gold").is_none());
    }

    #[test]
    fn test_normalized_is_uppercase() {
        let hex = HexColor::parse("#f59e0b").unwrap();
        assert_eq!(hex.normalized().as_str(), "#F59E0B");
        assert_eq!(hex.as_str(), "#f59e0b");
    }

    #[test]
    fn test_from_str_error() {
        let err = "#12".parse::<HexColor>().unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
