//! Icon service for managing different icon themes
//!
//! Dialog chrome and the demo host pull their glyphs from here so a terminal
//! without emoji or wide Unicode support can fall back to plain ASCII.

use serde::{Deserialize, Serialize};

/// Icon theme variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconTheme {
    /// Emoji icons (colorful, modern look)
    Emoji,
    /// Unicode symbols (clean, native look)
    Unicode,
    /// ASCII characters (maximum compatibility)
    #[default]
    Ascii,
}

/// Glyphs used by the dialog and its host
#[derive(Debug, Clone)]
pub struct IconSet {
    pub close: &'static str,
    pub info: &'static str,
    pub success: &'static str,
    pub locked: &'static str,
    pub list_item: &'static str,
}

/// Icon service for managing themes and providing icons
#[derive(Debug, Clone)]
pub struct IconService {
    current_theme: IconTheme,
}

impl Default for IconService {
    fn default() -> Self {
        Self::new(IconTheme::default())
    }
}

impl IconService {
    #[must_use]
    pub fn new(theme: IconTheme) -> Self {
        Self { current_theme: theme }
    }

    #[must_use]
    pub fn icons(&self) -> IconSet {
        match self.current_theme {
            IconTheme::Emoji => IconSet {
                close: "❌",
                info: "💡",
                success: "✅",
                locked: "🔒",
                list_item: "👤",
            },
            IconTheme::Unicode => IconSet {
                close: "✕",
                info: "ⓘ",
                success: "✓",
                locked: "⊘",
                list_item: "•",
            },
            IconTheme::Ascii => IconSet {
                close: "x",
                info: "i",
                success: "+",
                locked: "#",
                list_item: "-",
            },
        }
    }

    #[must_use]
    pub fn close(&self) -> &'static str {
        self.icons().close
    }

    #[must_use]
    pub fn info(&self) -> &'static str {
        self.icons().info
    }

    #[must_use]
    pub fn success(&self) -> &'static str {
        self.icons().success
    }

    #[must_use]
    pub fn locked(&self) -> &'static str {
        self.icons().locked
    }

    #[must_use]
    pub fn list_item(&self) -> &'static str {
        self.icons().list_item
    }
}
