//! Configuration management for Modalist
//!
//! This module handles loading, parsing, and validation of configuration files.

use crate::constants::{
    CONFIG_GENERATED, DIALOG_DEFAULT_WIDTH_PERCENT, DIALOG_MAX_WIDTH_PERCENT, DIALOG_MIN_WIDTH_PERCENT,
};
use crate::icons::IconTheme;
use anyhow::{Context, Result};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub dialog: DialogConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
    /// Class name -> style applied when painting elements carrying that class
    pub styles: HashMap<String, ClassStyle>,
}

/// Default dialog behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogConfig {
    /// Close when Escape is pressed
    pub escape_close: bool,
    /// Close when the backdrop is clicked
    pub click_close: bool,
    /// Render the close control in the top right corner
    pub show_close: bool,
    /// Dialog width as a percentage of the screen
    pub width_percent: u16,
    /// Extra classes for the overlay element
    pub overlay_class: String,
    /// Extra classes for the container element
    pub container_class: String,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Enable mouse support
    pub mouse_enabled: bool,
    /// Glyph theme for dialog chrome
    pub icon_theme: IconTheme,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Write logs to a file in addition to the in-memory buffer
    pub enabled: bool,
    /// One of error, warn, info, debug, trace
    pub level: String,
}

/// Presentation attached to a class name
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ClassStyle {
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub bold: bool,
    pub dim: bool,
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            escape_close: true,
            click_close: true,
            show_close: true,
            width_percent: DIALOG_DEFAULT_WIDTH_PERCENT,
            overlay_class: String::new(),
            container_class: String::new(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: true,
            icon_theme: IconTheme::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            level: "info".to_string(),
        }
    }
}

impl ClassStyle {
    /// Resolve into a ratatui style; colors must already be validated
    pub fn to_style(&self) -> Style {
        let mut style = Style::default();
        if let Some(fg) = self.fg.as_deref().and_then(|c| Color::from_str(c).ok()) {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg.as_deref().and_then(|c| Color::from_str(c).ok()) {
            style = style.bg(bg);
        }
        if self.bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.dim {
            style = style.add_modifier(Modifier::DIM);
        }
        style
    }
}

impl Config {
    /// Load configuration from file or return defaults
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        if let Some(path) = config_path {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in order of precedence
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check current directory
        let current_dir_config = PathBuf::from("modalist.toml");
        if current_dir_config.exists() {
            return Ok(Some(current_dir_config));
        }

        // 2. Check XDG config directory
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("modalist").join("config.toml");
            if xdg_config.exists() {
                return Ok(Some(xdg_config));
            }
        }

        Ok(None)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.dialog.width_percent < DIALOG_MIN_WIDTH_PERCENT || self.dialog.width_percent > DIALOG_MAX_WIDTH_PERCENT
        {
            anyhow::bail!(
                "width_percent must be between {} and {}, got {}",
                DIALOG_MIN_WIDTH_PERCENT,
                DIALOG_MAX_WIDTH_PERCENT,
                self.dialog.width_percent
            );
        }

        if log::LevelFilter::from_str(&self.logging.level).is_err() {
            anyhow::bail!(
                "Invalid logging level '{}': expected error, warn, info, debug or trace",
                self.logging.level
            );
        }

        for (class, style) in &self.styles {
            for color in [&style.fg, &style.bg].into_iter().flatten() {
                if let Err(e) = Color::from_str(color) {
                    anyhow::bail!("Style '{}': invalid color '{}': {}", class, color, e);
                }
            }
        }

        Ok(())
    }

    /// Combined style for a list of classes, later classes winning
    pub fn style_for_classes(&self, classes: &[String]) -> Style {
        classes
            .iter()
            .filter_map(|class| self.styles.get(class))
            .fold(Style::default(), |style, class_style| style.patch(class_style.to_style()))
    }

    /// Generate default configuration file
    pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        let toml_content = toml::to_string_pretty(&config).context("Failed to serialize default config")?;

        let header = format!(
            "# Modalist Configuration File\n# Generated on {}\n\n",
            chrono::Local::now().format("%Y-%m-%d")
        );

        let full_content = header + &toml_content;

        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }

        std::fs::write(&path, full_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        println!("{}: {}", CONFIG_GENERATED, path.as_ref().display());
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn get_xdg_config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
            .map(|dir| dir.join("modalist"))
    }

    /// Get the default config file path
    pub fn get_default_config_path() -> Result<PathBuf> {
        Ok(Self::get_xdg_config_dir()?.join("config.toml"))
    }
}
