//! Configuration file support for pairdiff
//!
//! Config file location: `~/.config/pairdiff/config.toml` (XDG_CONFIG_HOME)
//!
//! Example config:
//! ```toml
//! [diff]
//! algorithm = "matching-blocks"   # or "histogram", "myers"
//!
//! [ui]
//! zen = false
//! sync_scroll = true
//! line_numbers = true
//! blank_fill = "/"
//! reveal_first_diff = true
//!
//! [colors]
//! added = "#1a3a1a"
//! added_fg = "#aaffaa"
//! deleted = "#3a1a1a"
//! deleted_fg = "#ffaaaa"
//! changed = "#2e2a10"
//! changed_fg = "#ffeeaa"
//! blank = "#2A2D2F"
//! blank_fg = "#4A4D4F"
//! ```

use crate::color;
use pairdiff_core::{DiffAlgorithm, RowTag};
use ratatui::style::{Color, Style};
use serde::Deserialize;
use std::path::PathBuf;

/// Diff engine configuration
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// "matching-blocks" (default), "histogram" or "myers"
    pub algorithm: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Start in zen mode (no status bar)
    pub zen: bool,
    /// Mirror scrolling between the two panes
    pub sync_scroll: bool,
    /// Show line number gutters
    pub line_numbers: bool,
    /// Pattern repeated across padding rows
    pub blank_fill: String,
    /// Scroll the first difference into view when a comparison opens
    pub reveal_first_diff: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            zen: false,
            sync_scroll: true,
            line_numbers: true,
            blank_fill: "/".to_string(),
            reveal_first_diff: true,
        }
    }
}

/// Row colors, hex or ANSI names
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub added: String,
    pub added_fg: String,
    pub deleted: String,
    pub deleted_fg: String,
    pub changed: String,
    pub changed_fg: String,
    pub blank: String,
    pub blank_fg: String,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            added: "#1a3a1a".to_string(),
            added_fg: "#aaffaa".to_string(),
            deleted: "#3a1a1a".to_string(),
            deleted_fg: "#ffaaaa".to_string(),
            changed: "#2e2a10".to_string(),
            changed_fg: "#ffeeaa".to_string(),
            blank: "#2A2D2F".to_string(),
            blank_fg: "#4A4D4F".to_string(),
        }
    }
}

impl ColorsConfig {
    pub fn resolve(&self) -> Palette {
        let defaults = ColorsConfig::default();
        let pick = |value: &str, fallback: &str| {
            color::resolve_color_or(value, color::resolve_color(fallback).unwrap_or(Color::Reset))
        };
        Palette {
            added: Style::default()
                .bg(pick(&self.added, &defaults.added))
                .fg(pick(&self.added_fg, &defaults.added_fg)),
            deleted: Style::default()
                .bg(pick(&self.deleted, &defaults.deleted))
                .fg(pick(&self.deleted_fg, &defaults.deleted_fg)),
            changed: Style::default()
                .bg(pick(&self.changed, &defaults.changed))
                .fg(pick(&self.changed_fg, &defaults.changed_fg)),
            blank: Style::default()
                .bg(pick(&self.blank, &defaults.blank))
                .fg(pick(&self.blank_fg, &defaults.blank_fg)),
        }
    }
}

/// Resolved row styles, ready for rendering
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub added: Style,
    pub deleted: Style,
    pub changed: Style,
    pub blank: Style,
}

impl Default for Palette {
    fn default() -> Self {
        ColorsConfig::default().resolve()
    }
}

impl Palette {
    pub fn style(&self, tag: RowTag) -> Style {
        match tag {
            RowTag::Equal => Style::default(),
            RowTag::Added => self.added,
            RowTag::Deleted => self.deleted,
            RowTag::Changed => self.changed,
            RowTag::Blank => self.blank,
        }
    }
}

/// Root configuration
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub diff: DiffConfig,
    pub ui: UiConfig,
    pub colors: ColorsConfig,
}

impl Config {
    /// Get all possible config file paths in priority order
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg).join("pairdiff").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("pairdiff").join("config.toml"));
        }

        // ~/Library/Application Support on macOS
        if let Some(config_dir) = dirs::config_dir() {
            let platform_path = config_dir.join("pairdiff").join("config.toml");
            if !paths.contains(&platform_path) {
                paths.push(platform_path);
            }
        }

        paths
    }

    /// Get the first existing config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_paths().into_iter().find(|p| p.exists())
    }

    /// Load config from XDG config path
    /// Returns default config if file doesn't exist or can't be parsed
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(&path).ok())
            .and_then(|content| {
                Self::parse(&content)
                    .map_err(|e| {
                        tracing::warn!(error = %e, "failed to parse config, using defaults");
                    })
                    .ok()
            })
            .unwrap_or_default()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Parse algorithm string; unknown names fall back to the default
    pub fn algorithm(&self) -> Option<DiffAlgorithm> {
        let name = self.diff.algorithm.as_deref()?;
        let parsed = DiffAlgorithm::parse(name);
        if parsed.is_none() {
            tracing::warn!(name, "unknown diff algorithm in config");
        }
        parsed
    }
}
