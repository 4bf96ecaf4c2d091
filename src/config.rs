//! Build configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. The file lives at
//! the content root and is layered over the stock defaults, so it only needs
//! the keys it wants to change.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Build config (overrides stock defaults)
//! ├── config.json              # Site data, see the content module
//! └── docs/
//!     └── db.json
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [rendering]
//! code_theme = "material-theme-darker"
//! template = "docs"         # "docs" or "page"
//!
//! [[collections]]
//! name = "docs"
//! db = "docs/db.json"       # Relative to the content root
//!
//! [layout]
//! sidebar_width = "16rem"
//! content_max_width = "48rem"
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#1f2328"
//! text_muted = "#656d76"    # Sidebar titles, footer, pagination labels
//! border = "#d0d7de"
//! link = "#0969da"
//! link_hover = "#0550ae"
//!
//! [colors.dark]
//! background = "#0d1117"
//! text = "#e6edf3"
//! text_muted = "#8d96a0"
//! border = "#30363d"
//! link = "#4493f8"
//! link_hover = "#79c0ff"
//!
//! [processing]
//! max_processes = 4         # Max parallel render workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Override just the values you want:
//!
//! ```toml
//! [rendering]
//! code_theme = "nord"
//! ```
//!
//! A `[[collections]]` list replaces the default list as a whole. Unknown
//! keys are rejected to catch typos early.

use crate::theme::{CodeTheme, TemplateName};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Build configuration loaded from `config.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Code theme and page template.
    pub rendering: RenderingConfig,
    /// Collections to render, in order.
    pub collections: Vec<CollectionConfig>,
    /// Sidebar and article widths.
    pub layout: LayoutConfig,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate the merged config.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.collections.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[collections]] entry is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for collection in &self.collections {
            if collection.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "collections.name must not be empty".into(),
                ));
            }
            if collection.db.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "collections.db must not be empty (collection {})",
                    collection.name
                )));
            }
            if !seen.insert(collection.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate collection name: {}",
                    collection.name
                )));
            }
        }
        if self.layout.sidebar_width.trim().is_empty()
            || self.layout.content_max_width.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "layout widths must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn collection(&self, name: &str) -> Option<&CollectionConfig> {
        self.collections.iter().find(|c| c.name == name)
    }
}

/// Renderer selectors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderingConfig {
    /// Syntax-highlighting theme name for code blocks.
    pub code_theme: CodeTheme,
    /// Page template wrapping each entry.
    pub template: TemplateName,
}

/// One collection: a name and the `db.json` listing its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CollectionConfig {
    pub name: String,
    /// Path to the collection's `db.json`, relative to the content root.
    pub db: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            name: "docs".to_string(),
            db: "docs/db.json".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

/// Page layout widths (CSS values).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub sidebar_width: String,
    pub content_max_width: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sidebar_width: "16rem".to_string(),
            content_max_width: "48rem".to_string(),
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    pub background: String,
    pub text: String,
    /// Secondary text (sidebar titles, footer, pagination labels).
    pub text_muted: String,
    pub border: String,
    pub link: String,
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#1f2328".to_string(),
            text_muted: "#656d76".to_string(),
            border: "#d0d7de".to_string(),
            link: "#0969da".to_string(),
            link_hover: "#0550ae".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0d1117".to_string(),
            text: "#e6edf3".to_string(),
            text_muted: "#8d96a0".to_string(),
            border: "#30363d".to_string(),
            link: "#4493f8".to_string(),
            link_hover: "#79c0ff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    let mut value = toml::Value::try_from(SiteConfig::default())?;
    // Deserialization default is an empty list; the stock layer carries the docs collection.
    if let toml::Value::Table(table) = &mut value {
        table.insert(
            "collections".to_string(),
            toml::Value::try_from(vec![CollectionConfig::default()])?,
        );
    }
    Ok(value)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay (arrays included) replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    if overlay.is_none() {
        tracing::debug!(root = %root.display(), "No config.toml, using stock defaults");
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Simple Docs Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root (next to config.json).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Rendering
# ---------------------------------------------------------------------------
[rendering]
# Code block theme. One of:
#   css-variables, dark-plus, dracula-soft, dracula, github-dark-dimmed,
#   github-dark, github-light, hc_light, light-plus, material-theme-darker,
#   material-theme-lighter, material-theme-ocean, material-theme-palenight,
#   material-theme, min-dark, min-light, monokai, nord, one-dark-pro,
#   poimandres, rose-pine-dawn, rose-pine-moon, rose-pine, slack-dark,
#   slack-ochin, solarized-dark, solarized-light, vitesse-dark, vitesse-light
code_theme = "material-theme-darker"

# Page template: "docs" (sidebar, toc, pagination) or "page" (article only).
template = "docs"

# ---------------------------------------------------------------------------
# Collections
# ---------------------------------------------------------------------------
# Each collection is an ordered db.json of entries. Listing collections here
# replaces the default list.
[[collections]]
name = "docs"
db = "docs/db.json"

# ---------------------------------------------------------------------------
# Layout
# ---------------------------------------------------------------------------
[layout]
sidebar_width = "16rem"
content_max_width = "48rem"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#1f2328"
text_muted = "#656d76"    # Sidebar titles, footer, pagination labels
border = "#d0d7de"
link = "#0969da"
link_hover = "#0550ae"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0d1117"
text = "#e6edf3"
text_muted = "#8d96a0"
border = "#30363d"
link = "#4493f8"
link_hover = "#79c0ff"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}

/// Generate CSS custom properties from layout config.
pub fn generate_layout_css(layout: &LayoutConfig) -> String {
    format!(
        r#":root {{
    --sidebar-width: {sidebar_width};
    --content-max-width: {content_max_width};
}}"#,
        sidebar_width = layout.sidebar_width,
        content_max_width = layout.content_max_width,
    )
}
