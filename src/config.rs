//! Pipeline configuration.
//!
//! Settings come from three layers, later layers winning:
//!
//! 1. stock defaults ([`PipelineConfig::default`])
//! 2. an optional `iconsmith.toml` in the working directory
//! 3. command-line flags (applied by `main`)
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! source = "eclipse-svg"    # Directory holding the SVG icon sets
//! target = "eclipse-png"    # Output directory name for rendered PNGs
//! styles = "eclipse-css"    # Directory holding per-icon stylesheets
//!
//! [render]
//! scale = 1.0               # Output scale factor (1, 1.5 and 2 are usual)
//! create_fragments = true   # Put hi-dpi output into separate `.hidpi` sets
//! banners = "include"       # wizban handling: exclude | include | only
//! disabled_variants = true  # Derive grayed-out icons for e*/d* pairs
//!
//! [styles]
//! # theme = "dark"          # Render through per-icon stylesheets of this theme
//! regenerate = false        # Recompile stylesheets even if a .css exists
//! compiler = "sass"         # Stylesheet preprocessor executable
//!
//! [filter]
//! # path = "org.eclipse.ui" # Only gather icons whose path contains this
//! # icon = "save"           # Only gather icons whose file name contains this
//!
//! [processing]
//! # max_processes = 4       # Max render workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::naming;
use crate::types::FolderState;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Full pipeline configuration, loaded from `iconsmith.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    pub render: RenderConfig,
    pub styles: StylesConfig,
    pub filter: FilterConfig,
    pub processing: ProcessingConfig,
}

impl PipelineConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.render.scale.is_finite() || self.render.scale < 1.0 {
            return Err(ConfigError::Validation(
                "render.scale must be a number >= 1".into(),
            ));
        }
        for (key, value) in [
            ("paths.source", &self.paths.source),
            ("paths.target", &self.paths.target),
            ("paths.styles", &self.paths.styles),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.styles.theme.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "styles.theme must not be empty when set".into(),
            ));
        }
        if self.styles.compiler.trim().is_empty() {
            return Err(ConfigError::Validation(
                "styles.compiler must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// `true` when output goes into separate `.hidpi` fragment sets.
    pub fn hidpi_fragments(&self) -> bool {
        self.render.scale != 1.0 && self.render.create_fragments
    }
}

/// Source and output directory names, relative to the working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub source: String,
    pub target: String,
    pub styles: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: naming::SVG_ROOT.to_string(),
            target: naming::PNG_ROOT.to_string(),
            styles: naming::CSS_ROOT.to_string(),
        }
    }
}

/// Rasterization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Multiplier applied to every icon's native dimensions.
    pub scale: f64,
    /// Write hi-dpi output into `<set>.hidpi` fragments instead of next to
    /// the native-size icons.
    pub create_fragments: bool,
    /// How the wizard banner directory participates.
    pub banners: FolderState,
    /// Derive disabled variants for icons in `e*` directories.
    pub disabled_variants: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            create_fragments: true,
            banners: FolderState::Include,
            disabled_variants: true,
        }
    }
}

/// External stylesheet settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StylesConfig {
    /// Theme to render with. `None` renders with the icons' inline styles.
    pub theme: Option<String>,
    /// Recompile stylesheets even when a compiled `.css` already exists.
    pub regenerate: bool,
    /// Preprocessor executable.
    pub compiler: String,
}

impl Default for StylesConfig {
    fn default() -> Self {
        Self {
            theme: None,
            regenerate: false,
            compiler: "sass".to_string(),
        }
    }
}

/// Substring filters restricting which icons are gathered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Keep only files whose full path contains this.
    pub path: Option<String>,
    /// Keep only files whose name contains this.
    pub icon: Option<String>,
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel render workers.
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

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PipelineConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
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

/// Load a config file as a raw TOML value. `Ok(None)` if it does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<PipelineConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: PipelineConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the config file at `path` on top of stock defaults.
///
/// A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<PipelineConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(path)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `iconsmith.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# iconsmith configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Directory names, relative to the working directory
# ---------------------------------------------------------------------------
[paths]
# SVG icon sets, one directory per set.
source = "eclipse-svg"

# Rendered PNGs. Theme and hi-dpi suffixes are appended
# (eclipse-png-dark-hidpi).
target = "eclipse-png"

# Per-icon stylesheets, mirroring the icon tree.
styles = "eclipse-css"

# ---------------------------------------------------------------------------
# Rasterization
# ---------------------------------------------------------------------------
[render]
# Multiplier on native icon size. 1, 1.5 and 2 are the usual values.
scale = 1.0

# Write scaled output into separate <set>.hidpi plugin fragments.
create_fragments = true

# Wizard banner (wizban) handling: "exclude", "include" or "only".
banners = "include"

# Derive desaturated icons for enabled (e*) directories.
disabled_variants = true

# ---------------------------------------------------------------------------
# External stylesheets
# ---------------------------------------------------------------------------
[styles]
# Render through the per-icon stylesheets of this theme.
# theme = "stock"

# Recompile stylesheets even when a compiled .css already exists.
regenerate = false

# Stylesheet preprocessor executable.
compiler = "sass"

# ---------------------------------------------------------------------------
# Gather filters
# ---------------------------------------------------------------------------
[filter]
# Only gather icons whose path contains this substring.
# path = "org.eclipse.ui"

# Only gather icons whose file name contains this substring.
# icon = "save"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
