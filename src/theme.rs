//! Theme cloning.
//!
//! A theme is a parallel copy of the stock stylesheets of every icon set:
//!
//! ```text
//! eclipse-css/
//! ├── styles/
//! │   ├── stock.scss          # aggregator, cloned to <theme>.scss
//! │   └── <theme>.scss
//! └── org.eclipse.ui/styles/
//!     ├── stock/…             # extracted per-icon stylesheets
//!     └── <theme>/…           # clone, importing "<theme>" instead of "stock"
//! ```
//!
//! A set without a stock directory is skipped, as is any file that cannot be
//! copied or rewritten. Only a missing css root or an unusable theme name
//! stop the run.

use crate::naming::{STOCK_THEME, STYLES_DIR};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Undefined theme name")]
    MissingName,
    #[error("Invalid theme name '{0}': must be a plain directory name other than 'stock'")]
    InvalidName(String),
    #[error("Source directory '{0}' does not exist")]
    CssRootNotFound(PathBuf),
}

const STOCK_DESCRIPTION: &str = "Stock.scss provides the original Eclipse icon styles.";

/// What a clone run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub theme: String,
    /// Icon sets whose stock stylesheets were copied.
    pub cloned_sets: Vec<String>,
    /// Icon sets left untouched (no stock directory, or the old theme
    /// directory could not be removed).
    pub skipped_sets: Vec<String>,
    /// Stylesheets copied across all sets.
    pub files_copied: usize,
    /// The new aggregator sheet, if it was written.
    pub aggregator: Option<PathBuf>,
    /// Files that failed to copy or rewrite.
    pub file_errors: usize,
}

fn validate_name(name: &str) -> Result<(), ThemeError> {
    if name.trim().is_empty() {
        return Err(ThemeError::MissingName);
    }
    let plain = Path::new(name).file_name().is_some_and(|n| n == name);
    if !plain || name == STOCK_THEME {
        return Err(ThemeError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// Rewrite the stock import of one cloned stylesheet.
fn rename_import(path: &Path, theme: &str) -> io::Result<()> {
    let content = fs::read_to_string(path)?;
    let renamed = content.replace(
        &format!("@import \"{STOCK_THEME}\""),
        &format!("@import \"{theme}\""),
    );
    fs::write(path, renamed)
}

/// Copy `from` into `to` recursively, rewriting the import of every `.scss`
/// on the way.
fn copy_theme_tree(from: &Path, to: &Path, theme: &str, report: &mut CloneReport) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in WalkDir::new(from).min_depth(1).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error walking {}: {}", from.display(), e);
                report.file_errors += 1;
                continue;
            }
        };
        let Ok(rel) = entry.path().strip_prefix(from) else {
            continue;
        };
        let dest = to.join(rel);

        if entry.file_type().is_dir() {
            if let Err(e) = fs::create_dir_all(&dest) {
                error!("Error creating {}: {}", dest.display(), e);
                report.file_errors += 1;
            }
            continue;
        }

        if let Err(e) = fs::copy(entry.path(), &dest) {
            error!("Error copying {}: {}", entry.path().display(), e);
            report.file_errors += 1;
            continue;
        }
        report.files_copied += 1;

        if dest.extension().is_some_and(|ext| ext == "scss")
            && let Err(e) = rename_import(&dest, theme)
        {
            error!("Error creating theme icon style {}: {}", dest.display(), e);
            report.file_errors += 1;
        }
    }
    Ok(())
}

fn clone_set(set_dir: &Path, theme: &str, report: &mut CloneReport) -> bool {
    let styles = set_dir.join(STYLES_DIR);
    let stock = styles.join(STOCK_THEME);
    if !stock.is_dir() {
        error!("Source dir doesn't exist: {}", stock.display());
        return false;
    }

    let dest = styles.join(theme);
    if dest.exists()
        && let Err(e) = fs::remove_dir_all(&dest)
    {
        error!("Error deleting existing theme directory {}: {}", dest.display(), e);
        return false;
    }

    match copy_theme_tree(&stock, &dest, theme, report) {
        Ok(()) => true,
        Err(e) => {
            error!("Error creating new theme directory {}: {}", dest.display(), e);
            false
        }
    }
}

/// Write `styles/<theme>.scss` from the stock aggregator.
fn clone_aggregator(css_root: &Path, theme: &str) -> io::Result<PathBuf> {
    let styles = css_root.join(STYLES_DIR);
    let stock = fs::read_to_string(styles.join(format!("{STOCK_THEME}.scss")))?;
    let described = stock.replace(
        STOCK_DESCRIPTION,
        &format!("{theme}.scss <enter description here>"),
    );
    let target = styles.join(format!("{theme}.scss"));
    fs::write(&target, described)?;
    Ok(target)
}

/// Clone the stock theme of every icon set under `css_root` into `theme`.
pub fn clone_theme(css_root: &Path, theme: &str) -> Result<CloneReport, ThemeError> {
    validate_name(theme)?;
    if !css_root.is_dir() {
        return Err(ThemeError::CssRootNotFound(css_root.to_path_buf()));
    }

    let mut sets: Vec<PathBuf> = fs::read_dir(css_root)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && path.file_name().is_some_and(|n| n != STYLES_DIR))
        .collect();
    sets.sort();

    let mut report = CloneReport {
        theme: theme.to_string(),
        ..Default::default()
    };

    for set_dir in &sets {
        let name = set_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if clone_set(set_dir, theme, &mut report) {
            debug!("Cloned {STOCK_THEME} styles of {name} to {theme}");
            report.cloned_sets.push(name);
        } else {
            report.skipped_sets.push(name);
        }
    }

    match clone_aggregator(css_root, theme) {
        Ok(path) => report.aggregator = Some(path),
        Err(e) => {
            error!("Error creating theme aggregator {theme}.scss: {e}");
            report.file_errors += 1;
        }
    }

    info!(
        "Created theme {} for {} icon sets ({} skipped)",
        theme,
        report.cloned_sets.len(),
        report.skipped_sets.len()
    );
    Ok(report)
}
