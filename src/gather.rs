//! Icon discovery.
//!
//! Walks an icon set and turns every renderable SVG into an [`IconEntry`].
//! The walk is driven entirely by directory naming conventions:
//!
//! ```text
//! org.eclipse.ui/                     # source root (icon set)
//! └── icons/full/
//!     ├── etool16/save_edit.svg       # job, disabled variant → dtool16/
//!     ├── etool16/save_edit@2x.svg    # skipped: already scaled
//!     ├── dtool16/                    # pruned: disabled marker
//!     ├── dgm/chart.svg               # job (dgm is not a disabled marker)
//!     ├── obj16/file.svg              # job, no disabled variant
//!     └── wizban/new_wiz.svg          # job, subject to the banner state
//! ```
//!
//! Output directories mirror the source layout below the output base:
//!
//! ```text
//! <output base>/icons/full/etool16/save_edit.png
//! <output base>/icons/full/dtool16/save_edit.png   # disabled variant
//! ```
//!
//! Entries come back in a stable order (depth-first, sorted by file name).

use crate::config::PipelineConfig;
use crate::naming;
use crate::types::{FolderState, IconEntry};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum GatherError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
}

/// Everything that decides which files become jobs.
#[derive(Debug, Clone)]
pub struct GatherOptions {
    /// File name suffix of renderable sources.
    pub extension: String,
    /// Resolve disabled-variant output directories for `e*` directories.
    pub disabled_variants: bool,
    pub banners: FolderState,
    /// Keep only files whose full path contains this.
    pub path_filter: Option<String>,
    /// Keep only files whose name contains this.
    pub icon_filter: Option<String>,
}

impl Default for GatherOptions {
    fn default() -> Self {
        Self {
            extension: "svg".to_string(),
            disabled_variants: true,
            banners: FolderState::Include,
            path_filter: None,
            icon_filter: None,
        }
    }
}

impl GatherOptions {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            disabled_variants: config.render.disabled_variants,
            banners: config.render.banners,
            path_filter: config.filter.path.clone(),
            icon_filter: config.filter.icon.clone(),
            ..Self::default()
        }
    }

    /// Whether the walk descends into `entry` (directories only).
    fn descend(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }
        let name = entry.file_name().to_string_lossy();
        if naming::is_disabled_marker(&name) {
            return false;
        }
        !(self.banners == FolderState::Exclude && name == naming::BANNER_DIR)
    }

    /// Whether a file found by the walk becomes a job.
    fn accepts(&self, path: &Path) -> bool {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };
        if !file_name.ends_with(self.extension.as_str()) || naming::has_scaled_marker(&file_name) {
            return false;
        }
        if let Some(filter) = &self.icon_filter
            && !file_name.contains(filter.as_str())
        {
            return false;
        }
        if let Some(filter) = &self.path_filter {
            let full = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
            if !full.to_string_lossy().contains(filter.as_str()) {
                return false;
            }
        }
        if self.banners == FolderState::Only {
            let parent = path.parent().and_then(|p| p.file_name());
            return parent.is_some_and(|p| p == naming::BANNER_DIR);
        }
        true
    }
}

/// Gather every renderable icon below `source_root`.
///
/// Each entry's output directory is `output_base` joined with the source
/// file's directory relative to `source_root`.
pub fn gather(
    source_root: &Path,
    output_base: &Path,
    options: &GatherOptions,
) -> Result<Vec<IconEntry>, GatherError> {
    if !source_root.is_dir() {
        return Err(GatherError::SourceNotFound(source_root.to_path_buf()));
    }

    let mut entries = Vec::new();
    let walker = WalkDir::new(source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| options.descend(e));

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() || !options.accepts(entry.path()) {
            continue;
        }

        let path = entry.path();
        let parent = path.parent().unwrap_or(source_root);
        let relative = parent.strip_prefix(source_root).unwrap_or(Path::new(""));
        let output_path = output_base.join(relative);

        let disabled_path = if options.disabled_variants {
            disabled_output_dir(source_root, parent, output_base)
        } else {
            None
        };

        debug!("Gathered {}", path.display());
        entries.push(IconEntry::new(
            source_root,
            path,
            output_path,
            disabled_path,
        ));
    }

    Ok(entries)
}

/// Output directory for the disabled variant of icons in `parent`, when
/// `parent` is an enabled (`e*`) directory inside `source_root`.
fn disabled_output_dir(source_root: &Path, parent: &Path, output_base: &Path) -> Option<PathBuf> {
    let dir_name = parent.file_name()?.to_string_lossy();
    let sibling = naming::disabled_sibling(&dir_name)?;
    let relative = parent.parent()?.strip_prefix(source_root).ok()?;
    Some(output_base.join(relative).join(sibling))
}

/// An icon set found under the svg root, with its gathered jobs.
#[derive(Debug, Clone)]
pub struct IconSet {
    pub name: String,
    pub source: PathBuf,
    pub output_base: PathBuf,
    pub icons: Vec<IconEntry>,
}

/// Gather every icon set directly under `svg_root`.
///
/// Each set renders into `<output_dir>/<set>`, or `<output_dir>/<set>.hidpi`
/// when `hidpi` is set. Sets come back sorted by name; plain files under the
/// root are ignored.
pub fn gather_icon_sets(
    svg_root: &Path,
    output_dir: &Path,
    hidpi: bool,
    options: &GatherOptions,
) -> Result<Vec<IconSet>, GatherError> {
    if !svg_root.is_dir() {
        return Err(GatherError::SourceNotFound(svg_root.to_path_buf()));
    }

    let mut set_dirs: Vec<(String, PathBuf)> = fs::read_dir(svg_root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .map(|e| (e.file_name().to_string_lossy().into_owned(), e.path()))
        .collect();
    set_dirs.sort();

    let mut sets = Vec::with_capacity(set_dirs.len());
    for (name, source) in set_dirs {
        let output_base = output_dir.join(naming::icon_set_output_name(&name, hidpi));
        let icons = gather(&source, &output_base, options)?;
        sets.push(IconSet {
            name,
            source,
            output_base,
            icons,
        });
    }
    Ok(sets)
}
