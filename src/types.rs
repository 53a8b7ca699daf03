//! Shared job types passed between the gatherer and the render/extract stages.
//!
//! An [`IconEntry`] is created once per gather pass and handed, unchanged, to
//! whichever stage consumes it. Nothing here is persisted between runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One discovered source-to-output rendering unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconEntry {
    /// File name minus its final extension (`save_edit.svg` → `save_edit`).
    pub name_base: String,
    /// Top-level icon set directory the icon was gathered from
    /// (`eclipse-svg/org.eclipse.ui`).
    pub icon_root: PathBuf,
    /// The SVG document to render.
    pub input_path: PathBuf,
    /// Directory rasterized versions are written into.
    pub output_path: PathBuf,
    /// Directory the desaturated variant is written into, when the icon lives
    /// in an `e*` directory with a `d*` counterpart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled_path: Option<PathBuf>,
    /// Requested output sizes. Gathering leaves this empty; the render stage
    /// derives the size from the document and the scale factor.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sizes: Vec<u32>,
}

impl IconEntry {
    /// Build an entry for `input`, deriving the name from the file name.
    pub fn new(
        icon_root: &Path,
        input: &Path,
        output_path: PathBuf,
        disabled_path: Option<PathBuf>,
    ) -> Self {
        let file_name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            name_base: crate::naming::name_base(&file_name).to_string(),
            icon_root: icon_root.to_path_buf(),
            input_path: input.to_path_buf(),
            output_path,
            disabled_path,
            sizes: Vec::new(),
        }
    }
}

/// How the wizard banner (`wizban`) directory participates in a gather pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FolderState {
    /// Skip `wizban` directories entirely.
    Exclude,
    /// Treat `wizban` like any other directory.
    #[default]
    Include,
    /// Only gather icons whose parent directory is `wizban`.
    Only,
}

impl fmt::Display for FolderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FolderState::Exclude => "exclude",
            FolderState::Include => "include",
            FolderState::Only => "only",
        };
        f.write_str(s)
    }
}

impl FromStr for FolderState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(FolderState::Exclude),
            "include" => Ok(FolderState::Include),
            "only" => Ok(FolderState::Only),
            other => Err(format!(
                "unknown folder state '{other}' (expected exclude, include or only)"
            )),
        }
    }
}
