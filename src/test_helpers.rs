//! Shared test utilities for the iconsmith test suite.
//!
//! Provides a fixture-tree builder for icon and stylesheet layouts, SVG
//! document snippets, and lookup helpers for gathered entries.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tree = IconTree::new()
//!     .svg("icons/full/etool16/save_edit.svg")
//!     .svg_with("icons/full/obj16/wide.svg", &svg_sized("32px", "16px"));
//!
//! let entries = gather(tree.path(), &tree.path().join("out"), &GatherOptions::default()).unwrap();
//! let save = find_entry(&entries, "save_edit");
//! assert!(save.disabled_path.is_some());
//! ```

use std::fs;
use std::path::Path;
use tempfile::TempDir;

use crate::types::IconEntry;

// =========================================================================
// SVG snippets
// =========================================================================

/// A 16×16 icon with one styled, identified shape.
pub const SQUARE_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16">
  <rect id="body" x="0" y="0" width="16" height="16" style="fill:#ff0000;stroke:none"/>
</svg>
"##;

/// An icon declaring its size through `width`/`height` only.
pub fn svg_sized(width: &str, height: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}"><rect width="4" height="4" style="fill:#000"/></svg>"##
    )
}

/// An icon declaring its size through a `viewBox` only.
pub fn svg_view_box(view_box: &str) -> String {
    format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{view_box}"><rect width="4" height="4" style="fill:#000"/></svg>"##
    )
}

// =========================================================================
// Fixture tree builder
// =========================================================================

/// A throwaway directory tree built up file by file.
///
/// Every path is relative to the tree root; parent directories are created
/// as needed.
pub struct IconTree {
    dir: TempDir,
}

impl IconTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Add [`SQUARE_SVG`] at `rel`.
    pub fn svg(self, rel: &str) -> Self {
        self.file(rel, SQUARE_SVG)
    }

    /// Add an SVG with the given content at `rel`.
    pub fn svg_with(self, rel: &str, content: &str) -> Self {
        self.file(rel, content)
    }

    pub fn file(self, rel: &str, content: &str) -> Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        self
    }

    pub fn dir(self, rel: &str) -> Self {
        fs::create_dir_all(self.dir.path().join(rel)).unwrap();
        self
    }

    /// Read a file below the tree root.
    pub fn read(&self, rel: &str) -> String {
        let path = self.dir.path().join(rel);
        fs::read_to_string(&path).unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
    }
}

// =========================================================================
// Entry lookups (panic with a clear message on miss)
// =========================================================================

/// Find a gathered entry by base name. Panics if not found.
pub fn find_entry<'a>(entries: &'a [IconEntry], name: &str) -> &'a IconEntry {
    entries
        .iter()
        .find(|e| e.name_base == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = entries.iter().map(|e| e.name_base.as_str()).collect();
            panic!("icon '{name}' not found. Available: {names:?}")
        })
}

/// Build an entry by hand, outside any gather pass.
pub fn entry(input: &Path, output: &Path, disabled: Option<&Path>) -> IconEntry {
    IconEntry::new(
        input.parent().unwrap_or(input),
        input,
        output.to_path_buf(),
        disabled.map(Path::to_path_buf),
    )
}
