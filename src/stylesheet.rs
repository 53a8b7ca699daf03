//! Per-icon stylesheet compilation.
//!
//! Themed renders style each icon through a compiled CSS sheet that sits
//! next to its `.scss` source:
//!
//! ```text
//! eclipse-css/org.eclipse.ui/styles/dark/full/etool16/
//! ├── save_edit.scss     # source, @imports the theme partial
//! └── save_edit.css      # compiled on demand
//! ```
//!
//! Compilation is delegated to a [`StylesheetCompiler`]. The production
//! [`SassCompiler`] shells out to the `sass` executable; tests substitute a
//! recording fake.
//!
//! Extracted sheets refer to gradients and patterns of their icon through
//! the icon's path (`url(../../…/obj16/file.svg#grad1)`). The rasterizer
//! only resolves references within the document it renders, so
//! [`localize_references`] turns those back into `url(#grad1)` before a
//! compiled sheet is applied.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("could not delete existing stylesheet {path}: {source}")]
    StaleOutput { path: PathBuf, source: io::Error },
    #[error("could not run '{program}' (is it installed?): {source}")]
    Spawn { program: String, source: io::Error },
    #[error("'{program}' exited with {status}")]
    Failed { program: String, status: ExitStatus },
}

/// Capability: compile one stylesheet source into a CSS file.
pub trait StylesheetCompiler: Sync {
    /// Compile `source` into `output`, resolving imports against
    /// `include_dir`.
    fn compile(&self, source: &Path, include_dir: &Path, output: &Path)
    -> Result<(), CompileError>;
}

/// Runs `sass --sourcemap=none -I<include> <source> <output>` from the
/// source's directory.
#[derive(Debug, Clone)]
pub struct SassCompiler {
    program: String,
}

impl SassCompiler {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, source: &Path, include_dir: &Path, output: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("--sourcemap=none")
            .arg(format!("-I{}", include_dir.display()))
            .arg(source)
            .arg(output);
        if let Some(dir) = source.parent() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl Default for SassCompiler {
    fn default() -> Self {
        Self::new("sass")
    }
}

impl StylesheetCompiler for SassCompiler {
    fn compile(
        &self,
        source: &Path,
        include_dir: &Path,
        output: &Path,
    ) -> Result<(), CompileError> {
        // The child runs in the source's directory, so relative paths would
        // no longer resolve.
        let source = std::path::absolute(source)?;
        let include_dir = std::path::absolute(include_dir)?;
        let output = std::path::absolute(output)?;

        let mut cmd = self.command(&source, &include_dir, &output);
        info!(
            "Running stylesheet compiler: {} --sourcemap=none -I{} {} {}",
            self.program,
            include_dir.display(),
            source.display(),
            output.display()
        );
        let status = cmd.status().map_err(|source| CompileError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        if !status.success() {
            return Err(CompileError::Failed {
                program: self.program.clone(),
                status,
            });
        }
        Ok(())
    }
}

/// Make sure the compiled sheet for `source` exists, compiling it when it
/// is missing or when `regenerate` is set (an existing sheet is deleted
/// first). Returns the compiled sheet's path.
pub fn ensure_compiled<C: StylesheetCompiler + ?Sized>(
    compiler: &C,
    source: &Path,
    name_base: &str,
    include_dir: &Path,
    regenerate: bool,
) -> Result<PathBuf, CompileError> {
    let output = crate::naming::compiled_stylesheet_path(source, name_base);

    if regenerate && output.exists() {
        fs::remove_file(&output).map_err(|source| CompileError::StaleOutput {
            path: output.clone(),
            source,
        })?;
    }

    if regenerate || !output.exists() {
        compiler.compile(source, include_dir, &output)?;
    } else {
        debug!("Reusing compiled stylesheet {}", output.display());
    }

    Ok(output)
}

/// Rewrite every `url(<path>#id)` whose path names `document` to `url(#id)`.
///
/// `document` is the reference written at extraction time, as returned by
/// [`url_prefix`](crate::extract::url_prefix). Leading `../` steps are
/// ignored on both sides, so a path the compiler normalized still matches.
/// Quoted urls are unquoted when rewritten; references to other documents
/// are left untouched.
pub fn localize_references(css: &str, document: &str) -> String {
    let target = strip_parent_steps(document);
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("url(") {
        let (head, tail) = rest.split_at(start + "url(".len());
        out.push_str(head);
        let Some(end) = tail.find(')') else {
            rest = tail;
            break;
        };
        let inner = tail[..end].trim().trim_matches(['"', '\'']);
        match inner.rsplit_once('#') {
            Some((path, id)) if names_document(path, target) => {
                out.push('#');
                out.push_str(id);
            }
            _ => out.push_str(&tail[..end]),
        }
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn strip_parent_steps(path: &str) -> &str {
    let mut path = path.trim();
    while let Some(stripped) = path.strip_prefix("../") {
        path = stripped;
    }
    path
}

fn names_document(path: &str, target: &str) -> bool {
    let path = strip_parent_steps(path);
    !target.is_empty()
        && (path == target
            || path
                .strip_suffix(target)
                .is_some_and(|head| head.ends_with('/')))
}
