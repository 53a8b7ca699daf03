//! Plugin fragment scaffolding for hi-dpi icon sets.
//!
//! Scaled icons are shipped as OSGi fragments attached to the plugin that
//! owns the native-size icons. Each `<set>.hidpi` output directory gets the
//! three files a PDE build needs:
//!
//! ```text
//! org.eclipse.ui.hidpi/
//! ├── build.properties
//! ├── .project
//! └── META-INF/MANIFEST.MF    # Fragment-Host: org.eclipse.ui
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::error;

const BUILD_PROPERTIES: &str = "bin.includes = META-INF/,icons/,.\n";

fn project_descriptor(set_name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<projectDescription>
    <name>{set_name}.hidpi</name>
    <comment></comment>
    <projects>
    </projects>
    <buildSpec>
        <buildCommand>
            <name>org.eclipse.pde.ManifestBuilder</name>
            <arguments>
            </arguments>
        </buildCommand>
        <buildCommand>
            <name>org.eclipse.pde.SchemaBuilder</name>
            <arguments>
            </arguments>
        </buildCommand>
    </buildSpec>
    <natures>
        <nature>org.eclipse.pde.PluginNature</nature>
    </natures>
</projectDescription>
"#
    )
}

fn manifest(set_name: &str) -> String {
    format!(
        "Manifest-Version: 1.0\n\
         Bundle-ManifestVersion: 2\n\
         Bundle-Name: {set_name}.hidpi\n\
         Bundle-SymbolicName: {set_name}.hidpi\n\
         Bundle-Version: 0.1.0.qualifier\n\
         Fragment-Host: {set_name}\n"
    )
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Write the fragment descriptor files into `output_base`.
///
/// A file that cannot be written is logged and skipped. Returns the files
/// that were written.
pub fn create_fragment_files(output_base: &Path, set_name: &str) -> Vec<PathBuf> {
    let files = [
        (output_base.join("build.properties"), BUILD_PROPERTIES.to_string()),
        (output_base.join(".project"), project_descriptor(set_name)),
        (output_base.join("META-INF/MANIFEST.MF"), manifest(set_name)),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, contents) in files {
        match write_file(&path, &contents) {
            Ok(()) => written.push(path),
            Err(e) => error!("Could not write {}: {}", path.display(), e),
        }
    }
    written
}
