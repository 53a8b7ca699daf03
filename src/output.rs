//! CLI output formatting for all pipeline stages.
//!
//! # Information-First Display
//!
//! Every icon is shown by its name first, with filesystem paths as indented
//! context lines relative to the directory the command runs in. Paths are
//! long and repetitive in an icon tree; names are what people scan for.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! org.eclipse.ui (2 icons) → eclipse-png/org.eclipse.ui
//!     001 save_edit
//!         Source: icons/full/etool16/save_edit.svg
//!         Disabled: icons/full/dtool16
//!     002 file
//!         Source: icons/full/obj16/file.svg
//!
//! Gathered 1 icon set, 2 icons
//! ```
//!
//! ## Render
//!
//! ```text
//! save_edit → eclipse-png/org.eclipse.ui/icons/full/etool16/save_edit@2x.png (32x32)
//!     Disabled: eclipse-png/org.eclipse.ui/icons/full/dtool16/save_edit@2x.png
//! FAILED broken: SVG parse error: …
//!     Source: eclipse-svg/org.eclipse.ui/icons/full/obj16/broken.svg
//!
//! Rendered 1 of 2 icons in 1.4s (1 failed)
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::extract::ExtractSummary;
use crate::gather::IconSet;
use crate::render::{RenderEvent, RenderSummary};
use crate::theme::CloneReport;
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `path` relative to `base` when it lies below it, as-is otherwise.
fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

/// `1 icon`, `2 icons`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Milliseconds below one second, tenths of a second above.
fn format_elapsed(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

// ============================================================================
// Check output
// ============================================================================

/// Format the gathered job list, one block per icon set.
pub fn format_check_output(sets: &[IconSet], working_dir: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;

    for set in sets {
        lines.push(format!(
            "{} ({}) \u{2192} {}",
            set.name,
            plural(set.icons.len(), "icon"),
            display_path(&set.output_base, working_dir)
        ));
        for (i, icon) in set.icons.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), icon.name_base));
            lines.push(format!(
                "{}Source: {}",
                indent(2),
                display_path(&icon.input_path, &set.source)
            ));
            if let Some(disabled) = &icon.disabled_path {
                lines.push(format!(
                    "{}Disabled: {}",
                    indent(2),
                    display_path(disabled, &set.output_base)
                ));
            }
        }
        total += set.icons.len();
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Gathered {}, {}",
        plural(sets.len(), "icon set"),
        plural(total, "icon")
    ));
    lines
}

/// Print the gathered job list to stdout.
pub fn print_check_output(sets: &[IconSet], working_dir: &Path) {
    for line in format_check_output(sets, working_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Render output
// ============================================================================

/// Format a single render progress event as display lines.
pub fn format_render_event(event: &RenderEvent, working_dir: &Path) -> Vec<String> {
    match event {
        RenderEvent::Rendered(icon) => {
            let mut lines = vec![format!(
                "{} \u{2192} {} ({}x{})",
                icon.name,
                display_path(&icon.output, working_dir),
                icon.width,
                icon.height
            )];
            if let Some(disabled) = &icon.disabled_output {
                lines.push(format!(
                    "{}Disabled: {}",
                    indent(1),
                    display_path(disabled, working_dir)
                ));
            }
            lines
        }
        RenderEvent::Failed(icon) => vec![
            format!("FAILED {}: {}", icon.name, icon.reason),
            format!("{}Source: {}", indent(1), display_path(&icon.source, working_dir)),
        ],
    }
}

/// Format the closing summary of a render run.
pub fn format_render_summary(summary: &RenderSummary) -> Vec<String> {
    let mut headline = format!(
        "Rendered {} of {} in {}",
        summary.rendered,
        plural(summary.total, "icon"),
        format_elapsed(summary.elapsed_ms)
    );
    if summary.failed > 0 {
        headline.push_str(&format!(" ({} failed)", summary.failed));
    }

    let mut lines = vec![headline];
    if !summary.failures.is_empty() {
        lines.push("Failures".to_string());
        for failure in &summary.failures {
            lines.push(format!("{}{}: {}", indent(1), failure.name, failure.reason));
        }
    }
    lines
}

/// Print the render summary to stdout.
pub fn print_render_summary(summary: &RenderSummary) {
    for line in format_render_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Extract and theme output
// ============================================================================

/// Format the closing summary of a stylesheet extraction run.
pub fn format_extract_summary(summary: &ExtractSummary) -> Vec<String> {
    let mut line = format!(
        "Extracted {} of {} in {}",
        summary.written,
        plural(summary.total, "stylesheet"),
        format_elapsed(summary.elapsed_ms)
    );
    if summary.failed > 0 {
        line.push_str(&format!(" ({} failed)", summary.failed));
    }
    vec![line]
}

pub fn print_extract_summary(summary: &ExtractSummary) {
    for line in format_extract_summary(summary) {
        println!("{}", line);
    }
}

/// Format the outcome of a theme clone.
pub fn format_clone_report(report: &CloneReport, working_dir: &Path) -> Vec<String> {
    let mut lines = vec![format!("Theme {}", report.theme)];
    for set in &report.cloned_sets {
        lines.push(format!("{}{}", indent(1), set));
    }
    for set in &report.skipped_sets {
        lines.push(format!("{}{} (skipped)", indent(1), set));
    }
    if let Some(aggregator) = &report.aggregator {
        lines.push(format!(
            "{}Aggregator: {}",
            indent(1),
            display_path(aggregator, working_dir)
        ));
    }

    let mut summary = format!(
        "Cloned {}, {}",
        plural(report.cloned_sets.len(), "icon set"),
        plural(report.files_copied, "stylesheet")
    );
    if report.file_errors > 0 {
        summary.push_str(&format!(" ({} errors)", report.file_errors));
    }
    lines.push(summary);
    lines
}

pub fn print_clone_report(report: &CloneReport, working_dir: &Path) {
    for line in format_clone_report(report, working_dir) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{FailedIcon, RenderedIcon};
    use crate::test_helpers::entry;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn display_path_strips_base() {
        assert_eq!(
            display_path(Path::new("/work/eclipse-png/a.png"), Path::new("/work")),
            "eclipse-png/a.png"
        );
    }

    #[test]
    fn display_path_outside_base_is_unchanged() {
        assert_eq!(
            display_path(Path::new("/other/a.png"), Path::new("/work")),
            "/other/a.png"
        );
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(0, "icon"), "0 icons");
        assert_eq!(plural(1, "icon"), "1 icon");
        assert_eq!(plural(2, "icon set"), "2 icon sets");
    }

    #[test]
    fn elapsed_formats() {
        assert_eq!(format_elapsed(0), "0ms");
        assert_eq!(format_elapsed(999), "999ms");
        assert_eq!(format_elapsed(1000), "1.0s");
        assert_eq!(format_elapsed(12_345), "12.3s");
    }

    // =========================================================================
    // Check output tests
    // =========================================================================

    fn sample_set() -> IconSet {
        let source = PathBuf::from("/work/eclipse-svg/org.eclipse.ui");
        let output = PathBuf::from("/work/eclipse-png/org.eclipse.ui");
        IconSet {
            name: "org.eclipse.ui".to_string(),
            icons: vec![
                entry(
                    &source.join("icons/full/etool16/save_edit.svg"),
                    &output.join("icons/full/etool16"),
                    Some(&output.join("icons/full/dtool16")),
                ),
                entry(
                    &source.join("icons/full/obj16/file.svg"),
                    &output.join("icons/full/obj16"),
                    None,
                ),
            ],
            source,
            output_base: output,
        }
    }

    #[test]
    fn check_output_lists_icons_per_set() {
        let lines = format_check_output(&[sample_set()], Path::new("/work"));
        assert_eq!(
            lines,
            vec![
                "org.eclipse.ui (2 icons) \u{2192} eclipse-png/org.eclipse.ui",
                "    001 save_edit",
                "        Source: icons/full/etool16/save_edit.svg",
                "        Disabled: icons/full/dtool16",
                "    002 file",
                "        Source: icons/full/obj16/file.svg",
                "",
                "Gathered 1 icon set, 2 icons",
            ]
        );
    }

    #[test]
    fn check_output_empty() {
        assert_eq!(
            format_check_output(&[], Path::new("/work")),
            vec!["Gathered 0 icon sets, 0 icons"]
        );
    }

    // =========================================================================
    // Render output tests
    // =========================================================================

    #[test]
    fn rendered_event_with_disabled_variant() {
        let event = RenderEvent::Rendered(RenderedIcon {
            name: "save_edit".to_string(),
            output: PathBuf::from("/work/eclipse-png/etool16/save_edit@2x.png"),
            width: 32,
            height: 32,
            disabled_output: Some(PathBuf::from("/work/eclipse-png/dtool16/save_edit@2x.png")),
            stylesheet: None,
        });
        let lines = format_render_event(&event, Path::new("/work"));
        assert_eq!(
            lines,
            vec![
                "save_edit \u{2192} eclipse-png/etool16/save_edit@2x.png (32x32)",
                "    Disabled: eclipse-png/dtool16/save_edit@2x.png",
            ]
        );
    }

    #[test]
    fn rendered_event_without_disabled_variant() {
        let event = RenderEvent::Rendered(RenderedIcon {
            name: "file".to_string(),
            output: PathBuf::from("/work/out/file.png"),
            width: 16,
            height: 24,
            disabled_output: None,
            stylesheet: None,
        });
        assert_eq!(
            format_render_event(&event, Path::new("/work")),
            vec!["file \u{2192} out/file.png (16x24)"]
        );
    }

    #[test]
    fn failed_event_shows_reason_and_source() {
        let event = RenderEvent::Failed(FailedIcon {
            name: "broken".to_string(),
            source: PathBuf::from("/work/eclipse-svg/set/broken.svg"),
            reason: "Missing dimensions".to_string(),
        });
        assert_eq!(
            format_render_event(&event, Path::new("/work")),
            vec![
                "FAILED broken: Missing dimensions",
                "    Source: eclipse-svg/set/broken.svg",
            ]
        );
    }

    #[test]
    fn render_summary_all_succeeded() {
        let summary = RenderSummary {
            rendered: 3,
            failed: 0,
            total: 3,
            elapsed_ms: 1400,
            failures: vec![],
        };
        assert_eq!(
            format_render_summary(&summary),
            vec!["Rendered 3 of 3 icons in 1.4s"]
        );
    }

    #[test]
    fn render_summary_lists_failures() {
        let summary = RenderSummary {
            rendered: 1,
            failed: 1,
            total: 2,
            elapsed_ms: 40,
            failures: vec![FailedIcon {
                name: "broken".to_string(),
                source: PathBuf::from("broken.svg"),
                reason: "bad".to_string(),
            }],
        };
        assert_eq!(
            format_render_summary(&summary),
            vec![
                "Rendered 1 of 2 icons in 40ms (1 failed)",
                "Failures",
                "    broken: bad",
            ]
        );
    }

    // =========================================================================
    // Extract and theme output tests
    // =========================================================================

    #[test]
    fn extract_summary_line() {
        let summary = ExtractSummary {
            written: 4,
            failed: 1,
            total: 5,
            elapsed_ms: 12,
        };
        assert_eq!(
            format_extract_summary(&summary),
            vec!["Extracted 4 of 5 stylesheets in 12ms (1 failed)"]
        );
    }

    #[test]
    fn clone_report_lines() {
        let report = CloneReport {
            theme: "dark".to_string(),
            cloned_sets: vec!["org.eclipse.ui".to_string()],
            skipped_sets: vec!["org.eclipse.empty".to_string()],
            files_copied: 1,
            aggregator: Some(PathBuf::from("/work/eclipse-css/styles/dark.scss")),
            file_errors: 0,
        };
        assert_eq!(
            format_clone_report(&report, Path::new("/work")),
            vec![
                "Theme dark",
                "    org.eclipse.ui",
                "    org.eclipse.empty (skipped)",
                "    Aggregator: eclipse-css/styles/dark.scss",
                "Cloned 1 icon set, 1 stylesheet",
            ]
        );
    }

    #[test]
    fn clone_report_counts_errors() {
        let report = CloneReport {
            theme: "dark".to_string(),
            file_errors: 2,
            ..Default::default()
        };
        assert_eq!(
            format_clone_report(&report, Path::new("/work")).last().unwrap(),
            "Cloned 0 icon sets, 0 stylesheets (2 errors)"
        );
    }
}
