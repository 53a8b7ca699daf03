//! Directory and file naming conventions shared by every stage.
//!
//! Icon sources follow a fixed layout inherited from the Eclipse platform
//! image repository:
//!
//! ```text
//! eclipse-svg/                          # svg root
//! └── org.eclipse.ui/                   # icon set (icon root)
//!     └── icons/full/
//!         ├── etool16/save_edit.svg     # enabled set
//!         ├── dtool16/                  # hand-authored disabled set, never a source
//!         ├── dgm/                      # not a disabled marker
//!         └── wizban/new_wiz.svg        # wizard banners
//! ```
//!
//! Stylesheets mirror the icon tree under the css root, with the `icons`
//! directory swapped for `styles/<theme>`:
//!
//! ```text
//! eclipse-css/org.eclipse.ui/styles/stock/full/etool16/save_edit.scss
//! ```
//!
//! Everything here is a pure string/path function.

use std::path::{Component, Path, PathBuf};

/// Default directory holding the SVG icon sets.
pub const SVG_ROOT: &str = "eclipse-svg";
/// Default directory holding the per-icon stylesheets.
pub const CSS_ROOT: &str = "eclipse-css";
/// Default directory name rendered PNGs go under.
pub const PNG_ROOT: &str = "eclipse-png";
/// The icon directory inside each icon set.
pub const ICONS_DIR: &str = "icons";
/// The stylesheet directory inside each css icon set, and the shared
/// aggregation directory at the css root.
pub const STYLES_DIR: &str = "styles";
/// Name of the reference theme new themes are cloned from.
pub const STOCK_THEME: &str = "stock";
/// Directory holding wizard banner icons.
pub const BANNER_DIR: &str = "wizban";
/// A `d`-prefixed directory that does not hold disabled icons.
const NOT_DISABLED: &str = "dgm";
/// Tokens marking files that are already rendered at a scale.
const SCALED_MARKERS: &[&str] = &["@1.5x", "@2x"];

/// `true` for directories holding hand-authored disabled icons.
///
/// Any directory starting with `d` qualifies, except `dgm`.
pub fn is_disabled_marker(dir_name: &str) -> bool {
    dir_name.starts_with('d') && dir_name != NOT_DISABLED
}

/// Name of the disabled counterpart of an enabled (`e`-prefixed) directory.
///
/// - `etool16` → `Some("dtool16")`
/// - `obj16` → `None`
pub fn disabled_sibling(dir_name: &str) -> Option<String> {
    dir_name.strip_prefix('e').map(|rest| format!("d{rest}"))
}

/// `true` if the file name carries an `@1.5x`/`@2x` token.
pub fn has_scaled_marker(file_name: &str) -> bool {
    SCALED_MARKERS.iter().any(|m| file_name.contains(m))
}

/// File name minus its final extension.
///
/// A trailing dot with nothing after it is not an extension.
pub fn name_base(file_name: &str) -> &str {
    match file_name.rsplit_once('.') {
        Some((base, ext)) if !ext.is_empty() => base,
        _ => file_name,
    }
}

/// The `<n>` in `@<n>x` for a scale factor, `None` at native size.
///
/// Integral scales print without a fraction (`2` → `"2"`), others with
/// their decimal value (`1.5` → `"1.5"`).
pub fn scale_id(scale: f64) -> Option<String> {
    if scale == 1.0 {
        return None;
    }
    if scale.fract() == 0.0 {
        Some(format!("{}", scale as i64))
    } else {
        Some(format!("{scale}"))
    }
}

/// PNG file name for an icon rendered at `scale`.
///
/// - `("save", 1.0)` → `save.png`
/// - `("save", 2.0)` → `save@2x.png`
/// - `("save", 1.5)` → `save@1.5x.png`
pub fn output_file_name(name_base: &str, scale: f64) -> String {
    match scale_id(scale) {
        Some(id) => format!("{name_base}@{id}x.png"),
        None => format!("{name_base}.png"),
    }
}

/// Map an SVG source path onto its per-icon stylesheet path.
///
/// The first `svg_root` component becomes `css_root`, the first `icons`
/// component after it becomes `styles/<theme>`, and the extension becomes
/// `scss`. Returns `None` when the path does not contain both components.
pub fn stylesheet_path(svg: &Path, svg_root: &str, css_root: &str, theme: &str) -> Option<PathBuf> {
    let mut out = PathBuf::new();
    let mut seen_root = false;
    let mut seen_icons = false;

    for component in svg.components() {
        match component {
            Component::Normal(name) if !seen_root && name == svg_root => {
                out.push(css_root);
                seen_root = true;
            }
            Component::Normal(name) if seen_root && !seen_icons && name == ICONS_DIR => {
                out.push(STYLES_DIR);
                out.push(theme);
                seen_icons = true;
            }
            other => out.push(other.as_os_str()),
        }
    }

    if !(seen_root && seen_icons) {
        return None;
    }
    out.set_extension("scss");
    Some(out)
}

/// Directory name a configured root path is matched by in icon paths
/// (`assets/eclipse-svg` → `eclipse-svg`).
pub fn root_name(dir: &str) -> String {
    Path::new(dir)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.to_string())
}

/// Compiled CSS sheet written next to the `.scss` source.
pub fn compiled_stylesheet_path(scss: &Path, name_base: &str) -> PathBuf {
    let dir = scss.parent().unwrap_or_else(|| Path::new(""));
    dir.join(format!("{name_base}.css"))
}

/// Output directory name for an icon set, with the `.hidpi` suffix when
/// rendering into a separate fragment.
pub fn icon_set_output_name(set_name: &str, hidpi: bool) -> String {
    if hidpi {
        format!("{set_name}.hidpi")
    } else {
        set_name.to_string()
    }
}

/// Top-level output directory name:
/// `<target>[-<theme>][-hidpi]`.
pub fn target_dir_name(target: &str, theme: Option<&str>, hidpi: bool) -> String {
    let mut name = target.to_string();
    if let Some(theme) = theme {
        name.push('-');
        name.push_str(theme);
    }
    if hidpi {
        name.push_str("-hidpi");
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d_prefixed_dirs_are_disabled_markers() {
        assert!(is_disabled_marker("dtool16"));
        assert!(is_disabled_marker("dlcl16"));
        assert!(is_disabled_marker("d"));
    }

    #[test]
    fn dgm_is_not_a_disabled_marker() {
        assert!(!is_disabled_marker("dgm"));
    }

    #[test]
    fn other_dirs_are_not_disabled_markers() {
        assert!(!is_disabled_marker("etool16"));
        assert!(!is_disabled_marker("obj16"));
        assert!(!is_disabled_marker("Dtool16"));
    }

    #[test]
    fn disabled_sibling_swaps_leading_e() {
        assert_eq!(disabled_sibling("etool16").as_deref(), Some("dtool16"));
        assert_eq!(disabled_sibling("elcl16").as_deref(), Some("dlcl16"));
        assert_eq!(disabled_sibling("e").as_deref(), Some("d"));
        assert_eq!(disabled_sibling("obj16"), None);
    }

    #[test]
    fn scaled_markers_detected() {
        assert!(has_scaled_marker("save@2x.svg"));
        assert!(has_scaled_marker("save@1.5x.svg"));
        assert!(!has_scaled_marker("save.svg"));
        assert!(!has_scaled_marker("save@3x.svg"));
    }

    #[test]
    fn name_base_strips_last_extension() {
        assert_eq!(name_base("save_edit.svg"), "save_edit");
        assert_eq!(name_base("a.b.svg"), "a.b");
        assert_eq!(name_base("noext"), "noext");
        assert_eq!(name_base("trailing."), "trailing.");
    }

    #[test]
    fn scale_id_formats() {
        assert_eq!(scale_id(1.0), None);
        assert_eq!(scale_id(2.0).as_deref(), Some("2"));
        assert_eq!(scale_id(3.0).as_deref(), Some("3"));
        assert_eq!(scale_id(1.5).as_deref(), Some("1.5"));
        assert_eq!(scale_id(1.25).as_deref(), Some("1.25"));
    }

    #[test]
    fn output_file_names() {
        assert_eq!(output_file_name("save", 1.0), "save.png");
        assert_eq!(output_file_name("save", 2.0), "save@2x.png");
        assert_eq!(output_file_name("save", 1.5), "save@1.5x.png");
    }

    #[test]
    fn stylesheet_path_swaps_roots_and_theme() {
        let svg = Path::new("/work/eclipse-svg/org.eclipse.ui/icons/full/etool16/save.svg");
        let css = stylesheet_path(svg, SVG_ROOT, CSS_ROOT, "dark").unwrap();
        assert_eq!(
            css,
            PathBuf::from("/work/eclipse-css/org.eclipse.ui/styles/dark/full/etool16/save.scss")
        );
    }

    #[test]
    fn stylesheet_path_only_swaps_first_icons_component() {
        let svg = Path::new("eclipse-svg/set/icons/icons/a.svg");
        let css = stylesheet_path(svg, SVG_ROOT, CSS_ROOT, STOCK_THEME).unwrap();
        assert_eq!(css, PathBuf::from("eclipse-css/set/styles/stock/icons/a.scss"));
    }

    #[test]
    fn stylesheet_path_requires_both_components() {
        assert!(stylesheet_path(Path::new("/x/set/icons/a.svg"), SVG_ROOT, CSS_ROOT, "t").is_none());
        assert!(stylesheet_path(Path::new("/x/eclipse-svg/set/a.svg"), SVG_ROOT, CSS_ROOT, "t").is_none());
    }

    #[test]
    fn root_name_is_last_component() {
        assert_eq!(root_name("eclipse-svg"), "eclipse-svg");
        assert_eq!(root_name("assets/eclipse-css"), "eclipse-css");
        assert_eq!(root_name(".."), "..");
    }

    #[test]
    fn compiled_stylesheet_sits_next_to_source() {
        let scss = Path::new("/css/set/styles/dark/full/obj16/file.scss");
        assert_eq!(
            compiled_stylesheet_path(scss, "file"),
            PathBuf::from("/css/set/styles/dark/full/obj16/file.css")
        );
    }

    #[test]
    fn output_dir_names() {
        assert_eq!(icon_set_output_name("org.eclipse.ui", false), "org.eclipse.ui");
        assert_eq!(icon_set_output_name("org.eclipse.ui", true), "org.eclipse.ui.hidpi");
        assert_eq!(target_dir_name("eclipse-png", None, false), "eclipse-png");
        assert_eq!(target_dir_name("eclipse-png", None, true), "eclipse-png-hidpi");
        assert_eq!(target_dir_name("eclipse-png", Some("dark"), false), "eclipse-png-dark");
        assert_eq!(
            target_dir_name("eclipse-png", Some("dark"), true),
            "eclipse-png-dark-hidpi"
        );
    }
}
