use std::path::{Component, Path};
use std::sync::Arc;

/// Caller-overridable hook deriving a record name from a source path.
pub type NameMapper = Arc<dyn Fn(&Path) -> String + Send + Sync>;

/// Caller-overridable hook computing the reference URL from the stylesheet
/// destination to a sheet destination. Arguments are `(dest_css, dest_image)`.
pub type UrlMapper = Arc<dyn Fn(&Path, &Path) -> String + Send + Sync>;

/// Default name mapping: base name, split on `.`, drop the last segment when
/// there are two or more, rejoin with `.`.
///
/// Preserves multi-dot names while stripping exactly one trailing extension:
/// `icon.foo.png` → `icon.foo`, `icon.png` → `icon`, `noext` → `noext`.
pub fn default_name(src: &Path) -> String {
    let full = src
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut parts: Vec<&str> = full.split('.').collect();
    if parts.len() >= 2 {
        parts.pop();
    }
    parts.join(".")
}

/// Default URL mapping: the relative path from the stylesheet's directory to
/// the sheet destination, `/`-separated.
pub fn default_url(dest_css: &Path, dest_image: &Path) -> String {
    let base = dest_css.parent().unwrap_or_else(|| Path::new(""));
    relative_path(base, dest_image)
}

/// Lexical relative path from directory `from` to path `to`.
///
/// Both paths are compared as written (no filesystem access); when they share
/// no common root the target path is returned as-is.
fn relative_path(from: &Path, to: &Path) -> String {
    let from_parts: Vec<Component> = from.components().collect();
    let to_parts: Vec<Component> = to.components().collect();

    let mut common = 0;
    while common < from_parts.len()
        && common < to_parts.len()
        && from_parts[common] == to_parts[common]
    {
        common += 1;
    }

    let mut segments: Vec<String> = Vec::new();
    for part in &from_parts[common..] {
        match part {
            Component::CurDir => {}
            _ => segments.push("..".to_string()),
        }
    }
    for part in &to_parts[common..] {
        match part {
            Component::CurDir => {}
            _ => segments.push(part.as_os_str().to_string_lossy().into_owned()),
        }
    }
    segments.join("/")
}
