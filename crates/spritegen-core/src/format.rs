use std::collections::HashMap;
use std::path::Path;

/// Extension → format-identifier lookup table.
///
/// Built once at pipeline start (defaults plus configuration overrides) and
/// never mutated during a run. Unrecognized extensions resolve to `None`;
/// callers apply their own default.
#[derive(Debug, Clone)]
pub struct FormatRegistry {
    map: HashMap<String, String>,
}

impl FormatRegistry {
    /// Default table for sheet image formats.
    pub fn image_formats() -> Self {
        let mut reg = Self {
            map: HashMap::new(),
        };
        reg.add("png", "png");
        reg.add("jpg", "jpeg");
        reg.add("jpeg", "jpeg");
        reg
    }

    /// Default table for stylesheet/output formats.
    pub fn stylesheet_formats() -> Self {
        let mut reg = Self {
            map: HashMap::new(),
        };
        reg.add("styl", "stylus");
        reg.add("stylus", "stylus");
        reg.add("sass", "sass");
        reg.add("scss", "scss");
        reg.add("less", "less");
        reg.add("json", "json");
        reg.add("css", "css");
        reg
    }

    /// Register one extension (without the leading dot; stored lowercased).
    pub fn add(&mut self, ext: &str, format: &str) {
        self.map
            .insert(ext.trim_start_matches('.').to_ascii_lowercase(), format.to_string());
    }

    /// Layer caller-supplied `(extension, format)` overrides on top of the
    /// defaults. Consumes and returns `self` so registries stay immutable
    /// after construction.
    pub fn with_overrides(mut self, overrides: &[(String, String)]) -> Self {
        for (ext, format) in overrides {
            self.add(ext, format);
        }
        self
    }

    /// Resolve a path's extension to a format identifier.
    pub fn resolve(&self, path: &Path) -> Option<&str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.map.get(&ext).map(String::as_str)
    }
}
