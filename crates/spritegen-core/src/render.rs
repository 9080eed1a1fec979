use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use handlebars::Handlebars;
use serde_json::json;

use crate::config::TemplateFn;
use crate::error::{Result, SpritegenError};
use crate::model::Record;

/// Built-in text templates, registered under their format identifier.
const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    ("css", include_str!("templates/css.hbs")),
    ("scss", include_str!("templates/scss.hbs")),
    ("sass", include_str!("templates/sass.hbs")),
    ("less", include_str!("templates/less.hbs")),
    ("stylus", include_str!("templates/stylus.hbs")),
];

/// Turns the merged record list into output text for a given format.
///
/// Formats resolve in this order: function templates, the `json` structured
/// output, then handlebars templates (built-in or caller-registered). Text
/// templates receive the records as `items` and the renderer options as
/// `opts`.
pub struct Renderer {
    registry: Handlebars<'static>,
    fns: HashMap<String, TemplateFn>,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        // Output is stylesheet text, not HTML.
        registry.register_escape_fn(handlebars::no_escape);
        for (name, tpl) in BUILTIN_TEMPLATES {
            registry
                .register_template_string(name, tpl)
                .map_err(|e| SpritegenError::Render(e.to_string()))?;
        }
        Ok(Self {
            registry,
            fns: HashMap::new(),
        })
    }

    /// Register a handlebars template under `name`.
    /// Fails on template-syntax errors.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.registry
            .register_template_string(name, template)
            .map_err(|e| SpritegenError::Render(format!("template {name}: {e}")))
    }

    /// Register a function template under `name`.
    pub fn register_template_fn(&mut self, name: &str, f: TemplateFn) {
        self.fns.insert(name.to_string(), f);
    }

    /// Render `records` with the template registered for `format`.
    pub fn render(
        &self,
        format: &str,
        records: &[Record],
        opts: &serde_json::Value,
    ) -> Result<String> {
        if let Some(f) = self.fns.get(format) {
            return std::panic::catch_unwind(AssertUnwindSafe(|| f(records, opts)))
                .map_err(|_| {
                    SpritegenError::Render(format!("function template {format} panicked"))
                })?;
        }
        if format == "json" {
            return serde_json::to_string_pretty(records)
                .map_err(|e| SpritegenError::Render(e.to_string()));
        }
        if self.registry.has_template(format) {
            let ctx = json!({ "items": records, "opts": opts });
            return self
                .registry
                .render(format, &ctx)
                .map_err(|e| SpritegenError::Render(e.to_string()));
        }
        Err(SpritegenError::Render(format!(
            "unknown output format: {format}"
        )))
    }
}
