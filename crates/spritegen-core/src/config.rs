use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use crate::engine::{BuiltinEngine, PackEngine};
use crate::mapping::{NameMapper, UrlMapper};
use crate::model::Record;

/// Ordered layout algorithms for the built-in engine.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutAlgorithm {
    /// Stack images vertically in input order.
    TopDown,
    /// Stack images horizontally in input order.
    LeftRight,
    /// Step down-right, one image per step.
    Diagonal,
    /// Step down-left from the top-right corner.
    AltDiagonal,
}

impl FromStr for LayoutAlgorithm {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "top-down" | "topdown" => Ok(Self::TopDown),
            "left-right" | "leftright" => Ok(Self::LeftRight),
            "diagonal" => Ok(Self::Diagonal),
            "alt-diagonal" | "altdiagonal" => Ok(Self::AltDiagonal),
            _ => Err(()),
        }
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TopDown => "top-down",
            Self::LeftRight => "left-right",
            Self::Diagonal => "diagonal",
            Self::AltDiagonal => "alt-diagonal",
        };
        f.write_str(s)
    }
}

/// One input group: a set of source images packed into one sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    /// Source image paths, in declaration order.
    pub src: Vec<PathBuf>,
    /// Destination path of the generated sheet image.
    pub dest: PathBuf,
}

impl Group {
    pub fn new(src: Vec<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            src,
            dest: dest.into(),
        }
    }
}

/// Sheet image export options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Explicit image format identifier (`png`, `jpeg`). When absent the
    /// format is resolved from the destination extension, then `png`.
    pub format: Option<String>,
}

/// Caller-overridable hook applied to every record after normalization.
/// Returning `None` keeps the record unchanged.
pub type RecordTransform = Arc<dyn Fn(&Record) -> Option<Record> + Send + Sync>;

/// Function template: receives the merged record list and the renderer
/// options, returns the output text.
pub type TemplateFn = Arc<
    dyn Fn(&[Record], &serde_json::Value) -> crate::error::Result<String> + Send + Sync,
>;

/// A caller-supplied custom template for the stylesheet output.
#[derive(Clone)]
pub enum CssTemplate {
    /// Handlebars template source text.
    Text(String),
    /// Path of a handlebars template file, read at run start.
    File(PathBuf),
    /// Function template.
    Func(TemplateFn),
}

impl fmt::Debug for CssTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(_) => f.write_str("CssTemplate::Text(..)"),
            Self::File(p) => write!(f, "CssTemplate::File({})", p.display()),
            Self::Func(_) => f.write_str("CssTemplate::Func(..)"),
        }
    }
}

/// Full configuration of one pipeline run.
///
/// Every option is explicit; defaults match `Default`. Hooks and the engine
/// are shared `Arc`s because group processing runs on a thread pool.
#[derive(Clone)]
pub struct PipelineConfig {
    /// Input groups, processed concurrently, merged in declaration order.
    pub groups: Vec<Group>,
    /// Destination path of the stylesheet/data file.
    pub dest_css: PathBuf,
    /// Layout algorithm passed to the packing engine.
    pub algorithm: LayoutAlgorithm,
    /// Pixels between placed images.
    pub padding: u32,
    /// Opaque algorithm options forwarded to the engine.
    pub algorithm_opts: serde_json::Value,
    /// Opaque engine options forwarded to the engine.
    pub engine_opts: serde_json::Value,
    /// Sheet image export options.
    pub export: ExportOptions,
    /// Explicit output format override (`css`, `scss`, ...). When absent the
    /// format is resolved from the stylesheet extension, then `json`.
    pub css_format: Option<String>,
    /// Format-specific renderer options, passed to templates as `opts`.
    pub css_opts: serde_json::Value,
    /// Custom output template; overrides `css_format` and the extension.
    pub css_template: Option<CssTemplate>,
    /// Extra `(extension, format)` entries layered onto the image registry.
    pub image_format_overrides: Vec<(String, String)>,
    /// Extra `(extension, format)` entries layered onto the stylesheet registry.
    pub css_format_overrides: Vec<(String, String)>,
    /// Override for the default source-path → name mapping.
    pub map_src_to_name: Option<NameMapper>,
    /// Override for the default sheet-path → reference-URL mapping.
    pub map_dest_image_to_url: Option<UrlMapper>,
    /// Per-record transform applied after normalization.
    pub record_transform: Option<RecordTransform>,
    /// Packing engine. Defaults to the built-in layout engine.
    pub engine: Arc<dyn PackEngine>,
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("groups", &self.groups)
            .field("dest_css", &self.dest_css)
            .field("algorithm", &self.algorithm)
            .field("padding", &self.padding)
            .field("export", &self.export)
            .field("css_format", &self.css_format)
            .field("css_template", &self.css_template)
            .finish_non_exhaustive()
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            dest_css: PathBuf::new(),
            algorithm: LayoutAlgorithm::TopDown,
            padding: 0,
            algorithm_opts: serde_json::Value::Object(serde_json::Map::new()),
            engine_opts: serde_json::Value::Object(serde_json::Map::new()),
            export: ExportOptions::default(),
            css_format: None,
            css_opts: serde_json::Value::Object(serde_json::Map::new()),
            css_template: None,
            image_format_overrides: Vec::new(),
            css_format_overrides: Vec::new(),
            map_src_to_name: None,
            map_dest_image_to_url: None,
            record_transform: None,
            engine: Arc::new(BuiltinEngine::default()),
        }
    }
}

impl PipelineConfig {
    /// Create a fluent builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Validates the configuration before any work starts.
    ///
    /// Returns an error if no groups are configured, the stylesheet
    /// destination is missing, or any group lacks `dest` or a non-empty `src`.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpritegenError;

        if self.groups.is_empty() {
            return Err(SpritegenError::Config(
                "at least one group of source images is required".into(),
            ));
        }
        if self.dest_css.as_os_str().is_empty() {
            return Err(SpritegenError::Config(
                "a stylesheet destination (dest_css) is required".into(),
            ));
        }
        for (idx, group) in self.groups.iter().enumerate() {
            if group.dest.as_os_str().is_empty() || group.src.is_empty() {
                return Err(SpritegenError::Config(format!(
                    "group {idx} is missing \"dest\" or a non-empty \"src\""
                )));
            }
        }
        Ok(())
    }
}

/// Builder for `PipelineConfig` for ergonomic construction.
#[derive(Default)]
pub struct PipelineConfigBuilder {
    cfg: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PipelineConfig::default(),
        }
    }
    pub fn group(mut self, group: Group) -> Self {
        self.cfg.groups.push(group);
        self
    }
    pub fn groups(mut self, groups: Vec<Group>) -> Self {
        self.cfg.groups = groups;
        self
    }
    pub fn dest_css(mut self, v: impl Into<PathBuf>) -> Self {
        self.cfg.dest_css = v.into();
        self
    }
    pub fn algorithm(mut self, v: LayoutAlgorithm) -> Self {
        self.cfg.algorithm = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn algorithm_opts(mut self, v: serde_json::Value) -> Self {
        self.cfg.algorithm_opts = v;
        self
    }
    pub fn engine_opts(mut self, v: serde_json::Value) -> Self {
        self.cfg.engine_opts = v;
        self
    }
    pub fn export_format(mut self, v: impl Into<String>) -> Self {
        self.cfg.export.format = Some(v.into());
        self
    }
    pub fn css_format(mut self, v: impl Into<String>) -> Self {
        self.cfg.css_format = Some(v.into());
        self
    }
    pub fn css_opts(mut self, v: serde_json::Value) -> Self {
        self.cfg.css_opts = v;
        self
    }
    pub fn css_template(mut self, v: CssTemplate) -> Self {
        self.cfg.css_template = Some(v);
        self
    }
    pub fn image_format_override(mut self, ext: impl Into<String>, format: impl Into<String>) -> Self {
        self.cfg
            .image_format_overrides
            .push((ext.into(), format.into()));
        self
    }
    pub fn css_format_override(mut self, ext: impl Into<String>, format: impl Into<String>) -> Self {
        self.cfg
            .css_format_overrides
            .push((ext.into(), format.into()));
        self
    }
    pub fn map_src_to_name(mut self, v: NameMapper) -> Self {
        self.cfg.map_src_to_name = Some(v);
        self
    }
    pub fn map_dest_image_to_url(mut self, v: UrlMapper) -> Self {
        self.cfg.map_dest_image_to_url = Some(v);
        self
    }
    pub fn record_transform(mut self, v: RecordTransform) -> Self {
        self.cfg.record_transform = Some(v);
        self
    }
    pub fn engine(mut self, v: Arc<dyn PackEngine>) -> Self {
        self.cfg.engine = v;
        self
    }
    pub fn build(self) -> PipelineConfig {
        self.cfg
    }
}
