//! Core library for packing groups of images into sprite sheets and
//! rendering stylesheet metadata.
//!
//! - Pipeline: `pipeline::run` packs every configured group with bounded
//!   concurrency, merges per-sprite records in declaration order and renders
//!   them through a template.
//! - Output formats: css/scss/sass/less/stylus/json built in, plus custom
//!   handlebars or function templates.
//! - The packing step sits behind the `PackEngine` trait; a built-in ordered
//!   layout engine (top-down, left-right, diagonal, alt-diagonal) ships with
//!   the crate.
//!
//! Quick example:
//! ```ignore
//! use spritegen_core::{Group, PipelineConfig, pipeline};
//! # fn main() -> spritegen_core::Result<()> {
//! let cfg = PipelineConfig::builder()
//!     .group(Group::new(
//!         vec!["icons/home.png".into(), "icons/user.png".into()],
//!         "out/sprite.png",
//!     ))
//!     .dest_css("out/sprite.css")
//!     .build();
//! let report = pipeline::run(&cfg)?;
//! println!("wrote {}", report.stylesheet.display());
//! # Ok(()) }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod mapping;
pub mod model;
pub mod pipeline;
pub mod render;

pub use config::*;
pub use engine::*;
pub use error::*;
pub use format::*;
pub use model::*;
pub use render::*;

/// Convenience prelude for common types and functions.
/// Importing `spritegen_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{
        CssTemplate, ExportOptions, Group, LayoutAlgorithm, PipelineConfig,
        PipelineConfigBuilder,
    };
    pub use crate::engine::{BuiltinEngine, PackEngine, PackRequest, PackResult};
    pub use crate::error::{Result, SpritegenError};
    pub use crate::format::FormatRegistry;
    pub use crate::model::{Record, RunReport, SheetProperties, SpriteRect};
    pub use crate::pipeline::run;
    pub use crate::render::Renderer;
}
