use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Placement of one source image within its sheet (pixels, top-left origin).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpriteRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl SpriteRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Overall dimensions of a generated sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetProperties {
    pub width: u32,
    pub height: u32,
}

/// The normalized per-sprite unit handed to the renderer.
///
/// One `Record` is produced per source image across all groups. Coordinates
/// are copied verbatim from the packing engine; `offset_x`/`offset_y` are the
/// negated placement values stylesheets use for `background-position`.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Display/reference name derived from the source file name.
    pub name: String,
    /// Source image path as reported by the packing engine.
    pub source_image: String,
    /// Reference URL from the stylesheet location to the sheet file.
    pub image: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub offset_x: i64,
    pub offset_y: i64,
    pub total_width: u32,
    pub total_height: u32,
    /// Set on exactly one record per run: the final element of the merged
    /// sequence. Templates use it to emit separators.
    pub last: bool,
    /// Fields injected by the caller's record-transform hook.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn new(
        name: String,
        source_image: String,
        image: String,
        rect: SpriteRect,
        sheet: SheetProperties,
    ) -> Self {
        Self {
            name,
            source_image,
            image,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            offset_x: -i64::from(rect.x),
            offset_y: -i64::from(rect.y),
            total_width: sheet.width,
            total_height: sheet.height,
            last: false,
            extra: serde_json::Map::new(),
        }
    }
}

/// Success outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Path of the written stylesheet/data file.
    pub stylesheet: PathBuf,
    /// Paths of the written sheet images, in group-declaration order.
    pub sheets: Vec<PathBuf>,
    /// Number of records rendered.
    pub records: usize,
}
