use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::PathBuf;

use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use tracing::debug;

use crate::config::LayoutAlgorithm;
use crate::error::{Result, SpritegenError};
use crate::model::{SheetProperties, SpriteRect};

pub mod compositing;
pub mod layout;

/// Input to one packing invocation, built per group.
#[derive(Debug, Clone)]
pub struct PackRequest {
    /// Source image paths, in declaration order.
    pub src: Vec<PathBuf>,
    pub algorithm: LayoutAlgorithm,
    /// Pixels between placed images.
    pub padding: u32,
    /// Export format identifier (`png`, `jpeg`).
    pub format: String,
    /// Opaque algorithm options, passed through to the engine.
    pub algorithm_opts: serde_json::Value,
    /// Opaque engine options, passed through to the engine.
    pub engine_opts: serde_json::Value,
}

/// Output of one packing invocation.
#[derive(Debug)]
pub struct PackResult {
    /// Encoded sheet image bytes, written verbatim to the group destination.
    pub image: Vec<u8>,
    /// Placement per source path. `BTreeMap` keeps iteration sorted by
    /// source path, which the pipeline relies on for deterministic output.
    pub coordinates: BTreeMap<String, SpriteRect>,
    pub properties: SheetProperties,
}

/// A packing engine places a group of images onto one sheet.
///
/// Implementations report failures (unreadable file, invalid image,
/// unsupported format) as errors; the pipeline treats any of them as fatal
/// for the whole run.
pub trait PackEngine: Send + Sync {
    fn pack(&self, req: &PackRequest) -> Result<PackResult>;
}

/// Built-in engine: decodes sources with `image`, lays them out with one of
/// the ordered layout algorithms, composites an RGBA canvas and encodes it.
#[derive(Debug, Default, Clone)]
pub struct BuiltinEngine;

impl PackEngine for BuiltinEngine {
    fn pack(&self, req: &PackRequest) -> Result<PackResult> {
        if req.src.is_empty() {
            return Err(SpritegenError::Pack("nothing to pack".into()));
        }

        let mut keys: Vec<String> = Vec::with_capacity(req.src.len());
        let mut images: Vec<RgbaImage> = Vec::with_capacity(req.src.len());
        for path in &req.src {
            let img = ImageReader::open(path)
                .map_err(|e| {
                    SpritegenError::Pack(format!("unreadable file {}: {e}", path.display()))
                })?
                .with_guessed_format()
                .map_err(|e| {
                    SpritegenError::Pack(format!("unreadable file {}: {e}", path.display()))
                })?
                .decode()
                .map_err(|e| {
                    SpritegenError::Pack(format!("invalid image {}: {e}", path.display()))
                })?;
            keys.push(path.to_string_lossy().replace('\\', "/"));
            images.push(img.to_rgba8());
        }

        let sizes: Vec<(u32, u32)> = images.iter().map(|i| i.dimensions()).collect();
        let (placements, properties) = layout::layout(&sizes, req.algorithm, req.padding);
        debug!(
            count = sizes.len(),
            width = properties.width,
            height = properties.height,
            algorithm = %req.algorithm,
            "computed sheet layout"
        );

        let mut canvas = RgbaImage::new(properties.width, properties.height);
        for (img, pos) in images.iter().zip(&placements) {
            compositing::blit_rgba(img, &mut canvas, pos.x, pos.y);
        }
        let image = encode(canvas, &req.format)?;

        let coordinates: BTreeMap<String, SpriteRect> = keys
            .into_iter()
            .zip(placements.iter().zip(&sizes))
            .map(|(key, (pos, &(w, h)))| (key, SpriteRect::new(pos.x, pos.y, w, h)))
            .collect();

        Ok(PackResult {
            image,
            coordinates,
            properties,
        })
    }
}

fn encode(canvas: RgbaImage, format: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    match format {
        "png" => {
            DynamicImage::ImageRgba8(canvas).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        }
        // JPEG has no alpha channel; flatten first.
        "jpeg" => {
            let rgb = DynamicImage::ImageRgba8(canvas).to_rgb8();
            DynamicImage::ImageRgb8(rgb).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)?;
        }
        other => {
            return Err(SpritegenError::Pack(format!(
                "unsupported export format: {other}"
            )));
        }
    }
    Ok(bytes)
}
