use std::fs;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::thread;

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::{CssTemplate, Group, PipelineConfig};
use crate::engine::{PackRequest, PackResult};
use crate::error::{Result, SpritegenError};
use crate::format::FormatRegistry;
use crate::mapping;
use crate::model::{Record, RunReport};
use crate::render::Renderer;

/// Format name a caller-supplied custom template is registered under.
const CUSTOM_FORMAT: &str = "custom";

#[instrument(skip_all)]
/// Runs the whole pipeline: packs every group with bounded concurrency,
/// merges the normalized records in declaration order, renders the resolved
/// output format and persists the stylesheet.
///
/// Notes:
/// - Group results land in declaration-order slots; the merged sequence is
///   identical regardless of which group finishes first.
/// - The first failure anywhere aborts the run; the stylesheet is never
///   written on failure (already-written sheet images may remain on disk).
pub fn run(cfg: &PipelineConfig) -> Result<RunReport> {
    cfg.validate()?;

    let image_formats =
        FormatRegistry::image_formats().with_overrides(&cfg.image_format_overrides);
    let css_formats =
        FormatRegistry::stylesheet_formats().with_overrides(&cfg.css_format_overrides);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(worker_count())
        .build()
        .map_err(|e| SpritegenError::Pool(e.to_string()))?;
    info!(
        groups = cfg.groups.len(),
        workers = pool.current_num_threads(),
        "packing groups"
    );

    let per_group: Vec<Vec<Record>> = pool.install(|| {
        cfg.groups
            .par_iter()
            .map(|group| process_group(group, cfg, &image_formats))
            .collect::<Result<Vec<_>>>()
    })?;

    let mut records: Vec<Record> = per_group.into_iter().flatten().collect();
    if records.is_empty() {
        return Err(SpritegenError::Config(
            "groups produced no sprites to render".into(),
        ));
    }
    if let Some(last) = records.last_mut() {
        last.last = true;
    }

    let mut renderer = Renderer::new()?;
    let format = match &cfg.css_template {
        Some(CssTemplate::Func(f)) => {
            renderer.register_template_fn(CUSTOM_FORMAT, f.clone());
            CUSTOM_FORMAT.to_string()
        }
        Some(CssTemplate::Text(text)) => {
            renderer.register_template_string(CUSTOM_FORMAT, text)?;
            CUSTOM_FORMAT.to_string()
        }
        Some(CssTemplate::File(path)) => {
            let text = fs::read_to_string(path)?;
            renderer.register_template_string(CUSTOM_FORMAT, &text)?;
            CUSTOM_FORMAT.to_string()
        }
        None => cfg
            .css_format
            .clone()
            .or_else(|| css_formats.resolve(&cfg.dest_css).map(str::to_string))
            .unwrap_or_else(|| "json".to_string()),
    };
    debug!(%format, records = records.len(), "rendering stylesheet");

    let text = renderer.render(&format, &records, &cfg.css_opts)?;
    if let Some(dir) = cfg.dest_css.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(&cfg.dest_css, text)?;

    let sheets: Vec<_> = cfg.groups.iter().map(|g| g.dest.clone()).collect();
    info!(
        stylesheet = %cfg.dest_css.display(),
        sheets = sheets.len(),
        records = records.len(),
        "files created"
    );
    Ok(RunReport {
        stylesheet: cfg.dest_css.clone(),
        sheets,
        records: records.len(),
    })
}

/// Concurrency ceiling: one worker per host processing unit.
fn worker_count() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}

/// Packs one group, persists its sheet image and normalizes the engine's
/// coordinates into records. Any failure here is fatal for the whole run.
fn process_group(
    group: &Group,
    cfg: &PipelineConfig,
    image_formats: &FormatRegistry,
) -> Result<Vec<Record>> {
    let format = cfg
        .export
        .format
        .clone()
        .or_else(|| image_formats.resolve(&group.dest).map(str::to_string))
        .unwrap_or_else(|| "png".to_string());

    let req = PackRequest {
        src: group.src.clone(),
        algorithm: cfg.algorithm,
        padding: cfg.padding,
        format,
        algorithm_opts: cfg.algorithm_opts.clone(),
        engine_opts: cfg.engine_opts.clone(),
    };
    let result = cfg.engine.pack(&req)?;

    if let Some(dir) = group.dest.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    fs::write(&group.dest, &result.image)?;
    debug!(
        dest = %group.dest.display(),
        sprites = result.coordinates.len(),
        "wrote sheet image"
    );

    // Hooks are caller code; a panic inside one surfaces as a configuration
    // error instead of unwinding through the pool.
    std::panic::catch_unwind(AssertUnwindSafe(|| build_records(group, cfg, &result)))
        .map_err(|_| SpritegenError::Config("a name/url/record-transform hook panicked".into()))
}

fn build_records(group: &Group, cfg: &PipelineConfig, result: &PackResult) -> Vec<Record> {
    let mut records = Vec::with_capacity(result.coordinates.len());
    // BTreeMap iteration is sorted by source path, fixing in-group order.
    for (source, rect) in &result.coordinates {
        let src_path = Path::new(source);
        let name = match &cfg.map_src_to_name {
            Some(f) => f(src_path),
            None => mapping::default_name(src_path),
        };
        let url = match &cfg.map_dest_image_to_url {
            Some(f) => f(&cfg.dest_css, &group.dest),
            None => mapping::default_url(&cfg.dest_css, &group.dest),
        };
        let mut record = Record::new(name, source.clone(), url, *rect, result.properties);
        if let Some(transform) = &cfg.record_transform {
            if let Some(replacement) = transform(&record) {
                record = replacement;
            }
        }
        records.push(record);
    }
    records
}
