use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use globset::{Glob, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use spritegen_core::config::{CssTemplate, Group, LayoutAlgorithm, PipelineConfig};
use spritegen_core::format::FormatRegistry;
use spritegen_core::pipeline;
use tracing::info;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(
    name = "spritegen",
    about = "Pack groups of images into sprite sheets and emit stylesheet metadata",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Show a progress spinner (disable with --no-progress or --quiet)
    #[arg(long, default_value_t = true, action=ArgAction::Set, global=true, help_heading = "Logging/UX")]
    progress: bool,
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action=ArgAction::Count, global=true, help_heading = "Logging/UX")]
    verbose: u8,
    /// Quiet mode (overrides verbose)
    #[arg(
        short,
        long,
        default_value_t = false,
        global = true,
        help_heading = "Logging/UX"
    )]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack configured groups and write the sprite sheets + stylesheet
    Pack(PackArgs),
}

#[derive(Parser, Debug, Clone)]
struct PackArgs {
    // Input/Output
    /// YAML config file listing groups and output options
    #[arg(long, help_heading = "Input/Output")]
    config: Option<PathBuf>,
    /// Source images or directories for a single group (replaces config groups)
    #[arg(long, help_heading = "Input/Output")]
    src: Vec<PathBuf>,
    /// Sheet image destination for the single --src group
    #[arg(long, help_heading = "Input/Output")]
    dest_img: Option<PathBuf>,
    /// Stylesheet destination
    #[arg(long, help_heading = "Input/Output")]
    dest_css: Option<PathBuf>,
    /// Include patterns (glob). If set, only files matching any pattern are considered
    #[arg(long, help_heading = "Input/Output")]
    include: Vec<String>,
    /// Exclude patterns (glob). Files matching any pattern will be ignored
    #[arg(long, help_heading = "Input/Output")]
    exclude: Vec<String>,

    // Packing
    /// Layout algorithm: top-down | left-right | diagonal | alt-diagonal
    #[arg(long, value_parser = ["top-down", "left-right", "diagonal", "alt-diagonal"], help_heading = "Packing")]
    algorithm: Option<String>,
    /// Pixels between placed images
    #[arg(long, help_heading = "Packing")]
    padding: Option<u32>,
    /// Sheet image format: png | jpeg (default: from destination extension)
    #[arg(long, help_heading = "Packing")]
    img_format: Option<String>,

    // Export
    /// Stylesheet format override: css | scss | sass | less | stylus | json
    /// (default: from destination extension, then json)
    #[arg(long, help_heading = "Export")]
    css_format: Option<String>,
    /// External handlebars template file, overrides --css-format
    #[arg(long, help_heading = "Export")]
    template: Option<PathBuf>,
    /// Print the merged configuration (after CLI/YAML) and exit
    #[arg(long, default_value_t = false, help_heading = "Export")]
    print_config: bool,
    /// Output format for --print-config: json|yaml
    #[arg(long, default_value = "json", value_parser = ["json", "yaml"], help_heading = "Export")]
    print_config_format: String,
    /// Validate the configuration and list planned outputs without packing
    #[arg(long, default_value_t = false, help_heading = "Export")]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing_with_level(cli.quiet, cli.verbose);
    match &cli.command {
        Commands::Pack(args) => run_pack(args, cli.progress && !cli.quiet),
    }
}

/// Config-file shape; flags win over file values, except that a `--src` group
/// replaces the file's group list wholesale.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FileConfig {
    #[serde(default)]
    groups: Vec<FileGroup>,
    dest_css: Option<PathBuf>,
    algorithm: Option<String>,
    padding: Option<u32>,
    img_format: Option<String>,
    css_format: Option<String>,
    template: Option<PathBuf>,
    css_opts: Option<serde_yaml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FileGroup {
    src: Vec<PathBuf>,
    dest: PathBuf,
}

/// Fully merged configuration, printable for --print-config.
#[derive(Debug, Serialize)]
struct ResolvedConfig {
    groups: Vec<FileGroup>,
    dest_css: PathBuf,
    algorithm: String,
    padding: u32,
    img_format: Option<String>,
    css_format: Option<String>,
    template: Option<PathBuf>,
    css_opts: serde_json::Value,
}

fn run_pack(cli: &PackArgs, show_progress: bool) -> anyhow::Result<()> {
    let file: FileConfig = if let Some(path) = &cli.config {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        serde_yaml::from_str(&text).with_context(|| format!("parse config {}", path.display()))?
    } else {
        FileConfig::default()
    };

    let groups: Vec<FileGroup> = if !cli.src.is_empty() {
        let dest = cli
            .dest_img
            .clone()
            .context("--src requires --dest-img for the sheet destination")?;
        vec![FileGroup {
            src: cli.src.clone(),
            dest,
        }]
    } else {
        file.groups.clone()
    };

    let dest_css = cli
        .dest_css
        .clone()
        .or(file.dest_css)
        .context("a stylesheet destination is required (--dest-css or dest_css in the config)")?;

    let algorithm_name = cli
        .algorithm
        .clone()
        .or(file.algorithm)
        .unwrap_or_else(|| "top-down".to_string());
    let algorithm: LayoutAlgorithm = algorithm_name
        .parse()
        .map_err(|_| anyhow::anyhow!("unknown algorithm: {}", algorithm_name))?;
    let padding = cli.padding.or(file.padding).unwrap_or(0);
    let img_format = cli.img_format.clone().or(file.img_format);
    let css_format = cli.css_format.clone().or(file.css_format);
    let template = cli.template.clone().or(file.template);
    let css_opts: serde_json::Value = match file.css_opts {
        Some(v) => serde_json::to_value(v).context("convert css_opts")?,
        None => serde_json::Value::Object(serde_json::Map::new()),
    };

    let resolved = ResolvedConfig {
        groups,
        dest_css,
        algorithm: algorithm_name,
        padding,
        img_format,
        css_format,
        template,
        css_opts,
    };

    if cli.print_config {
        match cli.print_config_format.as_str() {
            "yaml" => println!("{}", serde_yaml::to_string(&resolved)?),
            _ => println!("{}", serde_json::to_string_pretty(&resolved)?),
        }
        return Ok(());
    }

    // Expand directory sources to image files before handing off to the core.
    let image_formats = FormatRegistry::image_formats();
    let mut groups: Vec<Group> = Vec::with_capacity(resolved.groups.len());
    for g in &resolved.groups {
        let mut src: Vec<PathBuf> = Vec::new();
        for entry in &g.src {
            src.extend(gather_paths(entry, &cli.include, &cli.exclude, &image_formats)?);
        }
        info!(dest = %g.dest.display(), sources = src.len(), "resolved group");
        groups.push(Group::new(src, g.dest.clone()));
    }

    let mut builder = PipelineConfig::builder()
        .groups(groups)
        .dest_css(resolved.dest_css)
        .algorithm(algorithm)
        .padding(resolved.padding)
        .css_opts(resolved.css_opts);
    if let Some(f) = resolved.img_format {
        builder = builder.export_format(f);
    }
    if let Some(f) = resolved.css_format {
        builder = builder.css_format(f);
    }
    if let Some(path) = resolved.template {
        builder = builder.css_template(CssTemplate::File(path));
    }
    let cfg = builder.build();

    if cli.dry_run {
        cfg.validate()?;
        println!("stylesheet: {}", cfg.dest_css.display());
        for g in &cfg.groups {
            println!("sheet: {} ({} sources)", g.dest.display(), g.src.len());
        }
        return Ok(());
    }

    let bar = if show_progress {
        let b = indicatif::ProgressBar::new_spinner();
        b.enable_steady_tick(Duration::from_millis(100));
        b.set_message(format!("packing {} group(s)", cfg.groups.len()));
        Some(b)
    } else {
        None
    };
    let report = pipeline::run(&cfg);
    if let Some(b) = &bar {
        b.finish_and_clear();
    }
    let report = report?;

    info!(
        stylesheet = %report.stylesheet.display(),
        sheets = report.sheets.len(),
        records = report.records,
        "done"
    );
    Ok(())
}

fn gather_paths(
    path: &Path,
    include: &[String],
    exclude: &[String],
    image_formats: &FormatRegistry,
) -> anyhow::Result<Vec<PathBuf>> {
    // Build glob matchers
    let mut inc_set = None;
    if !include.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in include {
            b.add(Glob::new(pat)?);
        }
        inc_set = Some(b.build()?);
    }
    let mut exc_set = None;
    if !exclude.is_empty() {
        let mut b = GlobSetBuilder::new();
        for pat in exclude {
            b.add(Glob::new(pat)?);
        }
        exc_set = Some(b.build()?);
    }
    let mut list: Vec<PathBuf> = Vec::new();
    if path.is_file() {
        if !should_skip(path, inc_set.as_ref(), exc_set.as_ref()) {
            list.push(path.to_path_buf());
        }
    } else {
        for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file()
                && !should_skip(p, inc_set.as_ref(), exc_set.as_ref())
                && image_formats.resolve(p).is_some()
            {
                list.push(p.to_path_buf());
            }
        }
    }
    Ok(list)
}

fn should_skip(
    p: &Path,
    include: Option<&globset::GlobSet>,
    exclude: Option<&globset::GlobSet>,
) -> bool {
    let s = p.to_string_lossy().replace('\\', "/");
    if let Some(ex) = exclude {
        if ex.is_match(&s) {
            return true;
        }
    }
    if let Some(inc) = include {
        if !inc.is_match(&s) {
            return true;
        }
    }
    false
}

fn init_tracing_with_level(quiet: bool, verbose: u8) {
    let level = if quiet {
        "error".to_string()
    } else {
        match verbose {
            0 => "info".into(),
            1 => "debug".into(),
            _ => "trace".into(),
        }
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(level)
        .with_target(false)
        .try_init();
}
