use std::fs;

use image::{Rgba, RgbaImage};
use spritegen_core::config::{Group, LayoutAlgorithm, PipelineConfig};
use spritegen_core::engine::{BuiltinEngine, PackEngine, PackRequest};
use spritegen_core::model::SpriteRect;
use spritegen_core::pipeline;

fn write_fixture(path: &std::path::Path, w: u32, h: u32, color: [u8; 4]) {
    RgbaImage::from_pixel(w, h, Rgba(color))
        .save(path)
        .expect("write fixture image");
}

fn request(src: Vec<std::path::PathBuf>, algorithm: LayoutAlgorithm, padding: u32) -> PackRequest {
    PackRequest {
        src,
        algorithm,
        padding,
        format: "png".to_string(),
        algorithm_opts: serde_json::json!({}),
        engine_opts: serde_json::json!({}),
    }
}

#[test]
fn packs_images_top_down_and_encodes_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    write_fixture(&a, 4, 6, [255, 0, 0, 255]);
    write_fixture(&b, 8, 2, [0, 255, 0, 255]);

    let result = BuiltinEngine
        .pack(&request(vec![a.clone(), b.clone()], LayoutAlgorithm::TopDown, 2))
        .expect("pack");

    assert_eq!(result.properties.width, 8);
    assert_eq!(result.properties.height, 6 + 2 + 2);

    let key_a = a.to_string_lossy().replace('\\', "/");
    let key_b = b.to_string_lossy().replace('\\', "/");
    assert_eq!(result.coordinates[&key_a], SpriteRect::new(0, 0, 4, 6));
    assert_eq!(result.coordinates[&key_b], SpriteRect::new(0, 8, 8, 2));

    let sheet = image::load_from_memory(&result.image).expect("decode sheet");
    assert_eq!(sheet.width(), 8);
    assert_eq!(sheet.height(), 10);
    let rgba = sheet.to_rgba8();
    assert_eq!(rgba.get_pixel(0, 0), &Rgba([255, 0, 0, 255]));
    assert_eq!(rgba.get_pixel(0, 8), &Rgba([0, 255, 0, 255]));
    // Padding row stays transparent.
    assert_eq!(rgba.get_pixel(0, 7), &Rgba([0, 0, 0, 0]));
}

#[test]
fn jpeg_export_flattens_alpha() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.png");
    write_fixture(&a, 3, 3, [10, 20, 30, 255]);

    let mut req = request(vec![a], LayoutAlgorithm::TopDown, 0);
    req.format = "jpeg".to_string();
    let result = BuiltinEngine.pack(&req).expect("pack");
    let sheet = image::load_from_memory(&result.image).expect("decode sheet");
    assert_eq!((sheet.width(), sheet.height()), (3, 3));
}

#[test]
fn unsupported_export_format_is_a_packing_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let a = dir.path().join("a.png");
    write_fixture(&a, 2, 2, [0, 0, 0, 255]);

    let mut req = request(vec![a], LayoutAlgorithm::TopDown, 0);
    req.format = "webp".to_string();
    let err = BuiltinEngine.pack(&req).expect_err("must fail");
    assert!(err.to_string().contains("unsupported export format"));
}

#[test]
fn end_to_end_pipeline_writes_sheets_and_stylesheet() {
    let dir = tempfile::tempdir().expect("tempdir");
    let icons = dir.path().join("icons");
    fs::create_dir_all(&icons).expect("mkdir");
    write_fixture(&icons.join("home.png"), 4, 4, [1, 2, 3, 255]);
    write_fixture(&icons.join("user.png"), 4, 4, [4, 5, 6, 255]);
    write_fixture(&icons.join("logo.big.png"), 6, 6, [7, 8, 9, 255]);

    let out = dir.path().join("out");
    let cfg = PipelineConfig::builder()
        .group(Group::new(
            vec![icons.join("home.png"), icons.join("user.png")],
            out.join("img/icons.png"),
        ))
        .group(Group::new(
            vec![icons.join("logo.big.png")],
            out.join("img/logos.png"),
        ))
        .dest_css(out.join("css/sprites.css"))
        .padding(2)
        .build();

    let report = pipeline::run(&cfg).expect("run");
    assert_eq!(report.records, 3);

    // One sheet per group, both decodable.
    for sheet in &report.sheets {
        let bytes = fs::read(sheet).expect("sheet bytes");
        image::load_from_memory(&bytes).expect("decodable sheet");
    }

    let css = fs::read_to_string(&report.stylesheet).expect("stylesheet");
    assert!(css.contains(".home {"));
    assert!(css.contains(".user {"));
    // Multi-dot names keep everything but the final extension.
    assert!(css.contains(".logo.big {"));
    // Reference URL is relative to the stylesheet directory.
    assert!(css.contains("background-image: url(../img/icons.png);"));
    assert!(css.contains("background-image: url(../img/logos.png);"));
}
