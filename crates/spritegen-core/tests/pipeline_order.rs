use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use spritegen_core::config::{Group, PipelineConfig};
use spritegen_core::engine::{PackEngine, PackRequest, PackResult};
use spritegen_core::error::Result;
use spritegen_core::model::{SheetProperties, SpriteRect};
use spritegen_core::pipeline;

/// Engine that never touches the filesystem and stalls for a configurable
/// time per group, so tests can force any completion order.
struct StallingEngine {
    /// (substring of the first source path, delay in ms)
    delays: Vec<(&'static str, u64)>,
}

impl PackEngine for StallingEngine {
    fn pack(&self, req: &PackRequest) -> Result<PackResult> {
        let first = req.src[0].to_string_lossy().into_owned();
        for (needle, ms) in &self.delays {
            if first.contains(needle) {
                thread::sleep(Duration::from_millis(*ms));
            }
        }
        let mut coordinates = BTreeMap::new();
        let mut y = 0;
        for p in &req.src {
            let key = p.to_string_lossy().replace('\\', "/");
            coordinates.insert(key, SpriteRect::new(0, y, 10, 10));
            y += 10 + req.padding;
        }
        Ok(PackResult {
            image: vec![0xAA, 0xBB],
            coordinates,
            properties: SheetProperties {
                width: 10,
                height: y,
            },
        })
    }
}

fn config(root: &std::path::Path, delays: Vec<(&'static str, u64)>) -> PipelineConfig {
    let group_a = Group::new(
        vec![PathBuf::from("zz.png"), PathBuf::from("aa.png")],
        root.join("sheet_a.png"),
    );
    let group_b = Group::new(vec![PathBuf::from("mm.png")], root.join("sheet_b.png"));
    PipelineConfig::builder()
        .groups(vec![group_a, group_b])
        .dest_css(root.join("sprites.json"))
        .engine(Arc::new(StallingEngine { delays }))
        .build()
}

fn run_and_read(delays: Vec<(&'static str, u64)>) -> (Vec<String>, Vec<bool>, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path(), delays);
    let report = pipeline::run(&cfg).expect("run");
    assert_eq!(report.records, 3);
    let text = fs::read_to_string(&report.stylesheet).expect("stylesheet");
    let parsed: serde_json::Value = serde_json::from_str(&text).expect("json");
    let items = parsed.as_array().expect("array");
    let names = items
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    let lasts = items.iter().map(|r| r["last"].as_bool().unwrap()).collect();
    (names, lasts, text)
}

#[test]
fn merge_order_is_declaration_then_source_path() {
    let (names, _, _) = run_and_read(vec![]);
    // Group order first, sorted source paths within a group.
    assert_eq!(names, vec!["aa", "zz", "mm"]);
}

#[test]
fn order_is_invariant_under_completion_timing() {
    // First group slow, then second group slow: output must be identical.
    let (names1, _, text1) = run_and_read(vec![("zz", 80)]);
    let (names2, _, text2) = run_and_read(vec![("mm", 80)]);
    assert_eq!(names1, names2);
    assert_eq!(text1, text2);
}

#[test]
fn exactly_one_record_is_last_and_it_is_final() {
    let (_, lasts, _) = run_and_read(vec![("zz", 40)]);
    assert_eq!(lasts.iter().filter(|l| **l).count(), 1);
    assert_eq!(lasts.last(), Some(&true));
}

#[test]
fn sheets_are_written_per_group() {
    let dir = tempfile::tempdir().expect("tempdir");
    let cfg = config(dir.path(), vec![]);
    let report = pipeline::run(&cfg).expect("run");
    assert_eq!(report.sheets.len(), 2);
    for sheet in &report.sheets {
        assert_eq!(fs::read(sheet).expect("sheet bytes"), vec![0xAA, 0xBB]);
    }
}
