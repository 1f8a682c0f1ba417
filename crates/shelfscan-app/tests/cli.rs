// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end tests for the `shelfscan` binary.

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

const SPINE_LINES: &str = r#"[
    {"text": "HIS TRUTH IS MARCHING ON", "confidence": 0.9},
    {"text": "JON MEACHAM", "confidence": 0.9},
    {"text": "RANDOM HOUSE", "confidence": 0.9}
]"#;

const SHELF_LINES: &str = r#"[
    {"text": "THE SECOND MOUNTAIN", "confidence": 0.9,
     "position": {"min_x": 0.05, "min_y": 0.80, "max_x": 0.30, "max_y": 0.86}},
    {"text": "DAVID BROOKS", "confidence": 0.9,
     "position": {"min_x": 0.08, "min_y": 0.70, "max_x": 0.25, "max_y": 0.75}},
    {"text": "HIS TRUTH IS MARCHING ON", "confidence": 0.9,
     "position": {"min_x": 0.60, "min_y": 0.80, "max_x": 0.90, "max_y": 0.86}},
    {"text": "JON MEACHAM", "confidence": 0.9,
     "position": {"min_x": 0.62, "min_y": 0.70, "max_x": 0.80, "max_y": 0.75}}
]"#;

/// A 4x4 white PNG.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x04, 0x00, 0x00, 0x00, 0x04,
    0x08, 0x02, 0x00, 0x00, 0x00, 0x26, 0x93, 0x09, 0x29, 0x00, 0x00, 0x00,
    0x0f, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8, 0x8f, 0x04, 0x18,
    0x88, 0xe3, 0x00, 0x00, 0xdb, 0x90, 0x2f, 0xd1, 0x6e, 0x45, 0xb0, 0xb2,
    0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

fn fixture(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, body).unwrap();
    path
}

fn shelfscan() -> Command {
    let mut cmd = Command::cargo_bin("shelfscan").unwrap();
    cmd.env("RUST_LOG", "warn");
    cmd
}

#[test]
fn outputs_tool_name() {
    shelfscan()
        .arg("-V")
        .assert()
        .success()
        .stdout(format!("shelfscan {}\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn blocks_reads_one_spine() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "spine.json", SPINE_LINES);
    shelfscan()
        .arg("blocks")
        .arg(&lines)
        .assert()
        .success()
        .stdout(contains(r#""title":"His Truth Is Marching On""#))
        .stdout(contains(r#""author":"Jon Meacham""#))
        .stdout(contains(r#""publisher":"Random House""#));
}

#[test]
fn blocks_pretty_prints() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "spine.json", SPINE_LINES);
    shelfscan()
        .args(["blocks", "--pretty"])
        .arg(&lines)
        .assert()
        .success()
        .stdout(contains(r#""title": "His Truth Is Marching On""#));
}

#[test]
fn blocks_rejects_fragments() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "spine.json", r#"[{"text": "ab", "confidence": 0.9}]"#);
    shelfscan()
        .arg("blocks")
        .arg(&lines)
        .assert()
        .failure()
        .stderr(contains("too short"));
}

#[test]
fn segment_splits_shelf_into_books() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "shelf.json", SHELF_LINES);
    shelfscan()
        .arg("segment")
        .arg(&lines)
        .assert()
        .success()
        .stdout(contains("The Second Mountain"))
        .stdout(contains("David Brooks"))
        .stdout(contains("His Truth Is Marching On"))
        .stdout(contains("Jon Meacham"));
}

#[test]
fn config_overrides_thresholds() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "spine.json", SPINE_LINES);
    let config = fixture(&dir, "config.json", r#"{"min_line_confidence": 0.95}"#);
    // Every line is filtered, so only the longest-line fallback remains.
    shelfscan()
        .arg("--config")
        .arg(&config)
        .arg("blocks")
        .arg(&lines)
        .assert()
        .success()
        .stdout(contains(r#""author":"Unknown""#));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().unwrap();
    let lines = fixture(&dir, "spine.json", SPINE_LINES);
    let config = fixture(&dir, "config.json", r#"{"grouping_overlap_threshold": 2.0}"#);
    shelfscan()
        .arg("--config")
        .arg(&config)
        .arg("blocks")
        .arg(&lines)
        .assert()
        .failure()
        .stderr(contains("settings aren't valid"));
}

#[test]
fn missing_input_file_fails() {
    shelfscan()
        .args(["segment", "nonexistent_lines.json"])
        .assert()
        .failure()
        .stderr(contains("couldn't be found"));
}

#[test]
fn scan_missing_photo_fails() {
    shelfscan()
        .args(["scan", "nonexistent_shelf.jpg"])
        .assert()
        .failure();
}

#[test]
fn scan_without_models_reports_missing_engine() {
    let dir = TempDir::new().unwrap();
    let photo = dir.path().join("shelf.png");
    std::fs::write(&photo, TINY_PNG).unwrap();
    shelfscan()
        .arg("scan")
        .arg(&photo)
        .arg("--models")
        .arg(dir.path().join("no-models"))
        .assert()
        .failure()
        .stderr(contains("models aren't available"));
}
