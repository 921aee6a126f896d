//! CLI integration tests for xwalk
//!
//! These tests run the binary in a scratch directory, so no crosswalk.toml
//! from the developer's machine is picked up, and check exit codes and the
//! images written.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Run xwalk inside `dir` with config discovery pinned to `dir`.
fn xwalk(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_xwalk"))
        .args(args)
        .current_dir(dir)
        .env("XDG_CONFIG_HOME", dir)
        .env("HOME", dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute xwalk")
}

fn assert_success(output: &Output) {
    assert!(output.status.success(), "xwalk failed: {}", String::from_utf8_lossy(&output.stderr));
}

/// Get image dimensions from a PNG file
fn get_image_dimensions(path: &Path) -> (u32, u32) {
    let img = image::open(path).expect("Failed to open output image");
    (img.width(), img.height())
}

// ============================================================================
// palettes
// ============================================================================

#[test]
fn test_palettes_lists_both_archetypes() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["palettes"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("human palettes (8):"));
    assert!(stdout.contains("robot palettes (4):"));
    assert!(stdout.contains("skin=#FFD5B8"));
}

#[test]
fn test_palettes_filtered_by_archetype() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["palettes", "--archetype", "robot"]);
    assert_success(&output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("human"));
    assert_eq!(stdout.lines().count(), 5);
}

// ============================================================================
// sheet
// ============================================================================

#[test]
fn test_sheet_default_path_and_size() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["sheet", "--archetype", "robot", "--palette", "1"]);
    assert_success(&output);

    // Six 32x48 robot frames in one row
    let path = dir.path().join("robot_1.png");
    assert_eq!(get_image_dimensions(&path), (192, 48));
}

#[test]
fn test_sheet_scale_and_columns() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("humans.png");
    let output = xwalk(
        dir.path(),
        &["sheet", "--archetype", "human", "-o", out.to_str().unwrap(), "--scale", "2", "--cols", "2"],
    );
    assert_success(&output);

    // 2 columns x 3 rows of 16x24, doubled
    assert_eq!(get_image_dimensions(&out), (64, 144));
}

#[test]
fn test_sheet_wraps_palette_index() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["sheet", "--archetype", "robot", "--palette", "5"]);
    assert_success(&output);
    assert!(dir.path().join("robot_1.png").exists());
}

#[test]
fn test_sheet_rejects_scale_out_of_range() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["sheet", "--archetype", "robot", "--scale", "0"]);
    assert_eq!(output.status.code(), Some(2));
}

// ============================================================================
// render
// ============================================================================

#[test]
fn test_render_png_matches_viewport() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lane.png");
    let output = xwalk(
        dir.path(),
        &[
            "render", "--archetype", "robot", "-o", out.to_str().unwrap(), "--frames", "5", "--seed", "3", "--width",
            "200", "--height", "80", "--dpr", "2",
        ],
    );
    assert_success(&output);
    assert_eq!(get_image_dimensions(&out), (400, 160));
}

#[test]
fn test_render_gif_writes_animation() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("lane.gif");
    let output = xwalk(
        dir.path(),
        &["render", "--archetype", "robot", "-o", out.to_str().unwrap(), "--frames", "4", "--width", "120", "--height", "60"],
    );
    assert_success(&output);

    let bytes = fs::read(&out).unwrap();
    assert_eq!(&bytes[0..4], b"GIF8");
}

#[test]
fn test_render_is_reproducible_with_seed() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.png");
    let b = dir.path().join("b.png");
    for out in [&a, &b] {
        let output = xwalk(
            dir.path(),
            &[
                "render", "--archetype", "robot", "-o", out.to_str().unwrap(), "--frames", "30", "--rate", "20",
                "--seed", "7", "--width", "240", "--height", "100",
            ],
        );
        assert_success(&output);
    }
    assert_eq!(fs::read(&a).unwrap(), fs::read(&b).unwrap());
}

#[test]
fn test_render_rejects_zero_fps() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["render", "--archetype", "human", "-o", "x.png", "--fps", "0"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!dir.path().join("x.png").exists());
}

#[test]
fn test_render_reads_config_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("crosswalk.toml"), "[viewport]\nwidth = 150\nheight = 70\n").unwrap();

    let output = xwalk(dir.path(), &["render", "--archetype", "robot", "-o", "lane.png", "--frames", "2"]);
    assert_success(&output);
    assert_eq!(get_image_dimensions(&dir.path().join("lane.png")), (150, 70));
}

#[test]
fn test_render_invalid_config_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("crosswalk.toml"), "[viewport]\nwidth = 0\n").unwrap();

    let output = xwalk(dir.path(), &["render", "--archetype", "robot", "-o", "lane.png"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("viewport.width"));
}

#[test]
fn test_unknown_archetype_is_usage_error() {
    let dir = TempDir::new().unwrap();
    let output = xwalk(dir.path(), &["sheet", "--archetype", "cat"]);
    assert_eq!(output.status.code(), Some(2));
}
