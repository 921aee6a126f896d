//! WASM tests using wasm_bindgen_test
//!
//! Run with: wasm-pack test --headless --chrome --features wasm
//! Or for node: see tests in src/wasm.rs (run with cargo test --features wasm)

#![cfg(target_arch = "wasm32")]

use wasm_bindgen_test::*;

// Configure tests to run in browser environment
wasm_bindgen_test_configure!(run_in_browser);

use crosswalk::wasm::{sprite_sheet_png, WasmLane};

// ============================================================================
// WasmLane tests
// ============================================================================

#[wasm_bindgen_test]
fn test_lane_backing_buffer_follows_dpr() {
    let lane = WasmLane::new("human", 300.0, 120.0, 2.0, 0.0, Some(1)).unwrap();
    assert_eq!(lane.width(), 600);
    assert_eq!(lane.height(), 240);
    assert_eq!(lane.pixels().len(), 600 * 240 * 4);
}

#[wasm_bindgen_test]
fn test_lane_runs_between_start_and_stop() {
    let mut lane = WasmLane::new("robot", 320.0, 120.0, 1.0, 20.0, Some(2)).unwrap();
    assert!(!lane.frame(0.0), "frames before start are ignored");

    lane.start();
    assert!(lane.frame(0.0));
    for i in 1..10 {
        assert!(lane.frame(i as f64 * 50.0));
    }
    assert!(lane.walker_count() > 0);

    lane.stop();
    assert!(!lane.frame(600.0));
}

#[wasm_bindgen_test]
fn test_lane_resize_reallocates_buffer() {
    let mut lane = WasmLane::new("robot", 320.0, 120.0, 1.0, 1.0, None).unwrap();
    lane.resize(100.0, 50.0, 3.0);
    assert_eq!(lane.width(), 300);
    assert_eq!(lane.height(), 150);
}

#[wasm_bindgen_test]
fn test_unknown_archetype_is_rejected() {
    assert!(WasmLane::new("cat", 320.0, 120.0, 1.0, 1.0, None).is_err());
}

// ============================================================================
// sprite_sheet_png tests
// ============================================================================

#[wasm_bindgen_test]
fn test_sprite_sheet_png_magic_bytes() {
    let result = sprite_sheet_png("robot", 0);
    assert!(result.len() >= 8, "PNG should have at least header bytes");
    assert_eq!(result[0], 0x89, "First PNG magic byte");
    assert_eq!(result[1], 0x50, "Second PNG magic byte (P)");
    assert_eq!(result[2], 0x4E, "Third PNG magic byte (N)");
    assert_eq!(result[3], 0x47, "Fourth PNG magic byte (G)");
}

#[wasm_bindgen_test]
fn test_sprite_sheet_png_unknown_archetype() {
    assert!(sprite_sheet_png("cat", 0).is_empty());
}
