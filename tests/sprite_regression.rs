//! Visual regression tests for generated sprites
//!
//! Sprites are generated procedurally from palettes, so every build of the
//! same sheet must be pixel-identical and every palette must actually change
//! the output.
//!
//! # Test Categories
//!
//! 1. **Determinism** - Rebuilding a sheet yields identical pixels and PNG bytes
//! 2. **Distinctness** - Palettes and poses produce different frames
//! 3. **Geometry** - Frame sizes, mirroring, transparent background

use std::collections::HashSet;

use image::imageops::flip_horizontal;
use image::RgbaImage;
use sha2::{Digest, Sha256};

use crosswalk::models::{Archetype, Facing, Pose, SPRITE_HEIGHT, SPRITE_WIDTH};
use crosswalk::output::encode_png;
use crosswalk::palettes::palette_count;
use crosswalk::spritesheet::{SpriteSheet, SHEET_FRAMES};

// ============================================================================
// Test Utilities
// ============================================================================

/// Calculate SHA256 hash of image pixels for deterministic verification.
///
/// This hashes the raw pixel data (not PNG bytes) for cross-platform consistency.
fn hash_image(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.as_raw());
    format!("{:x}", hasher.finalize())
}

fn sheet(archetype: Archetype, palette: usize) -> SpriteSheet {
    SpriteSheet::build(archetype, palette, archetype.sprite_scale())
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_rebuilt_sheets_hash_identically() {
    for archetype in Archetype::ALL {
        for palette in 0..palette_count(archetype) {
            let a = sheet(archetype, palette);
            let b = sheet(archetype, palette);
            for (fa, fb) in a.frames().iter().zip(b.frames()) {
                assert_eq!(hash_image(fa), hash_image(fb), "{} palette {}", archetype, palette);
            }
        }
    }
}

#[test]
fn test_png_encoding_is_stable() {
    let strip = sheet(Archetype::Robot, 2).to_strip(None);
    let first = encode_png(&strip).unwrap();
    let second = encode_png(&strip).unwrap();
    assert_eq!(Sha256::digest(&first), Sha256::digest(&second));

    let decoded = image::load_from_memory(&first).unwrap().to_rgba8();
    assert_eq!(hash_image(&decoded), hash_image(&strip));
}

#[test]
fn test_wrapped_palette_matches_base_palette() {
    let count = palette_count(Archetype::Human);
    let base = sheet(Archetype::Human, 1);
    let wrapped = sheet(Archetype::Human, count + 1);
    assert_eq!(wrapped.palette_index(), 1);
    assert_eq!(hash_image(&base.to_strip(None)), hash_image(&wrapped.to_strip(None)));
}

// ============================================================================
// Distinctness
// ============================================================================

#[test]
fn test_every_palette_renders_differently() {
    for archetype in Archetype::ALL {
        let hashes: HashSet<String> = (0..palette_count(archetype))
            .map(|p| hash_image(sheet(archetype, p).frame(Pose::NEUTRAL, Facing::Right)))
            .collect();
        assert_eq!(hashes.len(), palette_count(archetype), "{} palettes collide", archetype);
    }
}

#[test]
fn test_stepping_poses_differ_from_neutral() {
    for archetype in Archetype::ALL {
        let sheet = sheet(archetype, 0);
        let neutral = hash_image(sheet.frame(Pose::NEUTRAL, Facing::Right));
        assert_ne!(neutral, hash_image(sheet.frame(Pose::STEP_LEFT, Facing::Right)));
        assert_ne!(neutral, hash_image(sheet.frame(Pose::STEP_RIGHT, Facing::Right)));
    }
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_frame_sizes_follow_archetype_scale() {
    for archetype in Archetype::ALL {
        let sheet = sheet(archetype, 0);
        let scale = archetype.sprite_scale();
        assert_eq!(sheet.frames().len(), SHEET_FRAMES);
        for frame in sheet.frames() {
            assert_eq!(frame.dimensions(), (SPRITE_WIDTH * scale, SPRITE_HEIGHT * scale));
        }
    }
}

#[test]
fn test_left_frames_mirror_right_frames() {
    for archetype in Archetype::ALL {
        let sheet = sheet(archetype, 1);
        for pose in Pose::ALL {
            let mirrored = flip_horizontal(sheet.frame(pose, Facing::Right));
            assert_eq!(hash_image(&mirrored), hash_image(sheet.frame(pose, Facing::Left)));
        }
    }
}

#[test]
fn test_sprites_have_transparent_background_and_opaque_body() {
    for archetype in Archetype::ALL {
        let frame = sheet(archetype, 0).frame(Pose::NEUTRAL, Facing::Right).clone();
        assert_eq!(frame.get_pixel(0, frame.height() - 1)[3], 0, "{} corner should be empty", archetype);
        assert!(frame.pixels().any(|p| p[3] == 255), "{} has no body pixels", archetype);
    }
}
