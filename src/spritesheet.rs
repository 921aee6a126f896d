//! Sprite sheets: the six rasterized frames of one (archetype, palette) pair
//!
//! Frames are stored in a fixed interleaved order:
//! `[pose0-right, pose0-left, pose1-right, pose1-left, pose2-right, pose2-left]`.
//! A [`SpriteCache`] builds each sheet once and keeps it for as long as the
//! cache (and the lane engine that owns it) lives.

use image::RgbaImage;
#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

use crate::color::TRANSPARENT;
use crate::models::{Archetype, Facing, Pose};
use crate::palettes::{palette_count, Palette};
use crate::renderer::rasterize;
use crate::sprite::generate;

/// Number of frames in every sheet (3 poses x 2 facings)
pub const SHEET_FRAMES: usize = 6;

/// Rasterized frames for one (archetype, palette) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    archetype: Archetype,
    palette_index: usize,
    scale: u32,
    frames: Vec<RgbaImage>,
}

impl SpriteSheet {
    /// Generate and rasterize every frame for a palette.
    ///
    /// `palette_index` wraps around the archetype's palette table.
    pub fn build(archetype: Archetype, palette_index: usize, scale: u32) -> Self {
        let palette_index = palette_index % palette_count(archetype);
        let palette = Palette::get(archetype, palette_index).resolve();

        let mut frames = Vec::with_capacity(SHEET_FRAMES);
        for pose in Pose::ALL {
            let grid = generate(archetype, &palette, pose);
            frames.push(rasterize(&grid, scale, Facing::Right));
            frames.push(rasterize(&grid, scale, Facing::Left));
        }

        Self { archetype, palette_index, scale: scale.max(1), frames }
    }

    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// Palette index after wrap-around
    pub fn palette_index(&self) -> usize {
        self.palette_index
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// All frames in sheet order
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    /// Sheet index of a pose/facing: `pose * 2 + (left ? 1 : 0)`
    pub fn frame_index(pose: Pose, facing: Facing) -> usize {
        pose.index() * 2 + facing.sheet_offset()
    }

    pub fn frame(&self, pose: Pose, facing: Facing) -> &RgbaImage {
        &self.frames[Self::frame_index(pose, facing)]
    }

    /// Lay the frames out as a single image, `cols` per row (one row by default).
    pub fn to_strip(&self, cols: Option<u32>) -> RgbaImage {
        render_spritesheet(&self.frames, cols)
    }
}

/// Cache key: archetype plus wrapped palette index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SheetKey {
    pub archetype: Archetype,
    pub palette_index: usize,
}

impl SheetKey {
    pub fn new(archetype: Archetype, palette_index: usize) -> Self {
        Self { archetype, palette_index: palette_index % palette_count(archetype) }
    }
}

/// Lazily built sprite sheets, at most one per (archetype, palette) pair.
///
/// Each lane engine owns its own cache; nothing is shared between engines
/// and entries are never invalidated.
#[derive(Debug, Default)]
pub struct SpriteCache {
    sheets: HashMap<SheetKey, Arc<SpriteSheet>>,
}

impl SpriteCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a sheet, building it on first use at the archetype's scale.
    pub fn get(&mut self, archetype: Archetype, palette_index: usize) -> Arc<SpriteSheet> {
        let key = SheetKey::new(archetype, palette_index);
        self.sheets
            .entry(key)
            .or_insert_with(|| {
                trace!(archetype = %archetype, palette = key.palette_index, "building sprite sheet");
                Arc::new(SpriteSheet::build(archetype, key.palette_index, archetype.sprite_scale()))
            })
            .clone()
    }

    /// Build every missing sheet for an archetype, in parallel where threads
    /// are available.
    pub fn prewarm(&mut self, archetype: Archetype) {
        let missing: Vec<usize> = (0..palette_count(archetype))
            .filter(|&i| !self.sheets.contains_key(&SheetKey::new(archetype, i)))
            .collect();
        let build = |i: usize| (i, SpriteSheet::build(archetype, i, archetype.sprite_scale()));

        #[cfg(not(target_arch = "wasm32"))]
        let built: Vec<(usize, SpriteSheet)> = missing.into_par_iter().map(build).collect();
        #[cfg(target_arch = "wasm32")]
        let built: Vec<(usize, SpriteSheet)> = missing.into_iter().map(build).collect();

        for (i, sheet) in built {
            self.sheets.insert(SheetKey::new(archetype, i), Arc::new(sheet));
        }
    }

    pub fn contains(&self, archetype: Archetype, palette_index: usize) -> bool {
        self.sheets.contains_key(&SheetKey::new(archetype, palette_index))
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

/// Render multiple frames into a spritesheet grid.
///
/// # Arguments
///
/// * `frames` - Slice of RGBA images to combine
/// * `cols` - Optional number of columns. If None, uses horizontal layout (1 row)
///
/// # Returns
///
/// A single RGBA image containing all frames arranged in a grid.
/// All frames are padded to match the largest frame dimensions.
///
/// # Examples
///
/// ```
/// use image::RgbaImage;
/// use crosswalk::spritesheet::render_spritesheet;
///
/// let frame = RgbaImage::from_pixel(2, 2, image::Rgba([255, 0, 0, 255]));
/// let frames = vec![frame.clone(), frame.clone(), frame.clone(), frame.clone()];
///
/// let sheet = render_spritesheet(&frames, None);
/// assert_eq!((sheet.width(), sheet.height()), (8, 2));
///
/// let sheet = render_spritesheet(&frames, Some(2));
/// assert_eq!((sheet.width(), sheet.height()), (4, 4));
/// ```
pub fn render_spritesheet(frames: &[RgbaImage], cols: Option<u32>) -> RgbaImage {
    if frames.is_empty() {
        return RgbaImage::from_pixel(1, 1, TRANSPARENT);
    }

    let max_width = frames.iter().map(|f| f.width()).max().unwrap_or(1);
    let max_height = frames.iter().map(|f| f.height()).max().unwrap_or(1);

    let num_frames = frames.len() as u32;
    let columns = cols.unwrap_or(num_frames).clamp(1, num_frames);
    let rows = num_frames.div_ceil(columns);

    let mut sheet = RgbaImage::from_pixel(columns * max_width, rows * max_height, TRANSPARENT);

    for (i, frame) in frames.iter().enumerate() {
        let dest_x = (i as u32 % columns) * max_width;
        let dest_y = (i as u32 / columns) * max_height;

        for (x, y, pixel) in frame.enumerate_pixels() {
            sheet.put_pixel(dest_x + x, dest_y + y, *pixel);
        }
    }

    sheet
}
