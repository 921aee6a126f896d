//! Pixel-grid rasterization to image buffers

use image::{Rgba, RgbaImage};

use crate::color::TRANSPARENT;
use crate::models::Facing;
use crate::sprite::PixelGrid;

/// Rasterize a pixel grid into an RGBA image.
///
/// Each grid cell becomes a `scale`×`scale` block. Empty cells stay
/// transparent. A left-facing raster mirrors the grid horizontally: grid
/// column `w - 1 - px` lands in output column `px`.
///
/// A scale of zero is treated as one.
///
/// # Examples
///
/// ```
/// use crosswalk::models::Facing;
/// use crosswalk::renderer::rasterize;
/// use crosswalk::sprite::PixelGrid;
///
/// let mut grid = PixelGrid::new();
/// grid.set(0, 0, image::Rgba([255, 0, 0, 255]));
///
/// let right = rasterize(&grid, 2, Facing::Right);
/// assert_eq!((right.width(), right.height()), (32, 48));
/// assert_eq!(right.get_pixel(1, 1)[0], 255);
///
/// let left = rasterize(&grid, 2, Facing::Left);
/// assert_eq!(left.get_pixel(31, 0)[0], 255);
/// ```
pub fn rasterize(grid: &PixelGrid, scale: u32, facing: Facing) -> RgbaImage {
    let scale = scale.max(1);
    let (w, h) = (grid.width(), grid.height());
    let mut image = RgbaImage::from_pixel(w * scale, h * scale, TRANSPARENT);

    for py in 0..h {
        for px in 0..w {
            let source_x = match facing {
                Facing::Right => px,
                Facing::Left => w - 1 - px,
            };
            if let Some(color) = grid.get(source_x as i32, py as i32) {
                fill_block(&mut image, px * scale, py * scale, scale, color);
            }
        }
    }

    image
}

fn fill_block(image: &mut RgbaImage, x0: u32, y0: u32, size: u32, color: Rgba<u8>) {
    for y in y0..y0 + size {
        for x in x0..x0 + size {
            image.put_pixel(x, y, color);
        }
    }
}
