//! Drawing surfaces for the lane engine
//!
//! The engine draws through the [`Surface`] trait: filled rectangles,
//! alpha-blended fills and image blits in logical (CSS) pixels. Hosts map
//! logical pixels onto a backing buffer scaled by the device pixel ratio.
//! [`ImageSurface`] is the headless implementation backed by an
//! [`RgbaImage`], used by the CLI, the wasm lane and the tests.

use image::{Rgba, RgbaImage};

/// Current container size and device pixel scaling, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Logical width in CSS pixels
    pub width: f64,
    /// Logical height in CSS pixels
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self { width, height, device_pixel_ratio }
    }

    /// Logical size with negative or non-finite dimensions clamped to zero.
    pub fn logical_size(&self) -> (f64, f64) {
        (sanitize(self.width), sanitize(self.height))
    }

    /// Pixel ratio, falling back to 1 for zero, negative or non-finite values.
    pub fn pixel_ratio(&self) -> f64 {
        if self.device_pixel_ratio.is_finite() && self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        }
    }

    /// Size of the backing pixel buffer for this viewport.
    pub fn backing_size(&self) -> (u32, u32) {
        let (w, h) = self.logical_size();
        let dpr = self.pixel_ratio();
        ((w * dpr).floor() as u32, (h * dpr).floor() as u32)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(960.0, 240.0, 1.0)
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 {
        v
    } else {
        0.0
    }
}

/// 2D raster drawing primitives the lane engine needs from its host.
///
/// Coordinates are logical pixels; implementations apply the scale set with
/// [`Surface::set_scale`]. Drawing outside the backing buffer is clipped.
pub trait Surface {
    /// Resize the backing buffer, discarding its contents.
    fn resize(&mut self, width: u32, height: u32);

    /// Set the logical-to-backing scale (the device pixel ratio).
    fn set_scale(&mut self, scale: f64);

    /// Backing buffer size in device pixels
    fn backing_size(&self) -> (u32, u32);

    /// Opacity multiplied into every following fill and blit.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Fill a rectangle, blending by the color's alpha and the global alpha.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba<u8>);

    /// Draw an image with its top-left corner at `(x, y)`, one image pixel
    /// per logical pixel, sampled nearest-neighbour.
    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64);
}

/// A [`Surface`] that renders into an in-memory RGBA image.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
    scale: f64,
    global_alpha: f64,
}

impl ImageSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self { image: RgbaImage::new(width, height), scale: 1.0, global_alpha: 1.0 }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw RGBA bytes, row-major
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Map a logical span to clipped device pixel bounds `[start, end)`.
    fn device_span(&self, start: f64, len: f64, limit: u32) -> (u32, u32) {
        let a = (start * self.scale).round();
        let b = ((start + len) * self.scale).round();
        let clamp = |v: f64| v.clamp(0.0, limit as f64) as u32;
        (clamp(a), clamp(b))
    }

    fn blend(&mut self, x: u32, y: u32, src: Rgba<u8>) {
        let alpha = src[3] as f64 / 255.0 * self.global_alpha;
        if alpha <= 0.0 {
            return;
        }
        let dst = *self.image.get_pixel(x, y);
        self.image.put_pixel(x, y, alpha_blend(&src, &dst, alpha));
    }
}

impl Surface for ImageSurface {
    fn resize(&mut self, width: u32, height: u32) {
        self.image = RgbaImage::new(width, height);
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
    }

    fn backing_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.global_alpha = if alpha.is_nan() { 1.0 } else { alpha.clamp(0.0, 1.0) };
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Rgba<u8>) {
        if !(width > 0.0 && height > 0.0) {
            return;
        }
        let (x0, x1) = self.device_span(x, width, self.image.width());
        let (y0, y1) = self.device_span(y, height, self.image.height());
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend(px, py, color);
            }
        }
    }

    fn draw_image(&mut self, image: &RgbaImage, x: f64, y: f64) {
        let (sw, sh) = image.dimensions();
        if sw == 0 || sh == 0 {
            return;
        }
        let origin_x = (x * self.scale).round();
        let origin_y = (y * self.scale).round();
        let (x0, x1) = self.device_span(x, sw as f64, self.image.width());
        let (y0, y1) = self.device_span(y, sh as f64, self.image.height());

        for py in y0..y1 {
            let sy = (((py as f64 - origin_y) / self.scale).floor() as i64).clamp(0, sh as i64 - 1) as u32;
            for px in x0..x1 {
                let sx = (((px as f64 - origin_x) / self.scale).floor() as i64).clamp(0, sw as i64 - 1) as u32;
                let src = *image.get_pixel(sx, sy);
                if src[3] > 0 {
                    self.blend(px, py, src);
                }
            }
        }
    }
}

/// Source-over composite of `src` (with effective opacity `src_alpha`) onto `dst`.
pub(crate) fn alpha_blend(src: &Rgba<u8>, dst: &Rgba<u8>, src_alpha: f64) -> Rgba<u8> {
    let sa = src_alpha;
    let da = dst[3] as f64 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f64 / 255.0;
        let df = d as f64 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    #[test]
    fn test_viewport_backing_size() {
        let viewport = Viewport::new(100.0, 50.0, 2.0);
        assert_eq!(viewport.backing_size(), (200, 100));
        assert_eq!(Viewport::new(-5.0, f64::NAN, 0.0).backing_size(), (0, 0));
        assert_eq!(Viewport::new(10.0, 10.0, 0.0).pixel_ratio(), 1.0);
    }

    #[test]
    fn test_fill_rect_clips() {
        let mut surface = ImageSurface::new(4, 4);
        surface.fill_rect(-2.0, 2.0, 10.0, 10.0, RED);
        assert_eq!(*surface.image().get_pixel(0, 2), RED);
        assert_eq!(*surface.image().get_pixel(3, 3), RED);
        assert_eq!(surface.image().get_pixel(0, 1)[3], 0);
    }

    #[test]
    fn test_fill_rect_applies_scale() {
        let mut surface = ImageSurface::new(8, 8);
        surface.set_scale(2.0);
        surface.fill_rect(1.0, 1.0, 1.0, 1.0, RED);
        assert_eq!(*surface.image().get_pixel(2, 2), RED);
        assert_eq!(*surface.image().get_pixel(3, 3), RED);
        assert_eq!(surface.image().get_pixel(4, 4)[3], 0);
        assert_eq!(surface.image().get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_global_alpha_blends() {
        let mut surface = ImageSurface::new(1, 1);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, BLACK);
        surface.set_global_alpha(0.2);
        surface.fill_rect(0.0, 0.0, 1.0, 1.0, Rgba([255, 255, 255, 255]));
        assert_eq!(*surface.image().get_pixel(0, 0), Rgba([51, 51, 51, 255]));
    }

    #[test]
    fn test_zero_sized_rect_is_noop() {
        let mut surface = ImageSurface::new(2, 2);
        surface.fill_rect(0.0, 0.0, 0.0, 2.0, RED);
        surface.fill_rect(0.0, 0.0, 2.0, -1.0, RED);
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_draw_image_skips_transparent_pixels() {
        let mut sprite = RgbaImage::new(2, 1);
        sprite.put_pixel(0, 0, RED);

        let mut surface = ImageSurface::new(4, 4);
        surface.fill_rect(0.0, 0.0, 4.0, 4.0, BLACK);
        surface.draw_image(&sprite, 1.0, 1.0);
        assert_eq!(*surface.image().get_pixel(1, 1), RED);
        assert_eq!(*surface.image().get_pixel(2, 1), BLACK);
    }

    #[test]
    fn test_draw_image_upscales_nearest() {
        let mut sprite = RgbaImage::new(2, 1);
        sprite.put_pixel(1, 0, RED);

        let mut surface = ImageSurface::new(8, 4);
        surface.set_scale(2.0);
        surface.draw_image(&sprite, 0.0, 0.0);
        assert_eq!(surface.image().get_pixel(1, 0)[3], 0);
        assert_eq!(*surface.image().get_pixel(2, 0), RED);
        assert_eq!(*surface.image().get_pixel(3, 1), RED);
    }

    #[test]
    fn test_draw_image_partially_offscreen() {
        let sprite = RgbaImage::from_pixel(3, 3, RED);
        let mut surface = ImageSurface::new(2, 2);
        surface.draw_image(&sprite, -2.0, -2.0);
        assert_eq!(*surface.image().get_pixel(0, 0), RED);
        assert_eq!(surface.image().get_pixel(1, 1)[3], 0);
    }

    #[test]
    fn test_resize_clears() {
        let mut surface = ImageSurface::new(2, 2);
        surface.fill_rect(0.0, 0.0, 2.0, 2.0, RED);
        surface.resize(3, 1);
        assert_eq!(surface.backing_size(), (3, 1));
        assert!(surface.image().pixels().all(|p| p[3] == 0));
    }
}
