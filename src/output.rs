//! PNG and animated GIF output

use image::codecs::gif::{GifEncoder, Repeat};
use image::imageops::FilterType;
use image::{Frame, ImageOutputFormat, RgbaImage};
use std::fs::File;
use std::io::{self, BufWriter, Cursor};
use std::path::Path;
use thiserror::Error;

/// Error type for output operations
#[derive(Debug, Error)]
pub enum OutputError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Image encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Output container chosen from a file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Png,
    Gif,
}

impl OutputKind {
    /// `.gif` (any case) is a GIF; everything else is a PNG.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("gif") => OutputKind::Gif,
            _ => OutputKind::Png,
        }
    }
}

fn create_parent_dirs(path: &Path) -> Result<(), OutputError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<(), OutputError> {
    create_parent_dirs(path)?;
    image.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, OutputError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageOutputFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Scale image by integer factor using nearest-neighbor interpolation.
///
/// This preserves crisp pixel edges for pixel art. Factors of 0 and 1
/// return the image unchanged.
pub fn scale_image(image: RgbaImage, factor: u8) -> RgbaImage {
    if factor <= 1 {
        return image;
    }
    let (w, h) = image.dimensions();
    let new_w = w * factor as u32;
    let new_h = h * factor as u32;
    image::imageops::resize(&image, new_w, new_h, FilterType::Nearest)
}

/// Render a sequence of frames as an animated GIF.
///
/// # Arguments
///
/// * `frames` - The image frames to include in the animation
/// * `duration_ms` - Duration per frame in milliseconds
/// * `loop_anim` - Whether the animation should loop infinitely
/// * `path` - Output file path
///
/// An empty frame list writes nothing.
pub fn render_gif(frames: &[RgbaImage], duration_ms: u32, loop_anim: bool, path: &Path) -> Result<(), OutputError> {
    if frames.is_empty() {
        return Ok(());
    }

    create_parent_dirs(path)?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = GifEncoder::new(writer);

    let repeat = if loop_anim { Repeat::Infinite } else { Repeat::Finite(0) };
    encoder.set_repeat(repeat)?;

    // GIF delays are in centiseconds
    let delay_cs = (duration_ms / 10).max(1);

    for rgba_image in frames {
        let delay = image::Delay::from_numer_denom_ms(delay_cs * 10, 1);
        let frame = Frame::from_parts(rgba_image.clone(), 0, 0, delay);
        encoder.encode_frame(frame)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use tempfile::tempdir;

    fn solid(width: u32, height: u32, color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(width, height, color)
    }

    #[test]
    fn test_output_kind_from_extension() {
        assert_eq!(OutputKind::from_path(Path::new("lane.GIF")), OutputKind::Gif);
        assert_eq!(OutputKind::from_path(Path::new("lane.png")), OutputKind::Png);
        assert_eq!(OutputKind::from_path(Path::new("lane")), OutputKind::Png);
    }

    #[test]
    fn test_save_png_creates_parent_dirs() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("out.png");
        save_png(&solid(2, 2, Rgba([1, 2, 3, 255])), &path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(*loaded.get_pixel(1, 1), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn test_encode_png_is_stable() {
        let image = solid(3, 1, Rgba([9, 9, 9, 255]));
        assert_eq!(encode_png(&image).unwrap(), encode_png(&image).unwrap());
        assert_eq!(&encode_png(&image).unwrap()[1..4], b"PNG");
    }

    #[test]
    fn test_scale_image_nearest() {
        let mut image = RgbaImage::new(2, 1);
        image.put_pixel(1, 0, Rgba([255, 0, 0, 255]));
        let scaled = scale_image(image.clone(), 3);
        assert_eq!(scaled.dimensions(), (6, 3));
        assert_eq!(scaled.get_pixel(2, 2)[3], 0);
        assert_eq!(*scaled.get_pixel(3, 0), Rgba([255, 0, 0, 255]));
        assert_eq!(scale_image(image.clone(), 1), image);
    }

    #[test]
    fn test_render_gif_frame_count() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("walk.gif");
        let frames = vec![
            solid(4, 4, Rgba([255, 0, 0, 255])),
            solid(4, 4, Rgba([0, 255, 0, 255])),
            solid(4, 4, Rgba([0, 0, 255, 255])),
        ];
        render_gif(&frames, 150, true, &path).unwrap();

        let decoder = GifDecoder::new(File::open(&path).unwrap()).unwrap();
        assert_eq!(decoder.into_frames().collect_frames().unwrap().len(), 3);
    }

    #[test]
    fn test_render_gif_empty_writes_nothing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("empty.gif");
        render_gif(&[], 100, true, &path).unwrap();
        assert!(!path.exists());
    }
}
