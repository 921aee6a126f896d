//! Sprite sheet export

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::models::Archetype;
use crate::output::{save_png, scale_image};
use crate::palettes::palette_count;
use crate::spritesheet::SpriteSheet;

use super::{EXIT_ERROR, EXIT_SUCCESS};

/// `{archetype}_{palette}.png` in the current directory
pub(crate) fn default_sheet_path(archetype: Archetype, palette_index: usize) -> PathBuf {
    PathBuf::from(format!("{}_{}.png", archetype, palette_index))
}

/// Execute the sheet command
pub fn run_sheet(
    archetype: Archetype,
    palette: usize,
    output: Option<&Path>,
    scale: u8,
    cols: Option<u32>,
) -> ExitCode {
    let sheet = SpriteSheet::build(archetype, palette, archetype.sprite_scale());
    if palette >= palette_count(archetype) {
        tracing::warn!(requested = palette, used = sheet.palette_index(), "palette index wrapped around");
    }

    let strip = scale_image(sheet.to_strip(cols), scale);
    let path = output.map(Path::to_path_buf).unwrap_or_else(|| default_sheet_path(archetype, sheet.palette_index()));

    if let Err(e) = save_png(&strip, &path) {
        eprintln!("Error: Failed to save '{}': {}", path.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!("Saved: {} ({}x{})", path.display(), strip.width(), strip.height());
    ExitCode::from(EXIT_SUCCESS)
}
