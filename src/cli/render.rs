//! Headless lane rendering

use image::RgbaImage;
use std::path::Path;
use std::process::ExitCode;

use crate::config::CrosswalkConfig;
use crate::crosswalk::{CrosswalkRenderer, HeadlessLane};
use crate::models::Archetype;
use crate::output::{render_gif, save_png, OutputKind};
use crate::random::{RandomSource, SmallRandom};
use crate::surface::{ImageSurface, Surface};

use super::{check_fps, EXIT_ERROR, EXIT_SUCCESS};

/// Drive a started lane through `frames` frames at `fps`.
///
/// `on_frame` sees the surface after every frame.
pub(crate) fn simulate<S, R>(lane: &mut CrosswalkRenderer<S, R>, frames: u32, fps: f64, mut on_frame: impl FnMut(&S))
where
    S: Surface,
    R: RandomSource,
{
    let mut ticket = lane.start();
    for i in 0..frames {
        let timestamp = i as f64 * 1000.0 / fps;
        match lane.frame(ticket, timestamp) {
            Some(next) => ticket = next,
            None => break,
        }
        on_frame(lane.surface());
    }
    lane.stop();
}

/// Build a headless lane from config, with its sprite sheets prebuilt.
pub(crate) fn headless_lane(
    config: &CrosswalkConfig,
    archetype: Archetype,
    rate: Option<f64>,
    seed: Option<u64>,
) -> HeadlessLane {
    let mut lane = CrosswalkRenderer::new(
        config.lane_profile(archetype),
        ImageSurface::new(0, 0),
        config.viewport.viewport(),
        rate.unwrap_or_else(|| config.initial_rate(archetype)),
        SmallRandom::from_option(seed),
    )
    .with_style(config.style.scene_style());
    lane.prewarm_sprites();
    lane
}

/// Execute the render command
pub fn run_render(
    config: &CrosswalkConfig,
    archetype: Archetype,
    output: &Path,
    frames: u32,
    fps: f64,
    rate: Option<f64>,
    seed: Option<u64>,
) -> ExitCode {
    let fps = match check_fps(fps) {
        Ok(fps) => fps,
        Err(code) => return code,
    };

    let mut lane = headless_lane(config, archetype, rate, seed);
    let kind = OutputKind::from_path(output);

    let mut captured: Vec<RgbaImage> = Vec::new();
    simulate(&mut lane, frames, fps, |surface| {
        if kind == OutputKind::Gif {
            captured.push(surface.image().clone());
        }
    });

    let result = match kind {
        OutputKind::Gif => render_gif(&captured, (1000.0 / fps).round() as u32, true, output),
        OutputKind::Png => save_png(lane.surface().image(), output),
    };
    if let Err(e) = result {
        eprintln!("Error: Failed to save '{}': {}", output.display(), e);
        return ExitCode::from(EXIT_ERROR);
    }

    println!(
        "Saved: {} ({} frames, {} walkers on screen)",
        output.display(),
        frames,
        lane.walkers().len()
    );
    ExitCode::from(EXIT_SUCCESS)
}
