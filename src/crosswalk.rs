//! Lane simulation engine
//!
//! A [`CrosswalkRenderer`] owns one lane: its walker population, its sprite
//! cache and its drawing surface. Each frame it spawns walkers from a
//! fractional accumulator driven by the lane's effective arrival rate,
//! advances positions and walk cycles, culls walkers past the right edge,
//! then redraws the road and the depth-sorted walkers.
//!
//! ```
//! use crosswalk::crosswalk::CrosswalkRenderer;
//! use crosswalk::models::{Archetype, LaneProfile};
//! use crosswalk::random::ScriptedRandom;
//! use crosswalk::surface::{ImageSurface, Viewport};
//!
//! let profile = LaneProfile::for_archetype(Archetype::Robot);
//! let mut lane = CrosswalkRenderer::new(
//!     profile,
//!     ImageSurface::new(0, 0),
//!     Viewport::new(320.0, 120.0, 1.0),
//!     1.0,
//!     ScriptedRandom::constant(0.5),
//! );
//!
//! let ticket = lane.start();
//! let next = lane.frame(ticket, 0.0).unwrap();
//! lane.frame(next, 1000.0 / 60.0).unwrap();
//! lane.stop();
//! assert!(lane.frame(next, 50.0).is_none());
//! ```

use image::Rgba;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::{Facing, LaneProfile, Pose, FRAME_DURATION_MS, POSE_COUNT};
use crate::palettes::palette_count;
use crate::random::{RandomSource, SmallRandom};
use crate::schedule::{FrameLoop, FrameTicket};
use crate::spritesheet::{SpriteCache, SpriteSheet};
use crate::surface::{ImageSurface, Surface, Viewport};

/// Longest simulated step per frame, in seconds
pub const MAX_FRAME_STEP: f64 = 0.1;

/// Number of zebra stripes across the crosswalk
pub const STRIPE_COUNT: u32 = 6;
pub const STRIPE_HEIGHT: f64 = 4.0;
pub const STRIPE_GAP: f64 = 8.0;

// Layout bands as fractions of the logical height
const TOP_SIDEWALK_END: f64 = 0.08;
const CROSSWALK_START: f64 = 0.10;
const CROSSWALK_END: f64 = 0.90;
const BOTTOM_SIDEWALK_START: f64 = 0.92;

/// Colors used for the road scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneStyle {
    pub road: Rgba<u8>,
    pub stripe: Rgba<u8>,
    /// Opacity applied to the stripe color
    pub stripe_alpha: f64,
    pub stripe_glow: Rgba<u8>,
    pub sidewalk: Rgba<u8>,
    pub sidewalk_edge: Rgba<u8>,
    pub lane_divider: Rgba<u8>,
}

impl Default for SceneStyle {
    fn default() -> Self {
        Self {
            road: Rgba([0x0D, 0x11, 0x17, 255]),
            stripe: Rgba([255, 255, 255, 255]),
            stripe_alpha: 0.2,
            // rgba(255, 255, 255, 0.15)
            stripe_glow: Rgba([255, 255, 255, 38]),
            sidewalk: Rgba([0x1A, 0x1F, 0x2B, 255]),
            sidewalk_edge: Rgba([0x2D, 0x35, 0x48, 255]),
            lane_divider: Rgba([0x2A, 0x2A, 0x3A, 255]),
        }
    }
}

/// Horizontal bands of the lane, in logical pixels from the top.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Layout {
    pub top_sidewalk_end: f64,
    pub crosswalk_start: f64,
    pub crosswalk_end: f64,
    pub bottom_sidewalk_start: f64,
}

impl Layout {
    pub fn for_height(height: f64) -> Self {
        Self {
            top_sidewalk_end: height * TOP_SIDEWALK_END,
            crosswalk_start: height * CROSSWALK_START,
            crosswalk_end: height * CROSSWALK_END,
            bottom_sidewalk_start: height * BOTTOM_SIDEWALK_START,
        }
    }

    pub fn crosswalk_height(&self) -> f64 {
        self.crosswalk_end - self.crosswalk_start
    }
}

/// One character crossing the lane.
#[derive(Debug, Clone)]
pub struct Walker {
    pub x: f64,
    /// Fixed at spawn
    pub y: f64,
    /// Pixels per second, fixed at spawn
    pub speed: f64,
    pub direction: Facing,
    pub palette_index: usize,
    pub pose: Pose,
    /// Milliseconds spent in the current pose, in `[0, FRAME_DURATION_MS)`
    pub anim_timer: f64,
    pub sheet: Arc<SpriteSheet>,
}

impl Walker {
    /// Move and animate by `dt` seconds.
    pub fn advance(&mut self, dt: f64) {
        self.x += self.speed * self.direction.sign() * dt;
        self.anim_timer += dt * 1000.0;
        while self.anim_timer >= FRAME_DURATION_MS {
            self.anim_timer -= FRAME_DURATION_MS;
            self.pose = self.pose.next();
        }
    }

    /// The sprite for the current pose and direction
    pub fn sprite(&self) -> &image::RgbaImage {
        self.sheet.frame(self.pose, self.direction)
    }
}

/// A lane rendered into an in-memory image with an OS-seeded generator.
pub type HeadlessLane = CrosswalkRenderer<ImageSurface, SmallRandom>;

/// Simulation engine for one lane.
pub struct CrosswalkRenderer<S: Surface, R: RandomSource = SmallRandom> {
    profile: LaneProfile,
    surface: S,
    random: R,
    style: SceneStyle,
    viewport: Viewport,
    layout: Layout,
    rate: f64,
    walkers: Vec<Walker>,
    accumulator: f64,
    last_timestamp: Option<f64>,
    frames: FrameLoop,
    sprites: SpriteCache,
}

impl<S: Surface, R: RandomSource> CrosswalkRenderer<S, R> {
    /// Configure a lane and size it to the viewport.
    pub fn new(profile: LaneProfile, surface: S, viewport: Viewport, initial_rate: f64, random: R) -> Self {
        let mut lane = Self {
            profile,
            surface,
            random,
            style: SceneStyle::default(),
            viewport,
            layout: Layout::default(),
            rate: 0.0,
            walkers: Vec::new(),
            accumulator: 0.0,
            last_timestamp: None,
            frames: FrameLoop::new(),
            sprites: SpriteCache::new(),
        };
        lane.set_rate(initial_rate);
        lane.on_resize(viewport);
        lane
    }

    pub fn with_style(mut self, style: SceneStyle) -> Self {
        self.style = style;
        self
    }

    /// Replace the target arrival rate (walkers per second).
    ///
    /// Takes effect on the next tick. Negative and NaN rates are stored as 0;
    /// the lane's spawn policy applies any floor.
    pub fn set_rate(&mut self, rate: f64) {
        self.rate = if rate.is_nan() { 0.0 } else { rate.max(0.0) };
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Spawns per second this lane currently uses
    pub fn effective_rate(&self) -> f64 {
        self.profile.spawn_policy.effective_rate(self.rate)
    }

    /// Resize the backing buffer and recompute layout bands.
    ///
    /// Safe at any time, including before the first frame and mid-animation.
    pub fn on_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        let (backing_w, backing_h) = viewport.backing_size();
        self.surface.resize(backing_w, backing_h);
        self.surface.set_scale(viewport.pixel_ratio());

        let (_, height) = viewport.logical_size();
        self.layout = Layout::for_height(height);
        debug!(
            lane = %self.profile.archetype,
            width = backing_w,
            height = backing_h,
            crosswalk_start = self.layout.crosswalk_start,
            crosswalk_end = self.layout.crosswalk_end,
            "lane resized"
        );
    }

    /// Reset the frame clock, pre-populate and begin the frame loop.
    ///
    /// Returns the ticket the host must present with the first frame.
    pub fn start(&mut self) -> FrameTicket {
        self.last_timestamp = None;
        let prepopulated = self.prepopulate();
        info!(lane = %self.profile.archetype, prepopulated, rate = self.rate, "lane started");
        self.frames.start()
    }

    /// Halt the frame loop. Idempotent; any ticket already handed out is void.
    pub fn stop(&mut self) {
        if self.frames.is_running() {
            info!(lane = %self.profile.archetype, walkers = self.walkers.len(), "lane stopped");
        }
        self.frames.stop();
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_running()
    }

    /// Run one frame at `timestamp` milliseconds.
    ///
    /// Returns the ticket for the next frame, or `None` when `ticket` is
    /// stale or the lane was stopped, in which case nothing is simulated.
    pub fn frame(&mut self, ticket: FrameTicket, timestamp: f64) -> Option<FrameTicket> {
        let next = self.frames.accept(ticket)?;
        self.step(timestamp);
        Some(next)
    }

    /// Simulate and draw one frame, outside of the frame loop.
    ///
    /// The first call after [`start`](Self::start) establishes the clock
    /// and simulates zero elapsed time.
    ///
    /// A non-finite timestamp simulates zero time and leaves the clock where
    /// it was.
    pub fn step(&mut self, timestamp: f64) {
        let dt = match self.last_timestamp {
            Some(last) if timestamp.is_finite() => ((timestamp - last) / 1000.0).clamp(0.0, MAX_FRAME_STEP),
            _ => 0.0,
        };
        if timestamp.is_finite() {
            self.last_timestamp = Some(timestamp);
        }

        self.tick(dt);
        self.draw();
    }

    /// Advance the simulation by `dt` seconds: spawn, move, animate, cull.
    ///
    /// Negative or NaN steps count as zero. The per-frame clamp is applied by
    /// [`step`](Self::step), not here.
    pub fn tick(&mut self, dt: f64) {
        let dt = if dt.is_nan() { 0.0 } else { dt.max(0.0) };

        self.accumulator += dt * self.effective_rate();
        while self.accumulator >= 1.0 && self.walkers.len() < self.profile.capacity {
            self.spawn(None);
            self.accumulator -= 1.0;
        }
        if self.walkers.len() >= self.profile.capacity {
            self.accumulator = 0.0;
        }

        for walker in &mut self.walkers {
            walker.advance(dt);
        }

        let limit = self.exit_bound();
        self.walkers.retain(|w| w.x <= limit);
    }

    /// Right-edge x beyond which walkers are removed
    pub fn exit_bound(&self) -> f64 {
        self.logical_width() + self.profile.char_width() * 2.0
    }

    /// Add one walker, at `start_x` or just off the left edge.
    ///
    /// Does not check capacity.
    pub fn spawn(&mut self, start_x: Option<f64>) -> &Walker {
        let archetype = self.profile.archetype;
        let palette_index = self.random.index(palette_count(archetype));
        let y_range = (self.layout.crosswalk_height() - self.profile.char_height()).max(0.0);
        let y = self.random.offset(self.layout.crosswalk_start, y_range);
        let speed = self.random.offset(self.profile.base_speed, self.profile.speed_jitter);
        let pose = Pose::wrapping(self.random.index(POSE_COUNT as usize));
        let anim_timer = self.random.offset(0.0, FRAME_DURATION_MS);

        let walker = Walker {
            x: start_x.unwrap_or(-self.profile.char_width()),
            y,
            speed,
            direction: Facing::Right,
            palette_index,
            pose,
            anim_timer,
            sheet: self.sprites.get(archetype, palette_index),
        };
        self.walkers.push(walker);
        &self.walkers[self.walkers.len() - 1]
    }

    /// Scatter walkers across the visible width so the lane does not start
    /// empty. Never exceeds capacity.
    fn prepopulate(&mut self) -> usize {
        let room = self.profile.capacity.saturating_sub(self.walkers.len());
        let count = self.profile.prepopulate.min(room);
        let width = self.logical_width();
        let char_w = self.profile.char_width();
        for _ in 0..count {
            let x = self.random.offset(-char_w, width + char_w);
            self.spawn(Some(x));
        }
        count
    }

    /// Redraw the background and every walker, deepest first.
    pub fn draw(&mut self) {
        self.draw_background();

        self.walkers.sort_by(|a, b| a.y.total_cmp(&b.y));
        for walker in &self.walkers {
            self.surface.draw_image(walker.sprite(), walker.x, walker.y);
        }
    }

    fn draw_background(&mut self) {
        let (w, h) = self.viewport.logical_size();
        let layout = self.layout;
        let style = self.style;
        let surface = &mut self.surface;

        surface.set_global_alpha(1.0);
        surface.fill_rect(0.0, 0.0, w, h, style.road);

        surface.fill_rect(0.0, 0.0, w, layout.top_sidewalk_end, style.sidewalk);
        surface.fill_rect(0.0, layout.top_sidewalk_end - 2.0, w, 3.0, style.sidewalk_edge);

        surface.fill_rect(0.0, layout.bottom_sidewalk_start, w, h - layout.bottom_sidewalk_start, style.sidewalk);
        surface.fill_rect(0.0, layout.bottom_sidewalk_start, w, 3.0, style.sidewalk_edge);

        for sy in stripe_offsets(&layout) {
            surface.fill_rect(0.0, sy - 2.0, w, STRIPE_HEIGHT + 4.0, style.stripe_glow);
            surface.set_global_alpha(style.stripe_alpha);
            surface.fill_rect(0.0, sy, w, STRIPE_HEIGHT, style.stripe);
            surface.set_global_alpha(1.0);
        }

        surface.fill_rect(0.0, layout.crosswalk_start - 1.0, w, 1.0, style.lane_divider);
        surface.fill_rect(0.0, layout.crosswalk_end, w, 1.0, style.lane_divider);
    }

    pub fn logical_width(&self) -> f64 {
        self.viewport.logical_size().0
    }

    pub fn profile(&self) -> &LaneProfile {
        &self.profile
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn walkers(&self) -> &[Walker] {
        &self.walkers
    }

    pub fn walkers_mut(&mut self) -> &mut Vec<Walker> {
        &mut self.walkers
    }

    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    pub fn sprite_cache(&self) -> &SpriteCache {
        &self.sprites
    }

    /// Build every palette's sheet for this lane's archetype up front, so
    /// the first frames do not stall on sheet builds.
    pub fn prewarm_sprites(&mut self) {
        self.sprites.prewarm(self.profile.archetype);
        debug!(lane = %self.profile.archetype, sheets = self.sprites.len(), "sprite sheets prebuilt");
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

/// Top edge of each zebra stripe, centered in the crosswalk band.
pub fn stripe_offsets(layout: &Layout) -> impl Iterator<Item = f64> {
    let total = STRIPE_COUNT as f64 * STRIPE_HEIGHT + (STRIPE_COUNT - 1) as f64 * STRIPE_GAP;
    let start = layout.crosswalk_start + (layout.crosswalk_height() - total) / 2.0;
    (0..STRIPE_COUNT).map(move |i| start + i as f64 * (STRIPE_HEIGHT + STRIPE_GAP))
}
