//! Criterion benchmarks for Crosswalk critical paths
//!
//! Benchmarks the per-frame and per-sheet operations:
//! - Color: CSS color parsing for palette roles
//! - Sprite: Pixel grid generation and rasterization
//! - Sprite sheet: Building the six mirrored frames
//! - Lane: Simulation ticks and full frames at capacity

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crosswalk::color::parse_color;
use crosswalk::crosswalk::CrosswalkRenderer;
use crosswalk::models::{Archetype, Facing, LaneProfile, Pose};
use crosswalk::palettes::Palette;
use crosswalk::random::SmallRandom;
use crosswalk::renderer::rasterize;
use crosswalk::sprite::generate;
use crosswalk::spritesheet::SpriteSheet;
use crosswalk::surface::{ImageSurface, Viewport};

// =============================================================================
// Test Data Generators
// =============================================================================

/// A started lane with `walkers` walkers spread across the viewport
fn make_lane(archetype: Archetype, walkers: usize) -> CrosswalkRenderer<ImageSurface, SmallRandom> {
    let mut profile = LaneProfile::for_archetype(archetype);
    profile.prepopulate = 0;
    profile.capacity = profile.capacity.max(walkers);
    let mut lane = CrosswalkRenderer::new(
        profile,
        ImageSurface::new(0, 0),
        Viewport::new(960.0, 240.0, 1.0),
        0.0,
        SmallRandom::seeded(42),
    );
    for i in 0..walkers {
        lane.spawn(Some((i as f64 * 37.0) % 960.0));
    }
    lane
}

// =============================================================================
// Color Benchmarks
// =============================================================================

fn bench_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("color");

    for css in ["#A8B8C8", "#00FF8880", "rgb(255, 128, 0)", "hsl(210, 40%, 50%)"].iter() {
        group.bench_with_input(BenchmarkId::new("parse_color", css), css, |b, css| {
            b.iter(|| parse_color(black_box(css)))
        });
    }

    group.finish();
}

// =============================================================================
// Sprite Benchmarks
// =============================================================================

fn bench_sprite(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprite");

    for archetype in Archetype::ALL {
        let palette = Palette::get(archetype, 0).resolve();
        group.bench_function(format!("generate_{}", archetype), |b| {
            b.iter(|| generate(black_box(archetype), &palette, Pose::STEP_LEFT))
        });

        let grid = generate(archetype, &palette, Pose::STEP_LEFT);
        group.bench_function(format!("rasterize_{}_mirrored", archetype), |b| {
            b.iter(|| rasterize(black_box(&grid), archetype.sprite_scale(), Facing::Left))
        });
    }

    group.finish();
}

fn bench_spritesheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("spritesheet");

    for archetype in Archetype::ALL {
        group.bench_function(format!("build_{}", archetype), |b| {
            b.iter(|| SpriteSheet::build(black_box(archetype), 1, archetype.sprite_scale()))
        });
    }

    group.finish();
}

// =============================================================================
// Lane Benchmarks
// =============================================================================

fn bench_lane(c: &mut Criterion) {
    let mut group = c.benchmark_group("lane");

    for walkers in [20usize, 500, 4000].iter() {
        group.throughput(Throughput::Elements(*walkers as u64));

        let mut lane = make_lane(Archetype::Human, *walkers);
        group.bench_with_input(BenchmarkId::new("tick", walkers), walkers, |b, _| {
            b.iter(|| {
                lane.tick(black_box(1.0 / 60.0));
                // Keep the population stable across iterations
                for w in lane.walkers_mut() {
                    w.x = w.x.rem_euclid(960.0);
                }
            })
        });

        let mut lane = make_lane(Archetype::Human, *walkers);
        group.bench_with_input(BenchmarkId::new("draw", walkers), walkers, |b, _| b.iter(|| lane.draw()));
    }

    group.finish();
}

// =============================================================================
// Criterion Configuration
// =============================================================================

criterion_group!(benches, bench_color, bench_sprite, bench_spritesheet, bench_lane);

criterion_main!(benches);
