//! Core data types shared by the sprite generator and the lane engine

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width of every pixel grid, in cells
pub const SPRITE_WIDTH: u32 = 16;

/// Height of every pixel grid, in cells
pub const SPRITE_HEIGHT: u32 = 24;

/// Number of walking poses per archetype
pub const POSE_COUNT: u8 = 3;

/// Time each pose stays on screen before the walk cycle advances
pub const FRAME_DURATION_MS: f64 = 150.0;

/// One of the two character kinds that walk a lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    /// Dense lane of small pedestrians
    Human,
    /// Sparse lane of larger baby robots
    Robot,
}

impl Archetype {
    pub const ALL: [Archetype; 2] = [Archetype::Human, Archetype::Robot];

    pub fn name(self) -> &'static str {
        match self {
            Archetype::Human => "human",
            Archetype::Robot => "robot",
        }
    }

    /// Integer pixel scale for rasterized sprites.
    ///
    /// Humans stay at 1x so thousands can overlap; robots render at 2x so
    /// each one reads as a bigger icon.
    pub fn sprite_scale(self) -> u32 {
        match self {
            Archetype::Human => 1,
            Archetype::Robot => 2,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "human" | "humans" => Ok(Archetype::Human),
            "robot" | "robots" => Ok(Archetype::Robot),
            other => Err(format!("unknown archetype '{}', expected 'human' or 'robot'", other)),
        }
    }
}

/// A walking pose index, always in `0..POSE_COUNT`.
///
/// Pose 0 stands neutral; poses 1 and 2 swing opposite limbs forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pose(u8);

impl Pose {
    pub const NEUTRAL: Pose = Pose(0);
    pub const STEP_LEFT: Pose = Pose(1);
    pub const STEP_RIGHT: Pose = Pose(2);
    pub const ALL: [Pose; POSE_COUNT as usize] = [Pose::NEUTRAL, Pose::STEP_LEFT, Pose::STEP_RIGHT];

    /// Build a pose from any integer, wrapping into range.
    pub fn wrapping(index: usize) -> Self {
        Pose((index % POSE_COUNT as usize) as u8)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The next pose in the walk cycle (0, 1, 2, 0, ...)
    pub fn next(self) -> Self {
        Pose((self.0 + 1) % POSE_COUNT)
    }
}

/// Which way a sprite faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// Signed unit of horizontal motion
    pub fn sign(self) -> f64 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Offset of this facing inside a pose pair of a sprite sheet
    pub fn sheet_offset(self) -> usize {
        match self {
            Facing::Right => 0,
            Facing::Left => 1,
        }
    }
}

/// How a lane converts the supplied arrival rate into spawns per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpawnPolicy {
    /// Ignore the supplied rate and spawn at a fixed saturation rate.
    Saturate(f64),
    /// Use the supplied rate, never dropping below the floor.
    Floor(f64),
}

impl SpawnPolicy {
    pub fn effective_rate(self, supplied: f64) -> f64 {
        match self {
            SpawnPolicy::Saturate(rate) => rate,
            SpawnPolicy::Floor(floor) => {
                if supplied.is_nan() {
                    floor
                } else {
                    supplied.max(floor)
                }
            }
        }
    }
}

/// Per-archetype constants for one lane.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneProfile {
    pub archetype: Archetype,
    /// Base walking speed in pixels per second
    pub base_speed: f64,
    /// Extra speed drawn uniformly from `[0, speed_jitter)`
    pub speed_jitter: f64,
    /// Maximum number of live walkers
    pub capacity: usize,
    pub spawn_policy: SpawnPolicy,
    /// Walkers scattered across the lane when it starts
    pub prepopulate: usize,
}

impl LaneProfile {
    pub fn for_archetype(archetype: Archetype) -> Self {
        match archetype {
            // Tiny 16x24 pedestrians, flooded so the lane always looks packed
            Archetype::Human => LaneProfile {
                archetype,
                base_speed: 30.0,
                speed_jitter: 20.0,
                capacity: 4000,
                spawn_policy: SpawnPolicy::Saturate(1000.0),
                prepopulate: 3000,
            },
            // 2x baby robots, paced by the live rate
            Archetype::Robot => LaneProfile {
                archetype,
                base_speed: 40.0,
                speed_jitter: 20.0,
                capacity: 20,
                spawn_policy: SpawnPolicy::Floor(0.5),
                prepopulate: 0,
            },
        }
    }

    pub fn scale(&self) -> u32 {
        self.archetype.sprite_scale()
    }

    /// Rendered walker width in pixels
    pub fn char_width(&self) -> f64 {
        (SPRITE_WIDTH * self.scale()) as f64
    }

    /// Rendered walker height in pixels
    pub fn char_height(&self) -> f64 {
        (SPRITE_HEIGHT * self.scale()) as f64
    }
}
