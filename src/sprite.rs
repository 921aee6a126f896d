//! Procedural pixel-grid generation for walker sprites
//!
//! Every archetype is described as a stack of [`Layer`]s. A layer is either
//! drawn for every pose or picks one stroke list per pose. Strokes paint a
//! cell, a horizontal span or a rectangle with a palette role or a fixed
//! color, and are applied in order so later strokes overwrite earlier ones.
//!
//! Generation is a pure function of `(archetype, palette, pose)`.

use image::Rgba;

use crate::models::{Archetype, Pose, POSE_COUNT, SPRITE_HEIGHT, SPRITE_WIDTH};
use crate::palettes::{ResolvedPalette, Role};

/// Human eyes, independent of palette
const EYE_BLACK: Rgba<u8> = Rgba([0x1A, 0x1A, 0x1A, 255]);
/// Robot eye glint
const GLINT_WHITE: Rgba<u8> = Rgba([0xFF, 0xFF, 0xFF, 255]);
/// Robot cheeks
const ROSY_PINK: Rgba<u8> = Rgba([0xFF, 0x99, 0x99, 255]);

/// Where a stroke takes its color from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Role(Role),
    Fixed(Rgba<u8>),
}

impl Paint {
    fn resolve(self, palette: &ResolvedPalette) -> Rgba<u8> {
        match self {
            Paint::Role(role) => palette.rgba(role),
            Paint::Fixed(color) => color,
        }
    }
}

/// A single drawing instruction over the sprite grid. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stroke {
    Cell { x: i32, y: i32, paint: Paint },
    Span { y: i32, x1: i32, x2: i32, paint: Paint },
    Rect { x1: i32, y1: i32, x2: i32, y2: i32, paint: Paint },
}

/// A group of strokes drawn together.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    /// Drawn identically in every pose
    Always(&'static [Stroke]),
    /// One stroke list per pose, indexed by pose
    Posed([&'static [Stroke]; POSE_COUNT as usize]),
}

impl Layer {
    fn strokes(&self, pose: Pose) -> &'static [Stroke] {
        match self {
            Layer::Always(strokes) => *strokes,
            Layer::Posed(per_pose) => per_pose[pose.index()],
        }
    }
}

const fn cell(x: i32, y: i32, paint: Paint) -> Stroke {
    Stroke::Cell { x, y, paint }
}

const fn span(y: i32, x1: i32, x2: i32, paint: Paint) -> Stroke {
    Stroke::Span { y, x1, x2, paint }
}

const fn rect(x1: i32, y1: i32, x2: i32, y2: i32, paint: Paint) -> Stroke {
    Stroke::Rect { x1, y1, x2, y2, paint }
}

const SKIN: Paint = Paint::Role(Role::Skin);
const HAIR: Paint = Paint::Role(Role::Hair);
const SHIRT: Paint = Paint::Role(Role::Shirt);
const PANTS: Paint = Paint::Role(Role::Pants);
const SHOES: Paint = Paint::Role(Role::Shoes);

const BODY: Paint = Paint::Role(Role::Body);
const ACCENT: Paint = Paint::Role(Role::Accent);
const EYE: Paint = Paint::Role(Role::Eye);
const DARK: Paint = Paint::Role(Role::Dark);
const HIGHLIGHT: Paint = Paint::Role(Role::Highlight);

// ---------------------------------------------------------------------------
// Human
// ---------------------------------------------------------------------------

const HUMAN_HEAD: &[Stroke] = &[
    span(0, 5, 10, HAIR),
    span(1, 4, 11, HAIR),
    span(2, 4, 5, HAIR),
    span(2, 6, 11, SKIN),
    cell(4, 3, HAIR),
    span(3, 5, 11, SKIN),
    cell(7, 3, Paint::Fixed(EYE_BLACK)),
    cell(9, 3, Paint::Fixed(EYE_BLACK)),
    span(4, 5, 10, SKIN),
    span(5, 6, 9, SKIN),
    // neck
    span(6, 7, 8, SKIN),
];

const HUMAN_TORSO: &[Stroke] = &[rect(6, 7, 9, 8, SHIRT), rect(5, 9, 10, 13, SHIRT)];

const HUMAN_ARMS_NEUTRAL: &[Stroke] = &[rect(4, 8, 4, 13, SKIN), rect(11, 8, 11, 13, SKIN)];

// Left arm forward, right arm back
const HUMAN_ARMS_STEP_LEFT: &[Stroke] = &[
    cell(4, 7, SKIN),
    cell(3, 8, SKIN),
    cell(3, 9, SKIN),
    cell(4, 10, SKIN),
    cell(11, 9, SKIN),
    cell(12, 10, SKIN),
    cell(12, 11, SKIN),
    cell(11, 12, SKIN),
];

const HUMAN_ARMS_STEP_RIGHT: &[Stroke] = &[
    cell(11, 7, SKIN),
    cell(12, 8, SKIN),
    cell(12, 9, SKIN),
    cell(11, 10, SKIN),
    cell(4, 9, SKIN),
    cell(3, 10, SKIN),
    cell(3, 11, SKIN),
    cell(4, 12, SKIN),
];

const HUMAN_HIPS: &[Stroke] = &[rect(5, 14, 10, 16, PANTS)];

const HUMAN_LEGS_TOGETHER: &[Stroke] = &[rect(5, 17, 10, 18, PANTS)];

// Legs splay outward toward the feet
const HUMAN_LEGS_APART: &[Stroke] = &[
    span(17, 5, 6, PANTS),
    span(17, 9, 10, PANTS),
    span(18, 4, 5, PANTS),
    span(18, 10, 11, PANTS),
];

const HUMAN_SHOES_TOGETHER: &[Stroke] = &[rect(5, 19, 7, 20, SHOES), rect(8, 19, 10, 20, SHOES)];

const HUMAN_SHOES_APART: &[Stroke] = &[rect(3, 19, 6, 20, SHOES), rect(9, 19, 12, 20, SHOES)];

const HUMAN_LAYERS: &[Layer] = &[
    Layer::Always(HUMAN_HEAD),
    Layer::Always(HUMAN_TORSO),
    Layer::Posed([HUMAN_ARMS_NEUTRAL, HUMAN_ARMS_STEP_LEFT, HUMAN_ARMS_STEP_RIGHT]),
    Layer::Always(HUMAN_HIPS),
    Layer::Posed([HUMAN_LEGS_TOGETHER, HUMAN_LEGS_APART, HUMAN_LEGS_APART]),
    Layer::Posed([HUMAN_SHOES_TOGETHER, HUMAN_SHOES_APART, HUMAN_SHOES_APART]),
];

// ---------------------------------------------------------------------------
// Robot: big round head, big eyes, tiny body
// ---------------------------------------------------------------------------

const ROBOT_ANTENNA: &[Stroke] = &[rect(7, 0, 8, 1, ACCENT), span(2, 7, 8, DARK)];

const ROBOT_HEAD: &[Stroke] = &[
    span(3, 5, 10, HIGHLIGHT),
    span(4, 3, 12, HIGHLIGHT),
    rect(2, 5, 2, 9, DARK),
    rect(3, 5, 12, 9, BODY),
    rect(13, 5, 13, 9, DARK),
    span(10, 3, 12, BODY),
    cell(2, 10, DARK),
    cell(13, 10, DARK),
    span(11, 4, 11, DARK),
];

const ROBOT_FACE: &[Stroke] = &[
    // eyes, framed by dark corners with a white glint
    span(6, 4, 11, EYE),
    span(7, 4, 11, EYE),
    span(8, 4, 11, EYE),
    cell(4, 6, DARK),
    cell(7, 6, DARK),
    cell(8, 6, DARK),
    cell(11, 6, DARK),
    cell(4, 8, DARK),
    cell(7, 8, DARK),
    cell(8, 8, DARK),
    cell(11, 8, DARK),
    cell(5, 7, Paint::Fixed(GLINT_WHITE)),
    cell(10, 7, Paint::Fixed(GLINT_WHITE)),
    // smile
    cell(6, 9, DARK),
    cell(7, 10, DARK),
    cell(8, 10, DARK),
    cell(9, 9, DARK),
    // cheeks
    cell(3, 8, Paint::Fixed(ROSY_PINK)),
    cell(12, 8, Paint::Fixed(ROSY_PINK)),
];

const ROBOT_BODY: &[Stroke] = &[
    span(12, 6, 9, BODY),
    rect(5, 13, 5, 16, DARK),
    rect(6, 13, 9, 16, BODY),
    rect(10, 13, 10, 16, DARK),
    // power core
    span(14, 7, 8, ACCENT),
];

const ROBOT_ARMS_NEUTRAL: &[Stroke] = &[
    cell(4, 13, BODY),
    cell(4, 14, BODY),
    cell(4, 15, HIGHLIGHT),
    cell(11, 13, BODY),
    cell(11, 14, BODY),
    cell(11, 15, HIGHLIGHT),
];

const ROBOT_ARMS_STEP_LEFT: &[Stroke] = &[
    cell(3, 12, BODY),
    cell(3, 13, BODY),
    cell(4, 14, HIGHLIGHT),
    cell(11, 14, BODY),
    cell(12, 15, BODY),
    cell(12, 16, HIGHLIGHT),
];

const ROBOT_ARMS_STEP_RIGHT: &[Stroke] = &[
    cell(11, 12, BODY),
    cell(12, 13, BODY),
    cell(12, 14, HIGHLIGHT),
    cell(4, 14, BODY),
    cell(3, 15, BODY),
    cell(3, 16, HIGHLIGHT),
];

const ROBOT_LEGS_TOGETHER: &[Stroke] = &[
    span(17, 5, 6, BODY),
    span(17, 9, 10, BODY),
    span(18, 5, 6, BODY),
    span(18, 9, 10, BODY),
    span(19, 4, 6, DARK),
    span(19, 9, 11, DARK),
];

const ROBOT_LEGS_APART: &[Stroke] = &[
    span(17, 4, 5, BODY),
    span(17, 10, 11, BODY),
    span(18, 3, 5, BODY),
    span(18, 10, 12, BODY),
    span(19, 2, 5, DARK),
    span(19, 10, 13, DARK),
];

const ROBOT_FOOT_GLOW: [&[Stroke]; 3] =
    [&[], &[span(20, 3, 4, ACCENT)], &[span(20, 11, 12, ACCENT)]];

const ROBOT_LAYERS: &[Layer] = &[
    Layer::Always(ROBOT_ANTENNA),
    Layer::Always(ROBOT_HEAD),
    Layer::Always(ROBOT_FACE),
    Layer::Always(ROBOT_BODY),
    Layer::Posed([ROBOT_ARMS_NEUTRAL, ROBOT_ARMS_STEP_LEFT, ROBOT_ARMS_STEP_RIGHT]),
    Layer::Posed([ROBOT_LEGS_TOGETHER, ROBOT_LEGS_APART, ROBOT_LEGS_APART]),
    Layer::Posed(ROBOT_FOOT_GLOW),
];

/// The layer stack that draws an archetype.
pub fn layers(archetype: Archetype) -> &'static [Layer] {
    match archetype {
        Archetype::Human => HUMAN_LAYERS,
        Archetype::Robot => ROBOT_LAYERS,
    }
}

/// A fixed-size grid of optional colors for one pose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    cells: Vec<Option<Rgba<u8>>>,
}

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    pub const WIDTH: u32 = SPRITE_WIDTH;
    pub const HEIGHT: u32 = SPRITE_HEIGHT;

    /// An empty grid with no pixels set
    pub fn new() -> Self {
        Self { cells: vec![None; (Self::WIDTH * Self::HEIGHT) as usize] }
    }

    pub fn width(&self) -> u32 {
        Self::WIDTH
    }

    pub fn height(&self) -> u32 {
        Self::HEIGHT
    }

    fn offset(x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < Self::WIDTH as i32 && y >= 0 && y < Self::HEIGHT as i32 {
            Some(y as usize * Self::WIDTH as usize + x as usize)
        } else {
            None
        }
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Rgba<u8>> {
        Self::offset(x, y).and_then(|i| self.cells[i])
    }

    /// Set a cell. Coordinates outside the grid are ignored.
    pub fn set(&mut self, x: i32, y: i32, color: Rgba<u8>) {
        if let Some(i) = Self::offset(x, y) {
            self.cells[i] = Some(color);
        }
    }

    pub fn fill_span(&mut self, y: i32, x1: i32, x2: i32, color: Rgba<u8>) {
        for x in x1..=x2 {
            self.set(x, y, color);
        }
    }

    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba<u8>) {
        for y in y1..=y2 {
            self.fill_span(y, x1, x2, color);
        }
    }

    pub fn apply(&mut self, stroke: &Stroke, palette: &ResolvedPalette) {
        match *stroke {
            Stroke::Cell { x, y, paint } => self.set(x, y, paint.resolve(palette)),
            Stroke::Span { y, x1, x2, paint } => self.fill_span(y, x1, x2, paint.resolve(palette)),
            Stroke::Rect { x1, y1, x2, y2, paint } => {
                self.fill_rect(x1, y1, x2, y2, paint.resolve(palette))
            }
        }
    }

    /// Number of cells holding a color
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// Generate the pixel grid for one pose of an archetype.
///
/// # Examples
///
/// ```
/// use crosswalk::models::{Archetype, Pose};
/// use crosswalk::palettes::Palette;
/// use crosswalk::sprite::generate;
///
/// let palette = Palette::get(Archetype::Robot, 0).resolve();
/// let grid = generate(Archetype::Robot, &palette, Pose::NEUTRAL);
/// assert_eq!((grid.width(), grid.height()), (16, 24));
/// assert_eq!(grid.get(5, 7), Some(image::Rgba([255, 255, 255, 255])));
/// ```
pub fn generate(archetype: Archetype, palette: &ResolvedPalette, pose: Pose) -> PixelGrid {
    let mut grid = PixelGrid::new();
    for layer in layers(archetype) {
        for stroke in layer.strokes(pose) {
            grid.apply(stroke, palette);
        }
    }
    grid
}
