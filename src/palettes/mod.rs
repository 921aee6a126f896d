//! Built-in character palettes.
//!
//! Each archetype has its own fixed table of palettes. A palette names a
//! handful of color roles; sprite layouts refer to roles, never to colors,
//! so every palette reuses the same layout. Tables are indexed with
//! wrap-around so any index selects a valid palette.

use crate::color::{parse_color_lenient, MAGENTA};
use crate::models::Archetype;
use image::Rgba;

/// A named color slot that sprite layouts paint with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    // Human roles
    Skin,
    Hair,
    Shirt,
    Pants,
    Shoes,
    // Robot roles
    Body,
    Accent,
    Eye,
    Dark,
    Highlight,
}

impl Role {
    pub const HUMAN: [Role; 5] = [Role::Skin, Role::Hair, Role::Shirt, Role::Pants, Role::Shoes];
    pub const ROBOT: [Role; 5] = [Role::Body, Role::Accent, Role::Eye, Role::Dark, Role::Highlight];

    pub fn name(self) -> &'static str {
        match self {
            Role::Skin => "skin",
            Role::Hair => "hair",
            Role::Shirt => "shirt",
            Role::Pants => "pants",
            Role::Shoes => "shoes",
            Role::Body => "body",
            Role::Accent => "accent",
            Role::Eye => "eye",
            Role::Dark => "dark",
            Role::Highlight => "highlight",
        }
    }

    /// Roles a palette of the given archetype defines
    pub fn for_archetype(archetype: Archetype) -> &'static [Role; 5] {
        match archetype {
            Archetype::Human => &Role::HUMAN,
            Archetype::Robot => &Role::ROBOT,
        }
    }
}

/// Colors for a walking human
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HumanPalette {
    pub skin: &'static str,
    pub hair: &'static str,
    pub shirt: &'static str,
    pub pants: &'static str,
    pub shoes: &'static str,
}

/// Colors for a baby robot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotPalette {
    pub body: &'static str,
    pub accent: &'static str,
    pub eye: &'static str,
    pub dark: &'static str,
    pub highlight: &'static str,
}

/// Skin tones, hair and outfits for the pedestrian crowd.
pub const HUMAN_PALETTES: [HumanPalette; 8] = [
    HumanPalette { skin: "#FFD5B8", hair: "#4A3728", shirt: "#3B82F6", pants: "#1E3A5F", shoes: "#2D2D2D" },
    HumanPalette { skin: "#C68642", hair: "#1A1A1A", shirt: "#EF4444", pants: "#374151", shoes: "#1A1A1A" },
    HumanPalette { skin: "#FFDBAC", hair: "#D4A574", shirt: "#10B981", pants: "#1F2937", shoes: "#4A3728" },
    HumanPalette { skin: "#8D5524", hair: "#1A1A1A", shirt: "#F59E0B", pants: "#1E293B", shoes: "#2D2D2D" },
    HumanPalette { skin: "#FFE0BD", hair: "#8B4513", shirt: "#8B5CF6", pants: "#334155", shoes: "#1A1A1A" },
    HumanPalette { skin: "#F1C27D", hair: "#2C1810", shirt: "#EC4899", pants: "#1E293B", shoes: "#3D2B1F" },
    HumanPalette { skin: "#FFCD94", hair: "#654321", shirt: "#06B6D4", pants: "#374151", shoes: "#2D2D2D" },
    HumanPalette { skin: "#E0AC69", hair: "#1A1A1A", shirt: "#F97316", pants: "#1F2937", shoes: "#1A1A1A" },
];

/// Metal finishes with a glowing accent per robot.
pub const ROBOT_PALETTES: [RobotPalette; 4] = [
    RobotPalette { body: "#A8B8C8", accent: "#00FF88", eye: "#00FF88", dark: "#6B7B8B", highlight: "#C8D8E8" },
    RobotPalette { body: "#B0C4DE", accent: "#00BFFF", eye: "#00BFFF", dark: "#708090", highlight: "#D6E8F0" },
    RobotPalette { body: "#A0A0B0", accent: "#FF6B00", eye: "#FF6B00", dark: "#606070", highlight: "#C0C0D0" },
    RobotPalette { body: "#90A8C0", accent: "#FFD700", eye: "#FFD700", dark: "#5A7090", highlight: "#B0C8E0" },
];

/// Number of palettes available to an archetype.
pub fn palette_count(archetype: Archetype) -> usize {
    match archetype {
        Archetype::Human => HUMAN_PALETTES.len(),
        Archetype::Robot => ROBOT_PALETTES.len(),
    }
}

/// A palette of either archetype, borrowed from the static tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Human(&'static HumanPalette),
    Robot(&'static RobotPalette),
}

impl Palette {
    /// Select a palette by index, wrapping around the archetype's table.
    pub fn get(archetype: Archetype, index: usize) -> Self {
        match archetype {
            Archetype::Human => Palette::Human(&HUMAN_PALETTES[index % HUMAN_PALETTES.len()]),
            Archetype::Robot => Palette::Robot(&ROBOT_PALETTES[index % ROBOT_PALETTES.len()]),
        }
    }

    pub fn archetype(self) -> Archetype {
        match self {
            Palette::Human(_) => Archetype::Human,
            Palette::Robot(_) => Archetype::Robot,
        }
    }

    /// The CSS color assigned to a role, if this palette defines it.
    pub fn color(self, role: Role) -> Option<&'static str> {
        match (self, role) {
            (Palette::Human(p), Role::Skin) => Some(p.skin),
            (Palette::Human(p), Role::Hair) => Some(p.hair),
            (Palette::Human(p), Role::Shirt) => Some(p.shirt),
            (Palette::Human(p), Role::Pants) => Some(p.pants),
            (Palette::Human(p), Role::Shoes) => Some(p.shoes),
            (Palette::Robot(p), Role::Body) => Some(p.body),
            (Palette::Robot(p), Role::Accent) => Some(p.accent),
            (Palette::Robot(p), Role::Eye) => Some(p.eye),
            (Palette::Robot(p), Role::Dark) => Some(p.dark),
            (Palette::Robot(p), Role::Highlight) => Some(p.highlight),
            _ => None,
        }
    }

    /// Parse every role color up front.
    pub fn resolve(self) -> ResolvedPalette {
        let archetype = self.archetype();
        let mut colors = [MAGENTA; 5];
        for (slot, role) in colors.iter_mut().zip(Role::for_archetype(archetype)) {
            *slot = self.color(*role).map(parse_color_lenient).unwrap_or(MAGENTA);
        }
        ResolvedPalette { archetype, colors }
    }
}

/// A palette with its role colors parsed to RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPalette {
    archetype: Archetype,
    colors: [Rgba<u8>; 5],
}

impl ResolvedPalette {
    pub fn archetype(&self) -> Archetype {
        self.archetype
    }

    /// RGBA for a role; roles from the other archetype come back magenta.
    pub fn rgba(&self, role: Role) -> Rgba<u8> {
        Role::for_archetype(self.archetype)
            .iter()
            .position(|r| *r == role)
            .map(|i| self.colors[i])
            .unwrap_or(MAGENTA)
    }
}
