//! Configuration schema types for `crosswalk.toml`
//!
//! Every section and field is optional; missing values fall back to the
//! built-in scene.

use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::crosswalk::SceneStyle;
use crate::models::{Archetype, LaneProfile};
use crate::stats::{DEFAULT_BASE_URL, HUMAN_PAYMENTS_PER_SECOND};
use crate::surface::Viewport;

/// Starting robot rate until the first successful fetch
pub const ROBOT_INITIAL_RATE: f64 = 0.5;

/// Root configuration structure for `crosswalk.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrosswalkConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub lanes: LanesConfig,
    #[serde(default)]
    pub style: StyleConfig,
}

/// Statistics polling settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// tRPC endpoint of the statistics API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Trailing window, in days
    #[serde(default = "default_timeframe")]
    pub timeframe_days: u32,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            poll_interval_secs: default_poll_interval(),
            timeframe_days: default_timeframe(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    300
}

fn default_timeframe() -> u32 {
    1
}

fn default_request_timeout() -> u64 {
    10
}

/// Headless canvas size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_dpr")]
    pub device_pixel_ratio: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { width: default_width(), height: default_height(), device_pixel_ratio: default_dpr() }
    }
}

fn default_width() -> u32 {
    960
}

fn default_height() -> u32 {
    240
}

fn default_dpr() -> f64 {
    1.0
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as f64, self.height as f64, self.device_pixel_ratio)
    }
}

/// Per-lane overrides of the archetype constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaneOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prepopulate: Option<usize>,
    /// Rate used before the feed reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanesConfig {
    #[serde(default)]
    pub human: LaneOverrides,
    #[serde(default)]
    pub robot: LaneOverrides,
}

impl LanesConfig {
    pub fn get(&self, archetype: Archetype) -> &LaneOverrides {
        match archetype {
            Archetype::Human => &self.human,
            Archetype::Robot => &self.robot,
        }
    }
}

/// Scene colors as CSS strings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    #[serde(default = "default_road")]
    pub road: String,
    #[serde(default = "default_stripe")]
    pub stripe: String,
    #[serde(default = "default_stripe_glow")]
    pub stripe_glow: String,
    #[serde(default = "default_sidewalk")]
    pub sidewalk: String,
    #[serde(default = "default_sidewalk_edge")]
    pub sidewalk_edge: String,
    #[serde(default = "default_lane_divider")]
    pub lane_divider: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            road: default_road(),
            stripe: default_stripe(),
            stripe_glow: default_stripe_glow(),
            sidewalk: default_sidewalk(),
            sidewalk_edge: default_sidewalk_edge(),
            lane_divider: default_lane_divider(),
        }
    }
}

fn default_road() -> String {
    "#0D1117".to_string()
}

fn default_stripe() -> String {
    "#FFFFFF".to_string()
}

fn default_stripe_glow() -> String {
    "rgba(255, 255, 255, 0.15)".to_string()
}

fn default_sidewalk() -> String {
    "#1A1F2B".to_string()
}

fn default_sidewalk_edge() -> String {
    "#2D3548".to_string()
}

fn default_lane_divider() -> String {
    "#2A2A3A".to_string()
}

impl StyleConfig {
    fn entries(&self) -> [(&'static str, &str); 6] {
        [
            ("road", self.road.as_str()),
            ("stripe", self.stripe.as_str()),
            ("stripe_glow", self.stripe_glow.as_str()),
            ("sidewalk", self.sidewalk.as_str()),
            ("sidewalk_edge", self.sidewalk_edge.as_str()),
            ("lane_divider", self.lane_divider.as_str()),
        ]
    }

    /// Parse every color into a scene style.
    ///
    /// Colors that fail to parse keep the built-in value; run
    /// [`CrosswalkConfig::validate`] first to report them.
    pub fn scene_style(&self) -> SceneStyle {
        let mut style = SceneStyle::default();
        let slots = [
            (&self.road, &mut style.road),
            (&self.stripe, &mut style.stripe),
            (&self.stripe_glow, &mut style.stripe_glow),
            (&self.sidewalk, &mut style.sidewalk),
            (&self.sidewalk_edge, &mut style.sidewalk_edge),
            (&self.lane_divider, &mut style.lane_divider),
        ];
        for (css, slot) in slots {
            if let Ok(color) = parse_color(css) {
                *slot = color;
            }
        }
        style
    }
}

/// A validation error for a config field
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "style.road")
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "crosswalk.toml: '{}' {}", self.field, self.message)
    }
}

impl CrosswalkConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: String, message: &str| {
            errors.push(ConfigValidationError { field, message: message.to_string() });
        };

        if self.feed.poll_interval_secs == 0 {
            push("feed.poll_interval_secs".into(), "must be a positive integer");
        }
        if self.feed.request_timeout_secs == 0 {
            push("feed.request_timeout_secs".into(), "must be a positive integer");
        }
        if self.feed.timeframe_days == 0 {
            push("feed.timeframe_days".into(), "must be a positive integer");
        }
        if !self.feed.base_url.starts_with("http://") && !self.feed.base_url.starts_with("https://") {
            push("feed.base_url".into(), "must be an http(s) URL");
        }

        if self.viewport.width == 0 {
            push("viewport.width".into(), "must be a positive integer");
        }
        if self.viewport.height == 0 {
            push("viewport.height".into(), "must be a positive integer");
        }
        if !(self.viewport.device_pixel_ratio.is_finite() && self.viewport.device_pixel_ratio > 0.0) {
            push("viewport.device_pixel_ratio".into(), "must be a positive number");
        }

        for archetype in Archetype::ALL {
            let lane = self.lanes.get(archetype);
            if lane.capacity == Some(0) {
                push(format!("lanes.{}.capacity", archetype), "must be a positive integer");
            }
            if let Some(rate) = lane.initial_rate {
                if !(rate.is_finite() && rate >= 0.0) {
                    push(format!("lanes.{}.initial_rate", archetype), "must be a non-negative number");
                }
            }
        }

        for (name, css) in self.style.entries() {
            if let Err(e) = parse_color(css) {
                push(format!("style.{}", name), &format!("is not a valid color: {}", e));
            }
        }

        errors
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Archetype constants with this config's lane overrides applied
    pub fn lane_profile(&self, archetype: Archetype) -> LaneProfile {
        let mut profile = LaneProfile::for_archetype(archetype);
        let overrides = self.lanes.get(archetype);
        if let Some(capacity) = overrides.capacity {
            profile.capacity = capacity;
        }
        if let Some(prepopulate) = overrides.prepopulate {
            profile.prepopulate = prepopulate;
        }
        profile
    }

    /// Rate a lane starts with before the feed reports
    pub fn initial_rate(&self, archetype: Archetype) -> f64 {
        self.lanes.get(archetype).initial_rate.unwrap_or(match archetype {
            Archetype::Human => HUMAN_PAYMENTS_PER_SECOND,
            Archetype::Robot => ROBOT_INITIAL_RATE,
        })
    }
}
