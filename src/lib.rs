//! Colorful Drop - a rotating hexagonal field game core
//!
//! Core modules:
//! - `sim`: Field generation, adjacency, region grouping and per-tick play logic
//! - `scene`: Title/menu/play/clear scene state machine
//! - `settings`: Data-driven tuning and preferences
//! - `best_times`: Per-level best clear times

pub mod best_times;
pub mod scene;
pub mod settings;
pub mod sim;

pub use best_times::BestTimes;
pub use scene::{Scene, SceneCommand};
pub use settings::{Level, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Number of rings around the center cell per level
    pub const EASY_RINGS: u32 = 6;
    pub const NORMAL_RINGS: u32 = 8;
    pub const HARD_RINGS: u32 = 10;

    /// Field cell diameter is the shorter viewport side divided by this
    pub const VIEWPORT_CELLS: f32 = 5.0;
    /// Marker diameter relative to a field cell
    pub const MARKER_SCALE: f32 = 0.8;

    /// Default region size bounds
    pub const REGION_MIN_SIZE: usize = 2;
    pub const REGION_MAX_SIZE: usize = 3;

    /// Rotation acceleration per tick and its bound (radians/ms²)
    pub const ACCEL_STEP: f32 = 2e-6;
    pub const ACCEL_MAX: f32 = 7e-5;

    /// Maximum circular hue distance (degrees) for absorption
    pub const HUE_TOLERANCE: u16 = 30;
    /// Minimum marker saturation for absorption
    pub const SATURATION_FLOOR: u8 = 80;

    /// Intro zoom: start scale, delay before zooming (ms), zoom rate (per ms)
    pub const INTRO_START_SCALE: f32 = 0.25;
    pub const INTRO_WAIT_MS: f32 = 500.0;
    pub const INTRO_RATE: f32 = 1e-3;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::TAU;
    while angle >= TAU {
        angle -= TAU;
    }
    while angle < 0.0 {
        angle += TAU;
    }
    // Tiny negative inputs round up to exactly TAU
    if angle >= TAU { 0.0 } else { angle }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
