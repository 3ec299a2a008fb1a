//! Game settings and tuning
//!
//! Serialized as JSON; every default reproduces the stock game balance.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum Level {
    #[default]
    Easy,
    Normal,
    Hard,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Easy, Level::Normal, Level::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Easy => "easy",
            Level::Normal => "normal",
            Level::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Level::Easy),
            "normal" => Some(Level::Normal),
            "hard" => Some(Level::Hard),
            _ => None,
        }
    }

    /// Rings around the center cell
    pub fn rings(&self) -> u32 {
        match self {
            Level::Easy => EASY_RINGS,
            Level::Normal => NORMAL_RINGS,
            Level::Hard => HARD_RINGS,
        }
    }
}

/// Game settings/tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Level picked last time
    pub level: Level,

    // === Region grouping ===
    /// Smallest region after repair
    pub region_min: usize,
    /// Largest region the flood fill aims for
    pub region_max: usize,

    // === Rotation ===
    /// Acceleration change per tick
    pub accel_step: f32,
    /// Acceleration bound
    pub accel_max: f32,

    // === Color matching ===
    /// Maximum hue distance for absorption (degrees)
    pub hue_tolerance: u16,
    /// Minimum marker saturation for absorption
    pub saturation_floor: u8,

    // === Intro zoom ===
    #[serde(default = "default_intro_scale")]
    pub intro_start_scale: f32,
    #[serde(default = "default_intro_wait")]
    pub intro_wait_ms: f32,
    #[serde(default = "default_intro_rate")]
    pub intro_rate: f32,
}

fn default_intro_scale() -> f32 {
    INTRO_START_SCALE
}

fn default_intro_wait() -> f32 {
    INTRO_WAIT_MS
}

fn default_intro_rate() -> f32 {
    INTRO_RATE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            level: Level::Easy,

            region_min: REGION_MIN_SIZE,
            region_max: REGION_MAX_SIZE,

            accel_step: ACCEL_STEP,
            accel_max: ACCEL_MAX,

            hue_tolerance: HUE_TOLERANCE,
            saturation_floor: SATURATION_FLOOR,

            intro_start_scale: INTRO_START_SCALE,
            intro_wait_ms: INTRO_WAIT_MS,
            intro_rate: INTRO_RATE,
        }
    }
}

impl Settings {
    /// Settings with the given level and stock tuning
    pub fn for_level(level: Level) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Check tuning invariants
    ///
    /// # Panics
    ///
    /// Panics on malformed region bounds, acceleration or intro values.
    pub fn validate(&self) {
        assert!(self.region_min >= 1, "region_min must be positive");
        assert!(
            self.region_min <= self.region_max,
            "region_min {} exceeds region_max {}",
            self.region_min,
            self.region_max
        );
        assert!(
            self.accel_step > 0.0 && self.accel_step <= self.accel_max,
            "accel_step must be in (0, accel_max]"
        );
        assert!(self.hue_tolerance <= 180, "hue_tolerance above 180 matches every hue");
        assert!(
            self.intro_start_scale > 0.0 && self.intro_start_scale <= 1.0,
            "intro_start_scale must be in (0, 1]"
        );
        assert!(self.intro_wait_ms >= 0.0 && self.intro_rate >= 0.0, "intro timing must be non-negative");
    }

    pub fn match_rule(&self) -> crate::sim::MatchRule {
        crate::sim::MatchRule {
            hue_tolerance: self.hue_tolerance,
            saturation_floor: self.saturation_floor,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    return settings;
                }
                Err(e) => log::warn!("Ignoring malformed settings {}: {}", path.display(), e),
            },
            Err(e) => log::debug!("No settings at {}: {}", path.display(), e),
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings as JSON
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
