//! Play session state
//!
//! Everything a round needs between ticks lives here: the field, its
//! adjacency, the region table, the palette, the marker and the rotation.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::adjacency::Adjacency;
use super::color::{Hsva, Palette};
use super::field::HexField;
use super::matcher::MatchRule;
use super::partition::{RegionId, RegionMap, partition};
use super::rotation::FieldRotation;
use crate::consts::{MARKER_SCALE, VIEWPORT_CELLS};
use crate::settings::{Level, Settings};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayPhase {
    /// Field zooming in, no input yet
    Intro,
    /// Active gameplay
    Playing,
    /// Marker left the field
    Cleared,
}

/// Events for the audio and UI collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First tick of a round
    Start,
    /// Timer started after the intro
    Go,
    /// A region was absorbed by the marker
    Drop { region: RegionId, cells: usize },
    /// Marker left the field
    Cleared { elapsed_ms: u64 },
}

/// Zoom-in animation played before the round starts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntroZoom {
    pub scale: f32,
    pub target: f32,
    pub wait_ms: f32,
    pub elapsed_ms: f32,
    /// Scale gained per millisecond once waiting is over
    pub rate: f32,
}

impl IntroZoom {
    /// # Panics
    ///
    /// Panics if `scale > target` or timing values are negative.
    pub fn new(scale: f32, target: f32, wait_ms: f32, rate: f32) -> Self {
        assert!(scale <= target, "intro zoom must grow");
        assert!(wait_ms >= 0.0 && rate >= 0.0, "intro timing must be non-negative");
        Self {
            scale,
            target,
            wait_ms,
            elapsed_ms: 0.0,
            rate,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed_ms += dt;
        if self.elapsed_ms >= self.wait_ms {
            self.scale = (self.scale + self.rate * dt).min(self.target);
        }
    }

    pub fn completed(&self) -> bool {
        self.scale >= self.target
    }
}

/// The marker (ball) as far as this crate is concerned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Marker {
    /// Position reported by physics
    pub pos: Vec2,
    pub diameter: f32,
    /// Region whose cells the marker has taken over
    pub region: RegionId,
    pub color: Hsva,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

/// Complete state of one round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayState {
    pub level: Level,
    /// Seed the field and palette were generated from
    pub rng_state: RngState,
    pub phase: PlayPhase,
    pub field: HexField,
    pub adjacency: Adjacency,
    pub regions: RegionMap,
    pub palette: Palette,
    pub marker: Marker,
    pub rotation: FieldRotation,
    pub intro: IntroZoom,
    pub rule: MatchRule,
    /// Milliseconds spent in the Playing phase
    pub elapsed_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl PlayState {
    /// Set up a round for `level` on a viewport of `viewport` pixels
    ///
    /// # Panics
    ///
    /// Panics if the settings are malformed or the viewport is too small to
    /// hold a cell.
    pub fn new(level: Level, viewport: Vec2, settings: &Settings, seed: u64) -> Self {
        settings.validate();

        let rng_state = RngState::new(seed);
        let mut rng = rng_state.to_rng();

        let field_diameter = (viewport.x.min(viewport.y) / VIEWPORT_CELLS).floor();
        let field = HexField::generate(level.rings(), field_diameter);
        let adjacency = Adjacency::build(field.len());
        let regions = partition(&adjacency, settings.region_min, settings.region_max, &mut rng);

        let slots = regions.max_id().map_or(0, |id| id.palette_slot());
        let palette = Palette::generate(level, slots, &mut rng);

        let marker = Marker {
            pos: Vec2::ZERO,
            diameter: (field_diameter * MARKER_SCALE).floor(),
            region: regions.region_of(0),
            color: Hsva::TRANSPARENT,
        };

        log::info!(
            "Round set up: level={}, seed={}, cells={}, regions={}",
            level.as_str(),
            seed,
            field.len(),
            regions.region_count()
        );

        Self {
            level,
            rng_state,
            phase: PlayPhase::Intro,
            field,
            adjacency,
            regions,
            palette,
            marker,
            rotation: FieldRotation::new(settings.accel_step, settings.accel_max),
            intro: IntroZoom::new(
                settings.intro_start_scale,
                1.0,
                settings.intro_wait_ms,
                settings.intro_rate,
            ),
            rule: settings.match_rule(),
            elapsed_ms: 0.0,
            time_ticks: 0,
        }
    }

    /// Collision filter group per cell, for the physics collaborator
    pub fn collision_groups(&self) -> Vec<i32> {
        self.regions.collision_groups()
    }

    /// Fill color of a cell, `None` once the marker's region owns it
    pub fn cell_color(&self, cell: usize) -> Option<Hsva> {
        let region = self.regions.region_of(cell);
        (region != self.marker.region).then(|| self.palette.color(region))
    }

    /// Gravity direction for the physics collaborator
    pub fn gravity(&self) -> Vec2 {
        self.rotation.gravity()
    }

    /// Camera offset that keeps the rotated marker centered on screen
    pub fn camera_offset(&self) -> Vec2 {
        -self.rotation.to_screen(self.marker.pos)
    }

    pub fn is_cleared(&self) -> bool {
        self.phase == PlayPhase::Cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_round_layout() {
        let state = PlayState::new(Level::Normal, Vec2::new(1000.0, 800.0), &Settings::default(), 1);
        assert_eq!(state.phase, PlayPhase::Intro);
        assert_eq!(state.field.rings(), 8);
        assert_eq!(state.field.diameter(), 160.0);
        assert_eq!(state.marker.diameter, 128.0);
        assert_eq!(state.field.len(), 217);
        assert_eq!(state.regions.len(), 217);
        assert_eq!(state.marker.region, state.regions.region_of(0));
        let max = state.regions.max_id().unwrap();
        assert!(state.palette.len() > max.palette_slot());
    }

    #[test]
    fn test_marker_region_not_drawn() {
        let state = PlayState::new(Level::Easy, Vec2::new(500.0, 500.0), &Settings::default(), 2);
        assert_eq!(state.cell_color(0), None);
        let other = (0..state.field.len())
            .find(|&c| state.regions.region_of(c) != state.marker.region)
            .unwrap();
        assert!(state.cell_color(other).is_some());
    }

    #[test]
    fn test_collision_groups_negative() {
        let state = PlayState::new(Level::Easy, Vec2::new(500.0, 500.0), &Settings::default(), 3);
        let groups = state.collision_groups();
        assert_eq!(groups.len(), state.field.len());
        assert!(groups.iter().all(|&g| g <= -1));
    }

    #[test]
    fn test_same_seed_same_round() {
        let settings = Settings::default();
        let a = PlayState::new(Level::Hard, Vec2::new(600.0, 900.0), &settings, 77);
        let b = PlayState::new(Level::Hard, Vec2::new(600.0, 900.0), &settings, 77);
        assert_eq!(a.regions, b.regions);
        for id in a.regions.region_ids() {
            assert_eq!(a.palette.color(id), b.palette.color(id));
        }
    }

    #[test]
    fn test_intro_zoom() {
        let mut zoom = IntroZoom::new(0.25, 1.0, 500.0, 1e-3);
        zoom.update(400.0);
        assert_eq!(zoom.scale, 0.25);
        zoom.update(100.0);
        assert!((zoom.scale - 0.35).abs() < 1e-5);
        for _ in 0..100 {
            zoom.update(16.0);
        }
        assert!(zoom.completed());
        assert_eq!(zoom.scale, 1.0);
    }
}
