//! Field simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Caller-supplied frame time only
//! - Seeded RNG only
//! - Stable iteration order (ascending cell index / region id)
//! - No rendering, physics or platform dependencies

pub mod adjacency;
pub mod color;
pub mod field;
pub mod matcher;
pub mod partition;
pub mod rotation;
pub mod state;
pub mod tick;

pub use adjacency::{Adjacency, cells_through_ring, ring_len, ring_of};
pub use color::{Hsva, Palette, hue_distance, marker_color_from_samples, rgb_to_hsv};
pub use field::{HexField, cell_count, neighbor_distance};
pub use matcher::{Absorption, MatchRule, check_color};
pub use partition::{RegionId, RegionMap, partition};
pub use rotation::{Accelerator, FieldRotation};
pub use state::{GameEvent, IntroZoom, Marker, PlayPhase, PlayState};
pub use tick::{TickInput, tick};
