//! Marker color matching and region absorption

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::adjacency::Adjacency;
use super::color::{Hsva, Palette, hue_distance};
use super::field::HexField;
use super::partition::{RegionId, RegionMap};

/// Matching thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchRule {
    /// Maximum circular hue distance in degrees
    pub hue_tolerance: u16,
    /// Minimum marker saturation
    pub saturation_floor: u8,
}

impl Default for MatchRule {
    fn default() -> Self {
        Self {
            hue_tolerance: crate::consts::HUE_TOLERANCE,
            saturation_floor: crate::consts::SATURATION_FLOOR,
        }
    }
}

impl MatchRule {
    pub fn matches(&self, marker: Hsva, region: Hsva) -> bool {
        marker.s >= self.saturation_floor && hue_distance(region.h, marker.h) <= self.hue_tolerance
    }
}

/// A region swallowed by the marker's region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Absorption {
    pub region: RegionId,
    pub cells: Vec<usize>,
}

/// Regions touching `cell` other than its own, in ascending id order
pub fn neighbor_regions(cell: usize, adjacency: &Adjacency, regions: &RegionMap) -> Vec<RegionId> {
    let own = regions.region_of(cell);
    let found: BTreeSet<RegionId> = adjacency
        .neighbors(cell)
        .iter()
        .map(|&n| regions.region_of(n))
        .filter(|&r| r != own)
        .collect();
    found.into_iter().collect()
}

/// Absorb every region next to the marker's cell whose color matches the marker
///
/// The marker's cell is the cell nearest to `marker_pos`. Matching regions are
/// reassigned to `marker_region`; the marker's own region is never a candidate.
#[allow(clippy::too_many_arguments)]
pub fn check_color(
    field: &HexField,
    adjacency: &Adjacency,
    regions: &mut RegionMap,
    palette: &Palette,
    marker_pos: Vec2,
    marker_color: Hsva,
    marker_region: RegionId,
    rule: &MatchRule,
) -> Vec<Absorption> {
    let cell = field.nearest_cell(marker_pos);
    let mut absorbed = Vec::new();

    for region in neighbor_regions(cell, adjacency, regions) {
        if region == marker_region {
            continue;
        }
        if rule.matches(marker_color, palette.color(region)) {
            let cells = regions.absorb(region, marker_region);
            log::trace!("marker absorbed region {} ({} cells)", region.get(), cells.len());
            absorbed.push(Absorption { region, cells });
        }
    }
    absorbed
}
