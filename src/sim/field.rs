//! Hexagonal ring field generation
//!
//! Cells are addressed by a flat index. Index 0 is the center cell; ring `k`
//! follows with `6k` cells, enumerated sector by sector (six 60° sweeps) and
//! by offset within each sector. The adjacency arithmetic in
//! [`super::adjacency`] relies on exactly this order.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_3, TAU};

use crate::polar_to_cartesian;

/// Total number of cells in a field with `rings` rings around the center
#[inline]
pub fn cell_count(rings: u32) -> usize {
    let r = rings as usize;
    3 * r * (r + 1) + 1
}

/// Center-to-center distance of two touching hexagons with the given
/// (vertex-to-vertex) diameter
#[inline]
pub fn neighbor_distance(diameter: f32) -> f32 {
    diameter * (3.0_f32.sqrt() / 2.0)
}

/// The generated playing field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HexField {
    rings: u32,
    diameter: f32,
    positions: Vec<Vec2>,
}

impl HexField {
    /// Generate the field layout
    ///
    /// # Panics
    ///
    /// Panics if `rings` is zero or `diameter` is not a positive finite number.
    pub fn generate(rings: u32, diameter: f32) -> Self {
        assert!(rings >= 1, "field needs at least one ring, got {rings}");
        assert!(
            diameter.is_finite() && diameter > 0.0,
            "cell diameter must be positive, got {diameter}"
        );

        let distance = neighbor_distance(diameter);
        let mut positions = Vec::with_capacity(cell_count(rings));
        positions.push(Vec2::ZERO);

        for k in 1..=rings {
            for sector in 0..6 {
                let a = sector as f32 * FRAC_PI_3;
                // Radial step toward the sector corner, lateral step along the edge
                let radial = polar_to_cartesian(k as f32 * distance, a);
                let lateral = polar_to_cartesian(distance, a + TAU / 3.0);
                for j in 0..k {
                    positions.push(radial + lateral * j as f32);
                }
            }
        }

        debug_assert_eq!(positions.len(), cell_count(rings));
        Self {
            rings,
            diameter,
            positions,
        }
    }

    pub fn rings(&self) -> u32 {
        self.rings
    }

    pub fn diameter(&self) -> f32 {
        self.diameter
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn position(&self, cell: usize) -> Vec2 {
        self.positions[cell]
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    /// Cell whose center is closest to `point` (linear scan, first minimum wins)
    pub fn nearest_cell(&self, point: Vec2) -> usize {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (i, pos) in self.positions.iter().enumerate() {
            let dist = pos.distance_squared(point);
            if dist < best_dist {
                best_dist = dist;
                best = i;
            }
        }
        best
    }

    /// Distance from the center beyond which the marker has left the field
    pub fn clear_radius(&self) -> f32 {
        self.rings as f32 * self.diameter
    }

    /// Whether `point` lies at or beyond the clear radius
    pub fn is_outside(&self, point: Vec2) -> bool {
        let threshold = self.clear_radius();
        point.length_squared() >= threshold * threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_count_per_ring() {
        for rings in 1..=10 {
            let field = HexField::generate(rings, 40.0);
            assert_eq!(field.len(), cell_count(rings));
            let r = rings as usize;
            assert_eq!(field.len(), 3 * r * (r + 1) + 1);
        }
    }

    #[test]
    fn test_no_overlapping_cells() {
        for rings in 1..=10 {
            let diameter = 30.0;
            let field = HexField::generate(rings, diameter);
            let min_allowed = neighbor_distance(diameter) * 0.99;
            let pos = field.positions();
            for i in 0..pos.len() {
                for j in (i + 1)..pos.len() {
                    assert!(
                        pos[i].distance(pos[j]) >= min_allowed,
                        "cells {i} and {j} overlap in a {rings}-ring field"
                    );
                }
            }
        }
    }

    #[test]
    fn test_first_ring_layout() {
        let field = HexField::generate(1, 2.0);
        assert_eq!(field.position(0), Vec2::ZERO);
        let d = neighbor_distance(2.0);
        for i in 1..=6 {
            assert!((field.position(i).length() - d).abs() < 1e-4);
        }
        // First cell of ring 1 sits on the +x axis
        assert!((field.position(1) - Vec2::new(d, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_ring_cells_on_hex_outline() {
        // Sector corners sit at k * distance from the center
        let field = HexField::generate(3, 10.0);
        let d = neighbor_distance(10.0);
        for k in 1..=3usize {
            let first = 3 * (k - 1) * k + 1;
            for sector in 0..6 {
                let corner = first + sector * k;
                assert!((field.position(corner).length() - k as f32 * d).abs() < 1e-3);
            }
        }
    }

    #[test]
    fn test_nearest_cell() {
        let field = HexField::generate(2, 10.0);
        assert_eq!(field.nearest_cell(Vec2::new(0.5, -0.5)), 0);
        for i in 0..field.len() {
            let p = field.position(i) + Vec2::new(0.3, 0.2);
            assert_eq!(field.nearest_cell(p), i);
        }
    }

    #[test]
    fn test_clear_threshold() {
        let field = HexField::generate(6, 20.0);
        let r = field.clear_radius();
        assert_eq!(r, 120.0);
        assert!(!field.is_outside(Vec2::new(r - 0.01, 0.0)));
        assert!(field.is_outside(Vec2::new(r, 0.0)));
        assert!(field.is_outside(Vec2::new(0.0, -r - 5.0)));
    }

    #[test]
    #[should_panic]
    fn test_zero_rings_panics() {
        let _ = HexField::generate(0, 10.0);
    }
}
