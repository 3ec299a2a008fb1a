//! Cell adjacency from ring/sector index arithmetic
//!
//! No coordinates are involved: every "outward" edge of a cell (to a higher
//! index) follows from its ring number, its sector and its offset within the
//! sector, and a final pass mirrors those edges to make the relation symmetric.

use serde::{Deserialize, Serialize};

use super::field::neighbor_distance;

/// Ring number of a cell index (0 for the center)
pub fn ring_of(index: usize) -> usize {
    if index == 0 {
        return 0;
    }
    // Closed form, then nudged so float rounding never lands on the wrong ring
    let estimate = ((-1.0 + (1.0 + (4.0 / 3.0) * index as f64).sqrt()) / 2.0).ceil();
    let mut ring = (estimate as usize).max(1);
    while cells_through_ring(ring) <= index {
        ring += 1;
    }
    while ring > 1 && cells_through_ring(ring - 1) > index {
        ring -= 1;
    }
    ring
}

/// Number of cells on ring `k`
#[inline]
pub fn ring_len(k: usize) -> usize {
    if k == 0 { 1 } else { 6 * k }
}

/// Number of cells on rings `0..=k`
#[inline]
pub fn cells_through_ring(k: usize) -> usize {
    3 * k * (k + 1) + 1
}

/// Symmetric, irreflexive neighbor lists indexed by cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Build the adjacency of a ring field with `len` cells
    pub fn build(len: usize) -> Self {
        let mut neighbors: Vec<Vec<usize>> = vec![Vec::with_capacity(6); len];

        for i in 0..len {
            for j in outward_neighbors(i) {
                if j < len {
                    neighbors[i].push(j);
                }
            }
        }

        // Mirror every forward edge
        for i in 0..len {
            for k in 0..neighbors[i].len() {
                let j = neighbors[i][k];
                if j > i {
                    neighbors[j].push(i);
                }
            }
        }

        for list in &mut neighbors {
            list.sort_unstable();
            list.dedup();
        }

        Self { neighbors }
    }

    /// Brute-force adjacency from cell centers: two cells touch when their
    /// centers are one hex step apart
    pub fn from_positions(positions: &[glam::Vec2], diameter: f32) -> Self {
        let step = neighbor_distance(diameter);
        let tolerance = step * 0.01;
        let neighbors = positions
            .iter()
            .enumerate()
            .map(|(i, a)| {
                positions
                    .iter()
                    .enumerate()
                    .filter(|&(j, b)| j != i && (a.distance(*b) - step).abs() <= tolerance)
                    .map(|(j, _)| j)
                    .collect::<Vec<usize>>()
            })
            .collect();
        Self { neighbors }
    }

    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of `cell` in ascending index order
    pub fn neighbors(&self, cell: usize) -> &[usize] {
        &self.neighbors[cell]
    }

    pub fn degree(&self, cell: usize) -> usize {
        self.neighbors[cell].len()
    }

    pub fn contains(&self, a: usize, b: usize) -> bool {
        self.neighbors[a].binary_search(&b).is_ok()
    }

    /// Total number of undirected edges
    pub fn edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum::<usize>() / 2
    }
}

/// Neighbors of `i` with a higher index, before bounds filtering
///
/// Besides the next cell on the same ring, each cell links to the cells of the
/// next ring that touch it: three for a sector corner, two otherwise. The first
/// cell of a ring also closes the ring (its sector-0 link `l` is the ring's
/// last cell) and bridges to the last cell of the next ring.
fn outward_neighbors(i: usize) -> Vec<usize> {
    if i == 0 {
        return (1..=6).collect();
    }

    let n = ring_of(i);
    let ring_first = 3 * n * (n - 1) + 1;
    let ring_last = 3 * n * (n + 1);
    let mut out = Vec::with_capacity(4);

    if i != ring_last {
        out.push(i + 1);
    }
    if i == ring_first {
        // Last cell of ring n + 1
        out.push(i + 12 * n + 5);
    }

    let offset = (i - 1) % n;
    let corner = i - offset;
    let sector = (corner - ring_first) / n;
    let l = ring_last + (n + 1) * sector;
    if offset == 0 {
        out.extend([l, l + 1, l + 2]);
    } else {
        let m = l + offset + 1;
        out.extend([m, m + 1]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::field::{HexField, cell_count};

    #[test]
    fn test_ring_of() {
        assert_eq!(ring_of(0), 0);
        for i in 1..=6 {
            assert_eq!(ring_of(i), 1);
        }
        assert_eq!(ring_of(7), 2);
        assert_eq!(ring_of(18), 2);
        assert_eq!(ring_of(19), 3);
        // Exhaustive against cumulative counts
        let mut index = 1;
        for k in 1..=60 {
            for _ in 0..ring_len(k) {
                assert_eq!(ring_of(index), k, "index {index}");
                index += 1;
            }
            assert_eq!(index, cells_through_ring(k));
        }
    }

    #[test]
    fn test_center_adjacency() {
        let adj = Adjacency::build(cell_count(1));
        assert_eq!(adj.neighbors(0), &[1, 2, 3, 4, 5, 6]);
        // Ring 1 closes on itself
        assert!(adj.contains(1, 6));
        assert!(adj.contains(1, 2));
        for i in 1..=6 {
            assert_eq!(adj.degree(i), 3);
        }
    }

    #[test]
    fn test_symmetric_and_irreflexive() {
        for rings in 1..=10 {
            let adj = Adjacency::build(cell_count(rings));
            for i in 0..adj.len() {
                assert!(!adj.contains(i, i));
                for &j in adj.neighbors(i) {
                    assert!(adj.contains(j, i), "edge {i}-{j} is one-sided");
                }
            }
        }
    }

    #[test]
    fn test_degree_bounds() {
        for rings in 1..=10 {
            let adj = Adjacency::build(cell_count(rings));
            assert_eq!(adj.degree(0), 6);
            for i in 1..adj.len() {
                let d = adj.degree(i);
                assert!((3..=6).contains(&d), "cell {i} has degree {d}");
            }
            // Interior cells are fully surrounded
            let interior_end = cells_through_ring(rings as usize - 1);
            for i in 0..interior_end {
                assert_eq!(adj.degree(i), 6, "interior cell {i}");
            }
        }
    }

    #[test]
    fn test_matches_geometric_oracle() {
        for rings in 1..=6 {
            let field = HexField::generate(rings, 25.0);
            let geometric = Adjacency::from_positions(field.positions(), field.diameter());
            let arithmetic = Adjacency::build(field.len());
            assert_eq!(arithmetic, geometric, "mismatch for {rings} rings");
        }
    }

    #[test]
    fn test_edge_count() {
        // A hexagonal patch of radius R has 9R² + 3R edges
        for rings in 1..=10usize {
            let adj = Adjacency::build(cell_count(rings as u32));
            assert_eq!(adj.edge_count(), 9 * rings * rings + 3 * rings);
        }
    }
}
