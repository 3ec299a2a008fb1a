//! Region grouping by randomized bounded flood fill
//!
//! Regions grow one at a time from a random unassigned seed. Growth picks a
//! random frontier cell each step and stops at a random target size in
//! `[min_size, max_size]` or when the frontier runs dry. Claimed cells are
//! detached from a working copy of the adjacency so later growth never walks
//! back into claimed territory. A repair pass then folds every region smaller
//! than `min_size` into its smallest neighbor, which may push that neighbor
//! above `max_size`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

use super::adjacency::Adjacency;

/// Identifier of a region
///
/// Ids start at 1 and increase in creation order. Region `n` takes its color
/// from palette slot `n` (slot 0 is reserved), and maps to physics collision
/// group `-n` so cells of one region never collide with each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct RegionId(u32);

impl RegionId {
    pub const FIRST: RegionId = RegionId(1);

    /// # Panics
    ///
    /// Panics if `id` is zero (slot 0 is the reserved palette dummy).
    pub fn new(id: u32) -> Self {
        assert!(id >= 1, "region ids start at 1");
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Palette slot holding this region's color
    pub fn palette_slot(self) -> usize {
        self.0 as usize
    }

    /// Collision filter group for the physics collaborator
    pub fn collision_group(self) -> i32 {
        -(self.0 as i32)
    }
}

/// Cell → region table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionMap {
    cells: Vec<RegionId>,
}

impl RegionMap {
    pub fn from_cells(cells: Vec<RegionId>) -> Self {
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn region_of(&self, cell: usize) -> RegionId {
        self.cells[cell]
    }

    pub fn set_region(&mut self, cell: usize, region: RegionId) {
        self.cells[cell] = region;
    }

    pub fn as_slice(&self) -> &[RegionId] {
        &self.cells
    }

    /// Cells of `region` in ascending order
    pub fn cells_in(&self, region: RegionId) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &r)| r == region)
            .map(|(i, _)| i)
            .collect()
    }

    /// Distinct region ids in ascending order
    pub fn region_ids(&self) -> Vec<RegionId> {
        self.sizes().into_keys().collect()
    }

    pub fn region_count(&self) -> usize {
        self.sizes().len()
    }

    /// Highest id in use
    pub fn max_id(&self) -> Option<RegionId> {
        self.cells.iter().copied().max()
    }

    /// Cell count per region
    pub fn sizes(&self) -> BTreeMap<RegionId, usize> {
        let mut sizes = BTreeMap::new();
        for &r in &self.cells {
            *sizes.entry(r).or_insert(0) += 1;
        }
        sizes
    }

    /// Whether all cells of `region` are reachable from each other without
    /// leaving the region
    pub fn is_connected(&self, region: RegionId, adjacency: &Adjacency) -> bool {
        let members = self.cells_in(region);
        let Some(&start) = members.first() else {
            return true;
        };

        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cell) = queue.pop_front() {
            for &n in adjacency.neighbors(cell) {
                if self.cells[n] == region && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        seen.len() == members.len()
    }

    /// Move every cell of `from` into `into`, returning the moved cells
    pub fn absorb(&mut self, from: RegionId, into: RegionId) -> Vec<usize> {
        let mut moved = Vec::new();
        if from == into {
            return moved;
        }
        for (i, r) in self.cells.iter_mut().enumerate() {
            if *r == from {
                *r = into;
                moved.push(i);
            }
        }
        moved
    }

    /// Collision filter group per cell
    pub fn collision_groups(&self) -> Vec<i32> {
        self.cells.iter().map(|r| r.collision_group()).collect()
    }
}

/// Mutable copy of the adjacency whose edges are dropped as cells are claimed
#[derive(Debug, Clone)]
struct WorkingGraph {
    neighbors: Vec<Vec<usize>>,
}

impl WorkingGraph {
    fn new(adjacency: &Adjacency) -> Self {
        Self {
            neighbors: (0..adjacency.len())
                .map(|i| adjacency.neighbors(i).to_vec())
                .collect(),
        }
    }

    fn neighbors(&self, cell: usize) -> &[usize] {
        &self.neighbors[cell]
    }

    /// Remove every edge touching `cell`
    fn detach(&mut self, cell: usize) {
        let adjacent = std::mem::take(&mut self.neighbors[cell]);
        for n in adjacent {
            let list = &mut self.neighbors[n];
            if let Some(pos) = list.iter().position(|&c| c == cell) {
                list.swap_remove(pos);
            }
        }
    }
}

/// Group every cell of the field into connected regions
///
/// # Panics
///
/// Panics if `min_size` is zero, `min_size > max_size`, or the adjacency is empty.
pub fn partition<R: Rng + ?Sized>(
    adjacency: &Adjacency,
    min_size: usize,
    max_size: usize,
    rng: &mut R,
) -> RegionMap {
    assert!(min_size >= 1, "minimum region size must be positive");
    assert!(
        min_size <= max_size,
        "minimum region size {min_size} exceeds maximum {max_size}"
    );
    assert!(!adjacency.is_empty(), "cannot group an empty field");

    let len = adjacency.len();
    let mut assignment: Vec<Option<RegionId>> = vec![None; len];
    let mut working = WorkingGraph::new(adjacency);
    let mut next_id = RegionId::FIRST;
    // The first region always grows from the center
    let mut candidates = vec![0usize];

    while !candidates.is_empty() {
        let target = rng.random_range(min_size..=max_size);
        let seed = candidates[rng.random_range(0..candidates.len())];

        let mut frontier = BTreeSet::from([seed]);
        let mut selected = Vec::with_capacity(target);
        while !frontier.is_empty() && selected.len() < target {
            let pick = rng.random_range(0..frontier.len());
            let Some(&cell) = frontier.iter().nth(pick) else {
                break;
            };
            frontier.remove(&cell);
            selected.push(cell);
            frontier.extend(working.neighbors(cell).iter().copied());
            working.detach(cell);
        }

        for &cell in &selected {
            assignment[cell] = Some(next_id);
        }
        log::trace!("region {} grew to {}/{} cells", next_id.get(), selected.len(), target);
        next_id = next_id.next();

        candidates = assignment
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none())
            .map(|(i, _)| i)
            .collect();
    }

    let cells: Vec<RegionId> = assignment
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .unwrap_or_else(|| unreachable!("growth loop ends only when every cell is assigned"));
    let mut regions = RegionMap::from_cells(cells);
    let grown = next_id.get() - 1;

    let merged = merge_small_regions(&mut regions, adjacency, min_size);
    log::debug!(
        "grouped {} cells into {} regions ({} grown, {} merged)",
        len,
        regions.region_count(),
        grown,
        merged
    );
    regions
}

/// Fold regions below `min_size` into their smallest neighboring region
///
/// Regions are visited in ascending id order and neighbor cells in ascending
/// index order; the first smallest neighbor wins. Sizes are kept current as
/// merges happen. Returns the number of merged regions.
fn merge_small_regions(regions: &mut RegionMap, adjacency: &Adjacency, min_size: usize) -> usize {
    let mut members: BTreeMap<RegionId, Vec<usize>> = BTreeMap::new();
    for (cell, &r) in regions.as_slice().iter().enumerate() {
        members.entry(r).or_default().push(cell);
    }

    let ids: Vec<RegionId> = members.keys().copied().collect();
    let mut merged = 0;
    for id in ids {
        let Some(cells) = members.get(&id) else {
            continue;
        };
        if cells.len() >= min_size {
            continue;
        }

        let border: BTreeSet<usize> = cells
            .iter()
            .flat_map(|&c| adjacency.neighbors(c).iter().copied())
            .filter(|&n| regions.region_of(n) != id)
            .collect();

        let mut target: Option<(RegionId, usize)> = None;
        for cell in border {
            let r = regions.region_of(cell);
            let size = members.get(&r).map_or(0, Vec::len);
            if target.is_none_or(|(_, best)| size < best) {
                target = Some((r, size));
            }
        }

        // Only possible when this region already covers the whole field
        let Some((target, _)) = target else {
            continue;
        };
        if let Some(moved) = members.remove(&id) {
            for &cell in &moved {
                regions.set_region(cell, target);
            }
            log::trace!(
                "merged region {} ({} cells) into region {}",
                id.get(),
                moved.len(),
                target.get()
            );
            members.entry(target).or_default().extend(moved);
            merged += 1;
        }
    }
    merged
}
