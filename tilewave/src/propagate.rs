use crate::adjacency::AdjacencyIndex;
use crate::error::PropagateError;
use crate::pattern::{PatternTable, PatternWeights};
use crate::wave::{Wave, WaveCell};
use crate::wrap::OutputWrap;
use coord_2d::Coord;
use direction::{Direction, Directions};
use hashbrown::HashSet;

/// Removes patterns from cells whose neighbours can no longer support them,
/// until nothing changes or a cell is left with no patterns.
#[derive(Default, Clone, Debug)]
pub struct Propagator {
    worklist: Vec<Coord>,
    pending: HashSet<Coord>,
    // scratch: patterns allowed next to the cell being processed
    supported: PatternTable<bool>,
}

impl Propagator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.worklist.clear();
        self.pending.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.worklist.is_empty()
    }

    fn push(&mut self, coord: Coord) {
        if self.pending.insert(coord) {
            self.worklist.push(coord);
        }
    }

    fn mark_supported(&mut self, cell: &WaveCell, index: &AdjacencyIndex, direction: Direction) {
        self.supported.resize(index.num_patterns(), false);
        self.supported.fill(false);
        for pattern_id in cell.possible_pattern_ids() {
            for &neighbour_pattern_id in index.compatible(pattern_id, direction) {
                self.supported[neighbour_pattern_id] = true;
            }
        }
    }

    /// Re-checks the neighbours of `seed`, and transitively the neighbours of
    /// every cell that loses a pattern, against the adjacency index. Returns
    /// the total number of patterns removed.
    pub fn propagate(
        &mut self,
        wave: &mut Wave,
        index: &AdjacencyIndex,
        weights: &PatternWeights,
        seed: Coord,
        wrap: OutputWrap,
    ) -> Result<usize, PropagateError> {
        self.clear();
        self.push(seed);
        let wave_size = wave.size();
        let mut num_removed = 0;
        while let Some(coord) = self.worklist.pop() {
            self.pending.remove(&coord);
            for direction in Directions {
                let neighbour = match wrap.normalize_coord(coord + direction.coord(), wave_size) {
                    Some(neighbour) => neighbour,
                    None => continue,
                };
                self.mark_supported(wave.cell(coord), index, direction);
                let cell = wave.cell_mut(neighbour);
                let removed = cell.retain_supported(&self.supported, weights);
                if removed == 0 {
                    continue;
                }
                num_removed += removed;
                if cell.num_possible() == 0 {
                    log::debug!(
                        "contradiction at ({}, {}) while propagating from ({}, {})",
                        neighbour.x,
                        neighbour.y,
                        coord.x,
                        coord.y,
                    );
                    self.clear();
                    return Err(PropagateError::Contradiction { coord: neighbour });
                }
                self.push(neighbour);
            }
        }
        Ok(num_removed)
    }
}
