use crate::error::{ChosenPatternIdError, Unresolved};
use crate::pattern::{PatternId, PatternTable, PatternWeight, PatternWeights};
use coord_2d::{Coord, Size};
use grid_2d::Grid;
use rand::Rng;

#[derive(Default, Debug, Clone)]
struct WaveCellStats {
    num_possible_patterns: u32,
    // n0 + n1 + n2 + ...
    sum_possible_pattern_weight: u32,
    // n0*log(n0) + n1*log(n1) + n2*log(n2) + ...
    sum_possible_pattern_weight_log_weight: f32,
}

impl WaveCellStats {
    fn remove_possible_pattern(&mut self, pattern_weight: &PatternWeight) {
        assert!(self.num_possible_patterns >= 1);
        assert!(self.sum_possible_pattern_weight >= pattern_weight.weight());

        self.num_possible_patterns -= 1;
        self.sum_possible_pattern_weight -= pattern_weight.weight();
        self.sum_possible_pattern_weight_log_weight -= pattern_weight.weight_log_weight();
    }
    fn entropy(&self) -> f32 {
        assert!(self.sum_possible_pattern_weight > 0);

        // log(n0+n1+n2+...) - (n0*log(n0) + n1*log(n1) + n2*log(n2) + ...) / (n0+n1+n2+...)
        let sum_possible_pattern_weight = self.sum_possible_pattern_weight as f32;
        sum_possible_pattern_weight.log2()
            - (self.sum_possible_pattern_weight_log_weight / sum_possible_pattern_weight)
    }
}

/// The domain of a single output cell: which patterns are still possible
/// there.
#[derive(Default, Debug, Clone)]
pub struct WaveCell {
    possible: PatternTable<bool>,
    stats: WaveCellStats,
}

impl WaveCell {
    fn init(&mut self, weights: &PatternWeights) {
        self.possible.resize(weights.num_patterns(), true);
        self.possible.fill(true);
        self.stats = WaveCellStats {
            num_possible_patterns: weights.num_patterns() as u32,
            sum_possible_pattern_weight: weights.sum_weight(),
            sum_possible_pattern_weight_log_weight: weights.sum_weight_log_weight(),
        };
    }

    pub fn num_possible(&self) -> u32 {
        self.stats.num_possible_patterns
    }

    pub fn is_collapsed(&self) -> bool {
        self.stats.num_possible_patterns == 1
    }

    pub fn is_possible(&self, pattern_id: PatternId) -> bool {
        self.possible[pattern_id]
    }

    pub fn possible_pattern_ids(&self) -> impl '_ + Iterator<Item = PatternId> {
        self.possible
            .enumerate()
            .filter_map(|(pattern_id, &is_possible)| {
                if is_possible {
                    Some(pattern_id)
                } else {
                    None
                }
            })
    }

    pub fn chosen_pattern_id(&self) -> Result<PatternId, ChosenPatternIdError> {
        match self.stats.num_possible_patterns {
            0 => Err(ChosenPatternIdError::NoCompatiblePatterns),
            1 => self
                .possible_pattern_ids()
                .next()
                .ok_or(ChosenPatternIdError::NoCompatiblePatterns),
            _ => Err(ChosenPatternIdError::MultipleCompatiblePatterns),
        }
    }

    /// Shannon entropy of the weighted distribution over the possible
    /// patterns. A collapsed cell has an entropy of exactly 0.
    pub fn entropy(&self) -> f32 {
        if self.stats.num_possible_patterns <= 1 {
            0.0
        } else {
            self.stats.entropy()
        }
    }

    /// The probability that `pattern_id` would be chosen if this cell were
    /// collapsed now.
    pub fn probability(&self, pattern_id: PatternId, weights: &PatternWeights) -> f32 {
        if self.possible[pattern_id] {
            weights.weight(pattern_id) as f32 / self.stats.sum_possible_pattern_weight as f32
        } else {
            0.0
        }
    }

    /// Removes `pattern_id` if it is still possible, returning whether it was.
    pub(crate) fn remove(&mut self, pattern_id: PatternId, weights: &PatternWeights) -> bool {
        let is_possible = &mut self.possible[pattern_id];
        if !*is_possible {
            return false;
        }
        *is_possible = false;
        self.stats.remove_possible_pattern(weights.get(pattern_id));
        true
    }

    /// Removes every possible pattern not marked in `supported`, returning
    /// the number removed.
    pub(crate) fn retain_supported(
        &mut self,
        supported: &PatternTable<bool>,
        weights: &PatternWeights,
    ) -> usize {
        let mut num_removed = 0;
        for (pattern_id, is_possible) in self.possible.enumerate_mut() {
            if *is_possible && !supported[pattern_id] {
                *is_possible = false;
                self.stats.remove_possible_pattern(weights.get(pattern_id));
                num_removed += 1;
            }
        }
        num_removed
    }

    fn choose_pattern_id<R: Rng>(&self, weights: &PatternWeights, rng: &mut R) -> PatternId {
        assert!(self.stats.num_possible_patterns >= 1);
        assert!(self.stats.sum_possible_pattern_weight >= 1);

        let mut remaining = rng.gen_range(0..self.stats.sum_possible_pattern_weight);
        for pattern_id in self.possible_pattern_ids() {
            let weight = weights.weight(pattern_id);
            if remaining >= weight {
                remaining -= weight;
            } else {
                return pattern_id;
            }
        }
        unreachable!("The weight is positive and based on the possible patterns");
    }
}

/// The output grid of cell domains being collapsed.
#[derive(Debug, Clone)]
pub struct Wave {
    grid: Grid<WaveCell>,
}

impl Wave {
    /// A wave of `size` where every cell may still be any pattern.
    pub fn new(size: Size, weights: &PatternWeights) -> Self {
        let mut wave = Self {
            grid: Grid::new_default(size),
        };
        wave.init(weights);
        wave
    }

    pub(crate) fn init(&mut self, weights: &PatternWeights) {
        self.grid.iter_mut().for_each(|cell| cell.init(weights));
    }

    pub fn size(&self) -> Size {
        self.grid.size()
    }

    pub fn grid(&self) -> &Grid<WaveCell> {
        &self.grid
    }

    /// The cell at `coord`. Panics if `coord` is outside the wave.
    pub fn cell(&self, coord: Coord) -> &WaveCell {
        self.grid.get_checked(coord)
    }

    pub(crate) fn cell_mut(&mut self, coord: Coord) -> &mut WaveCell {
        self.grid.get_checked_mut(coord)
    }

    pub fn is_collapsed(&self) -> bool {
        self.grid.iter().all(WaveCell::is_collapsed)
    }

    /// Chooses a pattern for the cell at `coord` by weight and removes every
    /// other pattern from its domain.
    pub(crate) fn collapse_cell<R: Rng>(
        &mut self,
        coord: Coord,
        weights: &PatternWeights,
        rng: &mut R,
    ) -> PatternId {
        let cell = self.cell_mut(coord);
        let pattern_id = cell.choose_pattern_id(weights, rng);
        for other in 0..weights.num_patterns() as PatternId {
            if other != pattern_id {
                cell.remove(other, weights);
            }
        }
        pattern_id
    }

    /// The chosen pattern of every cell, failing on the first cell (in
    /// row-major order) which is not collapsed.
    pub fn pattern_id_grid(&self) -> Result<Grid<PatternId>, Unresolved> {
        let pattern_ids = self
            .grid
            .enumerate()
            .map(|(coord, cell)| {
                cell.chosen_pattern_id()
                    .map_err(|reason| Unresolved { coord, reason })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Grid::new_iterator(self.size(), pattern_ids.into_iter()))
    }
}
