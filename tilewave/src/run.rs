use crate::adjacency::AdjacencyIndex;
use crate::catalog::PatternCatalog;
use crate::config;
use crate::error::{CollapseRecord, Contradiction, GenerateError, PropagateError};
use crate::observe::{self, Selection};
use crate::pattern::{PatternId, PatternWeights};
use crate::propagate::Propagator;
use crate::retry;
use crate::wave::Wave;
use crate::wrap::OutputWrap;
use coord_2d::{Coord, Size};
use grid_2d::Grid;
use rand::Rng;

/// The outcome of a single observe-and-propagate step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observe {
    /// Every cell has exactly one possible pattern.
    Collapsed,
    /// The cell at this coordinate was collapsed and the wave is consistent.
    InProgress(Coord),
    /// The cell at this coordinate has no possible patterns. The run is over.
    Contradiction(Coord),
}

/// A single generation attempt: a wave plus the state needed to collapse it.
#[derive(Clone)]
pub struct Run<'a> {
    wave: Wave,
    propagator: Propagator,
    index: &'a AdjacencyIndex,
    weights: &'a PatternWeights,
    wrap: OutputWrap,
    history: Vec<CollapseRecord>,
    contradiction: Option<Coord>,
}

impl<'a> Run<'a> {
    pub fn new(output_size: Size, index: &'a AdjacencyIndex, weights: &'a PatternWeights) -> Self {
        Self::new_wrap(output_size, index, weights, OutputWrap::None)
    }

    pub fn new_wrap(
        output_size: Size,
        index: &'a AdjacencyIndex,
        weights: &'a PatternWeights,
        wrap: OutputWrap,
    ) -> Self {
        assert_eq!(index.num_patterns(), weights.num_patterns());
        log::debug!(
            "starting {}x{} run over {} patterns (wrap: {})",
            output_size.width(),
            output_size.height(),
            weights.num_patterns(),
            wrap,
        );
        Self {
            wave: Wave::new(output_size, weights),
            propagator: Propagator::new(),
            index,
            weights,
            wrap,
            history: Vec::new(),
            contradiction: None,
        }
    }

    /// Returns every cell to its full domain, discarding the history and any
    /// contradiction.
    pub fn reset(&mut self) {
        self.wave.init(self.weights);
        self.propagator.clear();
        self.history.clear();
        self.contradiction = None;
    }

    /// Collapses the lowest-entropy cell and propagates the consequences.
    pub fn step<R: Rng>(&mut self, rng: &mut R) -> Observe {
        if let Some(coord) = self.contradiction {
            return Observe::Contradiction(coord);
        }
        let coord = match observe::select_next(&self.wave, rng) {
            Selection::Collapsed => return Observe::Collapsed,
            Selection::Contradiction(coord) => {
                self.contradiction = Some(coord);
                return Observe::Contradiction(coord);
            }
            Selection::Next(coord) => coord,
        };
        let pattern_id = self.wave.collapse_cell(coord, self.weights, rng);
        log::trace!("collapsed ({}, {}) to pattern {}", coord.x, coord.y, pattern_id);
        self.history.push(CollapseRecord { coord, pattern_id });
        match self
            .propagator
            .propagate(&mut self.wave, self.index, self.weights, coord, self.wrap)
        {
            Ok(_) => Observe::InProgress(coord),
            Err(PropagateError::Contradiction { coord }) => {
                self.contradiction = Some(coord);
                Observe::Contradiction(coord)
            }
        }
    }

    /// Steps until every cell is collapsed or a contradiction is reached.
    pub fn collapse<R: Rng>(&mut self, rng: &mut R) -> Result<(), Contradiction> {
        loop {
            match self.step(rng) {
                Observe::Collapsed => return Ok(()),
                Observe::InProgress(_) => (),
                Observe::Contradiction(coord) => {
                    log::debug!(
                        "run failed at ({}, {}) after {} collapses",
                        coord.x,
                        coord.y,
                        self.history.len()
                    );
                    return Err(Contradiction {
                        coord,
                        history: self.history.clone(),
                    });
                }
            }
        }
    }

    pub fn collapse_retrying<R, RT>(self, mut retry: RT, rng: &mut R) -> RT::Return
    where
        R: Rng,
        RT: retry::Retry,
    {
        retry.retry(self, rng)
    }

    pub fn wave(&self) -> &Wave {
        &self.wave
    }

    pub fn into_wave(self) -> Wave {
        self.wave
    }

    pub fn history(&self) -> &[CollapseRecord] {
        &self.history
    }

    pub fn contradiction(&self) -> Option<Coord> {
        self.contradiction
    }
}

/// Collapses a fresh wave of `output_size` once, returning the chosen pattern
/// of every cell. An output without cells is rejected before any state is
/// built.
pub fn generate<T, R: Rng>(
    catalog: &PatternCatalog<T>,
    index: &AdjacencyIndex,
    output_size: Size,
    wrap: OutputWrap,
    rng: &mut R,
) -> Result<Grid<PatternId>, GenerateError> {
    config::validate_output_size(output_size)?;
    let weights = catalog.weights();
    let mut run = Run::new_wrap(output_size, index, &weights, wrap);
    run.collapse(rng)?;
    Ok(run.wave().pattern_id_grid()?)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::InvalidInput;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    fn grid_from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Grid<u8> {
        Grid::new_fn(Size::new(W as u32, H as u32), |coord| {
            rows[coord.y as usize][coord.x as usize]
        })
    }

    fn compatible_everywhere(
        ids: &Grid<PatternId>,
        index: &AdjacencyIndex,
        wrap: OutputWrap,
    ) -> bool {
        use direction::Directions;
        ids.enumerate().all(|(coord, &pattern_id)| {
            Directions.into_iter().all(|direction| {
                match wrap.normalize_coord(coord + direction.coord(), ids.size()) {
                    Some(neighbour) => {
                        index.is_compatible(pattern_id, direction, *ids.get_checked(neighbour))
                    }
                    None => true,
                }
            })
        })
    }

    #[test]
    fn checkerboard_single_cell_never_contradicts() {
        let sample = grid_from_rows([[0, 1], [1, 0]]);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        for seed in 0..20 {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            let ids = generate(&catalog, &index, Size::new(1, 1), OutputWrap::None, &mut rng)
                .unwrap();
            assert!((*ids.get_checked(Coord::new(0, 0)) as usize) < catalog.len());
        }
    }

    #[test]
    fn uniform_sample_collapses_without_steps() {
        let sample = Grid::new_clone(Size::new(4, 4), 9u8);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        let weights = catalog.weights();
        let mut run = Run::new(Size::new(7, 3), &index, &weights);
        let mut rng = XorShiftRng::seed_from_u64(0);
        assert!(run
            .wave()
            .grid()
            .iter()
            .all(|cell| cell.entropy() == 0.0));
        assert_eq!(run.step(&mut rng), Observe::Collapsed);
        assert!(run.history().is_empty());
        let ids = run.wave().pattern_id_grid().unwrap();
        assert!(ids.iter().all(|&pattern_id| pattern_id == 0));
    }

    #[test]
    fn collapsed_output_respects_adjacency() {
        let sample = grid_from_rows([
            [0, 0, 0, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 1, 1, 0, 0],
            [0, 0, 0, 0, 0],
        ]);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        let mut successes = 0;
        for seed in 0..20 {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            if let Ok(ids) =
                generate(&catalog, &index, Size::new(12, 9), OutputWrap::None, &mut rng)
            {
                assert!(compatible_everywhere(&ids, &index, OutputWrap::None));
                successes += 1;
            }
        }
        assert!(successes > 0);
    }

    #[test]
    fn same_seed_same_result() {
        let sample = grid_from_rows([
            [0, 0, 1, 0],
            [0, 1, 1, 0],
            [2, 1, 0, 0],
            [2, 2, 0, 1],
        ]);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        for seed in 0..5 {
            let first = generate(
                &catalog,
                &index,
                Size::new(10, 10),
                OutputWrap::XY,
                &mut XorShiftRng::seed_from_u64(seed),
            );
            let second = generate(
                &catalog,
                &index,
                Size::new(10, 10),
                OutputWrap::XY,
                &mut XorShiftRng::seed_from_u64(seed),
            );
            match (first, second) {
                (Ok(a), Ok(b)) => {
                    assert!(a.iter().eq(b.iter()));
                    assert!(compatible_everywhere(&a, &index, OutputWrap::XY));
                }
                (Err(a), Err(b)) => assert_eq!(a, b),
                _ => panic!("runs with seed {} diverged", seed),
            }
        }
    }

    #[test]
    fn empty_output_is_invalid_input() {
        let sample = grid_from_rows([[0, 1], [1, 0]]);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        let mut rng = XorShiftRng::seed_from_u64(0);
        for size in [Size::new(0, 5), Size::new(5, 0), Size::new(0, 0)] {
            assert_eq!(
                generate(&catalog, &index, size, OutputWrap::None, &mut rng),
                Err(GenerateError::InvalidInput(InvalidInput::EmptyOutput {
                    width: size.width(),
                    height: size.height(),
                }))
            );
        }
    }

    #[test]
    fn contradiction_is_terminal_until_reset() {
        // no two rotations of this window fit side by side
        let sample = grid_from_rows([[1, 2], [3, 4]]);
        let catalog = PatternCatalog::extract(&sample, 2, true).unwrap();
        let index = AdjacencyIndex::build(&catalog);
        let weights = catalog.weights();
        let mut run = Run::new(Size::new(2, 1), &index, &weights);
        let mut rng = XorShiftRng::seed_from_u64(1);
        let error = run.collapse(&mut rng).unwrap_err();
        assert_eq!(error.history.len(), 1);
        assert_ne!(error.coord, error.history[0].coord);
        assert_eq!(run.step(&mut rng), Observe::Contradiction(error.coord));
        assert_eq!(run.contradiction(), Some(error.coord));
        run.reset();
        assert_eq!(run.contradiction(), None);
        assert!(run.history().is_empty());
        assert!(run.wave().grid().iter().all(|cell| cell.num_possible() == 4));
    }
}
