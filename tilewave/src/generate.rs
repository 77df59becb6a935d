use crate::adjacency::AdjacencyIndex;
use crate::catalog::PatternCatalog;
use crate::config::Config;
use crate::error::GenerateError;
use crate::output;
use crate::retry::NumTimes;
use crate::run::Run;
use grid_2d::Grid;
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use std::hash::Hash;

/// Generates an output grid resembling `sample`, drawing all randomness from
/// `rng`. The configured seed is ignored.
pub fn generate_grid_with_rng<T, R>(
    sample: &Grid<T>,
    config: &Config,
    rng: &mut R,
) -> Result<Grid<T>, GenerateError>
where
    T: Eq + Clone + Hash,
    R: Rng,
{
    config.validate()?;
    let catalog = PatternCatalog::extract(sample, config.pattern_size, config.use_rotations)?;
    let index = AdjacencyIndex::build(&catalog);
    let weights = catalog.weights();
    let run = Run::new_wrap(config.output_size, &index, &weights, config.wrap);
    let wave = run.collapse_retrying(NumTimes(config.retries), rng)?;
    Ok(output::materialize(&catalog, &wave)?)
}

/// Generates an output grid resembling `sample`. Runs are seeded from
/// `config.random_seed`, or from a freshly drawn seed which is logged so the
/// run can be reproduced.
pub fn generate_grid<T>(sample: &Grid<T>, config: &Config) -> Result<Grid<T>, GenerateError>
where
    T: Eq + Clone + Hash,
{
    let seed = config
        .random_seed
        .unwrap_or_else(|| rand::thread_rng().gen());
    log::info!("seed: {}", seed);
    let mut rng = XorShiftRng::seed_from_u64(seed);
    generate_grid_with_rng(sample, config, &mut rng)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::InvalidInput;
    use coord_2d::Size;

    fn sample() -> Grid<u8> {
        Grid::new_fn(Size::new(6, 6), |coord| {
            if coord.x >= 1 && coord.x <= 2 && coord.y >= 1 && coord.y <= 2 {
                1
            } else {
                0
            }
        })
    }

    #[test]
    fn seeded_runs_repeat() {
        let config = Config::default()
            .with_output_size(Size::new(16, 12))
            .with_random_seed(42)
            .with_retries(10);
        let first = generate_grid(&sample(), &config).unwrap();
        let second = generate_grid(&sample(), &config).unwrap();
        assert_eq!(first.size(), Size::new(16, 12));
        assert!(first.iter().eq(second.iter()));
        assert!(first.iter().all(|&tile| tile <= 1));
    }

    #[test]
    fn invalid_input_is_reported_before_running() {
        let config = Config::default().with_pattern_size(7);
        assert_eq!(
            generate_grid(&sample(), &config).unwrap_err(),
            GenerateError::InvalidInput(InvalidInput::SampleTooSmall {
                sample_width: 6,
                sample_height: 6,
                pattern_size: 7,
            })
        );
        let config = Config::default().with_output_size(Size::new(0, 3));
        assert!(matches!(
            generate_grid(&sample(), &config),
            Err(GenerateError::InvalidInput(InvalidInput::EmptyOutput { .. }))
        ));
    }
}
