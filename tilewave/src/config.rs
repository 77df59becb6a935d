use crate::error::InvalidInput;
use crate::wrap::OutputWrap;
use coord_2d::Size;

/// Parameters for a generation run. Start from `Config::default()` and
/// override with the `with_*` methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Width and height of the square patterns taken from the sample.
    pub pattern_size: u32,
    pub output_size: Size,
    /// Seed for the run's RNG. When `None`, a seed is drawn and logged.
    pub random_seed: Option<u64>,
    /// Whether rotated copies of each sample window are patterns too.
    pub use_rotations: bool,
    pub wrap: OutputWrap,
    /// Extra attempts after a contradiction.
    pub retries: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pattern_size: 2,
            output_size: Size::new(48, 48),
            random_seed: None,
            use_rotations: true,
            wrap: OutputWrap::None,
            retries: 0,
        }
    }
}

/// Fails unless the output has at least one cell.
pub(crate) fn validate_output_size(output_size: Size) -> Result<(), InvalidInput> {
    if output_size.width() == 0 || output_size.height() == 0 {
        return Err(InvalidInput::EmptyOutput {
            width: output_size.width(),
            height: output_size.height(),
        });
    }
    Ok(())
}

impl Config {
    pub fn with_pattern_size(self, pattern_size: u32) -> Self {
        Self {
            pattern_size,
            ..self
        }
    }

    pub fn with_output_size(self, output_size: Size) -> Self {
        Self {
            output_size,
            ..self
        }
    }

    pub fn with_random_seed(self, random_seed: u64) -> Self {
        Self {
            random_seed: Some(random_seed),
            ..self
        }
    }

    pub fn with_rotations(self, use_rotations: bool) -> Self {
        Self {
            use_rotations,
            ..self
        }
    }

    pub fn with_wrap(self, wrap: OutputWrap) -> Self {
        Self { wrap, ..self }
    }

    pub fn with_retries(self, retries: usize) -> Self {
        Self { retries, ..self }
    }

    /// Checks the parts of the configuration that don't depend on a sample.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        if self.pattern_size == 0 {
            return Err(InvalidInput::ZeroPatternSize);
        }
        validate_output_size(self.output_size)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert_eq!(config.pattern_size, 2);
        assert_eq!(config.output_size, Size::new(48, 48));
        assert!(config.use_rotations);
        assert_eq!(config.wrap, OutputWrap::None);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_sizes() {
        assert_eq!(
            Config::default().with_pattern_size(0).validate(),
            Err(InvalidInput::ZeroPatternSize)
        );
        assert_eq!(
            Config::default()
                .with_output_size(Size::new(10, 0))
                .validate(),
            Err(InvalidInput::EmptyOutput {
                width: 10,
                height: 0
            })
        );
    }
}
