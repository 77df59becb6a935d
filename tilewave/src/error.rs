use crate::pattern::PatternId;
use coord_2d::Coord;
use thiserror::Error;

/// Problems with the sample or configuration, detected before any wave is
/// built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("pattern size must be at least 1")]
    ZeroPatternSize,
    #[error("sample is {sample_width}x{sample_height}, smaller than pattern size {pattern_size}")]
    SampleTooSmall {
        sample_width: u32,
        sample_height: u32,
        pattern_size: u32,
    },
    #[error("output dimensions must be positive (got {width}x{height})")]
    EmptyOutput { width: u32, height: u32 },
}

/// A single observation made during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollapseRecord {
    pub coord: Coord,
    pub pattern_id: PatternId,
}

/// A cell ran out of compatible patterns. The run that produced it cannot
/// continue; `history` lists the collapses that led there so a caller can
/// report or replay the failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error(
    "contradiction at ({}, {}) after {} collapses",
    .coord.x,
    .coord.y,
    .history.len()
)]
pub struct Contradiction {
    pub coord: Coord,
    pub history: Vec<CollapseRecord>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PropagateError {
    #[error("no compatible patterns remain at ({}, {})", .coord.x, .coord.y)]
    Contradiction { coord: Coord },
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChosenPatternIdError {
    #[error("no compatible patterns")]
    NoCompatiblePatterns,
    #[error("multiple compatible patterns")]
    MultipleCompatiblePatterns,
}

/// A cell that could not be turned into a tile because it is not collapsed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("cell ({}, {}) is unresolved: {}", .coord.x, .coord.y, .reason)]
pub struct Unresolved {
    pub coord: Coord,
    pub reason: ChosenPatternIdError,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),
    #[error(transparent)]
    Contradiction(#[from] Contradiction),
    #[error(transparent)]
    Unresolved(#[from] Unresolved),
}
