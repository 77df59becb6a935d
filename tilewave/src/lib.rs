//! Overlapping-pattern Wave Function Collapse over 2D grids of tiles.
//!
//! A sample grid is cut into square patterns, which are indexed by which
//! of them may sit next to each other in each of the 8 directions. An output
//! wave is then collapsed one lowest-entropy cell at a time, propagating the
//! consequences of each choice to the rest of the wave.

pub mod adjacency;
pub mod catalog;
pub mod config;
pub mod error;
pub mod generate;
pub mod observe;
pub mod orientation;
pub mod output;
pub mod pattern;
pub mod propagate;
pub mod retry;
pub mod run;
pub mod wave;
pub mod wrap;

pub use adjacency::AdjacencyIndex;
pub use catalog::PatternCatalog;
pub use config::Config;
pub use error::{
    ChosenPatternIdError, CollapseRecord, Contradiction, GenerateError, InvalidInput,
    PropagateError, Unresolved,
};
pub use generate::{generate_grid, generate_grid_with_rng};
pub use observe::{select_next, Selection};
pub use orientation::Orientation;
pub use output::{materialize, Materialize};
pub use pattern::{Pattern, PatternId, PatternTable, PatternWeights};
pub use propagate::Propagator;
pub use run::{generate, Observe, Run};
pub use wave::{Wave, WaveCell};
pub use wrap::OutputWrap;

pub use coord_2d::{Coord, Size};
pub use direction::Direction;
pub use grid_2d::Grid;
