use crate::catalog::PatternCatalog;
use crate::error::Unresolved;
use crate::pattern::PatternId;
use crate::wave::Wave;
use grid_2d::Grid;

/// Turns the pattern chosen for a cell into the tile placed at that cell.
pub trait Materialize {
    type Tile;
    fn tile(&self, pattern_id: PatternId) -> Self::Tile;
}

/// Each cell becomes the top-left tile of its pattern.
impl<T: Clone> Materialize for PatternCatalog<T> {
    type Tile = T;
    fn tile(&self, pattern_id: PatternId) -> T {
        self.top_left_value(pattern_id).clone()
    }
}

/// Builds the output grid from a fully collapsed wave. Fails on the first cell
/// (in row-major order) that doesn't have exactly one possible pattern.
pub fn materialize<M: Materialize>(
    materialize: &M,
    wave: &Wave,
) -> Result<Grid<M::Tile>, Unresolved> {
    Ok(wave
        .pattern_id_grid()?
        .map_ref(|&pattern_id| materialize.tile(pattern_id)))
}
