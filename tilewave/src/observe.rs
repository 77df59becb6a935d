//! Choosing which cell to collapse next.

use crate::wave::Wave;
use coord_2d::Coord;
use rand::Rng;

/// Upper bound (exclusive) of the random value added to each cell's entropy
/// so that ties are broken differently on every selection.
pub const ENTROPY_NOISE: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The undecided cell with the lowest noisy entropy.
    Next(Coord),
    /// Every cell has exactly one possible pattern.
    Collapsed,
    /// A cell with no possible patterns was found.
    Contradiction(Coord),
}

/// Scans the wave for the cell with more than one possible pattern whose
/// entropy, plus a fresh random value in `[0, ENTROPY_NOISE)`, is smallest.
pub fn select_next<R: Rng>(wave: &Wave, rng: &mut R) -> Selection {
    let mut min_entropy: Option<(f32, Coord)> = None;
    for (coord, cell) in wave.grid().enumerate() {
        match cell.num_possible() {
            0 => return Selection::Contradiction(coord),
            1 => continue,
            _ => (),
        }
        let entropy = cell.entropy() + rng.gen_range(0.0..ENTROPY_NOISE);
        match min_entropy {
            Some((current, _)) if current <= entropy => (),
            _ => min_entropy = Some((entropy, coord)),
        }
    }
    match min_entropy {
        Some((_, coord)) => Selection::Next(coord),
        None => Selection::Collapsed,
    }
}
