use crate::error::InvalidInput;
use crate::orientation::Orientation;
use crate::pattern::{Pattern, PatternId, PatternTable, PatternWeights};
use coord_2d::{Coord, Size};
use grid_2d::Grid;
use hashbrown::HashMap;
use std::hash::Hash;
use std::num::NonZeroU32;

/// The distinct `N`x`N` patterns of a sample, each with the number of times it
/// was seen. Rotated variants of a window are separate patterns with their own
/// counts.
#[derive(Debug, Clone)]
pub struct PatternCatalog<T> {
    patterns: PatternTable<Pattern<T>>,
    counts: PatternTable<NonZeroU32>,
    pattern_size: Size,
}

/// Iterates over the top-left corners of every window of `pattern_size` that
/// fits entirely inside a grid of `grid_size`, row by row.
struct WindowIter {
    x_end: i32,
    y_end: i32,
    next: Coord,
}

impl WindowIter {
    fn new(grid_size: Size, pattern_size: Size) -> Self {
        Self {
            x_end: grid_size.width() as i32 - pattern_size.width() as i32 + 1,
            y_end: grid_size.height() as i32 - pattern_size.height() as i32 + 1,
            next: Coord::new(0, 0),
        }
    }
}

impl Iterator for WindowIter {
    type Item = Coord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.x_end <= 0 || self.next.y >= self.y_end {
            return None;
        }
        let coord = self.next;
        self.next.x += 1;
        if self.next.x >= self.x_end {
            self.next = Coord::new(0, self.next.y + 1);
        }
        Some(coord)
    }
}

/// The distinct variants of `base` under `orientations`, in the order they
/// are first produced.
fn distinct_variants<T: Clone + PartialEq>(
    base: &Pattern<T>,
    orientations: &[Orientation],
) -> Vec<Pattern<T>> {
    let mut variants: Vec<Pattern<T>> = Vec::with_capacity(orientations.len());
    for &orientation in orientations {
        let variant = base.oriented(orientation);
        if !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

impl<T: Eq + Clone + Hash> PatternCatalog<T> {
    /// Scans every `pattern_size`x`pattern_size` window of `sample` (without
    /// wrapping at the edges) and counts each distinct pattern. When
    /// `use_rotations` is set, each window also contributes its distinct
    /// 90, 180 and 270 degree rotations.
    pub fn extract(
        sample: &Grid<T>,
        pattern_size: u32,
        use_rotations: bool,
    ) -> Result<Self, InvalidInput> {
        if pattern_size == 0 {
            return Err(InvalidInput::ZeroPatternSize);
        }
        let sample_size = sample.size();
        if sample_size.width() < pattern_size || sample_size.height() < pattern_size {
            return Err(InvalidInput::SampleTooSmall {
                sample_width: sample_size.width(),
                sample_height: sample_size.height(),
                pattern_size,
            });
        }
        let size = Size::new(pattern_size, pattern_size);
        let orientations = Orientation::orientations(use_rotations);
        let mut ids_by_pattern: HashMap<Pattern<T>, PatternId> = HashMap::new();
        let mut patterns = PatternTable::default();
        let mut counts: PatternTable<u32> = PatternTable::default();
        for top_left in WindowIter::new(sample_size, size) {
            let base = Pattern::from_window(sample, top_left, size, Orientation::Original);
            for variant in distinct_variants(&base, orientations) {
                let pattern_id = match ids_by_pattern.get(&variant) {
                    Some(&pattern_id) => pattern_id,
                    None => {
                        counts.push(0);
                        let pattern_id = patterns.push(variant.clone());
                        ids_by_pattern.insert(variant, pattern_id);
                        pattern_id
                    }
                };
                counts[pattern_id] += 1;
            }
        }
        let counts = counts
            .iter()
            .filter_map(|&count| NonZeroU32::new(count))
            .collect::<PatternTable<_>>();
        assert_eq!(counts.len(), patterns.len());
        log::debug!(
            "extracted {} patterns of size {}x{} from a {}x{} sample (rotations: {})",
            patterns.len(),
            pattern_size,
            pattern_size,
            sample_size.width(),
            sample_size.height(),
            use_rotations,
        );
        Ok(Self {
            patterns,
            counts,
            pattern_size: size,
        })
    }
}

impl<T> PatternCatalog<T> {
    pub fn len(&self) -> usize {
        self.patterns.len()
    }
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
    pub fn pattern_size(&self) -> Size {
        self.pattern_size
    }
    pub fn pattern(&self, pattern_id: PatternId) -> &Pattern<T> {
        &self.patterns[pattern_id]
    }
    pub fn weight(&self, pattern_id: PatternId) -> u32 {
        self.counts[pattern_id].get()
    }
    pub fn iter(&self) -> impl Iterator<Item = (PatternId, &Pattern<T>, u32)> {
        self.patterns
            .enumerate()
            .zip(self.counts.iter())
            .map(|((pattern_id, pattern), count)| (pattern_id, pattern, count.get()))
    }
    pub fn patterns(&self) -> &PatternTable<Pattern<T>> {
        &self.patterns
    }
    pub fn weights(&self) -> PatternWeights {
        PatternWeights::from_counts(self.counts.iter().cloned())
    }
    pub fn top_left_value(&self, pattern_id: PatternId) -> &T {
        self.pattern(pattern_id).top_left()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn grid_from_rows<T: Clone, const W: usize, const H: usize>(
        rows: [[T; W]; H],
    ) -> Grid<T> {
        Grid::new_fn(Size::new(W as u32, H as u32), |coord| {
            rows[coord.y as usize][coord.x as usize].clone()
        })
    }

    #[test]
    fn window_iter_covers_every_full_window() {
        let windows = WindowIter::new(Size::new(4, 3), Size::new(2, 2))
            .collect::<Vec<_>>();
        assert_eq!(windows.len(), 3 * 2);
        assert_eq!(windows[0], Coord::new(0, 0));
        assert_eq!(windows[3], Coord::new(0, 1));
        assert_eq!(*windows.last().unwrap(), Coord::new(2, 1));
        assert_eq!(WindowIter::new(Size::new(1, 3), Size::new(2, 2)).count(), 0);
    }

    #[test]
    fn checkerboard_has_two_orientations() {
        let grid = grid_from_rows([[0, 1], [1, 0]]);
        let catalog = PatternCatalog::extract(&grid, 2, true).unwrap();
        // the 180 degree turn is identical to the window itself
        assert_eq!(catalog.len(), 2);
        assert!(catalog.len() <= 4);
        for (_, _, weight) in catalog.iter() {
            assert_eq!(weight, 1);
        }
    }

    #[test]
    fn asymmetric_window_has_four_orientations() {
        let grid = grid_from_rows([[1, 2], [3, 4]]);
        let catalog = PatternCatalog::extract(&grid, 2, true).unwrap();
        assert_eq!(catalog.len(), 4);
        let without_rotations = PatternCatalog::extract(&grid, 2, false).unwrap();
        assert_eq!(without_rotations.len(), 1);
        assert_eq!(*without_rotations.top_left_value(0), 1);
    }

    #[test]
    fn uniform_sample_has_one_pattern() {
        let grid = Grid::new_clone(Size::new(5, 4), 'a');
        let catalog = PatternCatalog::extract(&grid, 2, true).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.weight(0), 4 * 3);
    }

    #[test]
    fn counts_repeated_windows() {
        let grid = grid_from_rows([['a', 'a', 'a'], ['a', 'a', 'a'], ['b', 'b', 'b']]);
        let catalog = PatternCatalog::extract(&grid, 2, false).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.weight(0), 2);
        assert_eq!(catalog.weight(1), 2);
        let weights = catalog.weights();
        assert_eq!(weights.sum_weight(), 4);
        for (pattern_id, pattern, weight) in catalog.iter() {
            assert!(weight >= 1);
            assert_eq!(catalog.weight(pattern_id), weight);
            assert_eq!(catalog.pattern(pattern_id), pattern);
        }
    }

    #[test]
    fn ids_follow_scan_order() {
        let grid = grid_from_rows([[3, 3, 7], [3, 3, 7]]);
        let catalog = PatternCatalog::extract(&grid, 2, false).unwrap();
        assert_eq!(*catalog.top_left_value(0), 3);
        assert_eq!(
            catalog.pattern(1).tiles().cloned().collect::<Vec<_>>(),
            vec![3, 7, 3, 7]
        );
    }

    #[test]
    fn rejects_small_samples() {
        let grid = Grid::new_clone(Size::new(1, 3), 0u8);
        assert_eq!(
            PatternCatalog::extract(&grid, 2, true).unwrap_err(),
            InvalidInput::SampleTooSmall {
                sample_width: 1,
                sample_height: 3,
                pattern_size: 2,
            }
        );
        assert_eq!(
            PatternCatalog::extract(&grid, 0, true).unwrap_err(),
            InvalidInput::ZeroPatternSize
        );
    }
}
