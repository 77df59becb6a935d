use crate::orientation::Orientation;
use coord_2d::{Coord, Size};
use grid_2d::Grid;
use std::iter;
use std::num::NonZeroU32;
use std::ops::{Index, IndexMut};
use std::slice;

pub type PatternId = u32;

/// Dense storage indexed by `PatternId`.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternTable<T> {
    table: Vec<T>,
}

impl<T> Default for PatternTable<T> {
    fn default() -> Self {
        Self { table: Vec::new() }
    }
}

impl<T> PatternTable<T> {
    pub fn len(&self) -> usize {
        self.table.len()
    }
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
    pub fn push(&mut self, value: T) -> PatternId {
        let pattern_id = self.table.len() as PatternId;
        self.table.push(value);
        pattern_id
    }
    pub fn iter(&self) -> slice::Iter<T> {
        self.table.iter()
    }
    pub fn iter_mut(&mut self) -> slice::IterMut<T> {
        self.table.iter_mut()
    }
    pub fn enumerate(&self) -> impl Iterator<Item = (PatternId, &T)> {
        self.iter()
            .enumerate()
            .map(|(index, item)| (index as PatternId, item))
    }
    pub fn enumerate_mut(&mut self) -> impl Iterator<Item = (PatternId, &mut T)> {
        self.iter_mut()
            .enumerate()
            .map(|(index, item)| (index as PatternId, item))
    }
}

impl<T: Clone> PatternTable<T> {
    pub fn resize(&mut self, size: usize, value: T) {
        self.table.resize(size, value);
    }
    pub fn fill(&mut self, value: T) {
        self.table.iter_mut().for_each(|slot| *slot = value.clone());
    }
}

impl<T> iter::FromIterator<T> for PatternTable<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            table: Vec::from_iter(iter),
        }
    }
}

impl<T> Index<PatternId> for PatternTable<T> {
    type Output = T;
    fn index(&self, index: PatternId) -> &Self::Output {
        self.table.index(index as usize)
    }
}

impl<T> IndexMut<PatternId> for PatternTable<T> {
    fn index_mut(&mut self, index: PatternId) -> &mut Self::Output {
        self.table.index_mut(index as usize)
    }
}

/// An owned square block of tiles. Equality and hashing are by content, so a
/// `Pattern` can be used directly as the key when deduplicating windows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pattern<T> {
    size: Size,
    tiles: Vec<T>,
}

impl<T: Clone> Pattern<T> {
    /// Copies the `size`-sized window of `grid` whose top-left tile is at
    /// `top_left`, viewed in the given orientation. The window must lie
    /// entirely inside the grid.
    pub fn from_window(
        grid: &Grid<T>,
        top_left: Coord,
        size: Size,
        orientation: Orientation,
    ) -> Self {
        let tiles = (0..size.height() as i32)
            .flat_map(|y| (0..size.width() as i32).map(move |x| Coord::new(x, y)))
            .map(|coord| {
                let source = top_left + orientation.transform_coord(size, coord);
                grid.get_checked(source).clone()
            })
            .collect();
        Self { size, tiles }
    }

    /// A copy of this pattern turned by `orientation`.
    pub fn oriented(&self, orientation: Orientation) -> Self {
        let tiles = self
            .coords()
            .map(|coord| {
                self.get_checked(orientation.transform_coord(self.size, coord))
                    .clone()
            })
            .collect();
        Self {
            size: self.size,
            tiles,
        }
    }
}

impl<T> Pattern<T> {
    pub fn size(&self) -> Size {
        self.size
    }
    pub fn get(&self, coord: Coord) -> Option<&T> {
        if coord.is_valid(self.size) {
            self.tiles
                .get(coord.y as usize * self.size.width() as usize + coord.x as usize)
        } else {
            None
        }
    }
    pub fn get_checked(&self, coord: Coord) -> &T {
        match self.get(coord) {
            Some(tile) => tile,
            None => panic!("coord is out of bounds"),
        }
    }
    pub fn top_left(&self) -> &T {
        self.get_checked(Coord::new(0, 0))
    }
    /// Coordinates in row-major order, matching the order of `tiles`.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size.height() as i32)
            .flat_map(move |y| (0..size.width() as i32).map(move |x| Coord::new(x, y)))
    }
    pub fn tiles(&self) -> slice::Iter<T> {
        self.tiles.iter()
    }
}

impl<T: PartialEq> Pattern<T> {
    /// True if `other`, placed at `offset` relative to `self`, agrees with
    /// `self` on every tile where the two overlap.
    pub fn agrees_with(&self, other: &Self, offset: Coord) -> bool {
        assert!(self.size == other.size);
        self.coords().all(|coord| match other.get(coord - offset) {
            Some(other_tile) => self.get_checked(coord) == other_tile,
            None => true,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PatternWeight {
    weight: NonZeroU32,
    weight_log_weight: f32,
}

impl PatternWeight {
    pub fn new(weight: NonZeroU32) -> Self {
        Self {
            weight,
            weight_log_weight: (weight.get() as f32) * (weight.get() as f32).log2(),
        }
    }
    pub fn weight(&self) -> u32 {
        self.weight.get()
    }
    pub fn weight_log_weight(&self) -> f32 {
        self.weight_log_weight
    }
}

/// Frequency weights for every pattern in a catalog, with the sums a fresh
/// wave cell starts from.
#[derive(Debug, Clone)]
pub struct PatternWeights {
    weights: PatternTable<PatternWeight>,
    sum_weight: u32,
    sum_weight_log_weight: f32,
}

impl PatternWeights {
    pub fn new(weights: PatternTable<PatternWeight>) -> Self {
        let sum_weight = weights.iter().map(PatternWeight::weight).sum();
        let sum_weight_log_weight = weights
            .iter()
            .map(PatternWeight::weight_log_weight)
            .sum();
        Self {
            weights,
            sum_weight,
            sum_weight_log_weight,
        }
    }
    pub fn from_counts<I: IntoIterator<Item = NonZeroU32>>(counts: I) -> Self {
        Self::new(counts.into_iter().map(PatternWeight::new).collect())
    }
    pub fn num_patterns(&self) -> usize {
        self.weights.len()
    }
    pub fn sum_weight(&self) -> u32 {
        self.sum_weight
    }
    pub fn sum_weight_log_weight(&self) -> f32 {
        self.sum_weight_log_weight
    }
    pub fn get(&self, pattern_id: PatternId) -> &PatternWeight {
        &self.weights[pattern_id]
    }
    pub fn weight(&self, pattern_id: PatternId) -> u32 {
        self.weights[pattern_id].weight()
    }
    pub fn enumerate(&self) -> impl Iterator<Item = (PatternId, &PatternWeight)> {
        self.weights.enumerate()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn grid_from_rows<const W: usize, const H: usize>(rows: [[u8; W]; H]) -> Grid<u8> {
        Grid::new_fn(Size::new(W as u32, H as u32), |coord| {
            rows[coord.y as usize][coord.x as usize]
        })
    }

    #[test]
    fn tables_default_to_empty_without_a_default_element() {
        let mut table: PatternTable<Pattern<u8>> = PatternTable::default();
        assert!(table.is_empty());
        let grid = grid_from_rows([[7]]);
        let pattern =
            Pattern::from_window(&grid, Coord::new(0, 0), Size::new(1, 1), Orientation::Original);
        assert_eq!(table.push(pattern.clone()), 0);
        assert_eq!(table[0], pattern);
    }

    #[test]
    fn window_copies_tiles_row_major() {
        let grid = grid_from_rows([[1, 2, 3], [4, 5, 6]]);
        let pattern =
            Pattern::from_window(&grid, Coord::new(1, 0), Size::new(2, 2), Orientation::Original);
        assert_eq!(pattern.tiles().cloned().collect::<Vec<_>>(), vec![2, 3, 5, 6]);
        assert_eq!(*pattern.top_left(), 2);
    }

    #[test]
    fn rotating_a_window_matches_rotating_the_pattern() {
        let grid = grid_from_rows([[1, 2], [3, 4]]);
        let size = Size::new(2, 2);
        let base = Pattern::from_window(&grid, Coord::new(0, 0), size, Orientation::Original);
        let turned = base.oriented(Orientation::Clockwise90);
        assert_eq!(
            turned,
            Pattern::from_window(&grid, Coord::new(0, 0), size, Orientation::Clockwise90)
        );
        // 1 2      3 1
        // 3 4  ->  4 2
        assert_eq!(turned.tiles().cloned().collect::<Vec<_>>(), vec![3, 1, 4, 2]);
    }

    #[test]
    fn agreement_compares_only_the_overlap() {
        let grid = grid_from_rows([[0, 1, 1], [1, 0, 1]]);
        let size = Size::new(2, 2);
        let a = Pattern::from_window(&grid, Coord::new(0, 0), size, Orientation::Original);
        let b = Pattern::from_window(&grid, Coord::new(1, 0), size, Orientation::Original);
        assert!(a.agrees_with(&b, Coord::new(1, 0)));
        assert!(!a.agrees_with(&b, Coord::new(-1, 0)));
        assert!(a.agrees_with(&b, Coord::new(0, -1)));
        assert!(!a.agrees_with(&b, Coord::new(0, 1)));
    }

    #[test]
    fn weights_sum() {
        let weights = PatternWeights::from_counts(
            [1, 2, 4].iter().filter_map(|&count| NonZeroU32::new(count)),
        );
        assert_eq!(weights.num_patterns(), 3);
        assert_eq!(weights.sum_weight(), 7);
        assert!((weights.sum_weight_log_weight() - (0.0 + 2.0 + 8.0)).abs() < 1e-6);
    }
}
