use crate::catalog::PatternCatalog;
use crate::pattern::{PatternId, PatternTable};
use direction::{Direction, DirectionTable, Directions};

/// For each pattern and each of the 8 neighbouring offsets, the patterns which
/// may be placed at that offset. Two patterns are compatible at an offset when
/// they hold equal tiles everywhere they overlap.
#[derive(Debug, Clone)]
pub struct AdjacencyIndex {
    compatibility_per_pattern: PatternTable<DirectionTable<Vec<PatternId>>>,
}

impl AdjacencyIndex {
    pub fn build<T: PartialEq>(catalog: &PatternCatalog<T>) -> Self {
        let patterns = catalog.patterns();
        let compatibility_per_pattern = patterns
            .iter()
            .map(|pattern| {
                let mut allowed_neighbours: DirectionTable<Vec<PatternId>> =
                    DirectionTable::default();
                for direction in Directions {
                    *allowed_neighbours.get_mut(direction) = patterns
                        .enumerate()
                        .filter(|(_, other)| pattern.agrees_with(other, direction.coord()))
                        .map(|(pattern_id, _)| pattern_id)
                        .collect();
                }
                allowed_neighbours
            })
            .collect::<PatternTable<_>>();
        let index = Self {
            compatibility_per_pattern,
        };
        log::debug!(
            "built adjacency index over {} patterns ({} compatible pairs)",
            index.num_patterns(),
            index.num_compatible_pairs(),
        );
        index
    }

    pub fn num_patterns(&self) -> usize {
        self.compatibility_per_pattern.len()
    }

    /// Patterns allowed at `direction` from `pattern_id`, in ascending order.
    pub fn compatible(&self, pattern_id: PatternId, direction: Direction) -> &[PatternId] {
        self.compatibility_per_pattern[pattern_id].get(direction)
    }

    pub fn is_compatible(
        &self,
        pattern_id: PatternId,
        direction: Direction,
        other: PatternId,
    ) -> bool {
        self.compatible(pattern_id, direction)
            .binary_search(&other)
            .is_ok()
    }

    fn num_compatible_pairs(&self) -> usize {
        self.compatibility_per_pattern
            .iter()
            .map(|table| table.iter().map(Vec::len).sum::<usize>())
            .sum()
    }
}
