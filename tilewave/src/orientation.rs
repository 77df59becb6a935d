use coord_2d::{Coord, Size};

/// A member of the rotation group of a square pattern. Diagrams show where the
/// `##` in the top-left of the original ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Orientation {
    /// ##.
    /// ...
    /// ...
    Original,
    /// ..#
    /// ..#
    /// ...
    Clockwise90,
    /// ...
    /// ...
    /// .##
    Clockwise180,
    /// ...
    /// #..
    /// #..
    Clockwise270,
}

use self::Orientation::*;

/// Every rotation, in the order produced by repeatedly turning 90 degrees
/// clockwise.
pub const ROTATIONS: [Orientation; 4] = [Original, Clockwise90, Clockwise180, Clockwise270];

/// Only the unrotated orientation, for samples whose rotations must not be
/// added to the catalog.
pub const ORIGINAL_ONLY: [Orientation; 1] = [Original];

impl Orientation {
    /// Maps a coordinate in the rotated pattern to the coordinate in the
    /// unrotated pattern holding the same tile.
    pub fn transform_coord(self, size: Size, coord: Coord) -> Coord {
        match self {
            Original => coord,
            Clockwise90 => Coord::new(coord.y, size.x() as i32 - 1 - coord.x),
            Clockwise180 => {
                Coord::new(size.x() as i32 - 1 - coord.x, size.y() as i32 - 1 - coord.y)
            }
            Clockwise270 => Coord::new(size.y() as i32 - 1 - coord.y, coord.x),
        }
    }

    pub fn orientations(use_rotations: bool) -> &'static [Orientation] {
        if use_rotations {
            &ROTATIONS
        } else {
            &ORIGINAL_ONLY
        }
    }
}
