use coord_2d::{Coord, Size};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Which axes of the output are treated as toroidal. Without wrapping, cells on
/// the edge of the output simply have fewer neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputWrap {
    #[default]
    None,
    X,
    Y,
    XY,
}

fn value_is_valid(value: i32, size: u32) -> bool {
    value >= 0 && (value as u32) < size
}

fn normalize_value(value: i32, size: u32) -> i32 {
    value.rem_euclid(size as i32)
}

impl OutputWrap {
    pub fn wraps_x(self) -> bool {
        matches!(self, OutputWrap::X | OutputWrap::XY)
    }

    pub fn wraps_y(self) -> bool {
        matches!(self, OutputWrap::Y | OutputWrap::XY)
    }

    /// The in-bounds coordinate which `coord` refers to in an output of `size`,
    /// or `None` if it falls off an edge that doesn't wrap.
    pub fn normalize_coord(self, coord: Coord, size: Size) -> Option<Coord> {
        let x = if self.wraps_x() {
            normalize_value(coord.x, size.x())
        } else if value_is_valid(coord.x, size.x()) {
            coord.x
        } else {
            return None;
        };
        let y = if self.wraps_y() {
            normalize_value(coord.y, size.y())
        } else if value_is_valid(coord.y, size.y()) {
            coord.y
        } else {
            return None;
        };
        Some(Coord::new(x, y))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown wrap mode {0:?} (expected one of none, x, y, xy)")]
pub struct ParseOutputWrapError(String);

impl FromStr for OutputWrap {
    type Err = ParseOutputWrapError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(OutputWrap::None),
            "x" => Ok(OutputWrap::X),
            "y" => Ok(OutputWrap::Y),
            "xy" => Ok(OutputWrap::XY),
            _ => Err(ParseOutputWrapError(s.to_string())),
        }
    }
}

impl fmt::Display for OutputWrap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            OutputWrap::None => "none",
            OutputWrap::X => "x",
            OutputWrap::Y => "y",
            OutputWrap::XY => "xy",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn wraps() {
        let size = Size::new(4, 5);
        assert_eq!(
            OutputWrap::None.normalize_coord(Coord::new(2, 3), size),
            Some(Coord::new(2, 3))
        );
        assert_eq!(OutputWrap::None.normalize_coord(Coord::new(4, 3), size), None);
        assert_eq!(OutputWrap::None.normalize_coord(Coord::new(-1, 3), size), None);
        assert_eq!(
            OutputWrap::X.normalize_coord(Coord::new(4, 3), size),
            Some(Coord::new(0, 3))
        );
        assert_eq!(OutputWrap::Y.normalize_coord(Coord::new(4, 3), size), None);
        assert_eq!(
            OutputWrap::Y.normalize_coord(Coord::new(2, 6), size),
            Some(Coord::new(2, 1))
        );
        assert_eq!(
            OutputWrap::XY.normalize_coord(Coord::new(-1, -1), size),
            Some(Coord::new(3, 4))
        );
    }

    #[test]
    fn parses() {
        assert_eq!("XY".parse::<OutputWrap>(), Ok(OutputWrap::XY));
        assert_eq!("none".parse::<OutputWrap>(), Ok(OutputWrap::None));
        assert!("diagonal".parse::<OutputWrap>().is_err());
        assert_eq!(OutputWrap::Y.to_string(), "y");
    }
}
