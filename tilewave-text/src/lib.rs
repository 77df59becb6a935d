//! Text front-end for `tilewave`: read sample grids of characters or integers
//! from text, and render generated grids back to text.

use coord_2d::Coord;
pub use coord_2d::Size;
use grid_2d::Grid;
use rand::Rng;
use std::hash::Hash;
use thiserror::Error;
pub use tilewave::wrap::OutputWrap;
pub use tilewave::{Config, Contradiction, GenerateError, InvalidInput};
use tilewave::{AdjacencyIndex, PatternCatalog, PatternWeights, Run, Wave};

pub mod retry {
    pub use tilewave::retry::Retry;
    pub use tilewave::retry::{Forever, NumTimes};

    #[cfg(feature = "parallel")]
    pub use tilewave::retry::ParNumTimes;

    pub trait TextRetry: Retry {
        type TextReturn;
        #[doc(hidden)]
        fn text_return<T: super::TextTile>(
            r: Self::Return,
            text_patterns: &super::TextPatterns<T>,
        ) -> Self::TextReturn;
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TextGridError {
    #[error("sample has no rows")]
    Empty,
    #[error("row {row} has {found} tiles but the first row has {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("row {row}, column {column}: {token:?} is not an integer")]
    InvalidInteger {
        row: usize,
        column: usize,
        token: String,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerateTextError {
    #[error(transparent)]
    Parse(#[from] TextGridError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
}

/// A tile type which can be read from and written to text.
pub trait TextTile: Eq + Clone + Hash {
    /// Shown in place of cells that have no single pattern.
    fn placeholder() -> Self;
    fn parse_grid(text: &str) -> Result<Grid<Self>, TextGridError>;
    fn render_grid(grid: &Grid<Self>) -> String;
}

impl TextTile for char {
    fn placeholder() -> Self {
        '?'
    }
    fn parse_grid(text: &str) -> Result<Grid<Self>, TextGridError> {
        parse_char_grid(text)
    }
    fn render_grid(grid: &Grid<Self>) -> String {
        render_char_grid(grid)
    }
}

impl TextTile for i64 {
    fn placeholder() -> Self {
        -1
    }
    fn parse_grid(text: &str) -> Result<Grid<Self>, TextGridError> {
        parse_int_grid(text)
    }
    fn render_grid(grid: &Grid<Self>) -> String {
        render_int_grid(grid)
    }
}

fn grid_from_rows<T: Clone>(rows: Vec<Vec<T>>) -> Result<Grid<T>, TextGridError> {
    let width = match rows.first() {
        Some(first) if !first.is_empty() => first.len(),
        _ => return Err(TextGridError::Empty),
    };
    if let Some((index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
        return Err(TextGridError::Ragged {
            row: index + 1,
            expected: width,
            found: row.len(),
        });
    }
    let size = Size::new(width as u32, rows.len() as u32);
    Ok(Grid::new_fn(size, |Coord { x, y }| {
        rows[y as usize][x as usize].clone()
    }))
}

// Trailing blank lines are ignored; blank lines elsewhere are empty rows.
fn significant_lines(text: &str) -> Vec<&str> {
    let mut lines = text.lines().collect::<Vec<_>>();
    while lines.last().map_or(false, |line| line.trim().is_empty()) {
        lines.pop();
    }
    lines
}

/// Each line is a row and each character is a tile.
pub fn parse_char_grid(text: &str) -> Result<Grid<char>, TextGridError> {
    let rows = significant_lines(text)
        .into_iter()
        .map(|line| line.chars().collect::<Vec<_>>())
        .collect::<Vec<_>>();
    grid_from_rows(rows)
}

/// Each line is a row of whitespace-separated integers.
pub fn parse_int_grid(text: &str) -> Result<Grid<i64>, TextGridError> {
    let rows = significant_lines(text)
        .into_iter()
        .enumerate()
        .map(|(row, line)| {
            line.split_whitespace()
                .enumerate()
                .map(|(column, token)| {
                    token
                        .parse::<i64>()
                        .map_err(|_| TextGridError::InvalidInteger {
                            row: row + 1,
                            column: column + 1,
                            token: token.to_string(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    grid_from_rows(rows)
}

pub fn render_char_grid(grid: &Grid<char>) -> String {
    let size = grid.size();
    let mut text =
        String::with_capacity((size.width() as usize + 1) * size.height() as usize);
    for (Coord { x, .. }, &ch) in grid.enumerate() {
        text.push(ch);
        if x as u32 == size.width() - 1 {
            text.push('\n');
        }
    }
    text
}

/// Columns are right-aligned to the widest value.
pub fn render_int_grid(grid: &Grid<i64>) -> String {
    let size = grid.size();
    let column_width = grid
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(0);
    let mut text = String::new();
    for (Coord { x, .. }, value) in grid.enumerate() {
        if x > 0 {
            text.push(' ');
        }
        text.push_str(&format!("{:>width$}", value, width = column_width));
        if x as u32 == size.width() - 1 {
            text.push('\n');
        }
    }
    text
}

/// The patterns of a text sample, ready to collapse waves of any size.
pub struct TextPatterns<T> {
    catalog: PatternCatalog<T>,
    index: AdjacencyIndex,
    weights: PatternWeights,
    placeholder: T,
}

impl<T: TextTile> TextPatterns<T> {
    pub fn new(
        sample: Grid<T>,
        pattern_size: u32,
        use_rotations: bool,
    ) -> Result<Self, InvalidInput> {
        let catalog = PatternCatalog::extract(&sample, pattern_size, use_rotations)?;
        let index = AdjacencyIndex::build(&catalog);
        let weights = catalog.weights();
        Ok(Self {
            catalog,
            index,
            weights,
            placeholder: T::placeholder(),
        })
    }

    pub fn from_text(
        text: &str,
        pattern_size: u32,
        use_rotations: bool,
    ) -> Result<Self, GenerateTextError> {
        let sample = T::parse_grid(text)?;
        Ok(Self::new(sample, pattern_size, use_rotations).map_err(GenerateError::from)?)
    }

    pub fn set_placeholder(&mut self, placeholder: T) {
        self.placeholder = placeholder;
    }

    pub fn catalog(&self) -> &PatternCatalog<T> {
        &self.catalog
    }

    /// Each collapsed cell becomes its pattern's top-left tile. Cells with
    /// zero or several possible patterns become the placeholder.
    pub fn grid_from_wave(&self, wave: &Wave) -> Grid<T> {
        wave.grid()
            .map_ref(|cell| match cell.chosen_pattern_id() {
                Ok(pattern_id) => self.catalog.top_left_value(pattern_id).clone(),
                Err(_) => self.placeholder.clone(),
            })
    }

    pub fn text_from_wave(&self, wave: &Wave) -> String {
        T::render_grid(&self.grid_from_wave(wave))
    }

    pub fn run(&self, output_size: Size, wrap: OutputWrap) -> Run<'_> {
        Run::new_wrap(output_size, &self.index, &self.weights, wrap)
    }

    pub fn collapse_wave_retrying<RT, R>(
        &self,
        output_size: Size,
        wrap: OutputWrap,
        retry: RT,
        rng: &mut R,
    ) -> RT::Return
    where
        RT: retry::Retry,
        R: Rng,
    {
        self.run(output_size, wrap).collapse_retrying(retry, rng)
    }

    pub fn generate_text_retrying<RT, R>(
        &self,
        output_size: Size,
        wrap: OutputWrap,
        retry: RT,
        rng: &mut R,
    ) -> RT::TextReturn
    where
        RT: retry::TextRetry,
        R: Rng,
    {
        RT::text_return(
            self.collapse_wave_retrying(output_size, wrap, retry, rng),
            self,
        )
    }
}

impl retry::TextRetry for retry::Forever {
    type TextReturn = String;
    fn text_return<T: TextTile>(
        r: Self::Return,
        text_patterns: &TextPatterns<T>,
    ) -> Self::TextReturn {
        text_patterns.text_from_wave(&r)
    }
}

impl retry::TextRetry for retry::NumTimes {
    type TextReturn = Result<String, Contradiction>;
    fn text_return<T: TextTile>(
        r: Self::Return,
        text_patterns: &TextPatterns<T>,
    ) -> Self::TextReturn {
        r.map(|wave| text_patterns.text_from_wave(&wave))
    }
}

#[cfg(feature = "parallel")]
impl retry::TextRetry for retry::ParNumTimes {
    type TextReturn = Result<String, Contradiction>;
    fn text_return<T: TextTile>(
        r: Self::Return,
        text_patterns: &TextPatterns<T>,
    ) -> Self::TextReturn {
        r.map(|wave| text_patterns.text_from_wave(&wave))
    }
}

/// Parses `text` as a sample of `T` tiles and generates a grid resembling it,
/// drawing all randomness from `rng`.
pub fn generate_text_with_rng<T, R>(
    text: &str,
    config: &Config,
    rng: &mut R,
) -> Result<String, GenerateTextError>
where
    T: TextTile,
    R: Rng,
{
    let sample = T::parse_grid(text)?;
    let output = tilewave::generate_grid_with_rng(&sample, config, rng)?;
    Ok(T::render_grid(&output))
}

/// Like `generate_text_with_rng`, seeded from the configuration.
pub fn generate_text<T: TextTile>(
    text: &str,
    config: &Config,
) -> Result<String, GenerateTextError> {
    let sample = T::parse_grid(text)?;
    log::debug!(
        "parsed {}x{} sample",
        sample.size().width(),
        sample.size().height()
    );
    let output = tilewave::generate_grid(&sample, config)?;
    Ok(T::render_grid(&output))
}
