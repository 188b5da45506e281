//! In-memory character grid mutated by decoded drawing commands.
//!
//! The grid is `height` rows of `width` cells, stored row-major in a single
//! `Vec`.  Every mutation is bounds-checked against the fixed dimensions and
//! fails with [`ScreenError::OutOfBounds`] instead of clamping.
//!
//! The buffer knows nothing about the wire protocol: coordinates arrive here
//! already widened to `usize` and characters are raw bytes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::snapshot::Snapshot;

/// Byte written to every cell on construction and by [`ScreenBuffer::clear`].
pub const BLANK: u8 = b' ';

/// Errors raised by screen mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScreenError {
    /// Width or height was zero at construction, or the cell count does not
    /// fit in `usize`.
    #[error("invalid screen dimensions {width}x{height}")]
    InvalidDimension { width: usize, height: usize },

    /// A mutation targeted a cell outside the grid.
    #[error("coordinates ({x}, {y}) are outside the {width}x{height} screen")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    /// A line was neither horizontal nor vertical.
    #[error("only horizontal and vertical lines are supported: ({x1}, {y1}) -> ({x2}, {y2})")]
    UnsupportedGeometry {
        x1: usize,
        y1: usize,
        x2: usize,
        y2: usize,
    },
}

/// A zero-based grid position.  `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0 };

    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// One grid cell: the raw character byte and the opaque color index it was
/// drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub glyph: u8,
    pub color: u8,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        glyph: BLANK,
        color: 0,
    };

    pub fn new(glyph: u8, color: u8) -> Self {
        Self { glyph, color }
    }

    pub fn is_blank(&self) -> bool {
        self.glyph == BLANK
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}

/// The character grid, cursor and dimensions of one stream session.
///
/// # Examples
///
/// ```rust
/// use gridcast_core::{Cell, ScreenBuffer};
///
/// let mut screen = ScreenBuffer::new(5, 3, 2).unwrap();
/// screen.set_cell(4, 2, Cell::new(b'x', 1)).unwrap();
/// assert_eq!(screen.cell(4, 2).unwrap().glyph, b'x');
/// assert!(screen.set_cell(5, 0, Cell::new(b'x', 1)).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenBuffer {
    width: usize,
    height: usize,
    color_mode: u8,
    cells: Vec<Cell>,
    cursor: Position,
}

impl ScreenBuffer {
    /// Allocates a blank `width` x `height` grid with the cursor at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::InvalidDimension`] if either dimension is zero
    /// or `width * height` overflows.
    pub fn new(width: usize, height: usize, color_mode: u8) -> Result<Self, ScreenError> {
        let len = width
            .checked_mul(height)
            .filter(|&len| len > 0)
            .ok_or(ScreenError::InvalidDimension { width, height })?;
        Ok(Self {
            width,
            height,
            color_mode,
            cells: vec![Cell::BLANK; len],
            cursor: Position::ORIGIN,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color mode from the setup command.  Stored, never interpreted.
    pub fn color_mode(&self) -> u8 {
        self.color_mode
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns the cell at `(x, y)`, or `None` outside the grid.
    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if self.contains(x, y) {
            Some(self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    /// Iterates over the grid rows, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.width)
    }

    /// Returns `true` if `(x, y)` lies inside the grid.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height
    }

    /// Overwrites a single cell.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] without touching the grid when
    /// `(x, y)` is outside it.
    pub fn set_cell(&mut self, x: usize, y: usize, cell: Cell) -> Result<(), ScreenError> {
        self.check_bounds(x, y)?;
        let idx = self.index(x, y);
        self.cells[idx] = cell;
        Ok(())
    }

    /// Draws an inclusive horizontal or vertical segment.
    ///
    /// Both endpoints are validated before any cell is written, so a failed
    /// call leaves the grid untouched.
    ///
    /// # Errors
    ///
    /// - [`ScreenError::OutOfBounds`] if either endpoint is outside the grid.
    /// - [`ScreenError::UnsupportedGeometry`] if the endpoints share neither
    ///   a row nor a column.
    pub fn draw_line(
        &mut self,
        from: Position,
        to: Position,
        cell: Cell,
    ) -> Result<(), ScreenError> {
        self.check_bounds(from.x, from.y)?;
        self.check_bounds(to.x, to.y)?;

        if from.x == to.x {
            for y in from.y.min(to.y)..=from.y.max(to.y) {
                let idx = self.index(from.x, y);
                self.cells[idx] = cell;
            }
        } else if from.y == to.y {
            let row_start = self.index(0, from.y);
            let (lo, hi) = (from.x.min(to.x), from.x.max(to.x));
            self.cells[row_start + lo..=row_start + hi].fill(cell);
        } else {
            return Err(ScreenError::UnsupportedGeometry {
                x1: from.x,
                y1: from.y,
                x2: to.x,
                y2: to.y,
            });
        }
        Ok(())
    }

    /// Moves the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] and keeps the old position when
    /// `(x, y)` is outside the grid.
    pub fn move_cursor(&mut self, x: usize, y: usize) -> Result<(), ScreenError> {
        self.check_bounds(x, y)?;
        self.cursor = Position::new(x, y);
        Ok(())
    }

    /// Writes `cell` at the cursor.  The cursor does not advance.
    pub fn draw_at_cursor(&mut self, cell: Cell) -> Result<(), ScreenError> {
        let Position { x, y } = self.cursor;
        self.set_cell(x, y, cell)
    }

    /// Writes `text` left to right starting at `(x, y)`, one byte per column.
    ///
    /// Writing stops at the first byte whose column falls off the grid.
    /// Bytes already written stay written; callers needing all-or-nothing
    /// semantics must snapshot the buffer first.
    ///
    /// # Errors
    ///
    /// Returns [`ScreenError::OutOfBounds`] for the first target cell outside
    /// the grid.
    pub fn render_text(
        &mut self,
        x: usize,
        y: usize,
        text: &[u8],
        color: u8,
    ) -> Result<(), ScreenError> {
        for (offset, &glyph) in text.iter().enumerate() {
            self.set_cell(x.saturating_add(offset), y, Cell::new(glyph, color))?;
        }
        Ok(())
    }

    /// Resets every cell to blank.  The cursor stays where it is.
    pub fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    /// Captures a serialisable, read-only copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<(), ScreenError> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(ScreenError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }
}
