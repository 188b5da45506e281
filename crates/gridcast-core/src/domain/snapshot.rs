//! Read-only, serialisable copy of a [`ScreenBuffer`].
//!
//! Renderers that want to hand the grid to something outside the process
//! (JSON output, golden-file tests) work from a `Snapshot` instead of
//! borrowing the live buffer.

use serde::{Deserialize, Serialize};

use crate::domain::screen::{Position, ScreenBuffer};

/// Point-in-time copy of the screen state.
///
/// `rows` holds one string per grid row.  Each cell byte maps to the
/// `char` with the same code point, so bytes above `0x7F` survive the trip
/// through JSON unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub width: usize,
    pub height: usize,
    pub color_mode: u8,
    pub cursor: Position,
    pub rows: Vec<String>,
    /// Color index of every cell, row-major, parallel to `rows`.
    pub colors: Vec<Vec<u8>>,
}

impl Snapshot {
    pub fn capture(screen: &ScreenBuffer) -> Self {
        let rows = screen
            .rows()
            .map(|row| row.iter().map(|cell| char::from(cell.glyph)).collect())
            .collect();
        let colors = screen
            .rows()
            .map(|row| row.iter().map(|cell| cell.color).collect())
            .collect();
        Self {
            width: screen.width(),
            height: screen.height(),
            color_mode: screen.color_mode(),
            cursor: screen.cursor(),
            rows,
            colors,
        }
    }

    /// The grid as plain text, one line per row, without a trailing newline.
    pub fn to_text(&self) -> String {
        self.rows.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::screen::Cell;

    #[test]
    fn test_capture_copies_dimensions_cursor_and_content() {
        // Arrange
        let mut screen = ScreenBuffer::new(3, 2, 4).unwrap();
        screen.set_cell(1, 0, Cell::new(b'A', 9)).unwrap();
        screen.move_cursor(2, 1).unwrap();

        // Act
        let snap = screen.snapshot();

        // Assert
        assert_eq!(snap.width, 3);
        assert_eq!(snap.height, 2);
        assert_eq!(snap.color_mode, 4);
        assert_eq!(snap.cursor, Position::new(2, 1));
        assert_eq!(snap.rows, vec![" A ".to_string(), "   ".to_string()]);
        assert_eq!(snap.colors, vec![vec![0, 9, 0], vec![0, 0, 0]]);
    }

    #[test]
    fn test_snapshot_is_detached_from_later_mutation() {
        let mut screen = ScreenBuffer::new(2, 1, 0).unwrap();
        let before = screen.snapshot();
        screen.set_cell(0, 0, Cell::new(b'z', 0)).unwrap();

        assert_eq!(before.rows, vec!["  ".to_string()]);
        assert_eq!(screen.snapshot().rows, vec!["z ".to_string()]);
    }

    #[test]
    fn test_to_text_joins_rows_with_newlines() {
        let mut screen = ScreenBuffer::new(2, 2, 0).unwrap();
        screen.render_text(0, 0, b"ab", 0).unwrap();
        screen.render_text(0, 1, b"cd", 0).unwrap();

        assert_eq!(screen.snapshot().to_text(), "ab\ncd");
    }

    #[test]
    fn test_high_bytes_map_to_latin1_code_points() {
        let mut screen = ScreenBuffer::new(1, 1, 0).unwrap();
        screen.set_cell(0, 0, Cell::new(0xE9, 0)).unwrap();

        assert_eq!(screen.snapshot().rows[0], "\u{e9}");
    }

    #[test]
    fn test_snapshot_serializes_to_json() {
        let screen = ScreenBuffer::new(2, 1, 1).unwrap();
        let json = serde_json::to_string(&screen.snapshot()).unwrap();

        assert!(json.contains("\"width\":2"));
        assert!(json.contains("\"cursor\":{\"x\":0,\"y\":0}"));
        let restored: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, screen.snapshot());
    }
}
