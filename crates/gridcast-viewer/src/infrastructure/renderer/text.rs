//! Plain-text renderer: every screen row becomes one output line.
//!
//! Cell bytes are written as-is.  No encoding is applied, so a byte such as
//! `0xE9` reaches the output untouched and the terminal decides what it
//! looks like.

use std::io::Write;

use gridcast_core::ScreenBuffer;

use crate::application::play_stream::{FrameRenderer, RenderError};

/// Byte used to draw the separator line between frames.
const SEPARATOR: u8 = b'=';

pub struct TextRenderer<W: Write> {
    out: W,
    separate_frames: bool,
    frames: u64,
    line: Vec<u8>,
}

impl<W: Write> TextRenderer<W> {
    /// With `separate_frames`, every frame after the first is preceded by a
    /// line of `=` as wide as the screen.
    pub fn new(out: W, separate_frames: bool) -> Self {
        Self {
            out,
            separate_frames,
            frames: 0,
            line: Vec::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameRenderer for TextRenderer<W> {
    fn render(&mut self, screen: &ScreenBuffer) -> Result<(), RenderError> {
        if self.separate_frames && self.frames > 0 {
            self.line.clear();
            self.line.resize(screen.width(), SEPARATOR);
            self.line.push(b'\n');
            self.out.write_all(&self.line)?;
        }
        for row in screen.rows() {
            self.line.clear();
            self.line.extend(row.iter().map(|cell| cell.glyph));
            self.line.push(b'\n');
            self.out.write_all(&self.line)?;
        }
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcast_core::Cell;

    fn screen_with(glyphs: &[(usize, usize, u8)]) -> ScreenBuffer {
        let mut screen = ScreenBuffer::new(3, 2, 1).unwrap();
        for &(x, y, glyph) in glyphs {
            screen.set_cell(x, y, Cell::new(glyph, 1)).unwrap();
        }
        screen
    }

    #[test]
    fn test_render_writes_one_line_per_row() {
        // Arrange
        let screen = screen_with(&[(0, 0, b'a'), (2, 1, b'z')]);
        let mut renderer = TextRenderer::new(Vec::new(), true);

        // Act
        renderer.render(&screen).unwrap();
        renderer.finish().unwrap();

        // Assert
        assert_eq!(renderer.into_inner(), b"a  \n  z\n".to_vec());
    }

    #[test]
    fn test_render_writes_high_bytes_untouched() {
        let screen = screen_with(&[(1, 0, 0xE9)]);
        let mut renderer = TextRenderer::new(Vec::new(), false);

        renderer.render(&screen).unwrap();

        assert_eq!(renderer.into_inner(), vec![b' ', 0xE9, b' ', b'\n', b' ', b' ', b' ', b'\n']);
    }

    #[test]
    fn test_separator_goes_between_frames_only() {
        let screen = screen_with(&[]);
        let mut renderer = TextRenderer::new(Vec::new(), true);

        renderer.render(&screen).unwrap();
        renderer.render(&screen).unwrap();

        assert_eq!(renderer.into_inner(), b"   \n   \n===\n   \n   \n".to_vec());
    }

    #[test]
    fn test_separator_can_be_disabled() {
        let screen = screen_with(&[]);
        let mut renderer = TextRenderer::new(Vec::new(), false);

        renderer.render(&screen).unwrap();
        renderer.render(&screen).unwrap();

        assert_eq!(renderer.into_inner(), b"   \n   \n   \n   \n".to_vec());
    }
}
