//! Built-in sample stream, written by `gridcast-viewer --emit-demo`.
//!
//! Piping it back into the viewer is the quickest end-to-end check:
//!
//! ```text
//! gridcast-viewer --emit-demo | gridcast-viewer
//! ```

use gridcast_core::protocol::{
    DrawAtCursor, DrawCharacter, DrawLine, MoveCursor, RenderText, ScreenSetup,
};
use gridcast_core::{encode_stream, Command, ProtocolError};

pub const DEMO_WIDTH: u8 = 32;
pub const DEMO_HEIGHT: u8 = 7;

/// A framed title card: border lines, corner marks, two text rows and a
/// cursor mark.
pub fn demo_commands() -> Vec<Command> {
    let (right, bottom) = (DEMO_WIDTH - 1, DEMO_HEIGHT - 1);
    let hline = |y| {
        Command::DrawLine(DrawLine {
            x1: 1,
            y1: y,
            x2: right - 1,
            y2: y,
            color_index: 1,
            glyph: b'-',
        })
    };
    let vline = |x| {
        Command::DrawLine(DrawLine {
            x1: x,
            y1: 1,
            x2: x,
            y2: bottom - 1,
            color_index: 1,
            glyph: b'|',
        })
    };
    let corner = |x, y| {
        Command::DrawCharacter(DrawCharacter {
            x,
            y,
            color_index: 2,
            glyph: b'+',
        })
    };

    vec![
        Command::ScreenSetup(ScreenSetup {
            width: DEMO_WIDTH,
            height: DEMO_HEIGHT,
            color_mode: 2,
        }),
        hline(0),
        hline(bottom),
        vline(0),
        vline(right),
        corner(0, 0),
        corner(right, 0),
        corner(0, bottom),
        corner(right, bottom),
        Command::RenderText(RenderText {
            x: 3,
            y: 2,
            color_index: 1,
            text: b"gridcast demo stream".to_vec(),
        }),
        Command::RenderText(RenderText {
            x: 3,
            y: 4,
            color_index: 0,
            text: b"opcodes 0x01-0x07, 0xFF".to_vec(),
        }),
        Command::MoveCursor(MoveCursor { x: 27, y: 4 }),
        Command::DrawAtCursor(DrawAtCursor {
            glyph: b'_',
            color_index: 2,
        }),
        Command::Terminator,
    ]
}

/// The demo as wire bytes.
///
/// # Errors
///
/// Only fails if a demo text exceeds the protocol's length limit.
pub fn demo_stream() -> Result<Vec<u8>, ProtocolError> {
    encode_stream(&demo_commands())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcast_core::{CommandStream, SessionState};

    #[test]
    fn test_demo_stream_plays_to_terminator() {
        // Arrange
        let bytes = demo_stream().unwrap();
        let mut stream = CommandStream::new(bytes.as_slice());

        // Act
        let report = stream.run().unwrap();

        // Assert
        assert_eq!(report.state, SessionState::Terminated);
        assert_eq!(report.commands_applied, demo_commands().len() as u64 - 1);
        assert_eq!(report.bytes_consumed, bytes.len() as u64);
    }

    #[test]
    fn test_demo_draws_frame_corners_and_title() {
        let bytes = demo_stream().unwrap();
        let mut stream = CommandStream::new(bytes.as_slice());
        stream.run().unwrap();
        let text = stream.screen().unwrap().snapshot().to_text();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), DEMO_HEIGHT as usize);
        assert!(lines[0].starts_with("+-") && lines[0].ends_with("-+"));
        assert!(lines[2].contains("gridcast demo stream"));
        assert!(lines[6].starts_with('+') && lines[6].ends_with('+'));
    }
}
