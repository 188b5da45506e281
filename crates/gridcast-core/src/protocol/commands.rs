//! All gridcast drawing command types.
//!
//! Every command on the wire is a one-byte opcode followed by a payload of
//! single unsigned bytes.  There are no multi-byte integers in this protocol.
//!
//! # Field interpretation
//!
//! Each payload byte is read as a `u8`:
//!
//! - coordinates are columns/rows `0..=255`; a byte such as `0xF0` is column
//!   240, not -16, and is simply out of bounds on a narrower screen;
//! - dimensions are `1..=255` (zero is rejected when the screen is built);
//! - color indices and the color mode are opaque and never range-checked;
//! - characters are raw bytes with no encoding attached.

use serde::{Deserialize, Serialize};

// ── Protocol constants ────────────────────────────────────────────────────────

/// Opcode that ends a command stream.
pub const TERMINATOR: u8 = 0xFF;

/// Largest text blob a `RenderText` length byte can describe.
pub const MAX_TEXT_LEN: usize = u8::MAX as usize;

// ── Opcodes ───────────────────────────────────────────────────────────────────

/// Every opcode defined by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Opcode {
    ScreenSetup = 0x01,
    DrawCharacter = 0x02,
    DrawLine = 0x03,
    RenderText = 0x04,
    MoveCursor = 0x05,
    DrawAtCursor = 0x06,
    ClearScreen = 0x07,
    Terminator = 0xFF,
}

impl TryFrom<u8> for Opcode {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        match value {
            0x01 => Ok(Opcode::ScreenSetup),
            0x02 => Ok(Opcode::DrawCharacter),
            0x03 => Ok(Opcode::DrawLine),
            0x04 => Ok(Opcode::RenderText),
            0x05 => Ok(Opcode::MoveCursor),
            0x06 => Ok(Opcode::DrawAtCursor),
            0x07 => Ok(Opcode::ClearScreen),
            0xFF => Ok(Opcode::Terminator),
            _ => Err(()),
        }
    }
}

// ── Per-command payload structs ───────────────────────────────────────────────

/// SCREEN_SETUP (0x01): creates the screen.  Must open every stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSetup {
    pub width: u8,
    pub height: u8,
    pub color_mode: u8,
}

/// DRAW_CHARACTER (0x02): writes one character at an absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawCharacter {
    pub x: u8,
    pub y: u8,
    pub color_index: u8,
    pub glyph: u8,
}

/// DRAW_LINE (0x03): axis-aligned line between two inclusive endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawLine {
    pub x1: u8,
    pub y1: u8,
    pub x2: u8,
    pub y2: u8,
    pub color_index: u8,
    pub glyph: u8,
}

/// RENDER_TEXT (0x04): a run of characters written left to right.
///
/// On the wire the text is preceded by a one-byte length, so `text` can be
/// at most [`MAX_TEXT_LEN`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderText {
    pub x: u8,
    pub y: u8,
    pub color_index: u8,
    pub text: Vec<u8>,
}

/// MOVE_CURSOR (0x05).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveCursor {
    pub x: u8,
    pub y: u8,
}

/// DRAW_AT_CURSOR (0x06): writes one character at the cursor without moving it.
///
/// Note the field order on the wire: character first, then color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawAtCursor {
    pub glyph: u8,
    pub color_index: u8,
}

// ── Top-level command enum ────────────────────────────────────────────────────

/// A fully decoded command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    ScreenSetup(ScreenSetup),
    DrawCharacter(DrawCharacter),
    DrawLine(DrawLine),
    RenderText(RenderText),
    MoveCursor(MoveCursor),
    DrawAtCursor(DrawAtCursor),
    ClearScreen,
    Terminator,
}

impl Command {
    /// Returns the opcode this command is framed with.
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::ScreenSetup(_) => Opcode::ScreenSetup,
            Command::DrawCharacter(_) => Opcode::DrawCharacter,
            Command::DrawLine(_) => Opcode::DrawLine,
            Command::RenderText(_) => Opcode::RenderText,
            Command::MoveCursor(_) => Opcode::MoveCursor,
            Command::DrawAtCursor(_) => Opcode::DrawAtCursor,
            Command::ClearScreen => Opcode::ClearScreen,
            Command::Terminator => Opcode::Terminator,
        }
    }
}
