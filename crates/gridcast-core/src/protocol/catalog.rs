//! Opcode catalog: the immutable table the decoder consults for every command.
//!
//! Each entry says how many payload bytes follow the opcode and how to turn
//! those bytes into a [`Command`].  Payload sizes are properties of the
//! opcode, never of a command instance, so they live here and nowhere else.
//!
//! ```text
//! opcode  name           payload
//! 0x01    ScreenSetup    width height color_mode
//! 0x02    DrawCharacter  x y color char
//! 0x03    DrawLine       x1 y1 x2 y2 color char
//! 0x04    RenderText     x y color len text[len]
//! 0x05    MoveCursor     x y
//! 0x06    DrawAtCursor   char color
//! 0x07    ClearScreen    -
//! 0xFF    Terminator     -
//! ```

use crate::protocol::codec::ProtocolError;
use crate::protocol::commands::{
    Command, DrawAtCursor, DrawCharacter, DrawLine, MoveCursor, Opcode, RenderText, ScreenSetup,
};

/// How the payload following an opcode is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Exactly this many bytes.
    Fixed(usize),
    /// `prefix` fixed bytes, then a one-byte length, then that many bytes.
    LengthPrefixed { prefix: usize },
}

impl PayloadShape {
    /// Number of bytes the decoder must read before the payload length is
    /// fully known: the whole payload for `Fixed`, prefix plus length byte
    /// for `LengthPrefixed`.
    pub fn header_len(&self) -> usize {
        match *self {
            PayloadShape::Fixed(n) => n,
            PayloadShape::LengthPrefixed { prefix } => prefix + 1,
        }
    }

    /// Total payload length implied by `payload`, or `None` when `payload`
    /// is too short to contain the length byte.
    pub fn total_len(&self, payload: &[u8]) -> Option<usize> {
        match *self {
            PayloadShape::Fixed(n) => Some(n),
            PayloadShape::LengthPrefixed { prefix } => payload
                .get(prefix)
                .map(|&len| prefix + 1 + usize::from(len)),
        }
    }
}

/// One catalog row.
pub struct CommandSpec {
    pub opcode: Opcode,
    pub name: &'static str,
    pub payload: PayloadShape,
    decode_fn: fn(&[u8]) -> Command,
}

impl std::fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandSpec")
            .field("opcode", &self.opcode)
            .field("name", &self.name)
            .field("payload", &self.payload)
            .finish_non_exhaustive()
    }
}

impl CommandSpec {
    /// Decodes a complete payload (everything after the opcode byte).
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::MalformedPayload`] when `payload` is not
    /// exactly the length this opcode's framing prescribes.
    pub fn decode(&self, payload: &[u8]) -> Result<Command, ProtocolError> {
        match self.payload.total_len(payload) {
            Some(expected) if expected == payload.len() => Ok((self.decode_fn)(payload)),
            expected => Err(ProtocolError::MalformedPayload {
                opcode: self.opcode as u8,
                expected: expected.unwrap_or_else(|| self.payload.header_len()),
                actual: payload.len(),
            }),
        }
    }
}

/// The full opcode table.
pub static CATALOG: [CommandSpec; 8] = [
    CommandSpec {
        opcode: Opcode::ScreenSetup,
        name: "ScreenSetup",
        payload: PayloadShape::Fixed(3),
        decode_fn: decode_screen_setup,
    },
    CommandSpec {
        opcode: Opcode::DrawCharacter,
        name: "DrawCharacter",
        payload: PayloadShape::Fixed(4),
        decode_fn: decode_draw_character,
    },
    CommandSpec {
        opcode: Opcode::DrawLine,
        name: "DrawLine",
        payload: PayloadShape::Fixed(6),
        decode_fn: decode_draw_line,
    },
    CommandSpec {
        opcode: Opcode::RenderText,
        name: "RenderText",
        payload: PayloadShape::LengthPrefixed { prefix: 3 },
        decode_fn: decode_render_text,
    },
    CommandSpec {
        opcode: Opcode::MoveCursor,
        name: "MoveCursor",
        payload: PayloadShape::Fixed(2),
        decode_fn: decode_move_cursor,
    },
    CommandSpec {
        opcode: Opcode::DrawAtCursor,
        name: "DrawAtCursor",
        payload: PayloadShape::Fixed(2),
        decode_fn: decode_draw_at_cursor,
    },
    CommandSpec {
        opcode: Opcode::ClearScreen,
        name: "ClearScreen",
        payload: PayloadShape::Fixed(0),
        decode_fn: decode_clear_screen,
    },
    CommandSpec {
        opcode: Opcode::Terminator,
        name: "Terminator",
        payload: PayloadShape::Fixed(0),
        decode_fn: decode_terminator,
    },
];

/// Finds the catalog entry for an opcode byte.
///
/// # Errors
///
/// Returns [`ProtocolError::UnknownOpcode`] for bytes with no entry.
pub fn lookup(opcode: u8) -> Result<&'static CommandSpec, ProtocolError> {
    let op = Opcode::try_from(opcode).map_err(|()| ProtocolError::UnknownOpcode(opcode))?;
    CATALOG
        .iter()
        .find(|spec| spec.opcode == op)
        .ok_or(ProtocolError::UnknownOpcode(opcode))
}

// ── Per-command decode helpers ────────────────────────────────────────────────
//
// Each helper receives a payload whose length `CommandSpec::decode` has
// already checked, so direct indexing cannot go out of range.

fn decode_screen_setup(p: &[u8]) -> Command {
    Command::ScreenSetup(ScreenSetup {
        width: p[0],
        height: p[1],
        color_mode: p[2],
    })
}

fn decode_draw_character(p: &[u8]) -> Command {
    Command::DrawCharacter(DrawCharacter {
        x: p[0],
        y: p[1],
        color_index: p[2],
        glyph: p[3],
    })
}

fn decode_draw_line(p: &[u8]) -> Command {
    Command::DrawLine(DrawLine {
        x1: p[0],
        y1: p[1],
        x2: p[2],
        y2: p[3],
        color_index: p[4],
        glyph: p[5],
    })
}

fn decode_render_text(p: &[u8]) -> Command {
    // p[3] is the length byte; the length check guarantees p[4..] is the text.
    Command::RenderText(RenderText {
        x: p[0],
        y: p[1],
        color_index: p[2],
        text: p[4..].to_vec(),
    })
}

fn decode_move_cursor(p: &[u8]) -> Command {
    Command::MoveCursor(MoveCursor { x: p[0], y: p[1] })
}

fn decode_draw_at_cursor(p: &[u8]) -> Command {
    Command::DrawAtCursor(DrawAtCursor {
        glyph: p[0],
        color_index: p[1],
    })
}

fn decode_clear_screen(_: &[u8]) -> Command {
    Command::ClearScreen
}

fn decode_terminator(_: &[u8]) -> Command {
    Command::Terminator
}
