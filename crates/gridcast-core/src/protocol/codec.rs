//! Framing codec: splits a byte stream into [`Command`]s and back.
//!
//! Wire format:
//! ```text
//! [opcode:1][payload:N]
//! ```
//! `N` comes from the [`catalog`](crate::protocol::catalog) entry for the
//! opcode.  `RenderText` carries `[x][y][color][len][text:len]`; every other
//! payload has a fixed size.  All fields are single unsigned bytes.
//!
//! # Decoding one command
//!
//! 1. Read the opcode byte.  End-of-input here is a clean end of stream
//!    (`Ok(None)`), not an error.
//! 2. `0xFF` is the terminator and has no payload.
//! 3. Look the opcode up in the catalog (`UnknownOpcode` if absent).
//! 4. Read exactly the payload the catalog prescribes.  Running out of input
//!    part-way is `TruncatedStream`; nothing is zero-filled.
//! 5. Hand the payload to the catalog's decode function.

use std::io;

use thiserror::Error;
use tracing::{debug, trace};

use crate::protocol::catalog::{self, PayloadShape};
use crate::protocol::commands::{Command, MAX_TEXT_LEN, TERMINATOR};
use crate::protocol::source::{ByteSource, Fill};

/// Errors that can occur while framing, decoding or encoding commands.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The opcode byte has no catalog entry.
    #[error("unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// The input ended in the middle of a command's payload.
    #[error(
        "truncated stream: opcode 0x{opcode:02X} needs {needed} payload bytes, only {available} available"
    )]
    TruncatedStream {
        opcode: u8,
        needed: usize,
        available: usize,
    },

    /// A payload handed to a catalog decoder had the wrong length.
    #[error("malformed payload for opcode 0x{opcode:02X}: expected {expected} bytes, got {actual}")]
    MalformedPayload {
        opcode: u8,
        expected: usize,
        actual: usize,
    },

    /// `RenderText` text does not fit the one-byte length field.
    #[error("text of {0} bytes exceeds the 255 byte limit")]
    TextTooLong(usize),

    /// The byte source failed for a reason other than end-of-input.
    #[error("I/O error reading command stream: {0}")]
    Io(#[from] io::Error),
}

// ── Decoder ───────────────────────────────────────────────────────────────────

/// Pulls commands one at a time from a [`ByteSource`].
///
/// The decoder holds no command history; it only remembers how many bytes
/// it has consumed (for diagnostics) and reuses one scratch buffer for
/// payloads.
///
/// # Examples
///
/// ```rust
/// use gridcast_core::protocol::{Command, CommandDecoder};
///
/// let bytes: &[u8] = &[0x01, 5, 3, 2, 0x07, 0xFF];
/// let mut decoder = CommandDecoder::new(bytes);
///
/// assert!(matches!(decoder.next_command().unwrap(), Some(Command::ScreenSetup(_))));
/// assert_eq!(decoder.next_command().unwrap(), Some(Command::ClearScreen));
/// assert_eq!(decoder.next_command().unwrap(), Some(Command::Terminator));
/// assert_eq!(decoder.next_command().unwrap(), None);
/// assert_eq!(decoder.offset(), 6);
/// ```
#[derive(Debug)]
pub struct CommandDecoder<S> {
    source: S,
    offset: u64,
    decoded: u64,
    payload: Vec<u8>,
}

impl<S: ByteSource> CommandDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            offset: 0,
            decoded: 0,
            payload: Vec::with_capacity(MAX_TEXT_LEN + 4),
        }
    }

    /// Total bytes consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Number of commands successfully decoded so far.
    pub fn commands_decoded(&self) -> u64 {
        self.decoded
    }

    /// Gives the source back, positioned after the last consumed byte.
    pub fn into_inner(self) -> S {
        self.source
    }

    /// Reads the next opcode byte, or `None` at a clean end of input.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Io`] if the source fails.
    pub fn read_opcode(&mut self) -> Result<Option<u8>, ProtocolError> {
        let mut byte = [0u8; 1];
        match ByteSource::fill(&mut self.source, &mut byte)? {
            Fill::Complete => {
                self.offset += 1;
                Ok(Some(byte[0]))
            }
            Fill::Partial(_) => Ok(None),
        }
    }

    /// Reads and decodes the payload belonging to `opcode`, which the caller
    /// has already consumed with [`read_opcode`](Self::read_opcode).
    ///
    /// # Errors
    ///
    /// - [`ProtocolError::UnknownOpcode`] if `opcode` is not in the catalog.
    /// - [`ProtocolError::TruncatedStream`] if the input ends mid-payload.
    /// - [`ProtocolError::Io`] if the source fails.
    pub fn decode_body(&mut self, opcode: u8) -> Result<Command, ProtocolError> {
        let command_offset = self.offset.saturating_sub(1);

        if opcode == TERMINATOR {
            self.decoded += 1;
            debug!(offset = command_offset, "decoded Terminator");
            return Ok(Command::Terminator);
        }

        let spec = catalog::lookup(opcode).map_err(|e| {
            debug!(offset = command_offset, "unknown opcode 0x{opcode:02X}");
            e
        })?;

        self.payload.clear();
        let header_len = spec.payload.header_len();
        self.read_payload(opcode, header_len, header_len)?;

        if let PayloadShape::LengthPrefixed { .. } = spec.payload {
            let total = spec.payload.total_len(&self.payload).unwrap_or(header_len);
            self.read_payload(opcode, total - header_len, total)?;
        }

        trace!(payload = ?self.payload, "{} payload", spec.name);
        let command = spec.decode(&self.payload)?;
        self.decoded += 1;
        debug!(offset = command_offset, "decoded {}", spec.name);
        Ok(command)
    }

    /// Decodes the next command, or returns `None` at a clean end of input.
    ///
    /// # Errors
    ///
    /// See [`decode_body`](Self::decode_body).
    pub fn next_command(&mut self) -> Result<Option<Command>, ProtocolError> {
        match self.read_opcode()? {
            Some(opcode) => self.decode_body(opcode).map(Some),
            None => Ok(None),
        }
    }

    /// Appends exactly `count` bytes to the payload buffer.  `needed` is the
    /// payload length reported if the input runs out.
    fn read_payload(&mut self, opcode: u8, count: usize, needed: usize) -> Result<(), ProtocolError> {
        let start = self.payload.len();
        self.payload.resize(start + count, 0);
        match ByteSource::fill(&mut self.source, &mut self.payload[start..])? {
            Fill::Complete => {
                self.offset += count as u64;
                Ok(())
            }
            Fill::Partial(got) => {
                self.offset += got as u64;
                Err(ProtocolError::TruncatedStream {
                    opcode,
                    needed,
                    available: start + got,
                })
            }
        }
    }
}

impl<S: ByteSource> Iterator for CommandDecoder<S> {
    type Item = Result<Command, ProtocolError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_command().transpose()
    }
}

// ── Encoder ───────────────────────────────────────────────────────────────────

/// Encodes one [`Command`] into its wire bytes, opcode included.
///
/// # Errors
///
/// Returns [`ProtocolError::TextTooLong`] if a `RenderText` text is longer
/// than [`MAX_TEXT_LEN`].
///
/// # Examples
///
/// ```rust
/// use gridcast_core::protocol::{encode_command, Command, MoveCursor};
///
/// let bytes = encode_command(&Command::MoveCursor(MoveCursor { x: 3, y: 1 })).unwrap();
/// assert_eq!(bytes, vec![0x05, 3, 1]);
/// ```
pub fn encode_command(command: &Command) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    encode_into(&mut buf, command)?;
    Ok(buf)
}

/// Encodes a sequence of commands back to back.
///
/// No terminator is appended; include [`Command::Terminator`] explicitly.
///
/// # Errors
///
/// See [`encode_command`].
pub fn encode_stream(commands: &[Command]) -> Result<Vec<u8>, ProtocolError> {
    let mut buf = Vec::new();
    for command in commands {
        encode_into(&mut buf, command)?;
    }
    Ok(buf)
}

/// Appends the wire bytes of `command` to `buf`.  On error `buf` is left
/// unchanged.
///
/// # Errors
///
/// See [`encode_command`].
pub fn encode_into(buf: &mut Vec<u8>, command: &Command) -> Result<(), ProtocolError> {
    if let Command::RenderText(m) = command {
        if m.text.len() > MAX_TEXT_LEN {
            return Err(ProtocolError::TextTooLong(m.text.len()));
        }
    }

    buf.push(command.opcode() as u8);
    match command {
        Command::ScreenSetup(m) => buf.extend_from_slice(&[m.width, m.height, m.color_mode]),
        Command::DrawCharacter(m) => buf.extend_from_slice(&[m.x, m.y, m.color_index, m.glyph]),
        Command::DrawLine(m) => {
            buf.extend_from_slice(&[m.x1, m.y1, m.x2, m.y2, m.color_index, m.glyph])
        }
        Command::RenderText(m) => {
            buf.extend_from_slice(&[m.x, m.y, m.color_index, m.text.len() as u8]);
            buf.extend_from_slice(&m.text);
        }
        Command::MoveCursor(m) => buf.extend_from_slice(&[m.x, m.y]),
        Command::DrawAtCursor(m) => buf.extend_from_slice(&[m.glyph, m.color_index]),
        Command::ClearScreen | Command::Terminator => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::commands::{
        DrawAtCursor, DrawCharacter, DrawLine, MoveCursor, RenderText, ScreenSetup,
    };

    fn decode_all(bytes: &[u8]) -> Result<Vec<Command>, ProtocolError> {
        CommandDecoder::new(bytes).collect()
    }

    // ── Decoding ──────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_reference_scenario() {
        let bytes: [u8; 10] = [0x01, 0x05, 0x03, 0x02, 0x02, 0x00, 0x00, 0x01, 0x63, 0xFF];

        let commands = decode_all(&bytes).unwrap();

        assert_eq!(
            commands,
            vec![
                Command::ScreenSetup(ScreenSetup {
                    width: 5,
                    height: 3,
                    color_mode: 2
                }),
                Command::DrawCharacter(DrawCharacter {
                    x: 0,
                    y: 0,
                    color_index: 1,
                    glyph: b'c'
                }),
                Command::Terminator,
            ]
        );
    }

    #[test]
    fn test_decode_empty_input_is_clean_end() {
        let empty: &[u8] = &[];
        let mut decoder = CommandDecoder::new(empty);
        assert!(matches!(decoder.next_command(), Ok(None)));
        assert_eq!(decoder.offset(), 0);
    }

    #[test]
    fn test_terminator_is_returned_without_reading_payload() {
        let bytes: &[u8] = &[0xFF, 0x07];
        let mut decoder = CommandDecoder::new(bytes);
        assert_eq!(decoder.next_command().unwrap(), Some(Command::Terminator));
        assert_eq!(decoder.offset(), 1);
        // The byte after the terminator is still in the source.
        assert_eq!(decoder.into_inner(), &[0x07]);
    }

    #[test]
    fn test_opcode_without_payload_is_truncated() {
        let result = decode_all(&[0x02]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedStream {
                opcode: 0x02,
                needed: 4,
                available: 0
            })
        ));
    }

    #[test]
    fn test_partial_payload_reports_available_bytes() {
        let result = decode_all(&[0x03, 1, 2, 3]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedStream {
                opcode: 0x03,
                needed: 6,
                available: 3
            })
        ));
    }

    #[test]
    fn test_unknown_opcode_is_rejected() {
        let result = decode_all(&[0x09, 0, 0]);
        assert!(matches!(result, Err(ProtocolError::UnknownOpcode(0x09))));
    }

    #[test]
    fn test_render_text_reads_length_prefixed_blob() {
        let bytes = [0x04, 1, 2, 3, 4, b't', b'e', b'x', b't', 0x07];
        let mut decoder = CommandDecoder::new(&bytes[..]);

        assert_eq!(
            decoder.next_command().unwrap(),
            Some(Command::RenderText(RenderText {
                x: 1,
                y: 2,
                color_index: 3,
                text: b"text".to_vec()
            }))
        );
        // Framing stays aligned: the next opcode is read correctly.
        assert_eq!(decoder.next_command().unwrap(), Some(Command::ClearScreen));
    }

    #[test]
    fn test_render_text_with_zero_length_has_empty_text() {
        let commands = decode_all(&[0x04, 0, 0, 0, 0]).unwrap();
        assert!(matches!(&commands[0], Command::RenderText(m) if m.text.is_empty()));
    }

    #[test]
    fn test_render_text_missing_length_byte_is_truncated() {
        let result = decode_all(&[0x04, 1, 2, 3]);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedStream {
                opcode: 0x04,
                needed: 4,
                available: 3
            })
        ));
    }

    #[test]
    fn test_render_text_short_blob_is_truncated() {
        let result = decode_all(&[0x04, 0, 0, 0, 5, b'a', b'b']);
        assert!(matches!(
            result,
            Err(ProtocolError::TruncatedStream {
                opcode: 0x04,
                needed: 9,
                available: 6
            })
        ));
    }

    #[test]
    fn test_decoder_counts_offset_and_commands() {
        let bytes: [u8; 8] = [0x01, 5, 3, 2, 0x05, 1, 1, 0x07];
        let mut decoder = CommandDecoder::new(&bytes[..]);
        while decoder.next_command().unwrap().is_some() {}

        assert_eq!(decoder.offset(), bytes.len() as u64);
        assert_eq!(decoder.commands_decoded(), 3);
    }

    #[test]
    fn test_io_error_is_propagated() {
        struct Failing;
        impl io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset"))
            }
        }

        let mut decoder = CommandDecoder::new(Failing);
        assert!(matches!(decoder.next_command(), Err(ProtocolError::Io(_))));
    }

    // ── Encoding ──────────────────────────────────────────────────────────────

    #[test]
    fn test_encode_fixed_commands_in_wire_order() {
        assert_eq!(
            encode_command(&Command::DrawLine(DrawLine {
                x1: 1,
                y1: 2,
                x2: 3,
                y2: 4,
                color_index: 5,
                glyph: b'-'
            }))
            .unwrap(),
            vec![0x03, 1, 2, 3, 4, 5, b'-']
        );
        assert_eq!(
            encode_command(&Command::DrawAtCursor(DrawAtCursor {
                glyph: b'*',
                color_index: 9
            }))
            .unwrap(),
            vec![0x06, b'*', 9]
        );
        assert_eq!(encode_command(&Command::ClearScreen).unwrap(), vec![0x07]);
        assert_eq!(encode_command(&Command::Terminator).unwrap(), vec![0xFF]);
    }

    #[test]
    fn test_encode_render_text_inserts_length_byte() {
        let bytes = encode_command(&Command::RenderText(RenderText {
            x: 0,
            y: 1,
            color_index: 2,
            text: b"hi".to_vec(),
        }))
        .unwrap();
        assert_eq!(bytes, vec![0x04, 0, 1, 2, 2, b'h', b'i']);
    }

    #[test]
    fn test_encode_rejects_oversized_text_and_leaves_buffer_untouched() {
        let mut buf = vec![0xAA];
        let result = encode_into(
            &mut buf,
            &Command::RenderText(RenderText {
                x: 0,
                y: 0,
                color_index: 0,
                text: vec![b'x'; MAX_TEXT_LEN + 1],
            }),
        );

        assert!(matches!(result, Err(ProtocolError::TextTooLong(256))));
        assert_eq!(buf, vec![0xAA]);
    }

    #[test]
    fn test_encoded_stream_decodes_to_same_commands() {
        let commands = vec![
            Command::ScreenSetup(ScreenSetup {
                width: 10,
                height: 4,
                color_mode: 1,
            }),
            Command::MoveCursor(MoveCursor { x: 9, y: 3 }),
            Command::RenderText(RenderText {
                x: 0,
                y: 0,
                color_index: 1,
                text: vec![b'z'; MAX_TEXT_LEN],
            }),
            Command::Terminator,
        ];

        let bytes = encode_stream(&commands).unwrap();

        assert_eq!(decode_all(&bytes).unwrap(), commands);
    }
}
