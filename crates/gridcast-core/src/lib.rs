//! # gridcast-core
//!
//! Decoder and screen model for the gridcast remote-terminal graphics
//! protocol.  A producer emits a byte stream of one-byte opcodes with small
//! fixed payloads; this crate frames that stream into typed commands and
//! applies them, in order, to an in-memory character grid.
//!
//! The crate performs no process I/O of its own.  Input arrives through the
//! [`ByteSource`] trait (implemented for every [`std::io::Read`]) and output
//! is a read-only [`Snapshot`] of the grid that a renderer can paint however
//! it likes.
//!
//! # Architecture overview
//!
//! - **`domain`** – The [`ScreenBuffer`]: a bounds-checked `width × height`
//!   grid of cells plus a cursor.  It knows nothing about opcodes.
//!
//! - **`protocol`** – How bytes become commands.  The opcode catalog says how
//!   long each payload is; the [`CommandDecoder`] reads exactly that many
//!   bytes and hands back a [`Command`].  The encoder goes the other way.
//!
//! - **`session`** – The [`CommandStream`]: checks that the stream opens with
//!   `ScreenSetup`, creates the screen, then applies every following command
//!   until the `0xFF` terminator.
//!
//! # Example
//!
//! ```rust
//! use gridcast_core::{Cell, CommandStream};
//!
//! // 5x3 screen, draw 'c' at (0, 0) in color 1, terminate.
//! let bytes: &[u8] = &[0x01, 5, 3, 2, 0x02, 0, 0, 1, b'c', 0xFF];
//!
//! let mut stream = CommandStream::new(bytes);
//! stream.run().unwrap();
//!
//! let screen = stream.screen().unwrap();
//! assert_eq!(screen.cell(0, 0), Some(Cell::new(b'c', 1)));
//! ```

pub mod domain;
pub mod protocol;
pub mod session;

// Re-export the most-used types at the crate root so callers can write
// `gridcast_core::ScreenBuffer` instead of `gridcast_core::domain::screen::ScreenBuffer`.
pub use domain::screen::{Cell, Position, ScreenBuffer, ScreenError, BLANK};
pub use domain::snapshot::Snapshot;
pub use protocol::catalog::{lookup, CommandSpec, PayloadShape, CATALOG};
pub use protocol::codec::{encode_command, encode_stream, CommandDecoder, ProtocolError};
pub use protocol::commands::{Command, Opcode, MAX_TEXT_LEN, TERMINATOR};
pub use protocol::source::ByteSource;
pub use session::stream::{
    CommandStream, SessionState, Step, StreamError, StreamReport, Violation,
};
