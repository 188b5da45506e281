//! Protocol layer: command types, the opcode catalog and the binary codec.
//!
//! - **`commands`** – typed [`Command`] values and their payload structs.
//! - **`catalog`** – the immutable opcode table (payload shape + decoder).
//! - **`source`** – the [`ByteSource`] pull interface the decoder reads from.
//! - **`codec`** – [`CommandDecoder`] and the encoder functions.

pub mod catalog;
pub mod codec;
pub mod commands;
pub mod source;

pub use catalog::{lookup, CommandSpec, PayloadShape, CATALOG};
pub use codec::{encode_command, encode_into, encode_stream, CommandDecoder, ProtocolError};
pub use commands::*;
pub use source::{ByteSource, Fill};
