//! gridcast-viewer library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the viewer do?
//!
//! The viewer is the consumer end of a gridcast stream:
//!
//! 1. Reads a byte stream from a file or stdin.
//! 2. Feeds it to a [`gridcast_core::CommandStream`], which builds the screen.
//! 3. Paints the screen through a [`FrameRenderer`](application::play_stream::FrameRenderer),
//!    either after every command or once at the end, as plain text rows or
//!    JSON snapshots.

/// Application layer: the playback use case and its renderer seam.
pub mod application;

/// Infrastructure layer: concrete renderers, config storage and the demo stream.
pub mod infrastructure;
