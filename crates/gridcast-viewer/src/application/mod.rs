//! Application layer use cases for the viewer.
//!
//! - **`play_stream`** – Runs one command stream to completion and hands
//!   frames to a [`FrameRenderer`](play_stream::FrameRenderer) according to
//!   the configured refresh policy.  The renderer is injected at
//!   construction time so tests can substitute a mock.

pub mod play_stream;
