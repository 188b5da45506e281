//! Session layer: ties the decoder to a screen and enforces stream ordering.

pub mod stream;

pub use stream::{CommandStream, SessionState, Step, StreamError, StreamReport, Violation};
