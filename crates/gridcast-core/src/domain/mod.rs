//! Domain layer: the screen model that decoded commands mutate.
//!
//! Nothing in here knows about opcodes or byte streams.  The protocol layer
//! translates wire fields into calls on [`screen::ScreenBuffer`].
//!
//! - **`screen`** – the bounds-checked character grid and cursor.
//! - **`snapshot`** – a detached, serialisable copy for renderers.

pub mod screen;
pub mod snapshot;

pub use screen::{Cell, Position, ScreenBuffer, ScreenError, BLANK};
pub use snapshot::Snapshot;
