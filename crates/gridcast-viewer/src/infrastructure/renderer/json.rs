//! JSON renderer: one [`Snapshot`] document per frame, newline-delimited.

use std::io::Write;

use gridcast_core::{ScreenBuffer, Snapshot};

use crate::application::play_stream::{FrameRenderer, RenderError};

pub struct JsonRenderer<W: Write> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> FrameRenderer for JsonRenderer<W> {
    fn render(&mut self, screen: &ScreenBuffer) -> Result<(), RenderError> {
        serde_json::to_writer(&mut self.out, &Snapshot::capture(screen))?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        self.out.flush()?;
        Ok(())
    }
}
