//! Concrete [`FrameRenderer`](crate::application::play_stream::FrameRenderer)
//! implementations.
//!
//! Both renderers write to any `std::io::Write`; the binary hands them a
//! buffered stdout.

pub mod json;
pub mod text;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use json::JsonRenderer;
pub use text::TextRenderer;

/// Output format selected by config or `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderFormat {
    /// One line of raw bytes per screen row.
    Text,
    /// One JSON snapshot document per frame.
    Json,
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RenderFormat::Text => "text",
            RenderFormat::Json => "json",
        })
    }
}

impl FromStr for RenderFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(RenderFormat::Text),
            "json" => Ok(RenderFormat::Json),
            other => Err(format!("unknown render format '{other}' (expected 'text' or 'json')")),
        }
    }
}
