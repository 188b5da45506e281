//! PlayStreamUseCase: plays one command stream and paints it through a renderer.
//!
//! This use case sits at the application layer and delegates painting to a
//! [`FrameRenderer`].  The concrete renderers (plain text, JSON) live in the
//! infrastructure layer.

use std::fmt;
use std::str::FromStr;

use gridcast_core::{ByteSource, CommandStream, ScreenBuffer, SessionState, Step, StreamError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Error type for renderer operations.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write frame: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode frame as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error type for a playback run.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The stream failed fatally.  Nothing further was rendered.
    #[error("stream failed after {commands_applied} commands: {source}")]
    Stream {
        commands_applied: u64,
        #[source]
        source: StreamError,
    },

    #[error("renderer failed: {0}")]
    Render(#[from] RenderError),
}

/// Paints a screen to some output surface.
///
/// The renderer only ever sees the screen read-only, between commands.
#[cfg_attr(test, mockall::automock)]
pub trait FrameRenderer {
    /// Paints one frame.
    fn render(&mut self, screen: &ScreenBuffer) -> Result<(), RenderError>;

    /// Called once after the last frame.
    fn finish(&mut self) -> Result<(), RenderError>;
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for Box<R> {
    fn render(&mut self, screen: &ScreenBuffer) -> Result<(), RenderError> {
        (**self).render(screen)
    }

    fn finish(&mut self) -> Result<(), RenderError> {
        (**self).finish()
    }
}

/// When frames are painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefreshPolicy {
    /// Once, after the stream ends.
    EndOfStream,
    /// After every applied command, the opening `ScreenSetup` included.
    EachCommand,
}

impl fmt::Display for RefreshPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefreshPolicy::EndOfStream => "end-of-stream",
            RefreshPolicy::EachCommand => "each-command",
        })
    }
}

impl FromStr for RefreshPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end-of-stream" => Ok(RefreshPolicy::EndOfStream),
            "each-command" => Ok(RefreshPolicy::EachCommand),
            other => Err(format!(
                "unknown refresh policy '{other}' (expected 'end-of-stream' or 'each-command')"
            )),
        }
    }
}

/// Knobs for one playback run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackOptions {
    pub refresh: RefreshPolicy,
    /// Treat a missing terminator as a warning instead of a failure.
    pub allow_unterminated: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            refresh: RefreshPolicy::EndOfStream,
            allow_unterminated: true,
        }
    }
}

/// What a successful run did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSummary {
    pub commands_applied: u64,
    pub bytes_consumed: u64,
    pub frames_rendered: u64,
    /// `Terminated`, or `Unterminated` when that was tolerated.
    pub final_state: SessionState,
}

/// The Play Stream use case.
pub struct PlayStreamUseCase<R> {
    renderer: R,
    options: PlaybackOptions,
}

impl<R: FrameRenderer> PlayStreamUseCase<R> {
    pub fn new(renderer: R, options: PlaybackOptions) -> Self {
        Self { renderer, options }
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Plays `source` to the end and renders it according to the options.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::Stream`] for any fatal stream error, or for a
    ///   missing terminator when `allow_unterminated` is off.
    /// - [`PlaybackError::Render`] if the renderer fails.
    pub fn play<S: ByteSource>(&mut self, source: S) -> Result<PlaybackSummary, PlaybackError> {
        let mut stream = CommandStream::new(source);
        let mut frames = 0u64;
        info!(refresh = %self.options.refresh, "playback started");

        let outcome = loop {
            match stream.step() {
                Ok(Step::Applied(command)) => {
                    if self.options.refresh == RefreshPolicy::EachCommand {
                        if let Some(screen) = stream.screen() {
                            debug!(opcode = ?command.opcode(), frame = frames, "rendering frame");
                            self.renderer.render(screen)?;
                            frames += 1;
                        }
                    }
                }
                Ok(Step::Finished) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        match outcome {
            Ok(()) => {}
            Err(e) if e.is_recoverable() && self.options.allow_unterminated => {
                warn!(
                    commands = stream.commands_applied(),
                    "stream ended without a terminator; rendering what was drawn"
                );
            }
            Err(source) => {
                return Err(PlaybackError::Stream {
                    commands_applied: stream.commands_applied(),
                    source,
                });
            }
        }

        if self.options.refresh == RefreshPolicy::EndOfStream {
            if let Some(screen) = stream.screen() {
                self.renderer.render(screen)?;
                frames += 1;
            }
        }
        self.renderer.finish()?;

        let report = stream.report();
        info!(
            commands = report.commands_applied,
            bytes = report.bytes_consumed,
            frames,
            "playback finished"
        );
        Ok(PlaybackSummary {
            commands_applied: report.commands_applied,
            bytes_consumed: report.bytes_consumed,
            frames_rendered: frames,
            final_state: report.state,
        })
    }
}
