//! Command stream session: drives the decoder and applies every command to
//! the screen it owns.
//!
//! A session moves through these states:
//!
//! ```text
//! Unstarted ──start()──▶ AwaitingSetup ──ScreenSetup──▶ Running
//!                                │                         │
//!                                ▼                         ├──0xFF──────────▶ Terminated
//!                             Errored ◀──any error─────────┤
//!                                                          └──end of input──▶ Unterminated
//! ```
//!
//! Terminal states are final: once a session is `Terminated`, `Unterminated`
//! or `Errored`, [`CommandStream::step`] returns [`Step::Finished`] without
//! touching the source again.

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::screen::{Cell, Position, ScreenBuffer, ScreenError};
use crate::protocol::codec::{CommandDecoder, ProtocolError};
use crate::protocol::commands::{Command, Opcode, ScreenSetup};
use crate::protocol::source::ByteSource;

// ── State & errors ────────────────────────────────────────────────────────────

/// Lifecycle of a [`CommandStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing read yet.
    Unstarted,
    /// Reading the opening `ScreenSetup`.
    AwaitingSetup,
    /// Screen exists; commands are being applied.
    Running,
    /// A terminator was read.
    Terminated,
    /// Input ended without a terminator.  The screen is still usable.
    Unterminated,
    /// A fatal error stopped the session.
    Errored,
}

impl SessionState {
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            SessionState::Terminated | SessionState::Unterminated | SessionState::Errored
        )
    }
}

/// Ordering rules a stream can break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Violation {
    /// The first opcode was not `ScreenSetup`.  `found` is `None` for an
    /// empty stream.
    #[error("stream must open with ScreenSetup (0x01), found {}", describe_opcode(.found))]
    MissingSetup { found: Option<u8> },

    /// A second `ScreenSetup` arrived after the screen was created.
    #[error("ScreenSetup may only appear once per stream")]
    RepeatedSetup,
}

fn describe_opcode(opcode: &Option<u8>) -> String {
    match *opcode {
        Some(byte) => format!("0x{byte:02X}"),
        None => "end of input".to_string(),
    }
}

/// Errors that end a stream session.
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("protocol violation: {0}")]
    ProtocolViolation(#[from] Violation),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Screen(#[from] ScreenError),

    /// Input ended before a terminator.  The screen built so far stays
    /// accessible through [`CommandStream::screen`].
    #[error("stream ended after {commands_applied} commands without a terminator")]
    UnterminatedStream { commands_applied: u64 },
}

impl StreamError {
    /// Returns `true` when the screen is still meaningful after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, StreamError::UnterminatedStream { .. })
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// Outcome of a single [`CommandStream::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// This command was decoded and applied.
    Applied(Command),
    /// The session is in a terminal state.
    Finished,
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamReport {
    pub commands_applied: u64,
    pub bytes_consumed: u64,
    pub state: SessionState,
}

/// One decoding session over one byte source.
///
/// The session exclusively owns the [`ScreenBuffer`]; callers borrow it
/// read-only through [`screen`](Self::screen) between steps.
///
/// # Examples
///
/// ```rust
/// use gridcast_core::{CommandStream, SessionState};
///
/// let bytes: &[u8] = &[0x01, 0x05, 0x03, 0x02, 0x02, 0x00, 0x00, 0x01, 0x63, 0xFF];
/// let mut stream = CommandStream::new(bytes);
/// let report = stream.run().unwrap();
///
/// assert_eq!(report.state, SessionState::Terminated);
/// let screen = stream.screen().unwrap();
/// assert_eq!(screen.cell(0, 0).unwrap().glyph, b'c');
/// ```
#[derive(Debug)]
pub struct CommandStream<S> {
    decoder: CommandDecoder<S>,
    screen: Option<ScreenBuffer>,
    state: SessionState,
    applied: u64,
}

impl<S: ByteSource> CommandStream<S> {
    pub fn new(source: S) -> Self {
        Self {
            decoder: CommandDecoder::new(source),
            screen: None,
            state: SessionState::Unstarted,
            applied: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The screen, once `ScreenSetup` has been applied.
    pub fn screen(&self) -> Option<&ScreenBuffer> {
        self.screen.as_ref()
    }

    pub fn into_screen(self) -> Option<ScreenBuffer> {
        self.screen
    }

    /// Commands applied so far, the opening `ScreenSetup` included.
    pub fn commands_applied(&self) -> u64 {
        self.applied
    }

    pub fn bytes_consumed(&self) -> u64 {
        self.decoder.offset()
    }

    pub fn report(&self) -> StreamReport {
        StreamReport {
            commands_applied: self.applied,
            bytes_consumed: self.decoder.offset(),
            state: self.state,
        }
    }

    /// Reads the opening `ScreenSetup` and creates the screen.
    ///
    /// Does nothing if the session has already started.
    ///
    /// # Errors
    ///
    /// - [`StreamError::ProtocolViolation`] if the first opcode is anything
    ///   other than `0x01`, including an empty stream.  No screen is created.
    /// - [`StreamError::Protocol`] if the setup payload cannot be read.
    /// - [`StreamError::Screen`] if a dimension is zero.
    pub fn start(&mut self) -> Result<(), StreamError> {
        if self.state == SessionState::Unstarted {
            self.open().map(|_| ())
        } else {
            Ok(())
        }
    }

    /// Decodes and applies one command, starting the session first if needed.
    ///
    /// # Errors
    ///
    /// Any decode or apply error moves the session to `Errored` and is
    /// returned.  End of input without a terminator moves it to
    /// `Unterminated` and returns [`StreamError::UnterminatedStream`].
    pub fn step(&mut self) -> Result<Step, StreamError> {
        if self.state.is_finished() {
            return Ok(Step::Finished);
        }
        match self.state {
            SessionState::Unstarted => {
                let setup = self.open()?;
                Ok(Step::Applied(Command::ScreenSetup(setup)))
            }
            SessionState::Running => self.advance(),
            // `open` leaves this state before returning.
            _ => Ok(Step::Finished),
        }
    }

    /// Runs the session to completion.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn run(&mut self) -> Result<StreamReport, StreamError> {
        self.run_with(|_, _| {})
    }

    /// Runs the session to completion, calling `observer` after every applied
    /// command with the command and the updated screen.
    ///
    /// # Errors
    ///
    /// See [`step`](Self::step).
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<StreamReport, StreamError>
    where
        F: FnMut(&Command, &ScreenBuffer),
    {
        loop {
            match self.step()? {
                Step::Applied(command) => {
                    if let Some(screen) = &self.screen {
                        observer(&command, screen);
                    }
                }
                Step::Finished => return Ok(self.report()),
            }
        }
    }

    fn open(&mut self) -> Result<ScreenSetup, StreamError> {
        self.state = SessionState::AwaitingSetup;

        let opcode = match self.decoder.read_opcode() {
            Ok(opcode) => opcode,
            Err(e) => return self.fail(e),
        };
        if opcode != Some(Opcode::ScreenSetup as u8) {
            return self.fail(Violation::MissingSetup { found: opcode });
        }

        let setup = match self.decoder.decode_body(Opcode::ScreenSetup as u8) {
            Ok(Command::ScreenSetup(setup)) => setup,
            Ok(other) => {
                return self.fail(Violation::MissingSetup {
                    found: Some(other.opcode() as u8),
                })
            }
            Err(e) => return self.fail(e),
        };

        let screen = match ScreenBuffer::new(
            usize::from(setup.width),
            usize::from(setup.height),
            setup.color_mode,
        ) {
            Ok(screen) => screen,
            Err(e) => return self.fail(e),
        };

        info!(
            width = setup.width,
            height = setup.height,
            color_mode = setup.color_mode,
            "screen created"
        );
        self.screen = Some(screen);
        self.applied = 1;
        self.state = SessionState::Running;
        Ok(setup)
    }

    fn advance(&mut self) -> Result<Step, StreamError> {
        let command = match self.decoder.next_command() {
            Ok(Some(command)) => command,
            Ok(None) => {
                self.state = SessionState::Unterminated;
                debug!(
                    offset = self.decoder.offset(),
                    "input ended without a terminator"
                );
                return Err(StreamError::UnterminatedStream {
                    commands_applied: self.applied,
                });
            }
            Err(e) => return self.fail(e),
        };

        match command {
            Command::Terminator => {
                self.state = SessionState::Terminated;
                info!(
                    commands = self.applied,
                    bytes = self.decoder.offset(),
                    "stream terminated"
                );
                return Ok(Step::Finished);
            }
            Command::ScreenSetup(_) => return self.fail(Violation::RepeatedSetup),
            _ => {}
        }

        let Some(screen) = self.screen.as_mut() else {
            return Ok(Step::Finished);
        };
        match apply(screen, &command) {
            Ok(()) => {
                self.applied += 1;
                Ok(Step::Applied(command))
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail<T>(&mut self, error: impl Into<StreamError>) -> Result<T, StreamError> {
        self.state = SessionState::Errored;
        let error = error.into();
        debug!(offset = self.decoder.offset(), %error, "stream session failed");
        Err(error)
    }
}

/// Maps one decoded command onto the matching screen mutation.
fn apply(screen: &mut ScreenBuffer, command: &Command) -> Result<(), ScreenError> {
    match command {
        Command::DrawCharacter(m) => screen.set_cell(
            usize::from(m.x),
            usize::from(m.y),
            Cell::new(m.glyph, m.color_index),
        ),
        Command::DrawLine(m) => screen.draw_line(
            Position::new(usize::from(m.x1), usize::from(m.y1)),
            Position::new(usize::from(m.x2), usize::from(m.y2)),
            Cell::new(m.glyph, m.color_index),
        ),
        Command::RenderText(m) => {
            screen.render_text(usize::from(m.x), usize::from(m.y), &m.text, m.color_index)
        }
        Command::MoveCursor(m) => screen.move_cursor(usize::from(m.x), usize::from(m.y)),
        Command::DrawAtCursor(m) => screen.draw_at_cursor(Cell::new(m.glyph, m.color_index)),
        Command::ClearScreen => {
            screen.clear();
            Ok(())
        }
        Command::ScreenSetup(_) | Command::Terminator => Ok(()),
    }
}
