//! gridcast-viewer entry point.
//!
//! Plays a gridcast command stream from a file or stdin and prints the
//! resulting screen to stdout.  Logs go to stderr so stdout carries only
//! rendered frames.
//!
//! # Usage
//!
//! ```text
//! gridcast-viewer [OPTIONS] [INPUT]
//!
//! Arguments:
//!   [INPUT]  Command stream file; stdin when absent or `-`
//!
//! Options:
//!   --config <PATH>        Config file [default: platform config dir]
//!   --refresh <POLICY>     end-of-stream | each-command
//!   --format <FORMAT>      text | json
//!   --strict               Fail on a stream without a terminator
//!   --no-frame-separator   Omit the `===` line between text frames
//!   --log-level <FILTER>   tracing filter used when RUST_LOG is unset
//!   --emit-demo            Write a sample stream to stdout and exit
//!   --save-config          Write the effective config to the config path and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable             | Flag            |
//! |----------------------|-----------------|
//! | `GRIDCAST_CONFIG`    | `--config`      |
//! | `GRIDCAST_REFRESH`   | `--refresh`     |
//! | `GRIDCAST_FORMAT`    | `--format`      |
//! | `GRIDCAST_STRICT`    | `--strict`      |
//! | `GRIDCAST_LOG`       | `--log-level`   |
//!
//! CLI args take precedence over environment variables, which take
//! precedence over the config file.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use gridcast_viewer::application::play_stream::{
    FrameRenderer, PlayStreamUseCase, PlaybackError, RefreshPolicy,
};
use gridcast_viewer::infrastructure::demo::demo_stream;
use gridcast_viewer::infrastructure::renderer::{JsonRenderer, RenderFormat, TextRenderer};
use gridcast_viewer::infrastructure::storage::{
    config_file_path, load_config_from, read_config_file, save_config_to, ConfigError,
    ViewerConfig,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// gridcast stream viewer.
#[derive(Debug, Parser)]
#[command(
    name = "gridcast-viewer",
    about = "Plays a gridcast command stream and renders the resulting screen",
    version
)]
struct Cli {
    /// Command stream to play.  Reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Config file to use instead of the platform default.  Must exist unless
    /// `--save-config` is creating it.
    #[arg(long, env = "GRIDCAST_CONFIG")]
    config: Option<PathBuf>,

    /// When to paint frames: `end-of-stream` or `each-command`.
    #[arg(long, env = "GRIDCAST_REFRESH")]
    refresh: Option<RefreshPolicy>,

    /// Output format: `text` or `json`.
    #[arg(long, env = "GRIDCAST_FORMAT")]
    format: Option<RenderFormat>,

    /// Treat a stream that ends without the 0xFF terminator as an error.
    #[arg(
        long,
        env = "GRIDCAST_STRICT",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    strict: bool,

    /// Do not separate consecutive text frames.
    #[arg(long)]
    no_frame_separator: bool,

    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[arg(long, env = "GRIDCAST_LOG")]
    log_level: Option<String>,

    /// Write the built-in demo stream to stdout instead of playing one.
    #[arg(long, conflicts_with = "input")]
    emit_demo: bool,

    /// Write the effective configuration to the config path and exit.
    #[arg(long, conflicts_with = "emit_demo")]
    save_config: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration.
    fn merge_into(&self, mut config: ViewerConfig) -> ViewerConfig {
        if let Some(refresh) = self.refresh {
            config.playback.refresh = refresh;
        }
        if let Some(format) = self.format {
            config.render.format = format;
        }
        if self.strict {
            config.playback.allow_unterminated = false;
        }
        if self.no_frame_separator {
            config.render.frame_separator = false;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        config
    }

    /// Path the config is read from and `--save-config` writes to.
    fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path(),
        }
    }

    /// `None` means stdin.
    fn input_path(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

/// Loads the file layer of the configuration.
///
/// `default_path` is where the config lives when `--config` is not given.
fn load_file_config(
    cli: &Cli,
    default_path: Result<PathBuf, ConfigError>,
) -> anyhow::Result<ViewerConfig> {
    match (&cli.config, default_path) {
        // `--save-config` may be about to create the explicit file.
        (Some(path), _) if cli.save_config => load_config_from(path)
            .with_context(|| format!("failed to load config file {}", path.display())),
        (Some(path), _) => read_config_file(path)
            .with_context(|| format!("failed to load config file {}", path.display())),
        (None, Ok(path)) => load_config_from(&path).context("failed to load viewer config"),
        (None, Err(ConfigError::NoPlatformConfigDir)) => Ok(ViewerConfig::default()),
        (None, Err(e)) => Err(e).context("failed to load viewer config"),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.merge_into(load_file_config(&cli, config_file_path())?);

    // Initialise structured logging on stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.save_config {
        let path = cli.config_path().context("no config path available")?;
        save_config_to(&path, &config)
            .with_context(|| format!("failed to save config to {}", path.display()))?;
        info!("config written to {}", path.display());
        return Ok(());
    }

    let mut stdout = BufWriter::new(io::stdout().lock());

    if cli.emit_demo {
        let bytes = demo_stream().context("failed to encode demo stream")?;
        stdout.write_all(&bytes).context("failed to write demo stream")?;
        stdout.flush().context("failed to write demo stream")?;
        return Ok(());
    }

    let renderer: Box<dyn FrameRenderer> = match config.render.format {
        RenderFormat::Text => Box::new(TextRenderer::new(stdout, config.render.frame_separator)),
        RenderFormat::Json => Box::new(JsonRenderer::new(stdout)),
    };
    let mut use_case = PlayStreamUseCase::new(renderer, config.playback_options());

    let result = match cli.input_path() {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            info!("playing {}", path.display());
            use_case.play(BufReader::new(file))
        }
        None => {
            info!("playing stdin");
            use_case.play(io::stdin().lock())
        }
    };

    match result {
        Ok(summary) => {
            info!(
                commands = summary.commands_applied,
                bytes = summary.bytes_consumed,
                frames = summary.frames_rendered,
                "done"
            );
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            let context = match &e {
                PlaybackError::Stream { .. } => "command stream rejected",
                PlaybackError::Render(_) => "failed to render output",
            };
            Err(e).context(context)
        }
    }
}
