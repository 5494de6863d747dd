//! Command-line interface for `spinwheel`.
//!
//! # Examples
//!
//! ```bash
//! # Spin to 90 degrees with the default dial and duration
//! spinwheel --target 90
//!
//! # Print the planned phases as JSON
//! spinwheel --target 90 --duration 10 --format json plan
//!
//! # Poll against the wall clock
//! spinwheel --target 250 --coefficient 7 --realtime
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Spin a wheel so it lands on a chosen angle.
///
/// Values given on the command line override the config file, which
/// overrides the built-in defaults.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "spinwheel",
    author,
    version,
    about = "Plan and poll a wheel spin that lands on a chosen angle"
)]
pub struct Cli {
    /// Path to a TOML or JSON config file
    #[arg(long, short = 'c', env = "SPINWHEEL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Angle to land on, in degrees
    #[arg(long, short = 't', allow_negative_numbers = true)]
    pub target: Option<f64>,

    /// Rotation dial, 1 (fewest turns) to 10 (most)
    #[arg(long, short = 'k', value_parser = clap::value_parser!(u32).range(1..=10))]
    pub coefficient: Option<u32>,

    /// Total spin duration in seconds
    #[arg(long, short = 'd')]
    pub duration: Option<f64>,

    /// Starting angle, in degrees
    #[arg(long, allow_negative_numbers = true)]
    pub initial: Option<f64>,

    /// Share of the duration per phase: acceleration,linear,deceleration
    #[arg(long, value_delimiter = ',')]
    pub proportions: Option<Vec<f64>>,

    /// Number of wheel sectors
    #[arg(long)]
    pub sectors: Option<usize>,

    /// Polls per second
    #[arg(long, short = 'r', value_parser = clap::value_parser!(u32).range(1..))]
    pub rate: Option<u32>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Poll against the wall clock instead of simulated time
    #[arg(long)]
    pub realtime: bool,

    /// Enable verbose logging (repeat for more)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// What to do (defaults to `simulate`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Poll the spin from start to rest, printing each frame
    Simulate,
    /// Print the planned phases without polling
    Plan,
}

/// Output formats.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl Cli {
    /// Create CLI from iterator (useful for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if argument parsing fails.
    pub fn try_parse_from<I, T>(iter: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Returns the subcommand, defaulting to [`Command::Simulate`].
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Simulate)
    }

    /// Get the log filter directive based on verbosity.
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
