#![forbid(unsafe_code)]

//! # spinwheel-cli
//!
//! Command-line front end for the `spinwheel` engine. Plans a spin from
//! flags and an optional config file, then either prints the plan or polls
//! the wheel from start to rest.
//!
//! This library backs the `spinwheel` binary so integration tests can drive
//! the same code.
//!
//! ## Public Modules
//!
//! - [`cli`] - Argument parsing
//! - [`settings`] - Config file loading and flag precedence
//! - [`output`] - Text and JSON rendering

pub mod cli;
pub mod output;
pub mod settings;

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use spinwheel::{SpinConfig, SpinEvent, SpinPlan, Wheel};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use output::{Frame, Printer};

/// Installs a stderr `fmt` subscriber.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Runs the command selected on the command line.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, planning fails or
/// output cannot be written.
pub fn run(cli: &Cli) -> Result<()> {
    let config = settings::resolve(cli)?;

    let mut wheel = Wheel::with_policy(config.policy);
    wheel.set_observer(|event: &SpinEvent| tracing::info!(?event, "spin event"));
    wheel.set_angle(config.initial_angle)?;
    let plan = wheel.spin_to(
        config.target_angle,
        config.spins_coefficient,
        config.spin_time,
        &config.proportions,
    )?;

    let mut printer = Printer::new(io::stdout().lock(), cli.format);
    match cli.command() {
        Command::Plan => printer.plan(&plan, wheel.sequence().phases())?,
        Command::Simulate if cli.realtime => realtime(&mut wheel, &plan, &config, &mut printer)?,
        Command::Simulate => simulate(&mut wheel, &plan, &config, &mut printer)?,
    }
    printer.flush()?;
    Ok(())
}

/// Polls on a fixed simulated clock until the wheel comes to rest.
fn simulate<W: io::Write>(
    wheel: &mut Wheel,
    plan: &SpinPlan,
    config: &SpinConfig,
    printer: &mut Printer<W>,
) -> Result<()> {
    let interval = config.poll_interval();
    let mut tick: u32 = 0;
    loop {
        let elapsed = f64::from(tick) * interval;
        let frame = Frame::new(elapsed, wheel.poll(elapsed), config.sectors);
        printer.frame(&frame)?;
        if frame.state.finished {
            printer.summary(plan, &frame)?;
            return Ok(());
        }
        tick = tick.saturating_add(1);
    }
}

/// Polls against the wall clock, sleeping between frames.
fn realtime<W: io::Write>(
    wheel: &mut Wheel,
    plan: &SpinPlan,
    config: &SpinConfig,
    printer: &mut Printer<W>,
) -> Result<()> {
    let interval = Duration::from_secs_f64(config.poll_interval());
    let started = Instant::now();
    loop {
        let elapsed = started.elapsed().as_secs_f64();
        let frame = Frame::new(elapsed, wheel.poll(elapsed), config.sectors);
        printer.frame(&frame)?;
        printer.flush()?;
        if frame.state.finished {
            printer.summary(plan, &frame)?;
            return Ok(());
        }
        thread::sleep(interval);
    }
}
