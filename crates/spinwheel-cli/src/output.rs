//! Rendering frames and plans to a writer.

use std::io::{self, Write};

use serde::Serialize;
use spinwheel::kinematics::angle_to_sector;
use spinwheel::{Phase, SpinPlan, WheelState};

use crate::cli::OutputFormat;

/// One polled frame.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Frame {
    /// Elapsed seconds since the spin started.
    pub elapsed: f64,
    /// Wheel state at `elapsed`.
    #[serde(flatten)]
    pub state: WheelState,
    /// One-based sector under the pointer.
    pub sector: Option<usize>,
}

impl Frame {
    /// Builds a frame, resolving the sector for `sectors` sectors.
    pub fn new(elapsed: f64, state: WheelState, sectors: usize) -> Self {
        Self {
            elapsed,
            state,
            sector: angle_to_sector(state.angle, sectors).map(|s| s + 1),
        }
    }
}

#[derive(Serialize)]
struct PlanReport<'a> {
    #[serde(flatten)]
    plan: &'a SpinPlan,
    phases: &'a [Phase],
}

/// Writes frames and plans in the chosen format.
pub struct Printer<W> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> Printer<W> {
    /// Creates a printer writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Writes one frame.
    ///
    /// # Errors
    ///
    /// Returns any I/O or serialization error.
    pub fn frame(&mut self, frame: &Frame) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.json_line(frame),
            OutputFormat::Text => {
                let sector = frame
                    .sector
                    .map_or_else(|| "-".to_owned(), |s| s.to_string());
                writeln!(
                    self.out,
                    "t={:>7.3}s  angle={:>7.2}  speed={:>8.2}  phase={:<12}  sector={sector}",
                    frame.elapsed, frame.state.angle, frame.state.speed, frame.state.phase
                )
            }
        }
    }

    /// Writes the closing line of a simulation.
    ///
    /// # Errors
    ///
    /// Returns any I/O error.
    pub fn summary(&mut self, plan: &SpinPlan, last: &Frame) -> io::Result<()> {
        if self.format == OutputFormat::Json {
            return Ok(());
        }
        let sector = last
            .sector
            .map_or_else(String::new, |s| format!(" (sector {s})"));
        writeln!(
            self.out,
            "landed at {:.2} deg{sector} after {} full turns, {:.2} deg travelled",
            last.state.angle, plan.spins_amount, plan.total_path
        )
    }

    /// Writes a plan and its phases.
    ///
    /// # Errors
    ///
    /// Returns any I/O or serialization error.
    pub fn plan(&mut self, plan: &SpinPlan, phases: &[Phase]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.json_line(&PlanReport { plan, phases }),
            OutputFormat::Text => {
                writeln!(
                    self.out,
                    "spins={}  path={:.2}  direction={:?}  linear_speed={:.3}",
                    plan.spins_amount, plan.total_path, plan.direction, plan.speeds.linear_speed
                )?;
                for phase in phases {
                    writeln!(
                        self.out,
                        concat!(
                            "{:<12}  start={:>7.3}s  duration={:>7.3}s  ",
                            "speed {:>8.3} -> {:>8.3}  accel={:>9.3}"
                        ),
                        phase.kind(),
                        phase.start_time(),
                        phase.duration(),
                        phase.start_speed(),
                        phase.end_speed(),
                        phase.acceleration()
                    )?;
                }
                Ok(())
            }
        }
    }

    /// Flushes the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns any I/O error.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn json_line<T: Serialize>(&mut self, value: &T) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value)?;
        writeln!(self.out)
    }
}
