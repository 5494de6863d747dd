//! A single constant-acceleration segment of a spin.
//!
//! A [`Phase`] covers the half-open time window `[start_time, end_time)` and
//! ramps linearly from `start_speed` to `end_speed`. Speeds are stored as
//! magnitudes; the sign of motion lives in the phase's [`Direction`].
//!
//! # Example
//!
//! ```rust
//! use spinwheel::{Phase, PhaseKind};
//!
//! let phase = Phase::new(PhaseKind::Acceleration, 2.0)?
//!     .with_speeds(0.0, 90.0);
//!
//! assert_eq!(phase.acceleration(), 45.0);
//! assert_eq!(phase.total_path(), 90.0);
//! assert!(phase.is_active(1.999));
//! assert!(!phase.is_active(2.0));
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use core::fmt;

use crate::error::{Result, SpinError};
use crate::kinematics;

/// The kind of motion a phase describes.
///
/// `Stopped` is a terminal sentinel, not a real motion phase; it is what a
/// sequence reports once its time has run out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PhaseKind {
    /// Speed increases toward the plateau speed.
    Acceleration,
    /// Speed holds constant.
    Linear,
    /// Speed falls to zero.
    Deceleration,
    /// Terminal sentinel returned after the last phase ends.
    Stopped,
}

impl PhaseKind {
    /// The real motion phases, in temporal order.
    pub const MOTION: [PhaseKind; 3] = [Self::Acceleration, Self::Linear, Self::Deceleration];

    /// Returns the temporal rank of a motion phase, or `None` for `Stopped`.
    ///
    /// The rank is spelled out here rather than derived from declaration
    /// order.
    pub const fn order(self) -> Option<u8> {
        match self {
            Self::Acceleration => Some(0),
            Self::Linear => Some(1),
            Self::Deceleration => Some(2),
            Self::Stopped => None,
        }
    }

    /// Returns `true` for the `Stopped` sentinel.
    pub const fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns the lowercase name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Acceleration => "acceleration",
            Self::Linear => "linear",
            Self::Deceleration => "deceleration",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Which way the wheel turns during a phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    /// Angles increase.
    #[default]
    Forward,
    /// Angles decrease.
    Reverse,
}

impl Direction {
    /// Returns `1.0` for forward motion and `-1.0` for reverse.
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Forward => 1.0,
            Self::Reverse => -1.0,
        }
    }

    /// Returns the direction that covers a signed distance.
    ///
    /// Zero counts as forward.
    #[inline]
    pub fn of(distance: f64) -> Self {
        if distance < 0.0 { Self::Reverse } else { Self::Forward }
    }
}

/// One constant-acceleration segment of a spin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    kind: PhaseKind,
    direction: Direction,
    start_time: f64,
    duration: f64,
    start_speed: f64,
    end_speed: f64,
    acceleration: f64,
    time_coefficient: Option<f64>,
}

impl Phase {
    /// Creates a phase of the given kind and duration starting at time 0,
    /// at rest.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidDuration`] if `duration` is negative or NaN.
    /// Nothing is constructed in that case.
    ///
    /// For [`PhaseKind::Stopped`] the remaining fields are not computed and
    /// the returned phase is the sentinel itself.
    pub fn new(kind: PhaseKind, duration: f64) -> Result<Self> {
        check_duration(duration)?;
        if kind.is_stopped() {
            return Ok(Self::stopped());
        }
        Ok(Self {
            kind,
            direction: Direction::Forward,
            start_time: 0.0,
            duration,
            start_speed: 0.0,
            end_speed: 0.0,
            acceleration: 0.0,
            time_coefficient: None,
        })
    }

    /// Returns the `Stopped` sentinel.
    ///
    /// It carries no timing data and is never active.
    pub const fn stopped() -> Self {
        Self {
            kind: PhaseKind::Stopped,
            direction: Direction::Forward,
            start_time: 0.0,
            duration: 0.0,
            start_speed: 0.0,
            end_speed: 0.0,
            acceleration: 0.0,
            time_coefficient: None,
        }
    }

    /// Sets the boundary speeds and re-derives the acceleration.
    pub fn with_speeds(mut self, start_speed: f64, end_speed: f64) -> Self {
        if self.kind.is_stopped() {
            return self;
        }
        self.start_speed = start_speed;
        self.end_speed = end_speed;
        self.derive_acceleration();
        self
    }

    /// Sets the start time.
    pub fn with_start_time(mut self, start_time: f64) -> Self {
        if !self.kind.is_stopped() {
            self.start_time = start_time;
        }
        self
    }

    /// Sets the direction of motion.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        if !self.kind.is_stopped() {
            self.direction = direction;
        }
        self
    }

    /// Records this phase's share of `total_spin_time`.
    ///
    /// A non-positive total leaves the coefficient unset.
    pub fn with_total_spin_time(mut self, total_spin_time: f64) -> Self {
        if !self.kind.is_stopped() {
            self.time_coefficient =
                (total_spin_time > 0.0).then(|| self.duration / total_spin_time);
        }
        self
    }

    /// Returns the kind of this phase.
    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    /// Returns the direction of motion.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Returns the time at which this phase begins.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Returns the length of this phase in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns `start_time + duration`.
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Returns the speed magnitude at the start of the phase.
    pub fn start_speed(&self) -> f64 {
        self.start_speed
    }

    /// Returns the speed magnitude at the end of the phase.
    pub fn end_speed(&self) -> f64 {
        self.end_speed
    }

    /// Returns the constant rate of change of the speed magnitude.
    pub fn acceleration(&self) -> f64 {
        self.acceleration
    }

    /// Returns the fraction of the total spin time this phase occupies,
    /// if it was built against a total.
    pub fn time_coefficient(&self) -> Option<f64> {
        self.time_coefficient
    }

    /// Returns `true` while `start_time <= t < end_time`.
    ///
    /// The interval is half-open so that exactly one phase of a gap-free
    /// sequence is active at any boundary instant. Zero-length phases and
    /// the sentinel are never active.
    pub fn is_active(&self, t: f64) -> bool {
        !self.kind.is_stopped() && self.start_time <= t && t < self.end_time()
    }

    /// Moves the phase to `new_start_time` and resizes it to
    /// `new_total_time * new_coefficient`, re-deriving the acceleration.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidDuration`] if the new duration is negative.
    /// The phase is left untouched in that case.
    pub fn rescale(
        &mut self,
        new_start_time: f64,
        new_total_time: f64,
        new_coefficient: f64,
    ) -> Result<()> {
        let duration = new_total_time * new_coefficient;
        check_duration(duration)?;
        if self.kind.is_stopped() {
            return Ok(());
        }
        self.start_time = new_start_time;
        self.duration = duration;
        self.time_coefficient = Some(new_coefficient);
        self.derive_acceleration();
        Ok(())
    }

    /// Updates any subset of start speed, duration and end speed, then
    /// re-derives the acceleration.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidDuration`] if `duration` is negative. No
    /// field is changed in that case.
    pub fn update_boundary_speeds(
        &mut self,
        start_speed: Option<f64>,
        duration: Option<f64>,
        end_speed: Option<f64>,
    ) -> Result<()> {
        if let Some(duration) = duration {
            check_duration(duration)?;
        }
        if self.kind.is_stopped() {
            return Ok(());
        }
        if let Some(v) = start_speed {
            self.start_speed = v;
        }
        if let Some(d) = duration {
            self.duration = d;
        }
        if let Some(v) = end_speed {
            self.end_speed = v;
        }
        self.derive_acceleration();
        Ok(())
    }

    /// Returns the signed distance travelled over the whole phase.
    pub fn total_path(&self) -> f64 {
        self.path_at(self.duration)
    }

    /// Returns the signed distance travelled `local_t` seconds into the phase.
    pub fn path_at(&self, local_t: f64) -> f64 {
        let distance = kinematics::displacement(self.start_speed, self.acceleration, local_t);
        self.direction.sign() * distance
    }

    /// Returns the signed speed `local_t` seconds into the phase.
    pub fn speed_at(&self, local_t: f64) -> f64 {
        self.direction.sign() * kinematics::speed(self.start_speed, self.acceleration, local_t)
    }

    /// Returns the wheel angle in `[0, 360)` `local_t` seconds into the
    /// phase, given the angle at which the phase began.
    pub fn angle_at(&self, local_t: f64, start_angle: f64) -> f64 {
        kinematics::normalize_angle(start_angle + self.path_at(local_t))
    }

    pub(crate) fn set_start_time(&mut self, start_time: f64) {
        self.start_time = start_time;
    }

    pub(crate) fn stretch(&mut self, extra: f64) -> Result<()> {
        let duration = self.duration + extra;
        check_duration(duration)?;
        self.duration = duration;
        self.derive_acceleration();
        Ok(())
    }

    fn derive_acceleration(&mut self) {
        self.acceleration =
            kinematics::acceleration_between(self.start_speed, self.duration, self.end_speed);
    }
}

fn check_duration(duration: f64) -> Result<()> {
    if duration >= 0.0 {
        Ok(())
    } else {
        Err(SpinError::InvalidDuration { duration })
    }
}
