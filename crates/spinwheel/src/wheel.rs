//! Poll-driven wheel driver.
//!
//! [`Wheel`] ties the planner and a [`PhaseSequence`] together. A front
//! end starts a spin, then polls with the elapsed time since the start;
//! every poll recomputes angle and speed from the active phase's boundary
//! values, so nothing drifts across polls.
//!
//! # Example
//!
//! ```rust
//! use spinwheel::{PhaseKind, PhaseProportions, SpinRequest, Wheel};
//!
//! let mut wheel = Wheel::new();
//! wheel.start(SpinRequest::new(90.0, 1, 10.0, 0.0), &PhaseProportions::default())?;
//!
//! let mid = wheel.poll(5.0);
//! assert_eq!(mid.phase, PhaseKind::Linear);
//! assert!(mid.speed > 0.0);
//!
//! let end = wheel.poll(10.0);
//! assert!(end.finished);
//! assert!((end.angle - 90.0).abs() < 1e-6);
//! assert_eq!(end.speed, 0.0);
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use tracing::debug;

use crate::config::PhaseProportions;
use crate::error::{Result, SpinError};
use crate::kinematics::{self, FULL_TURN};
use crate::phase::{Phase, PhaseKind};
use crate::planner::{SpinPlan, SpinPlanner, SpinPolicy, SpinRequest};
use crate::sequence::{PhaseSequence, RescaleReport};
use crate::trace::SpinObserver;

/// What a front end needs to draw one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WheelState {
    /// Current angle in `[0, 360)`.
    pub angle: f64,
    /// Current signed speed in degrees per second.
    pub speed: f64,
    /// Kind of the active phase.
    pub phase: PhaseKind,
    /// `true` once the sequence has reached the `Stopped` sentinel.
    pub finished: bool,
}

/// A wheel that spins to a chosen angle.
#[derive(Debug)]
pub struct Wheel {
    planner: SpinPlanner,
    sequence: PhaseSequence,
    start_angles: Vec<f64>,
    rest_angle: f64,
    initial_angle: f64,
    angle: f64,
    speed: f64,
    phase: PhaseKind,
    plan: Option<SpinPlan>,
    spinning: bool,
}

impl Default for Wheel {
    fn default() -> Self {
        Self {
            planner: SpinPlanner::default(),
            sequence: PhaseSequence::default(),
            start_angles: Vec::new(),
            rest_angle: 0.0,
            initial_angle: 0.0,
            angle: 0.0,
            speed: 0.0,
            phase: PhaseKind::Stopped,
            plan: None,
            spinning: false,
        }
    }
}

impl Wheel {
    /// Creates a wheel at angle 0 with the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a wheel with a custom dial-to-rotations policy.
    pub fn with_policy(policy: SpinPolicy) -> Self {
        Self {
            planner: SpinPlanner::new(policy),
            ..Self::default()
        }
    }

    /// Installs an observer on the underlying sequence.
    pub fn set_observer(&mut self, observer: impl SpinObserver + 'static) {
        self.sequence.set_observer(observer);
    }

    /// Returns the current angle in `[0, 360)`.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    /// Returns the current signed speed.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Returns the plan of the current spin, if one was started.
    pub fn plan(&self) -> Option<&SpinPlan> {
        self.plan.as_ref()
    }

    /// Returns the phase sequence of the current spin.
    pub fn sequence(&self) -> &PhaseSequence {
        &self.sequence
    }

    /// Returns `true` while a spin is being polled.
    pub fn is_running(&self) -> bool {
        self.sequence.is_running()
    }

    /// Returns the state as of the last poll.
    pub fn state(&self) -> WheelState {
        WheelState {
            angle: self.angle,
            speed: self.speed,
            phase: self.phase,
            finished: self.phase.is_stopped(),
        }
    }

    /// Moves the wheel to `angle` by hand.
    ///
    /// A planned spin that has not been polled yet is cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::MutationWhileRunning`] during a spin.
    pub fn set_angle(&mut self, angle: f64) -> Result<()> {
        if self.is_running() {
            return Err(SpinError::MutationWhileRunning);
        }
        self.stop();
        self.angle = kinematics::normalize_angle(angle);
        Ok(())
    }

    /// Builds a request that starts from the wheel's current angle.
    ///
    /// When the wheel already sits at or past the target, one lap is taken
    /// off the initial angle so the spin never covers fewer full turns than
    /// the dial asks for.
    pub fn request_for(
        &self,
        target_angle: f64,
        spins_coefficient: u32,
        spin_time: f64,
    ) -> SpinRequest {
        let target = kinematics::normalize_angle(target_angle);
        let initial = if self.angle >= target {
            self.angle - FULL_TURN
        } else {
            self.angle
        };
        SpinRequest::new(target, spins_coefficient, spin_time, initial)
    }

    /// Spins from the current angle to `target_angle`.
    ///
    /// # Errors
    ///
    /// Any error of [`Wheel::start`].
    pub fn spin_to(
        &mut self,
        target_angle: f64,
        spins_coefficient: u32,
        spin_time: f64,
        proportions: &PhaseProportions,
    ) -> Result<SpinPlan> {
        let request = self.request_for(target_angle, spins_coefficient, spin_time);
        self.start(request, proportions)
    }

    /// Plans a spin and readies the wheel for polling.
    ///
    /// Any spin in progress is stopped first. On error the wheel stays
    /// stopped and keeps its previous plan and phases.
    ///
    /// # Errors
    ///
    /// Any error of [`SpinPlanner::plan_into`].
    pub fn start(
        &mut self,
        request: SpinRequest,
        proportions: &PhaseProportions,
    ) -> Result<SpinPlan> {
        self.stop();
        let plan = self.planner.plan_into(&request, proportions, &mut self.sequence)?;

        self.initial_angle = request.initial_angle;
        self.angle = kinematics::normalize_angle(request.initial_angle);
        self.speed = plan.speeds.start_speed;
        self.phase = self
            .sequence
            .phases()
            .first()
            .map_or(PhaseKind::Stopped, Phase::kind);
        self.plan = Some(plan);
        self.spinning = true;
        self.chain_angles();

        debug!(
            target = request.target_angle,
            initial = request.initial_angle,
            spins = plan.spins_amount,
            "spin started"
        );
        Ok(plan)
    }

    /// Evaluates the wheel at `elapsed` seconds since the spin started.
    ///
    /// `elapsed` must not decrease between polls of the same spin. With no
    /// spin under way the wheel holds its angle at rest.
    pub fn poll(&mut self, elapsed: f64) -> WheelState {
        if !self.spinning {
            self.speed = 0.0;
            self.phase = PhaseKind::Stopped;
            return self.state();
        }
        let phase = *self.sequence.active_phase(elapsed);
        match self.sequence.active_index() {
            Some(index) if !phase.kind().is_stopped() => {
                let local = (elapsed - phase.start_time()).max(0.0);
                self.angle = phase.angle_at(local, self.start_angles[index]);
                self.speed = phase.speed_at(local);
            }
            _ => {
                self.angle = self.rest_angle;
                self.speed = 0.0;
                self.spinning = false;
            }
        }
        self.phase = phase.kind();
        self.state()
    }

    /// Stops the wheel where it is.
    ///
    /// The cursor goes back to the first phase and the speed drops to zero.
    /// Later polls hold the stopped angle until the next [`Wheel::start`].
    pub fn stop(&mut self) {
        self.spinning = false;
        self.sequence.reset_cursor();
        self.speed = 0.0;
        self.phase = PhaseKind::Stopped;
    }

    /// Changes the total spin time of the planned spin, keeping each phase's
    /// share and re-solving speeds so it still lands on the target.
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] during a spin.
    /// - Any error of [`PhaseSequence::rescale_total`] or
    ///   [`PhaseSequence::solve_speeds`].
    pub fn rescale(&mut self, new_total_time: f64) -> Result<RescaleReport> {
        let report = self.sequence.rescale_total(new_total_time)?;
        if let Some(plan) = self.plan.as_mut() {
            plan.speeds = self
                .sequence
                .solve_speeds(plan.total_path, plan.speeds.start_speed)?;
        }
        self.chain_angles();
        Ok(report)
    }

    fn chain_angles(&mut self) {
        self.start_angles.clear();
        let mut angle = self.initial_angle;
        for phase in self.sequence.phases() {
            self.start_angles.push(angle);
            angle += phase.total_path();
        }
        self.rest_angle = kinematics::normalize_angle(angle);
    }
}
