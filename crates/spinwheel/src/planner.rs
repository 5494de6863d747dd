//! Turning a spin request into boundary speeds.
//!
//! A spin travels `target + 360*spins - initial` degrees over three phases:
//! accelerate from the start speed to a plateau, hold the plateau, then
//! decelerate to rest. The velocity-time curve is a trapezoid, so the
//! plateau speed follows in closed form from the path and the phase
//! durations.
//!
//! # Example
//!
//! ```rust
//! use spinwheel::{PhaseProportions, SpinPlanner, SpinRequest};
//!
//! let request = SpinRequest::new(90.0, 1, 10.0, 0.0);
//! let plan = SpinPlanner::default().plan(&request, &PhaseProportions::default())?;
//!
//! assert_eq!(plan.spins_amount, 5);
//! assert_eq!(plan.total_path, 90.0 + 360.0 * 5.0);
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use tracing::debug;

use crate::config::PhaseProportions;
use crate::error::{Result, SpinError};
use crate::kinematics::{self, FULL_TURN};
use crate::phase::{Direction, PhaseKind};
use crate::sequence::PhaseSequence;

/// Number of motion phases the closed-form solver handles.
pub const MOTION_PHASES: usize = 3;

/// Tunable bounds for deriving full rotations from the user-facing dial.
///
/// The dial value is mapped linearly from `[coefficient_min, coefficient_max]`
/// onto `[spins_min, spins_max]` rotations per second of spin time.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpinPolicy {
    /// Lowest dial value.
    pub coefficient_min: f64,
    /// Highest dial value.
    pub coefficient_max: f64,
    /// Rotations per second at the lowest dial value.
    pub spins_min: f64,
    /// Rotations per second at the highest dial value.
    pub spins_max: f64,
}

impl Default for SpinPolicy {
    fn default() -> Self {
        Self {
            coefficient_min: 1.0,
            coefficient_max: 10.0,
            spins_min: 0.5,
            spins_max: 1.5,
        }
    }
}

impl SpinPolicy {
    /// Returns the number of full rotations for a dial value and spin time,
    /// truncated toward zero.
    #[allow(clippy::cast_possible_truncation)]
    pub fn spins_amount(&self, coefficient: u32, spin_time: f64) -> i64 {
        let normalized = kinematics::interpolate(
            f64::from(coefficient),
            self.coefficient_min,
            self.coefficient_max,
            self.spins_min,
            self.spins_max,
        );
        (normalized * spin_time).trunc() as i64
    }
}

/// Number of full rotations under the default [`SpinPolicy`].
///
/// ```rust
/// use spinwheel::planner::spins_amount;
///
/// assert_eq!(spins_amount(1, 5.0), 2);
/// assert_eq!(spins_amount(10, 5.0), 7);
/// ```
pub fn spins_amount(coefficient: u32, spin_time: f64) -> i64 {
    SpinPolicy::default().spins_amount(coefficient, spin_time)
}

/// Signed angular distance from `initial_angle` to `target_angle` plus
/// `spins_amount` full turns.
#[allow(clippy::cast_precision_loss)]
pub fn total_path(target_angle: f64, spins_amount: i64, initial_angle: f64) -> f64 {
    target_angle + FULL_TURN * spins_amount as f64 - initial_angle
}

/// Boundary speeds of a solved three-phase spin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThreePhaseSpeeds {
    /// Speed at the start of the acceleration phase.
    pub start_speed: f64,
    /// Plateau speed held through the linear phase.
    pub linear_speed: f64,
}

/// Solves for the plateau speed that covers `total_path` over three phases.
///
/// The wheel ramps from `start_speed` to the plateau over `durations[0]`,
/// holds it for `durations[1]` and ramps down to rest over `durations[2]`:
///
/// ```text
/// path = (v0 + v)/2 * t1 + v * t2 + v/2 * t3
/// ```
///
/// When every duration is zero there is no time to move in and the plateau
/// is `0`, mirroring the zero-acceleration fallback for degenerate phases.
///
/// # Errors
///
/// - [`SpinError::PhaseCountMismatch`] unless exactly three durations are given.
/// - [`SpinError::InvalidDuration`] for a negative or non-finite duration.
///
/// ```rust
/// use spinwheel::planner::solve_three_phase_speeds;
///
/// let speeds = solve_three_phase_speeds(810.0, &[3.0, 3.0, 4.0], 0.0)?;
/// let path = speeds.linear_speed * (1.5 + 3.0 + 2.0);
/// assert!((path - 810.0).abs() < 1e-9);
/// # Ok::<(), spinwheel::SpinError>(())
/// ```
pub fn solve_three_phase_speeds(
    total_path: f64,
    durations: &[f64],
    start_speed: f64,
) -> Result<ThreePhaseSpeeds> {
    let &[t1, t2, t3] = durations else {
        return Err(SpinError::PhaseCountMismatch {
            expected: MOTION_PHASES,
            found: durations.len(),
        });
    };
    if let Some(&duration) = durations.iter().find(|d| !(d.is_finite() && **d >= 0.0)) {
        return Err(SpinError::InvalidDuration { duration });
    }

    let weight = t1 / 2.0 + t2 + t3 / 2.0;
    let linear_speed = if weight > 0.0 {
        (total_path - start_speed * t1 / 2.0) / weight
    } else {
        0.0
    };

    Ok(ThreePhaseSpeeds {
        start_speed,
        linear_speed,
    })
}

/// Inputs for one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinRequest {
    /// Angle to come to rest at, in degrees; any real value, taken mod 360.
    pub target_angle: f64,
    /// User-facing rotation dial, nominally `1..=10`.
    pub spins_coefficient: u32,
    /// Total spin duration in seconds.
    pub spin_time: f64,
    /// Angle the wheel starts from, in degrees.
    pub initial_angle: f64,
}

impl SpinRequest {
    /// Creates a request.
    pub fn new(
        target_angle: f64,
        spins_coefficient: u32,
        spin_time: f64,
        initial_angle: f64,
    ) -> Self {
        Self {
            target_angle,
            spins_coefficient,
            spin_time,
            initial_angle,
        }
    }

    fn check_spin_time(&self) -> Result<()> {
        if self.spin_time.is_finite() {
            Ok(())
        } else {
            Err(SpinError::InvalidDuration {
                duration: self.spin_time,
            })
        }
    }
}

/// Result of planning a spin.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpinPlan {
    /// Full rotations added on top of the raw displacement.
    pub spins_amount: i64,
    /// Signed distance the wheel travels, in degrees.
    pub total_path: f64,
    /// Which way the wheel turns.
    pub direction: Direction,
    /// Solved boundary speeds (magnitudes).
    pub speeds: ThreePhaseSpeeds,
}

/// Plans spins under a [`SpinPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpinPlanner {
    policy: SpinPolicy,
}

impl SpinPlanner {
    /// Creates a planner with a custom policy.
    pub fn new(policy: SpinPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy in use.
    pub fn policy(&self) -> &SpinPolicy {
        &self.policy
    }

    /// Computes spins, path and speeds without building a sequence.
    ///
    /// # Errors
    ///
    /// - [`SpinError::InvalidDuration`] if the spin time is not finite.
    /// - Any error of [`solve_three_phase_speeds`].
    pub fn plan(&self, request: &SpinRequest, proportions: &PhaseProportions) -> Result<SpinPlan> {
        request.check_spin_time()?;
        let spins = self.policy.spins_amount(request.spins_coefficient, request.spin_time);
        let path = total_path(request.target_angle, spins, request.initial_angle);
        let durations = proportions.durations(request.spin_time.max(0.0));
        let speeds = solve_three_phase_speeds(path.abs(), &durations, 0.0)?;
        Ok(SpinPlan {
            spins_amount: spins,
            total_path: path,
            direction: Direction::of(path),
            speeds,
        })
    }

    /// Replaces the contents of `sequence` with a freshly planned spin.
    ///
    /// The sequence keeps its observer. A non-positive spin time yields
    /// zero-length phases that never become active.
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] if `sequence` is being polled.
    /// - [`SpinError::InvalidDuration`] if the spin time is not finite.
    ///
    /// `sequence` is only touched once both checks pass.
    pub fn plan_into(
        &self,
        request: &SpinRequest,
        proportions: &PhaseProportions,
        sequence: &mut PhaseSequence,
    ) -> Result<SpinPlan> {
        if sequence.is_running() {
            return Err(SpinError::MutationWhileRunning);
        }
        request.check_spin_time()?;
        let spin_time = request.spin_time.max(0.0);
        let spins = self.policy.spins_amount(request.spins_coefficient, request.spin_time);
        let path = total_path(request.target_angle, spins, request.initial_angle);

        sequence.clear();
        sequence.set_total_spin_time(spin_time);
        let durations = proportions.durations(spin_time);
        for (kind, duration) in PhaseKind::MOTION.into_iter().zip(durations) {
            sequence.emplace(kind, duration, 0.0, 0.0)?;
        }
        let speeds = sequence.solve_speeds(path, 0.0)?;

        debug!(
            spins_amount = spins,
            total_path = path,
            linear_speed = speeds.linear_speed,
            spin_time,
            "planned spin"
        );
        Ok(SpinPlan {
            spins_amount: spins,
            total_path: path,
            direction: Direction::of(path),
            speeds,
        })
    }
}
