//! Spin configuration.
//!
//! [`SpinConfig`] collects everything a front end needs to plan and poll a
//! spin. With the `serde` feature enabled it can be loaded from any serde
//! format; missing fields take their defaults.
//!
//! # Example
//!
//! ```rust
//! use spinwheel::{PhaseProportions, SpinConfig};
//!
//! let config = SpinConfig {
//!     target_angle: 270.0,
//!     proportions: PhaseProportions::new(0.2, 0.5, 0.3)?,
//!     ..SpinConfig::default()
//! };
//! config.validate()?;
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use crate::error::{Result, SpinError};
use crate::planner::{SpinPolicy, SpinRequest};

/// How far the proportions may drift from summing to exactly 1.
pub const PROPORTION_TOLERANCE: f64 = 1e-9;

/// Returns the time step for polling `n` times per second.
///
/// A rate of 0 is treated as 1.
///
/// ```rust
/// use spinwheel::config::fps;
///
/// assert_eq!(fps(4), 0.25);
/// ```
#[inline]
pub fn fps(n: u32) -> f64 {
    1.0 / f64::from(n.max(1))
}

/// Share of the total spin time given to the acceleration, linear and
/// deceleration phases.
///
/// Each share is finite and non-negative and they sum to 1.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<f64>", into = "Vec<f64>"))]
pub struct PhaseProportions([f64; 3]);

impl PhaseProportions {
    /// Validates and wraps three proportions.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidProportions`] if any value is negative or
    /// non-finite, or if they do not sum to 1 within
    /// [`PROPORTION_TOLERANCE`].
    pub fn new(acceleration: f64, linear: f64, deceleration: f64) -> Result<Self> {
        let values = [acceleration, linear, deceleration];
        if let Some(bad) = values.iter().find(|v| !(v.is_finite() && **v >= 0.0)) {
            return Err(SpinError::proportions(format!(
                "{bad} is not a non-negative finite number"
            )));
        }
        let sum: f64 = values.iter().sum();
        if (sum - 1.0).abs() > PROPORTION_TOLERANCE {
            return Err(SpinError::proportions(format!("sum is {sum}, expected 1")));
        }
        Ok(Self(values))
    }

    /// Validates proportions given as a slice of exactly three values.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidProportions`] for the wrong length or any
    /// reason listed under [`PhaseProportions::new`].
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match *values {
            [a, l, d] => Self::new(a, l, d),
            _ => Err(SpinError::proportions(format!(
                "expected 3 values, got {}",
                values.len()
            ))),
        }
    }

    /// Returns the proportions as an array.
    pub fn as_array(&self) -> [f64; 3] {
        self.0
    }

    /// Splits `total_time` into per-phase durations.
    pub fn durations(&self, total_time: f64) -> [f64; 3] {
        self.0.map(|p| p * total_time)
    }
}

impl Default for PhaseProportions {
    fn default() -> Self {
        Self([0.3, 0.3, 0.4])
    }
}

impl TryFrom<Vec<f64>> for PhaseProportions {
    type Error = SpinError;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::from_slice(&values)
    }
}

impl From<PhaseProportions> for Vec<f64> {
    fn from(proportions: PhaseProportions) -> Self {
        proportions.0.to_vec()
    }
}

/// Everything needed to plan and poll one spin.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpinConfig {
    // ========================================================================
    // Spin
    // ========================================================================
    /// Angle to land on, in degrees.
    pub target_angle: f64,

    /// Rotation dial, `1..=10`.
    pub spins_coefficient: u32,

    /// Total spin duration in seconds.
    pub spin_time: f64,

    /// Starting angle in degrees.
    pub initial_angle: f64,

    /// Per-phase share of the spin time.
    pub proportions: PhaseProportions,

    /// Dial-to-rotations mapping.
    pub policy: SpinPolicy,

    // ========================================================================
    // Presentation
    // ========================================================================
    /// Number of wheel sectors, used for reporting the landing sector.
    pub sectors: usize,

    /// Polls per second.
    pub poll_rate: u32,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            target_angle: 100.0,
            spins_coefficient: 1,
            spin_time: 5.0,
            initial_angle: 0.0,
            proportions: PhaseProportions::default(),
            policy: SpinPolicy::default(),
            sectors: 6,
            poll_rate: 100,
        }
    }
}

impl SpinConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks the values a front end is expected to supply.
    ///
    /// Proportions are validated when they are built, so only the spin time
    /// is checked here.
    ///
    /// # Errors
    ///
    /// Returns [`SpinError::InvalidDuration`] unless `spin_time` is finite
    /// and positive.
    pub fn validate(&self) -> Result<()> {
        if self.spin_time.is_finite() && self.spin_time > 0.0 {
            Ok(())
        } else {
            Err(SpinError::InvalidDuration {
                duration: self.spin_time,
            })
        }
    }

    /// Builds the request for this configuration.
    pub fn request(&self) -> SpinRequest {
        SpinRequest::new(
            self.target_angle,
            self.spins_coefficient,
            self.spin_time,
            self.initial_angle,
        )
    }

    /// Time between polls in seconds.
    pub fn poll_interval(&self) -> f64 {
        fps(self.poll_rate)
    }
}
