#![forbid(unsafe_code)]
// Allow these clippy lints for physics/math code readability
#![allow(clippy::must_use_candidate)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::use_self)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::float_cmp)]

//! # Spinwheel
//!
//! Phase-based kinematics for a wheel that must come to rest at a chosen
//! angle, after a chosen number of full turns, within a chosen time.
//!
//! Spinwheel provides:
//! - **Kinematics**: pure equations of motion under constant acceleration
//! - **Phase**: one constant-acceleration segment of a spin
//! - **PhaseSequence**: a gap-free chain of phases with a polling cursor
//! - **Planner**: derives rotations and the speeds that land exactly on target
//! - **Wheel**: a poll-driven driver tying the pieces together
//!
//! ## Example
//!
//! ```rust
//! use spinwheel::{PhaseProportions, SpinRequest, Wheel};
//!
//! let mut wheel = Wheel::new();
//! let plan = wheel.start(
//!     SpinRequest::new(90.0, 1, 10.0, 0.0),
//!     &PhaseProportions::default(),
//! )?;
//! assert_eq!(plan.spins_amount, 5);
//!
//! // Poll from your timer with the elapsed time since the start
//! for frame in 0..=1000 {
//!     let state = wheel.poll(f64::from(frame) / 100.0);
//!     if state.finished {
//!         assert!((state.angle - 90.0).abs() < 1e-6);
//!     }
//! }
//! # Ok::<(), spinwheel::SpinError>(())
//! ```
//!
//! ## Phases
//!
//! A spin is three phases, each taking a share of the total time:
//!
//! - **Acceleration**: from rest up to the plateau speed
//! - **Linear**: hold the plateau speed
//! - **Deceleration**: down to rest, exactly on target
//!
//! Once time runs out the sequence reports the `Stopped` sentinel.
//!
//! ## Observability
//!
//! The crate emits `tracing` events and accepts an optional
//! [`SpinObserver`]; neither has a destination unless you install one.

pub mod config;
mod error;
pub mod kinematics;
mod phase;
pub mod planner;
mod sequence;
mod trace;
mod wheel;

pub use config::{PhaseProportions, SpinConfig};
pub use error::{Result, SpinError};
pub use phase::{Direction, Phase, PhaseKind};
pub use planner::{SpinPlan, SpinPlanner, SpinPolicy, SpinRequest, ThreePhaseSpeeds};
pub use sequence::{Cursor, PhaseSequence, RescaleReport, SequenceState};
pub use trace::{SpinEvent, SpinObserver};
pub use wheel::{Wheel, WheelState};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{PhaseProportions, SpinConfig};
    pub use crate::error::{Result, SpinError};
    pub use crate::phase::{Direction, Phase, PhaseKind};
    pub use crate::planner::{SpinPlan, SpinPlanner, SpinPolicy, SpinRequest};
    pub use crate::sequence::PhaseSequence;
    pub use crate::trace::{SpinEvent, SpinObserver};
    pub use crate::wheel::{Wheel, WheelState};
}
