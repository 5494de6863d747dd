//! Error types for spin planning and phase sequencing.

use thiserror::Error;

use crate::phase::PhaseKind;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SpinError>;

/// Errors produced while building, planning or mutating a spin.
///
/// Every operation in this crate is deterministic computation, so none of
/// these errors is transient: retrying with the same input fails the same
/// way.
///
/// Degenerate but valid inputs are not errors. A
/// zero-length phase has an acceleration of `0`, and a rounding mismatch
/// after [`PhaseSequence::rescale_total`](crate::PhaseSequence::rescale_total)
/// is folded into the last phase and reported through
/// [`RescaleReport`](crate::RescaleReport) instead.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SpinError {
    /// A phase was constructed or rescaled to a negative duration.
    #[error("invalid phase duration: {duration} (must be >= 0)")]
    InvalidDuration {
        /// The rejected duration, in seconds.
        duration: f64,
    },

    /// The three-phase solver was given the wrong number of phases.
    #[error("expected exactly {expected} motion phases, found {found}")]
    PhaseCountMismatch {
        /// Number of phases the solver needs.
        expected: usize,
        /// Number of phases it was given.
        found: usize,
    },

    /// Per-phase duration proportions were rejected.
    ///
    /// The contained string describes what was wrong with them.
    #[error("invalid phase proportions: {0}")]
    InvalidProportions(String),

    /// A configuration change was attempted while a spin is running.
    ///
    /// # Recovery
    ///
    /// Stop the wheel (or let it finish) before rescaling or editing speeds.
    #[error("cannot modify a phase sequence while it is running")]
    MutationWhileRunning,

    /// A second phase of an already-present kind was appended.
    #[error("phase sequence already contains a {0} phase")]
    DuplicatePhaseKind(PhaseKind),

    /// The `Stopped` sentinel was appended as if it were a real phase.
    #[error("the stopped sentinel cannot be part of a phase sequence")]
    SentinelPhase,
}

impl SpinError {
    /// Creates an [`SpinError::InvalidProportions`] with the given message.
    pub fn proportions(message: impl Into<String>) -> Self {
        Self::InvalidProportions(message.into())
    }
}
