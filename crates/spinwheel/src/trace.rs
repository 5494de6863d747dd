//! Observer hook for phase transitions and rescale events.
//!
//! A [`PhaseSequence`](crate::PhaseSequence) has no observer by default.
//! Install one with
//! [`PhaseSequence::set_observer`](crate::PhaseSequence::set_observer):
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use spinwheel::{PhaseKind, PhaseSequence, SpinEvent};
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//!
//! let mut seq = PhaseSequence::new(4.0);
//! seq.emplace(PhaseKind::Linear, 4.0, 10.0, 10.0)?;
//! seq.set_observer(move |event: &SpinEvent| sink.lock().unwrap().push(*event));
//!
//! seq.active_phase(0.5);
//! seq.active_phase(5.0);
//!
//! assert_eq!(seen.lock().unwrap().len(), 2);
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use crate::phase::PhaseKind;

/// Something notable that happened to a phase sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "event", rename_all = "snake_case"))]
pub enum SpinEvent {
    /// The active phase changed to `kind` at elapsed time `at`.
    PhaseEntered {
        /// Kind of the newly active phase.
        kind: PhaseKind,
        /// Elapsed time of the poll that observed the change.
        at: f64,
    },
    /// The sequence ran out of phases at elapsed time `at`.
    Finished {
        /// Elapsed time of the poll that observed the end.
        at: f64,
    },
    /// Durations were rescaled to a new total spin time.
    Rescaled {
        /// Previous total spin time.
        from: f64,
        /// New total spin time.
        to: f64,
    },
    /// Rounding left the rescaled durations off by `correction` seconds,
    /// which was added to the last phase.
    TailStretched {
        /// Kind of the stretched phase.
        kind: PhaseKind,
        /// Seconds added (or removed, if negative).
        correction: f64,
    },
}

/// Receives [`SpinEvent`]s from a phase sequence.
///
/// Implemented for every `FnMut(&SpinEvent) + Send` closure.
pub trait SpinObserver: Send {
    /// Called synchronously, on the polling thread, for each event.
    fn on_event(&mut self, event: &SpinEvent);
}

impl<F> SpinObserver for F
where
    F: FnMut(&SpinEvent) + Send,
{
    fn on_event(&mut self, event: &SpinEvent) {
        self(event);
    }
}
