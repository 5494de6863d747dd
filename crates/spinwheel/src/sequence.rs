//! Ordered, gap-free chains of phases.
//!
//! A [`PhaseSequence`] owns its phases and a cursor that remembers the last
//! active phase. Lookups scan forward from the cursor, so repeated polling
//! with non-decreasing time costs O(1) amortized.
//!
//! # Polling contract
//!
//! Queries must be issued with non-decreasing `t`. To go backward or start
//! over, call [`PhaseSequence::reset_cursor`] first. Out-of-order queries
//! give an unspecified active phase.
//!
//! # Example
//!
//! ```rust
//! use spinwheel::{PhaseKind, PhaseSequence};
//!
//! let mut seq = PhaseSequence::new(10.0);
//! seq.emplace(PhaseKind::Acceleration, 3.0, 0.0, 120.0)?;
//! seq.emplace(PhaseKind::Linear, 3.0, 120.0, 120.0)?;
//! seq.emplace(PhaseKind::Deceleration, 4.0, 120.0, 0.0)?;
//!
//! assert_eq!(seq.active_phase(1.0).kind(), PhaseKind::Acceleration);
//! assert_eq!(seq.active_phase(3.0).kind(), PhaseKind::Linear);
//! assert_eq!(seq.active_phase(10.0).kind(), PhaseKind::Stopped);
//! # Ok::<(), spinwheel::SpinError>(())
//! ```

use core::fmt;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{Result, SpinError};
use crate::phase::{Direction, Phase, PhaseKind};
use crate::planner::{self, ThreePhaseSpeeds};
use crate::trace::{SpinEvent, SpinObserver};

static STOPPED: Phase = Phase::stopped();

/// Lifecycle of a [`PhaseSequence`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SequenceState {
    /// No phases yet.
    #[default]
    Unconfigured,
    /// Phases are in place and nothing has been polled since the last
    /// configuration change or cursor reset.
    Configured,
    /// Polling is under way; configuration is read-only.
    Running,
    /// A poll reached the end of the last phase.
    Finished,
}

/// Position of the active-phase cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cursor {
    /// Index of the last active phase.
    At(usize),
    /// Past the end of the sequence.
    Stopped,
}

/// Outcome of [`PhaseSequence::rescale_total`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RescaleReport {
    /// Total spin time before the rescale.
    pub previous_total: f64,
    /// Total spin time after the rescale.
    pub new_total: f64,
    /// Seconds folded into the last phase to absorb rounding, if any.
    pub tail_correction: Option<f64>,
}

/// An ordered, gap-free, non-overlapping chain of [`Phase`]s.
///
/// Every sequence owns a freshly allocated phase list; nothing is shared
/// between instances.
pub struct PhaseSequence {
    phases: Vec<Phase>,
    by_kind: HashMap<PhaseKind, usize>,
    cursor: Cursor,
    state: SequenceState,
    total_spin_time: f64,
    total_stages_duration: f64,
    observer: Option<Box<dyn SpinObserver>>,
}

impl PhaseSequence {
    /// Creates an empty sequence meant to span `total_spin_time` seconds.
    pub fn new(total_spin_time: f64) -> Self {
        Self {
            phases: Vec::new(),
            by_kind: HashMap::new(),
            cursor: Cursor::At(0),
            state: SequenceState::Unconfigured,
            total_spin_time,
            total_stages_duration: 0.0,
            observer: None,
        }
    }

    /// Installs an observer for phase transitions and rescale events,
    /// replacing any previous one.
    pub fn set_observer(&mut self, observer: impl SpinObserver + 'static) {
        self.observer = Some(Box::new(observer));
    }

    /// Removes the observer, if any.
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Returns the phases in temporal order.
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Returns the phase of the given kind, if present.
    pub fn phase(&self, kind: PhaseKind) -> Option<&Phase> {
        self.by_kind.get(&kind).map(|&i| &self.phases[i])
    }

    /// Returns the number of phases.
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Returns `true` if the sequence has no phases.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Returns the lifecycle state.
    pub fn state(&self) -> SequenceState {
        self.state
    }

    /// Returns `true` while configuration is locked by polling.
    pub fn is_running(&self) -> bool {
        self.state == SequenceState::Running
    }

    /// Returns the cursor position.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Returns the index of the active phase, or `None` past the end.
    pub fn active_index(&self) -> Option<usize> {
        match self.cursor {
            Cursor::At(i) if i < self.phases.len() => Some(i),
            _ => None,
        }
    }

    /// Returns the total time the sequence is meant to span.
    pub fn total_spin_time(&self) -> f64 {
        self.total_spin_time
    }

    /// Returns the sum of all phase durations.
    pub fn total_stages_duration(&self) -> f64 {
        self.total_stages_duration
    }

    /// Returns `total_spin_time - total_stages_duration`.
    ///
    /// Non-zero means the phases do not yet cover the intended spin time.
    pub fn duration_mismatch(&self) -> f64 {
        self.total_spin_time - self.total_stages_duration
    }

    /// Returns the summed signed path of every phase.
    pub fn total_path(&self) -> f64 {
        self.phases.iter().map(Phase::total_path).sum()
    }

    /// Removes every phase and resets the cursor and accumulated duration.
    ///
    /// Allowed in any state. The observer and total spin time are kept.
    pub fn clear(&mut self) {
        self.phases.clear();
        self.by_kind.clear();
        self.cursor = Cursor::At(0);
        self.state = SequenceState::Unconfigured;
        self.total_stages_duration = 0.0;
    }

    /// Appends a phase, chaining its start time to the previous phase's end.
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] while polling is under way.
    /// - [`SpinError::SentinelPhase`] for a `Stopped` phase.
    /// - [`SpinError::DuplicatePhaseKind`] if a phase of that kind is present.
    pub fn append(&mut self, phase: Phase) -> Result<()> {
        self.ensure_stopped()?;
        let kind = phase.kind();
        if kind.is_stopped() {
            return Err(SpinError::SentinelPhase);
        }
        if self.by_kind.contains_key(&kind) {
            return Err(SpinError::DuplicatePhaseKind(kind));
        }

        let start = self.phases.last().map_or(0.0, Phase::end_time);
        let phase = phase.with_start_time(start);
        self.total_stages_duration += phase.duration();
        self.by_kind.insert(kind, self.phases.len());
        self.phases.push(phase);
        self.rewind();
        Ok(())
    }

    /// Builds a phase against this sequence's total spin time and appends it.
    ///
    /// # Errors
    ///
    /// Any error of [`Phase::new`] or [`PhaseSequence::append`].
    pub fn emplace(
        &mut self,
        kind: PhaseKind,
        duration: f64,
        start_speed: f64,
        end_speed: f64,
    ) -> Result<()> {
        let phase = Phase::new(kind, duration)?
            .with_speeds(start_speed, end_speed)
            .with_total_spin_time(self.total_spin_time);
        self.append(phase)
    }

    /// Returns the phase active at elapsed time `t`.
    ///
    /// Scans forward from the cursor. Times before the first phase resolve
    /// to the first phase; times at or past the end return the `Stopped`
    /// sentinel. An empty sequence always returns the sentinel.
    pub fn active_phase(&mut self, t: f64) -> &Phase {
        match self.resolve(t) {
            Some(i) => &self.phases[i],
            None => &STOPPED,
        }
    }

    /// Resolves the active phase at `t`, then returns the phase after it,
    /// or the sentinel at the end.
    pub fn next_phase(&mut self, t: f64) -> &Phase {
        match self.resolve(t) {
            Some(i) => self.phases.get(i + 1).unwrap_or(&STOPPED),
            None => &STOPPED,
        }
    }

    /// Resolves the active phase at `t`, then returns the phase before it,
    /// or the sentinel at the start (and once stopped).
    pub fn prev_phase(&mut self, t: f64) -> &Phase {
        match self.resolve(t) {
            Some(i) if i > 0 => &self.phases[i - 1],
            _ => &STOPPED,
        }
    }

    /// Moves the cursor back to the first phase and unlocks configuration.
    pub fn reset_cursor(&mut self) {
        self.rewind();
    }

    /// Resizes every phase to keep its share of a new total spin time.
    ///
    /// Each phase keeps its recorded time coefficient, or falls back to its
    /// share of the old total. If rounding leaves the summed durations off
    /// from `new_total_time`, the difference is added to the last phase and
    /// returned in [`RescaleReport::tail_correction`].
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] while polling is under way.
    /// - [`SpinError::InvalidDuration`] if `new_total_time` is negative or
    ///   not finite, or if the tail correction would make the last phase
    ///   negative. The sequence is left unchanged in that case.
    pub fn rescale_total(&mut self, new_total_time: f64) -> Result<RescaleReport> {
        self.ensure_stopped()?;
        if !(new_total_time.is_finite() && new_total_time >= 0.0) {
            return Err(SpinError::InvalidDuration {
                duration: new_total_time,
            });
        }

        let previous_total = if self.total_spin_time > 0.0 {
            self.total_spin_time
        } else {
            self.total_stages_duration
        };

        // Work on a copy; `self.phases` changes only on success.
        let mut resized = self.phases.clone();
        let mut start = 0.0;
        let mut total = 0.0;
        for phase in &mut resized {
            let coefficient = phase.time_coefficient().unwrap_or_else(|| {
                if previous_total > 0.0 {
                    phase.duration() / previous_total
                } else {
                    0.0
                }
            });
            phase.rescale(start, new_total_time, coefficient)?;
            start = phase.end_time();
            total += phase.duration();
        }

        let mut stretched = None;
        let correction = new_total_time - total;
        if let Some(last) = resized.last_mut() {
            if correction != 0.0 {
                last.stretch(correction)?;
                stretched = Some((last.kind(), correction));
            }
            total = new_total_time;
        }

        if let Some((kind, correction)) = stretched {
            warn!(
                %kind,
                correction,
                "rescaled phases missed the total spin time; stretched the last phase"
            );
        }
        self.phases = resized;
        self.total_stages_duration = total;
        self.total_spin_time = new_total_time;
        self.rewind();

        debug!(from = previous_total, to = new_total_time, "rescaled phase sequence");
        self.emit(SpinEvent::Rescaled {
            from: previous_total,
            to: new_total_time,
        });
        if let Some((kind, correction)) = stretched {
            self.emit(SpinEvent::TailStretched { kind, correction });
        }

        Ok(RescaleReport {
            previous_total,
            new_total: new_total_time,
            tail_correction: stretched.map(|(_, correction)| correction),
        })
    }

    /// Edits the boundary speeds (and optionally the duration) of the phase
    /// of the given kind.
    ///
    /// Start times of later phases are re-chained when the duration changes.
    /// Returns `false` if no phase of that kind is present.
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] while polling is under way.
    /// - [`SpinError::InvalidDuration`] for a negative duration.
    pub fn update_boundary_speeds(
        &mut self,
        kind: PhaseKind,
        start_speed: Option<f64>,
        duration: Option<f64>,
        end_speed: Option<f64>,
    ) -> Result<bool> {
        self.ensure_stopped()?;
        let Some(&index) = self.by_kind.get(&kind) else {
            return Ok(false);
        };
        self.phases[index].update_boundary_speeds(start_speed, duration, end_speed)?;
        if duration.is_some() {
            self.rechain();
        }
        self.rewind();
        Ok(true)
    }

    /// Solves and applies the boundary speeds that make the three motion
    /// phases cover exactly `total_path` degrees, starting at `start_speed`
    /// and ending at rest.
    ///
    /// The sign of `total_path` sets every phase's direction; speeds are
    /// solved on its magnitude.
    ///
    /// # Errors
    ///
    /// - [`SpinError::MutationWhileRunning`] while polling is under way.
    /// - [`SpinError::PhaseCountMismatch`] unless the sequence holds exactly
    ///   one acceleration, one linear and one deceleration phase.
    pub fn solve_speeds(&mut self, total_path: f64, start_speed: f64) -> Result<ThreePhaseSpeeds> {
        self.ensure_stopped()?;
        let indices = self.motion_indices()?;
        let durations = indices.map(|i| self.phases[i].duration());
        let speeds = planner::solve_three_phase_speeds(total_path.abs(), &durations, start_speed)?;
        let direction = Direction::of(total_path);

        let [acc, lin, dec] = indices;
        let boundaries = [
            (acc, speeds.start_speed, speeds.linear_speed),
            (lin, speeds.linear_speed, speeds.linear_speed),
            (dec, speeds.linear_speed, 0.0),
        ];
        for (index, start, end) in boundaries {
            let phase = &mut self.phases[index];
            *phase = phase.with_direction(direction).with_speeds(start, end);
        }
        self.rewind();
        Ok(speeds)
    }

    pub(crate) fn set_total_spin_time(&mut self, total_spin_time: f64) {
        self.total_spin_time = total_spin_time;
    }

    fn motion_indices(&self) -> Result<[usize; 3]> {
        let found = self.phases.len();
        let mismatch = SpinError::PhaseCountMismatch { expected: 3, found };
        if found != 3 {
            return Err(mismatch);
        }
        let mut indices = [0; 3];
        for (slot, kind) in indices.iter_mut().zip(PhaseKind::MOTION) {
            *slot = *self.by_kind.get(&kind).ok_or_else(|| mismatch.clone())?;
        }
        Ok(indices)
    }

    fn resolve(&mut self, t: f64) -> Option<usize> {
        let first = self.phases.first()?;
        let previous = self.cursor;
        let was_fresh = self.state == SequenceState::Configured;

        let found = if t < first.start_time() {
            Some(0)
        } else {
            match self.cursor {
                Cursor::Stopped => None,
                Cursor::At(from) => {
                    (from..self.phases.len()).find(|&i| self.phases[i].is_active(t))
                }
            }
        };

        match found {
            Some(i) => {
                self.cursor = Cursor::At(i);
                self.state = SequenceState::Running;
                if was_fresh || previous != self.cursor {
                    let kind = self.phases[i].kind();
                    debug!(%kind, at = t, "entered phase");
                    self.emit(SpinEvent::PhaseEntered { kind, at: t });
                }
            }
            None => {
                self.cursor = Cursor::Stopped;
                self.state = SequenceState::Finished;
                if previous != Cursor::Stopped {
                    debug!(at = t, "phase sequence finished");
                    self.emit(SpinEvent::Finished { at: t });
                }
            }
        }
        found
    }

    fn rechain(&mut self) {
        let mut start = 0.0;
        let mut total = 0.0;
        for phase in &mut self.phases {
            phase.set_start_time(start);
            start = phase.end_time();
            total += phase.duration();
        }
        self.total_stages_duration = total;
    }

    fn rewind(&mut self) {
        self.cursor = Cursor::At(0);
        self.state = if self.phases.is_empty() {
            SequenceState::Unconfigured
        } else {
            SequenceState::Configured
        };
    }

    fn ensure_stopped(&self) -> Result<()> {
        if self.is_running() {
            Err(SpinError::MutationWhileRunning)
        } else {
            Ok(())
        }
    }

    fn emit(&mut self, event: SpinEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

impl Default for PhaseSequence {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl fmt::Debug for PhaseSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseSequence")
            .field("phases", &self.phases)
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("total_spin_time", &self.total_spin_time)
            .field("total_stages_duration", &self.total_stages_duration)
            .field("observer", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    const TOLERANCE: f64 = 1e-9;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn three_phase(total: f64) -> PhaseSequence {
        let mut seq = PhaseSequence::new(total);
        seq.emplace(PhaseKind::Acceleration, total * 0.3, 0.0, 100.0)
            .unwrap();
        seq.emplace(PhaseKind::Linear, total * 0.3, 100.0, 100.0)
            .unwrap();
        seq.emplace(PhaseKind::Deceleration, total * 0.4, 100.0, 0.0)
            .unwrap();
        seq
    }

    #[test]
    fn test_append_chains_start_times() {
        let seq = three_phase(10.0);
        let phases = seq.phases();
        assert_eq!(phases[0].start_time(), 0.0);
        for pair in phases.windows(2) {
            assert!(approx_eq(pair[0].end_time(), pair[1].start_time()));
        }
        assert!(approx_eq(seq.total_stages_duration(), 10.0));
        assert_eq!(seq.state(), SequenceState::Configured);
    }

    #[test]
    fn test_sequences_do_not_share_phases() {
        let a = three_phase(10.0);
        let b = PhaseSequence::new(10.0);
        assert_eq!(a.len(), 3);
        assert!(b.is_empty());
    }

    #[test]
    fn test_duplicate_kind_rejected() {
        let mut seq = three_phase(10.0);
        let err = seq.emplace(PhaseKind::Linear, 1.0, 0.0, 0.0).unwrap_err();
        assert_eq!(err, SpinError::DuplicatePhaseKind(PhaseKind::Linear));
        assert_eq!(seq.len(), 3);
    }

    #[test]
    fn test_sentinel_rejected() {
        let mut seq = PhaseSequence::new(1.0);
        assert_eq!(seq.append(Phase::stopped()), Err(SpinError::SentinelPhase));
    }

    #[test]
    fn test_emplace_records_coefficient() {
        let seq = three_phase(10.0);
        let linear = seq.phase(PhaseKind::Linear).unwrap();
        assert!(approx_eq(linear.time_coefficient().unwrap(), 0.3));
    }

    #[test]
    fn test_active_phase_walks_forward() {
        let mut seq = three_phase(10.0);
        assert_eq!(seq.active_phase(0.0).kind(), PhaseKind::Acceleration);
        assert_eq!(seq.state(), SequenceState::Running);
        assert_eq!(seq.active_phase(2.9).kind(), PhaseKind::Acceleration);
        assert_eq!(seq.active_phase(3.0).kind(), PhaseKind::Linear);
        assert_eq!(seq.active_phase(6.0).kind(), PhaseKind::Deceleration);
        assert_eq!(seq.active_index(), Some(2));
        assert_eq!(seq.active_phase(10.0).kind(), PhaseKind::Stopped);
        assert_eq!(seq.state(), SequenceState::Finished);
        assert_eq!(seq.cursor(), Cursor::Stopped);
    }

    #[test]
    fn test_negative_time_returns_first() {
        let mut seq = three_phase(10.0);
        assert_eq!(seq.active_phase(-1.0).kind(), PhaseKind::Acceleration);
    }

    #[test]
    fn test_empty_sequence_is_stopped() {
        let mut seq = PhaseSequence::new(5.0);
        assert!(seq.active_phase(1.0).kind().is_stopped());
        assert_eq!(seq.state(), SequenceState::Unconfigured);
    }

    #[test]
    fn test_reset_cursor_allows_backward_query() {
        let mut seq = three_phase(10.0);
        seq.active_phase(7.0);
        seq.reset_cursor();
        assert_eq!(seq.state(), SequenceState::Configured);
        assert_eq!(seq.active_phase(1.0).kind(), PhaseKind::Acceleration);
    }

    #[test]
    fn test_neighbors() {
        let mut seq = three_phase(10.0);
        assert!(seq.prev_phase(1.0).kind().is_stopped());
        assert_eq!(seq.next_phase(1.0).kind(), PhaseKind::Linear);
        assert_eq!(seq.prev_phase(4.0).kind(), PhaseKind::Acceleration);
        assert!(seq.next_phase(8.0).kind().is_stopped());
        assert!(seq.prev_phase(11.0).kind().is_stopped());
    }

    #[test]
    fn test_mutation_while_running() {
        let mut seq = three_phase(10.0);
        seq.active_phase(1.0);
        assert_eq!(seq.rescale_total(5.0), Err(SpinError::MutationWhileRunning));
        assert_eq!(
            seq.update_boundary_speeds(PhaseKind::Linear, Some(1.0), None, None),
            Err(SpinError::MutationWhileRunning)
        );
        assert_eq!(
            seq.emplace(PhaseKind::Stopped, 1.0, 0.0, 0.0),
            Err(SpinError::MutationWhileRunning)
        );
        seq.clear();
        assert_eq!(seq.state(), SequenceState::Unconfigured);
    }

    #[test]
    fn test_mutation_allowed_after_finish() {
        let mut seq = three_phase(10.0);
        seq.active_phase(20.0);
        assert!(seq.rescale_total(20.0).is_ok());
        assert_eq!(seq.state(), SequenceState::Configured);
    }

    #[test]
    fn test_rescale_total() {
        let mut seq = three_phase(10.0);
        let report = seq.rescale_total(20.0).unwrap();
        assert_eq!(report.previous_total, 10.0);
        let durations: Vec<f64> = seq.phases().iter().map(Phase::duration).collect();
        assert!(approx_eq(durations[0], 6.0));
        assert!(approx_eq(durations[1], 6.0));
        assert!(approx_eq(durations[2], 8.0));
        let sum: f64 = durations.iter().sum();
        assert!(approx_eq(sum, 20.0));
        assert_eq!(seq.total_stages_duration(), 20.0);
        assert!(approx_eq(seq.phases()[2].start_time(), 12.0));
    }

    #[test]
    fn test_rescale_without_coefficients() {
        let mut seq = PhaseSequence::new(0.0);
        seq.append(Phase::new(PhaseKind::Acceleration, 1.0).unwrap())
            .unwrap();
        seq.append(Phase::new(PhaseKind::Deceleration, 3.0).unwrap())
            .unwrap();
        seq.rescale_total(8.0).unwrap();
        assert!(approx_eq(seq.phases()[0].duration(), 2.0));
        assert!(approx_eq(seq.phases()[1].duration(), 6.0));
    }

    #[test]
    fn test_rescale_negative_total() {
        let mut seq = three_phase(10.0);
        assert!(matches!(
            seq.rescale_total(-1.0),
            Err(SpinError::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_rescale_rejects_non_finite_total() {
        let mut seq = three_phase(10.0);
        let before = seq.phases().to_vec();
        let stages = seq.total_stages_duration();
        for total in [f64::INFINITY, f64::NAN] {
            assert!(matches!(
                seq.rescale_total(total),
                Err(SpinError::InvalidDuration { .. })
            ));
        }
        assert_eq!(seq.phases(), before.as_slice());
        assert_eq!(seq.total_spin_time(), 10.0);
        assert_eq!(seq.total_stages_duration(), stages);
    }

    #[test]
    fn test_failed_rescale_leaves_sequence_unchanged() {
        let mut seq = PhaseSequence::new(10.0);
        for (kind, duration) in PhaseKind::MOTION.into_iter().zip([10.0, 10.0, 1.0]) {
            seq.emplace(kind, duration, 0.0, 0.0).unwrap();
        }
        let before = seq.phases().to_vec();

        // Coefficients sum to 2.1; the tail cannot absorb -22s
        assert_eq!(
            seq.rescale_total(20.0),
            Err(SpinError::InvalidDuration { duration: -20.0 })
        );
        assert_eq!(seq.phases(), before.as_slice());
        assert_eq!(seq.total_spin_time(), 10.0);
        assert_eq!(seq.total_stages_duration(), 21.0);
        let sum: f64 = seq.phases().iter().map(Phase::duration).sum();
        assert_eq!(sum, seq.total_stages_duration());
    }

    #[test]
    fn test_rescale_reports_tail_correction() {
        let mut seq = PhaseSequence::new(1.0);
        for kind in PhaseKind::MOTION {
            seq.emplace(kind, 0.1, 0.0, 0.0).unwrap();
        }
        // Coefficients sum to 0.3, so the tail absorbs the remaining 0.7
        let report = seq.rescale_total(1.0).unwrap();
        let correction = report.tail_correction.unwrap();
        assert!(approx_eq(correction, 0.7));
        assert!(approx_eq(seq.phases()[2].duration(), 0.8));
        let sum: f64 = seq.phases().iter().map(Phase::duration).sum();
        assert!(approx_eq(sum, 1.0));
    }

    #[test]
    fn test_update_boundary_speeds_rechains() {
        let mut seq = three_phase(10.0);
        assert!(seq
            .update_boundary_speeds(PhaseKind::Acceleration, None, Some(5.0), None)
            .unwrap());
        assert!(approx_eq(seq.phases()[1].start_time(), 5.0));
        assert!(approx_eq(seq.total_stages_duration(), 12.0));
        assert!(approx_eq(seq.duration_mismatch(), -2.0));
        assert!(!seq
            .update_boundary_speeds(PhaseKind::Stopped, Some(1.0), None, None)
            .unwrap());
    }

    #[test]
    fn test_solve_speeds_requires_three() {
        let mut seq = PhaseSequence::new(4.0);
        seq.emplace(PhaseKind::Acceleration, 2.0, 0.0, 0.0).unwrap();
        seq.emplace(PhaseKind::Deceleration, 2.0, 0.0, 0.0).unwrap();
        assert_eq!(
            seq.solve_speeds(100.0, 0.0),
            Err(SpinError::PhaseCountMismatch {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn test_solve_speeds_lands_on_path() {
        let mut seq = three_phase(10.0);
        seq.solve_speeds(810.0, 0.0).unwrap();
        assert!((seq.total_path() - 810.0).abs() < 1e-6);
        assert_eq!(seq.phases()[2].end_speed(), 0.0);
        assert_eq!(seq.phases()[0].start_speed(), 0.0);
    }

    #[test]
    fn test_solve_speeds_reverse() {
        let mut seq = three_phase(10.0);
        seq.solve_speeds(-450.0, 0.0).unwrap();
        assert!((seq.total_path() + 450.0).abs() < 1e-6);
        assert!(seq
            .phases()
            .iter()
            .all(|p| p.direction() == Direction::Reverse));
    }

    #[test]
    fn test_observer_sees_transitions() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut seq = three_phase(10.0);
        seq.set_observer(move |event: &SpinEvent| sink.lock().unwrap().push(*event));

        for t in [0.0, 1.0, 3.5, 4.0, 7.0, 10.0, 11.0] {
            seq.active_phase(t);
        }

        let events = events.lock().unwrap();
        let kinds: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                SpinEvent::PhaseEntered { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(kinds, PhaseKind::MOTION.to_vec());
        assert!(matches!(events.last(), Some(SpinEvent::Finished { at }) if *at == 10.0));
    }
}
