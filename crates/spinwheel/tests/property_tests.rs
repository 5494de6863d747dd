#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]

use proptest::prelude::*;
use spinwheel::kinematics::{position, speed};
use spinwheel::planner::total_path;
use spinwheel::{Phase, PhaseKind, PhaseProportions, PhaseSequence, SpinPlanner, SpinRequest};

fn proportions() -> impl Strategy<Value = PhaseProportions> {
    (0.05f64..1.0, 0.0f64..1.0, 0.05f64..1.0).prop_map(|(a, l, d)| {
        let sum = a + l + d;
        let a = a / sum;
        let l = l / sum;
        PhaseProportions::new(a, l, 1.0 - a - l).expect("normalized proportions")
    })
}

fn relative_tolerance(expected: f64) -> f64 {
    expected.abs().max(1.0) * 1e-6
}

// =============================================================================
// Kinematics
// =============================================================================

proptest! {
    #[test]
    fn position_stays_in_range(
        v0 in -1e4f64..1e4,
        a in -1e3f64..1e3,
        t in 0.0f64..100.0,
        angle0 in -1e4f64..1e4,
    ) {
        let angle = position(v0, a, t, angle0);
        prop_assert!(
            (0.0..360.0).contains(&angle),
            "angle {} out of range for v0={}, a={}, t={}, angle0={}",
            angle, v0, a, t, angle0
        );
    }

    #[test]
    fn speed_is_linear_in_time(
        v0 in -1e3f64..1e3,
        a in -1e2f64..1e2,
        t in 0.0f64..50.0,
    ) {
        let half = speed(v0, a, t / 2.0);
        let full = speed(v0, a, t);
        prop_assert!(((half - v0) * 2.0 - (full - v0)).abs() < 1e-6);
    }
}

// =============================================================================
// Planned spins
// =============================================================================

proptest! {
    #[test]
    fn planned_path_is_exact(
        target in -720.0f64..720.0,
        coefficient in 1u32..=10,
        spin_time in 0.5f64..30.0,
        initial in 0.0f64..360.0,
        proportions in proportions(),
    ) {
        let request = SpinRequest::new(target, coefficient, spin_time, initial);
        let mut seq = PhaseSequence::default();
        let plan = SpinPlanner::default()
            .plan_into(&request, &proportions, &mut seq)
            .unwrap();

        let expected = total_path(target, plan.spins_amount, initial);
        let travelled: f64 = seq.phases().iter().map(Phase::total_path).sum();
        prop_assert!(
            (travelled - expected).abs() < relative_tolerance(expected),
            "travelled {} expected {}",
            travelled, expected
        );
    }

    #[test]
    fn planned_boundary_speeds(
        target in 0.0f64..360.0,
        coefficient in 1u32..=10,
        spin_time in 0.5f64..30.0,
        proportions in proportions(),
    ) {
        let request = SpinRequest::new(target, coefficient, spin_time, 0.0);
        let mut seq = PhaseSequence::default();
        SpinPlanner::default()
            .plan_into(&request, &proportions, &mut seq)
            .unwrap();

        let first = seq.phase(PhaseKind::Acceleration).unwrap();
        let last = seq.phase(PhaseKind::Deceleration).unwrap();
        prop_assert_eq!(first.start_speed(), 0.0);
        prop_assert_eq!(last.end_speed(), 0.0);
    }

    #[test]
    fn phases_are_gap_free(
        spin_time in 0.1f64..60.0,
        proportions in proportions(),
    ) {
        let request = SpinRequest::new(0.0, 5, spin_time, 0.0);
        let mut seq = PhaseSequence::default();
        SpinPlanner::default()
            .plan_into(&request, &proportions, &mut seq)
            .unwrap();

        prop_assert_eq!(seq.phases()[0].start_time(), 0.0);
        for pair in seq.phases().windows(2) {
            prop_assert_eq!(pair[0].end_time(), pair[1].start_time());
        }
    }
}

// =============================================================================
// Rescaling
// =============================================================================

proptest! {
    #[test]
    fn rescale_sums_to_new_total(
        spin_time in 0.1f64..60.0,
        new_total in 0.0f64..120.0,
        proportions in proportions(),
    ) {
        let mut seq = PhaseSequence::new(spin_time);
        let durations = proportions.durations(spin_time);
        for (kind, duration) in PhaseKind::MOTION.into_iter().zip(durations) {
            seq.emplace(kind, duration, 0.0, 0.0).unwrap();
        }
        seq.rescale_total(new_total).unwrap();

        let sum: f64 = seq.phases().iter().map(Phase::duration).sum();
        prop_assert!((sum - new_total).abs() < 1e-9);
        prop_assert!((seq.total_stages_duration() - new_total).abs() < 1e-9);
    }

    #[test]
    fn rescale_to_same_total_is_identity(
        spin_time in 0.1f64..60.0,
        proportions in proportions(),
    ) {
        let mut seq = PhaseSequence::new(spin_time);
        let durations = proportions.durations(spin_time);
        for (kind, duration) in PhaseKind::MOTION.into_iter().zip(durations) {
            seq.emplace(kind, duration, 0.0, 0.0).unwrap();
        }
        let before: Vec<(f64, f64)> = seq
            .phases()
            .iter()
            .map(|p| (p.start_time(), p.duration()))
            .collect();

        seq.rescale_total(spin_time).unwrap();

        for (phase, (start, duration)) in seq.phases().iter().zip(before) {
            prop_assert!((phase.start_time() - start).abs() < 1e-9);
            prop_assert!((phase.duration() - duration).abs() < 1e-9);
        }
    }
}

// =============================================================================
// Active phase lookup
// =============================================================================

proptest! {
    #[test]
    fn active_phase_contains_time(
        spin_time in 0.5f64..30.0,
        steps in prop::collection::vec(0.0f64..0.5, 1..100),
    ) {
        let request = SpinRequest::new(180.0, 3, spin_time, 0.0);
        let mut seq = PhaseSequence::default();
        SpinPlanner::default()
            .plan_into(&request, &PhaseProportions::default(), &mut seq)
            .unwrap();

        let end = seq.total_stages_duration();
        let mut t = 0.0;
        for step in steps {
            t += step;
            let phase = *seq.active_phase(t);
            if t >= end {
                prop_assert!(phase.kind().is_stopped());
            } else {
                prop_assert!(phase.is_active(t), "t={} not in {:?}", t, phase);
            }
        }
    }
}
