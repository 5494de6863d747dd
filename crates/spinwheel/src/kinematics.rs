//! Equations of motion under constant acceleration.
//!
//! Every function here is pure and failure-free. Angles are in degrees,
//! times in seconds, speeds in degrees per second.
//!
//! # Example
//!
//! ```rust
//! use spinwheel::kinematics::{acceleration_between, position, speed};
//!
//! // Ramp from rest to 120 deg/s over 3 seconds
//! let a = acceleration_between(0.0, 3.0, 120.0);
//! assert_eq!(a, 40.0);
//!
//! assert_eq!(speed(0.0, a, 3.0), 120.0);
//! assert_eq!(position(0.0, a, 3.0, 0.0), 180.0);
//! ```

/// Degrees in one full turn of the wheel.
pub const FULL_TURN: f64 = 360.0;

/// Wraps an angle into `[0, 360)`.
///
/// Negative angles wrap around instead of being truncated toward zero, so
/// `-90` becomes `270`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Returns the wheel angle after `t` seconds, normalized into `[0, 360)`.
///
/// Computes `angle0 + v0*t + a*t²/2`.
#[inline]
pub fn position(v0: f64, a: f64, t: f64, angle0: f64) -> f64 {
    normalize_angle(displacement(v0, a, t) + angle0)
}

/// Returns the signed distance travelled after `t` seconds, without wrapping.
#[inline]
pub fn displacement(v0: f64, a: f64, t: f64) -> f64 {
    v0 * t + a * t * t / 2.0
}

/// Returns the speed after `t` seconds: `v0 + a*t`.
#[inline]
pub fn speed(v0: f64, a: f64, t: f64) -> f64 {
    v0 + a * t
}

/// Returns the constant acceleration that takes `v0` to `v1` over `duration`.
///
/// A zero-length (or negative) duration yields `0`. This is a defined result
/// for degenerate phases, not an error.
#[inline]
pub fn acceleration_between(v0: f64, duration: f64, v1: f64) -> f64 {
    if duration > 0.0 {
        (v1 - v0) / duration
    } else {
        0.0
    }
}

/// Linearly maps `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Values outside the input range extrapolate. A collapsed input range
/// returns `out_min`.
#[inline]
pub fn interpolate(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    let span = in_max - in_min;
    if span == 0.0 {
        return out_min;
    }
    out_min + (x - in_min) * (out_max - out_min) / span
}

/// Returns the zero-based sector under the pointer for a wheel at `angle`.
///
/// Sectors are laid out counter-clockwise from the pointer, so the index
/// decreases as the wheel turns forward. Returns `None` when `sectors` is 0.
///
/// ```rust
/// use spinwheel::kinematics::angle_to_sector;
///
/// assert_eq!(angle_to_sector(0.0, 6), Some(0));
/// assert_eq!(angle_to_sector(30.0, 6), Some(5));
/// assert_eq!(angle_to_sector(90.0, 4), Some(3));
/// assert_eq!(angle_to_sector(10.0, 0), None);
/// ```
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn angle_to_sector(angle: f64, sectors: usize) -> Option<usize> {
    if sectors == 0 {
        return None;
    }
    let sector_size = FULL_TURN / sectors as f64;
    let offset = FULL_TURN - normalize_angle(angle);
    let index = (offset / sector_size).floor() as usize;
    Some(index % sectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-10;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn test_position_from_rest() {
        assert!(approx_eq(position(0.0, 10.0, 2.0, 0.0), 20.0));
        assert!(approx_eq(position(5.0, 0.0, 2.0, 30.0), 40.0));
    }

    #[test]
    fn test_position_wraps_past_full_turn() {
        assert!(approx_eq(position(100.0, 0.0, 4.0, 0.0), 40.0));
        assert!(approx_eq(position(0.0, 0.0, 0.0, 720.0), 0.0));
    }

    #[test]
    fn test_position_wraps_negative() {
        assert!(approx_eq(position(-10.0, 0.0, 9.0, 0.0), 270.0));
        assert!(approx_eq(position(0.0, 0.0, 0.0, -450.0), 270.0));
    }

    #[test]
    fn test_normalize_tiny_negative() {
        let wrapped = normalize_angle(-1e-17);
        assert!((0.0..FULL_TURN).contains(&wrapped));
    }

    #[test]
    fn test_speed() {
        assert!(approx_eq(speed(10.0, -2.0, 5.0), 0.0));
        assert!(approx_eq(speed(0.0, 3.0, 2.0), 6.0));
    }

    #[test]
    fn test_acceleration_between() {
        assert!(approx_eq(acceleration_between(0.0, 4.0, 100.0), 25.0));
        assert!(approx_eq(acceleration_between(100.0, 4.0, 0.0), -25.0));
    }

    #[test]
    fn test_acceleration_zero_duration() {
        assert_eq!(acceleration_between(0.0, 0.0, 100.0), 0.0);
        assert_eq!(acceleration_between(10.0, -1.0, 0.0), 0.0);
    }

    #[test]
    fn test_interpolate() {
        assert!(approx_eq(interpolate(1.0, 1.0, 10.0, 0.5, 1.5), 0.5));
        assert!(approx_eq(interpolate(10.0, 1.0, 10.0, 0.5, 1.5), 1.5));
        assert!(approx_eq(interpolate(5.5, 1.0, 10.0, 0.5, 1.5), 1.0));
        assert!(approx_eq(interpolate(3.0, 2.0, 2.0, 7.0, 9.0), 7.0));
    }

    #[test]
    fn test_angle_to_sector_boundaries() {
        assert_eq!(angle_to_sector(0.0, 4), Some(0));
        assert_eq!(angle_to_sector(359.0, 4), Some(0));
        assert_eq!(angle_to_sector(270.0, 4), Some(1));
        assert_eq!(angle_to_sector(-90.0, 4), Some(1));
        assert_eq!(angle_to_sector(180.0, 1), Some(0));
    }
}
