use glam::{EulerRot, Mat4, Quat, Vec3};
use std::f64::consts::{FRAC_PI_2, PI};

/// Rotation rate around X in radians per second (half a turn per second).
pub const ROTATION_X_RATE: f64 = PI;

/// Rotation rate around Y in radians per second (quarter of a turn per second).
pub const ROTATION_Y_RATE: f64 = FRAC_PI_2;

/// Errors from advancing the animation.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The host handed us a timestamp that is not finite or runs backwards.
    /// Never clamped: a regressing clock means a host-loop bug, and silently
    /// swallowing it would corrupt the accumulated rotation.
    #[error("invalid timestamp: {millis} ms is not finite or precedes the previous frame at {previous_seconds} s")]
    InvalidTimestamp { millis: f64, previous_seconds: f64 },
}

/// Animation state for the single cube, threaded through successive frames.
///
/// Rotations are in radians and unbounded; wrapping modulo 2π is a display
/// concern, not maintained here. Scale is always `1 + sin(elapsed)` and so
/// stays within `[0, 2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationState {
    /// Seconds since the animation loop began. Non-decreasing across frames.
    pub elapsed: f64,
    /// Accumulated rotation around the X axis, radians.
    pub rotation_x: f64,
    /// Accumulated rotation around the Y axis, radians.
    pub rotation_y: f64,
    /// Uniform scale, recomputed each frame from elapsed time.
    pub scale: f64,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale: 1.0,
        }
    }
}

impl AnimationState {
    /// State at the start of the animation loop.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the animation to `current_time_ms` milliseconds since loop
    /// start, returning the new state. Pure: the receiver is untouched.
    ///
    /// Rotations integrate their per-second rate over the frame delta; scale
    /// is an absolute function of the new elapsed time. A zero delta (same
    /// timestamp twice) leaves rotations unchanged and recomputes the same
    /// scale.
    pub fn advance(&self, current_time_ms: f64) -> Result<Self, AnimationError> {
        let elapsed = current_time_ms / 1000.0;
        if !elapsed.is_finite() || elapsed < self.elapsed {
            return Err(AnimationError::InvalidTimestamp {
                millis: current_time_ms,
                previous_seconds: self.elapsed,
            });
        }

        let dt = elapsed - self.elapsed;
        Ok(Self {
            elapsed,
            rotation_x: self.rotation_x + ROTATION_X_RATE * dt,
            rotation_y: self.rotation_y + ROTATION_Y_RATE * dt,
            scale: 1.0 + elapsed.sin(),
        })
    }

    /// Model matrix to apply to the cube: uniform scale, then X/Y rotation,
    /// no translation. f32 precision is enough at the GPU boundary.
    pub fn model_matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_x as f32,
            self.rotation_y as f32,
            0.0,
        );
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale as f32),
            rotation,
            Vec3::ZERO,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOL,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn initial_state() {
        let s = AnimationState::new();
        assert_eq!(s.elapsed, 0.0);
        assert_eq!(s.rotation_x, 0.0);
        assert_eq!(s.rotation_y, 0.0);
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn one_second_of_rotation() {
        let s = AnimationState::new().advance(1000.0).unwrap();
        assert_close(s.elapsed, 1.0);
        assert_close(s.rotation_x, PI);
        assert_close(s.rotation_y, FRAC_PI_2);
        assert_close(s.scale, 1.0 + 1.0_f64.sin());
    }

    #[test]
    fn second_frame_accumulates_rotation() {
        let s = AnimationState::new()
            .advance(1000.0)
            .unwrap()
            .advance(2000.0)
            .unwrap();
        assert_close(s.elapsed, 2.0);
        assert_close(s.rotation_x, 2.0 * PI);
        assert_close(s.rotation_y, PI);
        assert_close(s.scale, 1.0 + 2.0_f64.sin());
    }

    #[test]
    fn rotation_depends_only_on_delta() {
        let start = AnimationState {
            elapsed: 3.25,
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale: 1.0,
        };
        let s = start.advance(7750.0).unwrap();
        assert_close(s.rotation_x, PI * 4.5);
        assert_close(s.rotation_y, FRAC_PI_2 * 4.5);
    }

    #[test]
    fn scale_is_path_independent() {
        // Many small steps vs one big step: scale only depends on the final
        // elapsed time, unlike the integrated rotations.
        let mut stepped = AnimationState::new();
        for ms in (100..=5000).step_by(100) {
            stepped = stepped.advance(ms as f64).unwrap();
        }
        let direct = AnimationState::new().advance(5000.0).unwrap();
        assert_close(stepped.scale, direct.scale);
        assert_close(stepped.scale, 1.0 + 5.0_f64.sin());
    }

    #[test]
    fn scale_stays_within_bounds() {
        let mut s = AnimationState::new();
        for ms in (0..=100_000).step_by(37) {
            s = s.advance(ms as f64).unwrap();
            assert!((0.0..=2.0).contains(&s.scale), "scale {} out of range", s.scale);
        }
    }

    #[test]
    fn zero_delta_is_idempotent() {
        let first = AnimationState::new().advance(1234.0).unwrap();
        let second = first.advance(1234.0).unwrap();
        assert_eq!(first.rotation_x, second.rotation_x);
        assert_eq!(first.rotation_y, second.rotation_y);
        assert_eq!(first.scale, second.scale);
    }

    #[test]
    fn first_frame_at_zero_is_a_no_op() {
        let s = AnimationState::new().advance(0.0).unwrap();
        assert_eq!(s.rotation_x, 0.0);
        assert_eq!(s.rotation_y, 0.0);
        assert_eq!(s.scale, 1.0);
    }

    #[test]
    fn clock_regression_is_rejected() {
        let s = AnimationState::new().advance(2000.0).unwrap();
        let err = s.advance(1500.0).unwrap_err();
        assert!(matches!(err, AnimationError::InvalidTimestamp { .. }));
        // The old state is still usable afterwards.
        let retried = s.advance(2500.0).unwrap();
        assert_close(retried.elapsed, 2.5);
    }

    #[test]
    fn non_finite_timestamps_are_rejected() {
        let s = AnimationState::new();
        assert!(s.advance(f64::NAN).is_err());
        assert!(s.advance(f64::INFINITY).is_err());
        assert!(s.advance(-1.0).is_err());
    }

    #[test]
    fn model_matrix_scales_uniformly() {
        let s = AnimationState {
            elapsed: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            scale: 2.0,
        };
        let m = s.model_matrix();
        let p = m.transform_point3(glam::Vec3::new(1.0, 0.0, 0.0));
        assert!((p.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn model_matrix_has_no_translation() {
        let s = AnimationState::new().advance(4321.0).unwrap();
        let m = s.model_matrix();
        let origin = m.transform_point3(glam::Vec3::ZERO);
        assert!(origin.length() < 1e-6);
    }
}
