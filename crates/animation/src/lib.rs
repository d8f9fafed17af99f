//! Animation core: maps elapsed wall-clock time to the cube's transform.
//!
//! # Invariants
//! - `advance` is pure; all persistent state lives in the caller-held
//!   `AnimationState` threaded through successive calls.
//! - Scale is recomputed from elapsed time every call, never accumulated.
//! - Rotations integrate `rate * dt` and may drift over very long runs.

pub mod state;

pub use state::{AnimationError, AnimationState, ROTATION_X_RATE, ROTATION_Y_RATE};
