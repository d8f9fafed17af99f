//! wgpu render backend for the spinning cube demo.
//!
//! Renders a single lit unit cube whose model matrix the host recomputes
//! each frame from its animation state.
//!
//! # Invariants
//! - The renderer never owns or mutates animation state.
//! - GPU resources (mesh, pipeline, uniforms) are uploaded once at startup;
//!   only the uniform buffer is written per frame.

mod camera;
mod gpu;
mod shaders;

pub use camera::SceneCamera;
pub use gpu::CubeRenderer;
