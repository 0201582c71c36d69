//! Rendering Adapter: everything a backend needs to draw one frame.
//!
//! # Invariants
//! - Renderers read a [`FrameState`]; they never mutate the simulation.
//! - Per frame the camera moves first, then physics steps, then transforms
//!   are derived from the new bob position.
//! - Degenerate spring vectors yield a defined transform, never NaN.

mod camera;
mod renderer;
mod session;
mod spring;

pub use camera::{CameraError, FAR_PLANE, FIELD_OF_VIEW, NEAR_PLANE, OrbitCamera};
pub use renderer::{DebugTextRenderer, Renderer};
pub use session::{FrameState, Session};
pub use spring::{DEGENERATE_LENGTH, SpringBasis, spring_transform};

pub fn crate_info() -> &'static str {
    "pendulum-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
