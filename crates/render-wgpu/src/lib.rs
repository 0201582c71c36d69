//! wgpu render backend for the spring pendulum.
//!
//! Draws the bob sphere and the spring cylinder from prebuilt meshes, each
//! placed by its model matrix from the frame state and lit by one point light.
//!
//! # Invariants
//! - Renderer never mutates the session.
//! - Mesh buffers are uploaded once; only uniforms and instances change per frame.

mod gpu;
mod shaders;

pub use gpu::PendulumRenderer;
