//! Shared types for the spring pendulum workspace.
//!
//! # Invariants
//! - Types here are plain values; no crate in the workspace shares them mutably.
//! - Geometry is expressed in glam column-vector convention.

pub mod config;
pub mod types;

pub use config::{ConfigError, OrbitSteps, SceneConfig};
pub use types::{MeshData, OrbitDelta, Ray, Vertex};
