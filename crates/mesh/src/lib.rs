//! Procedural meshes: the bob sphere and the spring cylinder.
//!
//! # Invariants
//! - Generators are pure: identical counts give bit-identical output.
//! - Every index is below the vertex count; triangles are listed CCW.
//! - The last subdivision does not wrap back to the first, so both meshes
//!   keep a seam and the sphere poles stay open.

mod cylinder;
mod error;
mod sphere;

pub use cylinder::{build_cylinder, cylinder_indices, cylinder_vertices};
pub use error::MeshError;
pub use sphere::{SPHERE_RADIUS, build_sphere, sphere_indices, sphere_vertices};

pub fn crate_info() -> &'static str {
    "pendulum-mesh v0.1.0"
}
