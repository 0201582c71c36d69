use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Mesh vertex: object-space position plus unit normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Static triangle-list geometry in object space.
///
/// Every index is `< vertices.len()` and `indices.len() % 3 == 0`.
/// Built once at startup and never mutated afterwards; apparent pose only
/// changes through the model transform applied at draw time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the index-buffer invariants.
    pub fn is_well_formed(&self) -> bool {
        self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }
}

/// World-space ray. `direction` is not normalized.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// `origin + direction * t`.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Per-frame orbit-camera change produced by the input layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrbitDelta {
    pub distance: f32,
    pub angle: f32,
}

impl OrbitDelta {
    pub const NONE: Self = Self {
        distance: 0.0,
        angle: 0.0,
    };

    pub fn new(distance: f32, angle: f32) -> Self {
        Self { distance, angle }
    }

    pub fn is_zero(&self) -> bool {
        self.distance == 0.0 && self.angle == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_point_at_scales_unnormalized_direction() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(ray.point_at(3.0), Vec3::new(1.0, 6.0, 0.0));
    }

    #[test]
    fn well_formed_mesh() {
        let v = Vertex::new(Vec3::ZERO, Vec3::Y);
        let mesh = MeshData {
            vertices: vec![v, v, v],
            indices: vec![0, 1, 2],
        };
        assert!(mesh.is_well_formed());
        assert_eq!(mesh.triangle_count(), 1);

        let broken = MeshData {
            vertices: vec![v, v],
            indices: vec![0, 1, 2],
        };
        assert!(!broken.is_well_formed());
    }

    #[test]
    fn orbit_delta_default_is_zero() {
        assert!(OrbitDelta::default().is_zero());
        assert_eq!(OrbitDelta::default(), OrbitDelta::NONE);
        assert!(!OrbitDelta::new(0.4, 0.0).is_zero());
    }
}
