use std::f32::consts::PI;

use glam::Vec3;
use pendulum_common::{MeshData, Vertex};

use crate::error::{MeshError, require_subdivisions, require_u32};

/// Unit-radius open tube spanning `y = 0` to `y = 1`.
///
/// Vertex `i` lies on the `y = 0` ring and vertex `i + sectors` directly
/// above it on the `y = 1` ring. The angle step is `2π / (sectors - 1)`.
pub fn cylinder_vertices(sectors: u32) -> Result<Vec<Vertex>, MeshError> {
    require_subdivisions("cylinder sectors", sectors)?;
    let count = require_u32("cylinder vertex count", 2 * sectors as u64)?;

    let delta_angle = 2.0 * PI / (sectors - 1) as f32;
    let mut ring = Vec::with_capacity(sectors as usize);
    let mut angle = 0.0_f32;
    for _ in 0..sectors {
        let normal = Vec3::new(angle.cos(), 0.0, angle.sin());
        ring.push(Vertex::new(normal, normal));
        angle += delta_angle;
    }

    let mut vertices = Vec::with_capacity(count);
    vertices.extend_from_slice(&ring);
    vertices.extend(ring.iter().map(|v| Vertex {
        position: Vec3::new(v.position.x, 1.0, v.position.z),
        ..*v
    }));
    Ok(vertices)
}

/// Two CCW triangles per sector between the rings.
pub fn cylinder_indices(sectors: u32) -> Result<Vec<u32>, MeshError> {
    require_subdivisions("cylinder sectors", sectors)?;
    require_u32("cylinder vertex count", 2 * sectors as u64)?;
    let count = require_u32("cylinder index count", 6 * (sectors as u64 - 1))?;

    let mut indices = Vec::with_capacity(count);
    for sector in 0..sectors - 1 {
        let top = sector + sectors;
        indices.extend_from_slice(&[sector, sector + 1, top]);
        indices.extend_from_slice(&[sector + 1, top + 1, top]);
    }
    Ok(indices)
}

/// Spring cylinder, stretched into place by the spring transform at draw time.
pub fn build_cylinder(sectors: u32) -> Result<MeshData, MeshError> {
    let vertices = cylinder_vertices(sectors)?;
    let indices = cylinder_indices(sectors)?;
    tracing::debug!(
        sectors,
        vertices = vertices.len(),
        indices = indices.len(),
        "built cylinder mesh"
    );
    Ok(MeshData { vertices, indices })
}
