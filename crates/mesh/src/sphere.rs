use std::f32::consts::PI;

use glam::Vec3;
use pendulum_common::{MeshData, Vertex};

use crate::error::{MeshError, require_subdivisions, require_u32};

/// Radius of the bob sphere in object space.
pub const SPHERE_RADIUS: f32 = 3.0;

/// Generate the UV-sphere vertex grid, row-major with `slices` vertices per ring.
///
/// The horizontal step is `2π / (rings - 1)` and the vertical step is
/// `π / (slices - 1)`, while the outer loop runs over rings and the inner loop
/// over slices. With `rings == slices` this yields a full latitude/longitude
/// grid from the south pole (`z = -r`) to the north pole.
pub fn sphere_vertices(rings: u32, slices: u32) -> Result<Vec<Vertex>, MeshError> {
    require_subdivisions("sphere rings", rings)?;
    require_subdivisions("sphere slices", slices)?;
    let count = require_u32("sphere vertex count", rings as u64 * slices as u64)?;

    let delta_horizontal = 2.0 * PI / (rings - 1) as f32;
    let delta_vertical = PI / (slices - 1) as f32;

    let mut vertices = Vec::with_capacity(count);
    let mut vertical = -0.5 * PI;
    for _ in 0..rings {
        let z = vertical.sin();
        let base = vertical.cos();
        let mut horizontal = 0.0_f32;
        for _ in 0..slices {
            let normal = Vec3::new(base * horizontal.cos(), base * horizontal.sin(), z);
            vertices.push(Vertex::new(normal * SPHERE_RADIUS, normal));
            horizontal += delta_horizontal;
        }
        vertical += delta_vertical;
    }
    Ok(vertices)
}

/// Two CCW triangles per grid cell, skipping the last ring and slice.
pub fn sphere_indices(rings: u32, slices: u32) -> Result<Vec<u32>, MeshError> {
    require_subdivisions("sphere rings", rings)?;
    require_subdivisions("sphere slices", slices)?;
    require_u32("sphere vertex count", rings as u64 * slices as u64)?;
    let count = require_u32(
        "sphere index count",
        6 * (rings as u64 - 1) * (slices as u64 - 1),
    )?;

    let mut indices = Vec::with_capacity(count);
    for ring in 0..rings - 1 {
        for slice in 0..slices - 1 {
            let here = slice + ring * slices;
            let next_ring = slice + (ring + 1) * slices;

            indices.extend_from_slice(&[here, here + 1, next_ring]);
            indices.extend_from_slice(&[here + 1, next_ring + 1, next_ring]);
        }
    }
    Ok(indices)
}

/// Bob sphere of radius [`SPHERE_RADIUS`] centred on the origin.
pub fn build_sphere(rings: u32, slices: u32) -> Result<MeshData, MeshError> {
    let vertices = sphere_vertices(rings, slices)?;
    let indices = sphere_indices(rings, slices)?;
    tracing::debug!(
        rings,
        slices,
        vertices = vertices.len(),
        indices = indices.len(),
        "built sphere mesh"
    );
    Ok(MeshData { vertices, indices })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Vec3, expected: Vec3) {
        assert!(
            actual.abs_diff_eq(expected, 1e-5),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn golden_three_by_three() {
        let mesh = build_sphere(3, 3).unwrap();
        let expected = [
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(0.0, 0.0, -3.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(-3.0, 0.0, 0.0),
            Vec3::new(3.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, 3.0),
            Vec3::new(0.0, 0.0, 3.0),
        ];
        assert_eq!(mesh.vertices.len(), expected.len());
        for (v, e) in mesh.vertices.iter().zip(expected) {
            assert_close(v.position, e);
            assert_close(v.normal, e / SPHERE_RADIUS);
        }

        #[rustfmt::skip]
        let indices = vec![
            0, 1, 3,  1, 4, 3,
            1, 2, 4,  2, 5, 4,
            3, 4, 6,  4, 7, 6,
            4, 5, 7,  5, 8, 7,
        ];
        assert_eq!(mesh.indices, indices);
    }

    #[test]
    fn golden_minimal() {
        let mesh = build_sphere(2, 2).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 1, 3, 2]);
        assert_close(mesh.vertices[0].position, Vec3::new(0.0, 0.0, -3.0));
        assert_close(mesh.vertices[3].position, Vec3::new(0.0, 0.0, 3.0));
    }

    #[test]
    fn every_vertex_on_radius() {
        let vertices = sphere_vertices(17, 23).unwrap();
        for v in &vertices {
            assert!((v.position.length() - SPHERE_RADIUS).abs() < 1e-4);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
            assert_close(v.position, v.normal * SPHERE_RADIUS);
        }
    }

    #[test]
    fn counts_and_bounds() {
        for (rings, slices) in [(2, 2), (4, 3), (3, 7), (20, 20)] {
            let mesh = build_sphere(rings, slices).unwrap();
            assert_eq!(mesh.vertices.len(), (rings * slices) as usize);
            assert_eq!(
                mesh.indices.len(),
                (6 * (rings - 1) * (slices - 1)) as usize
            );
            assert!(mesh.is_well_formed());
        }
    }

    #[test]
    fn bit_reproducible() {
        let a = build_sphere(31, 29).unwrap();
        let b = build_sphere(31, 29).unwrap();
        assert_eq!(a.indices, b.indices);
        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_eq!(
                va.position.to_array().map(f32::to_bits),
                vb.position.to_array().map(f32::to_bits)
            );
            assert_eq!(
                va.normal.to_array().map(f32::to_bits),
                vb.normal.to_array().map(f32::to_bits)
            );
        }
    }

    #[test]
    fn seam_is_not_wrapped() {
        let slices = 5;
        let indices = sphere_indices(5, slices).unwrap();
        // No triangle joins the last slice back to slice 0 of the same ring.
        for tri in indices.chunks(3) {
            let cols: Vec<u32> = tri.iter().map(|i| i % slices).collect();
            assert!(!(cols.contains(&0) && cols.contains(&(slices - 1))));
        }
    }

    #[test]
    fn rejects_too_few_subdivisions() {
        assert_eq!(
            build_sphere(1, 10),
            Err(MeshError::TooFewSubdivisions {
                what: "sphere rings",
                got: 1
            })
        );
        assert_eq!(
            sphere_indices(10, 0),
            Err(MeshError::TooFewSubdivisions {
                what: "sphere slices",
                got: 0
            })
        );
    }

    #[test]
    fn rejects_index_overflow() {
        assert!(matches!(
            sphere_indices(u32::MAX, u32::MAX),
            Err(MeshError::TooManyVertices { .. })
        ));
    }
}
