//! Solid meshes for instanced drawing.
//!
//! ```ignore
//! Mesh::sphere(1.0, 16, 16) // round particles
//! Mesh::cube(1.0)           // angular particles
//! Mesh::octahedron(1.2)     // the topper
//! ```

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Mesh vertex with a normal for lighting.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.to_array(),
            normal: normal.to_array(),
        }
    }
}

/// Indexed triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    /// UV sphere with smooth normals.
    ///
    /// * `segments` - Slices around the Y axis (at least 3)
    /// * `rings` - Stacks from pole to pole (at least 2)
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::with_capacity(((segments + 1) * (rings + 1)) as usize);
        let mut indices = Vec::with_capacity((segments * rings * 6) as usize);

        for ring in 0..=rings {
            let phi = ring as f32 / rings as f32 * PI;
            for segment in 0..=segments {
                let theta = segment as f32 / segments as f32 * TAU;
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
                vertices.push(Vertex::new(normal * radius, normal));
            }
        }

        let stride = segments + 1;
        for ring in 0..rings {
            for segment in 0..segments {
                let a = ring * stride + segment;
                let b = a + stride;
                indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
            }
        }

        Self { vertices, indices }
    }

    /// Axis-aligned cube with flat normals.
    pub fn cube(size: f32) -> Self {
        let h = size / 2.0;
        // (normal, up, right) with right x up == normal so faces wind CCW
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::NEG_Z),
            (Vec3::NEG_X, Vec3::Y, Vec3::Z),
            (Vec3::Y, Vec3::NEG_Z, Vec3::X),
            (Vec3::NEG_Y, Vec3::Z, Vec3::X),
            (Vec3::Z, Vec3::Y, Vec3::X),
            (Vec3::NEG_Z, Vec3::Y, Vec3::NEG_X),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, up, right) in faces {
            let base = vertices.len() as u32;
            let center = normal * h;
            for (u, v) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                vertices.push(Vertex::new(center + right * (u * h) + up * (v * h), normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        Self { vertices, indices }
    }

    /// Regular octahedron with its tips on the axes, flat normals.
    pub fn octahedron(radius: f32) -> Self {
        let tips = [Vec3::Y, Vec3::NEG_Y];
        let ring = [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(24);
        for tip in tips {
            for i in 0..4 {
                let (a, b) = (ring[i], ring[(i + 1) % 4]);
                let (a, b) = if tip.y > 0.0 { (b, a) } else { (a, b) };
                let normal = (a + b + tip).normalize();
                let base = vertices.len() as u32;
                for corner in [tip, a, b] {
                    vertices.push(Vertex::new(corner * radius, normal));
                }
                indices.extend_from_slice(&[base, base + 1, base + 2]);
            }
        }

        Self { vertices, indices }
    }

    /// Number of indices to draw.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_counter_clockwise_outward(mesh: &Mesh) {
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            // Degenerate pole triangles of the sphere have no area
            if face_normal.length_squared() > 1e-10 {
                assert!(face_normal.dot(centroid) > 0.0, "inward triangle {tri:?}");
            }
        }
    }

    #[test]
    fn test_sphere_counts_and_radius() {
        let mesh = Mesh::sphere(2.0, 16, 16);
        assert_eq!(mesh.vertices.len(), 17 * 17);
        assert_eq!(mesh.index_count(), 16 * 16 * 6);
        for v in &mesh.vertices {
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-4);
        }
        assert_counter_clockwise_outward(&mesh);
    }

    #[test]
    fn test_cube() {
        let mesh = Mesh::cube(1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.index_count(), 36);
        for v in &mesh.vertices {
            assert!(Vec3::from(v.position).abs().max_element() <= 0.5 + 1e-6);
        }
        assert_counter_clockwise_outward(&mesh);
    }

    #[test]
    fn test_octahedron() {
        let mesh = Mesh::octahedron(1.2);
        assert_eq!(mesh.index_count(), 24);
        assert_counter_clockwise_outward(&mesh);
    }

    #[test]
    fn test_vertex_layout_size() {
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
