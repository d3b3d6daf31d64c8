//! Side-face mesh used by the viewer.
//!
//! Mesh generation proper (culling, chunking) lives outside this crate; this is
//! the fixed four-quad mesh of a unit voxel's side faces, authored with the
//! minimum corner at the origin and full-face UVs.

use wgpu::Device;

use super::{
    buffer_state::BufferState, vertex::Vertex, SIDE_FACE_INDEX_BUFFER_NAME,
    SIDE_FACE_VERTEX_BUFFER_NAME,
};

/// The side faces of a unit voxel: +Z, -Z, +X, -X, counter-clockwise from outside.
#[rustfmt::skip]
const UNIT_CUBE_SIDE_VERTICES: [Vertex; 16] = [
    // +Z
    Vertex::new([0.0, 0.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, 0.0, 1.0], [1.0, 1.0]),
    Vertex::new([1.0, 1.0, 1.0], [1.0, 0.0]),
    Vertex::new([0.0, 1.0, 1.0], [0.0, 0.0]),
    // -Z
    Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0]),
    Vertex::new([0.0, 0.0, 0.0], [1.0, 1.0]),
    Vertex::new([0.0, 1.0, 0.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0]),
    // +X
    Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0]),
    Vertex::new([1.0, 0.0, 0.0], [1.0, 1.0]),
    Vertex::new([1.0, 1.0, 0.0], [1.0, 0.0]),
    Vertex::new([1.0, 1.0, 1.0], [0.0, 0.0]),
    // -X
    Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0]),
    Vertex::new([0.0, 0.0, 1.0], [1.0, 1.0]),
    Vertex::new([0.0, 1.0, 1.0], [1.0, 0.0]),
    Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0]),
];

/// Two triangles per quad.
const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

/// CPU-side vertex and index data of a side-face mesh.
#[derive(Clone, Debug)]
pub struct SideFaceMesh {
    /// Vertex data, four per quad
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices into `vertices`
    pub indices: Vec<u32>,
}

impl SideFaceMesh {
    /// The four side quads of a unit voxel.
    pub fn unit_cube_sides() -> Self {
        let vertices = UNIT_CUBE_SIDE_VERTICES.to_vec();
        let indices = (0..vertices.len() as u32 / 4)
            .flat_map(|quad| QUAD_INDICES.iter().map(move |index| quad * 4 + index))
            .collect();

        Self { vertices, indices }
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Uploads the mesh into the named vertex and index buffers.
    pub(crate) fn upload(&self, device: &Device, buffer_state: &mut BufferState) {
        buffer_state.create_buffer_init(
            device,
            SIDE_FACE_VERTEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(SIDE_FACE_VERTEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        buffer_state.create_buffer_init(
            device,
            SIDE_FACE_INDEX_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(SIDE_FACE_INDEX_BUFFER_NAME),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, Point3, Vector3};

    use super::*;
    use crate::shading::VoxelVertex;

    #[test]
    fn four_quads_with_full_face_uvs() {
        let mesh = SideFaceMesh::unit_cube_sides();

        assert_eq!(mesh.vertices.len(), 16);
        assert_eq!(mesh.index_count(), 24);
        for vertex in &mesh.vertices {
            let vertex: VoxelVertex = (*vertex).into();
            assert!((0.0..=1.0).contains(&vertex.tex_coord.x));
            assert!((0.0..=1.0).contains(&vertex.tex_coord.y));
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let mesh = SideFaceMesh::unit_cube_sides();
        let centre = Point3::new(0.5, 0.5, 0.5);

        for triangle in mesh.indices.chunks(3) {
            let [a, b, c] = [triangle[0], triangle[1], triangle[2]]
                .map(|index| VoxelVertex::from(mesh.vertices[index as usize]).position);
            let normal = (b - a).cross(c - a);
            let outward: Vector3<f32> = a - centre;

            assert!(normal.dot(outward) > 0.0, "inward triangle {triangle:?}");
            assert_eq!(normal.y, 0.0);
        }
    }
}
