//! Vertex data structures and layouts for voxel face rendering.
//!
//! This module defines the vertex format consumed by `vs_main` in the voxel
//! face shader.

use crate::shading::VoxelVertex;

/// A vertex in the voxel face pipeline.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
///
/// Total size: 20 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in voxel-local space, minimum corner at the origin
    position: [f32; 3],
    /// Authored face UV (normalized 0.0-1.0)
    tex_coords: [f32; 2],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Voxel-local position
    /// * `tex_coords` - Full-face UV coordinates
    pub const fn new(position: [f32; 3], tex_coords: [f32; 2]) -> Self {
        Self {
            position,
            tex_coords,
        }
    }

    /// Returns the vertex buffer layout description for the shader pipeline.
    ///
    /// # Shader Attributes
    /// - `location = 0`: position (vec3<f32>)
    /// - `location = 1`: tex_coord (vec2<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

impl From<Vertex> for VoxelVertex {
    fn from(vertex: Vertex) -> Self {
        VoxelVertex::new(vertex.position, vertex.tex_coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_struct_size() {
        let layout = Vertex::desc();
        assert_eq!(std::mem::size_of::<Vertex>(), 20);
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].offset, 12);
    }

    #[test]
    fn converts_to_stage_input() {
        let vertex: VoxelVertex = Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0]).into();
        assert_eq!(vertex, VoxelVertex::new([1.0, 0.0, 1.0], [0.0, 1.0]));
    }
}
