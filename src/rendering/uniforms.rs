//! GPU-side layouts of the per-frame and per-draw uniform blocks.
//!
//! Both structs mirror the `Camera` and `Draw` blocks of the voxel face shader
//! byte for byte.

use cgmath::{Matrix4, SquareMatrix};

use crate::shading::AtlasBand;

/// Camera matrices shared by every draw call of a frame.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod, so matrices are stored as plain arrays
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
}

impl CameraUniform {
    /// Creates a camera uniform with identity matrices.
    pub fn new() -> Self {
        Self {
            view: Matrix4::identity().into(),
            projection: Matrix4::identity().into(),
        }
    }

    /// Replaces the view and projection matrices.
    pub fn update(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>) {
        self.view = view.into();
        self.projection = projection.into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Parameters of a single draw call.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    model: [[f32; 4]; 4],
    voxel_type_id: i32,
    band: u32,
    _padding: [u32; 2],
}

impl DrawUniform {
    /// Packs a model matrix, voxel type and atlas band.
    pub fn new(model: Matrix4<f32>, voxel_type_id: i32, band: AtlasBand) -> Self {
        Self {
            model: model.into(),
            voxel_type_id,
            band: band.index(),
            _padding: [0; 2],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_the_shader_blocks() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 128);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 80);
    }

    #[test]
    fn draw_uniform_carries_band_index() {
        let draw = DrawUniform::new(Matrix4::identity(), 7, AtlasBand::Side);
        let words: &[u32] = bytemuck::cast_slice(std::slice::from_ref(&draw));

        assert_eq!(words[16], 7);
        assert_eq!(words[17], 1);
    }
}
