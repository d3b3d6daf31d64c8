//! # Geometry Transform Stage
//!
//! Maps a voxel-local vertex into clip space and forwards its face UV untouched.
//!
//! Voxel meshes are authored with their minimum corner at the local origin, but
//! they are rendered pivoting on their centre, so every position is recentred by
//! [`VOXEL_CENTER_OFFSET`] before any matrix is applied.
//!
//! The stage is a pure function of its inputs. Singular or non-finite matrices
//! are not rejected: they produce degenerate or NaN clip positions, which the
//! rasterizer simply discards.

use cgmath::{Matrix4, Point3, SquareMatrix, Vector2, Vector3, Vector4};

/// Offset subtracted from every local position so a unit voxel pivots on its centre.
///
/// Assumes unit-cube voxels whose minimum corner sits at the local origin.
pub const VOXEL_CENTER_OFFSET: Vector3<f32> = Vector3::new(0.5, 0.5, 0.5);

/// Per-vertex attributes consumed by the stage.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VoxelVertex {
    /// Position in voxel-local space
    pub position: Point3<f32>,
    /// Authored face UV in `[0, 1] x [0, 1]`
    pub tex_coord: Vector2<f32>,
}

impl VoxelVertex {
    /// Creates a vertex from raw position and UV components.
    pub fn new(position: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position: position.into(),
            tex_coord: tex_coord.into(),
        }
    }
}

/// The three matrices supplied once per draw call.
///
/// Composition order is always `projection * view * model`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformSet {
    /// Places the voxel instance in the world
    pub model: Matrix4<f32>,
    /// World to camera transform
    pub view: Matrix4<f32>,
    /// Camera to clip transform
    pub projection: Matrix4<f32>,
}

impl TransformSet {
    /// Bundles the matrices for one draw call.
    pub fn new(model: Matrix4<f32>, view: Matrix4<f32>, projection: Matrix4<f32>) -> Self {
        Self {
            model,
            view,
            projection,
        }
    }

    /// A transform set where every matrix is the identity.
    pub fn identity() -> Self {
        Self::new(
            Matrix4::identity(),
            Matrix4::identity(),
            Matrix4::identity(),
        )
    }

    /// Returns a copy with a different model matrix, keeping the camera matrices.
    ///
    /// This is how consecutive draw calls that share a camera differ.
    pub fn with_model(&self, model: Matrix4<f32>) -> Self {
        Self { model, ..*self }
    }
}

/// Output of the stage: clip-space position plus the varying UV.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TransformedVertex {
    /// Homogeneous clip-space position
    pub clip_position: Vector4<f32>,
    /// Face UV, passed through for interpolation
    pub uv: Vector2<f32>,
}

/// Runs the geometry transform stage for a single vertex.
///
/// Computes `projection * view * model * (position - (0.5, 0.5, 0.5), 1)`; the
/// recentring always happens before any matrix is applied.
pub fn transform_vertex(vertex: &VoxelVertex, transforms: &TransformSet) -> TransformedVertex {
    let local = (vertex.position - VOXEL_CENTER_OFFSET).to_homogeneous();
    let clip_position = transforms.projection * transforms.view * transforms.model * local;

    TransformedVertex {
        clip_position,
        uv: vertex.tex_coord,
    }
}

/// Model matrix that places a voxel mesh at `offset` (chunk or marker placement).
pub fn translation_model(offset: Vector3<f32>) -> Matrix4<f32> {
    Matrix4::from_translation(offset)
}

/// Model matrix with a uniform scale and a translation in the fourth column.
///
/// Used for small cubes (debris, previews) drawn with the voxel face stages.
pub fn scaled_model(position: Vector3<f32>, scale: f32) -> Matrix4<f32> {
    Matrix4::from_translation(position) * Matrix4::from_scale(scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Vector4<f32>, expected: Vector4<f32>) {
        let delta = actual - expected;
        assert!(
            delta.x.abs() < 1e-5
                && delta.y.abs() < 1e-5
                && delta.z.abs() < 1e-5
                && delta.w.abs() < 1e-5,
            "{actual:?} != {expected:?}"
        );
    }

    #[test]
    fn identity_transforms_only_recentre() {
        let vertex = VoxelVertex::new([1.0, 0.0, 1.0], [0.25, 0.75]);
        let out = transform_vertex(&vertex, &TransformSet::identity());

        assert_close(out.clip_position, Vector4::new(0.5, -0.5, 0.5, 1.0));
        assert_eq!(out.uv, Vector2::new(0.25, 0.75));
    }

    #[test]
    fn recentring_happens_before_the_model_matrix() {
        let model = scaled_model(Vector3::new(10.0, 0.0, 0.0), 2.0);
        let transforms = TransformSet::identity().with_model(model);
        let vertex = VoxelVertex::new([1.0, 1.0, 1.0], [0.0, 0.0]);

        let out = transform_vertex(&vertex, &transforms);
        assert_close(out.clip_position, Vector4::new(11.0, 1.0, 1.0, 1.0));

        let unrecentred = model * vertex.position.to_homogeneous();
        assert_ne!(out.clip_position, unrecentred);

        let recentred_after = unrecentred - VOXEL_CENTER_OFFSET.extend(0.0);
        assert!((out.clip_position.x - recentred_after.x).abs() > 0.1);
    }

    #[test]
    fn translation_moves_the_voxel_centre() {
        let transforms =
            TransformSet::identity().with_model(translation_model(Vector3::new(3.0, 4.0, 5.0)));
        let centre = VoxelVertex::new([0.5, 0.5, 0.5], [0.5, 0.5]);

        let out = transform_vertex(&centre, &transforms);
        assert_close(out.clip_position, Vector4::new(3.0, 4.0, 5.0, 1.0));
    }

    #[test]
    fn composition_order_is_projection_view_model() {
        let model = translation_model(Vector3::new(1.0, 0.0, 0.0));
        let view = Matrix4::from_scale(2.0);
        let projection = Matrix4::from_translation(Vector3::new(0.0, 0.0, -1.0));
        let vertex = VoxelVertex::new([0.5, 0.5, 0.5], [0.0, 1.0]);

        let out = transform_vertex(&vertex, &TransformSet::new(model, view, projection));
        // Model first (x = 1), then view (x = 2), then projection (z = -1).
        assert_close(out.clip_position, Vector4::new(2.0, 0.0, -1.0, 1.0));
    }

    #[test]
    fn non_finite_matrices_propagate_without_failing() {
        let mut model = Matrix4::identity();
        model.x.x = f32::NAN;
        let vertex = VoxelVertex::new([1.0, 1.0, 1.0], [1.0, 1.0]);

        let out = transform_vertex(&vertex, &TransformSet::identity().with_model(model));
        assert!(out.clip_position.x.is_nan());
        assert_eq!(out.uv, Vector2::new(1.0, 1.0));
    }

    #[test]
    fn repeated_invocations_are_bit_identical() {
        let transforms = TransformSet::new(
            translation_model(Vector3::new(0.3, -7.1, 2.9)),
            Matrix4::from_angle_y(cgmath::Deg(33.0)),
            cgmath::perspective(cgmath::Deg(70.0), 1.6, 0.1, 100.0),
        );
        let vertex = VoxelVertex::new([0.0, 1.0, 0.0], [0.1, 0.9]);

        let first = transform_vertex(&vertex, &transforms);
        let second = transform_vertex(&vertex, &transforms);
        assert_eq!(first.clip_position.x.to_bits(), second.clip_position.x.to_bits());
        assert_eq!(first.clip_position.y.to_bits(), second.clip_position.y.to_bits());
        assert_eq!(first.clip_position.z.to_bits(), second.clip_position.z.to_bits());
        assert_eq!(first.clip_position.w.to_bits(), second.clip_position.w.to_bits());
        assert_eq!(first.uv, second.uv);
    }
}
