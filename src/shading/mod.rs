//! # Voxel Face Shading
//!
//! The two per-invocation stages that texture a voxel face, written as plain
//! functions so they can run without a graphics context:
//!
//! * [`geometry`] - recentres a voxel-local vertex and projects it to clip space
//! * [`sampling`] - picks the face band of the voxel type's atlas layer and samples it
//! * [`atlas`] - the band layout both the stage and the asset packer agree on
//!
//! The WGSL shader used by [`crate::rendering`] implements the same arithmetic;
//! these functions are its reference behaviour. Every input is passed explicitly
//! per draw call, so the stages are reentrant and keep no state between calls.

pub mod atlas;
pub mod geometry;
pub mod sampling;

pub use atlas::{AtlasBand, BAND_COUNT};
pub use geometry::{transform_vertex, TransformSet, TransformedVertex, VoxelVertex};
pub use sampling::{
    shade_fragment, shade_side_fragment, AddressMode, AtlasBinding, Sampler, TextureArray,
};
