//! # Atlas Sampling Stage
//!
//! CPU model of the texture-array resource and the fragment stage that reads it.
//!
//! The resource mirrors what the GPU path binds: a stack of equally sized RGBA
//! layers, sampled with nearest filtering and a per-axis address mode. The layer
//! index is clamped into range, which is what array sampling hardware does for
//! out-of-range layers; the stage itself never validates it.

use cgmath::{Vector2, Vector3, Vector4};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

use crate::error::AtlasError;

use super::atlas::AtlasBand;

/// How a texture coordinate outside `[0, 1)` is resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressMode {
    /// Wrap around, keeping the fractional part
    #[default]
    Repeat,
    /// Stick to the nearest edge texel
    ClampToEdge,
    /// Wrap around, flipping every other repetition
    MirrorRepeat,
}

impl AddressMode {
    /// Resolves a coordinate measured in texels to a texel index in `0..size`.
    pub fn texel_index(self, texel_coord: f32, size: u32) -> u32 {
        if size == 0 {
            return 0;
        }
        let size = size as i64;
        let index = texel_coord.floor() as i64;
        let resolved = match self {
            AddressMode::Repeat => index.rem_euclid(size),
            AddressMode::ClampToEdge => index.clamp(0, size - 1),
            AddressMode::MirrorRepeat => {
                let period = index.rem_euclid(size * 2);
                if period < size {
                    period
                } else {
                    size * 2 - 1 - period
                }
            }
        };
        resolved as u32
    }

    /// The matching `wgpu` address mode for the GPU sampler.
    pub fn to_wgpu(self) -> wgpu::AddressMode {
        match self {
            AddressMode::Repeat => wgpu::AddressMode::Repeat,
            AddressMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            AddressMode::MirrorRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Addressing configuration of the atlas sampler. Filtering is always nearest.
///
/// Band offsets are negative for every band but the first, so only
/// [`AddressMode::Repeat`] on U lands them on their packed slot. Build atlas
/// samplers with [`Sampler::for_atlas`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Sampler {
    /// Horizontal address mode
    pub address_mode_u: AddressMode,
    /// Vertical address mode
    pub address_mode_v: AddressMode,
}

impl Sampler {
    /// An atlas sampler: U repeats, V uses `address_mode_v`.
    pub fn for_atlas(address_mode_v: AddressMode) -> Self {
        Self {
            address_mode_u: AddressMode::Repeat,
            address_mode_v,
        }
    }
}

/// A stack of equally sized RGBA layers, one per voxel type.
#[derive(Clone, Debug)]
pub struct TextureArray {
    width: u32,
    height: u32,
    layers: Vec<RgbaImage>,
}

impl TextureArray {
    /// Creates a texture array, checking that every layer shares the first
    /// layer's dimensions.
    pub fn new(layers: Vec<RgbaImage>) -> Result<Self, AtlasError> {
        let (width, height) = layers.first().ok_or(AtlasError::Empty)?.dimensions();
        if width == 0 || height == 0 {
            return Err(AtlasError::Empty);
        }

        for (index, layer) in layers.iter().enumerate() {
            let (found_width, found_height) = layer.dimensions();
            if (found_width, found_height) != (width, height) {
                return Err(AtlasError::LayerSize {
                    index,
                    found_width,
                    found_height,
                    width,
                    height,
                });
            }
        }

        Ok(Self {
            width,
            height,
            layers,
        })
    }

    /// Width of every layer in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height of every layer in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of layers, i.e. the number of addressable voxel types.
    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// All layers concatenated in layer-major order, ready for GPU upload.
    pub fn layer_major_bytes(&self) -> Vec<u8> {
        self.layers
            .iter()
            .flat_map(|layer| layer.as_raw().iter().copied())
            .collect()
    }

    /// Samples the array at `(uv, layer)` with nearest filtering.
    ///
    /// Returns normalized RGBA. Out-of-range layers clamp to the nearest valid one.
    pub fn sample(&self, sampler: &Sampler, uv: Vector2<f32>, layer: i32) -> Vector4<f32> {
        let layer = layer.clamp(0, self.layers.len() as i32 - 1) as usize;
        let x = sampler
            .address_mode_u
            .texel_index(uv.x * self.width as f32, self.width);
        let y = sampler
            .address_mode_v
            .texel_index(uv.y * self.height as f32, self.height);

        let texel = self.layers[layer].get_pixel(x, y).0;
        Vector4::new(
            texel[0] as f32 / 255.0,
            texel[1] as f32 / 255.0,
            texel[2] as f32 / 255.0,
            texel[3] as f32 / 255.0,
        )
    }
}

/// Everything the sampling stage reads besides the interpolated UV.
#[derive(Copy, Clone, Debug)]
pub struct AtlasBinding<'a> {
    /// The packed atlas
    pub texture_array: &'a TextureArray,
    /// Sampler used to read it
    pub sampler: &'a Sampler,
}

impl<'a> AtlasBinding<'a> {
    /// Binds a texture array with a sampler.
    pub fn new(texture_array: &'a TextureArray, sampler: &'a Sampler) -> Self {
        Self {
            texture_array,
            sampler,
        }
    }
}

/// Shades one fragment by sampling `band` of the layer selected by `voxel_type_id`.
///
/// The result is always opaque.
pub fn shade_fragment(
    uv: Vector2<f32>,
    band: AtlasBand,
    voxel_type_id: i32,
    atlas: AtlasBinding<'_>,
) -> Vector4<f32> {
    let face_uv = band.remap(uv);
    let color: Vector3<f32> = atlas
        .texture_array
        .sample(atlas.sampler, face_uv, voxel_type_id)
        .truncate();
    color.extend(1.0)
}

/// Shades one side-face fragment: `u' = u / 3 - 1 / 3`, `v' = v`, alpha 1.
pub fn shade_side_fragment(
    uv: Vector2<f32>,
    voxel_type_id: i32,
    atlas: AtlasBinding<'_>,
) -> Vector4<f32> {
    shade_fragment(uv, AtlasBand::Side, voxel_type_id, atlas)
}
