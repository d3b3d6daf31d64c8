//! # Atlas Layout
//!
//! Every voxel type owns one layer of a texture array. A layer is authored as a
//! sheet of [`BAND_COUNT`] equal-width tiles, left to right: top face, side face,
//! bottom face.
//!
//! The fragment stage selects band `i` with `u' = u / 3 - i / 3` and lets the
//! sampler's repeat addressing fold the negative range back into `[0, 1)`. The
//! side band therefore lands on the rightmost third of the packed layer, the
//! bottom band on the middle third. [`pack_face_sheet`] moves authored tiles to
//! exactly those slots, so assets authored in sheet order render correctly with
//! the remap left untouched.

use std::path::Path;

use cgmath::Vector2;
use image::{imageops, Rgba, RgbaImage};
use log::info;

use crate::error::AtlasError;

use super::sampling::TextureArray;

/// Number of equal horizontal bands in one atlas layer.
pub const BAND_COUNT: u32 = 3;

/// The face bands of an atlas layer, in authored order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AtlasBand {
    /// Texture for the top face (+Y)
    Top = 0,
    /// Texture shared by the four side faces
    Side = 1,
    /// Texture for the bottom face (-Y)
    Bottom = 2,
}

impl AtlasBand {
    /// All bands in authored order.
    pub fn all() -> [AtlasBand; 3] {
        [AtlasBand::Top, AtlasBand::Side, AtlasBand::Bottom]
    }

    /// Position of the band in the authored sheet.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Remaps a full-face horizontal coordinate onto this band.
    ///
    /// For [`AtlasBand::Side`] this is exactly `u / 3 - 1 / 3`, sending `[0, 1]`
    /// onto `[-1/3, 0]`.
    ///
    /// `u = 1` maps to `0`, the seam with the first packed slot. Under repeat
    /// addressing that edge reads the first texel of the top tile.
    #[inline]
    pub fn remap_u(self, u: f32) -> f32 {
        u / BAND_COUNT as f32 - self.index() as f32 / BAND_COUNT as f32
    }

    /// Remaps a face UV onto this band. `v` is left unchanged.
    #[inline]
    pub fn remap(self, uv: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(self.remap_u(uv.x), uv.y)
    }

    /// Slot of the packed layer that [`AtlasBand::remap_u`] addresses once
    /// wrapped into `[0, 1)`.
    pub fn packed_slot(self) -> u32 {
        (BAND_COUNT - self.index()) % BAND_COUNT
    }
}

/// Rearranges an authored `top | side | bottom` sheet into the packed layer
/// order the band remap addresses.
pub fn pack_face_sheet(sheet: &RgbaImage) -> Result<RgbaImage, AtlasError> {
    let (width, height) = sheet.dimensions();
    if width == 0 || width % BAND_COUNT != 0 {
        return Err(AtlasError::SheetWidth {
            width,
            bands: BAND_COUNT,
        });
    }

    let tile_width = width / BAND_COUNT;
    let mut packed = RgbaImage::new(width, height);
    for band in AtlasBand::all() {
        let tile = imageops::crop_imm(sheet, band.index() * tile_width, 0, tile_width, height)
            .to_image();
        imageops::replace(
            &mut packed,
            &tile,
            (band.packed_slot() * tile_width) as i64,
            0,
        );
    }

    Ok(packed)
}

/// Builds a texture array with one packed layer per authored sheet.
///
/// Sheet `i` becomes layer `i`, i.e. voxel type id `i`.
pub fn build_texture_array(sheets: &[RgbaImage]) -> Result<TextureArray, AtlasError> {
    let layers = sheets
        .iter()
        .map(pack_face_sheet)
        .collect::<Result<Vec<_>, _>>()?;
    TextureArray::new(layers)
}

/// Splits a vertically stacked image into sheets of `layer_height` rows.
pub fn split_stacked_sheets(
    image: &RgbaImage,
    layer_height: u32,
) -> Result<Vec<RgbaImage>, AtlasError> {
    let (width, height) = image.dimensions();
    if layer_height == 0 || height == 0 || height % layer_height != 0 {
        return Err(AtlasError::LayerHeight {
            height,
            layer_height,
        });
    }

    Ok((0..height / layer_height)
        .map(|layer| imageops::crop_imm(image, 0, layer * layer_height, width, layer_height).to_image())
        .collect())
}

/// Loads a stacked atlas image from disk and packs it into a texture array.
pub fn load_texture_array(
    path: impl AsRef<Path>,
    layer_height: u32,
) -> Result<TextureArray, AtlasError> {
    let path = path.as_ref();
    let image = image::open(path)?.to_rgba8();
    let sheets = split_stacked_sheets(&image, layer_height)?;
    let texture_array = build_texture_array(&sheets)?;

    info!(
        "Loaded atlas {} with {} layers of {}x{}",
        path.display(),
        texture_array.layer_count(),
        texture_array.width(),
        texture_array.height()
    );

    Ok(texture_array)
}

/// Generates flat-coloured sheets, one per voxel type, for use when no atlas
/// asset is available.
///
/// Each layer gets its own hue; the top band is brightest, the bottom darkest,
/// and the side band carries a one-texel border so face edges stay visible.
pub fn placeholder_sheets(layer_count: u32, tile_size: u32) -> Vec<RgbaImage> {
    (0..layer_count)
        .map(|layer| {
            let base = hue_color(layer, layer_count.max(1));
            RgbaImage::from_fn(tile_size * BAND_COUNT, tile_size, |x, y| {
                let band = x / tile_size;
                let local_x = x % tile_size;
                let shade = match band {
                    0 => 1.0,
                    1 => {
                        let edge = local_x == 0
                            || local_x + 1 == tile_size
                            || y == 0
                            || y + 1 == tile_size;
                        if edge {
                            0.45
                        } else {
                            0.8
                        }
                    }
                    _ => 0.6,
                };
                Rgba([
                    (base[0] as f32 * shade) as u8,
                    (base[1] as f32 * shade) as u8,
                    (base[2] as f32 * shade) as u8,
                    255,
                ])
            })
        })
        .collect()
}

fn hue_color(index: u32, count: u32) -> [u8; 3] {
    let hue = index as f32 / count as f32 * 6.0;
    let fraction = hue - hue.floor();
    let (r, g, b) = match hue as u32 % 6 {
        0 => (1.0, fraction, 0.0),
        1 => (1.0 - fraction, 1.0, 0.0),
        2 => (0.0, 1.0, fraction),
        3 => (0.0, 1.0 - fraction, 1.0),
        4 => (fraction, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - fraction),
    };
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn sheet(top: Rgba<u8>, side: Rgba<u8>, bottom: Rgba<u8>, tile: u32) -> RgbaImage {
        RgbaImage::from_fn(tile * 3, tile, |x, _| match x / tile {
            0 => top,
            1 => side,
            _ => bottom,
        })
    }

    #[test]
    fn side_remap_covers_exactly_minus_one_third_to_zero() {
        assert_eq!(AtlasBand::Side.remap_u(0.0), -1.0 / 3.0);
        assert_eq!(AtlasBand::Side.remap_u(1.0), 0.0);
        assert_eq!(AtlasBand::Side.remap_u(0.5), 0.5 / 3.0 - 1.0 / 3.0);
    }

    #[test]
    fn side_remap_matches_closed_form_across_the_face() {
        for step in 0..=64 {
            let u = step as f32 / 64.0;
            assert_eq!(AtlasBand::Side.remap_u(u), u / 3.0 - 1.0 / 3.0);
        }
    }

    #[test]
    fn remap_leaves_v_untouched() {
        for step in 0..=16 {
            let v = step as f32 / 16.0;
            for band in AtlasBand::all() {
                assert_eq!(band.remap(Vector2::new(0.3, v)).y, v);
            }
        }
    }

    #[test]
    fn packed_slots_follow_the_wrapped_offsets() {
        assert_eq!(AtlasBand::Top.packed_slot(), 0);
        assert_eq!(AtlasBand::Side.packed_slot(), 2);
        assert_eq!(AtlasBand::Bottom.packed_slot(), 1);

        for band in AtlasBand::all() {
            let centre = band.remap_u(0.5);
            let wrapped = centre - centre.floor();
            assert_eq!((wrapped * BAND_COUNT as f32) as u32, band.packed_slot());
        }
    }

    #[test]
    fn packing_moves_tiles_into_their_slots() {
        let packed = pack_face_sheet(&sheet(RED, GREEN, BLUE, 2)).unwrap();

        assert_eq!(*packed.get_pixel(0, 0), RED);
        assert_eq!(*packed.get_pixel(2, 1), BLUE);
        assert_eq!(*packed.get_pixel(5, 0), GREEN);
    }

    #[test]
    fn packing_rejects_widths_that_do_not_split_into_bands() {
        let bad = RgbaImage::new(7, 2);
        assert!(matches!(
            pack_face_sheet(&bad),
            Err(AtlasError::SheetWidth { width: 7, bands: 3 })
        ));
    }

    #[test]
    fn stacked_images_split_into_layers() {
        let mut stacked = RgbaImage::new(6, 4);
        for x in 0..6 {
            stacked.put_pixel(x, 3, BLUE);
        }
        let sheets = split_stacked_sheets(&stacked, 2).unwrap();

        assert_eq!(sheets.len(), 2);
        assert_eq!(*sheets[1].get_pixel(4, 1), BLUE);
        assert!(matches!(
            split_stacked_sheets(&stacked, 3),
            Err(AtlasError::LayerHeight { height: 4, layer_height: 3 })
        ));
    }

    #[test]
    fn placeholder_sheets_are_distinct_per_layer() {
        let sheets = placeholder_sheets(4, 8);

        assert_eq!(sheets.len(), 4);
        assert_eq!(sheets[0].dimensions(), (24, 8));
        assert_ne!(sheets[0].get_pixel(12, 4), sheets[1].get_pixel(12, 4));
    }
}
