//! Error types for the fallible edges of the crate.
//!
//! The shading stages themselves never fail; only loading an atlas or reading
//! the viewer configuration can.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while building a texture array from authored atlas sheets.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// The atlas image could not be opened or decoded.
    #[error("failed to load atlas image: {0}")]
    Image(#[from] image::ImageError),

    /// A sheet cannot be split into equal face bands.
    #[error("atlas sheet width {width} is not a positive multiple of {bands}")]
    SheetWidth {
        /// Width of the offending sheet in pixels
        width: u32,
        /// Number of bands every sheet must hold
        bands: u32,
    },

    /// A stacked atlas image cannot be split into whole layers.
    #[error("atlas image height {height} is not a positive multiple of layer height {layer_height}")]
    LayerHeight {
        /// Height of the stacked image in pixels
        height: u32,
        /// Requested height of a single layer
        layer_height: u32,
    },

    /// Layers of one texture array must share their dimensions.
    #[error("atlas layer {index} is {found_width}x{found_height}, expected {width}x{height}")]
    LayerSize {
        /// Index of the mismatching layer
        index: usize,
        /// Width of the mismatching layer
        found_width: u32,
        /// Height of the mismatching layer
        found_height: u32,
        /// Width of the first layer
        width: u32,
        /// Height of the first layer
        height: u32,
    },

    /// A texture array needs at least one layer.
    #[error("atlas has no layers")]
    Empty,
}

/// Failures while reading the viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`crate::config::ViewerConfig`].
    #[error("failed to parse viewer config: {0}")]
    Parse(#[from] serde_json::Error),
}
