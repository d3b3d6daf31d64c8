//! Viewer configuration.
//!
//! Read once at startup from a JSON file. Every field has a default, so a
//! partial file only overrides what it names and a missing file means
//! "all defaults".

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::ConfigError,
    shading::{AddressMode, Sampler},
};

/// Environment variable naming the config file.
pub const CONFIG_PATH_ENV: &str = "VOXEL_VIEWER_CONFIG";

/// Config file used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "assets/viewer.json";

/// Most layers a generated atlas gets; wgpu's default `max_texture_array_layers`.
pub const MAX_PLACEHOLDER_LAYERS: u32 = 256;

/// Settings of the side-face viewer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Title of the viewer window
    pub window_title: String,
    /// Stacked atlas image; a generated placeholder is used when absent or unreadable
    pub atlas_path: Option<PathBuf>,
    /// Height in pixels of one layer of the stacked atlas
    pub layer_height: u32,
    /// Voxel type ids drawn as a row, left to right
    pub voxel_types: Vec<i32>,
    /// Initial distance of the orbit camera
    pub camera_distance: f32,
    /// Vertical field of view in degrees
    pub fovy_degrees: f32,
    /// Near clipping plane distance
    pub znear: f32,
    /// Far clipping plane distance
    pub zfar: f32,
    /// Vertical address mode of the atlas sampler; U always repeats
    pub address_mode_v: AddressMode,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Voxel Face Viewer".to_string(),
            atlas_path: None,
            layer_height: 16,
            voxel_types: vec![0, 1, 2, 3],
            camera_distance: 6.0,
            fovy_degrees: 70.0,
            znear: 0.1,
            zfar: 100.0,
            address_mode_v: AddressMode::Repeat,
        }
    }
}

impl ViewerConfig {
    /// Loads the config from the path in [`CONFIG_PATH_ENV`], or
    /// [`DEFAULT_CONFIG_PATH`] when the variable is unset.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
        Self::load_from(path)
    }

    /// Loads the config from `path`. A missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(contents) => {
                let config = Self::from_json(&contents)?;
                info!("Loaded viewer config from {}", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No viewer config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses a config from JSON text.
    pub fn from_json(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Sampler for the viewer's atlas.
    pub fn sampler(&self) -> Sampler {
        Sampler::for_atlas(self.address_mode_v)
    }

    /// Number of atlas layers the placeholder atlas needs to cover every
    /// configured voxel type, capped at [`MAX_PLACEHOLDER_LAYERS`].
    ///
    /// Ids past the cap sample the last layer.
    pub fn placeholder_layer_count(&self) -> u32 {
        self.voxel_types
            .iter()
            .copied()
            .max()
            .map_or(1, |max_id| (max_id.max(0) as u32).saturating_add(1))
            .min(MAX_PLACEHOLDER_LAYERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config =
            ViewerConfig::from_json(r#"{ "voxel_types": [5, 2], "address_mode_v": "clamp_to_edge" }"#)
                .unwrap();

        assert_eq!(config.voxel_types, vec![5, 2]);
        assert_eq!(config.address_mode_v, AddressMode::ClampToEdge);
        assert_eq!(config.layer_height, ViewerConfig::default().layer_height);
        assert_eq!(config.atlas_path, None);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            ViewerConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            ViewerConfig::from_json(r#"{ "address_mode_v": "wrap" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = ViewerConfig::load_from("does/not/exist/viewer.json").unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn placeholder_covers_the_largest_voxel_type() {
        let mut config = ViewerConfig::default();
        config.voxel_types = vec![2, 7, 0];
        assert_eq!(config.placeholder_layer_count(), 8);

        config.voxel_types.clear();
        assert_eq!(config.placeholder_layer_count(), 1);

        config.voxel_types = vec![i32::MAX];
        assert_eq!(config.placeholder_layer_count(), MAX_PLACEHOLDER_LAYERS);
    }

    #[test]
    fn configured_v_mode_keeps_side_faces_on_the_side_tile() {
        use cgmath::{Vector2, Vector4};
        use image::{Rgba, RgbaImage};

        use crate::shading::{atlas::build_texture_array, shade_side_fragment, AtlasBinding};

        let sheet = RgbaImage::from_fn(12, 4, |x, _| match x / 4 {
            0 => Rgba([0, 255, 0, 255]),
            1 => Rgba([255, 0, 0, 255]),
            _ => Rgba([0, 0, 255, 255]),
        });
        let atlas = build_texture_array(&[sheet]).unwrap();

        for mode in ["repeat", "clamp_to_edge", "mirror_repeat"] {
            let config =
                ViewerConfig::from_json(&format!(r#"{{ "address_mode_v": "{mode}" }}"#)).unwrap();
            let sampler = config.sampler();

            assert_eq!(
                shade_side_fragment(Vector2::new(0.5, 0.5), 0, AtlasBinding::new(&atlas, &sampler)),
                Vector4::new(1.0, 0.0, 0.0, 1.0),
                "address_mode_v {mode}"
            );
        }
    }

    #[test]
    fn shipped_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(DEFAULT_CONFIG_PATH);
        let config = ViewerConfig::load_from(path).unwrap();
        assert!(!config.voxel_types.is_empty());
    }
}
