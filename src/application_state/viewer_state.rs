//! # Viewer State
//!
//! The running viewer: a row of voxels, each drawn with its own model matrix
//! and voxel type, seen through an orbit camera.

use cgmath::{Deg, Vector3};
use log::{info, warn};
use web_time::Duration;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use winit::keyboard::KeyCode;

use crate::{
    camera::{OrbitCamera, OrbitController, Projection},
    config::ViewerConfig,
    error::AtlasError,
    rendering::{DrawParams, VoxelRendererManager},
    shading::{
        atlas::{build_texture_array, load_texture_array, placeholder_sheets},
        geometry::translation_model,
        TextureArray,
    },
};

use super::input_manager::InputManager;

/// Horizontal distance between voxel origins in the row.
const VOXEL_SPACING: f32 = 1.5;

/// Edge length in texels of one placeholder atlas tile.
const PLACEHOLDER_TILE_SIZE: u32 = 16;

/// Orbit speed in radians per second.
const ORBIT_SPEED: f32 = 1.5;

/// Builds one draw per voxel type, laid out along +X and centred on the origin.
pub fn row_draws(voxel_types: &[i32]) -> Vec<DrawParams> {
    let half_width = (voxel_types.len().saturating_sub(1)) as f32 * VOXEL_SPACING / 2.0;
    voxel_types
        .iter()
        .enumerate()
        .map(|(slot, &voxel_type_id)| {
            let x = slot as f32 * VOXEL_SPACING - half_width;
            DrawParams::new(translation_model(Vector3::new(x, 0.0, 0.0)), voxel_type_id)
        })
        .collect()
}

/// Advances the voxel type of the middle voxel to the next atlas layer, wrapping.
pub fn cycle_centre_voxel(voxel_types: &mut [i32], layer_count: u32) {
    if voxel_types.is_empty() || layer_count == 0 {
        return;
    }
    let centre = voxel_types.len() / 2;
    let next = (i64::from(voxel_types[centre].max(0)) + 1) % i64::from(layer_count);
    voxel_types[centre] = next as i32;
}

/// Loads the configured atlas, falling back to generated placeholder sheets.
pub fn load_atlas(config: &ViewerConfig) -> Result<TextureArray, AtlasError> {
    if let Some(path) = &config.atlas_path {
        match load_texture_array(path, config.layer_height) {
            Ok(texture_array) => return Ok(texture_array),
            Err(err) => warn!(
                "Could not load atlas {}: {}. Using generated atlas",
                path.display(),
                err
            ),
        }
    } else {
        warn!("No atlas configured. Using generated atlas");
    }

    let layer_count = config.placeholder_layer_count();
    let texture_array =
        build_texture_array(&placeholder_sheets(layer_count, PLACEHOLDER_TILE_SIZE))?;
    info!("Generated atlas with {} layers", layer_count);
    Ok(texture_array)
}

/// State of the running viewer.
pub struct ViewerState {
    /// Surface, device and side-face pipeline
    pub renderer: VoxelRendererManager,
    /// Camera looking at the voxel row
    pub camera: OrbitCamera,
    /// Camera projection settings
    pub projection: Projection,
    /// Turns held arrow keys into camera motion
    pub controller: OrbitController,
    /// Voxel type of every voxel in the row
    pub voxel_types: Vec<i32>,
    /// Number of layers in the uploaded atlas
    pub layer_count: u32,
}

impl ViewerState {
    /// Creates the viewer from initialized graphics resources.
    ///
    /// # Panics
    /// Panics if no atlas, not even the generated one, can be built.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &ViewerConfig,
    ) -> Self {
        let texture_array = load_atlas(config).expect("Failed to build atlas");
        let sampler = config.sampler();

        let projection = Projection::new(
            surface_config.width,
            surface_config.height,
            Deg(config.fovy_degrees),
            config.znear,
            config.zfar,
        );
        let camera = OrbitCamera::new(
            (0.0, 0.0, 0.0),
            config.camera_distance,
            Deg(90.0),
            Deg(20.0),
        );

        let layer_count = texture_array.layer_count();
        let renderer = VoxelRendererManager::new(
            surface,
            surface_config,
            device,
            queue,
            &texture_array,
            &sampler,
        );
        info!(
            "Viewer ready with {} voxels over {} atlas layers",
            config.voxel_types.len(),
            layer_count
        );

        Self {
            renderer,
            camera,
            projection,
            controller: OrbitController::new(ORBIT_SPEED),
            voxel_types: config.voxel_types.clone(),
            layer_count,
        }
    }

    /// Resizes the surface and updates the projection aspect ratio.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        self.renderer.resize_surface(size);
        self.projection.resize(size.width, size.height);
    }

    /// Applies this frame's input: orbit while arrows are held, cycle on `Tab`.
    pub fn process_input(&mut self, input: &InputManager, dt: Duration) {
        self.controller.set_held(
            input.is_held(KeyCode::ArrowLeft),
            input.is_held(KeyCode::ArrowRight),
            input.is_held(KeyCode::ArrowUp),
            input.is_held(KeyCode::ArrowDown),
        );
        self.controller.set_zoom_held(
            input.is_held(KeyCode::PageUp),
            input.is_held(KeyCode::PageDown),
        );
        if self.controller.has_updates() {
            self.controller.update_camera(&mut self.camera, dt);
        }

        if input.was_pressed(KeyCode::Tab) {
            cycle_centre_voxel(&mut self.voxel_types, self.layer_count);
            info!("Centre voxel type is now {:?}", self.voxel_types.get(self.voxel_types.len() / 2));
        }
    }

    /// Renders the voxel row.
    pub fn render(&mut self) {
        let draws = row_draws(&self.voxel_types);
        self.renderer.render(
            self.camera.calc_matrix(),
            self.projection.calc_matrix(),
            &draws,
        );
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Vector4;

    use super::*;

    #[test]
    fn row_is_centred_on_the_origin() {
        let draws = row_draws(&[4, 2, 9]);

        assert_eq!(draws.len(), 3);
        assert_eq!(draws[0].model.w, Vector4::new(-VOXEL_SPACING, 0.0, 0.0, 1.0));
        assert_eq!(draws[1].model.w, Vector4::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(draws[2].model.w, Vector4::new(VOXEL_SPACING, 0.0, 0.0, 1.0));
        assert_eq!(
            draws.iter().map(|draw| draw.voxel_type_id).collect::<Vec<_>>(),
            vec![4, 2, 9]
        );
    }

    #[test]
    fn centre_voxel_cycles_through_layers() {
        let mut voxel_types = vec![0, 2, 0];
        cycle_centre_voxel(&mut voxel_types, 3);
        assert_eq!(voxel_types, vec![0, 0, 0]);
        cycle_centre_voxel(&mut voxel_types, 3);
        assert_eq!(voxel_types, vec![0, 1, 0]);

        let mut largest = vec![i32::MAX];
        cycle_centre_voxel(&mut largest, 3);
        assert_eq!(largest, vec![2]);

        let mut empty: Vec<i32> = Vec::new();
        cycle_centre_voxel(&mut empty, 3);
        assert!(empty.is_empty());
    }

    #[test]
    fn missing_atlas_falls_back_to_generated_layers() {
        let config = ViewerConfig {
            atlas_path: Some("does/not/exist.png".into()),
            voxel_types: vec![0, 5],
            ..ViewerConfig::default()
        };
        let texture_array = load_atlas(&config).unwrap();

        assert_eq!(texture_array.layer_count(), 6);
        assert_eq!(texture_array.width(), PLACEHOLDER_TILE_SIZE * 3);
    }
}
