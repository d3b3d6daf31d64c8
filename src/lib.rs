#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Face Shading
//!
//! The per-face texturing path of a voxel renderer: a geometry transform stage
//! that recentres unit voxels and projects them to clip space, and an atlas
//! sampling stage that reads one face band of a per-voxel-type texture array
//! layer.
//!
//! ## Key Modules
//!
//! * `shading` - Both stages as pure CPU functions, plus the atlas layout
//! * `rendering` - The same stages on the GPU through wgpu and WGSL
//! * `camera` - View and projection matrices fed to the stages
//! * `config` - Viewer configuration
//! * `error` - Errors from atlas and config loading
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector2;
//! use image::{Rgba, RgbaImage};
//! use voxel_face_shading::shading::{
//!     atlas::build_texture_array, shade_side_fragment, AtlasBinding, Sampler,
//! };
//!
//! // One voxel type whose sheet is top | side | bottom, the side tile red.
//! let sheet = RgbaImage::from_fn(6, 2, |x, _| match x / 2 {
//!     1 => Rgba([255, 0, 0, 255]),
//!     _ => Rgba([0, 0, 0, 255]),
//! });
//! let atlas = build_texture_array(&[sheet]).unwrap();
//! let sampler = Sampler::default();
//!
//! let color = shade_side_fragment(Vector2::new(0.5, 0.5), 0, AtlasBinding::new(&atlas, &sampler));
//! assert_eq!(color.x, 1.0);
//! ```
//!
//! The viewer binary calls [`run`].

use application_state::{
    graphics_resources_builder::{GraphicsBuilder, MaybeGraphics},
    ApplicationState,
};
use config::ViewerConfig;
use log::{info, warn};
use winit::event_loop::EventLoop;

mod application_state;
pub mod camera;
pub mod config;
pub mod error;
pub mod rendering;
pub mod shading;

/// Starts the side-face viewer and blocks until its window is closed.
///
/// # Panics
/// Panics if the event loop cannot be created.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = ViewerConfig::load().unwrap_or_else(|err| {
        warn!("{}. Using default viewer config", err);
        ViewerConfig::default()
    });

    let event_loop = EventLoop::with_user_event()
        .build()
        .expect("Failed to create event loop");

    let mut state = ApplicationState::new(
        MaybeGraphics::Builder(GraphicsBuilder::new(
            event_loop.create_proxy(),
            config.window_title.clone(),
        )),
        config,
    );

    let _ = event_loop.run_app(&mut state);
}
