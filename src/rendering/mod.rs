//! GPU rendering path for voxel side faces.
//!
//! This module wires the two shading stages onto wgpu: the WGSL in
//! `assets/shaders/voxel_face.wgsl` mirrors [`crate::shading`], and
//! [`VoxelRendererManager`] owns the surface, device, queue and the
//! [`SideFaceRenderer`] that issues one draw per voxel.

use cgmath::Matrix4;
use log::{debug, error};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::shading::{Sampler, TextureArray};

mod bind_group_state;
mod buffer_state;
pub mod mesh;
pub mod side_face_renderer;
pub mod texture;
pub mod uniforms;
pub mod vertex;

// Re-export commonly used types
pub use mesh::SideFaceMesh;
pub use side_face_renderer::{DrawParams, SideFaceRenderer};
pub use vertex::Vertex;

/// Camera uniform buffer
pub const CAMERA_BUFFER_NAME: &str = "camera_buffer";
/// Per-draw uniform buffer, addressed with dynamic offsets
pub const DRAW_BUFFER_NAME: &str = "draw_buffer";
/// Side-face vertex buffer
pub const SIDE_FACE_VERTEX_BUFFER_NAME: &str = "side_face_vertex_buffer";
/// Side-face index buffer
pub const SIDE_FACE_INDEX_BUFFER_NAME: &str = "side_face_index_buffer";

/// WGSL source of the voxel face shader.
pub const VOXEL_FACE_SHADER: &str = include_str!("../../assets/shaders/voxel_face.wgsl");

/// Owns the surface and everything needed to draw voxel side faces onto it.
pub struct VoxelRendererManager {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    /// The WebGPU device used for creating GPU resources
    pub device: Device,
    /// The WebGPU queue for submitting command buffers
    pub queue: Queue,
    /// Depth texture used for depth testing
    pub depth_texture: texture::Texture,
    /// Side-face pipeline and its resources
    pub side_face_renderer: SideFaceRenderer,
}

impl VoxelRendererManager {
    /// Creates the side-face renderer for an already configured surface.
    ///
    /// # Arguments
    /// * `surface` - The WebGPU surface to render to
    /// * `surface_config` - Configuration the surface was configured with
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue
    /// * `texture_array` - Packed atlas, one layer per voxel type
    /// * `sampler` - Atlas sampler address modes
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        texture_array: &TextureArray,
        sampler: &Sampler,
    ) -> Self {
        let depth_texture =
            texture::Texture::create_depth_texture(&device, &surface_config, "DEPTH TEXTURE");

        let depth_stencil = Some(wgpu::DepthStencilState {
            format: texture::Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let side_face_renderer = SideFaceRenderer::new(
            &device,
            &queue,
            VOXEL_FACE_SHADER,
            surface_config.format,
            depth_stencil,
            texture_array,
            sampler,
            &SideFaceMesh::unit_cube_sides(),
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            depth_texture,
            side_face_renderer,
        }
    }

    /// Handles window resize events.
    ///
    /// Reconfigures the surface and recreates the depth texture. Zero-sized
    /// requests (minimised windows) are ignored.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            debug!("Ignoring zero-sized resize");
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;
        self.surface.configure(&self.device, &self.surface_config);

        self.depth_texture =
            texture::Texture::create_depth_texture(&self.device, &self.surface_config, "DEPTH TEXTURE");
    }

    /// Renders one frame: every entry of `draws` is a separate draw call
    /// sharing `view` and `projection`.
    ///
    /// # Panics
    /// Panics if the surface texture cannot be acquired.
    pub fn render(&mut self, view: Matrix4<f32>, projection: Matrix4<f32>, draws: &[DrawParams]) {
        self.side_face_renderer
            .prepare(&self.device, &self.queue, view, projection, draws);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                error!("Error getting current frame: {:?}", err);
                panic!();
            }
        };

        let frame_view = frame.texture.create_view(&Default::default());
        let mut encoder = self.device.create_command_encoder(&Default::default());
        {
            let depth_stencil_attachment = Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_texture.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            });
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Side Face Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                ..Default::default()
            });
            self.side_face_renderer.render(&mut rpass);
        }

        self.queue.submit([encoder.finish()]);
        frame.present();
    }
}
