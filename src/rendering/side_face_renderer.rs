//! Side-face renderer for the voxel engine.
//!
//! Owns the render pipeline built from the voxel face shader and issues one
//! indexed draw per voxel batch. Every draw receives its own model matrix and
//! voxel type through a dynamic-offset uniform slot, so nothing is left in
//! ambient shader state between draws.
//!
//! # Usage
//!
//! Per frame, call [`SideFaceRenderer::prepare`] with the camera matrices and
//! the draw list before the render pass starts, then
//! [`SideFaceRenderer::render`] inside the pass.

use cgmath::Matrix4;
use log::{debug, info};
use wgpu::{Device, Queue, RenderPass, RenderPipeline, TextureFormat};

use crate::shading::{AtlasBand, Sampler, TextureArray};

use super::{
    bind_group_state::{
        BindGroupState, ATLAS_BIND_GROUP, ATLAS_BIND_GROUP_LAYOUT, CAMERA_BIND_GROUP,
        CAMERA_BIND_GROUP_LAYOUT, DRAW_BIND_GROUP, DRAW_BIND_GROUP_LAYOUT,
    },
    buffer_state::BufferState,
    mesh::SideFaceMesh,
    texture::Texture,
    uniforms::{CameraUniform, DrawUniform},
    vertex::Vertex,
    CAMERA_BUFFER_NAME, DRAW_BUFFER_NAME, SIDE_FACE_INDEX_BUFFER_NAME,
    SIDE_FACE_VERTEX_BUFFER_NAME,
};

/// Number of draw slots allocated up front.
const INITIAL_DRAW_CAPACITY: usize = 64;

/// Parameters of one side-face draw call.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawParams {
    /// Places the voxel instance in the world
    pub model: Matrix4<f32>,
    /// Atlas layer to sample
    pub voxel_type_id: i32,
}

impl DrawParams {
    /// Bundles a model matrix with a voxel type.
    pub fn new(model: Matrix4<f32>, voxel_type_id: i32) -> Self {
        Self {
            model,
            voxel_type_id,
        }
    }
}

/// Serializes draw parameters into `stride`-spaced uniform slots, always
/// sampling the side band.
pub fn pack_draw_uniforms(draws: &[DrawParams], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut bytes = vec![0u8; draws.len() * stride];
    for (slot, draw) in draws.iter().enumerate() {
        let uniform = DrawUniform::new(draw.model, draw.voxel_type_id, AtlasBand::Side);
        let uniform_bytes = bytemuck::bytes_of(&uniform);
        bytes[slot * stride..slot * stride + uniform_bytes.len()].copy_from_slice(uniform_bytes);
    }
    bytes
}

/// Renders voxel side faces with the atlas sampling stage.
pub struct SideFaceRenderer {
    /// The WebGPU render pipeline for side faces
    render_pipeline: RenderPipeline,
    /// Camera, atlas and per-draw bind groups
    bind_group_state: BindGroupState,
    /// Uniform, vertex and index buffers
    buffer_state: BufferState,
    /// Distance between per-draw uniform slots, aligned for dynamic offsets
    draw_stride: u64,
    /// Number of draw slots the draw buffer can hold
    draw_capacity: usize,
    /// Number of draws written by the last `prepare`
    prepared_draws: u32,
    /// Index count of the uploaded mesh
    index_count: u32,
}

impl SideFaceRenderer {
    /// Creates the pipeline and uploads the atlas and mesh.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `queue` - The WebGPU queue for uploads
    /// * `shader_source` - WGSL source exposing `vs_main` and `fs_main`
    /// * `texture_format` - Format of the color target
    /// * `depth_stencil` - Optional depth stencil state
    /// * `texture_array` - Packed atlas, one layer per voxel type
    /// * `sampler` - Atlas sampler address modes
    /// * `mesh` - Side-face mesh to draw for every voxel
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        device: &Device,
        queue: &Queue,
        shader_source: &str,
        texture_format: TextureFormat,
        depth_stencil: Option<wgpu::DepthStencilState>,
        texture_array: &TextureArray,
        sampler: &Sampler,
        mesh: &SideFaceMesh,
    ) -> Self {
        let mut buffer_state = BufferState::new();

        buffer_state.create_buffer_init(
            device,
            CAMERA_BUFFER_NAME,
            wgpu::util::BufferInitDescriptor {
                label: Some(CAMERA_BUFFER_NAME),
                contents: bytemuck::cast_slice(&[CameraUniform::new()]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let draw_stride = wgpu::util::align_to(
            std::mem::size_of::<DrawUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );
        Self::create_draw_buffer(device, &mut buffer_state, draw_stride, INITIAL_DRAW_CAPACITY);

        mesh.upload(device, &mut buffer_state);

        let atlas_texture = Texture::create_atlas_texture(device, queue, texture_array, sampler);
        let bind_group_state = BindGroupState::new(device, &buffer_state, &atlas_texture);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Side Face Render Pipeline Layout"),
            bind_group_layouts: &[
                bind_group_state.get_bind_group_layout(CAMERA_BIND_GROUP_LAYOUT),
                bind_group_state.get_bind_group_layout(ATLAS_BIND_GROUP_LAYOUT),
                bind_group_state.get_bind_group_layout(DRAW_BIND_GROUP_LAYOUT),
            ],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Voxel Face Shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Side Face Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[Vertex::desc()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: texture_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        info!(
            "Side face pipeline created for {} atlas layers",
            texture_array.layer_count()
        );

        Self {
            render_pipeline,
            bind_group_state,
            buffer_state,
            draw_stride,
            draw_capacity: INITIAL_DRAW_CAPACITY,
            prepared_draws: 0,
            index_count: mesh.index_count(),
        }
    }

    /// Writes the camera matrices and per-draw parameters for the next pass.
    ///
    /// Grows the draw buffer when `draws` exceeds its capacity.
    pub fn prepare(
        &mut self,
        device: &Device,
        queue: &Queue,
        view: Matrix4<f32>,
        projection: Matrix4<f32>,
        draws: &[DrawParams],
    ) {
        let mut camera_uniform = CameraUniform::new();
        camera_uniform.update(view, projection);
        self.buffer_state.write_buffer(
            queue,
            CAMERA_BUFFER_NAME,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two();
            Self::create_draw_buffer(device, &mut self.buffer_state, self.draw_stride, capacity);
            self.bind_group_state
                .rebuild_draw_bind_group(device, &self.buffer_state);
            self.draw_capacity = capacity;
            debug!(
                "Grew draw buffer to {} slots, {} bytes of buffers allocated",
                capacity,
                self.buffer_state.get_total_allocated_memory()
            );
        }

        if !draws.is_empty() {
            let bytes = pack_draw_uniforms(draws, self.draw_stride);
            self.buffer_state
                .write_buffer(queue, DRAW_BUFFER_NAME, 0, &bytes);
        }
        self.prepared_draws = draws.len() as u32;
        debug!("Prepared {} side face draws", self.prepared_draws);
    }

    /// Records the prepared draws into a render pass.
    pub fn render<'a, 'b>(&'a self, render_pass: &mut RenderPass<'b>)
    where
        'a: 'b,
    {
        render_pass.set_pipeline(&self.render_pipeline);
        render_pass.set_bind_group(
            0,
            self.bind_group_state.get_bind_group(CAMERA_BIND_GROUP),
            &[],
        );
        render_pass.set_bind_group(
            1,
            self.bind_group_state.get_bind_group(ATLAS_BIND_GROUP),
            &[],
        );
        render_pass.set_vertex_buffer(
            0,
            self.buffer_state
                .get_buffer(SIDE_FACE_VERTEX_BUFFER_NAME)
                .slice(..),
        );
        render_pass.set_index_buffer(
            self.buffer_state
                .get_buffer(SIDE_FACE_INDEX_BUFFER_NAME)
                .slice(..),
            wgpu::IndexFormat::Uint32,
        );

        for slot in 0..self.prepared_draws {
            let offset = (slot as u64 * self.draw_stride) as u32;
            render_pass.set_bind_group(
                2,
                self.bind_group_state.get_bind_group(DRAW_BIND_GROUP),
                &[offset],
            );
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }

    fn create_draw_buffer(
        device: &Device,
        buffer_state: &mut BufferState,
        draw_stride: u64,
        capacity: usize,
    ) {
        buffer_state.create_buffer(
            device,
            DRAW_BUFFER_NAME,
            wgpu::BufferDescriptor {
                label: Some(DRAW_BUFFER_NAME),
                size: draw_stride * capacity as u64,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{SquareMatrix, Vector3};

    use super::*;

    #[test]
    fn draws_land_in_aligned_slots() {
        let draws = [
            DrawParams::new(Matrix4::identity(), 3),
            DrawParams::new(Matrix4::from_translation(Vector3::new(2.0, 0.0, 0.0)), 5),
        ];
        let bytes = pack_draw_uniforms(&draws, 256);

        assert_eq!(bytes.len(), 512);
        let first: DrawUniform = bytemuck::pod_read_unaligned(&bytes[..80]);
        let second: DrawUniform = bytemuck::pod_read_unaligned(&bytes[256..336]);
        assert_eq!(first, DrawUniform::new(Matrix4::identity(), 3, AtlasBand::Side));
        assert_eq!(second, DrawUniform::new(draws[1].model, 5, AtlasBand::Side));
        assert!(bytes[80..256].iter().all(|byte| *byte == 0));
    }

    #[test]
    fn empty_draw_list_packs_nothing() {
        assert!(pack_draw_uniforms(&[], 256).is_empty());
    }
}
