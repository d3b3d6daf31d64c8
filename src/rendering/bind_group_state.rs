//! Manages WebGPU bind groups and their layouts.
//!
//! Three groups feed the voxel face shader:
//!
//! - group 0: camera matrices, written once per frame
//! - group 1: the atlas texture array and its sampler
//! - group 2: per-draw parameters, one slot per draw call addressed with a
//!   dynamic offset

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, BufferSize, Device};

use super::{
    buffer_state::BufferState, texture::Texture, uniforms::DrawUniform, CAMERA_BUFFER_NAME,
    DRAW_BUFFER_NAME,
};

/// Name of the camera bind group
pub const CAMERA_BIND_GROUP: &str = "camera_bind_group";
/// Name of the camera bind group layout
pub const CAMERA_BIND_GROUP_LAYOUT: &str = "camera_bind_group_layout";
/// Name of the atlas bind group
pub const ATLAS_BIND_GROUP: &str = "atlas_bind_group";
/// Name of the atlas bind group layout
pub const ATLAS_BIND_GROUP_LAYOUT: &str = "atlas_bind_group_layout";
/// Name of the per-draw bind group
pub const DRAW_BIND_GROUP: &str = "draw_bind_group";
/// Name of the per-draw bind group layout
pub const DRAW_BIND_GROUP_LAYOUT: &str = "draw_bind_group_layout";

/// Manages WebGPU bind groups and their layouts.
///
/// Bind groups and layouts are stored by name so the renderer can look them up
/// when building the pipeline layout and when recording a pass.
pub struct BindGroupState {
    /// Map of bind group names to their WebGPU bind group objects
    bind_groups: HashMap<&'static str, BindGroup>,
    /// Map of bind group layout names to their WebGPU bind group layout objects
    bind_group_layouts: HashMap<&'static str, BindGroupLayout>,
}

impl BindGroupState {
    /// Creates the camera, atlas and per-draw bind groups.
    ///
    /// # Arguments
    /// * `device` - The WebGPU device
    /// * `buffer_state` - Registry holding the camera and draw uniform buffers
    /// * `atlas_texture` - The uploaded atlas texture array
    pub fn new(device: &Device, buffer_state: &BufferState, atlas_texture: &Texture) -> Self {
        let mut state = Self {
            bind_groups: HashMap::new(),
            bind_group_layouts: HashMap::new(),
        };

        let camera_bind_group_layout = Self::camera_bind_group_layout(device);
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer_state
                    .get_buffer(CAMERA_BUFFER_NAME)
                    .as_entire_binding(),
            }],
            label: Some(CAMERA_BIND_GROUP),
        });
        state.insert(
            CAMERA_BIND_GROUP,
            camera_bind_group,
            CAMERA_BIND_GROUP_LAYOUT,
            camera_bind_group_layout,
        );

        let atlas_bind_group_layout = Self::atlas_bind_group_layout(device);
        let atlas_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &atlas_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&atlas_texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&atlas_texture.sampler),
                },
            ],
            label: Some(ATLAS_BIND_GROUP),
        });
        state.insert(
            ATLAS_BIND_GROUP,
            atlas_bind_group,
            ATLAS_BIND_GROUP_LAYOUT,
            atlas_bind_group_layout,
        );

        let draw_bind_group_layout = Self::draw_bind_group_layout(device);
        state
            .bind_group_layouts
            .insert(DRAW_BIND_GROUP_LAYOUT, draw_bind_group_layout);
        state.rebuild_draw_bind_group(device, buffer_state);

        state
    }

    /// Recreates the per-draw bind group after the draw buffer was reallocated.
    pub fn rebuild_draw_bind_group(&mut self, device: &Device, buffer_state: &BufferState) {
        let draw_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: self.get_bind_group_layout(DRAW_BIND_GROUP_LAYOUT),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: buffer_state.get_buffer(DRAW_BUFFER_NAME),
                    offset: 0,
                    size: BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
            label: Some(DRAW_BIND_GROUP),
        });
        self.bind_groups.insert(DRAW_BIND_GROUP, draw_bind_group);
    }

    /// Retrieves a bind group by name.
    ///
    /// # Panics
    /// Panics if no bind group with the given name exists
    pub fn get_bind_group(&self, name: &'static str) -> &BindGroup {
        self.bind_groups.get(name).unwrap()
    }

    /// Retrieves a bind group layout by name.
    ///
    /// # Panics
    /// Panics if no bind group layout with the given name exists
    pub fn get_bind_group_layout(&self, name: &'static str) -> &BindGroupLayout {
        self.bind_group_layouts.get(name).unwrap()
    }

    fn insert(
        &mut self,
        bind_group_name: &'static str,
        bind_group: BindGroup,
        layout_name: &'static str,
        layout: BindGroupLayout,
    ) {
        self.bind_groups.insert(bind_group_name, bind_group);
        self.bind_group_layouts.insert(layout_name, layout);
    }

    fn camera_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(CAMERA_BIND_GROUP_LAYOUT),
        })
    }

    fn atlas_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2Array,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    // This should match the filterable field of the texture entry above.
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
            label: Some(ATLAS_BIND_GROUP_LAYOUT),
        })
    }

    fn draw_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: BufferSize::new(std::mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
            label: Some(DRAW_BIND_GROUP_LAYOUT),
        })
    }
}
