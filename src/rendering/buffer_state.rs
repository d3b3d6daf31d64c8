//! # Buffer State Module
//!
//! A small registry of named GPU buffers.
//!
//! Buffers are referenced by a static name, so the renderer and the bind group
//! builder can share them without threading handles through every call. Writes
//! are bounds-checked against the size the buffer was created with.

use std::collections::HashMap;

use wgpu::{util::DeviceExt, Buffer, Device, Queue};

/// Registry of named GPU buffers and their allocated sizes.
#[derive(Default)]
pub struct BufferState {
    buffers: HashMap<&'static str, Buffer>,
    allocated_memory: HashMap<&'static str, u64>,
}

impl BufferState {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an uninitialized buffer, replacing any buffer with the same name.
    pub fn create_buffer(
        &mut self,
        device: &Device,
        buffer_name: &'static str,
        buffer_descriptor: wgpu::BufferDescriptor,
    ) {
        let buffer = device.create_buffer(&buffer_descriptor);
        self.allocated_memory
            .insert(buffer_name, buffer_descriptor.size);
        self.buffers.insert(buffer_name, buffer);
    }

    /// Creates a buffer initialized with `contents`, replacing any buffer with the same name.
    pub fn create_buffer_init(
        &mut self,
        device: &Device,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        let buffer = device.create_buffer_init(&init_descriptor);
        self.allocated_memory
            .insert(buffer_name, init_descriptor.contents.len() as u64);
        self.buffers.insert(buffer_name, buffer);
    }

    /// Queues a write into a named buffer.
    ///
    /// # Panics
    /// Panics if the buffer does not exist or the write would overrun it.
    pub fn write_buffer(
        &self,
        queue: &Queue,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) {
        let buffer = self.get_buffer(buffer_name);
        let allocated = self.allocated_memory[buffer_name];

        if offset + data.len() as u64 > allocated {
            panic!(
                "Buffer write out of bounds for buffer name '{}'",
                buffer_name
            );
        }

        queue.write_buffer(buffer, offset, data);
    }

    /// Gets a buffer by name.
    ///
    /// # Panics
    /// Panics if no buffer with the given name exists.
    pub fn get_buffer(&self, buffer_name: &'static str) -> &Buffer {
        self.buffers.get(buffer_name).unwrap()
    }

    /// Total bytes allocated across all registered buffers.
    pub fn get_total_allocated_memory(&self) -> u64 {
        self.allocated_memory.values().sum()
    }
}
