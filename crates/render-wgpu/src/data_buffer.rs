use glam::{Mat3, Mat4, Vec3, Vec4};
use litegpu_render::{BufferError, DataBlock};
use std::ops::{Deref, DerefMut};

/// A host [`DataBlock`] mirrored into a device buffer.
///
/// Writes go to the host array; [`update`](Self::update) copies it over.
#[derive(Debug)]
pub struct DataBuffer {
    block: DataBlock,
    buffer: wgpu::Buffer,
}

impl DataBuffer {
    /// A buffer of `len` floats with the given usage.
    pub fn new(
        device: &wgpu::Device,
        label: Option<&str>,
        len: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let block = DataBlock::new(len);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label,
            size: (len * std::mem::size_of::<f32>()) as wgpu::BufferAddress,
            usage,
            mapped_at_creation: false,
        });
        Self { block, buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn block(&self) -> &DataBlock {
        &self.block
    }

    pub fn block_mut(&mut self) -> &mut DataBlock {
        &mut self.block
    }

    pub fn len(&self) -> usize {
        self.block.len()
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    pub fn set_vec3(&mut self, value: Vec3, normalize: bool) -> Result<(), BufferError> {
        self.block.set_vec3(value, normalize)
    }

    pub fn set_vec4(&mut self, value: Vec4) -> Result<(), BufferError> {
        self.block.set_vec4(value)
    }

    pub fn set_mat3(&mut self, value: &Mat3) -> Result<(), BufferError> {
        self.block.set_mat3(value)
    }

    pub fn set_mat4(&mut self, value: &Mat4) -> Result<(), BufferError> {
        self.block.set_mat4(value)
    }

    pub fn set_value(&mut self, values: [f32; 4], normalize: bool) -> Result<(), BufferError> {
        self.block.set_value(values, normalize)
    }

    /// Upload the whole host array and rewind the write cursor.
    pub fn update(&mut self, queue: &wgpu::Queue) {
        if !self.block.is_empty() {
            queue.write_buffer(&self.buffer, 0, self.block.as_bytes());
        }
        self.block.reset();
    }

    /// Replace the leading contents and upload immediately.
    pub fn set_data(&mut self, queue: &wgpu::Queue, data: &[f32]) -> Result<(), BufferError> {
        self.block.set_data(data)?;
        self.update(queue);
        Ok(())
    }

    pub fn destroy(&self) {
        self.buffer.destroy();
    }
}

/// A [`DataBuffer`] usable as a uniform binding.
#[derive(Debug)]
pub struct UniformBuffer(DataBuffer);

impl UniformBuffer {
    /// `usage` is added to `UNIFORM`; pass `COPY_DST` for the common case.
    pub fn new(
        device: &wgpu::Device,
        label: Option<&str>,
        len: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self(DataBuffer::new(
            device,
            label,
            len,
            wgpu::BufferUsages::UNIFORM | usage,
        ))
    }
}

impl Deref for UniformBuffer {
    type Target = DataBuffer;

    fn deref(&self) -> &DataBuffer {
        &self.0
    }
}

impl DerefMut for UniformBuffer {
    fn deref_mut(&mut self) -> &mut DataBuffer {
        &mut self.0
    }
}

/// A [`DataBuffer`] usable as a storage binding.
#[derive(Debug)]
pub struct StorageBuffer(DataBuffer);

impl StorageBuffer {
    /// `usage` is added to `STORAGE`; pass `COPY_DST` for the common case.
    pub fn new(
        device: &wgpu::Device,
        label: Option<&str>,
        len: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self(DataBuffer::new(
            device,
            label,
            len,
            wgpu::BufferUsages::STORAGE | usage,
        ))
    }
}

impl Deref for StorageBuffer {
    type Target = DataBuffer;

    fn deref(&self) -> &DataBuffer {
        &self.0
    }
}

impl DerefMut for StorageBuffer {
    fn deref_mut(&mut self) -> &mut DataBuffer {
        &mut self.0
    }
}
