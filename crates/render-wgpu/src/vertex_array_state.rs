use crate::layout::{OwnedVertexBufferLayout, buffer_layouts, index_format, primitive_topology};
use litegpu_render::{Define, IndexData, VertexArray, VertexLayout};
use wgpu::util::DeviceExt;

/// A [`VertexArray`] realized on the device.
///
/// One vertex buffer is created per distinct data array; buffer slots that
/// share data bind the same device buffer at their own offsets.
#[derive(Debug)]
pub struct VertexArrayState {
    layout: VertexLayout,
    buffer_layouts: Vec<OwnedVertexBufferLayout>,
    vertex_buffers: Vec<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
}

impl VertexArrayState {
    pub fn new(device: &wgpu::Device, vao: &VertexArray) -> Self {
        let layout = VertexLayout::new(vao);
        let label = format!("vao{}", vao.id());

        let vertex_buffers = layout
            .unique_data()
            .iter()
            .map(|data| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&label),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                })
            })
            .collect();

        let index_buffer = vao.index_buffer.as_ref().map(|indices: &IndexData| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&label),
                contents: indices.as_bytes(),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        tracing::debug!(
            id = vao.id(),
            key = layout.key(),
            buffers = layout.unique_data().len(),
            indexed = index_buffer.is_some(),
            "vertex array realized"
        );

        Self {
            buffer_layouts: buffer_layouts(&layout),
            layout,
            vertex_buffers,
            index_buffer,
        }
    }

    pub fn layout(&self) -> &VertexLayout {
        &self.layout
    }

    pub fn key(&self) -> &str {
        self.layout.key()
    }

    pub fn defines(&self) -> &[Define] {
        self.layout.defines()
    }

    pub fn primitive_topology(&self) -> Option<wgpu::PrimitiveTopology> {
        primitive_topology(self.layout.mode())
    }

    pub fn owned_buffer_layouts(&self) -> &[OwnedVertexBufferLayout] {
        &self.buffer_layouts
    }

    pub fn vertex_buffer_layouts(&self) -> Vec<wgpu::VertexBufferLayout<'_>> {
        self.buffer_layouts.iter().map(|b| b.as_wgpu()).collect()
    }

    /// Bind every vertex buffer slot and the index buffer, if any.
    ///
    /// Slots whose offset lies at or past the end of their data are skipped.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        for (slot, buffer) in self.layout.buffers().iter().enumerate() {
            let Some(device_buffer) = self.vertex_buffers.get(buffer.data_slot) else {
                continue;
            };
            // Nothing left to bind past the end of the data.
            if buffer.offset >= device_buffer.size() {
                continue;
            }
            pass.set_vertex_buffer(slot as u32, device_buffer.slice(buffer.offset..));
        }
        if let Some(index_buffer) = self.index_buffer.as_ref().filter(|b| b.size() > 0) {
            pass.set_index_buffer(
                index_buffer.slice(..),
                index_format(self.layout.index_format()),
            );
        }
    }

    /// Issue the draw for all elements and instances.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let count = self.layout.count();
        let instances = 0..self.layout.instance_count();
        if self.index_buffer.is_some() {
            pass.draw_indexed(0..count, 0, instances);
        } else {
            pass.draw(0..count, instances);
        }
    }

    pub fn destroy(&self) {
        for buffer in &self.vertex_buffers {
            buffer.destroy();
        }
        if let Some(buffer) = &self.index_buffer {
            buffer.destroy();
        }
    }
}
