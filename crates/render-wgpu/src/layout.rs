use litegpu_render::{DrawMode, IndexFormat, StepMode, VertexFormat, VertexLayout};

/// Map a draw mode to a wgpu topology.
///
/// Line loops and triangle fans have no wgpu equivalent.
pub fn primitive_topology(mode: DrawMode) -> Option<wgpu::PrimitiveTopology> {
    match mode {
        DrawMode::Points => Some(wgpu::PrimitiveTopology::PointList),
        DrawMode::Lines => Some(wgpu::PrimitiveTopology::LineList),
        DrawMode::LineStrip => Some(wgpu::PrimitiveTopology::LineStrip),
        DrawMode::Triangles => Some(wgpu::PrimitiveTopology::TriangleList),
        DrawMode::TriangleStrip => Some(wgpu::PrimitiveTopology::TriangleStrip),
        DrawMode::LineLoop | DrawMode::TriangleFan => {
            tracing::warn!(mode = mode.as_str(), "draw mode has no primitive topology");
            None
        }
    }
}

pub fn vertex_format(format: VertexFormat) -> wgpu::VertexFormat {
    use wgpu::VertexFormat as W;
    match format {
        VertexFormat::Uchar2 => W::Uint8x2,
        VertexFormat::Uchar4 => W::Uint8x4,
        VertexFormat::Char2 => W::Sint8x2,
        VertexFormat::Char4 => W::Sint8x4,
        VertexFormat::Uchar2Norm => W::Unorm8x2,
        VertexFormat::Uchar4Norm => W::Unorm8x4,
        VertexFormat::Char2Norm => W::Snorm8x2,
        VertexFormat::Char4Norm => W::Snorm8x4,
        VertexFormat::Ushort2 => W::Uint16x2,
        VertexFormat::Ushort4 => W::Uint16x4,
        VertexFormat::Short2 => W::Sint16x2,
        VertexFormat::Short4 => W::Sint16x4,
        VertexFormat::Ushort2Norm => W::Unorm16x2,
        VertexFormat::Ushort4Norm => W::Unorm16x4,
        VertexFormat::Short2Norm => W::Snorm16x2,
        VertexFormat::Short4Norm => W::Snorm16x4,
        VertexFormat::Half2 => W::Float16x2,
        VertexFormat::Half4 => W::Float16x4,
        VertexFormat::Float => W::Float32,
        VertexFormat::Float2 => W::Float32x2,
        VertexFormat::Float3 => W::Float32x3,
        VertexFormat::Float4 => W::Float32x4,
        VertexFormat::Uint => W::Uint32,
        VertexFormat::Uint2 => W::Uint32x2,
        VertexFormat::Uint3 => W::Uint32x3,
        VertexFormat::Uint4 => W::Uint32x4,
        VertexFormat::Int => W::Sint32,
        VertexFormat::Int2 => W::Sint32x2,
        VertexFormat::Int3 => W::Sint32x3,
        VertexFormat::Int4 => W::Sint32x4,
    }
}

pub(crate) fn index_format(format: IndexFormat) -> wgpu::IndexFormat {
    match format {
        IndexFormat::Uint16 => wgpu::IndexFormat::Uint16,
        IndexFormat::Uint32 => wgpu::IndexFormat::Uint32,
    }
}

/// A vertex buffer layout that owns its attribute list, so it can live in a
/// pipeline descriptor independently of the vertex array it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedVertexBufferLayout {
    pub array_stride: wgpu::BufferAddress,
    pub step_mode: wgpu::VertexStepMode,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl OwnedVertexBufferLayout {
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: self.step_mode,
            attributes: &self.attributes,
        }
    }
}

/// Translate a [`VertexLayout`] into wgpu buffer layouts, one per buffer slot.
pub fn buffer_layouts(layout: &VertexLayout) -> Vec<OwnedVertexBufferLayout> {
    layout
        .buffers()
        .iter()
        .map(|buffer| OwnedVertexBufferLayout {
            array_stride: buffer.array_stride,
            step_mode: match buffer.step_mode {
                StepMode::Vertex => wgpu::VertexStepMode::Vertex,
                StepMode::Instance => wgpu::VertexStepMode::Instance,
            },
            attributes: buffer
                .attributes
                .iter()
                .map(|attribute| wgpu::VertexAttribute {
                    format: vertex_format(attribute.format),
                    offset: attribute.offset,
                    shader_location: attribute.shader_location,
                })
                .collect(),
        })
        .collect()
}
