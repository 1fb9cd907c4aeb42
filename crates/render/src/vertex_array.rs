use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// How vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DrawMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl DrawMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "POINTS",
            Self::Lines => "LINES",
            Self::LineLoop => "LINE_LOOP",
            Self::LineStrip => "LINE_STRIP",
            Self::Triangles => "TRIANGLES",
            Self::TriangleStrip => "TRIANGLE_STRIP",
            Self::TriangleFan => "TRIANGLE_FAN",
        }
    }
}

/// Per-attribute data format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VertexFormat {
    Uchar2,
    Uchar4,
    Char2,
    Char4,
    Uchar2Norm,
    Uchar4Norm,
    Char2Norm,
    Char4Norm,
    Ushort2,
    Ushort4,
    Short2,
    Short4,
    Ushort2Norm,
    Ushort4Norm,
    Short2Norm,
    Short4Norm,
    Half2,
    Half4,
    Float,
    Float2,
    #[default]
    Float3,
    Float4,
    Uint,
    Uint2,
    Uint3,
    Uint4,
    Int,
    Int2,
    Int3,
    Int4,
}

impl VertexFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uchar2 => "uchar2",
            Self::Uchar4 => "uchar4",
            Self::Char2 => "char2",
            Self::Char4 => "char4",
            Self::Uchar2Norm => "uchar2norm",
            Self::Uchar4Norm => "uchar4norm",
            Self::Char2Norm => "char2norm",
            Self::Char4Norm => "char4norm",
            Self::Ushort2 => "ushort2",
            Self::Ushort4 => "ushort4",
            Self::Short2 => "short2",
            Self::Short4 => "short4",
            Self::Ushort2Norm => "ushort2norm",
            Self::Ushort4Norm => "ushort4norm",
            Self::Short2Norm => "short2norm",
            Self::Short4Norm => "short4norm",
            Self::Half2 => "half2",
            Self::Half4 => "half4",
            Self::Float => "float",
            Self::Float2 => "float2",
            Self::Float3 => "float3",
            Self::Float4 => "float4",
            Self::Uint => "uint",
            Self::Uint2 => "uint2",
            Self::Uint3 => "uint3",
            Self::Uint4 => "uint4",
            Self::Int => "int",
            Self::Int2 => "int2",
            Self::Int3 => "int3",
            Self::Int4 => "int4",
        }
    }

    /// Size of one element in bytes.
    pub fn size(&self) -> u64 {
        match self {
            Self::Uchar2 | Self::Char2 | Self::Uchar2Norm | Self::Char2Norm => 2,
            Self::Uchar4 | Self::Char4 | Self::Uchar4Norm | Self::Char4Norm => 4,
            Self::Ushort2 | Self::Short2 | Self::Ushort2Norm | Self::Short2Norm | Self::Half2 => 4,
            Self::Ushort4 | Self::Short4 | Self::Ushort4Norm | Self::Short4Norm | Self::Half4 => 8,
            Self::Float | Self::Uint | Self::Int => 4,
            Self::Float2 | Self::Uint2 | Self::Int2 => 8,
            Self::Float3 | Self::Uint3 | Self::Int3 => 12,
            Self::Float4 | Self::Uint4 | Self::Int4 => 16,
        }
    }
}

/// A named attribute inside a vertex buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAttribute {
    pub name: String,
    /// Byte offset inside one element.
    pub offset: u64,
    pub format: VertexFormat,
}

impl VertexAttribute {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            offset: 0,
            format: VertexFormat::default(),
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_format(mut self, format: VertexFormat) -> Self {
        self.format = format;
        self
    }
}

/// One interleaved vertex buffer and the attributes it carries.
///
/// Buffers sharing the same `data` allocation share one device buffer.
#[derive(Debug, Clone)]
pub struct VertexArrayBuffer {
    pub array_stride: u64,
    pub data: Arc<[f32]>,
    pub attributes: Vec<VertexAttribute>,
    /// Set for per-instance buffers; the value becomes the draw instance count.
    pub instance_count: Option<u32>,
    /// Byte offset into `data` at which binding starts.
    pub offset: u64,
}

impl VertexArrayBuffer {
    pub fn new(data: Arc<[f32]>, array_stride: u64) -> Self {
        Self {
            array_stride,
            data,
            attributes: Vec::new(),
            instance_count: None,
            offset: 0,
        }
    }

    pub fn with_attribute(mut self, attribute: VertexAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_instance_count(mut self, count: u32) -> Self {
        self.instance_count = Some(count);
        self
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Whether this buffer advances per instance rather than per vertex.
    pub fn is_instanced(&self) -> bool {
        self.instance_count.is_some_and(|n| n > 0)
    }
}

/// Index data in either supported width.
#[derive(Debug, Clone)]
pub enum IndexData {
    U16(Arc<[u16]>),
    U32(Arc<[u32]>),
}

impl IndexData {
    pub fn len(&self) -> usize {
        match self {
            Self::U16(data) => data.len(),
            Self::U32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(data) => bytemuck::cast_slice(data),
            Self::U32(data) => bytemuck::cast_slice(data),
        }
    }
}

/// Declarative geometry: vertex buffers, optional indices, element count, draw mode.
#[derive(Debug, Clone)]
pub struct VertexArray {
    id: u64,
    pub buffers: Vec<VertexArrayBuffer>,
    pub index_buffer: Option<IndexData>,
    pub count: u32,
    pub mode: DrawMode,
}

impl VertexArray {
    pub fn new(buffers: Vec<VertexArrayBuffer>, count: u32) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            buffers,
            index_buffer: None,
            count,
            mode: DrawMode::default(),
        }
    }

    pub fn with_index_buffer(mut self, indices: IndexData) -> Self {
        self.index_buffer = Some(indices);
        self
    }

    pub fn with_mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    /// Process-unique id, increasing in creation order.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn add_buffer(&mut self, buffer: VertexArrayBuffer) {
        self.buffers.push(buffer);
    }

    /// Unit cube (-1..1) with position, normal and uv, 36 vertices.
    pub fn cube() -> Self {
        #[rustfmt::skip]
        let data: Vec<f32> = vec![
            // Bottom
            1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 1.0, 1.0,
            -1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 0.0, 1.0,
            -1.0, -1.0, -1.0, 0.0, -1.0, 0.0, 0.0, 0.0,
            1.0, -1.0, -1.0, 0.0, -1.0, 0.0, 1.0, 0.0,
            1.0, -1.0, 1.0, 0.0, -1.0, 0.0, 1.0, 1.0,
            -1.0, -1.0, -1.0, 0.0, -1.0, 0.0, 0.0, 0.0,
            // Right
            1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0,
            1.0, -1.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0,
            1.0, -1.0, -1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
            1.0, 1.0, -1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
            1.0, 1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0,
            1.0, -1.0, -1.0, 1.0, 0.0, 0.0, 0.0, 0.0,
            // Top
            -1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0,
            1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 0.0, 1.0,
            1.0, 1.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0,
            -1.0, 1.0, -1.0, 0.0, 1.0, 0.0, 1.0, 0.0,
            -1.0, 1.0, 1.0, 0.0, 1.0, 0.0, 1.0, 1.0,
            1.0, 1.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0,
            // Left
            -1.0, -1.0, 1.0, -1.0, 0.0, 0.0, 1.0, 1.0,
            -1.0, 1.0, 1.0, -1.0, 0.0, 0.0, 0.0, 1.0,
            -1.0, 1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0,
            -1.0, -1.0, -1.0, -1.0, 0.0, 0.0, 1.0, 0.0,
            -1.0, -1.0, 1.0, -1.0, 0.0, 0.0, 1.0, 1.0,
            -1.0, 1.0, -1.0, -1.0, 0.0, 0.0, 0.0, 0.0,
            // Front
            1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0,
            -1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0,
            -1.0, -1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            -1.0, -1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0,
            1.0, -1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0,
            1.0, 1.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0,
            // Back
            1.0, -1.0, -1.0, 0.0, 0.0, -1.0, 1.0, 1.0,
            -1.0, -1.0, -1.0, 0.0, 0.0, -1.0, 0.0, 1.0,
            -1.0, 1.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0,
            1.0, 1.0, -1.0, 0.0, 0.0, -1.0, 1.0, 0.0,
            1.0, -1.0, -1.0, 0.0, 0.0, -1.0, 1.0, 1.0,
            -1.0, 1.0, -1.0, 0.0, 0.0, -1.0, 0.0, 0.0,
        ];
        let buffer = VertexArrayBuffer::new(data.into(), 4 * (3 + 3 + 2))
            .with_attribute(VertexAttribute::new("position"))
            .with_attribute(VertexAttribute::new("normal").with_offset(4 * 3))
            .with_attribute(
                VertexAttribute::new("uv")
                    .with_format(VertexFormat::Float2)
                    .with_offset(4 * (3 + 3)),
            );
        Self::new(vec![buffer], 36)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_increase() {
        let a = VertexArray::new(Vec::new(), 0);
        let b = VertexArray::new(Vec::new(), 0);
        assert!(b.id() > a.id());
    }

    #[test]
    fn defaults() {
        let attr = VertexAttribute::new("position");
        assert_eq!(attr.offset, 0);
        assert_eq!(attr.format, VertexFormat::Float3);
        assert_eq!(VertexArray::new(Vec::new(), 3).mode, DrawMode::Triangles);
    }

    #[test]
    fn cube_is_complete() {
        let cube = VertexArray::cube();
        assert_eq!(cube.count, 36);
        let buffer = &cube.buffers[0];
        assert_eq!(buffer.data.len() as u64 * 4, buffer.array_stride * 36);
        assert_eq!(buffer.attributes.len(), 3);
    }

    #[test]
    fn zero_instance_count_is_per_vertex() {
        let data: Arc<[f32]> = vec![0.0; 4].into();
        assert!(!VertexArrayBuffer::new(data.clone(), 16).is_instanced());
        assert!(!VertexArrayBuffer::new(data.clone(), 16).with_instance_count(0).is_instanced());
        assert!(VertexArrayBuffer::new(data, 16).with_instance_count(5).is_instanced());
    }

    #[test]
    fn index_bytes() {
        let idx = IndexData::U16(vec![0, 1, 2].into());
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.as_bytes().len(), 6);
        assert_eq!(DrawMode::TriangleFan.as_str(), "TRIANGLE_FAN");
        assert_eq!(VertexFormat::Float2.size(), 8);
    }
}
