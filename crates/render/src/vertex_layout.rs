use crate::key_define::{Define, KeyDefine};
use crate::vertex_array::{DrawMode, IndexData, VertexArray, VertexFormat};
use std::sync::Arc;

/// Output slots reserved by a `tangent` attribute (tangent, bitangent, normal).
const TANGENT_OUT_SLOTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexFormat {
    Uint16,
    Uint32,
}

impl IndexFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepMode {
    Vertex,
    Instance,
}

impl StepMode {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Instance => "instance",
        }
    }
}

/// One attribute with its assigned shader locations.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeLayout {
    pub name: String,
    pub format: VertexFormat,
    pub offset: u64,
    pub shader_location: u32,
    /// First output location forwarded to the next stage; `None` for instance data.
    pub out_location: Option<u32>,
}

/// Layout of one vertex buffer slot.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferLayout {
    pub array_stride: u64,
    pub step_mode: StepMode,
    pub attributes: Vec<AttributeLayout>,
    /// Index into [`VertexLayout::unique_data`] of the array backing this slot.
    pub data_slot: usize,
    /// Byte offset into the backing array.
    pub offset: u64,
}

/// The deterministic description of a [`VertexArray`]'s layout.
///
/// Two vertex arrays with the same structure (index width, strides, attribute
/// names, formats, offsets, draw mode) produce the same [`key`](Self::key),
/// whatever their data contents. Pipelines are cached by that key.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    defines: Vec<Define>,
    key: String,
    buffers: Vec<BufferLayout>,
    unique_data: Vec<Arc<[f32]>>,
    index_format: IndexFormat,
    indexed: bool,
    mode: DrawMode,
    count: u32,
    instance_count: u32,
    next_out_location: u32,
}

impl VertexLayout {
    pub fn new(vao: &VertexArray) -> Self {
        let mut defines = Vec::new();
        let mut parts = Vec::new();
        let mut push = |define: Define, part: String| {
            defines.push(define);
            parts.push(part);
        };

        let index_format = match vao.index_buffer {
            Some(IndexData::U16(_)) => IndexFormat::Uint16,
            _ => IndexFormat::Uint32,
        };
        push(
            Define::flag(index_format.as_str()),
            index_format.as_str().to_string(),
        );

        let mut unique_data: Vec<Arc<[f32]>> = Vec::new();
        let mut buffers = Vec::with_capacity(vao.buffers.len());
        let mut shader_location = 0u32;
        let mut out_location = 0u32;
        let mut instance_count = 1u32;

        for (i, buffer) in vao.buffers.iter().enumerate() {
            let step_mode = if buffer.is_instanced() {
                instance_count = buffer.instance_count.unwrap_or(1);
                StepMode::Instance
            } else {
                StepMode::Vertex
            };
            let token = format!("buffer{i}");
            let part = format!("{token}[{}:{}]", buffer.array_stride, step_mode.as_str());
            push(Define::flag(token), part);

            let mut attributes = Vec::with_capacity(buffer.attributes.len());
            for attribute in &buffer.attributes {
                let upper = attribute.name.to_uppercase();
                let input = KeyDefine::new(format!("IN_{upper}"), shader_location as i64);
                let part = format!(
                    "{input}={}@{}",
                    attribute.format.as_str(),
                    attribute.offset
                );
                push(input.into(), part);

                let out = match step_mode {
                    StepMode::Vertex => {
                        let output = KeyDefine::new(format!("OUT_{upper}"), out_location as i64);
                        push(output.clone().into(), output.to_string());
                        let slot = out_location;
                        out_location += if attribute.name == "tangent" {
                            TANGENT_OUT_SLOTS
                        } else {
                            1
                        };
                        Some(slot)
                    }
                    StepMode::Instance => None,
                };

                attributes.push(AttributeLayout {
                    name: attribute.name.clone(),
                    format: attribute.format,
                    offset: attribute.offset,
                    shader_location,
                    out_location: out,
                });
                shader_location += 1;
            }

            let data_slot = match unique_data
                .iter()
                .position(|data| Arc::ptr_eq(data, &buffer.data))
            {
                Some(slot) => slot,
                None => {
                    unique_data.push(buffer.data.clone());
                    unique_data.len() - 1
                }
            };

            buffers.push(BufferLayout {
                array_stride: buffer.array_stride,
                step_mode,
                attributes,
                data_slot,
                offset: buffer.offset,
            });
        }

        push(Define::flag(vao.mode.as_str()), vao.mode.as_str().to_string());
        let next = KeyDefine::new("NEXT_OUT_LOCATION", out_location as i64);
        push(next.clone().into(), next.to_string());

        let key = parts.join(",");
        tracing::trace!(%key, buffers = buffers.len(), "vertex layout");

        Self {
            defines,
            key,
            buffers,
            unique_data,
            index_format,
            indexed: vao.index_buffer.is_some(),
            mode: vao.mode,
            count: vao.count,
            instance_count,
            next_out_location: out_location,
        }
    }

    /// Shader defines describing this layout, in emission order.
    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    /// Cache key; equal for structurally identical vertex arrays.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn buffers(&self) -> &[BufferLayout] {
        &self.buffers
    }

    /// Distinct data arrays, by identity, in first-use order.
    pub fn unique_data(&self) -> &[Arc<[f32]>] {
        &self.unique_data
    }

    pub fn index_format(&self) -> IndexFormat {
        self.index_format
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Instance count of the last instanced buffer, or 1.
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// First output location not claimed by any attribute.
    pub fn next_out_location(&self) -> u32 {
        self.next_out_location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vertex_array::{VertexArrayBuffer, VertexAttribute};

    fn single(names: &[&str], mode: DrawMode) -> VertexArray {
        let data: Arc<[f32]> = vec![0.0; 12].into();
        let mut buffer = VertexArrayBuffer::new(data, 12 * names.len() as u64);
        for (i, name) in names.iter().enumerate() {
            buffer = buffer.with_attribute(VertexAttribute::new(*name).with_offset(12 * i as u64));
        }
        VertexArray::new(vec![buffer], 3).with_mode(mode)
    }

    #[test]
    fn cube_layout() {
        let layout = VertexLayout::new(&VertexArray::cube());
        assert_eq!(
            layout.key(),
            "uint32,buffer0[32:vertex],IN_POSITION:0=float3@0,OUT_POSITION:0,\
             IN_NORMAL:1=float3@12,OUT_NORMAL:1,IN_UV:2=float2@24,OUT_UV:2,\
             TRIANGLES,NEXT_OUT_LOCATION:3"
        );
        let names: Vec<String> = layout.defines().iter().map(|d| d.to_string()).collect();
        assert_eq!(
            names,
            [
                "uint32",
                "buffer0",
                "IN_POSITION:0",
                "OUT_POSITION:0",
                "IN_NORMAL:1",
                "OUT_NORMAL:1",
                "IN_UV:2",
                "OUT_UV:2",
                "TRIANGLES",
                "NEXT_OUT_LOCATION:3",
            ]
        );
        assert_eq!(layout.next_out_location(), 3);
        assert_eq!(layout.instance_count(), 1);
        assert!(!layout.is_indexed());
    }

    #[test]
    fn identical_structure_shares_key() {
        let a = single(&["position", "normal"], DrawMode::Triangles);
        let b = single(&["position", "normal"], DrawMode::Triangles);
        assert_ne!(a.id(), b.id());
        assert_eq!(VertexLayout::new(&a).key(), VertexLayout::new(&b).key());
    }

    #[test]
    fn structural_changes_change_key() {
        let base = VertexLayout::new(&single(&["position", "normal"], DrawMode::Triangles));
        let renamed = VertexLayout::new(&single(&["position", "color"], DrawMode::Triangles));
        let lines = VertexLayout::new(&single(&["position", "normal"], DrawMode::Lines));
        assert_ne!(base.key(), renamed.key());
        assert_ne!(base.key(), lines.key());

        let mut reformatted = single(&["position", "normal"], DrawMode::Triangles);
        reformatted.buffers[0].attributes[1].format = VertexFormat::Float4;
        assert_ne!(base.key(), VertexLayout::new(&reformatted).key());
    }

    #[test]
    fn index_width_selects_format() {
        let vao = single(&["position"], DrawMode::Triangles)
            .with_index_buffer(IndexData::U16(vec![0, 1, 2].into()));
        let layout = VertexLayout::new(&vao);
        assert_eq!(layout.index_format(), IndexFormat::Uint16);
        assert!(layout.is_indexed());
        assert!(layout.key().starts_with("uint16,"));
    }

    #[test]
    fn tangent_reserves_three_slots() {
        let layout = VertexLayout::new(&single(&["position", "tangent", "uv"], DrawMode::Triangles));
        let outs: Vec<Option<u32>> = layout.buffers()[0]
            .attributes
            .iter()
            .map(|a| a.out_location)
            .collect();
        assert_eq!(outs, [Some(0), Some(1), Some(4)]);
        assert_eq!(layout.next_out_location(), 5);
    }

    #[test]
    fn instanced_buffer_has_no_outputs() {
        let mut vao = VertexArray::cube();
        let offsets: Arc<[f32]> = vec![0.0; 30].into();
        vao.add_buffer(
            VertexArrayBuffer::new(offsets, 12)
                .with_attribute(VertexAttribute::new("offset"))
                .with_instance_count(10),
        );
        let layout = VertexLayout::new(&vao);
        let instanced = &layout.buffers()[1];
        assert_eq!(instanced.step_mode, StepMode::Instance);
        assert_eq!(instanced.attributes[0].shader_location, 3);
        assert_eq!(instanced.attributes[0].out_location, None);
        assert_eq!(layout.instance_count(), 10);
        assert_eq!(layout.next_out_location(), 3);
        assert!(
            !layout
                .defines()
                .iter()
                .any(|d| d.name() == "OUT_OFFSET")
        );
    }

    #[test]
    fn shared_data_is_uploaded_once() {
        let data: Arc<[f32]> = vec![0.0; 24].into();
        let copy: Arc<[f32]> = vec![0.0; 24].into();
        let vao = VertexArray::new(
            vec![
                VertexArrayBuffer::new(data.clone(), 24)
                    .with_attribute(VertexAttribute::new("position")),
                VertexArrayBuffer::new(data, 24)
                    .with_attribute(VertexAttribute::new("normal"))
                    .with_offset(12),
                VertexArrayBuffer::new(copy, 12).with_attribute(VertexAttribute::new("color")),
            ],
            3,
        );
        let layout = VertexLayout::new(&vao);
        assert_eq!(layout.unique_data().len(), 2);
        let slots: Vec<usize> = layout.buffers().iter().map(|b| b.data_slot).collect();
        assert_eq!(slots, [0, 0, 1]);
    }
}
