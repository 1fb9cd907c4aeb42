//! Renderer-agnostic core of litegpu.
//!
//! Everything here is plain data and math; nothing touches a device. The
//! wgpu backend realizes these descriptions into GPU objects.
//!
//! # Invariants
//! - Cached camera matrices are recomputed only when their inputs change.
//! - Structurally identical vertex arrays share one layout key.

pub mod camera;
pub mod data_block;
pub mod key_define;
pub mod shader_source;
pub mod vertex_array;
pub mod vertex_layout;

pub use camera::{Camera, CameraDescriptor};
pub use data_block::{BufferError, DataBlock};
pub use key_define::{Define, KeyDefine};
pub use shader_source::{SHADER_PREFIX, build_shader_source, define_block, number_lines};
pub use vertex_array::{
    DrawMode, IndexData, VertexArray, VertexArrayBuffer, VertexAttribute, VertexFormat,
};
pub use vertex_layout::{AttributeLayout, BufferLayout, IndexFormat, StepMode, VertexLayout};

pub fn crate_info() -> &'static str {
    "litegpu-render v0.1.0"
}
