//! wgpu backend for litegpu.
//!
//! Shaders are written in GLSL 450, compiled to naga IR at pipeline build time
//! and handed to wgpu directly. Compilation and validation failures are logged
//! and leave the pipeline empty instead of aborting.
//!
//! # Invariants
//! - A pipeline handle is either fully built or absent.
//! - Each distinct host data array is uploaded to exactly one vertex buffer.

mod compute_pipeline;
mod context;
mod data_buffer;
mod layout;
mod pipeline;
mod readback;
mod render_pipeline;
mod shader;
mod vertex_array_state;

pub use compute_pipeline::{ComputePipeline, ComputePipelineDescriptor};
pub use context::{GpuContext, GpuError, request_device};
pub use data_buffer::{DataBuffer, StorageBuffer, UniformBuffer};
pub use layout::{OwnedVertexBufferLayout, buffer_layouts, primitive_topology, vertex_format};
pub use pipeline::{PipelineBindings, PipelineHandle};
pub use readback::read_buffer;
pub use render_pipeline::{
    MSAA_SAMPLE_COUNT, RenderPipeline, RenderPipelineDescriptor, default_blend_state,
};
pub use shader::{
    PREFIX_SUM_SHADER, ShaderError, ShaderStage, compile_glsl, compile_to_spirv,
    create_shader_module, log_shader_error,
};
pub use vertex_array_state::VertexArrayState;

pub fn crate_info() -> &'static str {
    "litegpu-render-wgpu v0.1.0"
}
