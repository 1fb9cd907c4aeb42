//! Pipeline tests. Shader compilation runs everywhere; device tests skip when
//! no adapter is available.

use litegpu_render::{
    Define, VertexArray, VertexArrayBuffer, VertexAttribute, VertexLayout, build_shader_source,
};
use litegpu_render_wgpu::{
    ComputePipeline, ComputePipelineDescriptor, GpuContext, PREFIX_SUM_SHADER, RenderPipeline,
    RenderPipelineDescriptor, ShaderStage, StorageBuffer, UniformBuffer, VertexArrayState,
    compile_glsl, read_buffer,
};

const VERTEX: &str = "
layout(location = IN_POSITION) in vec3 position;
layout(location = IN_NORMAL) in vec3 normal;
layout(location = OUT_NORMAL) out vec3 v_normal;
layout(set = 0, binding = 0) uniform Uniforms {
    mat4 projectionView;
};
void main() {
    v_normal = normal;
    gl_Position = projectionView * vec4(position, 1.0);
}
";

const FRAGMENT: &str = "
layout(location = OUT_NORMAL) in vec3 v_normal;
layout(location = 0) out vec4 color;
void main() {
    color = vec4(v_normal * 0.5 + 0.5, 1.0);
}
";

const WORKGROUP_SIZE: usize = 256;
const NUM_ELEMENTS: usize = WORKGROUP_SIZE * 2;

fn prefix_sum_defines() -> Vec<Define> {
    vec![
        Define::value("WORKGROUP_SIZE", WORKGROUP_SIZE as i64),
        Define::value("NUM_ELEMENTS", NUM_ELEMENTS as i64),
    ]
}

fn context() -> Option<GpuContext> {
    match GpuContext::new_headless() {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}

#[test]
fn cube_layout_defines_compile() {
    let layout = VertexLayout::new(&VertexArray::cube());
    let vertex = build_shader_source(VERTEX, layout.defines()).unwrap();
    let fragment = build_shader_source(FRAGMENT, layout.defines()).unwrap();
    compile_glsl(&vertex, ShaderStage::Vertex).unwrap();
    compile_glsl(&fragment, ShaderStage::Fragment).unwrap();
}

#[test]
fn prefix_sum_compiles() {
    let source = build_shader_source(PREFIX_SUM_SHADER, &prefix_sum_defines()).unwrap();
    let module = compile_glsl(&source, ShaderStage::Compute).unwrap();
    assert_eq!(
        module.entry_points[0].workgroup_size,
        [WORKGROUP_SIZE as u32, 1, 1]
    );
}

#[test]
fn missing_define_fails_to_compile() {
    let source = build_shader_source(VERTEX, &[]).unwrap();
    assert!(compile_glsl(&source, ShaderStage::Vertex).is_err());
}

#[test]
fn render_pipeline_builds_for_cube() {
    let Some(ctx) = context() else { return };
    let vao = VertexArray::cube();
    let state = VertexArrayState::new(&ctx.device, &vao);
    let mut pipeline = RenderPipeline::new(
        &ctx.device,
        RenderPipelineDescriptor::new(VERTEX, FRAGMENT).with_vertex_layout(state.layout()),
    );
    assert!(pipeline.is_ready());
    assert!(pipeline.bind_group(0).is_none());

    let mut uniforms = UniformBuffer::new(&ctx.device, None, 16, wgpu::BufferUsages::COPY_DST);
    uniforms.set_mat4(&glam::Mat4::IDENTITY).unwrap();
    uniforms.update(&ctx.queue);
    assert_eq!(uniforms.block().offset(), 0);

    let entries = [wgpu::BindGroupEntry {
        binding: 0,
        resource: uniforms.buffer().as_entire_binding(),
    }];
    assert!(pipeline.create_bind_group(&ctx.device, 0, &entries).is_some());
    assert!(pipeline.bind_group(0).is_some());

    pipeline.set_enable_msaa(&ctx.device, true);
    assert!(pipeline.is_ready());
    assert_eq!(pipeline.sample_count(), 4);
    state.destroy();
}

#[test]
fn broken_shader_leaves_pipeline_empty() {
    let Some(ctx) = context() else { return };
    let pipeline = RenderPipeline::new(
        &ctx.device,
        RenderPipelineDescriptor::new("void main() { oops }", FRAGMENT),
    );
    assert!(!pipeline.is_ready());
    assert!(pipeline.pipeline().is_none());
}

#[test]
fn unknown_bind_group_index_is_absent() {
    let Some(ctx) = context() else { return };
    let state = VertexArrayState::new(&ctx.device, &VertexArray::cube());
    let mut pipeline = RenderPipeline::new(
        &ctx.device,
        RenderPipelineDescriptor::new(VERTEX, FRAGMENT).with_vertex_layout(state.layout()),
    );
    assert!(pipeline.is_ready());

    assert!(pipeline.bind_group_layout(&ctx.device, 0).is_some());
    assert!(pipeline.bind_group_layout(&ctx.device, 3).is_none());
    assert!(pipeline.create_bind_group(&ctx.device, 3, &[]).is_none());
    assert!(pipeline.bind_group(3).is_none());

    // Entries that do not match the layout leave the slot empty.
    assert!(pipeline.create_bind_group(&ctx.device, 0, &[]).is_none());
    assert!(pipeline.bind_group(0).is_none());
}

#[test]
fn explicit_layouts_fall_back_to_pipeline_past_the_end() {
    let Some(ctx) = context() else { return };
    let device = &ctx.device;
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("uniforms"),
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
    });
    let state = VertexArrayState::new(device, &VertexArray::cube());
    let mut pipeline = RenderPipeline::new(
        device,
        RenderPipelineDescriptor {
            bind_group_layouts: vec![layout],
            ..RenderPipelineDescriptor::new(VERTEX, FRAGMENT).with_vertex_layout(state.layout())
        },
    );
    assert!(pipeline.is_ready());
    assert!(pipeline.bind_group_layout(device, 0).is_some());
    // The pipeline itself has no group 1 either; the lookup still comes back empty.
    assert!(pipeline.bind_group_layout(device, 1).is_none());
}

#[test]
fn vertex_only_pipeline_builds() {
    let Some(ctx) = context() else { return };
    let state = VertexArrayState::new(&ctx.device, &VertexArray::cube());
    let pipeline = RenderPipeline::new(
        &ctx.device,
        RenderPipelineDescriptor {
            color_formats: vec![],
            ..RenderPipelineDescriptor::new(VERTEX, "").with_vertex_layout(state.layout())
        },
    );
    assert!(pipeline.is_ready());
}

#[test]
fn empty_vertex_data_binds_without_buffers() {
    let Some(ctx) = context() else { return };
    let device = &ctx.device;
    let empty: Vec<f32> = Vec::new();
    let buffer =
        VertexArrayBuffer::new(empty.into(), 12).with_attribute(VertexAttribute::new("position"));
    let vao = VertexArray::new(vec![buffer], 0);
    let state = VertexArrayState::new(device, &vao);

    let target = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("target"),
        size: wgpu::Extent3d {
            width: 4,
            height: 4,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&Default::default());
    let mut encoder = device.create_command_encoder(&Default::default());
    {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("empty_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            ..Default::default()
        });
        state.bind(&mut pass);
    }
    ctx.queue.submit(std::iter::once(encoder.finish()));
}

#[test]
fn zero_length_read_is_empty() {
    let Some(ctx) = context() else { return };
    let buffer = StorageBuffer::new(&ctx.device, None, 4, wgpu::BufferUsages::COPY_SRC);
    let values = read_buffer(&ctx.device, &ctx.queue, buffer.buffer(), 0).unwrap();
    assert!(values.is_empty());
}

#[test]
fn prefix_sum_on_device() {
    let Some(ctx) = context() else { return };
    let device = &ctx.device;

    let input: Vec<f32> = (0..NUM_ELEMENTS).map(|i| (i % 7) as f32).collect();
    let expected: Vec<f32> = input
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect();

    let mut input_buffer =
        StorageBuffer::new(device, Some("input"), NUM_ELEMENTS, wgpu::BufferUsages::COPY_DST);
    input_buffer.set_data(&ctx.queue, &input).unwrap();
    let output_buffer =
        StorageBuffer::new(device, Some("output"), NUM_ELEMENTS, wgpu::BufferUsages::COPY_SRC);

    let storage = |read_only| wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Storage { read_only },
        has_dynamic_offset: false,
        min_binding_size: None,
    };
    let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("prefix_sum"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: storage(true),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: storage(false),
                count: None,
            },
        ],
    });

    let mut pipeline = ComputePipeline::new(
        device,
        ComputePipelineDescriptor {
            bind_group_layouts: vec![layout],
            ..ComputePipelineDescriptor::new(PREFIX_SUM_SHADER).with_defines(prefix_sum_defines())
        },
    );
    assert!(pipeline.is_ready());
    pipeline
        .create_bind_group(
            device,
            0,
            &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: input_buffer.buffer().as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: output_buffer.buffer().as_entire_binding(),
                },
            ],
        )
        .unwrap();

    let mut encoder = device.create_command_encoder(&Default::default());
    {
        let mut pass = encoder.begin_compute_pass(&Default::default());
        assert!(pipeline.dispatch(&mut pass, 1, 1, 1));
    }
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let result = read_buffer(device, &ctx.queue, output_buffer.buffer(), NUM_ELEMENTS).unwrap();
    assert_eq!(result, expected);
}
