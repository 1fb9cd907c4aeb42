use crate::layout::{OwnedVertexBufferLayout, buffer_layouts, primitive_topology};
use crate::pipeline::PipelineBindings;
use crate::shader::{ShaderStage, create_shader_module};
use litegpu_render::{Define, VertexLayout};

/// Sample count used when MSAA is enabled.
pub const MSAA_SAMPLE_COUNT: u32 = 4;

/// Blend state used when the descriptor does not override it.
///
/// With blending on this is standard alpha blending; with it off it writes
/// the source unchanged.
pub fn default_blend_state(enable_blend: bool) -> wgpu::BlendState {
    let (src, dst) = if enable_blend {
        (wgpu::BlendFactor::SrcAlpha, wgpu::BlendFactor::OneMinusSrcAlpha)
    } else {
        (wgpu::BlendFactor::One, wgpu::BlendFactor::Zero)
    };
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: src,
            dst_factor: dst,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: dst,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Everything needed to build a [`RenderPipeline`].
#[derive(Debug)]
pub struct RenderPipelineDescriptor {
    pub label: Option<String>,
    pub vertex_source: String,
    pub fragment_source: String,
    pub defines: Vec<Define>,
    pub color_formats: Vec<wgpu::TextureFormat>,
    pub topology: wgpu::PrimitiveTopology,
    pub front_face: wgpu::FrontFace,
    pub cull_mode: Option<wgpu::Face>,
    pub enable_depth: bool,
    pub depth_write: bool,
    pub depth_format: wgpu::TextureFormat,
    pub depth_compare: wgpu::CompareFunction,
    pub stencil_front: wgpu::StencilFaceState,
    pub stencil_back: wgpu::StencilFaceState,
    pub stencil_read_mask: u32,
    pub stencil_write_mask: u32,
    pub enable_blend: bool,
    /// Overrides [`default_blend_state`] when set.
    pub blend: Option<wgpu::BlendState>,
    pub write_mask: wgpu::ColorWrites,
    pub enable_msaa: bool,
    pub vertex_buffers: Vec<OwnedVertexBufferLayout>,
    /// Explicit bind group layouts; empty means derive them from the shaders.
    pub bind_group_layouts: Vec<wgpu::BindGroupLayout>,
}

impl Default for RenderPipelineDescriptor {
    fn default() -> Self {
        let stencil_face = wgpu::StencilFaceState {
            compare: wgpu::CompareFunction::Always,
            fail_op: wgpu::StencilOperation::Keep,
            depth_fail_op: wgpu::StencilOperation::Keep,
            pass_op: wgpu::StencilOperation::Keep,
        };
        Self {
            label: None,
            vertex_source: String::new(),
            fragment_source: String::new(),
            defines: Vec::new(),
            color_formats: vec![wgpu::TextureFormat::Bgra8Unorm],
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            enable_depth: true,
            depth_write: true,
            depth_format: wgpu::TextureFormat::Depth24PlusStencil8,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil_front: stencil_face,
            stencil_back: stencil_face,
            stencil_read_mask: 0xFFFF_FFFF,
            stencil_write_mask: 0xFFFF_FFFF,
            enable_blend: false,
            blend: None,
            write_mask: wgpu::ColorWrites::ALL,
            enable_msaa: false,
            vertex_buffers: Vec::new(),
            bind_group_layouts: Vec::new(),
        }
    }
}

impl RenderPipelineDescriptor {
    pub fn new(vertex_source: impl Into<String>, fragment_source: impl Into<String>) -> Self {
        Self {
            vertex_source: vertex_source.into(),
            fragment_source: fragment_source.into(),
            ..Default::default()
        }
    }

    /// Take vertex buffers, topology and defines from a vertex layout.
    ///
    /// Layout defines come after any defines already present.
    pub fn with_vertex_layout(mut self, layout: &VertexLayout) -> Self {
        self.vertex_buffers = buffer_layouts(layout);
        if let Some(topology) = primitive_topology(layout.mode()) {
            self.topology = topology;
        }
        self.defines.extend(layout.defines().iter().cloned());
        self
    }

    pub fn with_defines(mut self, defines: impl IntoIterator<Item = Define>) -> Self {
        self.defines.extend(defines);
        self
    }

    pub fn blend_state(&self) -> wgpu::BlendState {
        self.blend
            .unwrap_or_else(|| default_blend_state(self.enable_blend))
    }

    pub fn sample_count(&self) -> u32 {
        if self.enable_msaa { MSAA_SAMPLE_COUNT } else { 1 }
    }

    fn depth_stencil(&self) -> Option<wgpu::DepthStencilState> {
        self.enable_depth.then(|| wgpu::DepthStencilState {
            format: self.depth_format,
            depth_write_enabled: self.depth_write,
            depth_compare: self.depth_compare,
            stencil: wgpu::StencilState {
                front: self.stencil_front,
                back: self.stencil_back,
                read_mask: self.stencil_read_mask,
                write_mask: self.stencil_write_mask,
            },
            bias: wgpu::DepthBiasState::default(),
        })
    }
}

/// A GLSL render pipeline with its bind groups.
///
/// The wgpu pipeline is absent if either shader failed to compile or the
/// device rejected the descriptor; both cases are logged.
#[derive(Debug)]
pub struct RenderPipeline {
    descriptor: RenderPipelineDescriptor,
    pipeline: Option<wgpu::RenderPipeline>,
    bindings: PipelineBindings,
}

impl RenderPipeline {
    pub fn new(device: &wgpu::Device, mut descriptor: RenderPipelineDescriptor) -> Self {
        let bindings = PipelineBindings::new(std::mem::take(&mut descriptor.bind_group_layouts));
        let mut pipeline = Self {
            descriptor,
            pipeline: None,
            bindings,
        };
        pipeline.rebuild(device);
        pipeline
    }

    pub fn descriptor(&self) -> &RenderPipelineDescriptor {
        &self.descriptor
    }

    pub fn pipeline(&self) -> Option<&wgpu::RenderPipeline> {
        self.pipeline.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some()
    }

    pub fn enable_msaa(&self) -> bool {
        self.descriptor.enable_msaa
    }

    pub fn sample_count(&self) -> u32 {
        self.descriptor.sample_count()
    }

    /// Toggle multisampling, rebuilding the pipeline if the value changes.
    pub fn set_enable_msaa(&mut self, device: &wgpu::Device, enable: bool) {
        if self.descriptor.enable_msaa == enable {
            return;
        }
        self.descriptor.enable_msaa = enable;
        self.rebuild(device);
    }

    pub fn bind_group_layout(
        &mut self,
        device: &wgpu::Device,
        index: u32,
    ) -> Option<&wgpu::BindGroupLayout> {
        self.bindings.layout(device, index, self.pipeline.as_ref())
    }

    pub fn create_bind_group(
        &mut self,
        device: &wgpu::Device,
        index: u32,
        entries: &[wgpu::BindGroupEntry<'_>],
    ) -> Option<&wgpu::BindGroup> {
        self.bindings
            .create_bind_group(device, index, self.pipeline.as_ref(), entries)
    }

    pub fn bind_group(&self, index: u32) -> Option<&wgpu::BindGroup> {
        self.bindings.bind_group(index)
    }

    /// Set the pipeline and every bind group on `pass`.
    ///
    /// Returns `false` without touching the pass if the pipeline is absent.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) -> bool {
        let Some(pipeline) = &self.pipeline else {
            return false;
        };
        pass.set_pipeline(pipeline);
        for (index, group) in self.bindings.bind_groups() {
            pass.set_bind_group(index, group, &[]);
        }
        true
    }

    fn rebuild(&mut self, device: &wgpu::Device) {
        self.pipeline = self.build(device);
        self.bindings.reset_derived();
        tracing::debug!(
            label = self.descriptor.label.as_deref().unwrap_or("render"),
            ready = self.pipeline.is_some(),
            samples = self.sample_count(),
            "render pipeline built"
        );
    }

    fn build(&self, device: &wgpu::Device) -> Option<wgpu::RenderPipeline> {
        let desc = &self.descriptor;
        let label = desc.label.as_deref();
        let vertex = create_shader_module(
            device,
            label,
            &desc.vertex_source,
            ShaderStage::Vertex,
            &desc.defines,
        )?;
        // Vertex-only pipelines (depth passes) have no fragment stage.
        let fragment = if desc.fragment_source.trim().is_empty() {
            None
        } else {
            Some(create_shader_module(
                device,
                label,
                &desc.fragment_source,
                ShaderStage::Fragment,
                &desc.defines,
            )?)
        };

        let layout = self.bindings.is_explicit().then(|| {
            let layouts: Vec<&wgpu::BindGroupLayout> =
                self.bindings.explicit_layouts().iter().collect();
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            })
        });

        let buffers: Vec<wgpu::VertexBufferLayout<'_>> =
            desc.vertex_buffers.iter().map(|b| b.as_wgpu()).collect();
        let blend = desc.blend_state();
        let targets: Vec<Option<wgpu::ColorTargetState>> = desc
            .color_formats
            .iter()
            .map(|&format| {
                Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(blend),
                    write_mask: desc.write_mask,
                })
            })
            .collect();

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label,
            layout: layout.as_ref(),
            vertex: wgpu::VertexState {
                module: &vertex,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                buffers: &buffers,
            },
            fragment: fragment.as_ref().map(|module| wgpu::FragmentState {
                module,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                targets: &targets,
            }),
            primitive: wgpu::PrimitiveState {
                topology: desc.topology,
                front_face: desc.front_face,
                cull_mode: desc.cull_mode,
                ..Default::default()
            },
            depth_stencil: desc.depth_stencil(),
            multisample: wgpu::MultisampleState {
                count: desc.sample_count(),
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            tracing::error!("render pipeline rejected: {err}");
            return None;
        }
        Some(pipeline)
    }
}
