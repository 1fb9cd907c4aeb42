use crate::pipeline::PipelineBindings;
use crate::shader::{ShaderStage, create_shader_module};
use litegpu_render::Define;

#[derive(Debug, Default)]
pub struct ComputePipelineDescriptor {
    pub label: Option<String>,
    pub source: String,
    pub defines: Vec<Define>,
    /// Explicit bind group layouts; empty means derive them from the shader.
    pub bind_group_layouts: Vec<wgpu::BindGroupLayout>,
}

impl ComputePipelineDescriptor {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Default::default()
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_defines(mut self, defines: impl IntoIterator<Item = Define>) -> Self {
        self.defines.extend(defines);
        self
    }
}

/// A GLSL compute pipeline with its bind groups.
#[derive(Debug)]
pub struct ComputePipeline {
    descriptor: ComputePipelineDescriptor,
    pipeline: Option<wgpu::ComputePipeline>,
    bindings: PipelineBindings,
}

impl ComputePipeline {
    pub fn new(device: &wgpu::Device, mut descriptor: ComputePipelineDescriptor) -> Self {
        let bindings = PipelineBindings::new(std::mem::take(&mut descriptor.bind_group_layouts));
        let mut pipeline = Self {
            descriptor,
            pipeline: None,
            bindings,
        };
        pipeline.pipeline = pipeline.build(device);
        pipeline
    }

    pub fn descriptor(&self) -> &ComputePipelineDescriptor {
        &self.descriptor
    }

    pub fn pipeline(&self) -> Option<&wgpu::ComputePipeline> {
        self.pipeline.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.pipeline.is_some()
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

    /// Bind the pipeline and its groups, then dispatch.
    ///
    /// Returns `false` without recording anything if the pipeline is absent.
    pub fn dispatch(&self, pass: &mut wgpu::ComputePass<'_>, x: u32, y: u32, z: u32) -> bool {
        let Some(pipeline) = &self.pipeline else {
            return false;
        };
        pass.set_pipeline(pipeline);
        for (index, group) in self.bindings.bind_groups() {
            pass.set_bind_group(index, group, &[]);
        }
        pass.dispatch_workgroups(x, y, z);
        true
    }

    fn build(&self, device: &wgpu::Device) -> Option<wgpu::ComputePipeline> {
        let desc = &self.descriptor;
        let label = desc.label.as_deref();
        let module = create_shader_module(
            device,
            label,
            &desc.source,
            ShaderStage::Compute,
            &desc.defines,
        )?;

        let layout = self.bindings.is_explicit().then(|| {
            let layouts: Vec<&wgpu::BindGroupLayout> =
                self.bindings.explicit_layouts().iter().collect();
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label,
                bind_group_layouts: &layouts,
                push_constant_ranges: &[],
            })
        });

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label,
            layout: layout.as_ref(),
            module: &module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            tracing::error!("compute pipeline rejected: {err}");
            return None;
        }
        tracing::debug!(label = label.unwrap_or("compute"), "compute pipeline built");
        Some(pipeline)
    }
}
