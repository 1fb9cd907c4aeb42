/// Realized pipelines that can report their bind group layouts.
pub trait PipelineHandle {
    fn bind_group_layout(&self, index: u32) -> wgpu::BindGroupLayout;
}

impl PipelineHandle for wgpu::RenderPipeline {
    fn bind_group_layout(&self, index: u32) -> wgpu::BindGroupLayout {
        self.get_bind_group_layout(index)
    }
}

impl PipelineHandle for wgpu::ComputePipeline {
    fn bind_group_layout(&self, index: u32) -> wgpu::BindGroupLayout {
        self.get_bind_group_layout(index)
    }
}

/// Bind group layouts and bind groups of one pipeline, by group index.
///
/// Layouts come from the descriptor when given explicitly, otherwise they are
/// fetched lazily from the realized pipeline and cached per slot.
#[derive(Debug, Default)]
pub struct PipelineBindings {
    explicit: Vec<wgpu::BindGroupLayout>,
    derived: Vec<Option<wgpu::BindGroupLayout>>,
    groups: Vec<Option<wgpu::BindGroup>>,
}

impl PipelineBindings {
    pub fn new(explicit: Vec<wgpu::BindGroupLayout>) -> Self {
        Self {
            explicit,
            derived: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Whether layouts were supplied up front.
    pub fn is_explicit(&self) -> bool {
        !self.explicit.is_empty()
    }

    pub fn explicit_layouts(&self) -> &[wgpu::BindGroupLayout] {
        &self.explicit
    }

    /// Forget layouts taken from a previous pipeline, e.g. after a rebuild.
    pub fn reset_derived(&mut self) {
        self.derived.clear();
    }

    /// Layout for group `index`.
    ///
    /// Explicit layouts are used when the index is in range. Any other index
    /// is fetched from `pipeline` on first use and cached. An index the
    /// pipeline does not have yields `None`.
    pub fn layout<P: PipelineHandle>(
        &mut self,
        device: &wgpu::Device,
        index: u32,
        pipeline: Option<&P>,
    ) -> Option<&wgpu::BindGroupLayout> {
        let slot = index as usize;
        if slot < self.explicit.len() {
            return self.explicit.get(slot);
        }
        if self.derived.get(slot).is_none_or(Option::is_none) {
            let pipeline = pipeline?;
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let layout = pipeline.bind_group_layout(index);
            if let Some(err) = pollster::block_on(device.pop_error_scope()) {
                tracing::warn!(index, "no bind group layout: {err}");
                return None;
            }
            if self.derived.len() <= slot {
                self.derived.resize_with(slot + 1, || None);
            }
            self.derived[slot] = Some(layout);
        }
        self.derived[slot].as_ref()
    }

    /// Create a bind group for slot `index` from `entries`, replacing any
    /// previous one. Returns `None` if no layout is available or the entries
    /// do not match it; the slot keeps its previous group in that case.
    pub fn create_bind_group<P: PipelineHandle>(
        &mut self,
        device: &wgpu::Device,
        index: u32,
        pipeline: Option<&P>,
        entries: &[wgpu::BindGroupEntry<'_>],
    ) -> Option<&wgpu::BindGroup> {
        let group = {
            let layout = self.layout(device, index, pipeline)?;
            device.push_error_scope(wgpu::ErrorFilter::Validation);
            let group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: None,
                layout,
                entries,
            });
            if let Some(err) = pollster::block_on(device.pop_error_scope()) {
                tracing::error!(index, "bind group rejected: {err}");
                return None;
            }
            group
        };
        let slot = index as usize;
        if self.groups.len() <= slot {
            self.groups.resize_with(slot + 1, || None);
        }
        self.groups[slot] = Some(group);
        tracing::debug!(index, "bind group created");
        self.groups[slot].as_ref()
    }

    pub fn bind_group(&self, index: u32) -> Option<&wgpu::BindGroup> {
        self.groups.get(index as usize).and_then(Option::as_ref)
    }

    /// Populated slots with their indices, in order.
    pub fn bind_groups(&self) -> impl Iterator<Item = (u32, &wgpu::BindGroup)> {
        self.groups
            .iter()
            .enumerate()
            .filter_map(|(i, group)| group.as_ref().map(|g| (i as u32, g)))
    }
}
