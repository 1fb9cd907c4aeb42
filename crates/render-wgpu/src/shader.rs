use litegpu_render::{Define, build_shader_source, number_lines};
use std::borrow::Cow;

/// Single-workgroup inclusive prefix sum over `NUM_ELEMENTS` floats.
///
/// Needs `WORKGROUP_SIZE` and `NUM_ELEMENTS` (twice the workgroup size)
/// defined. Binding 0 is the read-only input, binding 1 the output.
pub const PREFIX_SUM_SHADER: &str = include_str!("../shaders/prefix_sum.comp");

/// Pipeline stage a GLSL source is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
    Compute,
}

impl ShaderStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        }
    }
}

impl From<ShaderStage> for naga::ShaderStage {
    fn from(stage: ShaderStage) -> Self {
        match stage {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
            ShaderStage::Compute => naga::ShaderStage::Compute,
        }
    }
}

impl std::str::FromStr for ShaderStage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" | "vert" => Ok(Self::Vertex),
            "fragment" | "frag" => Ok(Self::Fragment),
            "compute" | "comp" => Ok(Self::Compute),
            other => Err(format!("unknown shader stage: {other}")),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("empty {0} shader source")]
    Empty(&'static str),
    #[error("{stage} shader failed to parse:\n{message}")]
    Parse { stage: &'static str, message: String },
    #[error("{stage} shader failed validation:\n{message}")]
    Validation { stage: &'static str, message: String },
    #[error("SPIR-V emission failed: {0}")]
    Spirv(String),
}

fn parse_and_validate(
    source: &str,
    stage: ShaderStage,
) -> Result<(naga::Module, naga::valid::ModuleInfo), ShaderError> {
    if source.is_empty() {
        return Err(ShaderError::Empty(stage.as_str()));
    }
    let mut frontend = naga::front::glsl::Frontend::default();
    let options = naga::front::glsl::Options::from(naga::ShaderStage::from(stage));
    let module = frontend
        .parse(&options, source)
        .map_err(|errors| ShaderError::Parse {
            stage: stage.as_str(),
            message: errors.emit_to_string(source),
        })?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|err| ShaderError::Validation {
        stage: stage.as_str(),
        message: err.emit_to_string(source),
    })?;

    Ok((module, info))
}

/// Parse GLSL 450 (entry point `main`) and validate the resulting module.
pub fn compile_glsl(source: &str, stage: ShaderStage) -> Result<naga::Module, ShaderError> {
    parse_and_validate(source, stage).map(|(module, _)| module)
}

/// Compile GLSL 450 all the way to SPIR-V words.
pub fn compile_to_spirv(source: &str, stage: ShaderStage) -> Result<Vec<u32>, ShaderError> {
    let (module, info) = parse_and_validate(source, stage)?;
    naga::back::spv::write_vec(&module, &info, &naga::back::spv::Options::default(), None)
        .map_err(|err| ShaderError::Spirv(err.to_string()))
}

/// Log a compilation failure with the line-numbered source it refers to.
pub fn log_shader_error(err: &ShaderError, source: &str) {
    tracing::error!("{err}");
    tracing::error!("shader source:\n{}", number_lines(source));
}

/// Assemble `source` with `defines`, compile it and create a device module.
///
/// Returns `None` (after logging) if the source is empty or fails to compile.
pub fn create_shader_module(
    device: &wgpu::Device,
    label: Option<&str>,
    source: &str,
    stage: ShaderStage,
    defines: &[Define],
) -> Option<wgpu::ShaderModule> {
    let Some(full) = build_shader_source(source, defines) else {
        tracing::warn!(stage = stage.as_str(), "empty shader source");
        return None;
    };
    match compile_glsl(&full, stage) {
        Ok(module) => Some(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label,
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        })),
        Err(err) => {
            log_shader_error(&err, &full);
            None
        }
    }
}
