use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use litegpu_render::{
    Define, DrawMode, IndexData, VertexArray, VertexArrayBuffer, VertexAttribute, VertexLayout,
    build_shader_source, number_lines,
};
use litegpu_render_wgpu::{
    ComputePipeline, ComputePipelineDescriptor, GpuContext, PREFIX_SUM_SHADER, ShaderStage,
    StorageBuffer, compile_to_spirv, read_buffer,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "litegpu-cli", about = "CLI tool for litegpu shaders and layouts")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Compile a GLSL shader and optionally write SPIR-V
    Compile {
        /// GLSL source file (without #version; it is added)
        input: PathBuf,
        /// Shader stage; inferred from .vert/.frag/.comp when omitted
        #[arg(short, long)]
        stage: Option<ShaderStage>,
        /// Define as NAME or NAME=VALUE; repeatable
        #[arg(short = 'D', long = "define")]
        defines: Vec<String>,
        /// Write SPIR-V to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the assembled source with line numbers
        #[arg(long)]
        print_source: bool,
    },
    /// Print the layout key and defines of the built-in cube
    Key {
        /// Draw mode token, e.g. TRIANGLES or LINE_STRIP
        #[arg(short, long, default_value = "TRIANGLES")]
        mode: String,
        /// Add a 16-bit index buffer
        #[arg(long)]
        u16_indices: bool,
        /// Add a per-instance offset buffer with this many instances
        #[arg(long)]
        instances: Option<u32>,
    },
    /// Run a prefix sum on the GPU and check it against the CPU
    PrefixSum {
        /// Invocations per workgroup; each handles two elements
        #[arg(short, long, default_value = "256")]
        workgroup_size: u32,
    },
}

fn parse_define(arg: &str) -> Result<Define> {
    match arg.split_once('=') {
        Some((name, value)) => {
            let value = value
                .trim()
                .parse::<i64>()
                .with_context(|| format!("define {name} needs an integer value"))?;
            Ok(Define::value(name.trim(), value))
        }
        None => Ok(Define::flag(arg.trim())),
    }
}

fn parse_mode(token: &str) -> Result<DrawMode> {
    let mode = match token.to_ascii_uppercase().as_str() {
        "POINTS" => DrawMode::Points,
        "LINES" => DrawMode::Lines,
        "LINE_LOOP" => DrawMode::LineLoop,
        "LINE_STRIP" => DrawMode::LineStrip,
        "TRIANGLES" => DrawMode::Triangles,
        "TRIANGLE_STRIP" => DrawMode::TriangleStrip,
        "TRIANGLE_FAN" => DrawMode::TriangleFan,
        other => anyhow::bail!("unknown draw mode: {other}"),
    };
    Ok(mode)
}

fn infer_stage(path: &Path) -> Option<ShaderStage> {
    path.extension()?.to_str()?.parse().ok()
}

fn compile(
    input: &Path,
    stage: Option<ShaderStage>,
    defines: &[String],
    output: Option<&Path>,
    print_source: bool,
) -> Result<()> {
    let stage = stage
        .or_else(|| infer_stage(input))
        .context("cannot infer shader stage; pass --stage")?;
    let defines = defines
        .iter()
        .map(|d| parse_define(d))
        .collect::<Result<Vec<_>>>()?;
    let body = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let source = build_shader_source(&body, &defines).context("shader source is empty")?;
    if print_source {
        println!("{}", number_lines(&source));
    }

    let words = match compile_to_spirv(&source, stage) {
        Ok(words) => words,
        Err(err) => {
            litegpu_render_wgpu::log_shader_error(&err, &source);
            return Err(err.into());
        }
    };
    println!(
        "{}: {} shader OK ({} SPIR-V words)",
        input.display(),
        stage.as_str(),
        words.len()
    );
    if let Some(path) = output {
        std::fs::write(path, bytemuck::cast_slice::<u32, u8>(&words))
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn cube_key(mode: DrawMode, u16_indices: bool, instances: Option<u32>) -> VertexLayout {
    let mut vao = VertexArray::cube().with_mode(mode);
    if u16_indices {
        let indices: Vec<u16> = (0..vao.count as u16).collect();
        vao = vao.with_index_buffer(IndexData::U16(indices.into()));
    }
    if let Some(count) = instances {
        let offsets: Vec<f32> = (0..count).flat_map(|i| [i as f32 * 3.0, 0.0, 0.0]).collect();
        vao.add_buffer(
            VertexArrayBuffer::new(offsets.into(), 12)
                .with_attribute(VertexAttribute::new("offset"))
                .with_instance_count(count),
        );
    }
    VertexLayout::new(&vao)
}

fn prefix_sum(workgroup_size: u32) -> Result<bool> {
    let ctx = GpuContext::new_headless()?;
    let device = &ctx.device;
    let num_elements = workgroup_size as usize * 2;

    let input: Vec<f32> = (0..num_elements).map(|i| ((i * 37) % 1000) as f32).collect();
    let expected: Vec<f32> = input
        .iter()
        .scan(0.0, |total, v| {
            *total += v;
            Some(*total)
        })
        .collect();

    let mut input_buffer = StorageBuffer::new(
        device,
        Some("prefix_sum_input"),
        num_elements,
        wgpu::BufferUsages::COPY_DST,
    );
    input_buffer.set_data(&ctx.queue, &input)?;
    let output_buffer = StorageBuffer::new(
        device,
        Some("prefix_sum_output"),
        num_elements,
        wgpu::BufferUsages::COPY_SRC,
    );

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
            ..ComputePipelineDescriptor::new(PREFIX_SUM_SHADER)
                .with_label("prefix_sum")
                .with_defines([
                    Define::value("WORKGROUP_SIZE", workgroup_size as i64),
                    Define::value("NUM_ELEMENTS", num_elements as i64),
                ])
        },
    );
    if !pipeline.is_ready() {
        anyhow::bail!("prefix sum pipeline failed to build");
    }
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
        .context("no bind group layout for group 0")?;

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("prefix_sum_encoder"),
    });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("prefix_sum_pass"),
            timestamp_writes: None,
        });
        pipeline.dispatch(&mut pass, 1, 1, 1);
    }
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let result = read_buffer(device, &ctx.queue, output_buffer.buffer(), num_elements)?;
    let matching = result
        .iter()
        .zip(&expected)
        .filter(|(got, want)| got == want)
        .count();
    println!("prefix sum: {matching}/{num_elements} elements match");

    input_buffer.destroy();
    output_buffer.destroy();
    Ok(matching == num_elements)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("litegpu-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", litegpu_common::crate_info());
            println!("input: {}", litegpu_input::crate_info());
            println!("frame: {}", litegpu_frame::crate_info());
            println!("render: {}", litegpu_render::crate_info());
            println!("render-wgpu: {}", litegpu_render_wgpu::crate_info());
        }
        Commands::Compile {
            input,
            stage,
            defines,
            output,
            print_source,
        } => {
            compile(&input, stage, &defines, output.as_deref(), print_source)?;
        }
        Commands::Key {
            mode,
            u16_indices,
            instances,
        } => {
            let layout = cube_key(parse_mode(&mode)?, u16_indices, instances);
            println!("key: {}", layout.key());
            println!("defines:");
            for define in layout.defines() {
                println!("  {}", define.directive());
            }
            println!(
                "buffers: {}  unique data: {}  instances: {}",
                layout.buffers().len(),
                layout.unique_data().len(),
                layout.instance_count()
            );
        }
        Commands::PrefixSum { workgroup_size } => {
            if workgroup_size == 0 || !workgroup_size.is_power_of_two() {
                anyhow::bail!("workgroup size must be a power of two");
            }
            if !prefix_sum(workgroup_size)? {
                anyhow::bail!("prefix sum mismatch");
            }
        }
    }

    Ok(())
}
