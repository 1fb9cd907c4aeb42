use anyhow::{Context, Result};
use clap::Parser;
use litegpu_app::{FrameContext, InitContext, LiteApp, LiteAppOptions};
use litegpu_common::{CHANGE_EVENT, Listener, TriggerEvent};
use litegpu_render::{CameraDescriptor, VertexArray};
use litegpu_render_wgpu::{RenderPipeline, RenderPipelineDescriptor, UniformBuffer, VertexArrayState};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

const VERTEX_SHADER: &str = "
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

const FRAGMENT_SHADER: &str = "
layout(location = OUT_NORMAL) in vec3 v_normal;
layout(location = 0) out vec4 outColor;

void main() {
    vec3 light = normalize(vec3(0.4, 1.0, 0.6));
    float diffuse = max(dot(normalize(v_normal), light), 0.0);
    vec3 base = v_normal * 0.5 + 0.5;
    outColor = vec4(base * (0.3 + 0.7 * diffuse), 1.0);
}
";

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

#[derive(Parser)]
#[command(name = "litegpu-viewer", about = "Orbit-camera cube viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Camera descriptor as a JSON file
    #[arg(long)]
    camera: Option<PathBuf>,

    /// Target frame rate; 60 or more runs uncapped
    #[arg(long, default_value_t = 0.0)]
    fps: f64,

    /// Hide the frame statistics overlay
    #[arg(long)]
    no_stats: bool,

    #[arg(long, default_value_t = 1280)]
    width: u32,

    #[arg(long, default_value_t = 720)]
    height: u32,
}

struct Scene {
    pipeline: RenderPipeline,
    cube: VertexArrayState,
    uniforms: UniformBuffer,
    depth: wgpu::TextureView,
}

#[derive(Default)]
struct CubeViewer {
    scene: Option<Scene>,
}

fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth_texture"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&Default::default())
}

impl LiteApp for CubeViewer {
    fn on_init(&mut self, ctx: InitContext<'_>) -> Result<()> {
        let cube = VertexArrayState::new(ctx.device, &VertexArray::cube());
        tracing::info!(key = cube.key(), "cube layout");

        let mut pipeline = RenderPipeline::new(
            ctx.device,
            RenderPipelineDescriptor {
                label: Some("cube".to_string()),
                color_formats: vec![ctx.color_format],
                depth_format: DEPTH_FORMAT,
                ..RenderPipelineDescriptor::new(VERTEX_SHADER, FRAGMENT_SHADER)
                    .with_vertex_layout(cube.layout())
            },
        );
        if !pipeline.is_ready() {
            anyhow::bail!("cube pipeline failed to build");
        }

        let uniforms = UniformBuffer::new(
            ctx.device,
            Some("uniforms"),
            16,
            wgpu::BufferUsages::COPY_DST,
        );
        pipeline
            .create_bind_group(
                ctx.device,
                0,
                &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniforms.buffer().as_entire_binding(),
                }],
            )
            .context("no bind group layout for group 0")?;

        let listener: Listener = Rc::new(|event: &TriggerEvent| {
            if let Some(change) = event.as_change() {
                tracing::trace!(property = %change.property, "camera changed");
            }
        });
        ctx.camera.trigger().on(CHANGE_EVENT, listener, None);

        self.scene = Some(Scene {
            pipeline,
            cube,
            uniforms,
            depth: create_depth_texture(ctx.device, ctx.width, ctx.height),
        });
        Ok(())
    }

    fn on_render(&mut self, frame: FrameContext<'_>) -> Result<()> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(());
        };
        scene
            .uniforms
            .set_mat4(&frame.camera.projection_view_matrix())?;
        scene.uniforms.update(frame.queue);

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("cube_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: 0.1,
                        g: 0.1,
                        b: 0.15,
                        a: 1.0,
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &scene.depth,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(0),
                    store: wgpu::StoreOp::Store,
                }),
            }),
            ..Default::default()
        });
        if scene.pipeline.bind(&mut pass) {
            scene.cube.bind(&mut pass);
            scene.cube.draw(&mut pass);
        }
        Ok(())
    }

    fn on_resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if let Some(scene) = self.scene.as_mut() {
            scene.depth = create_depth_texture(device, width, height);
        }
    }
}

fn load_camera(path: &Path) -> Result<CameraDescriptor> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid camera file {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("litegpu-viewer starting");

    let mut options = LiteAppOptions {
        title: "litegpu viewer".to_string(),
        width: cli.width,
        height: cli.height,
        fps: cli.fps,
        debug: !cli.no_stats,
        ..LiteAppOptions::default()
    };
    if let Some(path) = &cli.camera {
        options.camera = load_camera(path)?;
    }

    litegpu_app::run(CubeViewer::default(), options)
}
