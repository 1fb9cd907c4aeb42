use crate::{FrameContext, InitContext, LiteApp, LiteAppOptions};
use anyhow::Context as _;
use egui::Context as EguiContext;
use litegpu_frame::{AnimationFrame, FrameStats};
use litegpu_input::PointerTracker;
use litegpu_render::Camera;
use litegpu_render_wgpu::request_device;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

/// Open a window and drive `app` until it is closed.
///
/// Errors from window, surface or device acquisition and from
/// [`LiteApp::on_init`] end the loop and are returned. Errors from
/// [`LiteApp::on_render`] are logged and the loop continues.
pub fn run<A: LiteApp>(app: A, options: LiteAppOptions) -> anyhow::Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut runner = Runner::new(app, options);
    event_loop.run_app(&mut runner)?;
    match runner.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

impl Gpu {
    fn new(
        event_loop: &ActiveEventLoop,
        options: &LiteAppOptions,
        egui_ctx: &EguiContext,
    ) -> anyhow::Result<Self> {
        let attrs = Window::default_attributes()
            .with_title(options.title.as_str())
            .with_inner_size(PhysicalSize::new(options.width, options.height));
        let window = Arc::new(event_loop.create_window(attrs)?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window.clone())?;
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no suitable GPU adapter found")?;
        let (device, queue) = request_device(&adapter)?;

        let caps = surface.get_capabilities(&adapter);
        let format = if caps.formats.contains(&options.color_format) {
            options.color_format
        } else {
            let fallback = caps
                .formats
                .first()
                .copied()
                .context("surface reports no supported formats")?;
            tracing::warn!(
                "surface does not support {:?}; using {fallback:?}",
                options.color_format
            );
            fallback
        };

        let size = window.inner_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let egui_winit = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend, surface format {format:?}",
            adapter.get_info().backend.to_str()
        );

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            egui_winit,
            egui_renderer,
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        self.config.width = size.width.max(1);
        self.config.height = size.height.max(1);
        self.surface.configure(&self.device, &self.config);
    }

    fn aspect(&self) -> f32 {
        self.config.width as f32 / self.config.height as f32
    }
}

struct Runner<A> {
    app: A,
    options: LiteAppOptions,
    camera: Camera,
    pointer: PointerTracker,
    frame: AnimationFrame,
    started: Instant,
    egui_ctx: EguiContext,
    gpu: Option<Gpu>,
    error: Option<anyhow::Error>,
}

impl<A: LiteApp> Runner<A> {
    fn new(app: A, options: LiteAppOptions) -> Self {
        Self {
            app,
            camera: Camera::new(options.camera),
            pointer: PointerTracker::new(),
            frame: AnimationFrame::new(options.fps, options.debug),
            started: Instant::now(),
            egui_ctx: EguiContext::default(),
            gpu: None,
            error: None,
            options,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        tracing::error!("{err:#}");
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self) {
        let Self {
            app,
            camera,
            frame,
            started,
            egui_ctx,
            gpu,
            ..
        } = self;
        let Some(gpu) = gpu.as_mut() else {
            return;
        };
        let window = gpu.window.clone();
        let stats = frame.stats();
        let time_ms = started.elapsed().as_secs_f64() * 1000.0;
        frame.on_host_frame(time_ms, &*window, |t| {
            if let Err(err) = draw(gpu, app, camera, egui_ctx, stats, t) {
                tracing::error!("frame failed: {err:#}");
            }
        });
    }
}

impl<A: LiteApp> ApplicationHandler for Runner<A> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        let gpu = match Gpu::new(event_loop, &self.options, &self.egui_ctx) {
            Ok(gpu) => gpu,
            Err(err) => return self.fail(event_loop, err),
        };
        self.camera.set_aspect(gpu.aspect());

        let init = self.app.on_init(InitContext {
            device: &gpu.device,
            queue: &gpu.queue,
            color_format: gpu.config.format,
            width: gpu.config.width,
            height: gpu.config.height,
            camera: &mut self.camera,
        });
        if let Err(err) = init {
            return self.fail(event_loop, err.context("application init failed"));
        }

        self.camera.attach();
        self.frame.start(&*gpu.window);
        self.gpu = Some(gpu);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        let consumed = gpu.egui_winit.on_window_event(&gpu.window, &event).consumed;

        match event {
            WindowEvent::CloseRequested => {
                self.frame.stop(&*gpu.window);
                self.camera.detach();
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                gpu.resize(size);
                self.camera.set_aspect(gpu.aspect());
                self.app
                    .on_resize(&gpu.device, gpu.config.width, gpu.config.height);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            other => {
                if consumed {
                    return;
                }
                if let Some(pointer) = self.pointer.translate(&other) {
                    self.camera.apply_pointer_event(pointer);
                }
            }
        }
    }
}

fn draw<A: LiteApp>(
    gpu: &mut Gpu,
    app: &mut A,
    camera: &mut Camera,
    egui_ctx: &EguiContext,
    stats: Option<FrameStats>,
    time_ms: f64,
) -> anyhow::Result<()> {
    let output = match gpu.surface.get_current_texture() {
        Ok(texture) => texture,
        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
            gpu.surface.configure(&gpu.device, &gpu.config);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    let view = output
        .texture
        .create_view(&wgpu::TextureViewDescriptor::default());
    let mut encoder = gpu
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame_encoder"),
        });

    app.on_render(FrameContext {
        device: &gpu.device,
        queue: &gpu.queue,
        encoder: &mut encoder,
        view: &view,
        width: gpu.config.width,
        height: gpu.config.height,
        camera,
        time_ms,
    })?;

    if let Some(stats) = stats {
        draw_overlay(gpu, egui_ctx, &mut encoder, &view, stats);
    }

    gpu.queue.submit(std::iter::once(encoder.finish()));
    output.present();
    Ok(())
}

fn draw_overlay(
    gpu: &mut Gpu,
    egui_ctx: &EguiContext,
    encoder: &mut wgpu::CommandEncoder,
    view: &wgpu::TextureView,
    stats: FrameStats,
) {
    let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
    let full_output = egui_ctx.run(raw_input, |ctx| {
        egui::Area::new(egui::Id::new("frame_stats"))
            .fixed_pos(egui::pos2(8.0, 8.0))
            .show(ctx, |ui| {
                ui.label(
                    egui::RichText::new(stats.to_string())
                        .monospace()
                        .color(egui::Color32::WHITE),
                );
            });
    });
    gpu.egui_winit
        .handle_platform_output(&gpu.window, full_output.platform_output);

    let paint_jobs = egui_ctx.tessellate(full_output.shapes, full_output.pixels_per_point);
    let screen_descriptor = egui_wgpu::ScreenDescriptor {
        size_in_pixels: [gpu.config.width, gpu.config.height],
        pixels_per_point: full_output.pixels_per_point,
    };

    for (id, image_delta) in &full_output.textures_delta.set {
        gpu.egui_renderer
            .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
    }
    gpu.egui_renderer.update_buffers(
        &gpu.device,
        &gpu.queue,
        encoder,
        &paint_jobs,
        &screen_descriptor,
    );
    {
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("overlay_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            })
            .forget_lifetime();
        gpu.egui_renderer
            .render(&mut pass, &paint_jobs, &screen_descriptor);
    }
    for id in &full_output.textures_delta.free {
        gpu.egui_renderer.free_texture(id);
    }
}
