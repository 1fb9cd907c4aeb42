//! Windowed application harness for litegpu.
//!
//! Implement [`LiteApp`] and hand it to [`run`]. The harness opens a window,
//! acquires a device and surface, attaches an orbit [`Camera`] to pointer
//! input and calls [`LiteApp::on_render`] from an [`AnimationFrame`] loop with
//! a fresh command encoder that is submitted after the hook returns.
//!
//! [`AnimationFrame`]: litegpu_frame::AnimationFrame

mod options;
mod runner;

pub use options::LiteAppOptions;
pub use runner::run;

use litegpu_render::Camera;

/// Resources available while the application initializes.
pub struct InitContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub color_format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    pub camera: &'a mut Camera,
}

/// Resources for one rendered frame.
pub struct FrameContext<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    /// Current surface texture view.
    pub view: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub camera: &'a mut Camera,
    /// Milliseconds since the loop started.
    pub time_ms: f64,
}

/// Application hooks driven by [`run`].
pub trait LiteApp {
    fn on_init(&mut self, ctx: InitContext<'_>) -> anyhow::Result<()>;

    fn on_render(&mut self, frame: FrameContext<'_>) -> anyhow::Result<()>;

    /// Called after the surface has been reconfigured to a new size.
    fn on_resize(&mut self, _device: &wgpu::Device, _width: u32, _height: u32) {}
}

pub fn crate_info() -> &'static str {
    "litegpu-app v0.1.0"
}
