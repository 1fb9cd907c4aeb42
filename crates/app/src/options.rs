use glam::Vec3;
use litegpu_render::CameraDescriptor;

/// Window, surface and loop settings for [`run`](crate::run).
#[derive(Debug, Clone)]
pub struct LiteAppOptions {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Preferred surface format; the first supported format is used otherwise.
    pub color_format: wgpu::TextureFormat,
    /// Target frame rate; 60 or more runs uncapped.
    pub fps: f64,
    /// Collect frame timings and show them in an overlay.
    pub debug: bool,
    /// Initial camera. The aspect ratio is replaced by the window's.
    pub camera: CameraDescriptor,
}

impl Default for LiteAppOptions {
    fn default() -> Self {
        Self {
            title: "litegpu".to_string(),
            width: 1280,
            height: 720,
            color_format: wgpu::TextureFormat::Bgra8Unorm,
            fps: 0.0,
            debug: true,
            camera: CameraDescriptor {
                position: Vec3::new(0.0, 10.0, 10.0),
                ..CameraDescriptor::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = LiteAppOptions::default();
        assert_eq!(options.color_format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(options.camera.position, Vec3::new(0.0, 10.0, 10.0));
        assert_eq!(options.camera.target, Vec3::ZERO);
        assert!(options.debug);
    }
}
