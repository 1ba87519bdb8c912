//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Shader loading and the triangle pipeline
//! - Projection updates on resize
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use trispin_math::mat4::{self, Mat4, IDENTITY};
use trispin_render::{
    context::{ContextError, RenderContext},
    pipeline::TrianglePipeline,
    shader::{ShaderError, ShaderSources},
};
use crate::config::{RenderingConfig, ShaderConfig};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// Surface was lost or outdated (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
    /// GPU could not be initialised
    Context(ContextError),
    /// Shaders could not be read, compiled or linked
    Shader(ShaderError),
}

impl RenderError {
    /// Whether the loop can carry on after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::SurfaceLost | RenderError::Other(_))
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
            RenderError::Context(e) => write!(f, "{}", e),
            RenderError::Shader(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Shader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<ShaderError> for RenderError {
    fn from(e: ShaderError) -> Self {
        RenderError::Shader(e)
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        match e {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => RenderError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => RenderError::OutOfMemory,
            other => RenderError::Other(format!("{:?}", other)),
        }
    }
}

/// Projection that keeps the unit square undistorted for a given aspect ratio
pub fn projection_for(aspect_ratio: f32) -> Mat4 {
    mat4::orthographic(-aspect_ratio, aspect_ratio, -1.0, 1.0, -1.0, 1.0)
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: TrianglePipeline,
    render_config: RenderingConfig,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// Brings up the GPU, uploads the triangle, compiles and links the shaders
    /// and sets the initial model, view and projection matrices.
    pub fn new(
        window: Arc<Window>,
        shader_config: &ShaderConfig,
        render_config: RenderingConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let sources = ShaderSources::load(&shader_config.vertex_path, &shader_config.fragment_path)?;
        let pipeline = TrianglePipeline::new(&context.device, context.config.format, &sources)?;

        pipeline.update_model(&context.queue, &IDENTITY);
        pipeline.update_view(&context.queue, &IDENTITY);
        pipeline.update_projection(&context.queue, &projection_for(context.aspect_ratio()));

        log::info!(
            "Uploaded {} vertices, shaders '{}' and '{}' linked",
            pipeline.vertex_count(),
            shader_config.vertex_path,
            shader_config.fragment_path
        );

        Ok(Self {
            context,
            pipeline,
            render_config,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.update_projection(
            &self.context.queue,
            &projection_for(self.context.aspect_ratio()),
        );
    }

    /// Reconfigure the surface after [`RenderError::SurfaceLost`]
    pub fn recover_surface(&mut self) {
        self.context.reconfigure();
    }

    /// Render a single frame with the given model matrix
    pub fn render_frame(&mut self, model: &Mat4) -> Result<(), RenderError> {
        self.pipeline.update_model(&self.context.queue, model);

        let output = self.context.surface.get_current_texture()?;

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = &self.render_config.background_color;
        self.pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.size.width, self.context.size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trispin_math::{mat4::transform, Vec4};

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert_eq!(
            format!("{}", RenderError::Context(ContextError::NoAdapter)),
            "No suitable GPU adapter found"
        );
    }

    #[test]
    fn test_surface_error_mapping() {
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Lost), RenderError::SurfaceLost));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Outdated), RenderError::SurfaceLost));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::OutOfMemory), RenderError::OutOfMemory));
        assert!(matches!(RenderError::from(wgpu::SurfaceError::Timeout), RenderError::Other(_)));
    }

    #[test]
    fn test_recoverable() {
        assert!(RenderError::SurfaceLost.is_recoverable());
        assert!(!RenderError::OutOfMemory.is_recoverable());
        assert!(!RenderError::Shader(ShaderError::Link { log: String::new() }).is_recoverable());
    }

    #[test]
    fn test_shader_error_is_source() {
        use std::error::Error;
        let err = RenderError::from(ShaderError::Link { log: "bad".to_string() });
        assert!(err.source().is_some());
        assert!(err.to_string().contains("bad"));
    }

    #[test]
    fn test_projection_keeps_triangle_on_screen() {
        let projection = projection_for(640.0 / 480.0);
        for vertex in trispin_render::TRIANGLE {
            let [x, y, z] = vertex.position;
            let clip = transform(projection, Vec4::point(x, y, z));
            assert!(clip.x.abs() <= 1.0 && clip.y.abs() <= 1.0, "{:?} off screen", clip);
        }
    }

    #[test]
    fn test_projection_squashes_x_by_aspect() {
        let projection = projection_for(2.0);
        let clip = transform(projection, Vec4::point(1.0, 1.0, 0.0));
        assert!((clip.x - 0.5).abs() < 1e-6);
        assert!((clip.y - 1.0).abs() < 1e-6);
    }
}
