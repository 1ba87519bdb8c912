//! Top-level application error
//!
//! Every variant is fatal: the event loop exits and `main` returns it.

use crate::systems::{RenderError, WindowError};

#[derive(Debug)]
pub enum AppError {
    /// The event loop could not be created or failed while running
    EventLoop(winit::error::EventLoopError),
    /// The window could not be created
    Window(WindowError),
    /// GPU setup, shader or frame failure
    Render(RenderError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::EventLoop(e) => write!(f, "Event loop error: {}", e),
            AppError::Window(e) => write!(f, "{}", e),
            AppError::Render(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::EventLoop(e) => Some(e),
            AppError::Window(e) => Some(e),
            AppError::Render(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for AppError {
    fn from(e: winit::error::EventLoopError) -> Self {
        AppError::EventLoop(e)
    }
}

impl From<WindowError> for AppError {
    fn from(e: WindowError) -> Self {
        AppError::Window(e)
    }
}

impl From<RenderError> for AppError {
    fn from(e: RenderError) -> Self {
        AppError::Render(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trispin_render::shader::{ShaderError, ShaderStage};

    #[test]
    fn test_shader_failure_message_carries_log() {
        let err: AppError = RenderError::from(ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "unknown identifier `positon`".to_string(),
        })
        .into();
        let msg = err.to_string();
        assert!(msg.contains("vertex"));
        assert!(msg.contains("positon"));
    }

    #[test]
    fn test_window_failure_is_source() {
        use std::error::Error;
        let err: AppError = WindowError::CreationFailed("no display".to_string()).into();
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "Failed to create the window: no display");
    }
}
