//! Triangle rendering library
//!
//! This crate provides the wgpu side of trispin.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`shader`] - Shader file loading and per-stage compilation
//! - [`pipeline::TrianglePipeline`] - Vertex buffer, transforms uniform and draw call

pub mod context;
pub mod pipeline;
pub mod shader;

pub use context::{ContextError, RenderContext};
pub use pipeline::{TrianglePipeline, Transforms, Vertex, TRIANGLE};
pub use shader::{read_all_lines, ShaderError, ShaderSources, ShaderStage};
