//! Rendering pipeline components

pub mod types;
pub mod triangle_pipeline;

pub use types::{Transforms, Vertex, TRIANGLE, POSITION_LOCATION, COLOR_LOCATION};
pub use triangle_pipeline::TrianglePipeline;
