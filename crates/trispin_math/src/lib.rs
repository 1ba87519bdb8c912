//! Math helpers for trispin
//!
//! - [`Vec4`] - homogeneous vector (points with w = 1, directions with w = 0)
//! - [`Mat4`] - column-major 4x4 matrix with rotation and projection builders

mod vec4;
pub mod mat4;

pub use vec4::Vec4;
pub use mat4::Mat4;
