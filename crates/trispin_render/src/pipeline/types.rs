//! GPU-compatible data types for the triangle pipeline
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use trispin_math::mat4::{Mat4, IDENTITY};

/// An interleaved vertex: position followed by color
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Position in model space (x, y, z)
    pub position: [f32; 3],
    /// RGB color
    pub color: [f32; 3],
}

impl Vertex {
    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// The demo triangle: red bottom-left, green bottom-right, blue top
pub const TRIANGLE: [Vertex; 3] = [
    Vertex::new([-0.6, -0.4, 0.0], [1.0, 0.0, 0.0]),
    Vertex::new([0.6, -0.4, 0.0], [0.0, 1.0, 0.0]),
    Vertex::new([0.0, 0.6, 0.0], [0.0, 0.0, 1.0]),
];

/// Shader location of `position`
pub const POSITION_LOCATION: u32 = 0;
/// Shader location of `color`
pub const COLOR_LOCATION: u32 = 1;

/// Uniform block shared by both shader stages
/// Layout: 192 bytes total (must match `Transforms` in vertex.wgsl)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct Transforms {
    /// Model matrix (64 bytes)
    pub model: Mat4,
    /// View matrix (64 bytes)
    pub view: Mat4,
    /// Projection matrix (64 bytes)
    pub projection: Mat4,
}

impl Transforms {
    /// Byte offset of the model matrix within the uniform buffer
    pub const MODEL_OFFSET: u64 = std::mem::offset_of!(Transforms, model) as u64;
    /// Byte offset of the view matrix within the uniform buffer
    pub const VIEW_OFFSET: u64 = std::mem::offset_of!(Transforms, view) as u64;
    /// Byte offset of the projection matrix within the uniform buffer
    pub const PROJECTION_OFFSET: u64 = std::mem::offset_of!(Transforms, projection) as u64;
}

impl Default for Transforms {
    fn default() -> Self {
        Self {
            model: IDENTITY,
            view: IDENTITY,
            projection: IDENTITY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{size_of, offset_of};

    #[test]
    fn test_vertex_size() {
        // 3 floats position + 3 floats color = 24 bytes
        assert_eq!(size_of::<Vertex>(), 24);
        assert_eq!(offset_of!(Vertex, color), 12);
    }

    #[test]
    fn test_transforms_size() {
        // Three 4x4 float matrices = 192 bytes
        assert_eq!(size_of::<Transforms>(), 192);
    }

    #[test]
    fn test_transforms_offsets() {
        assert_eq!(Transforms::MODEL_OFFSET, 0);
        assert_eq!(Transforms::VIEW_OFFSET, 64);
        assert_eq!(Transforms::PROJECTION_OFFSET, 128);
    }

    #[test]
    fn test_triangle_bytes() {
        // 3 vertices * 6 floats
        let bytes: &[u8] = bytemuck::cast_slice(&TRIANGLE);
        assert_eq!(bytes.len(), 3 * 6 * 4);
    }

    #[test]
    fn test_triangle_is_counter_clockwise() {
        let [a, b, c] = TRIANGLE.map(|v| v.position);
        let area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
        assert!(area > 0.0);
    }

    #[test]
    fn test_alignment() {
        assert_eq!(std::mem::align_of::<Vertex>(), 4);
        assert_eq!(std::mem::align_of::<Transforms>(), 4);
    }
}
