//! 4x4 Matrix utilities
//!
//! Column-major matrices laid out exactly as WGSL's `mat4x4<f32>` expects, so a
//! [`Mat4`] can be written straight into a uniform buffer.
//!
//! Angles passed to [`rotate`] are in degrees.

use crate::Vec4;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Create a rotation of `angle` degrees about the axis `(x, y, z)`.
///
/// The axis does not need to be unit length. A zero-length axis has no
/// defined rotation and returns [`IDENTITY`].
///
/// # Example
/// ```
/// use trispin_math::mat4::{rotate, transform};
/// use trispin_math::Vec4;
///
/// let spin = rotate(90.0, 0.0, 0.0, 1.0);
/// let v = transform(spin, Vec4::X);
/// assert!((v.y - 1.0).abs() < 1e-6);
/// ```
pub fn rotate(angle: f32, x: f32, y: f32, z: f32) -> Mat4 {
    let axis = Vec4::direction(x, y, z);
    if axis.length() == 0.0 {
        return IDENTITY;
    }
    let Vec4 { x, y, z, .. } = axis.normalized();

    let (sn, cs) = angle.to_radians().sin_cos();
    let t = 1.0 - cs;

    [
        [x * x * t + cs, y * x * t + z * sn, x * z * t - y * sn, 0.0],
        [x * y * t - z * sn, y * y * t + cs, y * z * t + x * sn, 0.0],
        [x * z * t + y * sn, y * z * t - x * sn, z * z * t + cs, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]
}

/// Create an orthographic projection.
///
/// Maps the box `[left, right] x [bottom, top] x [near, far]` onto the
/// OpenGL clip cube, with z ending up in `[-1, 1]`. Geometry that sits on
/// the z = 0 plane inside a symmetric depth range lands on clip z = 0,
/// which is inside wgpu's `[0, 1]` depth range as well.
pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let width = right - left;
    let height = top - bottom;
    let depth = far - near;

    [
        [2.0 / width, 0.0, 0.0, 0.0],
        [0.0, 2.0 / height, 0.0, 0.0],
        [0.0, 0.0, -2.0 / depth, 0.0],
        [
            -(right + left) / width,
            -(top + bottom) / height,
            -(far + near) / depth,
            1.0,
        ],
    ]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            for k in 0..4 {
                result[i][j] += a[k][j] * b[i][k];
            }
        }
    }

    result
}

/// Transform a Vec4 by a 4x4 matrix (column-major)
///
/// result = M * v
pub fn transform(m: Mat4, v: Vec4) -> Vec4 {
    Vec4::new(
        m[0][0] * v.x + m[1][0] * v.y + m[2][0] * v.z + m[3][0] * v.w,
        m[0][1] * v.x + m[1][1] * v.y + m[2][1] * v.z + m[3][1] * v.w,
        m[0][2] * v.x + m[1][2] * v.y + m[2][2] * v.z + m[3][2] * v.w,
        m[0][3] * v.x + m[1][3] * v.y + m[2][3] * v.z + m[3][3] * v.w,
    )
}
