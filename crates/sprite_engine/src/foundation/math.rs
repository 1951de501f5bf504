//! Math utilities and types
//!
//! 2D-oriented aliases over `nalgebra` plus the small value types the
//! renderer works with.

use serde::{Deserialize, Serialize};

pub use nalgebra::{Matrix3, Vector2, Vector3};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 3x3 matrix type (2D homogeneous transforms)
pub type Mat3 = Matrix3<f32>;

/// Linear RGBA color
///
/// Equality is component-wise, which is what color slot deduplication uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red channel
    pub r: f32,
    /// Green channel
    pub g: f32,
    /// Blue channel
    pub b: f32,
    /// Alpha channel
    pub a: f32,
}

impl Color {
    /// Opaque white
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Opaque black
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);

    /// Create a color from all four channels
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque color
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Channels as an array, in shader order
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Axis-aligned rectangle (origin at `x`/`y`, extending by `width`/`height`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// The full unit square, used as the default UV rectangle
    pub const fn unit() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Right edge
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::unit()
    }
}

/// Build a 2D affine transform: translate * rotate * scale
pub fn affine_2d(position: Vec2, rotation: f32, scale: Vec2) -> Mat3 {
    Mat3::new_translation(&position)
        * Mat3::new_rotation(rotation)
        * Mat3::new_nonuniform_scaling(&scale)
}

/// Apply a 2D affine transform to a point
pub fn transform_point(matrix: &Mat3, point: Vec2) -> Vec2 {
    let p = matrix * Vec3::new(point.x, point.y, 1.0);
    Vec2::new(p.x, p.y)
}
