//! Drawable components
//!
//! Pure data components read by the batching system. Screen space is
//! y-down, rotation is in radians.

use std::rc::Rc;

use super::batch_entity::TextureHandle;
use super::text::BitmapFont;
use crate::ecs::Component;
use crate::foundation::math::{affine_2d, Color, Mat3, Rect, Vec2};

/// 2D placement of an entity
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// World position
    pub position: Vec2,
    /// Rotation in radians
    pub rotation: f32,
    /// Per-axis scale
    pub scale: Vec2,
    /// Depth written to vertex z
    pub depth: f32,
}

impl Component for TransformComponent {}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            rotation: 0.0,
            scale: Vec2::new(1.0, 1.0),
            depth: 0.0,
        }
    }
}

impl TransformComponent {
    /// Create from position only
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Model matrix (translate * rotate * scale)
    pub fn matrix(&self) -> Mat3 {
        affine_2d(self.position, self.rotation, self.scale)
    }
}

/// Textured or flat-colored quad centered on the entity's transform
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteComponent {
    /// Size before scaling
    pub size: Vec2,
    /// Texture, if any
    pub texture: Option<TextureHandle>,
    /// Flat color, if any
    pub color: Option<Color>,
    /// Region of the texture to sample
    pub uv_rect: Rect,
    /// Paint order bucket
    pub layer: i32,
    /// Hidden sprites are not batched
    pub visible: bool,
}

impl Component for SpriteComponent {}

impl Default for SpriteComponent {
    fn default() -> Self {
        Self {
            size: Vec2::new(1.0, 1.0),
            texture: None,
            color: Some(Color::WHITE),
            uv_rect: Rect::unit(),
            layer: 0,
            visible: true,
        }
    }
}

impl SpriteComponent {
    /// Local corners, top-right first, centered on the origin
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size * 0.5;
        super::batch_entity::quad_corners(Rect::new(-half.x, -half.y, self.size.x, self.size.y))
    }
}

/// Text drawn with a bitmap font, anchored at the transform's top-left
#[derive(Debug, Clone, PartialEq)]
pub struct TextComponent {
    /// String to draw; `\n` starts a new line
    pub text: String,
    /// Font shared between text components
    pub font: Option<Rc<BitmapFont>>,
    /// Glyph scale
    pub scale: f32,
    /// Flat color, if any
    pub color: Option<Color>,
    /// Paint order bucket
    pub layer: i32,
    /// Hidden text is not batched
    pub visible: bool,
}

impl Component for TextComponent {}

impl Default for TextComponent {
    fn default() -> Self {
        Self {
            text: String::new(),
            font: None,
            scale: 1.0,
            color: Some(Color::WHITE),
            layer: 0,
            visible: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::transform_point;
    use approx::assert_relative_eq;

    #[test]
    fn test_sprite_corners_are_centered() {
        let sprite = SpriteComponent {
            size: Vec2::new(4.0, 2.0),
            ..Default::default()
        };
        let corners = sprite.corners();
        assert_eq!(corners[0], Vec2::new(2.0, -1.0));
        assert_eq!(corners[2], Vec2::new(-2.0, 1.0));
    }

    #[test]
    fn test_transform_matrix() {
        let transform = TransformComponent {
            position: Vec2::new(10.0, 0.0),
            rotation: std::f32::consts::FRAC_PI_2,
            scale: Vec2::new(2.0, 2.0),
            depth: 0.0,
        };
        let p = transform_point(&transform.matrix(), Vec2::new(1.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.y, 2.0, epsilon = 1e-5);
    }
}
