//! Drawable geometry queued for batching

use super::vertex::MAX_BATCH_VERTICES;
use crate::foundation::math::{Color, Rect, Vec2, Vec3};

/// Opaque handle to a GPU texture owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Index order of a quad whose corners are top-right, bottom-right,
/// bottom-left, top-left
pub const QUAD_INDICES: [u16; 6] = [0, 1, 3, 3, 1, 2];

/// Geometry plus draw state for one drawable
///
/// Indices are local to `vertices`. Missing UVs default to `(0, 0)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatchEntity {
    /// Vertex positions
    pub vertices: Vec<Vec3>,
    /// Per-vertex texture coordinates
    pub uvs: Vec<Vec2>,
    /// Triangle list into `vertices`
    pub indices: Vec<u16>,
    /// Flat color, if any
    pub color: Option<Color>,
    /// Texture, if any
    pub texture: Option<TextureHandle>,
    /// Paint order bucket; lower layers draw first
    pub layer: i32,
}

impl RenderBatchEntity {
    /// Create an untextured, uncolored entity on layer 0
    pub fn new(vertices: Vec<Vec3>, indices: Vec<u16>) -> Self {
        Self {
            vertices,
            indices,
            ..Self::default()
        }
    }

    /// Set texture coordinates
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        self.uvs = uvs;
        self
    }

    /// Set the flat color
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Set the texture
    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Set the layer
    pub fn with_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    /// Axis-aligned quad covering `bounds` (y pointing down)
    pub fn sprite_quad(bounds: Rect, uv: Rect) -> Self {
        Self::quad(quad_corners(bounds), 0.0, uv)
    }

    /// Quad from corners ordered top-right, bottom-right, bottom-left, top-left
    pub fn quad(corners: [Vec2; 4], depth: f32, uv: Rect) -> Self {
        let uv_corners = quad_corners(uv);
        let mut quad = Self::default();
        let appended = quad.extend_quad(corners, depth, uv_corners);
        debug_assert!(appended);
        quad
    }

    /// Append another quad, offsetting its indices past existing vertices
    ///
    /// Returns false and leaves the entity unchanged when the quad would
    /// push the vertex count past what 16-bit indices can address.
    #[must_use]
    pub(crate) fn extend_quad(&mut self, corners: [Vec2; 4], depth: f32, uv_corners: [Vec2; 4]) -> bool {
        if self.vertices.len() + corners.len() > MAX_BATCH_VERTICES {
            return false;
        }
        let Ok(base) = u16::try_from(self.vertices.len()) else {
            return false;
        };
        self.indices.extend(QUAD_INDICES.iter().map(|i| base + i));
        self.uvs.resize(self.vertices.len(), Vec2::zeros());
        self.vertices.extend(corners.iter().map(|c| Vec3::new(c.x, c.y, depth)));
        self.uvs.extend_from_slice(&uv_corners);
        true
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Texture coordinate of vertex `index`, `(0, 0)` when missing
    pub fn uv(&self, index: usize) -> Vec2 {
        self.uvs.get(index).copied().unwrap_or_else(Vec2::zeros)
    }
}

/// Corners of `rect` ordered top-right, bottom-right, bottom-left, top-left
pub fn quad_corners(rect: Rect) -> [Vec2; 4] {
    [
        Vec2::new(rect.right(), rect.y),
        Vec2::new(rect.right(), rect.bottom()),
        Vec2::new(rect.x, rect.bottom()),
        Vec2::new(rect.x, rect.y),
    ]
}
