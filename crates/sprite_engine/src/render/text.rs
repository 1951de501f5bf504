//! Text layout engine
//!
//! Converts strings into glyph quads using a pre-built [`BitmapFont`].
//! Font files are parsed elsewhere; this module only needs glyph metrics.

use std::collections::HashMap;

use super::batch_entity::{quad_corners, RenderBatchEntity, TextureHandle};
use crate::foundation::math::{Rect, Vec2};

/// Metrics and atlas region of one glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Region of the atlas texture
    pub uv: Rect,
    /// Quad size in pixels
    pub size: Vec2,
    /// Offset of the quad from the pen position (x right, y down)
    pub offset: Vec2,
    /// Horizontal advance after this glyph
    pub advance: f32,
}

/// Glyph table for one font atlas
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapFont {
    /// Atlas texture
    pub texture: Option<TextureHandle>,
    /// Distance between baselines
    pub line_height: f32,
    glyphs: HashMap<char, Glyph>,
}

impl BitmapFont {
    /// Create an empty font
    pub fn new(texture: Option<TextureHandle>, line_height: f32) -> Self {
        Self {
            texture,
            line_height,
            glyphs: HashMap::new(),
        }
    }

    /// Add or replace a glyph
    pub fn insert_glyph(&mut self, ch: char, glyph: Glyph) {
        self.glyphs.insert(ch, glyph);
    }

    /// Builder form of [`BitmapFont::insert_glyph`]
    pub fn with_glyph(mut self, ch: char, glyph: Glyph) -> Self {
        self.insert_glyph(ch, glyph);
        self
    }

    /// Look up a glyph
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs.get(&ch)
    }

    /// Number of glyphs
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Whether the font has no glyphs
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Lay out `text` as one drawable: 4 vertices and 6 indices per glyph
///
/// Characters without a glyph are skipped. Layout stops once another glyph
/// would exceed the 16-bit index range.
pub fn layout_text(font: &BitmapFont, text: &str, scale: f32) -> RenderBatchEntity {
    let mut entity = RenderBatchEntity::default();
    entity.texture = font.texture;

    let mut pen = Vec2::zeros();
    for ch in text.chars() {
        if ch == '\n' {
            pen.x = 0.0;
            pen.y += font.line_height * scale;
            continue;
        }

        let Some(glyph) = font.glyph(ch) else {
            log::trace!("No glyph for {:?}", ch);
            continue;
        };

        let origin = pen + glyph.offset * scale;
        let bounds = Rect::new(origin.x, origin.y, glyph.size.x * scale, glyph.size.y * scale);
        if !entity.extend_quad(quad_corners(bounds), 0.0, quad_corners(glyph.uv)) {
            log::warn!("Text truncated at {} glyphs", entity.vertices.len() / 4);
            break;
        }
        pen.x += glyph.advance * scale;
    }

    entity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    fn font() -> BitmapFont {
        let glyph = |u: f32| Glyph {
            uv: Rect::new(u, 0.0, 0.25, 0.5),
            size: Vec2::new(8.0, 10.0),
            offset: Vec2::new(0.0, 2.0),
            advance: 9.0,
        };
        BitmapFont::new(Some(TextureHandle(3)), 12.0)
            .with_glyph('A', glyph(0.0))
            .with_glyph('B', glyph(0.25))
    }

    #[test]
    fn test_layout_one_quad_per_glyph() {
        let entity = layout_text(&font(), "AB", 1.0);

        assert_eq!(entity.vertices.len(), 8);
        assert_eq!(entity.indices, vec![0, 1, 3, 3, 1, 2, 4, 5, 7, 7, 5, 6]);
        assert_eq!(entity.texture, Some(TextureHandle(3)));
        // top-left of the second glyph
        assert_eq!(entity.vertices[7], Vec3::new(9.0, 2.0, 0.0));
        assert_eq!(entity.uv(7), Vec2::new(0.25, 0.0));
    }

    #[test]
    fn test_newline_and_missing_glyphs() {
        let entity = layout_text(&font(), "A?\nB", 2.0);

        assert_eq!(entity.vertices.len(), 8);
        // second line starts at x = 0, y = line_height * scale + offset * scale
        assert_eq!(entity.vertices[7], Vec3::new(0.0, 28.0, 0.0));
        assert_eq!(entity.vertices[5], Vec3::new(16.0, 48.0, 0.0));
    }

    #[test]
    fn test_empty_text() {
        let entity = layout_text(&font(), "", 1.0);
        assert!(entity.vertices.is_empty());
        assert!(entity.indices.is_empty());
    }
}
