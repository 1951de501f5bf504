//! # Render Batch
//!
//! One batch is one indexed draw call: a packed vertex stream, 16-bit
//! elements, and the texture and color tables its vertices refer to by slot.

use super::batch_entity::{RenderBatchEntity, TextureHandle};
use super::vertex::{BatchVertex, INDEX_SIZE, VERTEX_SIZE};
use crate::foundation::math::Color;

/// Packed geometry for a single draw call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBatch {
    vertices: Vec<BatchVertex>,
    elements: Vec<u16>,
    texture_slots: Vec<TextureHandle>,
    color_slots: Vec<Color>,
    entity_count: usize,
}

impl RenderBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Packed vertices
    pub fn vertices(&self) -> &[BatchVertex] {
        &self.vertices
    }

    /// Element indices into [`RenderBatch::vertices`]
    pub fn elements(&self) -> &[u16] {
        &self.elements
    }

    /// Vertex stream as raw bytes, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Element stream as raw bytes, ready for upload
    pub fn element_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.elements)
    }

    /// Textures bound to slots `0..n`
    pub fn texture_slots(&self) -> &[TextureHandle] {
        &self.texture_slots
    }

    /// Colors bound to slots `0..n`
    pub fn color_slots(&self) -> &[Color] {
        &self.color_slots
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of element indices
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of drawables packed into this batch
    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    /// Whether nothing has been packed
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub(crate) fn texture_slot(&self, texture: TextureHandle) -> Option<usize> {
        self.texture_slots.iter().position(|slot| *slot == texture)
    }

    pub(crate) fn color_slot(&self, color: Color) -> Option<usize> {
        self.color_slots.iter().position(|slot| *slot == color)
    }

    /// Whether `entity`'s geometry fits next to what is already packed
    pub(crate) fn has_room(&self, entity: &RenderBatchEntity, limits: &super::BatchLimits) -> bool {
        let vertices = self.vertices.len() + entity.vertices.len();
        let elements = self.elements.len() + entity.indices.len();
        vertices <= super::vertex::MAX_BATCH_VERTICES
            && vertices * VERTEX_SIZE <= limits.max_buffer_size
            && elements * INDEX_SIZE <= limits.max_element_buffer_size
    }

    /// Slot for `texture`, registering it if needed
    pub(crate) fn bind_texture(&mut self, texture: TextureHandle) -> usize {
        self.texture_slot(texture).unwrap_or_else(|| {
            self.texture_slots.push(texture);
            self.texture_slots.len() - 1
        })
    }

    /// Slot for `color`, registering it if needed
    pub(crate) fn bind_color(&mut self, color: Color) -> usize {
        self.color_slot(color).unwrap_or_else(|| {
            self.color_slots.push(color);
            self.color_slots.len() - 1
        })
    }

    /// Append an entity's vertices and remapped indices
    ///
    /// The caller has checked [`RenderBatch::has_room`], so every remapped
    /// index stays below 65 536.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn append(&mut self, entity: &RenderBatchEntity, texture_slot: Option<usize>, color_slot: Option<usize>) {
        let base = self.vertices.len() as u32;
        let texture_slot = texture_slot.map_or(super::vertex::NO_SLOT, |slot| slot as f32);
        let color_slot = color_slot.map_or(super::vertex::NO_SLOT, |slot| slot as f32);

        self.vertices.extend(entity.vertices.iter().enumerate().map(|(i, position)| {
            let uv = entity.uv(i);
            BatchVertex {
                position: [position.x, position.y, position.z],
                uv: [uv.x, uv.y],
                texture_slot,
                color_slot,
            }
        }));
        self.elements
            .extend(entity.indices.iter().map(|index| (base + u32::from(*index)) as u16));
        self.entity_count += 1;
    }
}

/// Statistics for batch rendering performance monitoring
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchStats {
    /// Drawables packed into batches
    pub total_entities: usize,

    /// Drawables dropped because they could never fit a batch
    pub skipped_entities: usize,

    /// Number of batches created
    pub batch_count: usize,

    /// Vertices across all batches
    pub vertex_count: usize,

    /// Element indices across all batches
    pub element_count: usize,

    /// Time spent collecting and packing (microseconds)
    pub collection_time_us: u64,

    /// Time spent submitting to the backend (microseconds)
    pub submission_time_us: u64,
}

impl BatchStats {
    /// Tally a finished set of batches
    pub fn from_batches(batches: &[RenderBatch]) -> Self {
        batches.iter().fold(Self::default(), |mut stats, batch| {
            stats.total_entities += batch.entity_count();
            stats.batch_count += 1;
            stats.vertex_count += batch.vertex_count();
            stats.element_count += batch.element_count();
            stats
        })
    }

    /// Average drawables per batch
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_entities_per_batch(&self) -> f32 {
        if self.batch_count == 0 {
            0.0
        } else {
            self.total_entities as f32 / self.batch_count as f32
        }
    }

    /// Get total frame time in microseconds
    pub fn total_time_us(&self) -> u64 {
        self.collection_time_us + self.submission_time_us
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Rect, Vec3};

    #[test]
    fn test_append_remaps_indices() {
        let quad = RenderBatchEntity::sprite_quad(Rect::new(0.0, 0.0, 1.0, 1.0), Rect::unit());
        let mut batch = RenderBatch::new();
        batch.append(&quad, None, None);
        batch.append(&quad, Some(0), Some(2));

        assert_eq!(batch.elements(), &[0, 1, 3, 3, 1, 2, 4, 5, 7, 7, 5, 6]);
        assert_eq!(batch.vertices()[0].texture_slot, -1.0);
        assert_eq!(batch.vertices()[4].texture_slot, 0.0);
        assert_eq!(batch.vertices()[7].color_slot, 2.0);
        assert_eq!(batch.vertex_bytes().len(), 8 * 28);
        assert_eq!(batch.element_bytes().len(), 12 * 2);
        assert_eq!(batch.entity_count(), 2);
    }

    #[test]
    fn test_slots_are_shared() {
        let mut batch = RenderBatch::new();
        assert_eq!(batch.bind_texture(TextureHandle(7)), 0);
        assert_eq!(batch.bind_texture(TextureHandle(9)), 1);
        assert_eq!(batch.bind_texture(TextureHandle(7)), 0);
        assert_eq!(batch.bind_color(Color::WHITE), 0);
        assert_eq!(batch.bind_color(Color::rgb(1.0, 1.0, 1.0)), 0);
        assert_eq!(batch.color_slots().len(), 1);
    }

    #[test]
    fn test_stats_from_batches() {
        let entity = RenderBatchEntity::new(vec![Vec3::zeros(); 3], vec![0, 1, 2]);
        let mut batch = RenderBatch::new();
        batch.append(&entity, None, None);
        batch.append(&entity, None, None);

        let stats = BatchStats::from_batches(&[batch.clone(), batch]);
        assert_eq!(stats.batch_count, 2);
        assert_eq!(stats.total_entities, 4);
        assert_eq!(stats.vertex_count, 12);
        assert!((stats.avg_entities_per_batch() - 2.0).abs() < f32::EPSILON);
        assert_eq!(stats.total_time_us(), 0);
    }
}
