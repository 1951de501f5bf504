//! # Render Batcher
//!
//! Packs queued drawables into as few draw calls as the limits allow.
//!
//! ## Packing rules
//!
//! - Layers are visited in ascending order, drawables within a layer in the
//!   order they were buffered
//! - A new batch starts when the next drawable would overflow the vertex
//!   buffer, the element buffer, the 16-bit index range, or would need a new
//!   texture or color slot while that table is full
//! - Indices are rebased onto the batch's vertex count at append time
//!
//! Running out of room is never an error; it only starts a new batch.

use std::collections::BTreeMap;

use super::batch::{BatchStats, RenderBatch};
use super::batch_entity::RenderBatchEntity;
use super::vertex::{INDEX_SIZE, MAX_BATCH_VERTICES, VERTEX_SIZE};
use super::RenderError;

/// Per-batch capacities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    /// Vertex buffer size in bytes
    pub max_buffer_size: usize,
    /// Element buffer size in bytes
    pub max_element_buffer_size: usize,
    /// Texture slots per batch; also bounds the color table
    pub max_textures: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            max_buffer_size: 1 << 20,
            max_element_buffer_size: 1 << 20,
            max_textures: 16,
        }
    }
}

impl BatchLimits {
    /// Check that at least one vertex, one index and one slot fit
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.max_buffer_size < VERTEX_SIZE {
            return Err(RenderError::InvalidLimits(format!(
                "max_buffer_size {} cannot hold a single {}-byte vertex",
                self.max_buffer_size, VERTEX_SIZE
            )));
        }
        if self.max_element_buffer_size < INDEX_SIZE {
            return Err(RenderError::InvalidLimits(format!(
                "max_element_buffer_size {} cannot hold a single index",
                self.max_element_buffer_size
            )));
        }
        if self.max_textures == 0 {
            return Err(RenderError::InvalidLimits("max_textures must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Layered queue of drawables and the packing algorithm over it
#[derive(Debug, Default)]
pub struct RenderBatcher {
    limits: BatchLimits,
    layers: BTreeMap<i32, Vec<RenderBatchEntity>>,
    queued: usize,
}

impl RenderBatcher {
    /// Create a batcher with validated limits
    pub fn new(limits: BatchLimits) -> Result<Self, RenderError> {
        limits.validate()?;
        Ok(Self {
            limits,
            layers: BTreeMap::new(),
            queued: 0,
        })
    }

    /// Active limits
    pub fn limits(&self) -> BatchLimits {
        self.limits
    }

    /// Queue a drawable on its layer
    pub fn buffer(&mut self, entity: RenderBatchEntity) {
        self.layers.entry(entity.layer).or_default().push(entity);
        self.queued += 1;
    }

    /// Number of queued drawables
    pub fn len(&self) -> usize {
        self.queued
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queued == 0
    }

    /// Drop every queued drawable
    pub fn clear(&mut self) {
        self.layers.clear();
        self.queued = 0;
    }

    /// Pack the queue into batches
    pub fn build(&self) -> Vec<RenderBatch> {
        self.pack().0
    }

    /// Pack the queue and tally the result
    pub fn build_with_stats(&self) -> (Vec<RenderBatch>, BatchStats) {
        let (batches, skipped) = self.pack();
        let mut stats = BatchStats::from_batches(&batches);
        stats.skipped_entities = skipped;
        (batches, stats)
    }

    fn pack(&self) -> (Vec<RenderBatch>, usize) {
        let mut batches = Vec::new();
        let mut current = RenderBatch::new();
        let mut skipped = 0;

        for entity in self.layers.values().flatten() {
            if !self.is_packable(entity) {
                skipped += 1;
                continue;
            }

            let texture_full = entity.texture.map_or(false, |texture| {
                current.texture_slot(texture).is_none() && current.texture_slots().len() >= self.limits.max_textures
            });
            let color_full = entity.color.map_or(false, |color| {
                current.color_slot(color).is_none() && current.color_slots().len() >= self.limits.max_textures
            });

            if !current.has_room(entity, &self.limits) || texture_full || color_full {
                if !current.is_empty() {
                    batches.push(std::mem::take(&mut current));
                }
            }

            let texture_slot = entity.texture.map(|texture| current.bind_texture(texture));
            let color_slot = entity.color.map(|color| current.bind_color(color));
            current.append(entity, texture_slot, color_slot);
        }

        if !current.is_empty() {
            batches.push(current);
        }

        (batches, skipped)
    }

    /// Whether `entity` fits an empty batch and only indexes its own vertices
    fn is_packable(&self, entity: &RenderBatchEntity) -> bool {
        let vertices = entity.vertices.len();
        if vertices == 0 {
            log::trace!("Skipping drawable without vertices");
            return false;
        }
        if vertices > MAX_BATCH_VERTICES
            || vertices * VERTEX_SIZE > self.limits.max_buffer_size
            || entity.indices.len() * INDEX_SIZE > self.limits.max_element_buffer_size
        {
            log::warn!(
                "Skipping drawable with {} vertices and {} indices: larger than a whole batch",
                vertices,
                entity.indices.len()
            );
            return false;
        }
        if let Some(index) = entity.indices.iter().find(|index| usize::from(**index) >= vertices) {
            log::warn!("Skipping drawable: index {} out of range for {} vertices", index, vertices);
            return false;
        }
        true
    }
}
