//! Render systems: camera and batching
//!
//! [`BatchingSystem`] should be added after every system that moves or
//! edits drawables, so it packs the state of the finished frame.

use super::batch::{BatchStats, RenderBatch};
use super::batch_entity::RenderBatchEntity;
use super::batcher::{BatchLimits, RenderBatcher};
use super::blueprints::{SpriteBlueprint, TextBlueprint};
use super::components::TransformComponent;
use super::text::layout_text;
use super::RenderError;
use crate::ecs::{Blueprint, EntityId, System, SystemContext, World};
use crate::foundation::math::{transform_point, Mat3, Vec2};
use crate::foundation::time::Stopwatch;

/// 2D camera
#[derive(Debug, Clone, PartialEq)]
pub struct CameraSystem {
    /// World point shown at `screen_offset`
    pub position: Vec2,
    /// Magnification; 2.0 draws everything twice as large
    pub zoom: f32,
    /// Screen point the camera position maps to, usually the viewport center
    pub screen_offset: Vec2,
    /// Entity whose transform the camera tracks
    pub follow: Option<EntityId>,
}

impl Default for CameraSystem {
    fn default() -> Self {
        Self {
            position: Vec2::zeros(),
            zoom: 1.0,
            screen_offset: Vec2::zeros(),
            follow: None,
        }
    }
}

impl CameraSystem {
    /// Camera centered on a viewport of the given size
    pub fn centered(viewport: Vec2) -> Self {
        Self {
            screen_offset: viewport * 0.5,
            ..Self::default()
        }
    }

    /// World-to-screen transform
    pub fn view_matrix(&self) -> Mat3 {
        Mat3::new_translation(&self.screen_offset)
            * Mat3::new_scaling(self.zoom)
            * Mat3::new_translation(&-self.position)
    }
}

impl System for CameraSystem {
    fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f64) {
        let Some(target) = self.follow else { return };
        match ctx.world.get::<TransformComponent>(target) {
            Some(transform) => self.position = transform.position,
            None => {
                log::debug!("Camera target {} has no transform; no longer following", target);
                self.follow = None;
            }
        }
    }
}

/// Collects visible sprites and text into batches every frame
#[derive(Debug, Default)]
pub struct BatchingSystem {
    batcher: RenderBatcher,
    batches: Vec<RenderBatch>,
    stats: BatchStats,
}

impl BatchingSystem {
    /// Create with explicit limits
    pub fn new(limits: BatchLimits) -> Result<Self, RenderError> {
        Ok(Self {
            batcher: RenderBatcher::new(limits)?,
            batches: Vec::new(),
            stats: BatchStats::default(),
        })
    }

    /// Limits the batcher packs against
    pub fn limits(&self) -> BatchLimits {
        self.batcher.limits()
    }

    /// Queue extra geometry for the next frame, already in screen space
    pub fn buffer(&mut self, entity: RenderBatchEntity) {
        self.batcher.buffer(entity);
    }

    /// Batches built during the last update
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Move the last frame's batches out
    pub fn take_batches(&mut self) -> Vec<RenderBatch> {
        std::mem::take(&mut self.batches)
    }

    /// Statistics of the last update
    pub fn stats(&self) -> &BatchStats {
        &self.stats
    }

    fn collect(&mut self, world: &World, view: &Mat3) {
        for blueprint in SpriteBlueprint::blueprints(world) {
            let (Some(transform), Some(sprite)) = (blueprint.transform(world), blueprint.sprite(world)) else {
                continue;
            };
            if !sprite.visible {
                continue;
            }

            let model_view = view * transform.matrix();
            let corners = sprite.corners().map(|corner| transform_point(&model_view, corner));
            let mut quad = RenderBatchEntity::quad(corners, transform.depth, sprite.uv_rect).with_layer(sprite.layer);
            quad.texture = sprite.texture;
            quad.color = sprite.color;
            self.batcher.buffer(quad);
        }

        for blueprint in TextBlueprint::blueprints(world) {
            let (Some(transform), Some(text)) = (blueprint.transform(world), blueprint.text(world)) else {
                continue;
            };
            if !text.visible || text.text.is_empty() {
                continue;
            }
            let Some(font) = text.font.as_deref() else {
                log::debug!("Text on entity {} has no font", blueprint.entity());
                continue;
            };

            let model_view = view * transform.matrix();
            let mut entity = layout_text(font, &text.text, text.scale);
            for vertex in &mut entity.vertices {
                let p = transform_point(&model_view, vertex.xy());
                vertex.x = p.x;
                vertex.y = p.y;
                vertex.z = transform.depth;
            }
            entity.color = text.color;
            entity.layer = text.layer;
            self.batcher.buffer(entity);
        }
    }
}

impl System for BatchingSystem {
    fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f64) {
        let stopwatch = Stopwatch::start_new();
        let view = ctx
            .systems
            .system::<CameraSystem>()
            .map_or_else(Mat3::identity, CameraSystem::view_matrix);

        self.collect(ctx.world, &view);
        let (batches, mut stats) = self.batcher.build_with_stats();
        self.batcher.clear();

        stats.collection_time_us = stopwatch.elapsed_micros();
        log::trace!(
            "Batched {} drawables into {} batches ({} skipped)",
            stats.total_entities,
            stats.batch_count,
            stats.skipped_entities
        );
        self.batches = batches;
        self.stats = stats;
    }
}
