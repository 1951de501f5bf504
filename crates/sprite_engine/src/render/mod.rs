//! # Rendering System
//!
//! Batched 2D sprite and text rendering.
//!
//! ## Architecture
//!
//! - **Components**: `TransformComponent`, `SpriteComponent`, `TextComponent`
//! - **BatchingSystem**: turns visible drawables into [`RenderBatchEntity`]s
//!   each frame and packs them with a [`RenderBatcher`]
//! - **SpriteRenderer**: submits finished [`RenderBatch`]es through a
//!   [`DrawBackend`], one indexed draw per batch
//!
//! The batcher knows nothing about the graphics API beyond buffer sizes and
//! slot counts; the backend owns every GPU resource.

pub mod vertex;
pub mod batch_entity;
pub mod batch;
pub mod batcher;
pub mod components;
pub mod text;
pub mod blueprints;
pub mod systems;
pub mod shader;
pub mod renderer;

pub use vertex::{BatchVertex, INDEX_SIZE, MAX_BATCH_VERTICES, VERTEX_SIZE};
pub use batch_entity::{quad_corners, RenderBatchEntity, TextureHandle, QUAD_INDICES};
pub use batch::{BatchStats, RenderBatch};
pub use batcher::{BatchLimits, RenderBatcher};
pub use components::{SpriteComponent, TextComponent, TransformComponent};
pub use text::{layout_text, BitmapFont, Glyph};
pub use blueprints::{SpriteBlueprint, TextBlueprint};
pub use systems::{BatchingSystem, CameraSystem};
pub use shader::{ShaderError, ShaderStage};
pub use renderer::{BackendResult, DrawBackend, SpriteRenderer};

use crate::ecs::ComponentRegistry;

/// Rendering errors
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Batch limits that cannot hold a single drawable
    #[error("Invalid batch limits: {0}")]
    InvalidLimits(String),

    /// Shader compilation or linking failed
    #[error("Shader error: {0}")]
    ShaderCompile(#[from] ShaderError),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Drawing was requested before the program was compiled
    #[error("Shader program has not been compiled")]
    ProgramNotReady,
}

/// Register the built-in drawable components
pub fn register_components(registry: &ComponentRegistry) {
    registry.register::<TransformComponent>();
    registry.register::<SpriteComponent>();
    registry.register::<TextComponent>();
}
