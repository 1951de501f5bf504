//! # Sprite Engine
//!
//! An entity-component-system runtime with a batched 2D sprite and text
//! renderer.
//!
//! ## Features
//!
//! - **ECS Architecture**: registry-checked components, ordered systems and
//!   typed blueprint views
//! - **Scenes**: polled preparation, queued loading and swapping
//! - **Batching**: layered packing of drawables into few draw calls
//! - **Events**: frame-stamped event bus with configurable retention
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sprite_engine::prelude::*;
//!
//! #[derive(Default)]
//! struct Title;
//!
//! impl SceneScript for Title {
//!     fn prepare(&mut self, setup: &mut SceneSetup<'_>) -> Result<Preparation, SceneError> {
//!         let _logo = SpriteBlueprint::create_entity(setup.world);
//!         setup.systems.init_system::<CameraSystem>();
//!         let batching = BatchingSystem::new(setup.batch_limits)
//!             .map_err(|e| SceneError::Resource(e.to_string()))?;
//!         setup.systems.add_system(batching);
//!         Ok(Preparation::Ready)
//!     }
//! }
//!
//! fn main() -> Result<(), EngineError> {
//!     sprite_engine::foundation::logging::init();
//!     let mut engine = Engine::new(EngineConfig::default());
//!     engine.scenes_mut().load_kind::<Title>(false);
//!     loop {
//!         engine.tick()?;
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod ecs;
pub mod events;
pub mod scene;
pub mod render;

mod engine;

pub use engine::{Engine, EngineError};

#[doc(hidden)]
pub use paste;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, EngineConfig},
        ecs::{Blueprint, Component, ComponentKind, EntityId, System, SystemContext, World},
        events::{CleanupPolicy, EventBus},
        foundation::{
            math::{Color, Rect, Vec2, Vec3},
            time::{Stopwatch, Timer},
        },
        render::{
            BatchingSystem, CameraSystem, RenderBatch, RenderBatchEntity, SpriteBlueprint, SpriteComponent,
            SpriteRenderer, TextBlueprint, TextComponent, TextureHandle, TransformComponent,
        },
        scene::{Preparation, SceneError, SceneManager, SceneScript, SceneSetup},
        Engine, EngineError,
    };
}
