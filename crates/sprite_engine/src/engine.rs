//! Core engine implementation
//!
//! The engine is an explicit context: it owns the component registry, the
//! scene manager, the event bus and the frame timer, and hands the registry
//! to every scene it creates. Hosts drive it by calling [`Engine::update`]
//! (or [`Engine::tick`]) once per frame.

use std::path::Path;

use thiserror::Error;

use crate::config::{Config, ConfigError, EngineConfig};
use crate::ecs::{Component, ComponentKind, ComponentRegistry, EcsError};
use crate::events::EventBus;
use crate::foundation::time::Timer;
use crate::render::{self, BatchLimits, RenderError};
use crate::scene::{SceneError, SceneManager};

/// Main engine struct
pub struct Engine {
    config: EngineConfig,
    registry: ComponentRegistry,
    scenes: SceneManager,
    events: EventBus,
    timer: Timer,
}

impl Engine {
    /// Create an engine; the built-in render components are registered
    pub fn new(config: EngineConfig) -> Self {
        log::info!("Initializing engine...");

        let registry = ComponentRegistry::new();
        render::register_components(&registry);

        let events = EventBus::new(config.events.cleanup);
        let scenes = SceneManager::with_batch_limits(registry.clone(), Self::checked_limits(&config));

        Self {
            config,
            registry,
            scenes,
            events,
            timer: Timer::new(),
        }
    }

    fn checked_limits(config: &EngineConfig) -> BatchLimits {
        let limits = config.render.batch_limits();
        match limits.validate() {
            Ok(()) => limits,
            Err(e) => {
                log::warn!("{}; falling back to default batch limits", e);
                BatchLimits::default()
            }
        }
    }

    /// Create an engine from a `.toml` or `.ron` configuration file
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let config = EngineConfig::load_from_file(path)?;
        Ok(Self::new(config))
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Batch limits handed to scenes, taken from the render configuration
    pub fn batch_limits(&self) -> BatchLimits {
        self.scenes.batch_limits()
    }

    /// Accept component kind `T` on entities of every scene
    pub fn register_component<T: Component + Default>(&mut self) -> bool {
        self.registry.register::<T>()
    }

    /// Whether component kind `T` has been registered
    pub fn registered_component<T: Component>(&self) -> bool {
        self.registry.registered::<T>()
    }

    /// Every registered kind, in registration order
    pub fn registered_components(&self) -> Vec<ComponentKind> {
        self.registry.kinds()
    }

    /// Shared component registry
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Scene manager
    pub fn scenes(&self) -> &SceneManager {
        &self.scenes
    }

    /// Scene manager, mutably
    pub fn scenes_mut(&mut self) -> &mut SceneManager {
        &mut self.scenes
    }

    /// Event bus
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Event bus, mutably
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.timer.frame_count()
    }

    /// Engine time in seconds
    pub fn time(&self) -> f64 {
        self.timer.total_time()
    }

    /// Run one frame of `delta_time` seconds
    pub fn update(&mut self, delta_time: f64) -> Result<(), EngineError> {
        self.timer.advance(delta_time);
        self.events.begin_frame(self.timer.frame_count(), self.timer.total_time());
        self.scenes.update(delta_time, &mut self.events)?;
        Ok(())
    }

    /// Run one frame timed by the wall clock; returns the measured delta
    pub fn tick(&mut self) -> Result<f64, EngineError> {
        let delta_time = self.timer.measure();
        self.update(delta_time)?;
        Ok(delta_time)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene failure
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Rendering failure
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Configuration failure
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Entity or component failure
    #[error("ECS error: {0}")]
    Ecs(#[from] EcsError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{System, SystemContext};
    use crate::events::CleanupPolicy;
    use crate::render::{BatchingSystem, SpriteComponent, TransformComponent};
    use crate::scene::{Preparation, SceneScript, SceneSetup};

    #[derive(Debug, Default)]
    struct ScoreComponent(u32);
    impl Component for ScoreComponent {}

    #[derive(Debug, Clone, PartialEq)]
    struct Scored(u32);

    #[derive(Default)]
    struct Scorer;
    impl System for Scorer {
        fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f64) {
            ctx.world.each_mut::<ScoreComponent>(|_, score| score.0 += 1);
            for score in ctx.world.components::<ScoreComponent>() {
                ctx.events.raise(Scored(score.0));
            }
        }
    }

    #[derive(Default)]
    struct Arena;
    impl SceneScript for Arena {
        fn prepare(&mut self, setup: &mut SceneSetup<'_>) -> Result<Preparation, SceneError> {
            let id = setup.world.create_entity();
            setup.world.add::<ScoreComponent>(id);
            setup.systems.init_system::<Scorer>();
            Ok(Preparation::Ready)
        }
    }

    #[test]
    fn test_render_components_are_registered() {
        let engine = Engine::default();
        assert!(engine.registered_component::<TransformComponent>());
        assert!(engine.registered_component::<SpriteComponent>());
        assert!(!engine.registered_component::<ScoreComponent>());
    }

    #[test]
    fn test_registration_reaches_existing_scenes() {
        let mut engine = Engine::default();
        engine.scenes_mut().load_kind::<Arena>(false);
        engine.update(0.016).unwrap();

        engine.register_component::<ScoreComponent>();
        assert!(engine.registered_components().contains(&ComponentKind::of::<ScoreComponent>()));

        engine.update(0.016).unwrap();
        let scene = engine.scenes().current().unwrap();
        assert_eq!(scene.components::<ScoreComponent>().len(), 1);
    }

    #[test]
    fn test_update_drives_scenes_and_events() {
        let mut engine = Engine::new(EngineConfig::default());
        engine.register_component::<ScoreComponent>();
        engine.scenes_mut().load_kind::<Arena>(false);

        for _ in 0..4 {
            engine.update(0.25).unwrap();
        }

        assert_eq!(engine.frame(), 4);
        assert!((engine.time() - 1.0).abs() < 1e-9);
        // frame 1 loads, frame 2 prepares, frames 3 and 4 tick
        let scores: Vec<u32> = engine.events().events::<Scored>().iter().map(|s| s.event.0).collect();
        assert_eq!(scores, vec![1, 2]);
        assert_eq!(engine.events().latest::<Scored>().map(|s| s.frame), Some(4));
    }

    #[test]
    fn test_event_policy_comes_from_config() {
        let mut config = EngineConfig::default();
        config.events.cleanup = CleanupPolicy::Manual;
        let engine = Engine::new(config);
        assert_eq!(engine.events().policy(), CleanupPolicy::Manual);
        assert_eq!(engine.batch_limits(), BatchLimits::default());
    }

    #[derive(Default)]
    struct Gallery;
    impl SceneScript for Gallery {
        fn prepare(&mut self, setup: &mut SceneSetup<'_>) -> Result<Preparation, SceneError> {
            let batching = BatchingSystem::new(setup.batch_limits).map_err(|e| SceneError::Resource(e.to_string()))?;
            setup.systems.add_system(batching);
            Ok(Preparation::Ready)
        }
    }

    #[test]
    fn test_render_config_reaches_batching_system() {
        let mut config = EngineConfig::default();
        config.render.max_textures = 4;
        config.render.max_buffer_size = 4096;
        let mut engine = Engine::new(config);
        engine.scenes_mut().load_kind::<Gallery>(false);
        engine.update(0.016).unwrap();
        engine.update(0.016).unwrap();

        let scene = engine.scenes().current().unwrap();
        let limits = scene.system::<BatchingSystem>().map(BatchingSystem::limits).unwrap();
        assert_eq!(limits.max_textures, 4);
        assert_eq!(limits.max_buffer_size, 4096);
        assert_eq!(scene.batch_limits(), engine.batch_limits());
    }

    #[test]
    fn test_invalid_render_config_falls_back_to_defaults() {
        let mut config = EngineConfig::default();
        config.render.max_textures = 0;
        let engine = Engine::new(config);
        assert_eq!(engine.batch_limits(), BatchLimits::default());
    }

    #[test]
    fn test_missing_config_file() {
        let path = std::env::temp_dir().join("sprite_engine_missing_config.toml");
        assert!(matches!(Engine::from_config_file(&path), Err(EngineError::Config(ConfigError::Io(_)))));
    }
}
