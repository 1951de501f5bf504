//! Scene: one world, one system table, one script

use std::any::TypeId;
use std::fmt;

use super::SceneError;
use crate::ecs::component::short_type_name;
use crate::ecs::{
    AsAny, Component, ComponentKind, ComponentRegistry, EcsError, EntityId, EntityMut, EntityRef, System,
    SystemTable, World,
};
use crate::events::EventBus;
use crate::render::BatchLimits;

/// Result of one poll of [`SceneScript::prepare`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preparation {
    /// Still waiting on something; poll again next update
    Pending,
    /// Setup finished; systems run from the next update on
    Ready,
}

/// Lifecycle state of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// Never updated
    Unprepared,
    /// `prepare` has been polled but has not finished
    Preparing,
    /// Systems run every update
    Ready,
    /// `cleanup` has run; the scene is inert
    CleanedUp,
}

/// Mutable access handed to [`SceneScript::prepare`]
pub struct SceneSetup<'a> {
    /// The scene's world
    pub world: &'a mut World,
    /// The scene's systems
    pub systems: &'a mut SystemTable,
    /// Engine-wide event bus
    pub events: &'a mut EventBus,
    /// Batch limits from the engine's render configuration
    pub batch_limits: BatchLimits,
}

/// Game-specific scene configuration
pub trait SceneScript: AsAny {
    /// Populate the scene; polled once per update until it returns `Ready`
    fn prepare(&mut self, setup: &mut SceneSetup<'_>) -> Result<Preparation, SceneError> {
        let _ = setup;
        Ok(Preparation::Ready)
    }

    /// Called once when the scene is unloaded
    fn cleanup(&mut self, world: &mut World) {
        let _ = world;
    }

    /// Diagnostic name
    fn name(&self) -> &'static str {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl dyn SceneScript {
    /// Downcast to a concrete script type
    pub fn downcast_ref<S: SceneScript>(&self) -> Option<&S> {
        self.as_any().downcast_ref::<S>()
    }

    /// Mutably downcast to a concrete script type
    pub fn downcast_mut<S: SceneScript>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut::<S>()
    }
}

/// A world plus the systems that update it
pub struct Scene {
    kind: TypeId,
    name: &'static str,
    script: Box<dyn SceneScript>,
    world: World,
    systems: SystemTable,
    state: SceneState,
    prepare_polls: u32,
    batch_limits: BatchLimits,
}

impl Scene {
    /// Create an unprepared scene bound to an engine's registry
    pub fn new<S: SceneScript>(script: S, registry: ComponentRegistry) -> Self {
        let name = script.name();
        Self {
            kind: TypeId::of::<S>(),
            name,
            script: Box::new(script),
            world: World::new(registry),
            systems: SystemTable::new(),
            state: SceneState::Unprepared,
            prepare_polls: 0,
            batch_limits: BatchLimits::default(),
        }
    }

    /// Use `limits` for the batch limits handed to `prepare`
    #[must_use]
    pub fn with_batch_limits(mut self, limits: BatchLimits) -> Self {
        self.batch_limits = limits;
        self
    }

    /// Batch limits handed to `prepare`
    pub fn batch_limits(&self) -> BatchLimits {
        self.batch_limits
    }

    /// Advance the scene by one frame
    ///
    /// While unprepared the script's `prepare` is polled and systems stay
    /// idle, including on the call that completes preparation.
    pub fn update(&mut self, delta_time: f64, events: &mut EventBus) -> Result<(), SceneError> {
        match self.state {
            SceneState::Unprepared | SceneState::Preparing => self.poll_prepare(events),
            SceneState::Ready => {
                self.systems.run(&mut self.world, events, delta_time);
                Ok(())
            }
            SceneState::CleanedUp => Ok(()),
        }
    }

    fn poll_prepare(&mut self, events: &mut EventBus) -> Result<(), SceneError> {
        if self.state == SceneState::Unprepared {
            log::debug!("Preparing scene {}", self.name);
            self.state = SceneState::Preparing;
        }

        self.prepare_polls += 1;
        let mut setup = SceneSetup {
            world: &mut self.world,
            systems: &mut self.systems,
            events,
            batch_limits: self.batch_limits,
        };

        match self.script.prepare(&mut setup) {
            Ok(Preparation::Ready) => {
                log::debug!(
                    "Scene {} ready after {} poll(s): {} entities, systems {:?}",
                    self.name,
                    self.prepare_polls,
                    self.world.len(),
                    self.systems.names()
                );
                self.state = SceneState::Ready;
                Ok(())
            }
            Ok(Preparation::Pending) => Ok(()),
            Err(e) => Err(SceneError::PrepareFailed {
                scene: self.name,
                reason: e.to_string(),
            }),
        }
    }

    /// Run the script's cleanup hook, at most once
    pub(crate) fn cleanup(&mut self) {
        if self.state == SceneState::CleanedUp {
            return;
        }
        if self.state == SceneState::Preparing {
            log::debug!("Cancelling preparation of scene {}", self.name);
        }
        self.script.cleanup(&mut self.world);
        self.state = SceneState::CleanedUp;
        log::debug!("Cleaned up scene {}", self.name);
    }

    /// Lifecycle state
    pub fn state(&self) -> SceneState {
        self.state
    }

    /// Whether systems are running
    pub fn is_ready(&self) -> bool {
        self.state == SceneState::Ready
    }

    /// Script name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type of the script that configures this scene
    pub fn kind(&self) -> TypeId {
        self.kind
    }

    /// Whether this scene is configured by script type `S`
    pub fn is<S: SceneScript>(&self) -> bool {
        self.kind == TypeId::of::<S>()
    }

    /// Borrow the script
    pub fn script<S: SceneScript>(&self) -> Option<&S> {
        self.script.downcast_ref::<S>()
    }

    /// Mutably borrow the script
    pub fn script_mut<S: SceneScript>(&mut self) -> Option<&mut S> {
        self.script.downcast_mut::<S>()
    }

    /// The scene's world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The scene's world, mutably
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The scene's systems
    pub fn systems(&self) -> &SystemTable {
        &self.systems
    }

    /// The scene's systems, mutably
    pub fn systems_mut(&mut self) -> &mut SystemTable {
        &mut self.systems
    }

    /// Create an empty entity
    pub fn create_entity(&mut self) -> EntityId {
        self.world.create_entity()
    }

    /// Destroy an entity and its components
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), EcsError> {
        self.world.destroy_entity(id)
    }

    /// Read-only handle to an entity
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.world.entity(id)
    }

    /// Mutable handle to an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        self.world.entity_mut(id)
    }

    /// Entities carrying every kind in `kinds`
    pub fn entities(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.world.entities(kinds)
    }

    /// Every instance of component `T`
    pub fn components<T: Component>(&self) -> Vec<&T> {
        self.world.components::<T>()
    }

    /// Add or replace a system
    pub fn add_system<S: System>(&mut self, system: S) {
        self.systems.add_system(system);
    }

    /// Add a default-constructed system
    pub fn init_system<S: System + Default>(&mut self) {
        self.systems.init_system::<S>();
    }

    /// Remove a system
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        self.systems.remove_system::<S>()
    }

    /// Borrow a system
    pub fn system<S: System>(&self) -> Option<&S> {
        self.systems.system::<S>()
    }

    /// Mutably borrow a system
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        self.systems.system_mut::<S>()
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("name", &self.name)
            .field("state", &self.state)
            .field("world", &self.world)
            .field("systems", &self.systems)
            .finish()
    }
}
