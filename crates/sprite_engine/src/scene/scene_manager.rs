//! Scene Manager - queued scene loading and unloading
//!
//! Loads and unloads are staged and applied at the end of
//! [`SceneManager::update`], after the current scene has ticked, so a scene
//! is never swapped out in the middle of its own frame. A scene unloaded
//! before it finished preparing is not polled again.

use std::fmt;

use super::scene::{Scene, SceneScript, SceneState};
use super::SceneError;
use crate::ecs::ComponentRegistry;
use crate::events::EventBus;
use crate::foundation::collections::{SceneId, SlotMap};
use crate::render::BatchLimits;

/// Owns every scene and decides which one is current
pub struct SceneManager {
    registry: ComponentRegistry,
    scenes: SlotMap<SceneId, Scene>,
    /// Loaded scenes in load order
    loaded: Vec<SceneId>,
    current: Option<SceneId>,
    pending_loads: Vec<SceneId>,
    pending_unloads: Vec<SceneId>,
    batch_limits: BatchLimits,
}

impl SceneManager {
    /// Create a manager whose scenes share `registry`
    pub fn new(registry: ComponentRegistry) -> Self {
        Self::with_batch_limits(registry, BatchLimits::default())
    }

    /// Create a manager whose scenes also receive `batch_limits` in `prepare`
    pub fn with_batch_limits(registry: ComponentRegistry, batch_limits: BatchLimits) -> Self {
        Self {
            registry,
            scenes: SlotMap::with_key(),
            loaded: Vec::new(),
            current: None,
            pending_loads: Vec::new(),
            pending_unloads: Vec::new(),
            batch_limits,
        }
    }

    /// Batch limits handed to every scene
    pub fn batch_limits(&self) -> BatchLimits {
        self.batch_limits
    }

    /// Stage a new scene configured by `script`
    ///
    /// Unless `swap` is set, loaded or staged scenes of the same script type
    /// are unloaded when the load is applied. With `swap` they stay loaded
    /// and can be resumed with [`SceneManager::activate`].
    pub fn load<S: SceneScript>(&mut self, script: S, swap: bool) -> SceneId {
        let scene = Scene::new(script, self.registry.clone()).with_batch_limits(self.batch_limits);
        let name = scene.name();

        if !swap {
            let replaced: Vec<SceneId> = self
                .loaded
                .iter()
                .chain(self.pending_loads.iter())
                .copied()
                .filter(|id| self.scenes.get(*id).map_or(false, Scene::is::<S>))
                .collect();
            for id in replaced {
                self.unload(id);
            }
        }

        let id = self.scenes.insert(scene);
        self.pending_loads.push(id);
        log::debug!("Staged scene {} for loading (swap: {})", name, swap);
        id
    }

    /// Stage a new scene with a default-constructed script
    pub fn load_kind<S: SceneScript + Default>(&mut self, swap: bool) -> SceneId {
        self.load(S::default(), swap)
    }

    /// Stage a scene for unloading
    ///
    /// A scene that is still staged for loading is dropped immediately
    /// without cleanup. Returns false for unknown ids.
    pub fn unload(&mut self, id: SceneId) -> bool {
        if let Some(index) = self.pending_loads.iter().position(|pending| *pending == id) {
            self.pending_loads.remove(index);
            if let Some(scene) = self.scenes.remove(id) {
                log::debug!("Cancelled load of scene {}", scene.name());
            }
            return true;
        }

        if self.loaded.contains(&id) {
            if !self.pending_unloads.contains(&id) {
                self.pending_unloads.push(id);
            }
            return true;
        }

        log::warn!("Cannot unload scene {:?}: not loaded", id);
        false
    }

    /// Make a loaded scene current
    pub fn activate(&mut self, id: SceneId) -> bool {
        if !self.loaded.contains(&id) || self.pending_unloads.contains(&id) {
            log::warn!("Cannot activate scene {:?}: not loaded", id);
            return false;
        }
        self.current = Some(id);
        true
    }

    /// Tick the current scene, then apply staged loads and unloads
    ///
    /// Staged changes are applied even when the tick fails, so a scene whose
    /// `prepare` keeps failing can still be replaced or unloaded. The tick
    /// error is returned afterwards.
    pub fn update(&mut self, delta_time: f64, events: &mut EventBus) -> Result<(), SceneError> {
        let tick = match self.current {
            Some(id) if self.is_cancelled(id) => Ok(()),
            Some(id) => self
                .scenes
                .get_mut(id)
                .map_or(Ok(()), |scene| scene.update(delta_time, events)),
            None => Ok(()),
        };

        for id in std::mem::take(&mut self.pending_loads) {
            self.loaded.push(id);
            self.current = Some(id);
            if let Some(scene) = self.scenes.get(id) {
                log::info!("Loaded scene {}", scene.name());
            }
        }

        for id in std::mem::take(&mut self.pending_unloads) {
            self.loaded.retain(|loaded| *loaded != id);
            if self.current == Some(id) {
                self.current = None;
            }
            if let Some(mut scene) = self.scenes.remove(id) {
                scene.cleanup();
                log::info!("Unloaded scene {}", scene.name());
            }
        }

        tick
    }

    /// A scene staged for unloading before it finished preparing
    fn is_cancelled(&self, id: SceneId) -> bool {
        self.pending_unloads.contains(&id)
            && self.scenes.get(id).map_or(false, |scene| {
                matches!(scene.state(), SceneState::Unprepared | SceneState::Preparing)
            })
    }

    /// The current scene
    pub fn current(&self) -> Option<&Scene> {
        self.current.and_then(|id| self.scenes.get(id))
    }

    /// The current scene, mutably
    pub fn current_mut(&mut self) -> Option<&mut Scene> {
        self.current.and_then(|id| self.scenes.get_mut(id))
    }

    /// Id of the current scene
    pub fn current_id(&self) -> Option<SceneId> {
        self.current
    }

    /// Borrow a loaded or staged scene
    pub fn get(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    /// Mutably borrow a loaded or staged scene
    pub fn get_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    /// Whether `id` has been loaded and not yet unloaded
    pub fn is_loaded(&self, id: SceneId) -> bool {
        self.loaded.contains(&id)
    }

    /// Loaded scenes in load order
    pub fn loaded(&self) -> &[SceneId] {
        &self.loaded
    }

    /// Most recently loaded scene configured by script type `S`
    pub fn find_kind<S: SceneScript>(&self) -> Option<SceneId> {
        self.loaded
            .iter()
            .rev()
            .copied()
            .find(|id| self.scenes.get(*id).map_or(false, Scene::is::<S>))
    }

    /// Lifecycle state of a scene
    pub fn state(&self, id: SceneId) -> Option<SceneState> {
        self.scenes.get(id).map(Scene::state)
    }
}

impl fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneManager")
            .field("loaded", &self.loaded)
            .field("current", &self.current)
            .field("pending_loads", &self.pending_loads)
            .field("pending_unloads", &self.pending_unloads)
            .finish()
    }
}
