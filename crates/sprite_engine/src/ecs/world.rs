//! ECS World: entity table and component storage
//!
//! Component instances live in one `slotmap` arena; each entity record maps
//! a [`ComponentKind`] to the arena key of its instance.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::foundation::collections::{ComponentKey, SlotMap};

use super::component::{Component, ComponentKind};
use super::entity::{EntityId, EntityMut, EntityRef};
use super::registry::ComponentRegistry;
use super::EcsError;

#[derive(Debug, Default)]
struct EntityRecord {
    components: HashMap<ComponentKind, ComponentKey>,
}

/// ECS World containing all entities and components of one scene
pub struct World {
    registry: ComponentRegistry,
    next_entity_id: u64,
    entities: BTreeMap<EntityId, EntityRecord>,
    storage: SlotMap<ComponentKey, Box<dyn Component>>,
}

impl World {
    /// Create an empty world bound to an engine's registry
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            registry,
            next_entity_id: 0,
            entities: BTreeMap::new(),
            storage: SlotMap::with_key(),
        }
    }

    /// The registry this world validates component kinds against
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Create a new entity with no components
    pub fn create_entity(&mut self) -> EntityId {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        self.entities.insert(id, EntityRecord::default());
        log::trace!("Created entity {}", id);
        id
    }

    /// Destroy an entity and all of its components immediately
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), EcsError> {
        let record = self.entities.remove(&id).ok_or(EcsError::EntityNotFound(id))?;
        for key in record.components.into_values() {
            self.storage.remove(key);
        }
        log::trace!("Destroyed entity {}", id);
        Ok(())
    }

    /// Whether the entity exists
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the world has no entities
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Read-only handle to an entity
    pub fn entity(&self, id: EntityId) -> Option<EntityRef<'_>> {
        self.contains(id).then(|| EntityRef::new(self, id))
    }

    /// Mutable handle to an entity
    pub fn entity_mut(&mut self, id: EntityId) -> Option<EntityMut<'_>> {
        if self.contains(id) {
            Some(EntityMut::new(self, id))
        } else {
            None
        }
    }

    /// Get-or-create a component, reporting why it could not be attached
    pub fn try_add<T: Component + Default>(&mut self, id: EntityId) -> Result<&mut T, EcsError> {
        let kind = self.registered_kind::<T>()?;
        let record = self.entities.get_mut(&id).ok_or(EcsError::EntityNotFound(id))?;
        let key = match record.components.get(&kind) {
            Some(&key) => key,
            None => {
                let key = self.storage.insert(Box::new(T::default()));
                record.components.insert(kind, key);
                key
            }
        };

        self.storage
            .get_mut(key)
            .and_then(|component| (**component).downcast_mut::<T>())
            .ok_or(EcsError::EntityNotFound(id))
    }

    /// Get-or-create a component of kind `T`
    ///
    /// Calling this twice returns the same instance. Unregistered kinds and
    /// unknown entities are logged and yield `None`.
    pub fn add<T: Component + Default>(&mut self, id: EntityId) -> Option<&mut T> {
        match self.try_add::<T>(id) {
            Ok(component) => Some(component),
            Err(e) => {
                log::warn!("Cannot add {} to entity {}: {}", ComponentKind::of::<T>(), id, e);
                None
            }
        }
    }

    /// Get-or-create a component of a dynamically chosen kind
    pub fn add_kind(&mut self, id: EntityId, kind: ComponentKind) -> Option<&mut dyn Component> {
        let Some(record) = self.entities.get_mut(&id) else {
            log::warn!("Cannot add {} to entity {}: entity not found", kind, id);
            return None;
        };

        let key = match record.components.get(&kind) {
            Some(&key) => key,
            None => {
                let Some(component) = self.registry.construct(kind) else {
                    log::warn!("Cannot add {} to entity {}: kind is not registered", kind, id);
                    return None;
                };
                let key = self.storage.insert(component);
                record.components.insert(kind, key);
                key
            }
        };

        match self.storage.get_mut(key) {
            Some(component) => Some(&mut **component),
            None => None,
        }
    }

    /// Overwrite or create a component, reporting failures
    pub fn try_set<T: Component>(&mut self, id: EntityId, component: T) -> Result<&mut T, EcsError> {
        let kind = self.registered_kind::<T>()?;
        let record = self.entities.get_mut(&id).ok_or(EcsError::EntityNotFound(id))?;
        let key = match record.components.get(&kind) {
            Some(&key) => {
                if let Some(slot) = self.storage.get_mut(key) {
                    *slot = Box::new(component);
                }
                key
            }
            None => {
                let key = self.storage.insert(Box::new(component));
                record.components.insert(kind, key);
                key
            }
        };

        self.storage
            .get_mut(key)
            .and_then(|component| (**component).downcast_mut::<T>())
            .ok_or(EcsError::EntityNotFound(id))
    }

    /// Overwrite or create a component by the runtime kind of `component`
    pub fn set<T: Component>(&mut self, id: EntityId, component: T) -> Option<&mut T> {
        match self.try_set(id, component) {
            Ok(component) => Some(component),
            Err(e) => {
                log::warn!("Cannot set {} on entity {}: {}", ComponentKind::of::<T>(), id, e);
                None
            }
        }
    }

    /// Remove a component and return it
    pub fn remove<T: Component>(&mut self, id: EntityId) -> Option<T> {
        let record = self.entities.get_mut(&id)?;
        let key = record.components.remove(&ComponentKind::of::<T>())?;
        let component = self.storage.remove(key)?;
        component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    /// Borrow a component
    pub fn get<T: Component>(&self, id: EntityId) -> Option<&T> {
        let key = self.key_of(id, ComponentKind::of::<T>())?;
        self.storage.get(key).and_then(|component| (**component).downcast_ref::<T>())
    }

    /// Mutably borrow a component
    pub fn get_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        let key = self.key_of(id, ComponentKind::of::<T>())?;
        self.storage.get_mut(key).and_then(|component| (**component).downcast_mut::<T>())
    }

    /// Whether the entity carries `kind`
    pub fn has(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.key_of(id, kind).is_some()
    }

    /// Kinds attached to an entity (empty for unknown ids)
    pub fn kinds(&self, id: EntityId) -> Vec<ComponentKind> {
        self.entities
            .get(&id)
            .map(|record| record.components.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Ids of all entities carrying every kind in `kinds`, ascending
    ///
    /// An empty list matches every entity.
    pub fn entities(&self, kinds: &[ComponentKind]) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, record)| kinds.iter().all(|kind| record.components.contains_key(kind)))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every instance of `T`, in ascending entity order
    pub fn components<T: Component>(&self) -> Vec<&T> {
        let kind = ComponentKind::of::<T>();
        self.entities
            .values()
            .filter_map(|record| record.components.get(&kind))
            .filter_map(|key| self.storage.get(*key))
            .filter_map(|component| (**component).downcast_ref::<T>())
            .collect()
    }

    /// Every instance of `T`, mutably, in no particular order
    pub fn components_mut<T: Component>(&mut self) -> Vec<&mut T> {
        self.storage
            .values_mut()
            .filter_map(|component| (**component).downcast_mut::<T>())
            .collect()
    }

    /// Visit every `(entity, &mut T)` pair in ascending entity order
    pub fn each_mut<T: Component>(&mut self, mut f: impl FnMut(EntityId, &mut T)) {
        let kind = ComponentKind::of::<T>();
        for (id, record) in &self.entities {
            let Some(key) = record.components.get(&kind) else { continue };
            if let Some(component) = self.storage.get_mut(*key).and_then(|c| (**c).downcast_mut::<T>()) {
                f(*id, component);
            }
        }
    }

    fn key_of(&self, id: EntityId, kind: ComponentKind) -> Option<ComponentKey> {
        self.entities.get(&id)?.components.get(&kind).copied()
    }

    fn registered_kind<T: Component>(&self) -> Result<ComponentKind, EcsError> {
        let kind = ComponentKind::of::<T>();
        if self.registry.is_registered(kind) {
            Ok(kind)
        } else {
            Err(EcsError::UnregisteredComponent(kind.name()))
        }
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("components", &self.storage.len())
            .field("next_entity_id", &self.next_entity_id)
            .finish()
    }
}
