//! Entity identity and entity-bound component access

use std::fmt;

use super::component::{Component, ComponentKind};
use super::world::World;
use super::EcsError;

/// Entity identifier
///
/// Ids increase monotonically within a world and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(u64);

impl EntityId {
    /// Sentinel id that never names a live entity
    pub const INVALID: Self = Self(u64::MAX);

    /// Create an entity id from its raw value
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw id
    pub const fn id(self) -> u64 {
        self.0
    }

    /// Whether this is anything but the sentinel
    pub const fn is_valid(self) -> bool {
        self.0 != u64::MAX
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

/// Read-only handle to one entity
#[derive(Clone, Copy)]
pub struct EntityRef<'w> {
    world: &'w World,
    id: EntityId,
}

impl<'w> EntityRef<'w> {
    pub(crate) fn new(world: &'w World, id: EntityId) -> Self {
        Self { world, id }
    }

    /// The entity's id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Borrow a component
    pub fn get<T: Component>(&self) -> Option<&'w T> {
        self.world.get::<T>(self.id)
    }

    /// Whether the entity carries `kind`
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.world.has(self.id, kind)
    }

    /// Kinds attached to the entity
    pub fn kinds(&self) -> Vec<ComponentKind> {
        self.world.kinds(self.id)
    }
}

/// Mutable handle to one entity
pub struct EntityMut<'w> {
    world: &'w mut World,
    id: EntityId,
}

impl<'w> EntityMut<'w> {
    pub(crate) fn new(world: &'w mut World, id: EntityId) -> Self {
        Self { world, id }
    }

    /// The entity's id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Get-or-create a component of kind `T`
    pub fn add<T: Component + Default>(&mut self) -> Option<&mut T> {
        self.world.add::<T>(self.id)
    }

    /// Overwrite or create a component
    pub fn set<T: Component>(&mut self, component: T) -> Option<&mut T> {
        self.world.set(self.id, component)
    }

    /// Remove and return a component
    pub fn remove<T: Component>(&mut self) -> Option<T> {
        self.world.remove::<T>(self.id)
    }

    /// Borrow a component
    pub fn get<T: Component>(&self) -> Option<&T> {
        self.world.get::<T>(self.id)
    }

    /// Mutably borrow a component
    pub fn get_mut<T: Component>(&mut self) -> Option<&mut T> {
        self.world.get_mut::<T>(self.id)
    }

    /// Whether the entity carries `kind`
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.world.has(self.id, kind)
    }

    /// Destroy the entity, consuming the handle
    pub fn destroy(self) -> Result<(), EcsError> {
        self.world.destroy_entity(self.id)
    }
}
