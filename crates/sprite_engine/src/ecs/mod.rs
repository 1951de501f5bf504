//! Entity-Component-System implementation
//!
//! Entities are plain ids, components are boxed data records keyed by their
//! [`ComponentKind`], and systems are stateful update units run in
//! registration order by a scene's [`SystemTable`].
//!
//! Every component kind must be registered with the engine's
//! [`ComponentRegistry`] before an entity may carry it.

pub mod component;
pub mod registry;
pub mod entity;
pub mod world;
pub mod system;
pub mod blueprint;

#[cfg(test)]
mod tests;

pub use component::{AsAny, Component, ComponentKind};
pub use registry::ComponentRegistry;
pub use entity::{EntityId, EntityMut, EntityRef};
pub use world::World;
pub use system::{System, SystemContext, SystemTable};
pub use blueprint::Blueprint;

use thiserror::Error;

/// Errors raised by entity and component operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// The entity id was never created or has been destroyed
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    /// The component kind was never registered with the engine
    #[error("Component kind is not registered: {0}")]
    UnregisteredComponent(&'static str),
}
