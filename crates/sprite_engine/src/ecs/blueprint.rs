//! Blueprints: typed, live views over an entity's required components
//!
//! A blueprint is nothing but an entity id plus generated accessors. Reads
//! and writes go straight to the world's storage, so two blueprints bound to
//! the same entity always observe the same data.
//!
//! ```ignore
//! sprite_engine::blueprint! {
//!     pub struct ShipBlueprint {
//!         transform: TransformComponent,
//!         sprite: SpriteComponent,
//!     }
//! }
//!
//! let ship = ShipBlueprint::create_entity(&mut world)?;
//! ship.transform_mut(&mut world)?.position.x = 10.0;
//! ```

use super::component::ComponentKind;
use super::entity::EntityId;
use super::world::World;

/// Typed view over one entity with a fixed set of component kinds
pub trait Blueprint: Sized {
    /// Component kinds an entity must carry to be viewed as this blueprint
    fn required_components() -> Vec<ComponentKind>;

    /// Accessor names, parallel to [`Blueprint::required_components`]
    fn field_names() -> &'static [&'static str] {
        &[]
    }

    /// Bind a view to an entity without checking anything
    fn bind(entity: EntityId) -> Self;

    /// The entity this view is bound to
    fn entity(&self) -> EntityId;

    /// An unbound view, used to inspect requirements
    fn dummy() -> Self {
        Self::bind(EntityId::INVALID)
    }

    /// Whether this view is bound to a real entity
    fn is_bound(&self) -> bool {
        self.entity().is_valid()
    }

    /// Bind to `id` if it carries every required component
    fn load(world: &World, id: EntityId) -> Option<Self> {
        if !world.contains(id) {
            log::warn!("Cannot load {}: entity {} not found", blueprint_name::<Self>(), id);
            return None;
        }

        for kind in Self::required_components() {
            if !world.registry().is_registered(kind) {
                log::warn!("Cannot load {}: {} is not registered", blueprint_name::<Self>(), kind);
                return None;
            }
            if !world.has(id, kind) {
                log::warn!("Cannot load {}: entity {} has no {}", blueprint_name::<Self>(), id, kind);
                return None;
            }
        }

        check_field_names::<Self>(world);
        Some(Self::bind(id))
    }

    /// Ids of every entity this blueprint can view
    fn entities(world: &World) -> Vec<EntityId> {
        world.entities(&Self::required_components())
    }

    /// One bound view per matching entity, in ascending entity order
    fn blueprints(world: &World) -> Vec<Self> {
        let views: Vec<Self> = Self::entities(world).into_iter().map(Self::bind).collect();
        if !views.is_empty() {
            check_field_names::<Self>(world);
        }
        views
    }

    /// Create an entity carrying every required component
    fn create_entity(world: &mut World) -> Option<Self> {
        if let Some(kind) = first_unregistered::<Self>(world) {
            log::warn!("Cannot create {}: {} is not registered", blueprint_name::<Self>(), kind);
            return None;
        }

        let id = world.create_entity();
        Self::attach(world, id)
    }

    /// Add any missing required components to `id` and bind to it
    ///
    /// Components already present are kept as they are. Nothing is added
    /// unless every required kind is registered.
    fn attach(world: &mut World, id: EntityId) -> Option<Self> {
        if let Some(kind) = first_unregistered::<Self>(world) {
            log::warn!("Cannot attach {} to {}: {} is not registered", blueprint_name::<Self>(), id, kind);
            return None;
        }

        for kind in Self::required_components() {
            world.add_kind(id, kind)?;
        }
        Self::load(world, id)
    }
}

fn blueprint_name<B>() -> &'static str {
    super::component::short_type_name(std::any::type_name::<B>())
}

fn first_unregistered<B: Blueprint>(world: &World) -> Option<ComponentKind> {
    B::required_components()
        .into_iter()
        .find(|kind| !world.registry().is_registered(*kind))
}

fn check_field_names<B: Blueprint>(world: &World) {
    for (field, kind) in B::field_names().iter().zip(B::required_components()) {
        let resolved = world.registry().kind_for_field(field);
        if resolved != Some(kind) {
            log::warn!(
                "{}.{} does not follow the naming convention for {} (expected `{}`)",
                blueprint_name::<B>(),
                field,
                kind,
                kind.field_name()
            );
        }
    }
}

/// Declare a blueprint struct with live component accessors
///
/// Every `field: Component` pair yields `field(&world)`, `field_mut(&mut world)`
/// and `set_field(&mut world, value)`. Field names should be the component's
/// name lower-cased with the `Component` suffix removed.
#[macro_export]
macro_rules! blueprint {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($field:ident : $component:ty),+ $(,)?
        }
    ) => {
        $crate::paste::paste! {
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $name {
                entity: $crate::ecs::EntityId,
            }

            impl $crate::ecs::Blueprint for $name {
                fn required_components() -> ::std::vec::Vec<$crate::ecs::ComponentKind> {
                    ::std::vec![$($crate::ecs::ComponentKind::of::<$component>()),+]
                }

                fn field_names() -> &'static [&'static str] {
                    &[$(::std::stringify!($field)),+]
                }

                fn bind(entity: $crate::ecs::EntityId) -> Self {
                    Self { entity }
                }

                fn entity(&self) -> $crate::ecs::EntityId {
                    self.entity
                }
            }

            #[allow(dead_code)]
            impl $name {
                $(
                    /// Borrow the aliased component
                    $vis fn $field<'w>(&self, world: &'w $crate::ecs::World) -> ::std::option::Option<&'w $component> {
                        world.get::<$component>(self.entity)
                    }

                    /// Mutably borrow the aliased component
                    $vis fn [<$field _mut>]<'w>(
                        &self,
                        world: &'w mut $crate::ecs::World,
                    ) -> ::std::option::Option<&'w mut $component> {
                        world.get_mut::<$component>(self.entity)
                    }

                    /// Overwrite the aliased component; false if it no longer exists
                    $vis fn [<set_ $field>](&self, world: &mut $crate::ecs::World, value: $component) -> bool {
                        match world.get_mut::<$component>(self.entity) {
                            ::std::option::Option::Some(slot) => {
                                *slot = value;
                                true
                            }
                            ::std::option::Option::None => false,
                        }
                    }
                )+
            }
        }
    };
}
