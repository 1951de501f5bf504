//! Integration tests for blueprints over a registry-backed world
//!
//! Covers live aliasing, entity creation guarantees and the naming
//! convention check.

use crate::ecs::{Blueprint, Component, ComponentKind, ComponentRegistry, EntityId, World};

#[derive(Debug, Default, Clone, PartialEq)]
struct PositionComponent {
    x: f32,
    y: f32,
}
impl Component for PositionComponent {}

#[derive(Debug, Default, Clone, PartialEq)]
struct HealthComponent {
    value: i32,
}
impl Component for HealthComponent {}

#[derive(Debug, Default, Clone, PartialEq)]
struct ScoreComponent {
    points: u32,
}
impl Component for ScoreComponent {}

crate::blueprint! {
    struct ActorBlueprint {
        position: PositionComponent,
        health: HealthComponent,
    }
}

crate::blueprint! {
    struct ScoredBlueprint {
        score: ScoreComponent,
    }
}

fn actor_world() -> World {
    let registry = ComponentRegistry::new();
    registry.register::<PositionComponent>();
    registry.register::<HealthComponent>();
    World::new(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blueprint_writes_are_live_aliases() {
        let mut world = actor_world();
        let actor = ActorBlueprint::create_entity(&mut world).unwrap();

        actor.position_mut(&mut world).unwrap().x = 5.0;
        assert_eq!(world.get::<PositionComponent>(actor.entity()).map(|p| p.x), Some(5.0));

        world.get_mut::<HealthComponent>(actor.entity()).unwrap().value = 12;
        assert_eq!(actor.health(&world).map(|h| h.value), Some(12));

        assert!(actor.set_health(&mut world, HealthComponent { value: 3 }));
        let other_view = ActorBlueprint::load(&world, actor.entity()).unwrap();
        assert_eq!(other_view.health(&world), Some(&HealthComponent { value: 3 }));
    }

    #[test]
    fn test_create_entity_adds_every_required_component() {
        let mut world = actor_world();
        let actor = ActorBlueprint::create_entity(&mut world).unwrap();

        for kind in ActorBlueprint::required_components() {
            assert!(world.has(actor.entity(), kind));
        }
        assert_eq!(actor.position(&world), Some(&PositionComponent::default()));
    }

    #[test]
    fn test_attach_keeps_existing_components() {
        let mut world = actor_world();
        let id = world.create_entity();
        world.set(id, HealthComponent { value: 40 });

        let actor = ActorBlueprint::attach(&mut world, id).unwrap();
        assert_eq!(actor.entity(), id);
        assert_eq!(actor.health(&world).map(|h| h.value), Some(40));
        assert!(actor.position(&world).is_some());
    }

    #[test]
    fn test_load_requires_every_kind() {
        let mut world = actor_world();
        let id = world.create_entity();
        world.add::<PositionComponent>(id);

        assert!(ActorBlueprint::load(&world, id).is_none());
        assert!(ActorBlueprint::load(&world, EntityId::INVALID).is_none());
    }

    #[test]
    fn test_unregistered_kinds_never_create_entities() {
        let mut world = actor_world();
        assert!(ScoredBlueprint::create_entity(&mut world).is_none());
        assert!(world.is_empty());

        world.registry().register::<ScoreComponent>();
        let scored = ScoredBlueprint::create_entity(&mut world).unwrap();
        assert!(scored.score(&world).is_some());
    }

    #[test]
    fn test_attach_with_unregistered_kind_leaves_entity_untouched() {
        let registry = ComponentRegistry::new();
        registry.register::<PositionComponent>();
        let mut world = World::new(registry);
        let id = world.create_entity();

        assert!(ActorBlueprint::attach(&mut world, id).is_none());
        assert!(world.kinds(id).is_empty());
        assert!(!world.has(id, ComponentKind::of::<PositionComponent>()));
    }

    #[test]
    fn test_blueprints_iterates_matching_entities() {
        let mut world = actor_world();
        let first = ActorBlueprint::create_entity(&mut world).unwrap();
        let lone = world.create_entity();
        world.add::<PositionComponent>(lone);
        let second = ActorBlueprint::create_entity(&mut world).unwrap();

        let views = ActorBlueprint::blueprints(&world);
        assert_eq!(views, vec![first, second]);
        assert_eq!(ActorBlueprint::entities(&world), vec![first.entity(), second.entity()]);

        for (value, view) in views.iter().enumerate() {
            view.health_mut(&mut world).unwrap().value = value as i32;
        }
        assert_eq!(second.health(&world).map(|h| h.value), Some(1));
    }

    #[test]
    fn test_dummy_touches_no_state() {
        let world = actor_world();
        let dummy = ActorBlueprint::dummy();

        assert!(!dummy.is_bound());
        assert!(dummy.position(&world).is_none());
        assert!(world.is_empty());
        assert_eq!(
            ActorBlueprint::required_components(),
            vec![ComponentKind::of::<PositionComponent>(), ComponentKind::of::<HealthComponent>()]
        );
    }

    #[test]
    fn test_field_names_follow_convention() {
        let world = actor_world();
        for (field, kind) in ActorBlueprint::field_names().iter().zip(ActorBlueprint::required_components()) {
            assert_eq!(*field, kind.field_name());
            assert_eq!(world.registry().kind_for_field(field), Some(kind));
        }
    }
}
