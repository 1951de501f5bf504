//! Blueprints for the built-in drawables

use super::components::{SpriteComponent, TextComponent, TransformComponent};

crate::blueprint! {
    /// A positioned sprite
    pub struct SpriteBlueprint {
        transform: TransformComponent,
        sprite: SpriteComponent,
    }
}

crate::blueprint! {
    /// Positioned text
    pub struct TextBlueprint {
        transform: TransformComponent,
        text: TextComponent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Blueprint, ComponentRegistry, World};
    use crate::foundation::math::Vec2;

    fn world() -> World {
        let registry = ComponentRegistry::new();
        crate::render::register_components(&registry);
        World::new(registry)
    }

    #[test]
    fn test_sprite_blueprint_aliases_components() {
        let mut world = world();
        let ship = SpriteBlueprint::create_entity(&mut world).unwrap();

        ship.transform_mut(&mut world).unwrap().position = Vec2::new(3.0, 4.0);
        ship.sprite_mut(&mut world).unwrap().layer = 2;

        let transform = world.get::<TransformComponent>(ship.entity()).unwrap();
        assert_eq!(transform.position, Vec2::new(3.0, 4.0));
        assert_eq!(ship.sprite(&world).map(|s| s.layer), Some(2));
    }

    #[test]
    fn test_text_blueprint_shares_transform() {
        let mut world = world();
        let sprite = SpriteBlueprint::create_entity(&mut world).unwrap();
        let label = TextBlueprint::attach(&mut world, sprite.entity()).unwrap();

        label.set_text(
            &mut world,
            TextComponent {
                text: "HP".to_string(),
                ..Default::default()
            },
        );
        sprite.transform_mut(&mut world).unwrap().rotation = 1.0;

        assert_eq!(label.transform(&world).map(|t| t.rotation), Some(1.0));
        assert_eq!(label.text(&world).map(|t| t.text.as_str()), Some("HP"));
        assert_eq!(SpriteBlueprint::blueprints(&world), vec![sprite]);
        assert_eq!(TextBlueprint::entities(&world), vec![sprite.entity()]);
    }
}
