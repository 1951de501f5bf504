//! Component registration
//!
//! The registry is the engine's schema: only registered kinds may be attached
//! to entities. It is shared by handle between the engine and every world it
//! creates, so kinds registered after a scene exists are still honored.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::component::{Component, ComponentKind};

type Constructor = fn() -> Box<dyn Component>;

fn construct_default<T: Component + Default>() -> Box<dyn Component> {
    Box::new(T::default())
}

#[derive(Default)]
struct RegistryInner {
    order: Vec<ComponentKind>,
    constructors: HashMap<ComponentKind, Constructor>,
}

/// Shared set of component kinds an engine instance accepts
#[derive(Clone, Default)]
pub struct ComponentRegistry {
    inner: Rc<RefCell<RegistryInner>>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component kind
    ///
    /// Returns `false` if the kind was already registered.
    pub fn register<T: Component + Default>(&self) -> bool {
        let kind = ComponentKind::of::<T>();
        let mut inner = self.inner.borrow_mut();
        if inner.constructors.contains_key(&kind) {
            return false;
        }

        inner.constructors.insert(kind, construct_default::<T>);
        inner.order.push(kind);
        log::debug!("Registered component kind {}", kind);
        true
    }

    /// Whether `kind` has been registered
    pub fn is_registered(&self, kind: ComponentKind) -> bool {
        self.inner.borrow().constructors.contains_key(&kind)
    }

    /// Whether `T` has been registered
    pub fn registered<T: Component>(&self) -> bool {
        self.is_registered(ComponentKind::of::<T>())
    }

    /// All registered kinds, in registration order
    pub fn kinds(&self) -> Vec<ComponentKind> {
        self.inner.borrow().order.clone()
    }

    /// Number of registered kinds
    pub fn len(&self) -> usize {
        self.inner.borrow().order.len()
    }

    /// Whether nothing has been registered yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a blueprint field name to the registered kind it aliases
    pub fn kind_for_field(&self, field: &str) -> Option<ComponentKind> {
        self.inner
            .borrow()
            .order
            .iter()
            .copied()
            .find(|kind| kind.field_name() == field)
    }

    /// Default-construct a component of a registered kind
    pub(crate) fn construct(&self, kind: ComponentKind) -> Option<Box<dyn Component>> {
        let constructor = self.inner.borrow().constructors.get(&kind).copied()?;
        Some(constructor())
    }
}

impl fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.inner.borrow().order.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct PositionComponent {
        x: f32,
    }
    impl Component for PositionComponent {}

    #[derive(Debug, Default)]
    struct Tag;
    impl Component for Tag {}

    #[test]
    fn test_register_and_query() {
        let registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register::<PositionComponent>());
        assert!(!registry.register::<PositionComponent>());
        assert!(registry.registered::<PositionComponent>());
        assert!(!registry.registered::<Tag>());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_kinds_keep_registration_order() {
        let registry = ComponentRegistry::new();
        registry.register::<Tag>();
        registry.register::<PositionComponent>();
        assert_eq!(
            registry.kinds(),
            vec![ComponentKind::of::<Tag>(), ComponentKind::of::<PositionComponent>()]
        );
    }

    #[test]
    fn test_clones_share_state() {
        let registry = ComponentRegistry::new();
        let handle = registry.clone();
        registry.register::<Tag>();
        assert!(handle.registered::<Tag>());
    }

    #[test]
    fn test_field_lookup_and_construct() {
        let registry = ComponentRegistry::new();
        registry.register::<PositionComponent>();
        let kind = registry.kind_for_field("position").unwrap();
        assert_eq!(kind, ComponentKind::of::<PositionComponent>());

        let component = registry.construct(kind).unwrap();
        assert_eq!((*component).downcast_ref::<PositionComponent>(), Some(&PositionComponent::default()));
        assert!(registry.construct(ComponentKind::of::<Tag>()).is_none());
    }
}
