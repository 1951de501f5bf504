//! Systems and the per-scene system table
//!
//! Systems run sequentially in registration order. While a system runs it is
//! taken out of its slot, so it may look up *other* systems through the
//! read-only table handed to it in [`SystemContext`].

use std::any::TypeId;
use std::fmt;

use super::component::AsAny;
use super::world::World;
use crate::events::EventBus;

/// Everything a system may touch during one update
pub struct SystemContext<'a> {
    /// The scene's entities and components
    pub world: &'a mut World,
    /// Engine-wide event bus
    pub events: &'a mut EventBus,
    /// The scene's other systems (the running one is absent)
    pub systems: &'a SystemTable,
}

/// Stateful update unit
pub trait System: AsAny {
    /// Advance by `delta_time` seconds
    fn update(&mut self, ctx: &mut SystemContext<'_>, delta_time: f64);

    /// Diagnostic name
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl dyn System {
    /// Downcast to a concrete system type
    pub fn downcast_ref<S: System>(&self) -> Option<&S> {
        self.as_any().downcast_ref::<S>()
    }

    /// Mutably downcast to a concrete system type
    pub fn downcast_mut<S: System>(&mut self) -> Option<&mut S> {
        self.as_any_mut().downcast_mut::<S>()
    }
}

struct SystemSlot {
    kind: TypeId,
    name: &'static str,
    enabled: bool,
    system: Option<Box<dyn System>>,
}

/// Ordered set of systems, at most one per concrete type
#[derive(Default)]
pub struct SystemTable {
    slots: Vec<SystemSlot>,
}

impl SystemTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a system, replacing an existing one of the same type in place
    pub fn add_system<S: System>(&mut self, system: S) {
        let kind = TypeId::of::<S>();
        let name = system.name();
        if let Some(slot) = self.slots.iter_mut().find(|slot| slot.kind == kind) {
            log::debug!("Replacing system {}", name);
            slot.system = Some(Box::new(system));
            slot.enabled = true;
            return;
        }

        log::debug!("Adding system {}", name);
        self.slots.push(SystemSlot {
            kind,
            name,
            enabled: true,
            system: Some(Box::new(system)),
        });
    }

    /// Add a default-constructed system
    pub fn init_system<S: System + Default>(&mut self) {
        self.add_system(S::default());
    }

    /// Remove a system and hand it back
    pub fn remove_system<S: System>(&mut self) -> Option<S> {
        let index = self.index_of(TypeId::of::<S>())?;
        let slot = self.slots.remove(index);
        let system = slot.system?;
        system.into_any().downcast::<S>().ok().map(|boxed| *boxed)
    }

    /// Borrow a system
    pub fn system<S: System>(&self) -> Option<&S> {
        let index = self.index_of(TypeId::of::<S>())?;
        self.slots[index].system.as_deref().and_then(|system| system.downcast_ref::<S>())
    }

    /// Mutably borrow a system
    pub fn system_mut<S: System>(&mut self) -> Option<&mut S> {
        let index = self.index_of(TypeId::of::<S>())?;
        self.slots[index].system.as_deref_mut().and_then(|system| system.downcast_mut::<S>())
    }

    /// Whether a system of type `S` is present
    pub fn contains<S: System>(&self) -> bool {
        self.index_of(TypeId::of::<S>()).is_some()
    }

    /// Enable or disable a system; returns false if it is absent
    pub fn set_enabled<S: System>(&mut self, enabled: bool) -> bool {
        match self.index_of(TypeId::of::<S>()) {
            Some(index) => {
                self.slots[index].enabled = enabled;
                true
            }
            None => {
                log::warn!("Cannot toggle missing system {}", std::any::type_name::<S>());
                false
            }
        }
    }

    /// Whether a system is present and enabled
    pub fn is_enabled<S: System>(&self) -> bool {
        self.index_of(TypeId::of::<S>())
            .map_or(false, |index| self.slots[index].enabled)
    }

    /// Number of systems
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// System names in run order
    pub fn names(&self) -> Vec<&'static str> {
        self.slots.iter().map(|slot| slot.name).collect()
    }

    /// Run every enabled system once, in order
    pub(crate) fn run(&mut self, world: &mut World, events: &mut EventBus, delta_time: f64) {
        for index in 0..self.slots.len() {
            if !self.slots[index].enabled {
                continue;
            }
            let Some(mut system) = self.slots[index].system.take() else {
                continue;
            };

            {
                let mut ctx = SystemContext {
                    world: &mut *world,
                    events: &mut *events,
                    systems: &*self,
                };
                system.update(&mut ctx, delta_time);
            }

            self.slots[index].system = Some(system);
        }
    }

    fn index_of(&self, kind: TypeId) -> Option<usize> {
        self.slots.iter().position(|slot| slot.kind == kind)
    }
}

impl fmt::Debug for SystemTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::ComponentRegistry;
    use crate::events::CleanupPolicy;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    struct First(Log);
    impl System for First {
        fn update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f64) {
            self.0.borrow_mut().push("first");
        }
    }

    struct Second(Log);
    impl System for Second {
        fn update(&mut self, _ctx: &mut SystemContext<'_>, _delta_time: f64) {
            self.0.borrow_mut().push("second");
        }
    }

    #[derive(Default)]
    struct Counter {
        ticks: u32,
        elapsed: f64,
    }
    impl System for Counter {
        fn update(&mut self, _ctx: &mut SystemContext<'_>, delta_time: f64) {
            self.ticks += 1;
            self.elapsed += delta_time;
        }
    }

    #[derive(Default)]
    struct Observer {
        seen_ticks: Option<u32>,
    }
    impl System for Observer {
        fn update(&mut self, ctx: &mut SystemContext<'_>, _delta_time: f64) {
            self.seen_ticks = ctx.systems.system::<Counter>().map(|counter| counter.ticks);
            assert!(ctx.systems.system::<Self>().is_none());
        }
    }

    fn run(table: &mut SystemTable, delta_time: f64) {
        let mut world = World::new(ComponentRegistry::new());
        let mut events = EventBus::new(CleanupPolicy::default());
        table.run(&mut world, &mut events, delta_time);
    }

    #[test]
    fn test_runs_in_registration_order() {
        let log = Log::default();
        let mut table = SystemTable::new();
        table.add_system(Second(log.clone()));
        table.add_system(First(log.clone()));

        run(&mut table, 0.016);
        assert_eq!(*log.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn test_replacing_keeps_position() {
        let log = Log::default();
        let mut table = SystemTable::new();
        table.add_system(First(log.clone()));
        table.add_system(Second(log.clone()));
        table.add_system(First(log.clone()));

        assert_eq!(table.len(), 2);
        run(&mut table, 0.016);
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn test_disabled_systems_are_skipped() {
        let mut table = SystemTable::new();
        table.init_system::<Counter>();
        assert!(table.set_enabled::<Counter>(false));

        run(&mut table, 1.0);
        assert_eq!(table.system::<Counter>().map(|c| c.ticks), Some(0));

        table.set_enabled::<Counter>(true);
        run(&mut table, 0.5);
        assert_eq!(table.system::<Counter>().map(|c| c.ticks), Some(1));
        assert!((table.system::<Counter>().map_or(0.0, |c| c.elapsed) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_systems_see_each_other() {
        let mut table = SystemTable::new();
        table.init_system::<Counter>();
        table.init_system::<Observer>();

        run(&mut table, 0.016);
        run(&mut table, 0.016);
        assert_eq!(table.system::<Observer>().and_then(|o| o.seen_ticks), Some(2));
    }

    #[test]
    fn test_remove_system() {
        let mut table = SystemTable::new();
        table.init_system::<Counter>();
        table.system_mut::<Counter>().unwrap().ticks = 9;

        let removed = table.remove_system::<Counter>().unwrap();
        assert_eq!(removed.ticks, 9);
        assert!(!table.contains::<Counter>());
        assert!(table.remove_system::<Counter>().is_none());
        assert!(!table.set_enabled::<Counter>(true));
    }
}
