//! Arena key types
//!
//! Component instances and scenes live in `slotmap` arenas; these keys are the
//! stable handles into them.

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Key of a component instance inside a world's component arena
    pub struct ComponentKey;

    /// Identifier of a scene owned by the scene manager
    pub struct SceneId;
}
