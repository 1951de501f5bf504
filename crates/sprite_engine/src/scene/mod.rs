//! Scenes and the scene manager
//!
//! A [`Scene`] owns one ECS [`World`](crate::ecs::World) and the
//! [`SystemTable`](crate::ecs::SystemTable) that updates it. Game code
//! configures a scene through a [`SceneScript`], whose `prepare` hook is polled
//! until it reports [`Preparation::Ready`]. The [`SceneManager`] stages loads
//! and unloads and applies them at the end of its update step.

#[allow(clippy::module_inception)]
pub mod scene;
pub mod scene_manager;

pub use scene::{Preparation, Scene, SceneScript, SceneSetup, SceneState};
pub use scene_manager::SceneManager;

use thiserror::Error;

/// Errors raised while preparing scenes
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A scene's prepare hook failed; the scene cannot run
    #[error("Failed to prepare scene {scene}: {reason}")]
    PrepareFailed {
        /// Script name
        scene: &'static str,
        /// What went wrong
        reason: String,
    },

    /// A resource the scene depends on could not be provided
    #[error("Scene resource unavailable: {0}")]
    Resource(String),
}
