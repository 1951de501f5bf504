//! # Configuration System
//!
//! Serializable engine configuration with TOML and RON file support.
//!
//! ## Configuration Categories
//!
//! - **Render Config**: batch buffer capacities and slot limits
//! - **Event Config**: event retention policy
//! - **Logging Config**: default log filter

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::events::CleanupPolicy;
use crate::render::BatchLimits;

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match extension(path) {
            Some("toml") => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Some("ron") => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match extension(path) {
            Some("toml") => toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?,
            Some("ron") => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };

        std::fs::write(path, contents)?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<&str> {
    path.extension().and_then(|ext| ext.to_str())
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Top-level engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Batch renderer capacities
    pub render: RenderConfig,
    /// Event bus behavior
    pub events: EventConfig,
    /// Logging defaults
    pub logging: LoggingConfig,
}

impl Config for EngineConfig {}

/// Render batching configuration
///
/// Sizes are in bytes; a batch vertex takes 28 bytes and an element 2.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Maximum vertex buffer size per batch, in bytes
    pub max_buffer_size: usize,
    /// Maximum element buffer size per batch, in bytes
    pub max_element_buffer_size: usize,
    /// Texture and color slots available per batch
    pub max_textures: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_buffer_size: 1 << 20,
            max_element_buffer_size: 1 << 20,
            max_textures: 16,
        }
    }
}

impl RenderConfig {
    /// Batch limits described by this configuration
    pub fn batch_limits(&self) -> BatchLimits {
        BatchLimits {
            max_buffer_size: self.max_buffer_size,
            max_element_buffer_size: self.max_element_buffer_size,
            max_textures: self.max_textures,
        }
    }
}

/// Event bus configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// How long raised events are retained
    pub cleanup: CleanupPolicy,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter, e.g. `"info"` or `"sprite_engine=debug"`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = RenderConfig::default().batch_limits();
        assert_eq!(limits.max_buffer_size, 1 << 20);
        assert_eq!(limits.max_textures, 16);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: EngineConfig = toml::from_str(
            r#"
            [render]
            max_textures = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.render.max_textures, 8);
        assert_eq!(config.render.max_buffer_size, RenderConfig::default().max_buffer_size);
        assert_eq!(config.events.cleanup, CleanupPolicy::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_ron_file_round_trip() {
        let path = std::env::temp_dir().join(format!("sprite_engine_config_{}.ron", std::process::id()));
        let mut config = EngineConfig::default();
        config.events.cleanup = CleanupPolicy::Manual;
        config.render.max_element_buffer_size = 4096;

        config.save_to_file(&path).unwrap();
        let loaded = EngineConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = EngineConfig::default().save_to_file("engine.yaml");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
