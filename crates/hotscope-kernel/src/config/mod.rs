//! Configuration for the reload core
//!
//! Typed sections are always available; the file/environment loader
//! lives behind the `config` feature (on by default).
//!
//! ```toml
//! [reload]
//! shared_scopes = ["application", "singleton"]
//! eager_activation = true
//!
//! [logging]
//! filter = "hotscope_foundation=debug"
//! json = false
//! ```

use serde::{Deserialize, Serialize};

use crate::scope::ScopeKind;

#[cfg(feature = "config")]
mod loader;
#[cfg(feature = "config")]
pub use loader::*;

/// Top-level configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotscopeConfig {
    pub reload: ReloadConfig,
    pub logging: LoggingConfig,
}

/// Reload policy settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReloadConfig {
    /// Scope kinds whose instances are refreshed in place instead of destroyed
    pub shared_scopes: Vec<ScopeKind>,
    /// Run a liveness check right after marking a descriptor, so a
    /// reload-aware scope can drain its pending set immediately
    pub eager_activation: bool,
}

impl Default for ReloadConfig {
    fn default() -> Self {
        Self {
            shared_scopes: vec![ScopeKind::Application, ScopeKind::Singleton],
            eager_activation: true,
        }
    }
}

impl ReloadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of broadly shared scope kinds
    pub fn with_shared_scopes(mut self, scopes: impl IntoIterator<Item = ScopeKind>) -> Self {
        self.shared_scopes = scopes.into_iter().collect();
        self
    }

    /// Enable/disable the eager liveness check after marking
    pub fn with_eager_activation(mut self, enabled: bool) -> Self {
        self.eager_activation = enabled;
        self
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, overridden by `RUST_LOG` when set
    pub filter: String,
    /// Emit JSON lines instead of the human readable format
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_config_defaults() {
        let config = ReloadConfig::default();
        assert_eq!(
            config.shared_scopes,
            vec![ScopeKind::Application, ScopeKind::Singleton]
        );
        assert!(config.eager_activation);
    }

    #[test]
    fn test_reload_config_builder() {
        let config = ReloadConfig::new()
            .with_shared_scopes([ScopeKind::Application])
            .with_eager_activation(false);
        assert_eq!(config.shared_scopes, vec![ScopeKind::Application]);
        assert!(!config.eager_activation);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: HotscopeConfig = serde_json::from_str(r#"{"logging":{"json":true}}"#).unwrap();
        assert_eq!(config.reload, ReloadConfig::default());
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "info");
    }
}
