use crate::error::ConfigError;
use crate::framework::descriptor::FrameworkDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub runtime: RuntimeConfig,
    pub ports: PortOverrides,
    pub php: PhpOverrides,
}

/// Container runtime used for scaffolding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Program invoked as `<program> run ...`
    pub container_runtime: String,
    /// Seconds before the scaffolding container is killed; 0 waits forever
    pub init_timeout_secs: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            container_runtime: "docker".to_string(),
            init_timeout_secs: 900,
        }
    }
}

impl RuntimeConfig {
    pub fn init_timeout(&self) -> Option<Duration> {
        (self.init_timeout_secs > 0).then(|| Duration::from_secs(self.init_timeout_secs))
    }
}

/// Host port overrides per role
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PortOverrides {
    pub web: Option<u16>,
    pub database: Option<u16>,
    pub cache: Option<u16>,
}

/// Runtime image overrides for PHP frameworks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhpOverrides {
    pub image: Option<String>,
    /// Replaces the framework's extension list
    pub extensions: Option<Vec<String>>,
    /// Appended after the (possibly replaced) extension list
    pub extra_extensions: Vec<String>,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.runtime.container_runtime.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "runtime.container_runtime".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Returns `descriptor` with the overrides applied.
    pub fn apply_to(&self, mut descriptor: FrameworkDescriptor) -> FrameworkDescriptor {
        if let Some(web) = self.ports.web {
            descriptor.ports.web = web;
        }
        if let Some(database) = self.ports.database {
            descriptor.ports.database = database;
        }
        if let Some(cache) = self.ports.cache {
            descriptor.ports.cache = cache;
        }

        if let Some(image) = &self.php.image {
            descriptor.runtime.image = image.clone();
        }
        if let Some(extensions) = &self.php.extensions {
            descriptor.runtime.extensions = extensions.clone();
        }
        for extension in &self.php.extra_extensions {
            if !descriptor.runtime.extensions.contains(extension) {
                descriptor.runtime.extensions.push(extension.clone());
            }
        }

        descriptor
    }
}
