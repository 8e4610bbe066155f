use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Port-table key of the web server role.
pub const WEB_PORT: &str = "web";
/// Port-table key of the database role.
pub const DATABASE_PORT: &str = "database";
/// Port-table key of the cache role.
pub const CACHE_PORT: &str = "cache";

/// Static, per-framework configuration: images, extensions and ports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameworkDescriptor {
    /// Machine name, e.g. `laravel`
    pub name: String,
    /// Human readable name, e.g. `Laravel`
    pub display_name: String,
    /// Template passed to the package manager's create command
    pub template_id: String,
    pub runtime: RuntimeSpec,
    pub package_manager: PackageManagerSpec,
    pub web: WebServerSpec,
    pub database: DatabaseSpec,
    pub cache: CacheSpec,
    pub ports: PortTable,
}

/// The application runtime container (PHP-FPM for the PHP family).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeSpec {
    /// Compose service name, also the `docker/<service>` asset directory
    pub service: String,
    pub image: String,
    /// OS packages installed before the extensions
    pub system_packages: Vec<String>,
    /// Runtime extensions, installed in this order
    pub extensions: Vec<String>,
    /// Command that installs `extensions`, e.g. `docker-php-ext-install`
    pub extension_installer: String,
    /// Port the web server proxies dynamic requests to
    pub internal_port: u16,
    /// Source mount point inside the container
    pub workdir: String,
    /// Where `local.ini` is mounted inside the container
    pub ini_target: String,
    /// `key=value` lines of the runtime configuration file
    pub ini_settings: Vec<(String, String)>,
    /// Shell line that installs the package manager inside the image
    pub bootstrap_command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageManagerSpec {
    pub image: String,
    pub create_command: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebServerSpec {
    pub service: String,
    pub image: String,
    pub internal_port: u16,
    pub config_dir: String,
    /// Directory under the runtime workdir that is served
    pub document_root: String,
    pub front_controller: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSpec {
    pub service: String,
    pub image: String,
    pub internal_port: u16,
    pub data_dir: String,
    pub volume: String,
    /// Environment passed to the container; values are `${VAR}` placeholders
    pub environment: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSpec {
    pub service: String,
    pub image: String,
    pub internal_port: u16,
}

/// Host ports per service role. Every role has a port, so lookups are total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortTable {
    pub web: u16,
    pub database: u16,
    pub cache: u16,
}

impl Default for PortTable {
    fn default() -> Self {
        Self {
            web: 8080,
            database: 3306,
            cache: 6379,
        }
    }
}

impl PortTable {
    pub fn as_map(&self) -> BTreeMap<String, u16> {
        BTreeMap::from([
            (WEB_PORT.to_string(), self.web),
            (DATABASE_PORT.to_string(), self.database),
            (CACHE_PORT.to_string(), self.cache),
        ])
    }

    pub fn get(&self, key: &str) -> Option<u16> {
        match key {
            WEB_PORT => Some(self.web),
            DATABASE_PORT => Some(self.database),
            CACHE_PORT => Some(self.cache),
            _ => None,
        }
    }

    /// Rejects zero ports and host ports claimed by more than one role.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (key, port) in self.as_map() {
            if port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: format!("ports.{}", key),
                    reason: "port must be between 1 and 65535".to_string(),
                });
            }
            if !seen.insert(port) {
                return Err(ConfigError::InvalidValue {
                    field: format!("ports.{}", key),
                    reason: format!("host port {} is already assigned to another service", port),
                });
            }
        }
        Ok(())
    }
}

impl FrameworkDescriptor {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let images = [
            ("runtime.image", &self.runtime.image),
            ("package_manager.image", &self.package_manager.image),
            ("web.image", &self.web.image),
            ("database.image", &self.database.image),
            ("cache.image", &self.cache.image),
        ];
        for (field, image) in images {
            require_non_blank(field, image)?;
        }
        require_non_blank("name", &self.name)?;
        require_non_blank("template_id", &self.template_id)?;

        for extension in &self.runtime.extensions {
            if extension.is_empty() || extension.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidValue {
                    field: "runtime.extensions".to_string(),
                    reason: format!("invalid extension name '{}'", extension),
                });
            }
        }

        let mut services = HashSet::new();
        for service in self.service_names() {
            require_non_blank("service", service)?;
            if !services.insert(service) {
                return Err(ConfigError::InvalidValue {
                    field: "service".to_string(),
                    reason: format!("service name '{}' is used twice", service),
                });
            }
        }

        self.ports.validate()
    }

    /// Names of the services this descriptor provisions.
    pub fn service_names(&self) -> [&str; 4] {
        [
            &self.runtime.service,
            &self.web.service,
            &self.database.service,
            &self.cache.service,
        ]
    }
}

fn require_non_blank(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
