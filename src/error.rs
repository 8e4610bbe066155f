use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevstackError {
    #[error("Provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("Invalid service graph: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Security error: {0}")]
    Security(#[from] SecurityError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failures at the two provisioning boundaries: the external scaffolding
/// process and the filesystem.
#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("`{command}` failed: {reason}")]
    ExternalProcess { command: String, reason: String },

    #[error("`{command}` did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },

    #[error("Failed to write {path}: {source}")]
    FilesystemWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("Service '{service}' depends on unknown service '{dependency}'")]
    UnknownDependency { service: String, dependency: String },

    #[error("Dependency cycle between services: {}", services.join(", "))]
    Cycle { services: Vec<String> },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration file: {0}")]
    InvalidFile(String),

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Unknown framework: {0}")]
    UnknownFramework(String),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SecurityError {
    #[error("Invalid path: path traversal detected in '{0}'")]
    PathTraversal(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, DevstackError>;
