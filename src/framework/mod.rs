pub mod descriptor;
pub mod php;

use crate::common::command_utils::CommandRunner;
use crate::common::file_utils;
use crate::compose::ServiceGraph;
use crate::config::types::Config;
use crate::error::{ConfigError, Result, SecurityError};
use clap::ValueEnum;
use descriptor::FrameworkDescriptor;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Common interface every framework variant implements so a caller can
/// provision any of them through the same pipeline.
pub trait Framework {
    /// Static configuration this variant provisions from
    fn descriptor(&self) -> &FrameworkDescriptor;

    /// Scaffolds the project with the external package manager.
    fn try_initialize_project(&self) -> Result<()>;

    /// Builds the service graph. Pure: no I/O, same output for the same
    /// descriptor, acyclic `depends_on`.
    fn configure_docker(&self) -> ServiceGraph;

    /// Host port per role, total for every role `configure_docker` publishes.
    fn default_ports(&self) -> BTreeMap<String, u16>;

    /// Writes the Docker assets into the project directory, returning the
    /// written paths. Re-running overwrites earlier output.
    fn try_setup_development_environment(&self) -> Result<Vec<PathBuf>>;

    /// Fail-soft form of [`Framework::try_initialize_project`].
    fn initialize_project(&self) -> bool {
        match self.try_initialize_project() {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Error initializing {} project: {}",
                    self.descriptor().display_name,
                    e
                );
                false
            }
        }
    }

    /// Fail-soft form of [`Framework::try_setup_development_environment`].
    fn setup_development_environment(&self) -> bool {
        match self.try_setup_development_environment() {
            Ok(_) => true,
            Err(e) => {
                log::error!(
                    "Error setting up {} environment: {}",
                    self.descriptor().display_name,
                    e
                );
                false
            }
        }
    }
}

/// Where a project lives and how external commands are run for it.
#[derive(Clone)]
pub struct FrameworkOptions {
    pub project_name: String,
    /// Directory the project directory is created in
    pub base_path: PathBuf,
    pub container_runtime: String,
    pub runner: Arc<dyn CommandRunner>,
}

impl FrameworkOptions {
    /// `base_path/project_name`, after checking the name cannot escape
    /// `base_path`.
    pub fn project_root(&self) -> std::result::Result<PathBuf, SecurityError> {
        file_utils::validate_project_name(&self.project_name)?;
        Ok(self.base_path.join(&self.project_name))
    }
}

impl fmt::Debug for FrameworkOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameworkOptions")
            .field("project_name", &self.project_name)
            .field("base_path", &self.base_path)
            .field("container_runtime", &self.container_runtime)
            .finish_non_exhaustive()
    }
}

/// Registry of supported frameworks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrameworkKind {
    Laravel,
    Symfony,
}

impl FrameworkKind {
    pub fn all() -> &'static [FrameworkKind] {
        &[FrameworkKind::Laravel, FrameworkKind::Symfony]
    }

    pub fn name(&self) -> &'static str {
        match self {
            FrameworkKind::Laravel => "laravel",
            FrameworkKind::Symfony => "symfony",
        }
    }

    /// Built-in descriptor, before configuration overrides.
    pub fn descriptor(&self) -> FrameworkDescriptor {
        match self {
            FrameworkKind::Laravel => php::laravel::descriptor(),
            FrameworkKind::Symfony => php::symfony::descriptor(),
        }
    }

    /// Descriptor with configuration overrides applied and validated.
    pub fn configured_descriptor(
        &self,
        config: &Config,
    ) -> std::result::Result<FrameworkDescriptor, ConfigError> {
        let descriptor = config.apply_to(self.descriptor());
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn build(
        &self,
        descriptor: FrameworkDescriptor,
        options: FrameworkOptions,
    ) -> Box<dyn Framework> {
        match self {
            FrameworkKind::Laravel | FrameworkKind::Symfony => {
                Box::new(php::PhpFramework::new(descriptor, options))
            }
        }
    }
}

impl fmt::Display for FrameworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrameworkKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        FrameworkKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownFramework(s.to_string()))
    }
}
