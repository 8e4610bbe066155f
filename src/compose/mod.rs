//! # Service Graph
//!
//! The multi-container topology a framework provisions. Serializes to the
//! Compose document shape: a top-level `services` mapping and a `volumes`
//! mapping, each service carrying optional `build`/`image`, ordered `volumes`,
//! `ports` and `depends_on` lists, and an `environment` mapping.

use crate::error::{GraphError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// What a service does in the environment; selects its port-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceRole {
    Runtime,
    Web,
    Database,
    Cache,
}

impl ServiceRole {
    /// Port-table key for roles that publish a host port.
    pub fn port_key(&self) -> Option<&'static str> {
        use crate::framework::descriptor::{CACHE_PORT, DATABASE_PORT, WEB_PORT};
        match self {
            ServiceRole::Runtime => None,
            ServiceRole::Web => Some(WEB_PORT),
            ServiceRole::Database => Some(DATABASE_PORT),
            ServiceRole::Cache => Some(CACHE_PORT),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSpec {
    pub context: String,
    pub dockerfile: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceSpec {
    #[serde(skip)]
    pub role: ServiceRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub environment: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

impl ServiceSpec {
    pub fn from_image(role: ServiceRole, image: impl Into<String>) -> Self {
        Self {
            role,
            build: None,
            image: Some(image.into()),
            volumes: Vec::new(),
            ports: Vec::new(),
            environment: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn from_build(
        role: ServiceRole,
        context: impl Into<String>,
        dockerfile: impl Into<String>,
    ) -> Self {
        Self {
            role,
            build: Some(BuildSpec {
                context: context.into(),
                dockerfile: dockerfile.into(),
            }),
            image: None,
            volumes: Vec::new(),
            ports: Vec::new(),
            environment: BTreeMap::new(),
            depends_on: Vec::new(),
        }
    }

    pub fn volume(mut self, mount: impl Into<String>) -> Self {
        self.volumes.push(mount.into());
        self
    }

    /// Publishes `host` on the host, forwarded to `container`.
    pub fn port(mut self, host: u16, container: u16) -> Self {
        self.ports.push(format!("{}:{}", host, container));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(key.into(), value.into());
        self
    }

    pub fn depends_on(mut self, service: impl Into<String>) -> Self {
        self.depends_on.push(service.into());
        self
    }
}

/// Top-level named volume. Serializes as an empty mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NamedVolume {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ServiceGraph {
    pub services: BTreeMap<String, ServiceSpec>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub volumes: BTreeMap<String, NamedVolume>,
}

impl ServiceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_service(mut self, name: impl Into<String>, spec: ServiceSpec) -> Self {
        self.services.insert(name.into(), spec);
        self
    }

    pub fn with_volume(mut self, name: impl Into<String>) -> Self {
        self.volumes.insert(name.into(), NamedVolume::default());
        self
    }

    pub fn service(&self, name: &str) -> Option<&ServiceSpec> {
        self.services.get(name)
    }

    /// Returns service names so that every service follows its dependencies.
    ///
    /// Ties are broken by name, so the order is deterministic.
    pub fn dependency_order(&self) -> std::result::Result<Vec<&str>, GraphError> {
        let mut pending: BTreeMap<&str, usize> = BTreeMap::new();
        let mut dependents: BTreeMap<&str, Vec<&str>> = BTreeMap::new();

        for (name, spec) in &self.services {
            let mut unique = BTreeSet::new();
            for dependency in &spec.depends_on {
                if !self.services.contains_key(dependency) {
                    return Err(GraphError::UnknownDependency {
                        service: name.clone(),
                        dependency: dependency.clone(),
                    });
                }
                if unique.insert(dependency.as_str()) {
                    dependents.entry(dependency.as_str()).or_default().push(name.as_str());
                }
            }
            pending.insert(name.as_str(), unique.len());
        }

        let mut ready: BTreeSet<&str> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(name, _)| *name)
            .collect();
        let mut order = Vec::with_capacity(self.services.len());

        while let Some(name) = ready.pop_first() {
            order.push(name);
            for &dependent in dependents.get(name).into_iter().flatten() {
                if let Some(count) = pending.get_mut(dependent) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(dependent);
                    }
                }
            }
        }

        if order.len() != self.services.len() {
            let services = pending
                .into_iter()
                .filter(|(_, count)| *count > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(GraphError::Cycle { services });
        }

        Ok(order)
    }

    pub fn validate(&self) -> std::result::Result<(), GraphError> {
        self.dependency_order().map(|_| ())
    }

    /// Every `${VAR}` name referenced by a service environment. Resolving them
    /// is left to the env file the container runtime loads.
    pub fn placeholders(&self) -> BTreeSet<String> {
        self.services
            .values()
            .flat_map(|spec| spec.environment.values())
            .flat_map(|value| PLACEHOLDER.captures_iter(value))
            .map(|caps| caps[1].to_string())
            .collect()
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
