//! # Devstack CLI
//!
//! Generates Docker-based development environments for web frameworks and
//! scaffolds new projects through a containerized package manager.
//!
//! ## Features
//!
//! - **Framework Contract**: every framework implements [`Framework`], so the
//!   provisioning pipeline treats Laravel, Symfony and future variants alike
//! - **Service Graph**: a Compose-shaped topology with acyclic dependencies and
//!   placeholder-only credentials
//! - **Asset Generation**: Dockerfile, runtime ini and nginx virtual host
//!   rendered from the framework descriptor
//! - **Project Initializer**: runs the scaffolding container through an
//!   injectable [`CommandRunner`] with an optional timeout
//!
//! ## Example
//!
//! ```rust,no_run
//! use devstack_cli::{Framework, FrameworkKind, FrameworkOptions, SystemCommandRunner};
//! use std::sync::Arc;
//!
//! let kind = FrameworkKind::Laravel;
//! let framework = kind.build(
//!     kind.descriptor(),
//!     FrameworkOptions {
//!         project_name: "myapp".to_string(),
//!         base_path: "/home/me/projects".into(),
//!         container_runtime: "docker".to_string(),
//!         runner: Arc::new(SystemCommandRunner::new()),
//!     },
//! );
//!
//! if framework.initialize_project() && framework.setup_development_environment() {
//!     println!("{}", framework.configure_docker().to_yaml().unwrap());
//! }
//! ```

pub mod cli;
pub mod common;
pub mod compose;
pub mod config;
pub mod error;
pub mod framework;
pub mod generator;
pub mod initializer;

// Re-export commonly used types and functions
pub use common::command_utils::{
    CommandInvocation, CommandOutput, CommandRunner, DryRunRunner, SystemCommandRunner,
};
pub use compose::{ServiceGraph, ServiceRole, ServiceSpec};
pub use error::{DevstackError, ProvisionError, Result};
pub use framework::descriptor::{FrameworkDescriptor, PortTable};
pub use framework::{Framework, FrameworkKind, FrameworkOptions};
pub use generator::{render_assets, AssetWriter, GeneratedAsset};
pub use initializer::ProjectInitializer;
