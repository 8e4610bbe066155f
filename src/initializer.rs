//! Scaffolds a new project by running the package manager's create command
//! in a throwaway container with the base directory bind-mounted at `/app`.
//!
//! Only one initializer may target a given base directory at a time.

use crate::common::command_utils::{CommandInvocation, CommandRunner};
use crate::error::ProvisionError;
use crate::framework::descriptor::FrameworkDescriptor;
use std::path::PathBuf;

/// Mount point of the base directory inside the scaffolding container.
pub const CONTAINER_WORKDIR: &str = "/app";

const CONTAINER_PREFIX: &str = "devstack-init-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInitializer {
    container_runtime: String,
    image: String,
    create_command: String,
    template_id: String,
    project_name: String,
    base_path: PathBuf,
}

impl ProjectInitializer {
    pub fn new(
        descriptor: &FrameworkDescriptor,
        container_runtime: impl Into<String>,
        project_name: impl Into<String>,
        base_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            container_runtime: container_runtime.into(),
            image: descriptor.package_manager.image.clone(),
            create_command: descriptor.package_manager.create_command.clone(),
            template_id: descriptor.template_id.clone(),
            project_name: project_name.into(),
            base_path: base_path.into(),
        }
    }

    /// Name given to the scaffolding container so it can be removed if the
    /// runtime client is killed before the container exits.
    pub fn container_name(&self) -> String {
        let sanitized: String = self
            .project_name
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
                    c
                } else {
                    '-'
                }
            })
            .collect();
        format!("{}{}", CONTAINER_PREFIX, sanitized)
    }

    /// `<runtime> run --rm --name <container> -v <base>:/app -w /app <image>
    /// <create> <template> <name>`
    pub fn command(&self) -> CommandInvocation {
        CommandInvocation::new(&self.container_runtime)
            .args(["run", "--rm", "--name"])
            .arg(self.container_name())
            .arg("-v")
            .arg(format!("{}:{}", self.base_path.display(), CONTAINER_WORKDIR))
            .args(["-w", CONTAINER_WORKDIR])
            .arg(&self.image)
            .arg(&self.create_command)
            .arg(&self.template_id)
            .arg(&self.project_name)
    }

    /// `<runtime> rm -f <container>`
    pub fn cleanup_command(&self) -> CommandInvocation {
        CommandInvocation::new(&self.container_runtime)
            .args(["rm", "-f"])
            .arg(self.container_name())
    }

    /// Runs the scaffolding container. Succeeds only on exit status zero.
    /// On timeout the container is force-removed before the error is returned.
    pub fn run(&self, runner: &dyn CommandRunner) -> Result<(), ProvisionError> {
        let invocation = self.command();
        log::info!(
            "Creating {} from {} in {}",
            self.project_name,
            self.template_id,
            self.base_path.display()
        );

        let output = match runner.run(&invocation) {
            Ok(output) => output,
            Err(err @ ProvisionError::TimedOut { .. }) => {
                self.remove_container(runner);
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        if output.is_success() {
            return Ok(());
        }

        let reason = match output.exit_code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        Err(ProvisionError::ExternalProcess {
            command: invocation.to_string(),
            reason,
        })
    }

    fn remove_container(&self, runner: &dyn CommandRunner) {
        let cleanup = self.cleanup_command();
        log::warn!("Removing scaffolding container {}", self.container_name());
        match runner.run(&cleanup) {
            Ok(output) if output.is_success() => {}
            Ok(output) => log::error!("`{}` exited with {:?}", cleanup, output.exit_code),
            Err(e) => log::error!("Failed to remove scaffolding container: {}", e),
        }
    }
}
