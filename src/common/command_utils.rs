use crate::error::ProvisionError;
use std::fmt;
use std::process::{Command, Stdio};
use std::time::Duration;

/// A program and its argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// How a finished command exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self { exit_code: Some(0) }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs external commands. Swapped for a fake in tests and dry runs.
pub trait CommandRunner: Send + Sync {
    /// Runs the command to completion. Spawn failures and timeouts are
    /// errors; a non-zero exit is reported through [`CommandOutput`].
    fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProvisionError>;
}

/// Spawns real processes, inheriting stdout and stderr.
///
/// The child runs on a private current-thread tokio runtime, so `run` must
/// not be called from inside another tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kills the child once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    async fn run_async(
        &self,
        invocation: &CommandInvocation,
    ) -> Result<CommandOutput, ProvisionError> {
        let mut child = tokio::process::Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ProvisionError::ExternalProcess {
                command: invocation.to_string(),
                reason: format!("failed to start {}: {}", invocation.program, e),
            })?;

        let wait_error = |e: std::io::Error| ProvisionError::ExternalProcess {
            command: invocation.to_string(),
            reason: format!("failed to wait for process: {}", e),
        };

        let Some(timeout) = self.timeout else {
            let status = child.wait().await.map_err(wait_error)?;
            return Ok(CommandOutput {
                exit_code: status.code(),
            });
        };

        let wait_result = tokio::time::timeout(timeout, child.wait()).await;
        match wait_result {
            Ok(Ok(status)) => Ok(CommandOutput {
                exit_code: status.code(),
            }),
            Ok(Err(e)) => Err(wait_error(e)),
            Err(_) => {
                log::warn!("Killing `{}` after {:?}", invocation, timeout);
                // kill() also reaps the child
                if let Err(e) = child.kill().await {
                    log::error!("Failed to kill `{}`: {}", invocation, e);
                }
                Err(ProvisionError::TimedOut {
                    command: invocation.to_string(),
                    timeout,
                })
            }
        }
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProvisionError> {
        log::debug!("Running: {}", invocation);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProvisionError::ExternalProcess {
                command: invocation.to_string(),
                reason: format!("failed to start process runtime: {}", e),
            })?;
        runtime.block_on(self.run_async(invocation))
    }
}

/// Prints the command instead of running it and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunRunner;

impl CommandRunner for DryRunRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProvisionError> {
        log::info!("Dry run, not executing: {}", invocation);
        println!("{}", invocation);
        Ok(CommandOutput::success())
    }
}

/// Check if a command is available in PATH
pub fn is_command_available(cmd: &str) -> bool {
    if Command::new(cmd)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
    {
        return true;
    }

    // On Windows, also try with .exe extension
    if cfg!(windows) && !cmd.ends_with(".exe") {
        return Command::new(format!("{}.exe", cmd))
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_display_joins_arguments() {
        let invocation = CommandInvocation::new("docker")
            .args(["run", "--rm"])
            .arg("image");
        assert_eq!(invocation.to_string(), "docker run --rm image");
    }

    #[test]
    fn test_missing_program_is_external_failure() {
        let runner = SystemCommandRunner::new();
        let err = runner
            .run(&CommandInvocation::new("devstack-definitely-missing-program"))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::ExternalProcess { .. }));
    }

    #[test]
    fn test_dry_run_succeeds() {
        let output = DryRunRunner.run(&CommandInvocation::new("docker")).unwrap();
        assert!(output.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_code_is_reported() {
        let runner = SystemCommandRunner::with_timeout(Duration::from_secs(10));
        let output = runner
            .run(&CommandInvocation::new("sh").args(["-c", "exit 1"]))
            .unwrap();
        assert_eq!(output.exit_code, Some(1));
        assert!(!output.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_times_out() {
        let runner = SystemCommandRunner::with_timeout(Duration::from_millis(200));
        let started = Instant::now();
        let err = runner
            .run(&CommandInvocation::new("sleep").arg("5"))
            .unwrap_err();

        assert!(matches!(err, ProvisionError::TimedOut { .. }));
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_timed_out_child_is_killed() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let marker = temp_dir.path().join("finished");
        let script = format!("sleep 1; touch {}", marker.display());

        let runner = SystemCommandRunner::with_timeout(Duration::from_millis(200));
        let err = runner
            .run(&CommandInvocation::new("sh").args(["-c", script.as_str()]))
            .unwrap_err();
        assert!(matches!(err, ProvisionError::TimedOut { .. }));

        std::thread::sleep(Duration::from_millis(1500));
        assert!(!marker.exists());
    }
}
