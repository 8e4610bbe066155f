use devstack_cli::common::CommandOutput;
use devstack_cli::framework::php::{laravel, PhpFramework};
use devstack_cli::{
    CommandInvocation, CommandRunner, DevstackError, Framework, FrameworkDescriptor, FrameworkKind,
    FrameworkOptions, PortTable, ProvisionError,
};
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

#[derive(Clone, Copy)]
enum Outcome {
    Exit(i32),
    SpawnFailure,
    TimedOut,
}

/// Records every invocation. The scaffolding run answers with `outcome`;
/// any other command succeeds.
struct RecordingRunner {
    outcome: Outcome,
    calls: Mutex<Vec<CommandInvocation>>,
}

impl RecordingRunner {
    fn answering(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn exiting_with(code: i32) -> Arc<Self> {
        Self::answering(Outcome::Exit(code))
    }

    fn calls(&self) -> Vec<CommandInvocation> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, invocation: &CommandInvocation) -> Result<CommandOutput, ProvisionError> {
        self.calls.lock().unwrap().push(invocation.clone());
        if invocation.args.first().map(String::as_str) != Some("run") {
            return Ok(CommandOutput::success());
        }
        match self.outcome {
            Outcome::Exit(code) => Ok(CommandOutput {
                exit_code: Some(code),
            }),
            Outcome::SpawnFailure => Err(ProvisionError::ExternalProcess {
                command: invocation.to_string(),
                reason: "failed to start docker: No such file or directory".to_string(),
            }),
            Outcome::TimedOut => Err(ProvisionError::TimedOut {
                command: invocation.to_string(),
                timeout: Duration::from_secs(900),
            }),
        }
    }
}

fn options(base: &Path, runner: Arc<dyn CommandRunner>) -> FrameworkOptions {
    FrameworkOptions {
        project_name: "myapp".to_string(),
        base_path: base.to_path_buf(),
        container_runtime: "docker".to_string(),
        runner,
    }
}

fn read_tree(root: &Path) -> Vec<(String, String)> {
    [
        "docker/php/Dockerfile",
        "docker/php/local.ini",
        "docker/nginx/conf.d/app.conf",
    ]
    .iter()
    .map(|rel| (rel.to_string(), fs::read_to_string(root.join(rel)).unwrap()))
    .collect()
}

#[test]
fn initialize_passes_template_then_name_last() {
    let runner = RecordingRunner::exiting_with(0);
    let framework = FrameworkKind::Laravel.build(
        laravel::descriptor(),
        options(Path::new("/work"), runner.clone()),
    );

    assert!(framework.initialize_project());

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    let args = &calls[0].args;
    assert_eq!(calls[0].program, "docker");
    assert_eq!(&args[args.len() - 2..], ["laravel/laravel", "myapp"]);
    assert_eq!(&args[..3], ["run", "--rm", "--name"]);
    assert_eq!(&args[4..8], ["-v", "/work:/app", "-w", "/app"]);
}

#[test]
fn failed_initialize_returns_false_and_writes_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let runner = RecordingRunner::exiting_with(1);
    let framework =
        FrameworkKind::Laravel.build(laravel::descriptor(), options(temp_dir.path(), runner));

    assert!(!framework.initialize_project());
    assert!(!temp_dir.path().join("myapp").exists());
    // the project directory was never created, so setup must fail too
    assert!(!framework.setup_development_environment());
}

#[test]
fn initialize_reports_spawn_failure() {
    let runner = RecordingRunner::answering(Outcome::SpawnFailure);
    let framework = PhpFramework::new(
        laravel::descriptor(),
        options(Path::new("/work"), runner.clone()),
    );

    let err = framework.try_initialize_project().unwrap_err();
    assert!(matches!(
        err,
        DevstackError::Provision(ProvisionError::ExternalProcess { .. })
    ));
    assert!(!framework.initialize_project());
    assert!(runner.calls().iter().all(|call| call.args[0] == "run"));
}

#[test]
fn initialize_timeout_removes_container() {
    let runner = RecordingRunner::answering(Outcome::TimedOut);
    let framework = PhpFramework::new(
        laravel::descriptor(),
        options(Path::new("/work"), runner.clone()),
    );

    let err = framework.try_initialize_project().unwrap_err();
    assert!(matches!(
        err,
        DevstackError::Provision(ProvisionError::TimedOut { .. })
    ));

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].to_string(), "docker rm -f devstack-init-myapp");

    assert!(!framework.initialize_project());
}

#[test]
fn setup_twice_produces_identical_files() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("myapp");
    fs::create_dir(&root).unwrap();
    let framework = FrameworkKind::Laravel.build(
        laravel::descriptor(),
        options(temp_dir.path(), RecordingRunner::exiting_with(0)),
    );

    assert!(framework.setup_development_environment());
    let first = read_tree(&root);
    assert!(framework.setup_development_environment());
    let second = read_tree(&root);

    assert_eq!(first, second);
    let docker_entries: Vec<_> = fs::read_dir(root.join("docker"))
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(docker_entries.len(), 2);
}

#[test]
fn generated_dockerfile_matches_descriptor() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("myapp")).unwrap();

    let mut descriptor = laravel::descriptor();
    descriptor.runtime.image = "php:8.2-fpm".to_string();
    descriptor.runtime.extensions = vec!["pdo_mysql".to_string(), "gd".to_string()];
    let framework = PhpFramework::new(
        descriptor,
        options(temp_dir.path(), RecordingRunner::exiting_with(0)),
    );

    framework.try_setup_development_environment().unwrap();
    let dockerfile =
        fs::read_to_string(temp_dir.path().join("myapp/docker/php/Dockerfile")).unwrap();

    assert!(dockerfile.lines().any(|line| line == "FROM php:8.2-fpm"));
    assert!(dockerfile.contains("RUN docker-php-ext-install \\\n    pdo_mysql gd\n"));
}

#[test]
fn web_service_binds_configured_port() {
    let mut descriptor = laravel::descriptor();
    descriptor.ports = PortTable {
        web: 8080,
        database: 3306,
        cache: 6379,
    };
    let framework = PhpFramework::new(
        descriptor,
        options(Path::new("/work"), RecordingRunner::exiting_with(0)),
    );

    let graph = framework.configure_docker();
    assert_eq!(
        graph.service("nginx").unwrap().ports,
        vec!["8080:80".to_string()]
    );
}

fn descriptor_strategy() -> impl Strategy<Value = FrameworkDescriptor> {
    (
        prop::sample::select(FrameworkKind::all().to_vec()),
        prop::collection::vec("[a-z_]{1,12}", 0..8),
        "php:8\\.[0-4]-fpm",
        (1u16..20000, 20000u16..40000, 40000u16..=65535),
    )
        .prop_map(|(kind, extensions, image, (web, database, cache))| {
            let mut descriptor = kind.descriptor();
            descriptor.runtime.extensions = extensions;
            descriptor.runtime.image = image;
            descriptor.ports = PortTable { web, database, cache };
            descriptor
        })
}

fn build(descriptor: FrameworkDescriptor) -> PhpFramework {
    PhpFramework::new(
        descriptor,
        options(Path::new("/work"), RecordingRunner::exiting_with(0)),
    )
}

proptest! {
    #[test]
    fn configure_docker_is_pure(descriptor in descriptor_strategy()) {
        let framework = build(descriptor);
        prop_assert_eq!(framework.configure_docker(), framework.configure_docker());
    }

    #[test]
    fn depends_on_is_acyclic(descriptor in descriptor_strategy()) {
        let graph = build(descriptor).configure_docker();
        let order = graph.dependency_order().unwrap();
        prop_assert_eq!(order.len(), graph.services.len());
    }

    #[test]
    fn ports_cover_every_published_service(descriptor in descriptor_strategy()) {
        let framework = build(descriptor);
        let ports = framework.default_ports();
        for (name, spec) in &framework.configure_docker().services {
            if spec.ports.is_empty() {
                continue;
            }
            let key = spec.role.port_key();
            prop_assert!(key.is_some(), "service {} publishes ports without a role key", name);
            let host = framework.descriptor().ports.get(key.unwrap());
            prop_assert_eq!(host, ports.get(key.unwrap()).copied());
            let host = host.unwrap();
            let host_prefix = format!("{}:", host);
            prop_assert!(spec.ports[0].starts_with(&host_prefix));
        }
    }

    #[test]
    fn extensions_keep_their_order(descriptor in descriptor_strategy()) {
        let expected = descriptor.runtime.extensions.join(" ");
        let assets = devstack_cli::render_assets(&descriptor);
        if !expected.is_empty() {
            let step = format!("RUN docker-php-ext-install \\\n    {}\n", expected);
            prop_assert!(assets[0].contents.contains(&step));
        }
    }
}
