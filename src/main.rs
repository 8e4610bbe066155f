use clap::Parser;
use colored::*;
use devstack_cli::{
    cli::{Cli, ComposeFormat, Commands, ProjectArgs},
    common::{command_utils, file_utils},
    config::{self, types::Config},
    generator, DryRunRunner, Framework, FrameworkKind, FrameworkOptions, SystemCommandRunner,
};
use devstack_cli::common::CommandRunner;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

fn main() {
    match run() {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

/// Returns `false` when a provisioning step reported failure.
fn run() -> devstack_cli::Result<bool> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    let config = config::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::New {
            project,
            dry_run,
            compose,
        } => handle_new(&config, project, dry_run, compose),
        Commands::Init { project, dry_run } => handle_init(&config, project, dry_run),
        Commands::Setup { project, compose } => handle_setup(&config, project, compose),
        Commands::Compose {
            framework,
            format,
            output,
        } => handle_compose(&config, framework, format, output),
        Commands::Ports { framework, json } => handle_ports(&config, framework, json),
        Commands::List => handle_list(),
    }
}

/// Project directory for `project`, refusing names that leave the base path.
fn project_root(project: &ProjectArgs) -> devstack_cli::Result<PathBuf> {
    file_utils::validate_project_name(&project.name)?;
    Ok(file_utils::validate_project_path(&project.path)?.join(&project.name))
}

fn build_framework(
    config: &Config,
    project: &ProjectArgs,
    dry_run: bool,
) -> devstack_cli::Result<Box<dyn Framework>> {
    file_utils::validate_project_name(&project.name)?;
    let descriptor = project.framework.configured_descriptor(config)?;
    let base_path = file_utils::validate_project_path(&project.path)?;

    let runner: Arc<dyn CommandRunner> = if dry_run {
        Arc::new(DryRunRunner)
    } else {
        match config.runtime.init_timeout() {
            Some(timeout) => Arc::new(SystemCommandRunner::with_timeout(timeout)),
            None => Arc::new(SystemCommandRunner::new()),
        }
    };

    Ok(project.framework.build(
        descriptor,
        FrameworkOptions {
            project_name: project.name.clone(),
            base_path,
            container_runtime: config.runtime.container_runtime.clone(),
            runner,
        },
    ))
}

fn handle_new(
    config: &Config,
    project: ProjectArgs,
    dry_run: bool,
    compose: bool,
) -> devstack_cli::Result<bool> {
    if !handle_init(config, project.clone(), dry_run)? {
        println!(
            "{} Skipping environment setup because the project was not created",
            "⚠️".yellow()
        );
        return Ok(false);
    }
    if dry_run {
        return Ok(true);
    }
    handle_setup(config, project, compose)
}

fn handle_init(
    config: &Config,
    project: ProjectArgs,
    dry_run: bool,
) -> devstack_cli::Result<bool> {
    let framework = build_framework(config, &project, dry_run)?;
    let display_name = framework.descriptor().display_name.clone();

    if !dry_run && !command_utils::is_command_available(&config.runtime.container_runtime) {
        log::warn!(
            "{} was not found in PATH; scaffolding will likely fail",
            config.runtime.container_runtime
        );
    }

    println!("🚀 Creating {} project '{}'...", display_name, project.name);
    if framework.initialize_project() {
        if !dry_run {
            println!("{} {} project created", "✅".green(), display_name);
        }
        Ok(true)
    } else {
        eprintln!(
            "{} Failed to create {} project '{}'",
            "❌".red(),
            display_name,
            project.name
        );
        Ok(false)
    }
}

fn handle_setup(
    config: &Config,
    project: ProjectArgs,
    compose: bool,
) -> devstack_cli::Result<bool> {
    let framework = build_framework(config, &project, false)?;
    let project_root = project_root(&project)?;

    println!("🐳 Generating Docker environment in {}...", project_root.display());
    if !framework.setup_development_environment() {
        eprintln!("{} Failed to generate Docker environment", "❌".red());
        return Ok(false);
    }

    let graph = framework.configure_docker();
    if compose {
        let asset = generator::render_compose(&graph)?;
        let written = generator::AssetWriter::new(&project_root).write_all(&[asset])?;
        for path in written {
            println!("📄 {}", path.display());
        }
    }

    println!("{} Docker environment ready", "✅".green());
    let placeholders = graph.placeholders();
    if !placeholders.is_empty() {
        println!("💡 Define these variables in the project's .env file:");
        for name in placeholders {
            println!("   - {}", name.cyan());
        }
    }
    Ok(true)
}

fn handle_compose(
    config: &Config,
    framework: FrameworkKind,
    format: ComposeFormat,
    output: Option<PathBuf>,
) -> devstack_cli::Result<bool> {
    let descriptor = framework.configured_descriptor(config)?;
    let graph = generator::compose_gen::generate(&descriptor);
    graph.validate()?;

    let rendered = match format {
        ComposeFormat::Yaml => graph.to_yaml()?,
        ComposeFormat::Json => graph.to_json()?,
    };

    match output {
        Some(path) => {
            file_utils::write_text(&path, &rendered)?;
            println!("{} Wrote {}", "✅".green(), path.display());
        }
        None => print!("{}", rendered),
    }
    Ok(true)
}

fn handle_ports(
    config: &Config,
    framework: FrameworkKind,
    json: bool,
) -> devstack_cli::Result<bool> {
    let ports = framework.configured_descriptor(config)?.ports.as_map();

    if json {
        println!("{}", serde_json::to_string_pretty(&ports)?);
    } else {
        println!("🔌 Default ports for {}:", framework.to_string().bold());
        let count = ports.len();
        for (i, (role, port)) in ports.iter().enumerate() {
            let branch = if i + 1 == count { "└──" } else { "├──" };
            println!("{} {:<10} {}", branch, role, port);
        }
    }
    Ok(true)
}

fn handle_list() -> devstack_cli::Result<bool> {
    println!("🚀 Supported Frameworks:");
    let kinds = FrameworkKind::all();
    for (i, kind) in kinds.iter().enumerate() {
        let descriptor = kind.descriptor();
        let branch = if i + 1 == kinds.len() { "└──" } else { "├──" };
        println!(
            "{} {:<10} {} ({})",
            branch,
            kind.name(),
            descriptor.display_name.bold(),
            descriptor.template_id.dimmed()
        );
    }
    Ok(true)
}
