use crate::framework::FrameworkKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devstack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate Docker development environments for web frameworks")]
#[command(long_about = "Scaffolds a new framework project with a containerized package \
manager and generates the Dockerfile, runtime configuration, web server virtual host and \
Compose service graph needed to develop it locally.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Framework and project location shared by the provisioning commands
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Framework to provision
    #[arg(value_enum)]
    pub framework: FrameworkKind,

    /// Name of the project directory
    #[arg(value_name = "PROJECT_NAME")]
    pub name: String,

    /// Directory the project is created in
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub path: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a project and generate its Docker environment
    New {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print the scaffolding command instead of running it
        #[arg(long)]
        dry_run: bool,

        /// Also write docker-compose.yml into the project
        #[arg(long)]
        compose: bool,
    },

    /// Scaffold a project with the framework's package manager
    Init {
        #[command(flatten)]
        project: ProjectArgs,

        /// Print the scaffolding command instead of running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Generate Docker assets in an existing project
    Setup {
        #[command(flatten)]
        project: ProjectArgs,

        /// Also write docker-compose.yml into the project
        #[arg(long)]
        compose: bool,
    },

    /// Print the Compose service graph for a framework
    Compose {
        #[arg(value_enum)]
        framework: FrameworkKind,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ComposeFormat,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the default host ports for a framework
    Ports {
        #[arg(value_enum)]
        framework: FrameworkKind,

        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// List supported frameworks
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ComposeFormat {
    Yaml,
    Json,
}

impl Cli {
    /// Initialize logging based on verbosity level
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
