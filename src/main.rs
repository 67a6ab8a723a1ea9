//! droid-build - Android build orchestration CLI

use std::path::PathBuf;
use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use droid_build::commands::{ArchCommand, BuildCommand, CleanCommand, SelectCommand};
use droid_build::build::usage;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build Android projects with Ant or Gradle
#[derive(Debug, Parser)]
#[command(name = "droid-build")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Project root
    #[arg(short = 'C', long, global = true, default_value = ".")]
    project: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print build results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the project (--debug, --release, --ant, --gradle, --nobuild)
    Build {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        options: Vec<String>,
    },

    /// Clean the project
    Clean {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        options: Vec<String>,
    },

    /// Detect the processor architecture of a device
    Arch {
        /// Device or emulator serial
        device: String,
    },

    /// Build, then print the APK best suited to a device
    Select {
        /// Device or emulator serial
        device: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        options: Vec<String>,
    },

    /// Show the recognized build options
    Usage,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Tracing subscriber already installed");
    }
}

/// Main entry point
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!("droid-build v{} in {:?}", VERSION, cli.project);

    let project_path = cli.project;
    match cli.command {
        Commands::Build { options } => {
            BuildCommand {
                project_path,
                options,
                json: cli.json,
            }
            .execute()
            .await?;
        }
        Commands::Clean { options } => {
            CleanCommand { project_path, options }.execute().await?;
        }
        Commands::Arch { device } => {
            ArchCommand { project_path, device }.execute().await?;
        }
        Commands::Select { device, options } => {
            SelectCommand {
                project_path,
                device,
                options,
            }
            .execute()
            .await?;
        }
        Commands::Usage => {
            print!("{}", usage("droid-build build"));
        }
    }

    Ok(())
}
