use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crewgen::cli::SelectionArgs;
use crewgen::cli::commands::generate::GenerateOptions;
use crewgen::types::ModelTier;

#[derive(Parser)]
#[command(name = "crewgen")]
#[command(
    version,
    about = "Generates agents, skills and hooks for AI coding assistants from a project analysis"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate API calls, tokens and cost without calling any model
    Estimate {
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, help = "Model tier for the overview document: low, mid, high")]
        tier: Option<ModelTier>,
        #[arg(
            short = 'f',
            long,
            default_value = "text",
            help = "Output format: text, json"
        )]
        format: String,
    },

    /// Generate the selected items for a goal
    Generate {
        #[arg(help = "What the generated crew should help with")]
        goal: String,
        #[command(flatten)]
        selection: SelectionArgs,
        #[arg(long, short, help = "Output directory (default: .crewgen/output)")]
        output: Option<PathBuf>,
        #[arg(long, help = "Stop at the first failed item")]
        strict: bool,
        #[arg(long, help = "Maximum concurrent model calls (1-16)")]
        concurrency: Option<usize>,
        #[arg(long, help = "Model tier for the overview document: low, mid, high")]
        tier: Option<ModelTier>,
        #[arg(long = "no-cache", help = "Bypass the cache for this run")]
        no_cache: bool,
    },

    /// Manage the on-disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show entry counts and disk usage
    Stats,
    /// Remove every cached entry
    Clear,
    /// Remove expired, corrupt and outdated entries
    Prune,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show {
        #[arg(
            short = 'f',
            long,
            default_value = "toml",
            help = "Output format: toml, json"
        )]
        format: String,
    },
    /// Show configuration file paths
    Path,
    /// Initialize project configuration
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!("\n\x1b[1;31m━━━ PANIC ━━━\x1b[0m");
        eprintln!("\x1b[31mcrewgen encountered an unexpected error:\x1b[0m");
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "\x1b[90mLocation: {}:{}:{}\x1b[0m",
                location.file(),
                location.line(),
                location.column()
            );
        }
        eprintln!();

        // Backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("\x1b[31mError:\x1b[0m {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Estimate {
            selection,
            tier,
            format,
        } => {
            crewgen::cli::commands::estimate::run(selection.into_selection(), tier, &format)?;
        }
        Commands::Generate {
            goal,
            selection,
            output,
            strict,
            concurrency,
            tier,
            no_cache,
        } => {
            let rt = Runtime::new()?;
            let result = rt.block_on(crewgen::cli::commands::generate::run(GenerateOptions {
                goal,
                selection: selection.into_selection(),
                output,
                strict,
                concurrency,
                tier,
                no_cache,
            }))?;
            if !result.is_success() {
                anyhow::bail!("{} item(s) failed", result.failed.len());
            }
        }
        Commands::Cache { action } => {
            let rt = Runtime::new()?;
            match action {
                CacheAction::Stats => rt.block_on(crewgen::cli::commands::cache::stats())?,
                CacheAction::Clear => rt.block_on(crewgen::cli::commands::cache::clear())?,
                CacheAction::Prune => rt.block_on(crewgen::cli::commands::cache::prune())?,
            }
        }
        Commands::Config { action } => match action {
            ConfigAction::Show { format } => {
                crewgen::cli::commands::config::show(&format)?;
            }
            ConfigAction::Path => {
                crewgen::cli::commands::config::path()?;
            }
            ConfigAction::Init { force } => {
                crewgen::cli::commands::config::init(force)?;
            }
        },
    }

    Ok(())
}
