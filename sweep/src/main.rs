use clap::{CommandFactory, Parser, Subcommand};
use libsweep::config::{ColorChoice, OutputFormat};
use std::path::PathBuf;

mod commands;
mod context;
mod format;
mod logging;

use commands::delete::DeleteArgs;
use commands::images::ImagesArgs;

/// Sweep - Container Registry Image Pruner
///
/// Lists the images of an OCI registry, newest first, and deletes the ones
/// selected by age and tag filters.
#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Registry URL (default: http://localhost:5000)
    #[arg(short, long, global = true)]
    url: Option<String>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, global = true)]
    insecure: bool,

    /// Config file (default: $XDG_CONFIG_HOME/sweep/config.yaml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true)]
    color: Option<ColorChoice>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List repositories with their tag counts
    Repos {
        /// Output format: pretty, json, yaml
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },
    /// List images newest first, optionally deleting them
    Images(ImagesArgs),
    /// Delete the repository:tag images read from stdin
    Delete(DeleteArgs),
    /// Display version information
    Version,
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    logging::init(verbosity);

    // Commands that need no configuration
    match &cli.command {
        Commands::Version => {
            commands::version::print_version();
            return;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return;
        }
        _ => {}
    }

    // Build context with precedence: defaults < config file < env vars < CLI flags
    let overrides = context::CliOverrides {
        config_path: cli.config,
        url: cli.url,
        insecure: cli.insecure,
        color: cli.color,
    };
    let ctx = match context::AppContext::build(overrides, verbosity) {
        Ok(ctx) => ctx,
        Err(e) => {
            format::create_formatter(ColorChoice::Auto).error(&e.to_string());
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Commands::Repos { format } => commands::repos::handle_repos(&ctx, *format).await,
        Commands::Images(args) => commands::images::handle_images(&ctx, args).await,
        Commands::Delete(args) => commands::delete::handle_delete(&ctx, args).await,
        Commands::Version | Commands::Completion { .. } => Ok(()),
    };

    if let Err(message) = result {
        format::error(&ctx, &message);
        std::process::exit(1);
    }
}
