//! siteharvest binary entry point.

use clap::{CommandFactory, Parser, Subcommand};
use siteharvest::cli;

#[derive(Parser)]
#[command(
    name = "siteharvest",
    version,
    about = "Walk sitemap trees and export every page URL to a timestamped CSV"
)]
struct Cli {
    /// Suppress non-essential output.
    #[arg(long, global = true)]
    quiet: bool,

    /// Per-root detail while harvesting.
    #[arg(long, global = true)]
    verbose: bool,

    /// Machine-readable JSON summary on stdout.
    #[arg(long, global = true)]
    json: bool,

    /// Disable ANSI colors.
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Harvest sitemap roots into a CSV artifact.
    Run(cli::run_cmd::RunArgs),
    /// Generate shell completions.
    Completions {
        /// Shell to generate for.
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let opts = Cli::parse();

    // Output toggles travel as env vars so every module sees them.
    if opts.quiet {
        std::env::set_var("SITEHARVEST_QUIET", "1");
    }
    if opts.verbose {
        std::env::set_var("SITEHARVEST_VERBOSE", "1");
    }
    if opts.json {
        std::env::set_var("SITEHARVEST_JSON", "1");
    }
    if opts.no_color {
        std::env::set_var("SITEHARVEST_NO_COLOR", "1");
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("siteharvest=info".parse().unwrap()),
        )
        .init();

    match opts.command {
        Command::Run(args) => cli::run_cmd::run(args).await,
        Command::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "siteharvest",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    }
}
