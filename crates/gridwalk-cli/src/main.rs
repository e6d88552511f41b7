use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gridwalk_cli::args::{CheckArgs, OutputFormat, SearchArgs};
use gridwalk_cli::commands::{handle_check, handle_search};

#[derive(Parser, Debug)]
#[command(author, version, about = "Formula-driven best-first search on grid maps")]
struct Cli {
    /// Output format.
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search an octile map from a start cell to a goal cell.
    Search(SearchArgs),
    /// Compile a priority formula and evaluate it once.
    Check(CheckArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let output = match &cli.command {
        Command::Search(args) => handle_search(args, cli.format)?,
        Command::Check(args) => handle_check(args, cli.format)?,
    };
    print!("{output}");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
