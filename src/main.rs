mod config;
mod typing;

use anyhow::Context;
use clap::{Parser, Subcommand};
use config::Config;
use std::io::Read;
use typing::{EditCommand, ExecutionEngine, Segment};

#[derive(Parser)]
#[command(name = "voxtype")]
struct Cli {
    /// Trace each segment on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Seconds to wait before typing, to switch focus to the target window
    #[arg(long, default_value_t = 0)]
    delay_secs: u64,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Execute a JSON segment list read from stdin (default)
    Exec,
    /// List the recognized editing commands
    Commands,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if matches!(cli.command, Some(Command::Commands)) {
        print_commands();
        return Ok(());
    }

    let mut config = Config::load();
    if cli.verbose {
        config.typing.verbose = true;
    }

    let mut json = String::new();
    std::io::stdin()
        .read_to_string(&mut json)
        .context("Failed to read segment list from stdin")?;
    let segments: Vec<Segment> =
        serde_json::from_str(&json).context("Failed to parse segment list")?;

    if cli.delay_secs > 0 {
        eprintln!("Typing in {}s, focus the target window...", cli.delay_secs);
        std::thread::sleep(std::time::Duration::from_secs(cli.delay_secs));
    }

    let engine =
        ExecutionEngine::system(config.typing).context("Failed to start automation backend")?;
    engine.execute(&segments)?;

    Ok(())
}

fn print_commands() {
    println!("Editing commands (any alias works):");
    for cmd in EditCommand::ALL {
        println!("  {:12} {}", cmd.name(), cmd.aliases().join(" / "));
    }
}
