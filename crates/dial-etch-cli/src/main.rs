//! dial-etch - CLI for watch dial pattern generation
//!
//! Usage:
//!   dial-etch generate [options]     Generate a dial (SVG or JSON)
//!   dial-etch presets                List layer presets
//!   dial-etch kinds                  List pattern kinds
//!   dial-etch example                Print an example config file

mod cli;

use clap::{Parser, Subcommand};

use cli::generate::GenerateArgs;

#[derive(Parser)]
#[command(name = "dial-etch", version, about = "Layered guilloche patterns for watch dials")]
struct Cli {
    /// Log debug details (per-layer parameters) to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a dial
    Generate(GenerateArgs),
    /// List layer presets
    Presets,
    /// List pattern kinds
    Kinds,
    /// Print a commented example config file
    Example,
}

fn main() {
    let args = Cli::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();

    let result = match args.command {
        Command::Generate(generate) => cli::cmd_generate(&generate),
        Command::Presets => {
            cli::cmd_presets();
            Ok(())
        }
        Command::Kinds => {
            cli::cmd_kinds();
            Ok(())
        }
        Command::Example => {
            cli::cmd_example();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
