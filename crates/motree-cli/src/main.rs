//! motree CLI
//!
//! Command-line interface for resolving Dns and converting payloads
//! against a class metadata document

use clap::{Parser, Subcommand};
use motree_core::logging_facility::{init, Profile};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "motree")]
#[command(about = "motree - Managed Object tree tooling", long_about = None)]
struct Cli {
    /// Emit JSON structured logs on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Emit human-readable debug logs on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve a Dn segment by segment
    Resolve(commands::resolve::ResolveArgs),
    /// Re-encode a payload in another wire format
    Convert(commands::convert::ConvertArgs),
    /// Print the Dn of every object in a payload
    Dn(commands::dn::DnArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.log_json {
        init(Profile::Production);
    } else if cli.verbose {
        init(Profile::Development);
    }

    let result = match cli.command {
        Commands::Resolve(args) => commands::resolve::execute(args),
        Commands::Convert(args) => commands::convert::execute(args),
        Commands::Dn(args) => commands::dn::execute(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
