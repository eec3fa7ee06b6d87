//! Convert command
//!
//! Usage: motree convert --meta <FILE> --to <FORMAT> <INPUT> [--output <FILE>]

use std::path::PathBuf;

use clap::Args;
use motree_core::ops::wire_ops;
use motree_core::WireFormat;

use super::{InputArgs, MetaArgs};

#[derive(Debug, Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub meta: MetaArgs,

    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[arg(long, value_name = "FORMAT")]
    pub to: WireFormat,

    /// Output file path (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Execute convert command
pub fn execute(args: ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = args.meta.load()?;
    let mit = args.input.load_tree(registry)?;
    let text = wire_ops::encode(&mit, mit.root(), args.to)?;

    if let Some(output_path) = args.output {
        std::fs::write(&output_path, format!("{}\n", text))?;
        println!("Converted to {}", output_path.display());
    } else {
        println!("{}", text);
    }

    Ok(())
}
