//! Dn command
//!
//! Usage: motree dn --meta <FILE> <INPUT>

use clap::Args;
use motree_core::ops::dn_ops;

use super::{InputArgs, MetaArgs};

#[derive(Debug, Args)]
pub struct DnArgs {
    #[command(flatten)]
    pub meta: MetaArgs,

    #[command(flatten)]
    pub input: InputArgs,
}

/// Execute dn command
///
/// Prints the Dn of every node, depth-first from the root.
pub fn execute(args: DnArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = args.meta.load()?;
    let mit = args.input.load_tree(registry)?;

    for id in mit.descendants(mit.root())? {
        println!("{}", dn_ops::dn(&mit, id)?);
    }

    Ok(())
}
