//! Resolve command
//!
//! Usage: motree resolve --meta <FILE> <DN>

use clap::Args;
use motree_core::ops::dn_ops;
use motree_core::Mit;

use super::MetaArgs;

#[derive(Debug, Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub meta: MetaArgs,

    /// Distinguished name to resolve
    pub dn: String,
}

/// Execute resolve command
///
/// Prints one line per segment: class, Rn and naming values, tab separated.
pub fn execute(args: ResolveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = args.meta.load()?;
    let mut mit = Mit::new(registry.clone());
    let target = dn_ops::from_dn(&mut mit, &args.dn)?;

    for id in dn_ops::path_from_root(&mit, target)? {
        let node = mit.node(id)?;
        let meta = registry.lookup_class(node.class_name())?;
        let naming = meta
            .naming_attributes()
            .iter()
            .map(|name| format!("{}={}", name, node.attribute(name).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join(",");
        println!(
            "{}\t{}\t{}",
            node.class_name(),
            dn_ops::rn(&mit, id)?,
            naming
        );
    }

    Ok(())
}
