//! Subcommands and the input handling they share

pub mod convert;
pub mod dn;
pub mod resolve;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use motree_core::ops::wire_ops;
use motree_core::{Mit, Registry, WireFormat};

/// Class metadata selection, common to every subcommand
#[derive(Debug, Args)]
pub struct MetaArgs {
    /// Class metadata document (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub meta: PathBuf,
}

impl MetaArgs {
    pub fn load(&self) -> Result<Arc<Registry>, Box<dyn std::error::Error>> {
        let registry = Registry::from_path(&self.meta)?;
        tracing::debug!(class_count = registry.len(), "registry loaded");
        Ok(Arc::new(registry))
    }
}

/// Payload input, common to `convert` and `dn`
#[derive(Debug, Args)]
pub struct InputArgs {
    /// Payload file
    pub input: PathBuf,

    /// Input format (default: from the file extension)
    #[arg(long, value_name = "FORMAT")]
    pub from: Option<WireFormat>,

    /// Treat the input as a query response (`imdata` envelope)
    #[arg(long)]
    pub response: bool,
}

impl InputArgs {
    fn format(&self) -> Result<WireFormat, Box<dyn std::error::Error>> {
        if let Some(format) = self.from {
            return Ok(format);
        }
        let extension = self
            .input
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                format!(
                    "cannot infer format of {}, pass --from",
                    self.input.display()
                )
            })?;
        Ok(extension.parse()?)
    }

    /// Decode the input into a tree rooted at the registry root
    pub fn load_tree(&self, registry: Arc<Registry>) -> Result<Mit, Box<dyn std::error::Error>> {
        let format = self.format()?;
        let text = read_input(&self.input)?;

        if self.response {
            let mut mit = Mit::new(registry);
            wire_ops::decode_response(&mut mit, format, &text)?;
            return Ok(mit);
        }
        Ok(Mit::from_mo(registry, &format.decode(&text)?)?)
    }
}

fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e).into())
}
