//! Registry loading from a metadata document
//!
//! The document mirrors the shape of the management API's published class
//! metadata, reduced to what the tree needs:
//!
//! ```json
//! {
//!   "rootClass": "polUni",
//!   "classes": {
//!     "polUni":   { "rnFormat": "uni", "contains": ["fvTenant"] },
//!     "fvTenant": { "rnFormat": "tn-{name}", "identifiedBy": ["name"],
//!                   "properties": ["name", "descr"] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::{ClassMeta, Registry};
use crate::errors::{MoError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaDocument {
    root_class: String,
    classes: BTreeMap<String, ClassDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassDocument {
    rn_format: String,
    #[serde(default)]
    identified_by: Option<Vec<String>>,
    #[serde(default)]
    properties: Vec<String>,
    #[serde(default)]
    contains: Vec<String>,
}

impl Registry {
    /// Build a registry from a JSON metadata document
    ///
    /// # Errors
    ///
    /// `Serialization` for malformed JSON, `InvalidTemplate` /
    /// `InvalidRegistry` for inconsistent metadata.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let document: MetaDocument = serde_json::from_str(text)?;
        let mut builder = Registry::builder(document.root_class);
        for (name, class) in document.classes {
            let mut meta = ClassMeta::new(name, &class.rn_format)?;
            if let Some(naming) = class.identified_by {
                meta = meta.with_naming(naming);
            }
            builder = builder.class(
                meta.with_attributes(class.properties)
                    .with_children(class.contains),
            );
        }
        builder.build()
    }

    /// Read and build a registry from a metadata file
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, otherwise as [`Registry::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MoError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }
}
