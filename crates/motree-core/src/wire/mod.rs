//! Wire formats
//!
//! Both encodings go through [`Mo`], an owned value tree that knows nothing
//! about the registry. Encoding snapshots a tree node into a `Mo`; decoding
//! produces a `Mo` that is validated against the registry before it touches
//! a tree.
//!
//! - Format A, [`json`]: `{"cls": {"attributes": {...}, "children": [...]}}`
//! - Format B, [`xml`]: `<cls attr="..."><child .../></cls>`

pub mod json;
pub mod xml;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::errors::{MoError, Result};
use crate::registry::Registry;

/// Owned, registry-independent managed object tree
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Mo {
    pub class_name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Mo>,
}

impl Mo {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: Mo) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Number of objects in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Mo::count).sum::<usize>()
    }

    /// Check this subtree against the registry
    ///
    /// Every class must be known, every attribute permitted, every child a
    /// legal child of its parent and carry all of its naming attributes,
    /// and every naming value present must fit its Rn placeholder.
    /// The top object may omit naming attributes: when merged into an
    /// existing node they are taken from that node.
    ///
    /// # Errors
    ///
    /// `UnknownClass`, `UnknownAttribute`, `UnknownMember` or `Naming`.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        let meta = registry.lookup_class(&self.class_name)?;
        for (name, value) in &self.attributes {
            meta.check_attribute(name)?;
            if meta.is_naming(name) {
                meta.rn_template().check_value(meta.name(), name, value)?;
            }
        }
        for child in &self.children {
            if !meta.has_child(&child.class_name) {
                return Err(MoError::UnknownMember {
                    class_name: meta.name().to_string(),
                    member: child.class_name.clone(),
                });
            }
            let child_meta = registry.lookup_class(&child.class_name)?;
            if let Some(missing) = child_meta
                .naming_attributes()
                .iter()
                .find(|n| !child.attributes.contains_key(*n))
            {
                return Err(MoError::naming(
                    child_meta.name(),
                    missing,
                    "naming attribute missing from payload",
                ));
            }
            child.validate(registry)?;
        }
        Ok(())
    }
}

/// The two wire encodings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireFormat {
    Json,
    Xml,
}

impl WireFormat {
    /// File extension / API suffix of the format
    pub fn extension(&self) -> &'static str {
        match self {
            WireFormat::Json => "json",
            WireFormat::Xml => "xml",
        }
    }

    /// Encode one object tree
    ///
    /// # Errors
    ///
    /// `Serialization` or `Encode` on writer failure.
    pub fn encode(&self, mo: &Mo) -> Result<String> {
        match self {
            WireFormat::Json => json::encode(mo),
            WireFormat::Xml => xml::encode(mo),
        }
    }

    /// Decode one object tree
    ///
    /// # Errors
    ///
    /// `Serialization` / `Decode` for malformed payloads.
    pub fn decode(&self, text: &str) -> Result<Mo> {
        match self {
            WireFormat::Json => json::decode(text),
            WireFormat::Xml => xml::decode(text),
        }
    }

    /// Decode an `imdata` response envelope into its objects
    ///
    /// # Errors
    ///
    /// `Serialization` / `Decode` for malformed payloads or a missing
    /// envelope.
    pub fn decode_envelope(&self, text: &str) -> Result<Vec<Mo>> {
        match self {
            WireFormat::Json => json::decode_envelope(text),
            WireFormat::Xml => xml::decode_envelope(text),
        }
    }
}

impl fmt::Display for WireFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for WireFormat {
    type Err = MoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(WireFormat::Json),
            "xml" => Ok(WireFormat::Xml),
            other => Err(MoError::decode(
                "format",
                format!("unknown wire format '{}'", other),
            )),
        }
    }
}

/// Name of the envelope element wrapping response objects
pub(crate) const ENVELOPE: &str = "imdata";
