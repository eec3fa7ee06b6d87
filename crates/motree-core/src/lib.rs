//! motree core - Managed Object tree model
//!
//! This crate provides the in-memory model of a managed information tree
//! driven by class metadata:
//! - A class registry loaded from a metadata document (naming templates,
//!   permitted attributes, legal children)
//! - The tree itself, an arena of typed nodes with parent back references
//! - Rn/Dn formatting and Dn resolution against the registry
//! - Two wire encodings (Format A JSON, Format B XML) and response decoding
//! - A chainable handle for building configurations fluently

pub mod errors;
pub mod logging_facility;
pub mod naming;
pub mod ops;
pub mod proxy;
pub mod registry;
pub mod tree;
pub mod wire;

// Used by the logging macros
pub use motree_core_types;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, MoError, Result};
pub use ops::{ChildArgs, ChildCtor, Member};
pub use proxy::MoMut;
pub use registry::{ClassMeta, Registry};
pub use tree::{Mit, MoNode, NodeId, NodeState};
pub use wire::{Mo, WireFormat};
