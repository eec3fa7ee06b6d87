//! Tree operations
//!
//! Free functions over a [`Mit`](crate::tree::Mit), grouped by concern:
//! - [`mo_ops`]: child construction, attribute access, member lookup,
//!   navigation, detach/remove
//! - [`dn_ops`]: Rn/Dn computation and Dn resolution into the tree
//! - [`wire_ops`]: snapshots, payload merges and response decoding
//!
//! Every operation validates fully before it mutates, so a failed call
//! leaves the tree as it was.

pub mod dn_ops;
pub mod mo_ops;
pub mod wire_ops;

pub use mo_ops::{ChildArgs, ChildCtor, Member};
