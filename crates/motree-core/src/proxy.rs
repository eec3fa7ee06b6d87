//! Chainable handle over one node
//!
//! [`MoMut`] borrows the tree mutably and points at one node. Methods that
//! move through the tree consume the handle and return a new one, so a
//! configuration reads as a chain:
//!
//! ```
//! # use std::sync::Arc;
//! # use motree_core::{ChildArgs, ClassMeta, Mit, Registry};
//! # let registry = Registry::builder("polUni")
//! #     .class(ClassMeta::new("polUni", "uni")?.with_children(["fvTenant"]))
//! #     .class(ClassMeta::new("fvTenant", "tn-{name}")?.with_children(["fvCtx", "fvBD"]))
//! #     .class(ClassMeta::new("fvCtx", "ctx-{name}")?)
//! #     .class(ClassMeta::new("fvBD", "BD-{name}")?)
//! #     .build()?;
//! let mut mit = Mit::new(Arc::new(registry));
//! let bd = mit
//!     .uni()
//!     .child("fvTenant", "test")?
//!     .child("fvCtx", "infra")?
//!     .up(1)?
//!     .child("fvBD", "lab")?;
//! assert_eq!(bd.dn()?, "uni/tn-test/BD-lab");
//! # Ok::<(), motree_core::MoError>(())
//! ```

use crate::errors::Result;
use crate::ops::mo_ops::{self, ChildArgs, Member};
use crate::ops::{dn_ops, wire_ops};
use crate::tree::{Mit, MoNode, NodeId};
use crate::wire::Mo;

/// Mutable handle to one node of a [`Mit`]
#[derive(Debug)]
pub struct MoMut<'a> {
    mit: &'a mut Mit,
    id: NodeId,
}

impl<'a> MoMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn node(&self) -> Result<&MoNode> {
        self.mit.node(self.id)
    }

    pub fn class_name(&self) -> Result<&str> {
        Ok(self.node()?.class_name())
    }

    /// Read an attribute; `None` when unset
    pub fn get(&self, name: &str) -> Result<Option<&str>> {
        mo_ops::get_attribute(self.mit, self.id, name)
    }

    /// Write an attribute and keep the handle
    pub fn set(self, name: &str, value: &str) -> Result<Self> {
        mo_ops::set_attribute(self.mit, self.id, name, value)?;
        Ok(self)
    }

    /// Resolve a member name (attribute first, then child class)
    pub fn member(&self, name: &str) -> Result<Member<'_>> {
        mo_ops::member(self.mit, self.id, name)
    }

    /// Construct a child and move the handle to it
    pub fn child(self, class_name: &str, args: impl Into<ChildArgs>) -> Result<MoMut<'a>> {
        let id = mo_ops::create_child(self.mit, self.id, class_name, args.into())?;
        Ok(MoMut { mit: self.mit, id })
    }

    /// Move the handle `levels` ancestors up
    pub fn up(self, levels: usize) -> Result<MoMut<'a>> {
        let id = mo_ops::up(self.mit, self.id, levels)?;
        Ok(MoMut { mit: self.mit, id })
    }

    pub fn parent(self) -> Result<MoMut<'a>> {
        self.up(1)
    }

    pub fn rn(&self) -> Result<String> {
        dn_ops::rn(self.mit, self.id)
    }

    pub fn dn(&self) -> Result<String> {
        dn_ops::dn(self.mit, self.id)
    }

    pub fn to_mo(&self) -> Result<Mo> {
        wire_ops::to_mo(self.mit, self.id)
    }

    pub fn to_json(&self) -> Result<String> {
        wire_ops::to_json(self.mit, self.id)
    }

    pub fn to_xml(&self) -> Result<String> {
        wire_ops::to_xml(self.mit, self.id)
    }

    /// Merge a Format A payload into the node
    pub fn set_json(self, text: &str) -> Result<Self> {
        wire_ops::set_json(self.mit, self.id, text)?;
        Ok(self)
    }

    /// Merge a Format B payload into the node
    pub fn set_xml(self, text: &str) -> Result<Self> {
        wire_ops::set_xml(self.mit, self.id, text)?;
        Ok(self)
    }

    /// Unlink the node from its parent, returning its id
    pub fn detach(self) -> Result<NodeId> {
        mo_ops::detach(self.mit, self.id)?;
        Ok(self.id)
    }
}

impl Mit {
    /// Handle to any live node
    ///
    /// # Errors
    ///
    /// `NodeNotFound` for a stale id.
    pub fn mo(&mut self, id: NodeId) -> Result<MoMut<'_>> {
        self.node(id)?;
        Ok(MoMut { mit: self, id })
    }

    /// Handle to the root node
    pub fn uni(&mut self) -> MoMut<'_> {
        let id = self.root();
        MoMut { mit: self, id }
    }

    /// Resolve a Dn into the tree (see [`dn_ops::from_dn`])
    ///
    /// # Errors
    ///
    /// As [`dn_ops::from_dn`].
    pub fn from_dn(&mut self, dn: &str) -> Result<MoMut<'_>> {
        let id = dn_ops::from_dn(self, dn)?;
        Ok(MoMut { mit: self, id })
    }
}
