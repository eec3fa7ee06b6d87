//! The Managed Information Tree
//!
//! `Mit` owns every node in an arena; nodes refer to their children and
//! parent by [`NodeId`]. Parents own their children: releasing a node
//! releases its whole subtree. The parent link is a plain back reference
//! used for Dn computation and ancestor walks.

pub mod node;

use std::fmt;
use std::sync::Arc;

use crate::errors::{MoError, Result};
use crate::registry::Registry;
pub use node::{MoNode, NodeState};

/// Handle of a node inside one [`Mit`]
///
/// Ids are never reused, so a handle to a removed node stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// In-memory tree rooted at the registry's root class
///
/// Not thread-safe by itself: a tree is built and consumed within one
/// logical request. The registry is shared read-only.
#[derive(Debug, Clone)]
pub struct Mit {
    registry: Arc<Registry>,
    nodes: Vec<Option<MoNode>>,
    root: NodeId,
}

impl Mit {
    /// Create a tree holding only the root node
    pub fn new(registry: Arc<Registry>) -> Self {
        let root = MoNode::new(registry.root_class().name().to_string(), None);
        Self {
            registry,
            nodes: vec![Some(root)],
            root: NodeId(0),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Shared handle to the registry, for building sibling trees
    pub fn registry_arc(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by id
    ///
    /// # Errors
    ///
    /// `NodeNotFound` if the id was released or never issued by this tree.
    pub fn node(&self, id: NodeId) -> Result<&MoNode> {
        self.nodes
            .get(id.0)
            .and_then(Option::as_ref)
            .ok_or(MoError::NodeNotFound { node_id: id })
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut MoNode> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(MoError::NodeNotFound { node_id: id })
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_ok()
    }

    /// Number of live nodes, detached subtrees included
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a node and link it as the last child of `parent`
    pub(crate) fn append_child(&mut self, parent: NodeId, mut node: MoNode) -> Result<NodeId> {
        self.node(parent)?;
        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        self.nodes.push(Some(node));
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Unlink `id` from its parent's child list
    pub(crate) fn unlink(&mut self, id: NodeId) -> Result<()> {
        let parent = self.node(id)?.parent;
        if let Some(parent) = parent {
            self.node_mut(parent)?.children.retain(|c| *c != id);
        }
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Drop `id` and every descendant from the arena
    ///
    /// Callers unlink first; this only frees slots.
    pub(crate) fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(current.0).and_then(Option::take) {
                stack.extend(node.children);
            }
        }
    }

    /// Ids of `id` and all its descendants, depth-first pre-order
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let node = self.node(current)?;
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ClassMeta;

    fn registry() -> Arc<Registry> {
        Arc::new(
            Registry::builder("polUni")
                .class(
                    ClassMeta::new("polUni", "uni")
                        .unwrap()
                        .with_children(["fvTenant"]),
                )
                .class(ClassMeta::new("fvTenant", "tn-{name}").unwrap())
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_new_tree_has_root_only() {
        let mit = Mit::new(registry());
        assert_eq!(mit.len(), 1);
        let root = mit.node(mit.root()).unwrap();
        assert_eq!(root.class_name(), "polUni");
        assert!(root.parent().is_none());
        assert_eq!(root.state(), NodeState::Unbound);
    }

    #[test]
    fn test_free_subtree_invalidates_ids() {
        let mut mit = Mit::new(registry());
        let root = mit.root();
        let a = mit
            .append_child(root, MoNode::new("fvTenant".into(), None))
            .unwrap();
        let b = mit
            .append_child(a, MoNode::new("fvTenant".into(), None))
            .unwrap();
        assert_eq!(mit.descendants(root).unwrap(), vec![root, a, b]);

        mit.unlink(a).unwrap();
        mit.free_subtree(a);
        assert!(!mit.contains(a));
        assert!(!mit.contains(b));
        assert!(mit.node(root).unwrap().children().is_empty());
        assert!(matches!(
            mit.node(b),
            Err(MoError::NodeNotFound { node_id }) if node_id == b
        ));
    }
}
