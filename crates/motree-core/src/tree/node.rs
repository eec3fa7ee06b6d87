use std::collections::BTreeMap;

use super::NodeId;

/// Lifecycle state of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    /// Constructed; only naming attributes are set
    Unbound,
    /// Attributes written directly or through deserialization
    Populated,
    /// Unlinked from its parent; no longer addressable by Dn
    Detached,
}

/// One managed object in the tree
///
/// Attributes are kept in a sorted map, which is also the canonical order
/// used by both wire formats.
#[derive(Debug, Clone, PartialEq)]
pub struct MoNode {
    pub(crate) class_name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) attributes: BTreeMap<String, String>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) state: NodeState,
}

impl MoNode {
    pub(crate) fn new(class_name: String, parent: Option<NodeId>) -> Self {
        Self {
            class_name,
            parent,
            attributes: BTreeMap::new(),
            children: Vec::new(),
            state: NodeState::Unbound,
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// Value of one attribute; `None` when unset
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child ids in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none() && self.state != NodeState::Detached
    }

    /// Record an attribute write
    pub(crate) fn mark_populated(&mut self) {
        if self.state == NodeState::Unbound {
            self.state = NodeState::Populated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut node = MoNode::new("fvTenant".to_string(), None);
        assert_eq!(node.state(), NodeState::Unbound);

        node.mark_populated();
        assert_eq!(node.state(), NodeState::Populated);

        node.state = NodeState::Detached;
        node.mark_populated();
        assert_eq!(node.state(), NodeState::Detached);
        assert!(!node.is_root());
    }

    #[test]
    fn test_unset_attribute_is_none() {
        let node = MoNode::new("fvTenant".to_string(), None);
        assert_eq!(node.attribute("descr"), None);
    }
}
