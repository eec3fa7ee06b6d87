use std::collections::BTreeMap;

use crate::errors::{MoError, Result};
use crate::naming::format_rn;
use crate::registry::ClassMeta;
use crate::tree::{Mit, MoNode, NodeId, NodeState};

/// Values supplied when constructing a child
///
/// Positional values bind to the class's naming attributes in declared
/// order; named values may set any permitted attribute, naming attributes
/// included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildArgs {
    positional: Vec<String>,
    named: Vec<(String, String)>,
}

impl ChildArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from positional values
    pub fn positional<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            positional: values.into_iter().map(Into::into).collect(),
            named: Vec::new(),
        }
    }

    /// Append one positional value
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Add a named value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.named.push((name.into(), value.into()));
        self
    }

    pub fn positional_values(&self) -> &[String] {
        &self.positional
    }

    pub fn named_values(&self) -> &[(String, String)] {
        &self.named
    }
}

impl From<()> for ChildArgs {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

impl From<&str> for ChildArgs {
    fn from(value: &str) -> Self {
        Self::new().arg(value)
    }
}

impl From<String> for ChildArgs {
    fn from(value: String) -> Self {
        Self::new().arg(value)
    }
}

impl<const N: usize> From<[&str; N]> for ChildArgs {
    fn from(values: [&str; N]) -> Self {
        Self::positional(values)
    }
}

/// Result of resolving a member name on a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member<'a> {
    /// A permitted attribute and its current value
    Attribute(Option<&'a str>),
    /// A legal child class, bound to the node
    Child(ChildCtor),
}

/// Constructor for one child class bound to a parent node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildCtor {
    parent: NodeId,
    class_name: String,
}

impl ChildCtor {
    pub fn parent(&self) -> NodeId {
        self.parent
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Construct the child (see [`create_child`])
    ///
    /// # Errors
    ///
    /// As [`create_child`].
    pub fn call(self, mit: &mut Mit, args: impl Into<ChildArgs>) -> Result<NodeId> {
        create_child(mit, self.parent, &self.class_name, args.into())
    }
}

/// Bind construction arguments to attribute values
///
/// # Errors
///
/// `Arity` for surplus positional values, `UnknownAttribute` for a named
/// value outside the permitted set, `Naming` for a naming attribute bound
/// twice or not at all, or bound to a value its Rn cannot carry.
pub fn bind_arguments(meta: &ClassMeta, args: &ChildArgs) -> Result<BTreeMap<String, String>> {
    let naming = meta.naming_attributes();
    if args.positional.len() > naming.len() {
        return Err(MoError::Arity {
            class_name: meta.name().to_string(),
            expected: naming.len(),
            got: args.positional.len(),
        });
    }

    let mut attributes: BTreeMap<String, String> = naming
        .iter()
        .cloned()
        .zip(args.positional.iter().cloned())
        .collect();

    for (name, value) in &args.named {
        meta.check_attribute(name)?;
        let bound_positionally = naming
            .iter()
            .position(|n| n == name)
            .is_some_and(|i| i < args.positional.len());
        if bound_positionally {
            return Err(MoError::naming(
                meta.name(),
                name,
                "bound both positionally and by name",
            ));
        }
        attributes.insert(name.clone(), value.clone());
    }

    if let Some(missing) = naming.iter().find(|n| !attributes.contains_key(*n)) {
        return Err(MoError::naming(
            meta.name(),
            missing,
            "naming attribute not supplied",
        ));
    }
    for (name, value) in attributes.iter().filter(|(n, _)| meta.is_naming(n)) {
        meta.rn_template().check_value(meta.name(), name, value)?;
    }

    Ok(attributes)
}

/// Rn of a node, recomputed from its naming attributes
///
/// # Errors
///
/// `UnknownClass` or `Naming` if the node no longer satisfies its class.
pub fn node_rn(mit: &Mit, node: &MoNode) -> Result<String> {
    let meta = mit.registry().lookup_class(node.class_name())?;
    format_rn(meta, |n| node.attribute(n))
}

/// Child of `parent` with the given class and Rn, if any
pub(crate) fn find_child(
    mit: &Mit,
    parent: NodeId,
    class_name: &str,
    rn: &str,
) -> Result<Option<NodeId>> {
    for &child in mit.node(parent)?.children() {
        let node = mit.node(child)?;
        if node.class_name() == class_name && node_rn(mit, node)? == rn {
            return Ok(Some(child));
        }
    }
    Ok(None)
}

/// Link a validated child under `parent`
///
/// A sibling with the same class and Rn is reused: its non-naming
/// attributes are updated from `attributes` and its id returned.
pub(crate) fn insert_child(
    mit: &mut Mit,
    parent: NodeId,
    meta: &ClassMeta,
    attributes: BTreeMap<String, String>,
) -> Result<NodeId> {
    let rn = format_rn(meta, |n| attributes.get(n).map(String::as_str))?;

    if let Some(existing) = find_child(mit, parent, meta.name(), &rn)? {
        let node = mit.node_mut(existing)?;
        let mut wrote = false;
        for (name, value) in attributes {
            if !meta.is_naming(&name) {
                node.attributes.insert(name, value);
                wrote = true;
            }
        }
        if wrote {
            node.mark_populated();
        }
        tracing::debug!(rn = %rn, node_id = %existing, "reusing existing child");
        return Ok(existing);
    }

    let populated = attributes.keys().any(|k| !meta.is_naming(k));
    let mut node = MoNode::new(meta.name().to_string(), None);
    node.attributes = attributes;
    if populated {
        node.state = NodeState::Populated;
    }
    let id = mit.append_child(parent, node)?;
    tracing::debug!(rn = %rn, node_id = %id, "child created");
    Ok(id)
}

/// Construct a child of `parent` and append it to the parent's children
///
/// # Errors
///
/// - `UnknownMember` if `class_name` is not a legal child of the parent
/// - `UnknownClass` if the class is not in the registry
/// - `Arity`, `Naming`, `UnknownAttribute` from argument binding
///
/// Nothing is attached when an error is returned.
pub fn create_child(
    mit: &mut Mit,
    parent: NodeId,
    class_name: &str,
    args: ChildArgs,
) -> Result<NodeId> {
    let registry = mit.registry_arc();
    let parent_meta = registry.lookup_class(mit.node(parent)?.class_name())?;
    if !parent_meta.has_child(class_name) {
        return Err(MoError::UnknownMember {
            class_name: parent_meta.name().to_string(),
            member: class_name.to_string(),
        });
    }
    let meta = registry.lookup_class(class_name)?;
    let attributes = bind_arguments(meta, &args)?;
    insert_child(mit, parent, meta, attributes)
}

/// Read one attribute; `None` when unset
///
/// # Errors
///
/// `UnknownAttribute` if the class does not permit `name`.
pub fn get_attribute<'a>(mit: &'a Mit, id: NodeId, name: &str) -> Result<Option<&'a str>> {
    let node = mit.node(id)?;
    mit.registry()
        .lookup_class(node.class_name())?
        .check_attribute(name)?;
    Ok(node.attribute(name))
}

/// Write one attribute
///
/// # Errors
///
/// `UnknownAttribute` if the class does not permit `name`; `Naming` when
/// changing a naming attribute, which would silently re-address the node.
pub fn set_attribute(mit: &mut Mit, id: NodeId, name: &str, value: &str) -> Result<()> {
    let registry = mit.registry_arc();
    let node = mit.node(id)?;
    let meta = registry.lookup_class(node.class_name())?;
    meta.check_attribute(name)?;
    if meta.is_naming(name) && node.attribute(name) != Some(value) {
        return Err(MoError::naming(
            meta.name(),
            name,
            "naming attributes are fixed after construction",
        ));
    }

    let node = mit.node_mut(id)?;
    node.attributes.insert(name.to_string(), value.to_string());
    node.mark_populated();
    Ok(())
}

/// Resolve `name` as an attribute first, then as a legal child class
///
/// # Errors
///
/// `UnknownMember` if it is neither.
pub fn member<'a>(mit: &'a Mit, id: NodeId, name: &str) -> Result<Member<'a>> {
    let node = mit.node(id)?;
    let meta = mit.registry().lookup_class(node.class_name())?;
    if meta.permits(name) {
        return Ok(Member::Attribute(node.attribute(name)));
    }
    if meta.has_child(name) {
        return Ok(Member::Child(ChildCtor {
            parent: id,
            class_name: name.to_string(),
        }));
    }
    Err(MoError::UnknownMember {
        class_name: meta.name().to_string(),
        member: name.to_string(),
    })
}

/// Walk `levels` ancestors up from `id`
///
/// # Errors
///
/// `Navigation` when `levels` is zero or the walk passes the root (or the
/// top of a detached subtree).
pub fn up(mit: &Mit, id: NodeId, levels: usize) -> Result<NodeId> {
    let start = mit.node(id)?;
    if levels == 0 {
        return Err(MoError::Navigation {
            class_name: start.class_name().to_string(),
            reason: "ancestor walk needs at least one level".to_string(),
        });
    }

    let mut current = id;
    for walked in 0..levels {
        let node = mit.node(current)?;
        current = node.parent().ok_or_else(|| MoError::Navigation {
            class_name: node.class_name().to_string(),
            reason: format!(
                "cannot walk {} levels up, {} has no parent after {}",
                levels,
                node.class_name(),
                walked
            ),
        })?;
    }
    Ok(current)
}

/// Unlink a subtree from its parent
///
/// The subtree stays in the arena in state `Detached`: it can still be
/// read and encoded, but has no Dn. Detaching a detached node is a no-op.
///
/// # Errors
///
/// `Navigation` for the root.
pub fn detach(mit: &mut Mit, id: NodeId) -> Result<()> {
    let node = mit.node(id)?;
    if node.state() == NodeState::Detached {
        return Ok(());
    }
    if id == mit.root() {
        return Err(MoError::Navigation {
            class_name: node.class_name().to_string(),
            reason: "the root cannot be detached".to_string(),
        });
    }
    mit.unlink(id)?;
    mit.node_mut(id)?.state = NodeState::Detached;
    Ok(())
}

/// Release a subtree; its ids become invalid
///
/// # Errors
///
/// `Navigation` for the root.
pub fn remove(mit: &mut Mit, id: NodeId) -> Result<()> {
    let node = mit.node(id)?;
    if id == mit.root() {
        return Err(MoError::Navigation {
            class_name: node.class_name().to_string(),
            reason: "the root cannot be removed".to_string(),
        });
    }
    mit.unlink(id)?;
    mit.free_subtree(id);
    Ok(())
}
