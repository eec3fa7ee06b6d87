//! Bridges between the tree and the wire formats
//!
//! Encoding snapshots a subtree into an owned [`Mo`] and hands it to a
//! codec. Decoding goes the other way: the payload is validated against
//! the registry in full, and only then written into the tree.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::{MoError, Result};
use crate::naming::resolve_dn;
use crate::ops::dn_ops::from_dn;
use crate::ops::mo_ops::insert_child;
use crate::registry::{ClassMeta, Registry};
use crate::tree::{Mit, NodeId};
use crate::wire::{Mo, WireFormat};
use crate::{log_op_end, log_op_error, log_op_start};

/// How a payload treats the children already under the target node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildMerge {
    /// Existing children are released and rebuilt from the payload
    Replace,
    /// Payload children are added; siblings with the same Rn are reused
    Merge,
}

/// Owned snapshot of a subtree
///
/// # Errors
///
/// `NodeNotFound` for a stale id.
pub fn to_mo(mit: &Mit, id: NodeId) -> Result<Mo> {
    let node = mit.node(id)?;
    let children = node
        .children()
        .iter()
        .map(|&child| to_mo(mit, child))
        .collect::<Result<Vec<_>>>()?;
    Ok(Mo {
        class_name: node.class_name().to_string(),
        attributes: node.attributes().clone(),
        children,
    })
}

/// Encode a subtree in the given format
///
/// # Errors
///
/// `NodeNotFound` for a stale id, `Encode` if the codec fails.
pub fn encode(mit: &Mit, id: NodeId, format: WireFormat) -> Result<String> {
    format.encode(&to_mo(mit, id)?)
}

/// Format A rendering of a subtree
///
/// # Errors
///
/// As [`encode`].
pub fn to_json(mit: &Mit, id: NodeId) -> Result<String> {
    encode(mit, id, WireFormat::Json)
}

/// Format B rendering of a subtree
///
/// # Errors
///
/// As [`encode`].
pub fn to_xml(mit: &Mit, id: NodeId) -> Result<String> {
    encode(mit, id, WireFormat::Xml)
}

fn check_legal_child(registry: &Registry, parent_class: &str, mo: &Mo) -> Result<()> {
    let parent_meta = registry.lookup_class(parent_class)?;
    if !parent_meta.has_child(&mo.class_name) {
        return Err(MoError::UnknownMember {
            class_name: parent_meta.name().to_string(),
            member: mo.class_name.clone(),
        });
    }
    let meta = registry.lookup_class(&mo.class_name)?;
    if let Some(missing) = meta
        .naming_attributes()
        .iter()
        .find(|n| mo.attribute(n).is_none())
    {
        return Err(MoError::naming(
            meta.name(),
            missing,
            "naming attribute missing from payload",
        ));
    }
    Ok(())
}

/// Naming values carried by the payload must match the node's
fn check_naming_unchanged(
    meta: &ClassMeta,
    current: &BTreeMap<String, String>,
    mo: &Mo,
) -> Result<()> {
    for name in meta.naming_attributes() {
        if let Some(value) = mo.attribute(name) {
            if current.get(name).map(String::as_str) != Some(value) {
                return Err(MoError::naming(
                    meta.name(),
                    name,
                    format!("payload value '{}' would rename the node", value),
                ));
            }
        }
    }
    Ok(())
}

/// Write a validated subtree under `parent`
fn build_subtree(mit: &mut Mit, registry: &Registry, parent: NodeId, mo: &Mo) -> Result<NodeId> {
    let meta = registry.lookup_class(&mo.class_name)?;
    let id = insert_child(mit, parent, meta, mo.attributes.clone())?;
    mit.node_mut(id)?.mark_populated();
    for child in &mo.children {
        build_subtree(mit, registry, id, child)?;
    }
    Ok(id)
}

/// Attach a decoded subtree under `parent`
///
/// An existing child with the same class and Rn is merged into rather
/// than duplicated.
///
/// # Errors
///
/// `UnknownMember` if the class is not a legal child of the parent, plus
/// anything [`Mo::validate`] reports. Nothing is attached on error.
pub fn graft(mit: &mut Mit, parent: NodeId, mo: &Mo) -> Result<NodeId> {
    let registry = mit.registry_arc();
    check_legal_child(&registry, mit.node(parent)?.class_name(), mo)?;
    mo.validate(&registry)?;
    build_subtree(mit, &registry, parent, mo)
}

fn populate_node(mit: &mut Mit, id: NodeId, mo: &Mo, children: ChildMerge) -> Result<()> {
    let registry = mit.registry_arc();
    let node = mit.node(id)?;
    if node.class_name() != mo.class_name {
        return Err(MoError::ClassNameMismatch {
            expected: node.class_name().to_string(),
            found: mo.class_name.clone(),
        });
    }
    let meta = registry.lookup_class(node.class_name())?;
    mo.validate(&registry)?;
    check_naming_unchanged(meta, node.attributes(), mo)?;

    let mut attributes: BTreeMap<String, String> = meta
        .naming_attributes()
        .iter()
        .filter_map(|n| node.attribute(n).map(|v| (n.clone(), v.to_string())))
        .collect();
    attributes.extend(mo.attributes.clone());

    let released = match children {
        ChildMerge::Replace => node.children().to_vec(),
        ChildMerge::Merge => Vec::new(),
    };

    let node = mit.node_mut(id)?;
    node.attributes = attributes;
    node.mark_populated();
    if children == ChildMerge::Replace {
        node.children.clear();
    }
    for child in released {
        mit.free_subtree(child);
    }
    for child in &mo.children {
        build_subtree(mit, &registry, id, child)?;
    }

    tracing::debug!(node_id = %id, child_count = mo.children.len(), "node populated");
    Ok(())
}

/// Merge a decoded payload into an existing node
///
/// Attributes are replaced by the payload's (naming attributes retained)
/// and the node's children are replaced by the payload's children.
///
/// # Errors
///
/// - `ClassNameMismatch` if the payload's class differs from the node's
/// - `Naming` if the payload carries a different naming value
/// - anything [`Mo::validate`] reports
///
/// The node is unchanged when an error is returned.
pub fn populate(mit: &mut Mit, id: NodeId, mo: &Mo) -> Result<()> {
    log_op_start!("populate", class_name = %mo.class_name, node_id = %id);
    let start = std::time::Instant::now();

    populate_node(mit, id, mo, ChildMerge::Replace).map_err(|e| {
        log_op_error!(
            "populate",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "populate",
        duration_ms = start.elapsed().as_millis() as u64,
        object_count = mo.count()
    );

    Ok(())
}

/// Decode `text` and [`populate`] the node with it
///
/// # Errors
///
/// `Decode` for malformed input, otherwise as [`populate`].
pub fn set_serialized(mit: &mut Mit, id: NodeId, format: WireFormat, text: &str) -> Result<()> {
    let mo = format.decode(text)?;
    populate(mit, id, &mo)
}

/// Format A setter
///
/// # Errors
///
/// As [`set_serialized`].
pub fn set_json(mit: &mut Mit, id: NodeId, text: &str) -> Result<()> {
    set_serialized(mit, id, WireFormat::Json, text)
}

/// Format B setter
///
/// # Errors
///
/// As [`set_serialized`].
pub fn set_xml(mit: &mut Mit, id: NodeId, text: &str) -> Result<()> {
    set_serialized(mit, id, WireFormat::Xml, text)
}

/// Decode a query response and merge every object into the tree
///
/// Each object is placed at the Dn in its `dn` attribute; the nodes along
/// that Dn are materialized as needed. Children already present under a
/// target are kept, so objects may arrive in any order. Returns the ids
/// of the top-level objects in response order.
///
/// # Errors
///
/// `Decode` for a malformed envelope or an object without `dn`;
/// `UnresolvedSegment`, `ClassNameMismatch`, `Naming` or validation errors
/// for an object that does not fit its Dn. Every object is checked before
/// the first one is written, so a failed call leaves the tree unchanged.
pub fn decode_response(mit: &mut Mit, format: WireFormat, body: &str) -> Result<Vec<NodeId>> {
    log_op_start!("decode_response", format = %format);
    let start = std::time::Instant::now();

    let result = decode_response_impl(mit, format, body).map_err(|e| {
        log_op_error!(
            "decode_response",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "decode_response",
        duration_ms = start.elapsed().as_millis() as u64,
        object_count = result.len()
    );

    Ok(result)
}

fn decode_response_impl(mit: &mut Mit, format: WireFormat, body: &str) -> Result<Vec<NodeId>> {
    let registry = mit.registry_arc();
    let objects = format.decode_envelope(body)?;

    let mut placed = Vec::with_capacity(objects.len());
    for mo in &objects {
        let dn = mo.attribute("dn").ok_or_else(|| {
            MoError::decode(
                format.extension(),
                format!("{} object carries no dn attribute", mo.class_name),
            )
        })?;
        check_response_object(&registry, dn, mo)?;
        placed.push((dn, mo));
    }

    let mut ids = Vec::with_capacity(placed.len());
    for (dn, mo) in placed {
        let id = from_dn(mit, dn)?;
        populate_node(mit, id, mo, ChildMerge::Merge)?;
        ids.push(id);
    }
    Ok(ids)
}

fn check_response_object(registry: &Arc<Registry>, dn: &str, mo: &Mo) -> Result<()> {
    let chain = resolve_dn(registry, dn)?;
    let target = chain.last().ok_or_else(|| MoError::UnresolvedSegment {
        dn: dn.to_string(),
        segment: String::new(),
        parent_class: registry.root_class().name().to_string(),
    })?;
    if target.class_name != mo.class_name {
        return Err(MoError::ClassNameMismatch {
            expected: target.class_name.clone(),
            found: mo.class_name.clone(),
        });
    }
    let meta = registry.lookup_class(&target.class_name)?;
    mo.validate(registry)?;
    check_naming_unchanged(meta, &target.naming, mo)
}

impl Mit {
    /// Build a tree from a decoded root object
    ///
    /// # Errors
    ///
    /// `ClassNameMismatch` unless the object's class is the registry root,
    /// plus anything [`Mo::validate`] reports.
    pub fn from_mo(registry: Arc<Registry>, mo: &Mo) -> Result<Mit> {
        let mut mit = Mit::new(registry);
        let root = mit.root();
        populate(&mut mit, root, mo)?;
        Ok(mit)
    }

    /// Build a tree from a Format A document
    ///
    /// # Errors
    ///
    /// `Decode` for malformed input, otherwise as [`Mit::from_mo`].
    pub fn from_json(registry: Arc<Registry>, text: &str) -> Result<Mit> {
        Mit::from_mo(registry, &WireFormat::Json.decode(text)?)
    }

    /// Build a tree from a Format B document
    ///
    /// # Errors
    ///
    /// `Decode` for malformed input, otherwise as [`Mit::from_mo`].
    pub fn from_xml(registry: Arc<Registry>, text: &str) -> Result<Mit> {
        Mit::from_mo(registry, &WireFormat::Xml.decode(text)?)
    }
}
