//! Rn/Dn computation and Dn resolution
//!
//! Rn and Dn are never cached: they are derived from naming attributes and
//! the parent chain on every call, so they always agree with the tree.

use crate::errors::{MoError, Result};
use crate::naming::{join_dn, resolve_dn};
use crate::ops::mo_ops::{insert_child, node_rn};
use crate::tree::{Mit, NodeId};
use crate::{log_op_end, log_op_error, log_op_start};

/// Rn of one node
///
/// # Errors
///
/// `NodeNotFound` for a stale id; `Naming` if a naming attribute is unset.
pub fn rn(mit: &Mit, id: NodeId) -> Result<String> {
    node_rn(mit, mit.node(id)?)
}

/// Node ids from the root down to `id`
///
/// # Errors
///
/// `Navigation` if `id` sits in a detached subtree.
pub fn path_from_root(mit: &Mit, id: NodeId) -> Result<Vec<NodeId>> {
    let mut path = vec![id];
    let mut current = mit.node(id)?;
    while let Some(parent) = current.parent() {
        path.push(parent);
        current = mit.node(parent)?;
    }

    if path.last() != Some(&mit.root()) {
        return Err(MoError::Navigation {
            class_name: mit.node(id)?.class_name().to_string(),
            reason: "node is not attached to the tree and has no Dn".to_string(),
        });
    }
    path.reverse();
    Ok(path)
}

/// Dn of one node: the Rns from the root down, joined with `/`
///
/// # Errors
///
/// As [`rn`] and [`path_from_root`].
pub fn dn(mit: &Mit, id: NodeId) -> Result<String> {
    let rns = path_from_root(mit, id)?
        .into_iter()
        .map(|node| rn(mit, node))
        .collect::<Result<Vec<_>>>()?;
    Ok(join_dn(rns))
}

/// Resolve a Dn and materialize every node along it
///
/// Segments that already exist are reused; missing ones are created in
/// state `Unbound` with the naming attributes recovered from the Rn. The
/// whole chain is resolved before anything is attached, so an unresolvable
/// Dn leaves the tree unchanged.
///
/// # Errors
///
/// `UnresolvedSegment` if a segment matches no legal child class.
pub fn from_dn(mit: &mut Mit, dn: &str) -> Result<NodeId> {
    log_op_start!("from_dn", dn = dn);
    let start = std::time::Instant::now();

    let result = from_dn_impl(mit, dn).map_err(|e| {
        log_op_error!(
            "from_dn",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "from_dn",
        duration_ms = start.elapsed().as_millis() as u64,
        node_id = %result
    );

    Ok(result)
}

fn from_dn_impl(mit: &mut Mit, dn: &str) -> Result<NodeId> {
    let registry = mit.registry_arc();
    let chain = resolve_dn(&registry, dn)?;
    tracing::debug!(segment_count = chain.len(), "dn resolved");

    let mut current = mit.root();
    for segment in chain.into_iter().skip(1) {
        let meta = registry.lookup_class(&segment.class_name)?;
        current = insert_child(mit, current, meta, segment.naming)?;
    }
    Ok(current)
}
