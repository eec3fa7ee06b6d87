//! Rn/Dn codec
//!
//! Pure functions between Dn strings and chains of `(class, naming
//! attributes)`. Nothing here touches a tree; [`crate::ops::dn_ops`]
//! materializes resolved chains.

use std::collections::BTreeMap;

use crate::errors::{MoError, Result};
use crate::registry::{ClassMeta, Registry};

/// Separator between Rn segments of a Dn
pub const DN_DELIMITER: char = '/';

/// One Dn segment with its class resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub class_name: String,
    pub rn: String,
    pub naming: BTreeMap<String, String>,
}

/// Build the Rn of `meta` from an attribute lookup
///
/// # Errors
///
/// `Naming` if a naming attribute has no value.
pub fn format_rn<'v, F>(meta: &ClassMeta, value_of: F) -> Result<String>
where
    F: Fn(&str) -> Option<&'v str>,
{
    meta.rn_template().format(meta.name(), value_of)
}

/// Recover the naming attributes of `meta` from one Rn segment
///
/// # Errors
///
/// `RnMismatch` if the segment does not fit the class template.
pub fn match_rn(meta: &ClassMeta, rn: &str) -> Result<BTreeMap<String, String>> {
    meta.rn_template().match_rn(meta.name(), rn)
}

/// Join Rn segments into a Dn
pub fn join_dn<I, S>(rns: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut dn = String::new();
    for (i, rn) in rns.into_iter().enumerate() {
        if i > 0 {
            dn.push(DN_DELIMITER);
        }
        dn.push_str(rn.as_ref());
    }
    dn
}

/// Split a Dn into Rn segments
///
/// A delimiter inside `[...]` does not start a new segment, so bracketed
/// naming values that are themselves Dns stay in one piece.
///
/// # Errors
///
/// `UnresolvedSegment` for an empty Dn or an empty segment.
pub fn split_dn(dn: &str) -> Result<Vec<&str>> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in dn.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            DN_DELIMITER if depth == 0 => {
                segments.push(&dn[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    segments.push(&dn[start..]);

    // classes are unknown before resolution, so no parent class is named
    if segments.iter().any(|s| s.is_empty()) {
        return Err(MoError::UnresolvedSegment {
            dn: dn.to_string(),
            segment: String::new(),
            parent_class: String::new(),
        });
    }
    Ok(segments)
}

/// Resolve every segment of a Dn to a class and naming attributes
///
/// The first segment must be the root class's Rn. Each later segment is
/// tried against the legal children of the previous segment's class, in
/// declared order; the first template that matches wins.
///
/// # Errors
///
/// `UnresolvedSegment` if no candidate class matches a segment.
pub fn resolve_dn(registry: &Registry, dn: &str) -> Result<Vec<ResolvedSegment>> {
    let segments = split_dn(dn)?;
    let unresolved = |segment: &str, parent_class: &str| MoError::UnresolvedSegment {
        dn: dn.to_string(),
        segment: segment.to_string(),
        parent_class: parent_class.to_string(),
    };

    let root = registry.root_class();
    let root_naming =
        match_rn(root, segments[0]).map_err(|_| unresolved(segments[0], root.name()))?;

    let mut chain = vec![ResolvedSegment {
        class_name: root.name().to_string(),
        rn: segments[0].to_string(),
        naming: root_naming,
    }];
    let mut current = root;

    for &segment in &segments[1..] {
        let mut resolved = None;
        for candidate in current.legal_children() {
            let meta = registry.lookup_class(candidate)?;
            match match_rn(meta, segment) {
                Ok(naming) => {
                    resolved = Some((meta, naming));
                    break;
                }
                Err(MoError::RnMismatch { .. }) => {
                    tracing::trace!(segment = %segment, candidate = %candidate, "rn mismatch");
                }
                Err(other) => return Err(other),
            }
        }

        let (meta, naming) = resolved.ok_or_else(|| unresolved(segment, current.name()))?;
        tracing::debug!(segment = %segment, class_name = %meta.name(), "segment resolved");
        chain.push(ResolvedSegment {
            class_name: meta.name().to_string(),
            rn: segment.to_string(),
            naming,
        });
        current = meta;
    }

    Ok(chain)
}
