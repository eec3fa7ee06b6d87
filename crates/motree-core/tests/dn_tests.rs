#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::new_mit;
use motree_core::naming::{join_dn, resolve_dn, split_dn};
use motree_core::ops::dn_ops;
use motree_core::{MoError, NodeState};

#[test]
fn test_uni_from_dn() {
    let mut mit = new_mit();
    let root = mit.root();
    let uni = mit.from_dn("uni").unwrap();
    assert_eq!(uni.id(), root);
    assert_eq!(uni.class_name().unwrap(), "polUni");
}

#[test]
fn test_tenant_from_dn() {
    let mut mit = new_mit();
    let tenant = mit.from_dn("uni/tn-test").unwrap();
    assert_eq!(tenant.class_name().unwrap(), "fvTenant");
    assert_eq!(tenant.get("name").unwrap(), Some("test"));
    assert_eq!(tenant.dn().unwrap(), "uni/tn-test");
    assert_eq!(tenant.node().unwrap().state(), NodeState::Unbound);
}

#[test]
fn test_epp_from_dn_with_bracketed_dn_value() {
    let mut mit = new_mit();
    let dn = "uni/epp/fv-[uni/tn-infra/ap-access/epg-default]";
    let epp = mit.from_dn(dn).unwrap();
    assert_eq!(epp.class_name().unwrap(), "fvEpP");
    assert_eq!(
        epp.get("epgPKey").unwrap(),
        Some("uni/tn-infra/ap-access/epg-default")
    );
    assert_eq!(epp.rn().unwrap(), "fv-[uni/tn-infra/ap-access/epg-default]");
    assert_eq!(epp.dn().unwrap(), dn);
}

#[test]
fn test_nested_brackets_survive_split() {
    let segments = split_dn("uni/tn-a/BD-b/subnet-[10.0.0.1/24]").unwrap();
    assert_eq!(segments, vec!["uni", "tn-a", "BD-b", "subnet-[10.0.0.1/24]"]);
    assert_eq!(join_dn(&segments), "uni/tn-a/BD-b/subnet-[10.0.0.1/24]");
}

#[test]
fn test_dn_round_trip_through_resolution() {
    let mut mit = new_mit();
    for dn in [
        "uni",
        "uni/tn-common",
        "uni/tn-common/ctx-default",
        "uni/tn-common/BD-default/rsctx",
        "uni/tn-common/BD-default/subnet-[10.0.0.1/24]",
        "uni/tn-infra/ap-access/epg-default",
        "uni/infra/nprof-leaf101/leaves-sel-1-typ-range",
        "uni/epp/fv-[uni/tn-infra/ap-access/epg-default]",
    ] {
        let id = dn_ops::from_dn(&mut mit, dn).unwrap();
        assert_eq!(dn_ops::dn(&mit, id).unwrap(), dn);
    }
}

#[test]
fn test_resolve_reports_every_segment() {
    let registry = common::registry();
    let chain = resolve_dn(&registry, "uni/infra/nprof-leaf101/leaves-sel-1-typ-range").unwrap();
    let classes: Vec<_> = chain.iter().map(|s| s.class_name.as_str()).collect();
    assert_eq!(classes, vec!["polUni", "infraInfra", "infraNodeP", "infraLeafS"]);
    let leaves = &chain[3].naming;
    assert_eq!(leaves.get("name").map(String::as_str), Some("sel-1"));
    assert_eq!(leaves.get("type").map(String::as_str), Some("range"));
}

#[test]
fn test_unresolved_segment_names_dn_and_segment() {
    let mut mit = new_mit();
    let err = dn_ops::from_dn(&mut mit, "uni/tn-common/zz-nope").unwrap_err();
    match err {
        MoError::UnresolvedSegment {
            dn,
            segment,
            parent_class,
        } => {
            assert_eq!(dn, "uni/tn-common/zz-nope");
            assert_eq!(segment, "zz-nope");
            assert_eq!(parent_class, "fvTenant");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert_eq!(mit.len(), 1, "failed resolution must not create nodes");
}

#[test]
fn test_malformed_dns_rejected() {
    let mut mit = new_mit();
    for dn in ["", "tn-common", "uni//tn-a", "uni/tn-a/"] {
        assert!(
            matches!(
                dn_ops::from_dn(&mut mit, dn),
                Err(MoError::UnresolvedSegment { .. })
            ),
            "expected {:?} to be rejected",
            dn
        );
    }
    assert_eq!(mit.len(), 1);
}

#[test]
fn test_from_dn_is_idempotent() {
    let mut mit = new_mit();
    let first = dn_ops::from_dn(&mut mit, "uni/tn-a/BD-b").unwrap();
    let size = mit.len();
    let second = dn_ops::from_dn(&mut mit, "uni/tn-a/BD-b").unwrap();
    assert_eq!(first, second);
    assert_eq!(mit.len(), size);
}
