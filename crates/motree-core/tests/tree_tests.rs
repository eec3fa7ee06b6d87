#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::new_mit;
use motree_core::ops::{dn_ops, mo_ops};
use motree_core::{ChildArgs, Member, MoError, NodeState};

#[test]
fn test_pol_uni() {
    let mut mit = new_mit();
    let uni = mit.uni();
    assert_eq!(uni.class_name().unwrap(), "polUni");
    assert_eq!(uni.rn().unwrap(), "uni");
    assert_eq!(uni.dn().unwrap(), "uni");
}

#[test]
fn test_fv_tenant() {
    let mut mit = new_mit();
    let tenant = mit.uni().child("fvTenant", "test").unwrap();
    assert_eq!(tenant.get("name").unwrap(), Some("test"));
    assert_eq!(tenant.rn().unwrap(), "tn-test");
    assert_eq!(tenant.dn().unwrap(), "uni/tn-test");
}

#[test]
fn test_fv_tenant_optional_args() {
    let mut mit = new_mit();
    let tenant = mit
        .uni()
        .child("fvTenant", ChildArgs::from("test").with("status", "created"))
        .unwrap();
    assert_eq!(tenant.get("status").unwrap(), Some("created"));
    assert_eq!(tenant.node().unwrap().state(), NodeState::Populated);
}

#[test]
fn test_positional_and_named_construction_agree() {
    let mut by_position = new_mit();
    let a = by_position.uni().child("fvTenant", "test").unwrap().to_xml().unwrap();

    let mut by_name = new_mit();
    let b = by_name
        .uni()
        .child("fvTenant", ChildArgs::new().with("name", "test"))
        .unwrap()
        .to_xml()
        .unwrap();

    assert_eq!(a, b);
}

#[test]
fn test_multi_attribute_naming_binds_in_declared_order() {
    let mut mit = new_mit();
    let leaves = mit
        .uni()
        .child("infraInfra", ())
        .unwrap()
        .child("infraNodeP", "leaf101")
        .unwrap()
        .child("infraLeafS", ["sel-1", "range"])
        .unwrap();
    assert_eq!(leaves.rn().unwrap(), "leaves-sel-1-typ-range");
    assert_eq!(leaves.get("type").unwrap(), Some("range"));
}

#[test]
fn test_construction_errors_leave_parent_unchanged() {
    let mut mit = new_mit();
    let root = mit.root();

    let arity = mo_ops::create_child(&mut mit, root, "fvTenant", ["a", "b"].into());
    assert!(matches!(
        arity,
        Err(MoError::Arity {
            expected: 1,
            got: 2,
            ..
        })
    ));

    let missing = mo_ops::create_child(&mut mit, root, "fvTenant", ().into());
    assert!(matches!(missing, Err(MoError::Naming { .. })));

    let illegal = mo_ops::create_child(&mut mit, root, "fvBD", "bd".into());
    assert!(matches!(illegal, Err(MoError::UnknownMember { .. })));

    let unknown = mo_ops::create_child(
        &mut mit,
        root,
        "fvTenant",
        ChildArgs::from("a").with("colour", "blue"),
    );
    assert!(matches!(unknown, Err(MoError::UnknownAttribute { .. })));

    assert_eq!(mit.len(), 1);
    assert!(mit.node(root).unwrap().children().is_empty());
}

#[test]
fn test_unset_attribute_reads_as_none() {
    let mut mit = new_mit();
    let tenant = mit.uni().child("fvTenant", "mgmt").unwrap();
    assert_eq!(tenant.get("descr").unwrap(), None);
    assert!(matches!(
        tenant.get("colour"),
        Err(MoError::UnknownAttribute { .. })
    ));
}

#[test]
fn test_property_setter() {
    let mut mit = new_mit();
    let tenant = mit
        .uni()
        .child("fvTenant", "mgmt")
        .unwrap()
        .set("descr", "Sample description")
        .unwrap();
    assert_eq!(tenant.get("descr").unwrap(), Some("Sample description"));
    assert_eq!(
        tenant.to_xml().unwrap(),
        r#"<fvTenant descr="Sample description" name="mgmt"/>"#
    );
}

#[test]
fn test_naming_attribute_is_frozen() {
    let mut mit = new_mit();
    let tenant = mit.uni().child("fvTenant", "mgmt").unwrap();
    let id = tenant.id();
    let err = tenant.set("name", "other").unwrap_err();
    assert!(matches!(err, MoError::Naming { .. }));
    assert_eq!(dn_ops::dn(&mit, id).unwrap(), "uni/tn-mgmt");
}

#[test]
fn test_member_resolution() {
    let mut mit = new_mit();
    let tenant = mit.uni().child("fvTenant", "mgmt").unwrap().id();

    assert_eq!(
        mo_ops::member(&mit, tenant, "name").unwrap(),
        Member::Attribute(Some("mgmt"))
    );
    let ctor = match mo_ops::member(&mit, tenant, "fvBD").unwrap() {
        Member::Child(ctor) => ctor,
        other => panic!("expected a child constructor, got {:?}", other),
    };
    let bd = ctor.call(&mut mit, "default").unwrap();
    assert_eq!(dn_ops::dn(&mit, bd).unwrap(), "uni/tn-mgmt/BD-default");

    assert!(matches!(
        mo_ops::member(&mit, tenant, "fvEpP"),
        Err(MoError::UnknownMember { .. })
    ));
}

#[test]
fn test_navigation() {
    let mut mit = new_mit();
    let rs = mit
        .uni()
        .child("fvTenant", "t")
        .unwrap()
        .child("fvBD", "b")
        .unwrap()
        .child("fvRsCtx", ())
        .unwrap()
        .id();

    assert_eq!(dn_ops::dn(&mit, mo_ops::up(&mit, rs, 3).unwrap()).unwrap(), "uni");
    assert!(matches!(
        mo_ops::up(&mit, rs, 4),
        Err(MoError::Navigation { .. })
    ));
    assert!(matches!(
        mo_ops::up(&mit, rs, 0),
        Err(MoError::Navigation { .. })
    ));
}

#[test]
fn test_up_composes() {
    let mut mit = new_mit();
    let rs = mit
        .uni()
        .child("fvTenant", "t")
        .unwrap()
        .child("fvBD", "b")
        .unwrap()
        .child("fvRsCtx", ())
        .unwrap()
        .id();

    let parent = mo_ops::up(&mit, rs, 1).unwrap();
    for k in 2..=3 {
        assert_eq!(
            mo_ops::up(&mit, rs, k).unwrap(),
            mo_ops::up(&mit, parent, k - 1).unwrap()
        );
    }
    let bd = mo_ops::up(&mit, rs, 1).unwrap();
    let tenant = mo_ops::up(&mit, bd, 1).unwrap();
    assert_eq!(mo_ops::up(&mit, rs, 2).unwrap(), tenant);
    assert_eq!(dn_ops::dn(&mit, tenant).unwrap(), "uni/tn-t");
}

#[test]
fn test_naming_values_must_survive_dn_parsing() {
    let mut mit = new_mit();
    let root = mit.root();

    for name in ["", "a/b", "x]y", "x[y"] {
        let err = mo_ops::create_child(&mut mit, root, "fvTenant", name.into()).unwrap_err();
        assert!(
            matches!(&err, MoError::Naming { attribute, .. } if attribute == "name"),
            "{name:?} gave {err:?}"
        );
    }
    let err = mit
        .uni()
        .child("infraInfra", ())
        .unwrap()
        .child("infraNodeP", "leaf101")
        .unwrap()
        .child("infraLeafS", ["a-typ-b", "range"])
        .unwrap_err();
    assert!(matches!(err, MoError::Naming { .. }));
    assert_eq!(mit.len(), 3);

    // bracketed values may carry a Dn
    let epp = mit
        .uni()
        .child("fvEpPCont", ())
        .unwrap()
        .child("fvEpP", "uni/tn-a/ap-b/epg-c")
        .unwrap();
    let dn = epp.dn().unwrap();
    assert_eq!(dn, "uni/epp/fv-[uni/tn-a/ap-b/epg-c]");
    let id = epp.id();
    assert_eq!(mit.from_dn(&dn).unwrap().id(), id);

    let err = mit
        .uni()
        .child("fvEpPCont", ())
        .unwrap()
        .child("fvEpP", "uni/tn-a]")
        .unwrap_err();
    assert!(matches!(err, MoError::Naming { .. }));
}

#[test]
fn test_mo_with_no_naming_properties() {
    let mut mit = new_mit();
    mit.uni()
        .child("fvTenant", "test")
        .unwrap()
        .child("fvBD", "lab")
        .unwrap()
        .child("fvRsCtx", ())
        .unwrap()
        .set("tnFvCtxName", "infra")
        .unwrap();

    let rs = mit.from_dn("uni/tn-test/BD-lab/rsctx").unwrap();
    assert_eq!(rs.get("tnFvCtxName").unwrap(), Some("infra"));
}

#[test]
fn test_detach_keeps_subtree_readable() {
    let mut mit = new_mit();
    let tenant = mit.uni().child("fvTenant", "t").unwrap().id();
    let bd = mit.mo(tenant).unwrap().child("fvBD", "b").unwrap().id();

    let detached = mit.mo(tenant).unwrap().detach().unwrap();
    assert_eq!(detached, tenant);
    assert_eq!(mit.node(tenant).unwrap().state(), NodeState::Detached);
    assert!(matches!(
        dn_ops::dn(&mit, bd),
        Err(MoError::Navigation { .. })
    ));
    assert_eq!(
        mit.mo(tenant).unwrap().to_xml().unwrap(),
        "<fvTenant name=\"t\">\n  <fvBD name=\"b\"/>\n</fvTenant>"
    );

    // writes keep the node detached
    mit.mo(tenant).unwrap().set("descr", "gone").unwrap();
    assert_eq!(mit.node(tenant).unwrap().state(), NodeState::Detached);

    // the Dn can be materialized again as a fresh node
    let again = mit.from_dn("uni/tn-t").unwrap().id();
    assert_ne!(again, tenant);
}
