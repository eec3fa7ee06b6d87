#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{new_mit, registry};
use motree_core::ops::{dn_ops, mo_ops, wire_ops};
use motree_core::{ChildArgs, Mit, MoError, WireFormat};
use proptest::prelude::*;

fn arb_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.]{1,12}"
}

/// Names as seen on real fabrics, dashes and colons included
fn arb_dashed_name() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:-]{1,12}"
}

/// Free text, line breaks and tabs included
fn arb_text() -> impl Strategy<Value = String> {
    "[ -~\t\n\r]{0,24}"
}

/// A name with one of the Dn delimiters somewhere inside
fn arb_delimited_name() -> impl Strategy<Value = String> {
    ("[a-z]{0,5}", prop::sample::select(vec!['/', '[', ']']), "[a-z]{0,5}")
        .prop_map(|(head, delimiter, tail)| format!("{}{}{}", head, delimiter, tail))
}

fn arb_ip() -> impl Strategy<Value = String> {
    (any::<[u8; 4]>(), 8u8..=32).prop_map(|(o, len)| {
        format!("{}.{}.{}.{}/{}", o[0], o[1], o[2], o[3], len)
    })
}

/// Dns that exercise plain, multi-value and bracketed Rns
fn arb_dn() -> impl Strategy<Value = String> {
    prop_oneof![
        (arb_dashed_name(), arb_dashed_name())
            .prop_map(|(t, b)| format!("uni/tn-{}/BD-{}", t, b)),
        (arb_dashed_name(), arb_name(), arb_ip())
            .prop_map(|(t, b, ip)| format!("uni/tn-{}/BD-{}/subnet-[{}]", t, b, ip)),
        (arb_name(), arb_name(), arb_name()).prop_map(|(t, a, e)| format!(
            "uni/epp/fv-[uni/tn-{}/ap-{}/epg-{}]",
            t, a, e
        )),
        (arb_dashed_name(), arb_name(), arb_dashed_name())
            .prop_map(|(n, s, typ)| format!("uni/infra/nprof-{}/leaves-{}-typ-{}", n, s, typ)),
    ]
}

/// A tenant with a few bridge domains and contexts, built through the API
fn build_tenant(
    mit: &mut Mit,
    tenant: &str,
    descr: &str,
    bds: &[(String, String)],
    ctxs: &[String],
) {
    let id = mit
        .uni()
        .child("fvTenant", ChildArgs::from(tenant).with("descr", descr))
        .unwrap()
        .id();
    for (bd, ctx) in bds {
        mit.mo(id)
            .unwrap()
            .child("fvBD", bd.as_str())
            .unwrap()
            .child("fvRsCtx", ChildArgs::new().with("tnFvCtxName", ctx.as_str()))
            .unwrap();
    }
    for ctx in ctxs {
        mit.mo(id).unwrap().child("fvCtx", ctx.as_str()).unwrap();
    }
}

proptest! {
    #[test]
    fn dn_survives_resolution(dn in arb_dn()) {
        let mut mit = new_mit();
        let id = dn_ops::from_dn(&mut mit, &dn).unwrap();
        prop_assert_eq!(dn_ops::dn(&mit, id).unwrap(), dn);
    }

    #[test]
    fn from_dn_never_duplicates(dn in arb_dn()) {
        let mut mit = new_mit();
        let first = dn_ops::from_dn(&mut mit, &dn).unwrap();
        let size = mit.len();
        let second = dn_ops::from_dn(&mut mit, &dn).unwrap();
        prop_assert_eq!(first, second);
        prop_assert_eq!(mit.len(), size);
    }

    #[test]
    fn trees_survive_both_formats(
        tenant in arb_dashed_name(),
        descr in arb_text(),
        bds in prop::collection::vec((arb_dashed_name(), arb_text()), 0..4),
        ctxs in prop::collection::vec(arb_dashed_name(), 0..3),
        format in prop_oneof![Just(WireFormat::Json), Just(WireFormat::Xml)],
    ) {
        let mut mit = new_mit();
        build_tenant(&mut mit, &tenant, &descr, &bds, &ctxs);

        let root = mit.root();
        let text = wire_ops::encode(&mit, root, format).unwrap();
        let decoded = match format {
            WireFormat::Json => Mit::from_json(registry(), &text).unwrap(),
            WireFormat::Xml => Mit::from_xml(registry(), &text).unwrap(),
        };

        prop_assert_eq!(
            wire_ops::to_mo(&decoded, decoded.root()).unwrap(),
            wire_ops::to_mo(&mit, root).unwrap()
        );
        prop_assert_eq!(wire_ops::encode(&decoded, decoded.root(), format).unwrap(), text);
    }

    #[test]
    fn delimiters_are_refused_in_plain_names(name in arb_delimited_name()) {
        let mut mit = new_mit();
        let root = mit.root();
        let result = mo_ops::create_child(&mut mit, root, "fvTenant", name.as_str().into());
        prop_assert!(matches!(result, Err(MoError::Naming { .. })), "expected MoError::Naming");
        prop_assert_eq!(mit.len(), 1);
    }

    #[test]
    fn accepted_names_resolve_back(
        selector in "(-|t|y|p|a){1,10}",
        block in "(-|t|y|p|a){1,10}",
    ) {
        let mut mit = new_mit();
        let built = mit
            .uni()
            .child("infraInfra", ())
            .and_then(|infra| infra.child("infraNodeP", "leaf101"))
            .and_then(|profile| profile.child("infraLeafS", [selector.as_str(), block.as_str()]));
        match built {
            Ok(leaves) => {
                let id = leaves.id();
                let dn = dn_ops::dn(&mit, id).unwrap();
                prop_assert_eq!(dn_ops::from_dn(&mut mit, &dn).unwrap(), id);
            }
            Err(err) => prop_assert!(matches!(err, MoError::Naming { .. }), "expected MoError::Naming"),
        }
    }
}
