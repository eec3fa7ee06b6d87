//! Format A: nested-object JSON
//!
//! Each object is a single-key map from its class name to a body with
//! optional `attributes` and `children`. Empty sections are omitted and
//! attribute keys are emitted sorted, so encoding is canonical.

use serde_json::{Map, Value};

use super::{Mo, ENVELOPE};
use crate::errors::{MoError, Result};

const FORMAT: &str = "json";
const ATTRIBUTES: &str = "attributes";
const CHILDREN: &str = "children";

/// Encode an object tree, pretty-printed with two-space indentation
///
/// # Errors
///
/// `Serialization` if the writer fails.
pub fn encode(mo: &Mo) -> Result<String> {
    Ok(serde_json::to_string_pretty(&to_value(mo))?)
}

/// Build the JSON value of an object tree
pub fn to_value(mo: &Mo) -> Value {
    let mut body = Map::new();
    if !mo.attributes.is_empty() {
        let attributes = mo
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        body.insert(ATTRIBUTES.to_string(), Value::Object(attributes));
    }
    if !mo.children.is_empty() {
        let children = mo.children.iter().map(to_value).collect();
        body.insert(CHILDREN.to_string(), Value::Array(children));
    }

    let mut outer = Map::new();
    outer.insert(mo.class_name.clone(), Value::Object(body));
    Value::Object(outer)
}

/// Decode one object tree
///
/// # Errors
///
/// `Serialization` for invalid JSON, `Decode` for a value that is not an
/// object tree.
pub fn decode(text: &str) -> Result<Mo> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value)
}

/// Decode an object tree from an already-parsed value
///
/// # Errors
///
/// `Decode` if the shape is wrong or an attribute value is not a string.
pub fn from_value(value: &Value) -> Result<Mo> {
    let outer = value
        .as_object()
        .ok_or_else(|| MoError::decode(FORMAT, "expected an object"))?;
    let mut entries = outer.iter();
    let (class_name, body) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            return Err(MoError::decode(
                FORMAT,
                format!("expected exactly one class key, found {}", outer.len()),
            ))
        }
    };
    let body = body.as_object().ok_or_else(|| {
        MoError::decode(FORMAT, format!("body of {} is not an object", class_name))
    })?;

    let mut mo = Mo::new(class_name.clone());
    for (key, section) in body {
        match key.as_str() {
            ATTRIBUTES => {
                let attributes = section.as_object().ok_or_else(|| {
                    MoError::decode(FORMAT, format!("{}.attributes is not an object", class_name))
                })?;
                for (name, value) in attributes {
                    let value = value.as_str().ok_or_else(|| {
                        MoError::decode(
                            FORMAT,
                            format!("{}.{} is not a string", class_name, name),
                        )
                    })?;
                    mo.attributes.insert(name.clone(), value.to_string());
                }
            }
            CHILDREN => {
                let children = section.as_array().ok_or_else(|| {
                    MoError::decode(FORMAT, format!("{}.children is not an array", class_name))
                })?;
                mo.children = children.iter().map(from_value).collect::<Result<_>>()?;
            }
            other => {
                tracing::debug!(class_name = %class_name, key = %other, "ignoring unknown body key");
            }
        }
    }
    Ok(mo)
}

/// Decode `{"imdata": [...], "totalCount": "N"}` into its objects
///
/// # Errors
///
/// `Serialization` for invalid JSON, `Decode` for a missing or malformed
/// envelope.
pub fn decode_envelope(text: &str) -> Result<Vec<Mo>> {
    let value: Value = serde_json::from_str(text)?;
    let items = value
        .get(ENVELOPE)
        .and_then(Value::as_array)
        .ok_or_else(|| MoError::decode(FORMAT, "response has no imdata array"))?;
    items.iter().map(from_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_leaf_omits_children() {
        let mo = Mo::new("fvTenant").with_attribute("name", "mgmt");
        assert_eq!(
            encode(&mo).unwrap(),
            "{\n  \"fvTenant\": {\n    \"attributes\": {\n      \"name\": \"mgmt\"\n    }\n  }\n}"
        );
    }

    #[test]
    fn test_encode_without_attributes_omits_attributes() {
        let mo = Mo::new("polUni").with_child(Mo::new("fvTenant").with_attribute("name", "mgmt"));
        let value = to_value(&mo);
        assert!(value["polUni"].get("attributes").is_none());
        assert_eq!(value["polUni"]["children"][0]["fvTenant"]["attributes"]["name"], "mgmt");
    }

    #[test]
    fn test_encode_sorts_attribute_keys() {
        let mo = Mo::new("fvTenant")
            .with_attribute("name", "mgmt")
            .with_attribute("descr", "d");
        let text = encode(&mo).unwrap();
        let descr = text.find("descr").unwrap();
        let name = text.find("\"name\"").unwrap();
        assert!(descr < name);
    }

    #[test]
    fn test_decode_accepts_any_key_order() {
        let text = r#"{"fvTenant": {"children": [{"fvBD": {"attributes": {"name": "lab"}}}],
                       "attributes": {"name": "t", "descr": "x"}}}"#;
        let mo = decode(text).unwrap();
        assert_eq!(mo.class_name, "fvTenant");
        assert_eq!(mo.attribute("descr"), Some("x"));
        assert_eq!(mo.children.len(), 1);
        assert_eq!(mo.children[0].attribute("name"), Some("lab"));
    }

    #[test]
    fn test_decode_rejects_bad_shapes() {
        assert!(matches!(decode("[]"), Err(MoError::Decode { .. })));
        assert!(matches!(
            decode(r#"{"a": {}, "b": {}}"#),
            Err(MoError::Decode { .. })
        ));
        assert!(matches!(
            decode(r#"{"fvTenant": {"attributes": {"name": 1}}}"#),
            Err(MoError::Decode { .. })
        ));
        assert!(matches!(decode("{"), Err(MoError::Serialization { .. })));
    }

    #[test]
    fn test_decode_envelope() {
        let text = r#"{"imdata": [{"fvTenant": {"attributes": {"dn": "uni/tn-mgmt", "name": "mgmt"}}}],
                       "totalCount": "1"}"#;
        let items = decode_envelope(text).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute("dn"), Some("uni/tn-mgmt"));
        assert!(matches!(
            decode_envelope(r#"{"totalCount": "0"}"#),
            Err(MoError::Decode { .. })
        ));
    }
}
