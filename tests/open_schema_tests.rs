//! Behaviour of the code the `type-properties` template emits, exercised on the
//! `Tag` unit the default templates render (checked against the fixture below).

use openapi_typegen::generator::{default_imports, Emitter, TemplateRegistry};
use openapi_typegen::model::{PropertyDefinition, Schema, TypeDefinition};
use openapi_typegen::open_schema::{DecodeError, OpenObject};
use std::collections::HashMap;

const TAG_SOURCE: &str = include_str!("fixtures/open_tag.rs");

include!("fixtures/open_tag.rs");

fn squash(code: &str) -> String {
    code.chars().filter(|c| !c.is_whitespace()).collect()
}

#[test]
fn test_fixture_is_the_rendered_tag_unit() {
    let tag = TypeDefinition::new(
        "Tag",
        "Tag",
        Schema::object(
            vec![
                PropertyDefinition::new("id", "id", true, Schema::primitive("i64")),
                PropertyDefinition::new("name", "name", false, Schema::primitive("String")),
            ],
            Some(Schema::primitive("String")),
        ),
    );
    let registry = TemplateRegistry::with_defaults().unwrap();
    let unit = Emitter::new(&registry, default_imports().unwrap(), "types")
        .render_type(&tag)
        .unwrap();

    assert_eq!(unit.name, "tag");
    assert!(unit.code.contains("use std::collections::HashMap;"));
    assert!(
        squash(&unit.code).ends_with(&squash(TAG_SOURCE)),
        "rendered Tag drifted from tests/fixtures/open_tag.rs:\n{}",
        unit.code
    );
}

#[test]
fn test_decode_splits_declared_and_open_fields() {
    let tag = Tag::from_json_slice(br#"{"id":7,"extra":"x"}"#).unwrap();
    assert_eq!(tag.id, 7);
    assert_eq!(tag.name, None);
    assert_eq!(tag.get("extra").map(String::as_str), Some("x"));
    assert!(tag.get("id").is_none());
}

#[test]
fn test_round_trip_omits_unset_optional() {
    let tag = Tag::from_json_slice(br#"{"id":7,"extra":"x"}"#).unwrap();
    let bytes = tag.to_json_vec().unwrap();
    assert_eq!(String::from_utf8(bytes.clone()).unwrap(), r#"{"id":7,"extra":"x"}"#);
    assert_eq!(Tag::from_json_slice(&bytes).unwrap(), tag);
}

#[test]
fn test_declared_key_is_never_an_open_field() {
    let tag = Tag::from_json_slice(br#"{"name":"a","id":1}"#).unwrap();
    assert_eq!(tag.name.as_deref(), Some("a"));
    assert!(tag.additional_properties.is_none());
}

#[test]
fn test_set_then_encode() {
    let mut tag = Tag {
        id: 3,
        name: Some("dog".to_string()),
        additional_properties: None,
    };
    tag.set("color", "brown".to_string());
    tag.set("color", "black".to_string());
    assert_eq!(tag.get("color").map(String::as_str), Some("black"));
    assert_eq!(
        String::from_utf8(tag.to_json_vec().unwrap()).unwrap(),
        r#"{"id":3,"name":"dog","color":"black"}"#
    );
}

#[test]
fn test_missing_required_field() {
    let err = Tag::from_json_slice(br#"{"name":"a"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::MissingField { ref field } if field == "id"));
}

#[test]
fn test_open_field_of_wrong_type() {
    let err = Tag::from_json_slice(br#"{"id":1,"extra":5}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Field { ref field, .. } if field == "extra"));
}

#[test]
fn test_declared_field_of_wrong_type() {
    let err = Tag::from_json_slice(br#"{"id":"one"}"#).unwrap_err();
    assert!(matches!(err, DecodeError::Field { ref field, .. } if field == "id"));
}

#[test]
fn test_malformed_input() {
    assert!(matches!(
        Tag::from_json_slice(b"not json").unwrap_err(),
        DecodeError::Malformed(_)
    ));
}

#[test]
fn test_serde_integration() {
    let tags: Vec<Tag> = serde_json::from_str(r#"[{"id":1},{"id":2,"k":"v"}]"#).unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[1].get("k").map(String::as_str), Some("v"));
    let json = serde_json::to_string(&tags).unwrap();
    assert_eq!(json, r#"[{"id":1},{"id":2,"k":"v"}]"#);
}

#[test]
fn test_open_object_keeps_declared_fields_first() {
    let mut object = OpenObject::new();
    object.insert("id", &1).unwrap();
    object.insert("name", "n").unwrap();
    let keys: Vec<_> = object.keys().collect();
    assert_eq!(keys, ["id", "name"]);
}
