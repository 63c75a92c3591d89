// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use docstore_proto::*;
use serde_json::{json, Value};

#[test]
fn test_function_short_codes() {
    let cases = [
        (Function::Verify, "v"),
        (Function::List, "l"),
        (Function::Get, "g"),
        (Function::Create, "c"),
        (Function::Delete, "d"),
        (Function::Fetch, "f"),
        (Function::Set, "s"),
        (Function::Close, "close"),
    ];
    for (function, code) in cases {
        assert_eq!(function.code(), code);
        assert_eq!(Function::from_code(code), Some(function));
    }
}

#[test]
fn test_function_decode_is_case_insensitive() {
    assert_eq!(Function::from_code("V"), Some(Function::Verify));
    assert_eq!(Function::from_code("CLOSE"), Some(Function::Close));
    assert_eq!(Function::from_code("Close"), Some(Function::Close));
    assert_eq!(Function::from_code("x"), None);
    assert_eq!(Function::from_code(""), None);
}

#[test]
fn test_request_encode_parse_round_trip() {
    let request = Request::new(
        7,
        Function::Fetch,
        json!({"path": "root/a", "data_path": "b.c"}),
    );
    let parsed = Request::parse(&request.encode()).unwrap();
    assert_eq!(parsed.id(), 7);
    assert_eq!(parsed.function(), Function::Fetch);
    assert_eq!(parsed.metadata(), request.metadata());
}

#[test]
fn test_request_without_metadata_omits_the_field() {
    let line = Request::close(3).encode();
    assert_eq!(line, r#"{"id":3,"f":"close"}"#);
    let parsed = Request::parse(&line).unwrap();
    assert!(parsed.metadata().is_null());
}

#[test]
fn test_request_encode_keeps_key_order() {
    let line = Request::verify(1, "u", "p", "db").encode();
    assert_eq!(
        line,
        r#"{"id":1,"f":"v","m":{"user":"u","password":"p","database":"db"}}"#
    );
}

#[test]
fn test_request_parse_rejects_bad_lines() {
    assert!(matches!(
        Request::parse("not json"),
        Err(RequestParseError::Malformed(_))
    ));
    assert!(matches!(
        Request::parse(r#""a scalar""#),
        Err(RequestParseError::NotAMap)
    ));
    assert!(matches!(
        Request::parse(r#"{"f":"g"}"#),
        Err(RequestParseError::InvalidId)
    ));
    assert!(matches!(
        Request::parse(r#"{"id":-4,"f":"g"}"#),
        Err(RequestParseError::InvalidId)
    ));
    assert!(matches!(
        Request::parse(r#"{"id":4,"f":"zz"}"#),
        Err(RequestParseError::UnknownFunction(code)) if code == "zz"
    ));
}

#[test]
fn test_create_request_carries_force_only_when_true() {
    let plain = Request::create(1, "root/x", FileKind::Document, false);
    assert_eq!(plain.metadata().get("force"), None);
    assert_eq!(
        plain.metadata().get("type"),
        Some(&Value::from("document"))
    );

    let forced = Request::create(2, "root/x", FileKind::Collection, true);
    assert_eq!(forced.metadata().get("force"), Some(&Value::Bool(true)));
    assert_eq!(
        forced.metadata().get("type"),
        Some(&Value::from("collection"))
    );
}

#[test]
fn test_get_and_delete_carry_scalar_paths() {
    assert_eq!(
        Request::get(1, "root/a/b").metadata(),
        &Value::from("root/a/b")
    );
    assert_eq!(Request::delete(2, "root/a").metadata(), &Value::from("root/a"));
}

#[test]
fn test_response_encode_parse_round_trip() {
    let response = Response::new(9, true, json!({"documents": ["x.doc"]}));
    let parsed = Response::parse(&response.encode()).unwrap();
    assert_eq!(parsed.id(), 9);
    assert!(parsed.succeed());
    assert_eq!(parsed.metadata(), response.metadata());
}

#[test]
fn test_response_defaults_on_absent_fields() {
    let parsed = Response::parse(r#"{"id":4}"#).unwrap();
    assert_eq!(parsed.id(), 4);
    assert!(!parsed.succeed());
    assert!(parsed.metadata().is_null());
}

#[test]
fn test_response_success_flag_present_only_on_success() {
    assert_eq!(Response::failed(2).encode(), r#"{"id":2}"#);
    assert_eq!(
        Response::new(2, true, Value::Null).encode(),
        r#"{"id":2,"s":true}"#
    );
}

#[test]
fn test_response_parse_rejects_bad_lines() {
    assert!(matches!(
        Response::parse("{"),
        Err(ResponseParseError::Malformed(_))
    ));
    assert!(matches!(
        Response::parse("[1,2]"),
        Err(ResponseParseError::NotAMap)
    ));
    assert!(matches!(
        Response::parse(r#"{"s":true}"#),
        Err(ResponseParseError::InvalidId)
    ));
    assert!(matches!(
        Response::parse(r#"{"id":-1}"#),
        Err(ResponseParseError::InvalidId)
    ));
}

#[test]
fn test_filter_round_trip() {
    let filter = Filter::super_of_at(json!({"kind": "user"}), 2);
    let encoded = filter.encode();
    assert_eq!(encoded.get("_t"), Some(&Value::from("so")));
    let parsed = Filter::parse(&encoded).unwrap();
    assert_eq!(parsed, filter);
    match parsed {
        Filter::SuperOf { level, .. } => assert_eq!(level, 2),
    }
}

#[test]
fn test_filter_unknown_tag_means_no_filter() {
    assert_eq!(Filter::parse(&json!({"_t": "zz", "s": 1})), None);
    assert_eq!(Filter::parse(&json!({"s": 1})), None);
    assert_eq!(Filter::parse(&json!("so")), None);
}

#[test]
fn test_filter_level_defaults_to_zero() {
    let parsed = Filter::parse(&json!({"_t": "so", "s": {"a": 1}})).unwrap();
    assert_eq!(parsed, Filter::super_of(json!({"a": 1})));
}
