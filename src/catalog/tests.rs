//! Tests for the catalog module

use super::*;
use crate::error::Error;
use crate::types::{Method, ParameterLocation, ParameterType};
use pretty_assertions::assert_eq;
use std::io::Write;

// ============================================================================
// Basic Loading Tests
// ============================================================================

#[test]
fn test_load_minimal_service() {
    let yaml = r#"
name: test-service
endpoint: https://api.example.com
operations:
  - name: ListThings
    path: /things
"#;

    let def = load_service_from_str(yaml).unwrap();
    assert_eq!(def.name, "test-service");
    assert_eq!(def.version, "0.1.0");
    assert_eq!(def.operations.len(), 1);

    let op = &def.operations[0];
    assert_eq!(op.name, "ListThings");
    assert_eq!(op.method, Method::GET);
    assert!(op.parameters.is_empty());
    assert!(!op.is_paginated());
    assert!(op.result_path.is_none());
}

#[test]
fn test_http_defaults() {
    let yaml = r#"
name: test
endpoint: https://api.example.com
operations:
  - name: ListThings
    path: /things
"#;

    let def = load_service_from_str(yaml).unwrap();
    assert_eq!(def.http.timeout_seconds, 30);
    assert_eq!(def.http.max_retries, 3);
    assert_eq!(def.http.initial_backoff_ms, 100);
    assert!(def.http.rate_limit.is_none());
}

#[test]
fn test_load_full_operation() {
    let yaml = r#"
name: test
endpoint: https://api.example.com
operations:
  - name: SearchThings
    method: POST
    path: /search/{Scope}
    parameters:
      - name: Scope
        location: uri
      - name: Filter_Tags
        path: Filter.Tags
        type: array
      - name: Limit
        type: integer
        required: true
    pagination:
      input_token: NextToken
      output_token: NextToken
      max_results: MaxResults
    result_path: Things
"#;

    let def = load_service_from_str(yaml).unwrap();
    let op = def.operation("SearchThings").unwrap();
    assert_eq!(op.method, Method::POST);
    assert_eq!(op.result_path.as_deref(), Some("Things"));

    let scope = op.parameter("scope").unwrap();
    assert_eq!(scope.location, ParameterLocation::Uri);
    assert!(scope.is_required());

    let tags = op.parameter("Filter_Tags").unwrap();
    assert_eq!(tags.request_path(), "Filter.Tags");
    assert_eq!(tags.param_type, ParameterType::Array);
    assert_eq!(tags.location, ParameterLocation::Body);
    assert!(!tags.is_required());

    let pagination = op.pagination.as_ref().unwrap();
    assert_eq!(pagination.max_results.as_deref(), Some("MaxResults"));
    assert_eq!(pagination.location_for(op.method), ParameterLocation::Body);
}

#[test]
fn test_operation_lookup_is_case_insensitive() {
    let def = load_service("connect").unwrap();
    assert_eq!(def.operation("listusers").unwrap().name, "ListUsers");
    assert!(matches!(
        def.operation("DeleteEverything"),
        Err(Error::OperationNotFound { .. })
    ));
}

// ============================================================================
// Endpoint Tests
// ============================================================================

#[test]
fn test_resolve_endpoint_with_region() {
    let def = load_service("connect").unwrap();
    assert_eq!(
        def.resolve_endpoint(Some("eu-west-2")).unwrap(),
        "https://connect.eu-west-2.amazonaws.com"
    );
    assert_eq!(
        def.resolve_endpoint(None).unwrap(),
        "https://connect.us-east-1.amazonaws.com"
    );
}

#[test]
fn test_resolve_endpoint_needs_region() {
    let yaml = r#"
name: test
endpoint: "https://svc.{region}.example.com"
operations:
  - name: ListThings
    path: /things
"#;

    let def = load_service_from_str(yaml).unwrap();
    assert!(def.resolve_endpoint(None).is_err());
    assert!(def.resolve_endpoint(Some("")).is_err());
    assert_eq!(
        def.resolve_endpoint(Some("ap-south-1")).unwrap(),
        "https://svc.ap-south-1.example.com"
    );
}

#[test]
fn test_to_client_config() {
    let def = load_service("connect").unwrap();
    let config = def
        .http
        .to_client_config("https://connect.us-east-1.amazonaws.com", &def.headers);

    assert_eq!(
        config.endpoint.as_deref(),
        Some("https://connect.us-east-1.amazonaws.com")
    );
    assert_eq!(config.max_retries, 3);
    assert_eq!(
        config.default_headers.get("Accept").map(String::as_str),
        Some("application/json")
    );
    assert_eq!(config.rate_limit.as_ref().unwrap().requests_per_second, 2);
}

// ============================================================================
// Built-in Catalog Tests
// ============================================================================

#[test]
fn test_builtin_connect_loads() {
    let def = load_service("connect").unwrap();
    assert_eq!(def.name, "connect");

    let list_users = def.operation("ListUsers").unwrap();
    assert_eq!(list_users.path, "/users-summary/{InstanceId}");
    assert_eq!(list_users.result_path.as_deref(), Some("UserSummaryList"));
    let pagination = list_users.pagination.as_ref().unwrap();
    assert_eq!(pagination.input_token, "nextToken");
    assert_eq!(pagination.output_token, "NextToken");
    assert_eq!(
        pagination.location_for(list_users.method),
        ParameterLocation::Query
    );

    let describe = def.operation("DescribeUser").unwrap();
    assert!(!describe.is_paginated());
}

#[test]
fn test_list_builtin() {
    assert!(list_builtin().contains(&"connect"));
    assert!(get_builtin("connect").is_some());
}

// ============================================================================
// File Loading Tests
// ============================================================================

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    write!(
        file,
        r#"
name: file-service
endpoint: https://api.example.com
operations:
  - name: ListThings
    path: /things
"#
    )
    .unwrap();

    let def = load_service(file.path()).unwrap();
    assert_eq!(def.name, "file-service");
}

#[test]
fn test_load_missing_file() {
    let result = load_service("/definitely/not/here.yaml");
    match result {
        Err(Error::Config { message }) => assert!(message.contains("connect")),
        other => panic!("Expected config error, got {other:?}"),
    }
}

#[test]
fn test_load_unknown_builtin() {
    assert!(load_service("no-such-service").is_err());
}

// ============================================================================
// Validation Tests
// ============================================================================

fn service_with(operation: &str) -> String {
    format!("name: test\nendpoint: https://api.example.com\noperations:\n{operation}")
}

#[test]
fn test_reject_invalid_yaml() {
    assert!(load_service_from_str("name: [unclosed").is_err());
}

#[test]
fn test_reject_empty_operations() {
    let yaml = "name: test\nendpoint: https://api.example.com\noperations: []\n";
    assert!(load_service_from_str(yaml).is_err());
}

#[test]
fn test_reject_bad_endpoint() {
    let yaml = r#"
name: test
endpoint: "not a url"
operations:
  - name: ListThings
    path: /things
"#;
    assert!(matches!(
        load_service_from_str(yaml),
        Err(Error::InvalidConfigValue { .. })
    ));
}

#[test]
fn test_reject_duplicate_operations() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
  - name: listthings
    path: /other
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_duplicate_parameters() {
    let yaml = service_with(
        r#"
  - name: SearchThings
    method: POST
    path: /search
    parameters:
      - name: Limit
      - name: limit
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_relative_path() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: things
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_unbound_placeholder() {
    let yaml = service_with(
        r#"
  - name: DescribeThing
    path: /things/{ThingId}
"#,
    );
    let err = load_service_from_str(&yaml).unwrap_err();
    assert!(err.to_string().contains("ThingId"));
}

#[test]
fn test_reject_uri_parameter_without_placeholder() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
    parameters:
      - name: ThingId
        location: uri
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_body_parameter_on_get() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
    parameters:
      - name: Filter
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_nested_query_parameter() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
    parameters:
      - name: Kind
        path: filter.kind
        location: query
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_empty_path_segment() {
    let yaml = service_with(
        r#"
  - name: SearchThings
    method: POST
    path: /search
    parameters:
      - name: Filter
        path: Filter..Tags
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_incomplete_pagination() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
    pagination:
      input_token: ""
      output_token: NextToken
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}

#[test]
fn test_reject_body_token_on_get() {
    let yaml = service_with(
        r#"
  - name: ListThings
    path: /things
    pagination:
      input_token: NextToken
      output_token: NextToken
      location: body
"#,
    );
    assert!(load_service_from_str(&yaml).is_err());
}
