//! Output selection
//!
//! Turns each page response into the records printed for the caller.
//!
//! | Selector | Records                                               |
//! |----------|-------------------------------------------------------|
//! | `*`      | the whole response                                    |
//! | `^Name`  | the bound value of parameter `Name`                   |
//! | `a.b`    | the value at `a.b`; arrays yield one record per item  |

use crate::catalog::OperationDefinition;
use crate::error::{Error, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// What to emit for each page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The whole response
    Response,
    /// A bound parameter value, passed through unchanged
    Parameter(String),
    /// A dotted path into the response
    Path(String),
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::selector(s, "selector cannot be empty"));
        }
        if s == "*" {
            return Ok(Self::Response);
        }
        if let Some(name) = s.strip_prefix('^') {
            if name.is_empty() {
                return Err(Error::selector(s, "missing parameter name after '^'"));
            }
            return Ok(Self::Parameter(name.to_string()));
        }

        let path = s.strip_prefix("$.").unwrap_or(s);
        if path.split('.').any(str::is_empty) {
            return Err(Error::selector(s, "path has an empty segment"));
        }
        Ok(Self::Path(path.to_string()))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response => f.write_str("*"),
            Self::Parameter(name) => write!(f, "^{name}"),
            Self::Path(path) => f.write_str(path),
        }
    }
}

impl Selector {
    /// Resolve the selector for an operation.
    ///
    /// Without an explicit selector the operation's `result_path` is used,
    /// falling back to the whole response. Parameter selectors must name a
    /// declared parameter and are normalized to its declared spelling.
    pub fn for_operation(op: &OperationDefinition, selector: Option<&str>) -> Result<Self> {
        let selector = match selector {
            Some(s) => s.parse()?,
            None => match &op.result_path {
                Some(path) => path.parse()?,
                None => Self::Response,
            },
        };

        match selector {
            Self::Parameter(name) => {
                let param = op.parameter(&name).ok_or_else(|| {
                    Error::selector(
                        format!("^{name}"),
                        format!("operation '{}' has no such parameter", op.name),
                    )
                })?;
                Ok(Self::Parameter(param.name.clone()))
            }
            other => Ok(other),
        }
    }

    /// Whether the selector passes a parameter through instead of reading the response
    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }

    /// Records selected from one page response
    pub fn records(&self, response: &Value, bound: &BTreeMap<String, Value>) -> Vec<Value> {
        match self {
            Self::Response => vec![response.clone()],
            Self::Parameter(name) => bound.get(name).cloned().into_iter().collect(),
            Self::Path(path) => match lookup(response, path) {
                Some(Value::Array(items)) => items.clone(),
                Some(Value::Null) | None => Vec::new(),
                Some(value) => vec![value.clone()],
            },
        }
    }
}

/// Look up a dotted path (`a.b.c`, optionally prefixed with `$.`) in a JSON value
pub fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => {
                current = map.get(part)?;
            }
            _ => return None,
        }
    }
    Some(current)
}

/// Read a string value at a dotted path; any other JSON type counts as absent
pub fn lookup_str<'a>(value: &'a Value, path: &str) -> Option<&'a str> {
    lookup(value, path).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::load_service;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_case::test_case;

    #[test_case("*", Selector::Response ; "whole response")]
    #[test_case("^InstanceId", Selector::Parameter("InstanceId".into()) ; "parameter")]
    #[test_case("UserSummaryList", Selector::Path("UserSummaryList".into()) ; "top level path")]
    #[test_case("$.a.b", Selector::Path("a.b".into()) ; "jsonpath prefix")]
    #[test_case(" Users ", Selector::Path("Users".into()) ; "trimmed")]
    fn test_parse_selector(input: &str, expected: Selector) {
        assert_eq!(input.parse::<Selector>().unwrap(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("^" ; "bare caret")]
    #[test_case("a..b" ; "empty segment")]
    fn test_parse_selector_rejects(input: &str) {
        assert!(matches!(
            input.parse::<Selector>(),
            Err(Error::InvalidSelector { .. })
        ));
    }

    #[test]
    fn test_display_round_trip() {
        for s in ["*", "^UserId", "Users"] {
            assert_eq!(s.parse::<Selector>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn test_for_operation_defaults() {
        let service = load_service("connect").unwrap();
        let list_users = service.operation("ListUsers").unwrap();
        assert_eq!(
            Selector::for_operation(list_users, None).unwrap(),
            Selector::Path("UserSummaryList".into())
        );
        assert_eq!(
            Selector::for_operation(list_users, Some("*")).unwrap(),
            Selector::Response
        );
    }

    #[test]
    fn test_for_operation_without_result_path() {
        let service = crate::catalog::load_service_from_str(
            "name: t\nendpoint: https://api.example.com\noperations:\n  - name: Ping\n    path: /ping\n",
        )
        .unwrap();
        let op = service.operation("Ping").unwrap();
        assert_eq!(Selector::for_operation(op, None).unwrap(), Selector::Response);
    }

    #[test]
    fn test_for_operation_parameter_normalized() {
        let service = load_service("connect").unwrap();
        let op = service.operation("ListUsers").unwrap();
        assert_eq!(
            Selector::for_operation(op, Some("^instanceid")).unwrap(),
            Selector::Parameter("InstanceId".into())
        );
        assert!(Selector::for_operation(op, Some("^Nope")).is_err());
    }

    #[test]
    fn test_records_flatten_arrays() {
        let response = json!({"UserSummaryList": [{"Id": "u1"}, {"Id": "u2"}], "NextToken": "t"});
        let records = Selector::Path("UserSummaryList".into()).records(&response, &BTreeMap::new());
        assert_eq!(records, vec![json!({"Id": "u1"}), json!({"Id": "u2"})]);
    }

    #[test]
    fn test_records_scalar_and_missing() {
        let response = json!({"User": {"Id": "u1"}, "Empty": null});
        let none = BTreeMap::new();
        assert_eq!(
            Selector::Path("User.Id".into()).records(&response, &none),
            vec![json!("u1")]
        );
        assert!(Selector::Path("Missing".into()).records(&response, &none).is_empty());
        assert!(Selector::Path("Empty".into()).records(&response, &none).is_empty());
    }

    #[test]
    fn test_records_response_and_parameter() {
        let response = json!({"a": 1});
        let mut bound = BTreeMap::new();
        bound.insert("InstanceId".to_string(), json!("inst-1"));

        assert_eq!(Selector::Response.records(&response, &bound), vec![response.clone()]);
        assert_eq!(
            Selector::Parameter("InstanceId".into()).records(&response, &bound),
            vec![json!("inst-1")]
        );
        assert!(Selector::Parameter("UserId".into())
            .records(&response, &bound)
            .is_empty());
    }

    #[test]
    fn test_lookup() {
        let value = json!({"data": {"token": "abc", "count": 3}});
        assert_eq!(lookup(&value, "$.data.token"), Some(&json!("abc")));
        assert_eq!(lookup_str(&value, "data.token"), Some("abc"));
        assert_eq!(lookup_str(&value, "data.count"), None);
        assert_eq!(lookup(&value, "data.token.deeper"), None);
    }
}
