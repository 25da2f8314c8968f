//! Request binding
//!
//! Converts raw parameter strings into a concrete request for one operation.

use crate::catalog::{OperationDefinition, ParameterDefinition};
use crate::error::{Error, Result};
use crate::sparse::{build_object, FieldSlot, SparseNode};
use crate::template;
use crate::types::{JsonObject, ParameterLocation, ParameterType};
use serde_json::{Number, Value};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// A request bound to an operation, before pagination fields are added
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundRequest {
    /// Rendered URI path
    pub path: String,
    /// Query pairs; array parameters repeat their key
    pub query: Vec<(String, String)>,
    /// JSON body, for methods that carry one
    pub body: Option<JsonObject>,
    /// Typed values of the supplied parameters, by declared name
    pub values: BTreeMap<String, Value>,
}

/// Split a `NAME=VALUE` assignment; the value may be empty or contain `=`
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::invalid_parameter(raw, "expected NAME=VALUE"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_parameter(raw, "parameter name cannot be empty"));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Parse a raw value according to the parameter's declared type.
///
/// An empty string is a present empty string for string parameters and an
/// empty list for array parameters.
pub fn parse_value(param: &ParameterDefinition, raw: &str) -> Result<Value> {
    let invalid = |message: String| Error::invalid_parameter(&param.name, message);

    match param.param_type {
        ParameterType::String => Ok(Value::String(raw.to_string())),
        ParameterType::Integer => raw
            .trim()
            .parse::<i64>()
            .map(Value::from)
            .map_err(|e| invalid(format!("'{raw}' is not an integer: {e}"))),
        ParameterType::Number => {
            // Integral input is sent as written, not as a float
            if let Ok(i) = raw.trim().parse::<i64>() {
                return Ok(Value::from(i));
            }
            let n: f64 = raw
                .trim()
                .parse()
                .map_err(|e| invalid(format!("'{raw}' is not a number: {e}")))?;
            Number::from_f64(n)
                .map(Value::Number)
                .ok_or_else(|| invalid(format!("'{raw}' is not a finite number")))
        }
        ParameterType::Boolean => match raw.trim() {
            s if s.eq_ignore_ascii_case("true") => Ok(Value::Bool(true)),
            s if s.eq_ignore_ascii_case("false") => Ok(Value::Bool(false)),
            _ => Err(invalid(format!("'{raw}' is not true or false"))),
        },
        ParameterType::Array => {
            let trimmed = raw.trim();
            if trimmed.starts_with('[') {
                match serde_json::from_str(trimmed) {
                    Ok(Value::Array(items)) => Ok(Value::Array(items)),
                    Ok(_) => Err(invalid("expected a JSON array".to_string())),
                    Err(e) => Err(invalid(format!("invalid JSON array: {e}"))),
                }
            } else if trimmed.is_empty() {
                Ok(Value::Array(Vec::new()))
            } else {
                Ok(Value::Array(
                    trimmed
                        .split(',')
                        .map(|item| Value::String(item.trim().to_string()))
                        .collect(),
                ))
            }
        }
        ParameterType::Object => match serde_json::from_str(raw.trim()) {
            Ok(Value::Object(map)) => Ok(Value::Object(map)),
            Ok(_) => Err(invalid("expected a JSON object".to_string())),
            Err(e) => Err(invalid(format!("invalid JSON object: {e}"))),
        },
    }
}

/// Bind raw parameters to an operation.
///
/// Unknown names and missing required parameters are rejected. A parameter
/// given twice keeps its last value.
pub fn bind_request(op: &OperationDefinition, params: &[(String, String)]) -> Result<BoundRequest> {
    let mut values = BTreeMap::new();
    for (name, raw) in params {
        let param = op.parameter(name).ok_or_else(|| Error::UnknownParameter {
            operation: op.name.clone(),
            parameter: name.clone(),
        })?;
        values.insert(param.name.clone(), parse_value(param, raw)?);
    }

    if let Some(missing) = op
        .parameters
        .iter()
        .find(|p| p.is_required() && !values.contains_key(&p.name))
    {
        return Err(Error::MissingParameter {
            operation: op.name.clone(),
            parameter: missing.name.clone(),
        });
    }

    let path = render_uri(op, &values)?;
    let query = build_query(op, &values)?;
    let body = if op.method.has_body() {
        Some(build_body(op, &values)?)
    } else {
        None
    };

    debug!(
        operation = %op.name,
        path = %path,
        query = query.len(),
        body_fields = body.as_ref().map_or(0, JsonObject::len),
        "Bound request"
    );

    Ok(BoundRequest {
        path,
        query,
        body,
        values,
    })
}

/// Parameters declared at `location`, each paired with its slot
fn slots<'a>(
    op: &'a OperationDefinition,
    values: &'a BTreeMap<String, Value>,
    location: ParameterLocation,
) -> impl Iterator<Item = (&'a ParameterDefinition, FieldSlot)> + 'a {
    op.parameters
        .iter()
        .filter(move |p| p.location == location)
        .map(move |p| (p, FieldSlot::from_option(values.get(&p.name).cloned())))
}

fn render_uri(op: &OperationDefinition, values: &BTreeMap<String, Value>) -> Result<String> {
    let uri_values: HashMap<String, String> = slots(op, values, ParameterLocation::Uri)
        .filter_map(|(p, slot)| {
            slot.into_value()
                .map(|v| (p.request_path().to_string(), scalar_string(&v)))
        })
        .collect();
    template::render_path(&op.path, &uri_values)
}

fn build_query(
    op: &OperationDefinition,
    values: &BTreeMap<String, Value>,
) -> Result<Vec<(String, String)>> {
    let mut root = SparseNode::root();
    for (param, slot) in slots(op, values, ParameterLocation::Query) {
        root.insert(param.request_path(), slot)?;
    }

    let mut pairs = Vec::new();
    for (key, value) in build_object(&root) {
        match value {
            Value::Array(items) => {
                pairs.extend(items.iter().map(|item| (key.clone(), scalar_string(item))));
            }
            other => pairs.push((key, scalar_string(&other))),
        }
    }
    Ok(pairs)
}

fn build_body(op: &OperationDefinition, values: &BTreeMap<String, Value>) -> Result<JsonObject> {
    let mut root = SparseNode::root();
    for (param, slot) in slots(op, values, ParameterLocation::Body) {
        root.insert(param.request_path(), slot)?;
    }
    Ok(build_object(&root))
}

/// String form of a value in a URI or query string
fn scalar_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
