//! YAML parser for service catalogs
//!
//! Parses and validates catalog files.
//! Supports both built-in catalogs (by name) and custom YAML files (by path).

use super::builtin;
use super::types::{OperationDefinition, ServiceDefinition};
use crate::error::{Error, Result, ResultExt};
use crate::template;
use crate::types::ParameterLocation;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Load a service catalog from a built-in name or file path
///
/// # Examples
///
/// ```ignore
/// // Built-in catalog
/// let service = load_service("connect")?;
///
/// // Custom catalog
/// let service = load_service("./my-service.yaml")?;
/// ```
pub fn load_service(path: impl AsRef<Path>) -> Result<ServiceDefinition> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    if !path_str.contains('/')
        && !path_str.contains('\\')
        && !path_str.ends_with(".yaml")
        && !path_str.ends_with(".yml")
    {
        if let Some(yaml) = builtin::get_builtin(&path_str) {
            return load_service_from_str(yaml);
        }
    }

    if !path.exists() {
        return Err(Error::config(format!(
            "Catalog '{}' not found. Built-in catalogs: {}. Or provide a path to a YAML file.",
            path.display(),
            builtin::list_builtin().join(", ")
        )));
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog file '{}'", path.display()))?;
    load_service_from_str(&content)
}

/// Load a service catalog from a YAML string
pub fn load_service_from_str(yaml: &str) -> Result<ServiceDefinition> {
    let def: ServiceDefinition = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse catalog YAML: {e}")))?;

    validate_service(&def)?;
    Ok(def)
}

/// Validate a service definition
fn validate_service(def: &ServiceDefinition) -> Result<()> {
    if def.name.is_empty() {
        return Err(Error::config("Service name cannot be empty"));
    }

    let sample = def.endpoint.replace("{region}", "us-east-1");
    url::Url::parse(&sample)
        .map_err(|e| Error::invalid_config("endpoint", format!("'{}': {e}", def.endpoint)))?;

    if def.operations.is_empty() {
        return Err(Error::config("Service must have at least one operation"));
    }

    let mut names = HashSet::new();
    for op in &def.operations {
        if !names.insert(op.name.to_ascii_lowercase()) {
            return Err(Error::config(format!(
                "Duplicate operation name: {}",
                op.name
            )));
        }
        validate_operation(op)?;
    }

    Ok(())
}

/// Validate an operation definition
fn validate_operation(op: &OperationDefinition) -> Result<()> {
    if op.name.is_empty() {
        return Err(Error::config("Operation name cannot be empty"));
    }

    if !op.path.starts_with('/') {
        return Err(Error::config(format!(
            "Operation '{}' path must start with '/': {}",
            op.name, op.path
        )));
    }

    let mut names = HashSet::new();
    for param in &op.parameters {
        if param.name.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' has a parameter with an empty name",
                op.name
            )));
        }
        if !names.insert(param.name.to_ascii_lowercase()) {
            return Err(Error::config(format!(
                "Operation '{}' declares parameter '{}' twice",
                op.name, param.name
            )));
        }

        let path = param.request_path();
        if path.split('.').any(str::is_empty) {
            return Err(Error::config(format!(
                "Parameter '{}' of '{}' has an invalid path: {path}",
                param.name, op.name
            )));
        }

        match param.location {
            ParameterLocation::Uri | ParameterLocation::Query if path.contains('.') => {
                return Err(Error::config(format!(
                    "Parameter '{}' of '{}' is bound to the {:?} and cannot be nested",
                    param.name, op.name, param.location
                )));
            }
            ParameterLocation::Body if !op.method.has_body() => {
                return Err(Error::config(format!(
                    "Parameter '{}' of '{}' is bound to the body, but {} requests have none",
                    param.name, op.name, op.method
                )));
            }
            _ => {}
        }
    }

    // Every placeholder needs a URI parameter, and every URI parameter a placeholder
    let placeholders = template::placeholders(&op.path);
    for placeholder in &placeholders {
        let bound = op
            .parameters
            .iter()
            .any(|p| p.location == ParameterLocation::Uri && p.request_path() == placeholder.as_str());
        if !bound {
            return Err(Error::config(format!(
                "Operation '{}' path placeholder {{{placeholder}}} has no uri parameter",
                op.name
            )));
        }
    }
    for param in op
        .parameters
        .iter()
        .filter(|p| p.location == ParameterLocation::Uri)
    {
        if !placeholders.iter().any(|p| p.as_str() == param.request_path()) {
            return Err(Error::config(format!(
                "Parameter '{}' of '{}' is bound to the uri, but the path has no {{{}}}",
                param.name,
                op.name,
                param.request_path()
            )));
        }
    }

    if let Some(pagination) = &op.pagination {
        if pagination.input_token.is_empty() || pagination.output_token.is_empty() {
            return Err(Error::config(format!(
                "Operation '{}' pagination needs input_token and output_token",
                op.name
            )));
        }
        let location = pagination.location_for(op.method);
        if location == ParameterLocation::Uri {
            return Err(Error::config(format!(
                "Operation '{}' cannot carry its token in the uri",
                op.name
            )));
        }
        if location == ParameterLocation::Body && !op.method.has_body() {
            return Err(Error::config(format!(
                "Operation '{}' carries its token in the body, but {} requests have none",
                op.name, op.method
            )));
        }
    }

    Ok(())
}
