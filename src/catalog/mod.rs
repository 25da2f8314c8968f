//! Operation catalog module
//!
//! Parse service and operation definitions from YAML.
//!
//! # Overview
//!
//! The catalog module provides:
//! - `ServiceDefinition` - endpoint, transport settings and operations
//! - `OperationDefinition` - HTTP binding, parameters and pagination fields
//! - Built-in catalogs embedded in the binary (`connect`)
//! - YAML parsing with validation

mod builtin;
mod parser;
mod types;

pub use builtin::{get_builtin, list_builtin};
pub use parser::{load_service, load_service_from_str};
pub use types::{
    HttpDefinition, OperationDefinition, PaginationDefinition, ParameterDefinition,
    ServiceDefinition,
};

#[cfg(test)]
mod tests;
