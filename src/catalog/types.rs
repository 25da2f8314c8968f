//! Catalog types
//!
//! Declarative service and operation definitions for YAML parsing.

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::types::{BackoffType, Method, ParameterLocation, ParameterType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

// ============================================================================
// Service Definition
// ============================================================================

/// Top-level service definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServiceDefinition {
    /// Service name
    pub name: String,
    /// Catalog version
    #[serde(default = "default_version")]
    pub version: String,
    /// Endpoint URL; may contain `{region}`
    pub endpoint: String,
    /// Region used when none is given on the command line
    #[serde(default)]
    pub default_region: Option<String>,
    /// Transport settings
    #[serde(default)]
    pub http: HttpDefinition,
    /// Headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Operations
    pub operations: Vec<OperationDefinition>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl ServiceDefinition {
    /// Look up an operation by name (case-insensitive)
    pub fn operation(&self, name: &str) -> Result<&OperationDefinition> {
        self.operations
            .iter()
            .find(|op| op.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::OperationNotFound {
                operation: name.to_string(),
            })
    }

    /// Resolve the endpoint URL for a region
    pub fn resolve_endpoint(&self, region: Option<&str>) -> Result<String> {
        if !self.endpoint.contains("{region}") {
            return Ok(self.endpoint.clone());
        }

        let region = region
            .or(self.default_region.as_deref())
            .filter(|r| !r.is_empty())
            .ok_or_else(|| {
                Error::config(format!(
                    "Endpoint '{}' needs a region (use --region or AWS_REGION)",
                    self.endpoint
                ))
            })?;
        Ok(self.endpoint.replace("{region}", region))
    }
}

// ============================================================================
// HTTP Definition
// ============================================================================

/// Transport settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct HttpDefinition {
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Maximum retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff strategy
    #[serde(default)]
    pub backoff: BackoffType,
    /// Initial backoff in milliseconds
    #[serde(default = "default_initial_backoff")]
    pub initial_backoff_ms: u64,
    /// Maximum backoff in milliseconds
    #[serde(default = "default_max_backoff")]
    pub max_backoff_ms: u64,
    /// Client-side rate limit
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff() -> u64 {
    100
}

fn default_max_backoff() -> u64 {
    20_000
}

impl Default for HttpDefinition {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff(),
            max_backoff_ms: default_max_backoff(),
            rate_limit: None,
        }
    }
}

impl HttpDefinition {
    /// Convert to an HTTP client configuration
    pub fn to_client_config(
        &self,
        endpoint: impl Into<String>,
        headers: &HashMap<String, String>,
    ) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .endpoint(endpoint)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff,
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            );

        builder = match &self.rate_limit {
            Some(limit) => builder.rate_limit(limit.clone()),
            None => builder.no_rate_limit(),
        };

        for (key, value) in headers {
            builder = builder.header(key, value);
        }

        builder.build()
    }
}

// ============================================================================
// Operation Definition
// ============================================================================

/// One remote operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OperationDefinition {
    /// Operation name (e.g. `ListUsers`)
    pub name: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// HTTP method
    #[serde(default)]
    pub method: Method,
    /// URI path template
    pub path: String,
    /// Declared parameters
    #[serde(default)]
    pub parameters: Vec<ParameterDefinition>,
    /// Continuation token fields, for paged operations
    #[serde(default)]
    pub pagination: Option<PaginationDefinition>,
    /// Response path of the result list, used as the default selector
    #[serde(default)]
    pub result_path: Option<String>,
}

impl OperationDefinition {
    /// Look up a parameter by name (case-insensitive)
    pub fn parameter(&self, name: &str) -> Option<&ParameterDefinition> {
        self.parameters
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// Check if the operation is paged
    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }
}

// ============================================================================
// Parameter Definition
// ============================================================================

/// A declared operation parameter
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ParameterDefinition {
    /// Parameter name on the command line
    pub name: String,
    /// Dotted path in the request (defaults to the name)
    #[serde(default)]
    pub path: Option<String>,
    /// Value type
    #[serde(rename = "type", default)]
    pub param_type: ParameterType,
    /// Request location
    #[serde(default)]
    pub location: ParameterLocation,
    /// Whether the parameter must be supplied
    #[serde(default)]
    pub required: bool,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
}

impl ParameterDefinition {
    /// Dotted request path (or wire name for URI/query parameters)
    pub fn request_path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    /// URI parameters are always required
    pub fn is_required(&self) -> bool {
        self.required || self.location == ParameterLocation::Uri
    }
}

// ============================================================================
// Pagination Definition
// ============================================================================

/// Continuation token fields of a paged operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PaginationDefinition {
    /// Request field carrying the token
    pub input_token: String,
    /// Response path of the next token
    pub output_token: String,
    /// Request field carrying the page size
    #[serde(default)]
    pub max_results: Option<String>,
    /// Where the token and page size go (defaults to query for GET, body otherwise)
    #[serde(default)]
    pub location: Option<ParameterLocation>,
}

impl PaginationDefinition {
    /// Effective request location for the given method
    pub fn location_for(&self, method: Method) -> ParameterLocation {
        self.location.unwrap_or(if method.has_body() {
            ParameterLocation::Body
        } else {
            ParameterLocation::Query
        })
    }
}
