//! Page fetcher for catalog operations

use super::binding::BoundRequest;
use crate::catalog::OperationDefinition;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::pagination::{Page, PageFetcher};
use crate::select;
use crate::types::ParameterLocation;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// Fetches pages of one bound operation through the HTTP client
#[derive(Debug, Clone)]
pub struct OperationFetcher {
    client: Arc<HttpClient>,
    operation: OperationDefinition,
    request: BoundRequest,
    max_results: Option<u32>,
}

impl OperationFetcher {
    /// Create a fetcher for a bound request
    pub fn new(client: Arc<HttpClient>, operation: OperationDefinition, request: BoundRequest) -> Self {
        Self {
            client,
            operation,
            request,
            max_results: None,
        }
    }

    /// Ask the service for at most `max_results` items per page.
    ///
    /// Ignored for operations that declare no page size field.
    #[must_use]
    pub fn with_max_results(mut self, max_results: Option<u32>) -> Self {
        self.max_results = max_results;
        self
    }

    /// The operation being fetched
    pub fn operation(&self) -> &OperationDefinition {
        &self.operation
    }

    /// The bound request
    pub fn request(&self) -> &BoundRequest {
        &self.request
    }

    /// Build the request for the page starting at `token`
    pub fn request_config(&self, token: Option<&str>) -> RequestConfig {
        let mut config = RequestConfig {
            query: self.request.query.clone(),
            ..RequestConfig::default()
        };
        let mut body = self.request.body.clone();

        if let Some(pagination) = &self.operation.pagination {
            let page_size = pagination
                .max_results
                .as_deref()
                .zip(self.max_results);

            match pagination.location_for(self.operation.method) {
                ParameterLocation::Query => {
                    if let Some(token) = token {
                        config.query.push((pagination.input_token.clone(), token.to_string()));
                    }
                    if let Some((field, n)) = page_size {
                        config.query.push((field.to_string(), n.to_string()));
                    }
                }
                ParameterLocation::Body => {
                    let body = body.get_or_insert_with(Default::default);
                    if let Some(token) = token {
                        body.insert(pagination.input_token.clone(), Value::from(token));
                    }
                    if let Some((field, n)) = page_size {
                        body.insert(field.to_string(), Value::from(n));
                    }
                }
                // Rejected when the catalog is loaded
                ParameterLocation::Uri => {}
            }
        }

        config.body = body.map(Value::Object);
        config
    }
}

#[async_trait]
impl PageFetcher for OperationFetcher {
    type Item = Value;

    async fn fetch_page(&self, token: Option<&str>) -> Result<Page<Value>> {
        let config = self.request_config(token);
        let response = self
            .client
            .send_json(self.operation.method, &self.request.path, &config)
            .await?;

        let next_token = self
            .operation
            .pagination
            .as_ref()
            .and_then(|p| select::lookup_str(&response, &p.output_token))
            .map(str::to_string);

        debug!(
            operation = %self.operation.name,
            has_next = next_token.as_deref().is_some_and(|t| !t.is_empty()),
            "Fetched page"
        );

        Ok(Page::new(response, next_token))
    }
}
