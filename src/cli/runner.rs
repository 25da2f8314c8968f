//! CLI runner - executes commands

use crate::catalog::{load_service, OperationDefinition, ServiceDefinition};
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::error::{Error, Result};
use crate::http::{validate_header, HttpClient};
use crate::operation::{bind_request, parse_assignment, OperationFetcher};
use crate::pagination::{AutoPaginator, PaginationSummary, PagingMode, StopReason};
use crate::select::Selector;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Arguments of the `invoke` command
#[derive(Debug, Clone, Default)]
pub struct InvokeArgs {
    /// Operation name
    pub operation: String,
    /// Raw `NAME=VALUE` parameters
    pub params: Vec<String>,
    /// Explicit continuation token
    pub next_token: Option<String>,
    /// Single-page mode
    pub no_auto_iteration: bool,
    /// Page size
    pub max_results: Option<u32>,
    /// Output selector
    pub select: Option<String>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List => self.list(),
            Commands::Describe { operation } => self.describe(operation),
            Commands::Validate => self.validate(),
            Commands::Invoke {
                operation,
                params,
                next_token,
                no_auto_iteration,
                max_results,
                select,
            } => {
                let args = InvokeArgs {
                    operation: operation.clone(),
                    params: params.clone(),
                    next_token: next_token.clone(),
                    no_auto_iteration: *no_auto_iteration,
                    max_results: *max_results,
                    select: select.clone(),
                };
                self.invoke(&args).await.map(|_| ())
            }
        }
    }

    /// Load the service catalog
    fn load_service(&self) -> Result<ServiceDefinition> {
        load_service(&self.cli.catalog)
    }

    /// Endpoint from `--endpoint`, else the catalog's for the region
    fn endpoint(&self, service: &ServiceDefinition) -> Result<String> {
        match &self.cli.endpoint {
            Some(endpoint) => {
                url::Url::parse(endpoint)?;
                Ok(endpoint.clone())
            }
            None => service.resolve_endpoint(self.cli.region.as_deref()),
        }
    }

    /// Build the HTTP client for a service
    fn build_client(&self, service: &ServiceDefinition) -> Result<HttpClient> {
        let endpoint = self.endpoint(service)?;
        let mut config = service.http.to_client_config(&endpoint, &service.headers);

        for raw in &self.cli.headers {
            let (key, value) = parse_header(raw)?;
            config.default_headers.insert(key, value);
        }

        debug!(service = %service.name, endpoint = %endpoint, "Built HTTP client");
        HttpClient::with_config(config)
    }

    /// List catalog operations
    fn list(&self) -> Result<()> {
        let service = self.load_service()?;

        let operations: Vec<Value> = service
            .operations
            .iter()
            .map(|op| {
                json!({
                    "name": op.name,
                    "method": op.method.to_string(),
                    "path": op.path,
                    "paginated": op.is_paginated(),
                    "description": op.description
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "OPERATIONS",
            "service": service.name,
            "operations": operations
        }));

        Ok(())
    }

    /// Describe one operation
    fn describe(&self, name: &str) -> Result<()> {
        let service = self.load_service()?;
        let op = service.operation(name)?;
        let selector = Selector::for_operation(op, None)?;

        self.output_message(&json!({
            "type": "OPERATION",
            "operation": serde_json::to_value(op)?,
            "default_select": selector.to_string()
        }));

        Ok(())
    }

    /// Validate the catalog
    fn validate(&self) -> Result<()> {
        let service = self.load_service()?;
        let paginated = service
            .operations
            .iter()
            .filter(|op| op.is_paginated())
            .count();

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!(
                    "Catalog '{}' v{} is valid with {} operations ({} paginated)",
                    service.name,
                    service.version,
                    service.operations.len(),
                    paginated
                )
            }
        }));

        Ok(())
    }

    /// Bind, paginate and print selected records.
    ///
    /// Ctrl-C is observed between pages and ends the call cleanly. A fetch
    /// failure is returned after the pages before it have been printed.
    pub async fn invoke(&self, args: &InvokeArgs) -> Result<PaginationSummary> {
        let service = self.load_service()?;
        let op: OperationDefinition = service.operation(&args.operation)?.clone();

        let params = args
            .params
            .iter()
            .map(|raw| parse_assignment(raw))
            .collect::<Result<Vec<_>>>()?;
        let request = bind_request(&op, &params)?;
        let selector = Selector::for_operation(&op, args.select.as_deref())?;
        let client = Arc::new(self.build_client(&service)?);

        let mode = PagingMode::from_flags(args.no_auto_iteration, args.next_token.is_some());
        if mode.is_caller_controlled() && !op.is_paginated() {
            debug!(operation = %op.name, "Operation is not paged; paging flags have no effect");
        }

        let bound = request.values.clone();
        let fetcher = OperationFetcher::new(client, op, request).with_max_results(args.max_results);
        let paginator = AutoPaginator::new(fetcher)
            .with_initial_token(args.next_token.clone())
            .with_mode(mode);

        let cancel = paginator.cancel_flag();
        let interrupt = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupt received, stopping after the current page");
                cancel.cancel();
            }
        });

        let mut parameter_emitted = false;
        let result = paginator
            .run(|page| {
                // A pass-through parameter is emitted once per call
                if selector.is_parameter() {
                    if parameter_emitted {
                        return Ok(());
                    }
                    parameter_emitted = true;
                }
                for record in selector.records(&page.batch, &bound) {
                    self.output_message(&record);
                }
                Ok(())
            })
            .await;
        interrupt.abort();

        let summary = result?;
        if summary.stop_reason == StopReason::Cancelled {
            info!(pages = summary.pages, "Stopped by interrupt");
        }
        Ok(summary)
    }

    /// Output a JSON value
    fn output_message(&self, msg: &Value) {
        match self.cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string(msg).unwrap_or_default());
            }
            OutputFormat::Pretty => {
                println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
            }
        }
    }
}

/// Split a `KEY=VALUE` header flag
fn parse_header(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| Error::invalid_config("header", format!("expected KEY=VALUE, got '{raw}'")))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(Error::invalid_config("header", "header name cannot be empty"));
    }
    let value = value.trim();
    validate_header(key, value)?;
    Ok((key.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Authorization=Bearer a=b").unwrap(),
            ("Authorization".to_string(), "Bearer a=b".to_string())
        );
        assert!(parse_header("NoValue").is_err());
        assert!(parse_header("=x").is_err());
    }

    #[test]
    fn test_parse_header_rejects_unsendable_header() {
        for raw in ["Bad Name=x", "X-Key=line\nbreak", "X(y)=z"] {
            match parse_header(raw) {
                Err(Error::InvalidConfigValue { field, .. }) => assert_eq!(field, "header"),
                other => panic!("Expected InvalidConfigValue for {raw:?}, got {other:?}"),
            }
        }
    }
}
