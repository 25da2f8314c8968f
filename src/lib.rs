// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # connectkit
//!
//! Invoke paged JSON web service operations from a declarative catalog.
//! The bundled catalog describes Amazon Connect List/Search/Describe
//! operations.
//!
//! ## Features
//!
//! - **Sparse Requests**: nested request bodies built only from the fields the
//!   caller actually supplied; empty substructures are omitted
//! - **Auto-Pagination**: continuation tokens followed until the service runs
//!   out, or a single caller-controlled page
//! - **Declarative Catalog**: operations, parameters and token fields in YAML
//! - **Output Selection**: whole response, a response path, or a parameter
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use connectkit::catalog::load_service;
//! use connectkit::http::HttpClient;
//! use connectkit::operation::{bind_request, OperationFetcher};
//! use connectkit::pagination::AutoPaginator;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> connectkit::Result<()> {
//!     let service = load_service("connect")?;
//!     let op = service.operation("ListUsers")?.clone();
//!     let request = bind_request(&op, &[("InstanceId".into(), "my-instance".into())])?;
//!
//!     let endpoint = service.resolve_endpoint(Some("eu-west-2"))?;
//!     let client = HttpClient::with_config(service.http.to_client_config(endpoint, &service.headers))?;
//!
//!     let paginator = AutoPaginator::new(OperationFetcher::new(Arc::new(client), op, request));
//!     let summary = paginator
//!         .run(|page| {
//!             println!("{}", page.batch);
//!             Ok(())
//!         })
//!         .await?;
//!     println!("{} pages", summary.pages);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! parameters ──► bind_request ──► OperationFetcher ──► AutoPaginator ──► Selector ──► output
//!                (sparse build)   (HttpClient, retry)  (token loop)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Sparse object builder
pub mod sparse;

/// Auto-paginator
pub mod pagination;

/// HTTP client with retry and rate limiting
pub mod http;

/// URI path templates
pub mod template;

/// Declarative service catalogs
pub mod catalog;

/// Request binding and page fetching
pub mod operation;

/// Output selection
pub mod select;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use catalog::{load_service, load_service_from_str, ServiceDefinition};
pub use pagination::{AutoPaginator, Page, PageFetcher, PagingMode};
pub use sparse::{FieldSlot, SparseNode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
