//! Operation invocation
//!
//! Binds raw `NAME=VALUE` parameters to an operation's HTTP request and
//! fetches its pages.
//!
//! # Overview
//!
//! - [`bind_request`] types each supplied value, declares every other
//!   parameter absent, and builds the URI path, query string and JSON body
//!   with the sparse object builder.
//! - [`OperationFetcher`] implements [`PageFetcher`](crate::pagination::PageFetcher)
//!   by injecting the continuation token into the bound request and reading
//!   the next token from the response.

mod binding;
mod fetcher;

pub use binding::{bind_request, parse_assignment, parse_value, BoundRequest};
pub use fetcher::OperationFetcher;
