//! Pagination module
//!
//! Drives continuation-token pagination against a remote listing operation.
//!
//! # Overview
//!
//! A [`PageFetcher`] performs one remote call for a given token. The
//! [`AutoPaginator`] calls it repeatedly, hands every page to a consumer, and
//! forwards the token returned by each page until the service stops returning
//! one. When the caller controls paging (a token was supplied explicitly or
//! automatic iteration was turned off), exactly one page is fetched.
//!
//! ```text
//!   ┌──────────┐  page   ┌────────────┐  token?  ┌──────────┐
//!   │ Fetching │ ──────► │ Delivering │ ───────► │ Continue │ ──┐
//!   └──────────┘         └────────────┘          └──────────┘   │
//!        ▲                     │ none / caller-controlled       │
//!        │                     ▼                                │
//!        │               ┌─────────┐                            │
//!        │               │ Stopped │ ◄── cancelled / failed     │
//!        │               └─────────┘                            │
//!        └──────────────────────────────────────────────────────┘
//! ```

mod paginator;
mod types;

pub use paginator::{fn_fetcher, AutoPaginator, FnFetcher, PageFetcher};
pub use types::{
    CancelFlag, NextPage, Page, PaginationPhase, PaginationState, PaginationSummary, PagingMode,
    StopReason,
};
