//! HTTP transport module
//!
//! Carries operation requests to the service endpoint.
//!
//! # Features
//!
//! - **Automatic Retries**: throttling, 5xx, timeouts and connection errors
//! - **Rate Limiting**: token bucket rate limiter using governor
//! - **Backoff Strategies**: constant, linear and exponential backoff

mod client;
mod rate_limit;

pub use client::{validate_header, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
