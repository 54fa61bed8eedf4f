//! HTTP client module
//!
//! The [`Transport`] trait is what the lister talks to; [`HttpClient`] is
//! its production implementation with retries and a shared rate limiter.

mod client;
mod rate_limit;
mod transport;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use transport::{ApiRequest, ApiResponse, Transport};
