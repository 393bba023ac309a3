//! HTTP layer: `InfoHttp` for the `/info` endpoint, with retry policies.

pub mod client;
pub mod retry;

pub use client::InfoHttp;
pub use retry::{RetryConfig, RetryPolicy};
