//! Datadog API plumbing.
//!
//! [`http`] wraps reqwest with the authentication and logging conventions
//! shared by every endpoint; [`client`] layers the v1 endpoint URLs on top.

pub mod client;
pub mod http;

pub use client::ApiClient;
pub use http::response_errors;
