//! Pre-configured HTTP client for the stock DCA analysis backend.
//!
//! [`ApiClient`] resolves every relative path against a fixed base address
//! and aborts any request that outlives the configured timeout. Network
//! failures, timeouts and non-2xx statuses are handed back as
//! [`ApiError::Http`] carrying the underlying `reqwest` error unchanged.
//!
//! [`get_http_client`] returns a process-wide handle built from the literal
//! defaults (`http://127.0.0.1:8002`, 10 s). Components that issue requests
//! should prefer taking an [`ApiClient`] or any [`JsonTransport`] so tests can
//! substitute a fake.

pub mod config;
pub mod error;
pub mod http_client;
pub mod models;
pub mod services;

pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ApiError, FailureKind};
pub use http_client::{get_http_client, ApiClient, ApiRequest, JsonTransport};
pub use services::StockApi;

pub use reqwest::{Method, Response, StatusCode};
