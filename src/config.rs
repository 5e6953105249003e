use crate::error::ApiError;
use reqwest::Url;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8002";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

const BASE_URL_VAR: &str = "STOCK_API_BASE_URL";
const TIMEOUT_VAR: &str = "STOCK_API_TIMEOUT_MS";

/// Base address and timeout shared by every request issued through an
/// [`ApiClient`](crate::ApiClient). Immutable once built. A zero timeout
/// disables the deadline.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Validates `base_url` as an absolute http(s) prefix. Trailing slashes
    /// are dropped so that paths can be appended verbatim.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let trimmed = base_url.trim().trim_end_matches('/');

        let parsed = Url::parse(trimmed).map_err(|source| ApiError::InvalidUrl {
            input: base_url.to_string(),
            source,
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ApiError::Config(format!(
                "base URL must use http or https, got {:?}",
                parsed.scheme()
            )));
        }
        if parsed.host().is_none() {
            return Err(ApiError::Config(format!(
                "base URL {:?} has no host",
                base_url
            )));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(ApiError::Config(format!(
                "base URL {:?} must not carry a query or fragment",
                base_url
            )));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
            timeout,
        })
    }

    pub fn with_timeout_ms(base_url: &str, timeout_ms: u64) -> Result<Self, ApiError> {
        Self::new(base_url, Duration::from_millis(timeout_ms))
    }

    /// Reads `STOCK_API_BASE_URL` and `STOCK_API_TIMEOUT_MS` (after loading a
    /// `.env` file if present), falling back to the literal defaults.
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_ms = match lookup(TIMEOUT_VAR) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                ApiError::Config(format!(
                    "{} must be a whole number of milliseconds, got {:?}",
                    TIMEOUT_VAR, raw
                ))
            })?,
            None => DEFAULT_TIMEOUT_MS,
        };

        Self::with_timeout_ms(&base_url, timeout_ms)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolves `path` against the base address. Absolute URLs pass through
    /// untouched; anything else is appended to the base with exactly one
    /// slash at the seam.
    pub fn resolve(&self, path: &str) -> Result<Url, ApiError> {
        let joined = if is_absolute_url(path) {
            path.to_string()
        } else if path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        };

        Url::parse(&joined).map_err(|source| ApiError::InvalidUrl {
            input: joined,
            source,
        })
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

fn is_absolute_url(path: &str) -> bool {
    match path.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            chars.next().is_some_and(|c| c.is_ascii_alphabetic())
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}
