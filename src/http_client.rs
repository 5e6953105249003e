use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

static HTTP_CLIENT: Lazy<ApiClient> = Lazy::new(|| {
    ApiClient::new(ClientConfig::default()).expect("Failed to create HTTP client")
});

/// Process-wide handle built from the literal default configuration.
pub fn get_http_client() -> &'static ApiClient {
    &HTTP_CLIENT
}

/// Method, path, query parameters and optional JSON body of one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Pre-configured HTTP client. Clones share the same configuration and
/// connection pool, so it can be handed to any number of call sites.
#[derive(Clone, Debug)]
pub struct ApiClient {
    inner: Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        // Zero means no deadline.
        if !config.timeout().is_zero() {
            builder = builder.timeout(config.timeout());
        }
        let inner = builder.build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.config.resolve(path)
    }

    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.inner.request(method, self.url(path)?))
    }

    /// Sends a prepared request. Non-2xx statuses are rejected with the
    /// library's own status error.
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        Ok(response.error_for_status()?)
    }

    pub async fn execute(&self, request: ApiRequest) -> Result<Response, ApiError> {
        let mut builder = self.request(request.method, &request.path)?;
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.fetch_json(self.request(Method::GET, path)?).await
    }

    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.fetch_json(self.request(Method::GET, path)?.query(query))
            .await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_json(self.request(Method::POST, path)?.json(body))
            .await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_json(self.request(Method::PUT, path)?.json(body))
            .await
    }

    /// DELETE responses frequently have no body, so the raw response is
    /// returned.
    pub async fn delete(&self, path: &str) -> Result<Response, ApiError> {
        self.send(self.request(Method::DELETE, path)?).await
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Anything able to carry an [`ApiRequest`] and hand back the decoded JSON
/// body. Lets the endpoint layer run against a fake in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonTransport: Send + Sync {
    async fn send_json(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[async_trait]
impl JsonTransport for ApiClient {
    async fn send_json(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let response = self.execute(request).await?;
        let bytes = response.bytes().await?;

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl<T: JsonTransport + ?Sized> JsonTransport for &T {
    async fn send_json(&self, request: ApiRequest) -> Result<Value, ApiError> {
        (**self).send_json(request).await
    }
}
