//! Porter HTTP client

pub mod error;
pub mod interceptor;

use crate::config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
use crate::store::{ACCESS_TOKEN_KEY, TokenStore};
use error::ClientError;
use interceptor::{BearerTokenInterceptor, RequestInterceptor};
use reqwest::{Client, ClientBuilder, Method, Request, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// API client that authenticates every request with the stored access token
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    interceptors: Arc<[Arc<dyn RequestInterceptor>]>,
}

impl ApiClient {
    /// Create a client bound to `base_url`, reading tokens from `store`.
    ///
    /// No network I/O happens here.
    pub fn new(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        let base_url = normalize_base_url(base_url.into());
        debug!(%base_url, "Created API client");
        let client = ClientBuilder::new()
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url,
            interceptors: Arc::from([
                Arc::new(BearerTokenInterceptor::new(store)) as Arc<dyn RequestInterceptor>
            ]),
        }
    }

    /// Create a client bound to [`DEFAULT_BASE_URL`]
    pub fn with_default_base_url(store: Arc<dyn TokenStore>) -> Self {
        Self::new(DEFAULT_BASE_URL, store)
    }

    /// Create a client from loaded configuration
    pub fn from_config(
        config: &ClientConfig,
        store: Arc<dyn TokenStore>,
    ) -> Result<Self, ClientError> {
        let mut builder = Self::builder()
            .base_url(&config.base_url)
            .token_key(&config.token_key)
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        builder.build(store)
    }

    /// Create a new client builder
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve `path` against the base URL. Absolute URLs are returned as-is.
    pub fn url(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        if path.is_empty() {
            return self.base_url.clone();
        }
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Create a request builder for `path`
    ///
    /// Authentication is added when the request is sent, not here.
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client.request(method, self.url(path))
    }

    /// Build the request and run every interceptor over it, without sending
    pub fn prepare(&self, request: RequestBuilder) -> Result<Request, ClientError> {
        let mut request = request.build()?;
        for interceptor in self.interceptors.iter() {
            request = interceptor.on_request(request)?;
        }
        Ok(request)
    }

    /// Intercept and dispatch a request, returning the raw response
    pub async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = self.prepare(request)?;
        Ok(self.client.execute(request).await?)
    }

    /// Execute a request and handle common errors
    ///
    /// An empty success body decodes as JSON `null`, so `()`, `Option<_>` and
    /// `serde_json::Value` all accept a `204 No Content`.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            if body.iter().all(u8::is_ascii_whitespace) {
                return Ok(serde_json::from_slice(b"null")?);
            }
            Ok(serde_json::from_slice(&body)?)
        } else {
            let message = response.text().await.unwrap_or_else(|_| status.to_string());
            Err(ClientError::from_status(status, message))
        }
    }

    /// GET `path` and decode the JSON response
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::GET, path)).await
    }

    /// POST a JSON body to `path`
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::POST, path).json(body)).await
    }

    /// PUT a JSON body to `path`
    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PUT, path).json(body)).await
    }

    /// PATCH `path` with a JSON body
    pub async fn patch<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(self.request(Method::PATCH, path).json(body)).await
    }

    /// DELETE `path`
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.execute(self.request(Method::DELETE, path)).await
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

/// Builder for ApiClient
#[derive(Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    token_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiClientBuilder {
    /// Set the base URL, defaults to [`DEFAULT_BASE_URL`]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the storage key the access token is read from
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = Some(key.into());
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Add an interceptor that runs after the bearer token one
    pub fn interceptor(mut self, interceptor: impl RequestInterceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Build the client
    pub fn build(self, store: Arc<dyn TokenStore>) -> Result<ApiClient, ClientError> {
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        validate_base_url(&base_url)?;
        let base_url = normalize_base_url(base_url);

        let mut client_builder = ClientBuilder::new();

        #[cfg(not(target_arch = "wasm32"))]
        if let Some(timeout) = self.timeout {
            client_builder = client_builder.timeout(timeout);
        }
        #[cfg(target_arch = "wasm32")]
        let _ = self.timeout; // Timeouts not supported on WASM

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        client_builder = client_builder.user_agent(user_agent);

        let client = client_builder.build()?;

        let token_key = self
            .token_key
            .unwrap_or_else(|| ACCESS_TOKEN_KEY.to_string());
        let mut interceptors: Vec<Arc<dyn RequestInterceptor>> =
            vec![Arc::new(BearerTokenInterceptor::with_key(store, token_key))];
        interceptors.extend(self.interceptors);

        debug!(%base_url, interceptors = interceptors.len(), "Built API client");

        Ok(ApiClient {
            client,
            base_url,
            interceptors: interceptors.into(),
        })
    }
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.get(..8).unwrap_or(path).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn normalize_base_url(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn validate_base_url(base_url: &str) -> Result<(), ClientError> {
    let parsed = url::Url::parse(base_url)
        .map_err(|e| ClientError::Configuration(format!("invalid base_url '{base_url}': {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ClientError::Configuration(format!(
            "unsupported base_url scheme '{scheme}'"
        ))),
    }
}
