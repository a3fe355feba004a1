//! Request interceptors run on every outgoing request before dispatch

use super::error::ClientError;
use crate::store::{ACCESS_TOKEN_KEY, TokenStore};
use reqwest::Request;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use std::sync::Arc;
use tracing::trace;

/// Hook invoked on a built request right before it is handed to the transport.
///
/// Returning an error rejects the request; it is never sent.
pub trait RequestInterceptor: Send + Sync {
    fn on_request(&self, request: Request) -> Result<Request, ClientError>;
}

impl<F> RequestInterceptor for F
where
    F: Fn(Request) -> Result<Request, ClientError> + Send + Sync,
{
    fn on_request(&self, request: Request) -> Result<Request, ClientError> {
        self(request)
    }
}

/// Sets `Authorization: Bearer <token>` from a [`TokenStore`]
#[derive(Clone)]
pub struct BearerTokenInterceptor {
    store: Arc<dyn TokenStore>,
    key: String,
}

impl BearerTokenInterceptor {
    /// Read the token under [`ACCESS_TOKEN_KEY`]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_key(store, ACCESS_TOKEN_KEY)
    }

    /// Read the token under a custom key
    pub fn with_key(store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key the token is read from
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl RequestInterceptor for BearerTokenInterceptor {
    fn on_request(&self, mut request: Request) -> Result<Request, ClientError> {
        let token = match self.store.get(&self.key)? {
            Some(token) if !token.is_empty() => token,
            _ => {
                trace!(url = %request.url(), "No access token stored, sending unauthenticated");
                return Ok(request);
            }
        };

        let mut value =
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| ClientError::InvalidToken)?;
        value.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, value);

        trace!(url = %request.url(), "Attached bearer token");
        Ok(request)
    }
}

impl std::fmt::Debug for BearerTokenInterceptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerTokenInterceptor")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
