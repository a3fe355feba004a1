//! Porter HTTP client
//!
//! An HTTP client bound to a fixed base URL that reads a bearer token from
//! local persistent storage and attaches it to every outgoing request.
//!
//! ```no_run
//! use std::sync::Arc;
//! use porter_http::{ApiClient, MemoryTokenStore, ACCESS_TOKEN_KEY};
//!
//! # async fn run() -> Result<(), porter_http::ClientError> {
//! let store = Arc::new(MemoryTokenStore::with_entry(ACCESS_TOKEN_KEY, "abc123"));
//! let client = ApiClient::with_default_base_url(store);
//! let orders: serde_json::Value = client.get("/orders").await?;
//! println!("{orders}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod store;

pub use client::error::ClientError;
pub use client::interceptor::{BearerTokenInterceptor, RequestInterceptor};
pub use client::{ApiClient, ApiClientBuilder};
pub use crate::config::{ClientConfig, DEFAULT_BASE_URL};
#[cfg(target_arch = "wasm32")]
pub use store::BrowserTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileTokenStore;
pub use store::{ACCESS_TOKEN_KEY, MemoryTokenStore, StoreError, TokenStore};
