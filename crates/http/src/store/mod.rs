//! Persistent token storage
//!
//! The client only ever reads from a [`TokenStore`]. Writing a token is the job
//! of whatever performs the login flow, which is why the write helpers live on
//! the concrete stores rather than on the trait.

#[cfg(target_arch = "wasm32")]
mod browser;
#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTokenStore;
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

use std::sync::Arc;
use thiserror::Error;

/// Key the access token is stored under
pub const ACCESS_TOKEN_KEY: &str = "access";

/// Token store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be reached
    #[error("Token storage unavailable: {0}")]
    Unavailable(String),

    /// The backing storage exists but its contents cannot be decoded
    #[error("Token storage corrupted: {0}")]
    Corrupted(String),

    /// Filesystem error
    #[error("Token storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Synchronous key-value lookup for stored credentials
pub trait TokenStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing is stored
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

impl<T: TokenStore + ?Sized> TokenStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }
}
