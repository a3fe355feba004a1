//! CLI commands

use anyhow::{Context, Result};
use clap::Subcommand;
use porter_http::{ApiClient, ClientConfig, ClientError, FileTokenStore, TokenStore};
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Subcommand)]
pub enum Commands {
    /// Send a GET request and print the JSON response
    Get {
        /// Path relative to the base URL, e.g. /orders
        path: String,
    },

    /// Send a request with an arbitrary method
    Request {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE, ...)
        #[arg(value_parser = parse_method)]
        method: Method,

        /// Path relative to the base URL
        path: String,

        /// JSON request body
        #[arg(long)]
        data: Option<String>,
    },

    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        command: TokenCommands,
    },
}

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Store an access token for subsequent requests
    Set {
        /// Token value
        token: String,
    },

    /// Remove the stored access token
    Clear,

    /// Report whether an access token is stored
    Status,
}

impl Commands {
    pub async fn execute(self, config: &ClientConfig) -> Result<()> {
        let store = open_store(config);

        match self {
            Commands::Get { path } => {
                let client = build_client(config, store)?;
                let body = send_request(&client, Method::GET, &path, None).await?;
                print_body(&body)
            }
            Commands::Request { method, path, data } => {
                let client = build_client(config, store)?;
                let body = send_request(&client, method, &path, data.as_deref()).await?;
                print_body(&body)
            }
            Commands::Token { command } => command.execute(&store, &config.token_key),
        }
    }
}

impl TokenCommands {
    pub fn execute(self, store: &FileTokenStore, key: &str) -> Result<()> {
        match self {
            TokenCommands::Set { token } => {
                let token = token.trim();
                if token.is_empty() {
                    anyhow::bail!("Refusing to store an empty token");
                }
                store
                    .set(key, token)
                    .with_context(|| format!("Failed to write {}", store.path().display()))?;
                info!(path = %store.path().display(), "Stored access token");
                println!("Access token stored in {}", store.path().display());
            }
            TokenCommands::Clear => {
                let removed = store
                    .remove(key)
                    .with_context(|| format!("Failed to update {}", store.path().display()))?;
                if removed.is_some() {
                    println!("Access token removed");
                } else {
                    println!("No access token stored");
                }
            }
            TokenCommands::Status => match store.get(key)? {
                Some(token) if !token.is_empty() => {
                    println!("Access token stored in {}", store.path().display())
                }
                _ => println!("No access token stored"),
            },
        }
        Ok(())
    }
}

fn parse_method(s: &str) -> Result<Method, String> {
    Method::from_bytes(s.to_ascii_uppercase().as_bytes())
        .map_err(|_| format!("invalid HTTP method '{s}'"))
}

fn open_store(config: &ClientConfig) -> FileTokenStore {
    match &config.storage_path {
        Some(path) => FileTokenStore::new(path),
        None => FileTokenStore::open_default(),
    }
}

fn build_client(config: &ClientConfig, store: FileTokenStore) -> Result<ApiClient> {
    ApiClient::from_config(config, Arc::new(store)).context("Failed to create API client")
}

/// Send a request through the client and decode the body.
///
/// Empty bodies decode as `null` and non-JSON bodies as a JSON string.
async fn send_request(
    client: &ApiClient,
    method: Method,
    path: &str,
    data: Option<&str>,
) -> Result<Value> {
    let mut request = client.request(method.clone(), path);
    if let Some(data) = data {
        let body: Value = serde_json::from_str(data).context("--data is not valid JSON")?;
        request = request.json(&body);
    }

    debug!(%method, url = %client.url(path), "Sending request");
    let response = client.send(request).await?;
    let status = response.status();
    let text = response.text().await.map_err(ClientError::from)?;

    if !status.is_success() {
        let message = if text.is_empty() {
            status.to_string()
        } else {
            text
        };
        return Err(ClientError::from_status(status, message).into());
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn print_body(body: &Value) -> Result<()> {
    match body {
        Value::Null => {}
        Value::String(text) => println!("{text}"),
        other => println!("{}", serde_json::to_string_pretty(other)?),
    }
    Ok(())
}
