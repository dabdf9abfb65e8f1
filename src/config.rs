//! Environment configuration for the facade and the interactive client.
//!
//! Values are read once at start-up. Missing credentials are not rejected
//! here; calls that need them fail downstream.

use crate::ai::gemini::client::DEFAULT_BASE_URL;
use crate::{Error, Result};
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout: Option<Duration>,
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("gemini_api_key"))
            .unwrap_or_else(|| {
                tracing::warn!("GEMINI_API_KEY not set, oracle calls will fail");
                String::new()
            });

        let gemini_timeout = lookup("GEMINI_TIMEOUT_SECS")
            .map(|raw| parse_number::<u64>("GEMINI_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| Error::Config(format!("BIND_ADDR is not a socket address: {}", e)))?;

        let max_upload_bytes = lookup("MAX_UPLOAD_BYTES")
            .map(|raw| parse_number::<usize>("MAX_UPLOAD_BYTES", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            gemini_api_key,
            gemini_model: lookup("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: lookup("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            gemini_timeout,
            bind_addr,
            max_upload_bytes,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the facade, e.g. `http://127.0.0.1:8000`.
    pub api_base_url: String,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = lookup("API_BASE_URL").unwrap_or_else(|| {
            tracing::warn!("API_BASE_URL not set, requests to the API will fail");
            String::new()
        });
        Self { api_base_url }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| Error::Config(format!("{} must be a number: {}", key, e)))
}
