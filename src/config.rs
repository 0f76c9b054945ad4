//! Service settings.
//!
//! Loaded once at startup (after `.env`) and passed by value into the
//! components that need it. Components never read the environment themselves.

use crate::normalize::DEFAULT_MAX_CHARS;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama2";
const DEFAULT_TIMEOUT_SECS: u64 = 300;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Inference server base URL, without trailing slash.
    pub ollama_url: String,
    pub model: String,
    pub inference_timeout: Duration,
    pub max_chars: usize,
    /// Directory for request-scoped upload files.
    pub upload_dir: PathBuf,
    pub bind_addr: String,
    pub max_upload_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            inference_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_chars: DEFAULT_MAX_CHARS,
            upload_dir: PathBuf::from(DEFAULT_UPLOAD_DIR),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl Settings {
    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup, falling back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let ollama_url = get("OLLAMA_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.ollama_url);

        let inference_timeout = match get("INFERENCE_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_var("INFERENCE_TIMEOUT_SECS", &raw)?),
            None => defaults.inference_timeout,
        };

        let max_chars = match get("MAX_CHARS") {
            Some(raw) => parse_var("MAX_CHARS", &raw)?,
            None => defaults.max_chars,
        };
        if max_chars == 0 {
            anyhow::bail!("MAX_CHARS must be greater than zero");
        }

        let max_upload_bytes = match get("MAX_UPLOAD_BYTES") {
            Some(raw) => parse_var("MAX_UPLOAD_BYTES", &raw)?,
            None => defaults.max_upload_bytes,
        };

        Ok(Self {
            ollama_url,
            model: get("OLLAMA_MODEL").unwrap_or(defaults.model),
            inference_timeout,
            max_chars,
            upload_dir: get("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            bind_addr: get("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_upload_bytes,
        })
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>()
        .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(|_| None).unwrap();
        assert_eq!(settings.ollama_url, "http://localhost:11434");
        assert_eq!(settings.model, "llama2");
        assert_eq!(settings.inference_timeout, Duration::from_secs(300));
        assert_eq!(settings.max_chars, 12_000);
        assert_eq!(settings.upload_dir, PathBuf::from("uploads"));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("OLLAMA_API_URL", "http://gpu-box:11434/"),
            ("OLLAMA_MODEL", "mistral"),
            ("INFERENCE_TIMEOUT_SECS", "30"),
            ("MAX_CHARS", "500"),
            ("UPLOAD_DIR", "/tmp/doc-uploads"),
            ("BIND_ADDR", "127.0.0.1:8080"),
        ]))
        .unwrap();
        assert_eq!(settings.ollama_url, "http://gpu-box:11434");
        assert_eq!(settings.model, "mistral");
        assert_eq!(settings.inference_timeout, Duration::from_secs(30));
        assert_eq!(settings.max_chars, 500);
        assert_eq!(settings.upload_dir, PathBuf::from("/tmp/doc-uploads"));
        assert_eq!(settings.bind_addr, "127.0.0.1:8080");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[("OLLAMA_MODEL", "  ")])).unwrap();
        assert_eq!(settings.model, "llama2");
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = Settings::from_lookup(lookup_from(&[("MAX_CHARS", "lots")])).unwrap_err();
        assert!(err.to_string().contains("MAX_CHARS"));
        assert!(Settings::from_lookup(lookup_from(&[("INFERENCE_TIMEOUT_SECS", "-1")])).is_err());
        assert!(Settings::from_lookup(lookup_from(&[("MAX_CHARS", "0")])).is_err());
    }
}
