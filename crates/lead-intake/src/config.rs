//! Intake configuration
//!
//! Read from the environment once per process. A missing backend base URL is
//! not an error here; it surfaces as a configuration failure on submit.

use std::sync::OnceLock;
use std::time::Duration;

use url::Url;

use crate::domain::value_objects::{normalize_prefix, DEFAULT_LEAD_PREFIX};

pub const API_BASE_ENV: &str = "LEAD_INTAKE_API_BASE";
pub const LEAD_PREFIX_ENV: &str = "LEAD_INTAKE_PREFIX";
pub const TIMEOUT_ENV: &str = "LEAD_INTAKE_TIMEOUT_SECS";

/// Path of the lead creation endpoint, relative to the API base
pub const LEADS_PATH: &str = "/api/commerce/workflow/revenue/leads";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

static GLOBAL: OnceLock<IntakeConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeConfig {
    /// Backend base URL (`API_BASE`)
    pub api_base: Option<Url>,
    /// Prefix for generated lead ids
    pub lead_prefix: String,
    /// Upper bound for one submission round trip
    pub request_timeout: Duration,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            api_base: None,
            lead_prefix: DEFAULT_LEAD_PREFIX.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl IntakeConfig {
    /// Configuration shared by the whole process: the one installed by the
    /// host, else read from the environment on first use
    pub fn global() -> &'static IntakeConfig {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Make this the process-wide configuration. The first install (or
    /// first [`global`](Self::global) read) wins; returns the one in effect.
    pub fn install(self) -> &'static IntakeConfig {
        if GLOBAL.set(self).is_err() {
            tracing::warn!("Intake configuration already loaded, keeping the first one");
        }
        Self::global()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(API_BASE_ENV).filter(|v| !v.trim().is_empty()) {
            match parse_base(&raw) {
                Ok(url) => config.api_base = Some(url),
                Err(e) => tracing::warn!("Ignoring {}: {}", API_BASE_ENV, e),
            }
        }

        if let Some(raw) = lookup(LEAD_PREFIX_ENV).filter(|v| !v.trim().is_empty()) {
            match normalize_prefix(&raw) {
                Some(prefix) => config.lead_prefix = prefix,
                None => tracing::warn!("Ignoring {}={:?}, using {}", LEAD_PREFIX_ENV, raw, DEFAULT_LEAD_PREFIX),
            }
        }

        if let Some(raw) = lookup(TIMEOUT_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.request_timeout = Duration::from_secs(secs),
                _ => tracing::warn!("Ignoring {}={:?}, using default timeout", TIMEOUT_ENV, raw),
            }
        }

        config
    }

    /// Set the API base from a string
    pub fn with_api_base(mut self, base: &str) -> Result<Self, ConfigError> {
        self.api_base = Some(parse_base(base)?);
        Ok(self)
    }

    /// Set the lead id prefix. Only `A-Z` and `-` are allowed after
    /// normalizing; anything else falls back to the default prefix.
    pub fn with_lead_prefix(mut self, prefix: &str) -> Self {
        self.lead_prefix = normalize_prefix(prefix).unwrap_or_else(|| {
            tracing::warn!("Invalid lead id prefix {:?}, using {}", prefix, DEFAULT_LEAD_PREFIX);
            DEFAULT_LEAD_PREFIX.to_string()
        });
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the lead creation endpoint
    pub fn leads_endpoint(&self) -> Result<Url, ConfigError> {
        let base = self.api_base.as_ref().ok_or(ConfigError::MissingApiBase)?;
        let joined = format!("{}{}", base.as_str().trim_end_matches('/'), LEADS_PATH);
        Url::parse(&joined).map_err(|e| ConfigError::InvalidApiBase(e.to_string()))
    }
}

fn parse_base(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::InvalidApiBase(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidApiBase(format!("unsupported scheme {}", other))),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("backend base URL is not configured (set LEAD_INTAKE_API_BASE)")]
    MissingApiBase,

    #[error("invalid backend base URL: {0}")]
    InvalidApiBase(String),
}
