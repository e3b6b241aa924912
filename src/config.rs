use std::{env, str::FromStr};

use anyhow::{Context, Result, bail};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";
const DEFAULT_PORT: u16 = 8080;
// Matches the backend's access token lifetime.
const DEFAULT_SESSION_TTL_DAYS: i64 = 1;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Runtime settings for the portal, read from the process environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub port: u16,
    pub session_ttl_days: i64,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            port: DEFAULT_PORT,
            session_ttl_days: DEFAULT_SESSION_TTL_DAYS,
            cookie_secure: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl PortalConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup. Unset keys fall back to defaults;
    /// set-but-invalid keys are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup("API_BASE_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or(defaults.api_base_url);

        let port = parse_var(&lookup, "PORT")?.unwrap_or(defaults.port);

        let session_ttl_days =
            parse_var(&lookup, "SESSION_TTL_DAYS")?.unwrap_or(defaults.session_ttl_days);
        if session_ttl_days <= 0 {
            bail!("SESSION_TTL_DAYS must be positive, got {session_ttl_days}");
        }

        let cookie_secure = match lookup("COOKIE_SECURE") {
            Some(raw) => parse_flag(&raw).context("COOKIE_SECURE has an invalid value")?,
            None => defaults.cookie_secure,
        };

        let max_upload_bytes =
            parse_var(&lookup, "MAX_UPLOAD_BYTES")?.unwrap_or(defaults.max_upload_bytes);
        if max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than zero");
        }

        Ok(Self {
            api_base_url,
            port,
            session_ttl_days,
            cookie_secure,
            max_upload_bytes,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} has an invalid value: {raw}"))
        })
        .transpose()
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "" | "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("expected a boolean flag, got `{other}`"),
    }
}
