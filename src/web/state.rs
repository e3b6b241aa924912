use anyhow::{Context, Result};

use crate::{api::ApiClient, config::PortalConfig, web::cookies::CookieSettings};

#[derive(Clone)]
pub struct AppState {
    api: ApiClient,
    cookies: CookieSettings,
    max_upload_bytes: usize,
}

impl AppState {
    pub fn new(config: &PortalConfig) -> Result<Self> {
        let api = ApiClient::new(&config.api_base_url)
            .context("failed to initialize backend client")?;
        Ok(Self::from_parts(api, config))
    }

    /// Build state around an existing client, e.g. one pointed at a test backend.
    pub fn from_parts(api: ApiClient, config: &PortalConfig) -> Self {
        Self {
            api,
            cookies: CookieSettings {
                ttl_days: config.session_ttl_days,
                secure: config.cookie_secure,
            },
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn cookie_settings(&self) -> CookieSettings {
        self.cookies
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}
