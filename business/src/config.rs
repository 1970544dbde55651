use std::env::vars;

use anyhow::Context as _;
use serde::Deserialize;
use ustr::Ustr;

use crate::portal::Partner;
use crate::session::AuthSession;

/// Environment variable overriding the API host.
pub const API_URL_ENV: &str = "PORTAL_API_URL";
/// Bearer token handed over by the sign-in flow.
pub const TOKEN_ENV: &str = "PORTAL_TOKEN";
pub const USER_ENV: &str = "PORTAL_USER";
/// JSON list of the partners the account may act for.
pub const PARTNERS_ENV: &str = "PORTAL_PARTNERS";

const DEFAULT_USER_NAME: &str = "Partner";

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

pub const DEFAULT_API_PREFIX: &str = "/v3/partnerPortal";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessConfig {
    pub api_base_url: String,
    /// Path every partner portal endpoint lives under.
    pub api_prefix: String,
}

impl BusinessConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
        }
    }

    pub fn api_url(&self) -> Ustr {
        Ustr::from(&format!("{}{}", self.api_base_url, self.api_prefix))
    }

    /// Full URL for an endpoint path such as `/users`.
    pub fn endpoint(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{path}", self.api_url())
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL)
    }
}

// Environment variables as they arrive, before defaults are applied.
#[derive(Default, Deserialize)]
pub struct RawConfig {
    portal_api_url: Option<String>,
    portal_token: Option<String>,
    portal_user: Option<String>,
    portal_partners: Option<String>,
}

impl RawConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        log::info!("Loading portal configuration from environment variables");
        Self::from_vars(vars())
    }

    pub fn from_vars<I, S>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        Ok(serde_env::from_iter(vars)?)
    }

    /// API location, falling back to [`DEFAULT_API_BASE_URL`].
    pub fn business_config(&self) -> BusinessConfig {
        match self.portal_api_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => BusinessConfig::new(url),
            _ => {
                log::info!("{API_URL_ENV} not set, defaulting to {DEFAULT_API_BASE_URL}");
                BusinessConfig::default()
            }
        }
    }

    /// Session handed over by the sign-in flow.
    pub fn session(&self) -> anyhow::Result<AuthSession> {
        let token = self
            .portal_token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .with_context(|| format!("{TOKEN_ENV} must be set"))?;
        let user = self.portal_user.as_deref().unwrap_or(DEFAULT_USER_NAME);
        let partners = match self.portal_partners.as_deref() {
            Some(raw) => serde_json::from_str::<Vec<Partner>>(raw)
                .with_context(|| format!("{PARTNERS_ENV} must be a JSON list of partners"))?,
            None => Vec::new(),
        };
        if partners.is_empty() {
            log::warn!("{PARTNERS_ENV} lists no partners, pages will stay empty");
        }
        Ok(AuthSession::new(token, user, partners))
    }
}
