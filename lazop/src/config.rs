use std::fmt::{Debug, Formatter};

use lazop_core::utils::Redact;
use lazop_core::{Context, Credential, Error, Result};

use crate::constants::*;
use crate::Region;

/// Config carries all the configuration for a [`crate::Client`].
#[derive(Clone, Default)]
pub struct Config {
    /// `app_key` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`LAZADA_APP_KEY`]
    pub app_key: Option<String>,
    /// `app_secret` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`LAZADA_APP_SECRET`]
    pub app_secret: Option<String>,
    /// `region` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`LAZADA_REGION`], a two letter code like `sg`
    pub region: Option<Region>,
    /// `access_token` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`LAZADA_ACCESS_TOKEN`]
    pub access_token: Option<String>,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set app_key
    pub fn with_app_key(mut self, app_key: impl Into<String>) -> Self {
        self.app_key = Some(app_key.into());
        self
    }

    /// Set app_secret
    pub fn with_app_secret(mut self, app_secret: impl Into<String>) -> Self {
        self.app_secret = Some(app_secret.into());
        self
    }

    /// Set region
    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    /// Set access_token
    pub fn with_access_token(mut self, access_token: impl Into<String>) -> Self {
        self.access_token = Some(access_token.into());
        self
    }

    /// Load config from env.
    ///
    /// Values already set take precedence over env.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if let Some(v) = ctx.env_var(LAZADA_APP_KEY) {
            self.app_key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(LAZADA_APP_SECRET) {
            self.app_secret.get_or_insert(v);
        }
        if self.region.is_none() {
            if let Some(v) = ctx.env_var(LAZADA_REGION) {
                self.region = Some(v.parse()?);
            }
        }
        if let Some(v) = ctx.env_var(LAZADA_ACCESS_TOKEN) {
            self.access_token.get_or_insert(v);
        }

        Ok(self)
    }

    /// Build the app credential out of this config.
    pub fn credential(&self) -> Result<Credential> {
        let app_key = self
            .app_key
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("app_key is required"))?;
        let app_secret = self
            .app_secret
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config_invalid("app_secret is required"))?;

        Ok(Credential::new(app_key, app_secret))
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("app_key", &self.app_key)
            .field("app_secret", &self.app_secret.as_ref().map(Redact::from))
            .field("region", &self.region)
            .field("access_token", &self.access_token.as_ref().map(Redact::from))
            .finish()
    }
}
