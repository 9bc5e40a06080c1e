use std::fmt::{Debug, Formatter};

use crate::utils::Redact;

/// Credential is the app identity issued by the open platform.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// App key, the public identifier sent as `app_key`.
    pub app_key: String,
    /// App secret, only ever used as the HMAC key.
    pub app_secret: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(app_key: impl Into<String>, app_secret: impl Into<String>) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
        }
    }

    /// A credential is usable when both parts are present.
    pub fn is_valid(&self) -> bool {
        !self.app_key.is_empty() && !self.app_secret.is_empty()
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("app_key", &self.app_key)
            .field("app_secret", &Redact::from(&self.app_secret))
            .finish()
    }
}
