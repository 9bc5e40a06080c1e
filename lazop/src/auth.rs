//! OAuth flow of the open platform.

use std::fmt::{Debug, Formatter};

use chrono::TimeDelta;
use http::Method;
use serde::Deserialize;

use lazop_core::time::{now, DateTime};
use lazop_core::utils::Redact;
use lazop_core::{Error, Params, Result};

use crate::constants::*;
use crate::Client;

/// Token is returned by the OAuth flow and binds a client to one merchant.
///
/// Expiry is computed from the time we retrieved the token plus the
/// declared lifetime, never from a server supplied timestamp.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct Token {
    /// Seller id of the account.
    pub account_id: String,
    /// Login of the account, usually an email.
    pub account: String,
    /// Country of the account, like `sg`.
    pub country: String,
    /// Platform of the account, like `seller_center`.
    pub account_platform: String,

    /// Token sent as `access_token`.
    pub access_token: String,
    /// Token used to get a new access token.
    pub refresh_token: String,

    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// Lifetime of the refresh token in seconds.
    pub refresh_expires_in: i64,

    #[serde(skip)]
    retrieved_at: DateTime,
}

impl Token {
    /// Set the time this token was retrieved at.
    pub fn with_retrieved_at(mut self, time: DateTime) -> Self {
        self.retrieved_at = time;
        self
    }

    /// The time this token was retrieved at.
    pub fn retrieved_at(&self) -> DateTime {
        self.retrieved_at
    }

    /// The point in time the access token expires.
    pub fn expires_at(&self) -> DateTime {
        add_seconds(self.retrieved_at, self.expires_in)
    }

    /// The point in time the refresh token expires.
    pub fn refresh_expires_at(&self) -> DateTime {
        add_seconds(self.retrieved_at, self.refresh_expires_in)
    }

    /// Check if the access token can be used right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now())
    }

    /// Check if the access token can be used at `time`.
    pub fn is_valid_at(&self, time: DateTime) -> bool {
        !self.access_token.is_empty() && time < self.expires_at()
    }
}

/// Lifetimes come from the server, so out of range values saturate instead
/// of overflowing.
fn add_seconds(t: DateTime, secs: i64) -> DateTime {
    let saturated = if secs < 0 {
        DateTime::MIN_UTC
    } else {
        DateTime::MAX_UTC
    };

    TimeDelta::try_seconds(secs)
        .and_then(|d| t.checked_add_signed(d))
        .unwrap_or(saturated)
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Token")
            .field("account_id", &self.account_id)
            .field("account", &self.account)
            .field("country", &self.country)
            .field("account_platform", &self.account_platform)
            .field("access_token", &Redact::from(&self.access_token))
            .field("refresh_token", &Redact::from(&self.refresh_token))
            .field("expires_in", &self.expires_in)
            .field("refresh_expires_in", &self.refresh_expires_in)
            .field("retrieved_at", &self.retrieved_at)
            .finish()
    }
}

impl Client {
    /// Build the url a seller should visit to start the OAuth flow.
    ///
    /// `redirect` is where the seller gets sent back with a `code`, and
    /// `state` should be a random string checked on return.
    pub fn auth_url(&self, redirect: &str, state: &str) -> String {
        let mut params = Params::new();
        params.set("client_id", &self.credential().app_key);
        params.set("redirect_uri", redirect);
        params.set("response_type", "code");
        params.set("state", state);

        format!("{AUTHORIZE_URL}?{}", params.encode())
    }

    /// Exchange the OAuth `code` for a token.
    pub async fn exchange(&self, code: &str) -> Result<Token> {
        self.fetch_token(ACCESS_TOKEN_URL, "code", code).await
    }

    /// Get a new token with `refresh_token`.
    ///
    /// The returned token is brand-new; nothing held by this client changes.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Token> {
        self.fetch_token(REFRESH_TOKEN_URL, "refresh_token", refresh_token)
            .await
    }

    /// Token endpoints put the token next to `code` instead of under `data`,
    /// so the whole body is decoded.
    async fn fetch_token(&self, url: &str, key: &str, value: &str) -> Result<Token> {
        let mut query = Params::new();
        query.set(key, value);

        let req = self.new_request(Method::GET, &format!("{url}?{}", query.encode()))?;
        let (_, body) = self.send_raw(req).await?;

        let token: Token = serde_json::from_slice(&body).map_err(|e| {
            Error::malformed_response("cant unmarshal token").with_source(e)
        })?;
        Ok(token.with_retrieved_at(self.signer().now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazop_core::time::from_timestamp_millis;
    use lazop_core::{Context, Credential};
    use pretty_assertions::assert_eq;

    use crate::Region;

    fn token(access_token: &str, expires_in: i64) -> Result<(Token, DateTime)> {
        let t = from_timestamp_millis(1539870185083)?;
        let token = Token {
            access_token: access_token.to_string(),
            refresh_token: "refresh".to_string(),
            expires_in,
            refresh_expires_in: 2592000,
            ..Default::default()
        }
        .with_retrieved_at(t);
        Ok((token, t))
    }

    #[test]
    fn test_token_validity_window() -> Result<()> {
        let (token, t) = token("faketoken", 3600)?;

        assert_eq!(token.expires_at(), t + TimeDelta::seconds(3600));
        assert_eq!(token.refresh_expires_at(), t + TimeDelta::days(30));
        assert!(token.is_valid_at(t + TimeDelta::seconds(3599)));
        assert!(!token.is_valid_at(t + TimeDelta::seconds(3600)));
        assert!(!token.is_valid_at(t + TimeDelta::seconds(3601)));
        Ok(())
    }

    #[test]
    fn test_huge_lifetimes_saturate() -> Result<()> {
        let token: Token = serde_json::from_str(
            r#"{"access_token":"x","expires_in":9223372036854775807,"refresh_expires_in":100000000000000}"#,
        )
        .expect("must decode");
        let t = from_timestamp_millis(1539870185083)?;
        let token = token.with_retrieved_at(t);

        assert_eq!(token.expires_at(), DateTime::MAX_UTC);
        assert_eq!(token.refresh_expires_at(), DateTime::MAX_UTC);
        assert!(token.is_valid_at(t));
        assert!(token.is_valid());

        let expired = Token {
            expires_in: i64::MIN,
            ..token
        };
        assert_eq!(expired.expires_at(), DateTime::MIN_UTC);
        assert!(!expired.is_valid_at(t));
        Ok(())
    }

    #[test]
    fn test_empty_token_is_never_valid() -> Result<()> {
        let (token, t) = token("", 3600)?;

        assert!(!token.is_valid_at(t));
        assert!(!token.is_valid_at(t + TimeDelta::seconds(1)));
        assert!(!token.is_valid());
        Ok(())
    }

    #[test]
    fn test_token_debug_is_redacted() -> Result<()> {
        let (token, _) = token("50001500f08BWVnreeai1ffde6e2Tekwfrxk6eFpBqrzHKdtH1izvoEZQDQrd", 3600)?;
        let out = format!("{token:?}");

        assert!(out.contains("500***Qrd"));
        assert!(!out.contains("50001500f08BWVnreeai1ffde6e2Tekwfrxk6eFpBqrzHKdtH1izvoEZQDQrd"));
        Ok(())
    }

    #[test]
    fn test_auth_url() {
        let client = Client::new(
            Context::new(),
            Credential::new("123456", "testsecretnotarealsecret"),
            Region::Singapore,
        );

        assert_eq!(
            client.auth_url("https://example.com/callback?x=1", "s t"),
            "https://auth.lazada.com/oauth/authorize?client_id=123456\
             &redirect_uri=https%3A%2F%2Fexample.com%2Fcallback%3Fx%3D1\
             &response_type=code&state=s+t"
        );
    }
}
