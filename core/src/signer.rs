use std::fmt::{Debug, Formatter};

use crate::sign::{signature, ACCESS_TOKEN, APP_KEY, SIGN, SIGN_METHOD, SIGN_METHOD_SHA256, TIMESTAMP};
use crate::time::{format_timestamp_millis, now, DateTime};
use crate::utils::Redact;
use crate::{Credential, Params, Result, SigningRequest};

/// Signer fills in the mandatory parameters of a call and signs them.
///
/// Signer is an immutable value: binding a token or pinning the time
/// returns a new signer.
#[derive(Clone)]
pub struct Signer {
    credential: Credential,
    access_token: Option<String>,
    time: Option<DateTime>,
}

impl Signer {
    /// Create a new signer for the given app credential.
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            access_token: None,
            time: None,
        }
    }

    /// Bind a merchant access token, which will be sent as `access_token`.
    ///
    /// An empty token leaves the signer unbound.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.access_token = if token.is_empty() { None } else { Some(token) };
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The app credential.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// The bound access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// The signing time: the pinned time if any, otherwise the current time.
    pub fn now(&self) -> DateTime {
        self.time.unwrap_or_else(now)
    }

    /// Populate the mandatory parameters, then add `sign`.
    ///
    /// `api` is the path without host and `/rest` prefix, like `/brands/get`.
    /// `params` must not be changed after this call or the signature breaks.
    pub fn sign_params(&self, api: &str, params: &mut Params) {
        let now = self.now();

        params.set(APP_KEY, &self.credential.app_key);
        params.set(SIGN_METHOD, SIGN_METHOD_SHA256);
        params.set(TIMESTAMP, format_timestamp_millis(now));
        if let Some(token) = &self.access_token {
            params.set(ACCESS_TOKEN, token);
        }
        // A stale signature must never take part in the new one.
        params.remove(SIGN);

        let sig = signature(&self.credential.app_secret, api, params);
        params.set(SIGN, sig);
    }

    /// Sign a request that carries all its parameters in the url query.
    pub fn sign_query(&self, parts: &mut http::request::Parts) -> Result<()> {
        let mut ctx = SigningRequest::build(parts)?;

        let api = ctx.api().to_string();
        self.sign_params(&api, &mut ctx.params);

        ctx.apply(parts)
    }
}

impl Debug for Signer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("credential", &self.credential)
            .field("access_token", &self.access_token.as_ref().map(Redact::from))
            .field("time", &self.time)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::from_timestamp_millis;
    use pretty_assertions::assert_eq;

    // Captured from a call accepted by the live service.
    const CREATE_PRODUCT_PAYLOAD: &str = "%3C%3Fxml+version%3D%221.0%22+encoding%3D%22UTF-8%22%3F%3E%0A%3CRequest%3E%0A++++%3CProduct%3E%0A++++++++%3CAttributes%3E%0A++++++++++++%3Cname%3Etest+product+creation%3C%2Fname%3E%0A++++++++++++%3Cbrand%3EKid+Basix%3C%2Fbrand%3E%0A++++++++++++%3Cmaterial%3ECotton%3C%2Fmaterial%3E%0A++++++++++++%3Cwaterproof%3Ewaterproof%3C%2Fwaterproof%3E%0A++++++++++++%3Cwarranty_type%3ELocal+%28Singapore%29+manufacturer+warranty%3C%2Fwarranty_type%3E%0A++++++++++++%3Cwarranty%3E1+month%3C%2Fwarranty%3E%0A++++++++++++%3Cshort_description%3Etest+product+highlights%3C%2Fshort_description%3E%0A++++++++++++%3Cdescription%3Etest+product+description%3C%2Fdescription%3E%0A++++++++++++%3Cmodel%3Etest+model%3C%2Fmodel%3E%0A++++++++++++%3Crecommended_gender%3EMen%3C%2Frecommended_gender%3E%0A++++++++++++%3CHazmat%3EBattery%2C+Flammable%3C%2FHazmat%3E%0A++++++++%3C%2FAttributes%3E%0A++++++++%3CPrimaryCategory%3E10001958%3C%2FPrimaryCategory%3E%0A++++++++%3CSkus%3E%0A++++++++++++%3CSku%3E%0A++++++++++++++++%3CImages%3E%0A++++++++++++++++++++%3CImage%3Ehttps%3A%2F%2Fsg-live.slatic.net%2Foriginal%2Fb731a8098df7d606ab2e56efc650afcb.jpg%3C%2FImage%3E%0A++++++++++++++++%3C%2FImages%3E%0A++++++++++++++++%3CSellerSku%3Etest-product-creation-for-api%3C%2FSellerSku%3E%0A++++++++++++++++%3Cquantity%3E1%3C%2Fquantity%3E%0A++++++++++++++++%3Cpackage_length%3E1%3C%2Fpackage_length%3E%0A++++++++++++++++%3Cpackage_content%3Etest+whats+in+the+box%3C%2Fpackage_content%3E%0A++++++++++++++++%3Cpackage_width%3E1%3C%2Fpackage_width%3E%0A++++++++++++++++%3Cpackage_height%3E1%3C%2Fpackage_height%3E%0A++++++++++++++++%3Ccolor_family%3EBlack%3C%2Fcolor_family%3E%0A++++++++++++++++%3Cspecial_price%3E0.0%3C%2Fspecial_price%3E%0A++++++++++++++++%3Cprice%3E23.0%3C%2Fprice%3E%0A++++++++++++++++%3Cpackage_weight%3E1%3C%2Fpackage_weight%3E%0A++++++++++++%3C%2FSku%3E%0A++++++++%3C%2FSkus%3E%0A++++%3C%2FProduct%3E%0A%3C%2FRequest%3E";

    fn signer() -> Signer {
        Signer::new(Credential::new("123456", "testsecretnotarealsecret"))
    }

    #[test]
    fn test_sign_query() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let signer = signer().with_time(from_timestamp_millis(1537324254708)?);
        let req = http::Request::get("https://api.lazada.sg/rest/brands/get?offset=0&limit=100")
            .body(())?;
        let (mut parts, _) = req.into_parts();

        signer.sign_query(&mut parts)?;

        assert_eq!(
            parts.uri.to_string(),
            "https://api.lazada.sg/rest/brands/get?app_key=123456&limit=100&offset=0\
             &sign=1A4D99631F4059D6C5F565C529916DC4D43E141412700EA371B2F396310943CA\
             &sign_method=sha256&timestamp=1537324254708"
        );
        Ok(())
    }

    #[test]
    fn test_sign_params_with_payload_and_token() -> Result<()> {
        let _ = env_logger::builder().is_test(true).try_init();

        let signer = signer()
            .with_access_token("faketoken")
            .with_time(from_timestamp_millis(1539870185083)?);
        let mut params = Params::parse(&format!("payload={CREATE_PRODUCT_PAYLOAD}"));

        signer.sign_params("/product/create", &mut params);

        assert_eq!(params.get("access_token"), Some("faketoken"));
        assert_eq!(params.get("timestamp"), Some("1539870185083"));
        // The payload is signed as a plain parameter, the body itself is never
        // appended to the string to sign.
        assert_eq!(
            params.get("sign"),
            Some("4F912A7D7FF2B433CE5141291BA3A6B1DB2C069453927B271E6C67E414DAE1F4")
        );
        Ok(())
    }

    #[test]
    fn test_resign_ignores_previous_signature() -> Result<()> {
        let signer = signer().with_time(from_timestamp_millis(1537324254708)?);
        let mut params = Params::parse("offset=0&limit=100");

        signer.sign_params("/brands/get", &mut params);
        let first = params.clone();
        signer.sign_params("/brands/get", &mut params);

        assert_eq!(first, params);
        Ok(())
    }

    #[test]
    fn test_empty_token_is_unbound() {
        let signer = signer().with_access_token("");
        let mut params = Params::new();
        signer.sign_params("/brands/get", &mut params);

        assert_eq!(signer.access_token(), None);
        assert!(!params.contains_key("access_token"));
        assert!(!format!("{signer:?}").contains("testsecretnotarealsecret"));
    }
}
