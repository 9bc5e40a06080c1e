use std::str::FromStr;

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use http::Uri;
use log::debug;
use serde::de::DeserializeOwned;

use lazop_core::sign::PAYLOAD;
use lazop_core::time::DateTime;
use lazop_core::{
    api_path, check_response, Context, Credential, Envelope, Error, Params, Result, Signer,
};

use crate::constants::FORM_CONTENT_TYPE;
use crate::payload::{to_xml, Payload};
use crate::{Config, Region};

/// Client talks to the open platform of one region.
///
/// Client is an immutable value. [`Client::with_access_token`] and
/// [`Client::with_region`] return independent copies, so a base client can
/// be shared while per-merchant clients are derived from it.
#[derive(Clone, Debug)]
pub struct Client {
    ctx: Context,
    signer: Signer,
    region: Region,
    base_url: String,
}

impl Client {
    /// Create a new client for `region`.
    pub fn new(ctx: Context, credential: Credential, region: Region) -> Self {
        Self {
            ctx,
            signer: Signer::new(credential),
            region,
            base_url: region.endpoint().to_string(),
        }
    }

    /// Create a new client out of [`Config`].
    pub fn from_config(ctx: Context, config: Config) -> Result<Self> {
        let credential = config.credential()?;
        let region = config
            .region
            .ok_or_else(|| Error::config_invalid("region is required"))?;

        let client = Self::new(ctx, credential, region);
        Ok(match config.access_token {
            Some(token) => client.with_access_token(token),
            None => client,
        })
    }

    /// Return a copy of this client bound to a merchant access token.
    pub fn with_access_token(&self, token: impl Into<String>) -> Self {
        let mut c = self.clone();
        c.signer = c.signer.with_access_token(token);
        c
    }

    /// Return a copy of this client talking to another region.
    pub fn with_region(&self, region: Region) -> Self {
        let mut c = self.clone();
        c.region = region;
        c.base_url = region.endpoint().to_string();
        c
    }

    /// Return a copy of this client using a custom base url, like a sandbox host.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        let mut c = self.clone();
        c.base_url = base_url.into();
        c
    }

    /// Return a copy of this client that signs with a fixed time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(&self, time: DateTime) -> Self {
        let mut c = self.clone();
        c.signer = c.signer.with_time(time);
        c
    }

    /// Region of this client.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Base url requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The app credential.
    pub fn credential(&self) -> &Credential {
        self.signer.credential()
    }

    /// The bound access token, if any.
    pub fn access_token(&self) -> Option<&str> {
        self.signer.access_token()
    }

    pub(crate) fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Fail unless this client is bound to an access token.
    pub(crate) fn require_token(&self) -> Result<()> {
        match self.access_token() {
            Some(_) => Ok(()),
            None => Err(Error::token_required()),
        }
    }

    /// Resolve `path` into an absolute url.
    ///
    /// - `https://...` is used as is.
    /// - Anything else is an api name, resolved as `{base_url}rest{path}`.
    pub fn resolve(&self, path: &str) -> Result<Uri> {
        let url = if path.starts_with("https://") {
            path.to_string()
        } else {
            let base = self.base_url.trim_end_matches('/');
            let path = path.strip_prefix('/').unwrap_or(path);
            format!("{base}/rest/{path}")
        };

        let uri = Uri::from_str(&url)
            .map_err(|e| Error::request_invalid("cant parse url").with_source(e))?;
        if uri.scheme().is_none() || uri.authority().is_none() {
            return Err(Error::request_invalid(format!("url {url} is not absolute")));
        }
        Ok(uri)
    }

    /// Build a request without body.
    ///
    /// Parameters stay in the url query, the request is signed by
    /// [`Client::send`].
    pub fn new_request(&self, method: Method, path: &str) -> Result<http::Request<Bytes>> {
        let uri = self.resolve(path)?;

        Ok(http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())?)
    }

    /// Build a request that carries `payload`.
    ///
    /// The payload is serialized as XML into the `payload` parameter, which
    /// is signed together with the mandatory parameters and sent as a
    /// form-urlencoded body.
    pub fn new_payload_request(
        &self,
        method: Method,
        path: &str,
        payload: &impl Payload,
    ) -> Result<http::Request<Bytes>> {
        let uri = self.resolve(path)?;
        let xml = to_xml(payload)?;

        let mut params = Params::new();
        params.set(PAYLOAD, xml);
        self.signer.sign_params(api_path(uri.path()), &mut params);

        Ok(http::Request::builder()
            .method(method)
            .uri(uri)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(Bytes::from(params.encode()))?)
    }

    /// Send a request and decode the envelope's `data` into `T`.
    ///
    /// `Ok((envelope, None))` means the call succeeded without data.
    pub async fn send<T: DeserializeOwned>(
        &self,
        req: http::Request<Bytes>,
    ) -> Result<(Envelope, Option<T>)> {
        let (envelope, _) = self.send_raw(req).await?;
        let data = envelope.decode_data()?;
        Ok((envelope, data))
    }

    /// Send a request and return the validated envelope with the raw body.
    pub async fn send_raw(&self, req: http::Request<Bytes>) -> Result<(Envelope, Bytes)> {
        let req = self.sign(req)?;

        let method = req.method().clone();
        let path = req.uri().path().to_string();
        debug!("sending {method} {path}");

        let resp = self.ctx.http_send(req).await.map_err(|e| {
            e.with_context(format!("method: {method}"))
                .with_context(format!("path: {path}"))
        })?;

        check_response(resp).map_err(|e| {
            e.with_context(format!("method: {method}"))
                .with_context(format!("path: {path}"))
        })
    }

    /// Requests without body carry their parameters in the query and get
    /// signed right before sending. Payload requests were signed when built.
    fn sign(&self, req: http::Request<Bytes>) -> Result<http::Request<Bytes>> {
        if !req.body().is_empty() {
            return Ok(req);
        }

        let (mut parts, body) = req.into_parts();
        self.signer.sign_query(&mut parts)?;
        Ok(http::Request::from_parts(parts, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lazop_core::time::from_timestamp_millis;
    use lazop_core::ErrorKind;
    use pretty_assertions::assert_eq;

    use crate::payload::ImageRequest;

    fn client() -> Client {
        Client::new(
            Context::new(),
            Credential::new("123456", "testsecretnotarealsecret"),
            Region::Singapore,
        )
    }

    #[test]
    fn test_resolve() -> Result<()> {
        let c = client();
        assert_eq!(
            c.resolve("/brands/get?offset=0")?.to_string(),
            "https://api.lazada.sg/rest/brands/get?offset=0"
        );
        assert_eq!(
            c.resolve("https://auth.lazada.com/rest/auth/token/create?code=abc")?
                .to_string(),
            "https://auth.lazada.com/rest/auth/token/create?code=abc"
        );
        assert_eq!(
            c.with_base_url("https://api.example.com").resolve("/brands/get")?.to_string(),
            "https://api.example.com/rest/brands/get"
        );
        Ok(())
    }

    #[test]
    fn test_malformed_base_url() {
        let c = client().with_base_url("not a url");
        let err = c
            .new_request(Method::GET, "/brands/get")
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);

        let err = client()
            .with_base_url("")
            .new_request(Method::GET, "/brands/get")
            .expect_err("must fail");
        assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    }

    #[test]
    fn test_derived_clients_are_independent() {
        let base = client();
        let bound = base.with_access_token("faketoken");
        let moved = bound.with_region(Region::Malaysia);

        assert_eq!(base.access_token(), None);
        assert_eq!(base.region(), Region::Singapore);
        assert_eq!(bound.access_token(), Some("faketoken"));
        assert_eq!(bound.base_url(), "https://api.lazada.sg/");
        assert_eq!(moved.access_token(), Some("faketoken"));
        assert_eq!(moved.base_url(), "https://api.lazada.com.my/");
    }

    #[test]
    fn test_payload_request_is_form_encoded() -> Result<()> {
        let c = client()
            .with_access_token("faketoken")
            .with_time(from_timestamp_millis(1539870185083)?);

        let req = c.new_payload_request(
            Method::POST,
            "/image/migrate",
            &ImageRequest {
                url: "https://example.com/a.jpg",
            },
        )?;

        assert_eq!(
            req.uri().to_string(),
            "https://api.lazada.sg/rest/image/migrate"
        );
        assert_eq!(
            req.headers().get(CONTENT_TYPE).map(|v| v.as_bytes()),
            Some(FORM_CONTENT_TYPE.as_bytes())
        );

        let params = Params::parse(std::str::from_utf8(req.body()).expect("utf-8 body"));
        assert_eq!(
            params.get("payload"),
            Some(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                 <Request><Image><Url>https://example.com/a.jpg</Url></Image></Request>"
            )
        );
        assert_eq!(params.get("app_key"), Some("123456"));
        assert_eq!(params.get("access_token"), Some("faketoken"));
        assert_eq!(params.get("timestamp"), Some("1539870185083"));

        let mut unsigned = params.clone();
        let sign = unsigned.remove("sign").expect("sign must be present");
        assert_eq!(
            sign,
            vec![lazop_core::sign::signature(
                "testsecretnotarealsecret",
                "/image/migrate",
                &unsigned
            )]
        );
        Ok(())
    }
}
