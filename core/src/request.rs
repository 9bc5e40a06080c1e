use std::mem;
use std::str::FromStr;

use http::uri::Authority;
use http::uri::PathAndQuery;
use http::uri::Scheme;
use http::Method;
use http::Uri;

use crate::Error;
use crate::Params;
use crate::Result;

/// Base path every REST api lives under.
pub const REST_PREFIX: &str = "/rest";

/// Signing context for a query-only request.
#[derive(Debug)]
pub struct SigningRequest {
    /// HTTP method.
    pub method: Method,
    /// HTTP scheme.
    pub scheme: Scheme,
    /// HTTP authority.
    pub authority: Authority,
    /// HTTP path, still percent encoded.
    pub path: String,
    /// Query parameters.
    pub params: Params,
}

impl SigningRequest {
    /// Build a signing context from http::request::Parts.
    pub fn build(parts: &mut http::request::Parts) -> Result<Self> {
        let uri = mem::take(&mut parts.uri).into_parts();
        let paq = uri
            .path_and_query
            .unwrap_or_else(|| PathAndQuery::from_static("/"));

        Ok(SigningRequest {
            method: parts.method.clone(),
            scheme: uri.scheme.unwrap_or(Scheme::HTTPS),
            authority: uri.authority.ok_or_else(|| {
                Error::request_invalid("request without authority is invalid for signing")
            })?,
            path: paq.path().to_string(),
            params: paq.query().map(Params::parse).unwrap_or_default(),
        })
    }

    /// The api name used in the string to sign, which is the path without
    /// the `/rest` prefix.
    pub fn api(&self) -> &str {
        api_path(&self.path)
    }

    /// Apply the signing context back to http::request::Parts.
    pub fn apply(self, parts: &mut http::request::Parts) -> Result<()> {
        parts.method = self.method;
        parts.uri = {
            let mut uri_parts = mem::take(&mut parts.uri).into_parts();
            uri_parts.scheme = Some(self.scheme);
            uri_parts.authority = Some(self.authority);
            uri_parts.path_and_query = {
                let paq = if self.params.is_empty() {
                    self.path
                } else {
                    let query = self.params.encode();
                    let mut s = self.path;
                    s.reserve(query.len() + 1);
                    s.push('?');
                    s.push_str(&query);
                    s
                };

                Some(PathAndQuery::from_str(&paq)?)
            };
            Uri::from_parts(uri_parts)?
        };

        Ok(())
    }
}

/// Strip the `/rest` base path from an url path.
///
/// ```
/// use lazop_core::api_path;
///
/// assert_eq!(api_path("/rest/brands/get"), "/brands/get");
/// assert_eq!(api_path("/brands/get"), "/brands/get");
/// ```
pub fn api_path(path: &str) -> &str {
    path.strip_prefix(REST_PREFIX).unwrap_or(path)
}
