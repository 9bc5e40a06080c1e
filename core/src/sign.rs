//! Canonicalization and signing of open platform parameters.
//!
//! ## Format
//!
//! ```text
//! api_path + key_1 + value_1 + key_2 + value_2 + ...
//! ```
//!
//! Keys are sorted byte-wise and query-escaped, values are taken as-is and
//! nothing separates them. The string is signed with HMAC-SHA256 keyed with
//! the app secret and rendered as uppercase hex.
//!
//! The request body is not part of the string to sign. The platform
//! documentation claims otherwise, but the live service rejects signatures
//! that include it.

use log::debug;
use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

use crate::hash::upper_hex_hmac_sha256;
use crate::Params;

/// Value of `sign_method`, the only algorithm we support.
pub const SIGN_METHOD_SHA256: &str = "sha256";

/// Parameter carrying the app key.
pub const APP_KEY: &str = "app_key";
/// Parameter carrying the signing algorithm.
pub const SIGN_METHOD: &str = "sign_method";
/// Parameter carrying the unix timestamp in milliseconds.
pub const TIMESTAMP: &str = "timestamp";
/// Parameter carrying the merchant access token.
pub const ACCESS_TOKEN: &str = "access_token";
/// Parameter carrying the signature.
pub const SIGN: &str = "sign";
/// Parameter carrying the serialized request body.
pub const PAYLOAD: &str = "payload";

/// Bytes escaped in query components: everything but `A-Za-z0-9-_.~`.
static QUERY_COMPONENT: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Escape a query component, using `+` for spaces.
pub fn query_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (idx, chunk) in s.split(' ').enumerate() {
        if idx != 0 {
            out.push('+');
        }
        out.extend(utf8_percent_encode(chunk, &QUERY_COMPONENT));
    }
    out
}

/// Build the canonical string of `api` and `params`.
pub fn canonical_string(api: &str, params: &Params) -> String {
    let mut s = String::with_capacity(api.len() + 64);
    s.push_str(api);

    for (k, vs) in params {
        let k = query_escape(k);
        for v in vs {
            s.push_str(&k);
            s.push_str(v);
        }
    }

    s
}

/// Calculate the signature of `api` and `params` with `secret`.
pub fn signature(secret: &str, api: &str, params: &Params) -> String {
    let string_to_sign = canonical_string(api, params);
    debug!("string to sign: {}", &string_to_sign);

    upper_hex_hmac_sha256(secret.as_bytes(), string_to_sign.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    const SECRET: &str = "testsecretnotarealsecret";

    #[test_case("app_key", "app_key"; "plain")]
    #[test_case("a b", "a+b"; "space")]
    #[test_case(" lead", "+lead"; "leading space")]
    #[test_case("a  b", "a++b"; "double space")]
    #[test_case("x[0]", "x%5B0%5D"; "brackets")]
    #[test_case("a~b-c.d_e", "a~b-c.d_e"; "unreserved")]
    #[test_case("é", "%C3%A9"; "utf8")]
    fn test_query_escape(input: &str, expected: &str) {
        assert_eq!(query_escape(input), expected);
    }

    #[test]
    fn test_canonical_string() {
        let params = Params::parse(
            "offset=0&limit=100&app_key=123456&sign_method=sha256&timestamp=1537324254708",
        );

        assert_eq!(
            canonical_string("/brands/get", &params),
            "/brands/getapp_key123456limit100offset0sign_methodsha256timestamp1537324254708"
        );
    }

    #[test]
    fn test_canonical_string_escapes_keys_not_values() {
        let params: Params = [("a b", "c d"), ("a b", "e&f")].into_iter().collect();

        assert_eq!(canonical_string("/x", &params), "/xa+bc da+be&f");
    }

    #[test]
    fn test_signature_brands_get() {
        let _ = env_logger::builder().is_test(true).try_init();

        let params = Params::parse(
            "offset=0&limit=100&app_key=123456&sign_method=sha256&timestamp=1537324254708",
        );

        assert_eq!(
            signature(SECRET, "/brands/get", &params),
            "1A4D99631F4059D6C5F565C529916DC4D43E141412700EA371B2F396310943CA"
        );
    }

    #[test]
    fn test_signature_is_deterministic_and_order_independent() {
        let forward: Params = [
            ("app_key", "123456"),
            ("limit", "100"),
            ("offset", "0"),
            ("sign_method", "sha256"),
            ("timestamp", "1537324254708"),
        ]
        .into_iter()
        .collect();
        let backward: Params = [
            ("timestamp", "1537324254708"),
            ("sign_method", "sha256"),
            ("offset", "0"),
            ("limit", "100"),
            ("app_key", "123456"),
        ]
        .into_iter()
        .collect();

        let sig = signature(SECRET, "/brands/get", &forward);
        assert_eq!(sig, signature(SECRET, "/brands/get", &forward));
        assert_eq!(sig, signature(SECRET, "/brands/get", &backward));
        assert_eq!(sig.len(), 64);
    }

    #[test]
    fn test_signature_is_sensitive_to_every_input() {
        let base = Params::parse("offset=0&limit=100&app_key=123456");
        let sig = signature(SECRET, "/brands/get", &base);

        let mut changed_value = base.clone();
        changed_value.set("limit", "101");
        assert_ne!(sig, signature(SECRET, "/brands/get", &changed_value));

        let mut added_key = base.clone();
        added_key.set("search", "");
        assert_ne!(sig, signature(SECRET, "/brands/get", &added_key));

        let mut removed_key = base.clone();
        removed_key.remove("offset");
        assert_ne!(sig, signature(SECRET, "/brands/get", &removed_key));

        assert_ne!(sig, signature(SECRET, "/brand/get", &base));
        assert_ne!(sig, signature("another-secret", "/brands/get", &base));
    }
}
