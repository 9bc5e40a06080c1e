//! Core components for calling the Lazada open platform.
//!
//! This crate holds everything that has exact byte-level semantics:
//! parameter canonicalization, signing, request envelopes and response
//! envelopes. Endpoint specific code lives in the `lazop` crate.
//!
//! ## Overview
//!
//! - [`Params`]: the ordered parameter set sent with every call
//! - [`sign`]: canonical string and HMAC-SHA256 signature
//! - [`Signer`]: fills in `app_key`, `sign_method`, `timestamp`,
//!   `access_token` and `sign`
//! - [`check_response`]: validates the response envelope
//! - [`Context`]: the transport ([`HttpSend`]) and environment ([`Env`])
//!
//! ## Example
//!
//! ```
//! use lazop_core::{Credential, Params, Signer};
//!
//! let signer = Signer::new(Credential::new("123456", "secret"));
//!
//! let mut params = Params::parse("offset=0&limit=100");
//! signer.sign_params("/brands/get", &mut params);
//!
//! assert_eq!(params.get("sign_method"), Some("sha256"));
//! assert_eq!(params.get("sign").map(str::len), Some(64));
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod sign;
pub mod time;
pub mod utils;

mod context;
pub use context::{Context, Env, HttpSend, NoopEnv, NoopHttpSend, OsEnv, StaticEnv};
mod credential;
pub use credential::Credential;
mod envelope;
pub use envelope::{check_response, Envelope, SUCCESS_CODE};
mod error;
pub use error::{Error, ErrorDetail, ErrorKind, ErrorResponse, Result};
mod params;
pub use params::Params;
mod request;
pub use request::{api_path, SigningRequest, REST_PREFIX};
mod signer;
pub use signer::Signer;
