//! Client for the Lazada open platform.
//!
//! Every call is signed with the app secret by [`lazop_core::Signer`].
//! Calls without body carry their parameters in the url query, calls with
//! an XML payload send them as a form-urlencoded body.
//!
//! ## Example
//!
//! ```no_run
//! use lazop::{Client, Config};
//! use lazop_core::{Context, OsEnv, Result};
//! use lazop_http_send_reqwest::ReqwestHttpSend;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let ctx = Context::new()
//!         .with_http_send(ReqwestHttpSend::default())
//!         .with_env(OsEnv);
//!
//!     // Reads LAZADA_APP_KEY, LAZADA_APP_SECRET, LAZADA_REGION and
//!     // LAZADA_ACCESS_TOKEN.
//!     let config = Config::new().from_env(&ctx)?;
//!     let client = Client::from_config(ctx, config)?;
//!
//!     let brands = client.brands(None).await?;
//!     println!("got {} brands", brands.len());
//!     Ok(())
//! }
//! ```

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod auth;
pub use auth::Token;
mod client;
pub use client::Client;
mod config;
pub use config::Config;
pub mod payload;
pub use payload::{ImageRequest, Payload, Product, ProductRequest, Sku, StringMap};
mod product;
pub use product::{
    Brand, CategoryAttribute, CategoryOption, CategoryTree, CreateProductResponse, Image,
    ImageResponse, Pagination, ProductItem, ProductSku, ProductsResponse, SearchOptions, SkuItem,
};
mod region;
pub use region::Region;

pub use lazop_core::utils::format_list;
pub use lazop_core::{Envelope, Error, ErrorKind, Result};
