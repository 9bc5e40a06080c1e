//! Apis under the "Product" category of the open platform.

use std::collections::BTreeMap;

use http::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use lazop_core::utils::null_as_default;
use lazop_core::{Error, Result};

use crate::constants::*;
use crate::payload::{ImageRequest, Product, ProductRequest};
use crate::Client;

/// Pagination used by list apis.
///
/// The default, offset 0 and limit 100, is what the platform uses when a
/// caller doesn't ask for anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    /// Skip this many results.
    pub offset: u32,
    /// Return at most this many results.
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: 100,
        }
    }
}

/// Filters for [`Client::products`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    /// Product status, like `all`, `live` or `sold-out`. Empty means `live`.
    pub filter: String,
    /// Products whose name or seller sku contains this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Set to `1` to get more stock information.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<String>,
    /// Only products with these seller skus, see [`lazop_core::utils::format_list`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku_seller_list: Option<String>,
    /// Skip this many results.
    pub offset: u32,
    /// Return at most this many results.
    pub limit: u32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        let page = Pagination::default();
        Self {
            filter: "live".to_string(),
            search: None,
            options: None,
            sku_seller_list: None,
            offset: page.offset,
            limit: page.limit,
        }
    }
}

/// A brand known to the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Brand {
    /// Display name.
    pub name: String,
    /// Brand id.
    pub brand_id: i64,
    /// Stable identifier across regions.
    pub global_identifier: String,
}

/// A node of the category tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryTree {
    /// Category id.
    pub category_id: i64,
    /// Sub categories.
    #[serde(deserialize_with = "null_as_default")]
    pub children: Vec<CategoryTree>,
    /// Whether the category supports variations.
    pub var: bool,
    /// Display name.
    pub name: String,
    /// Whether products can be created in this category.
    pub leaf: bool,
}

/// An attribute a category accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryAttribute {
    /// Display label.
    pub label: String,
    /// Name used as the element name in payloads.
    pub name: String,
    /// `1` when the attribute must be set.
    pub is_mandatory: i64,
    /// `normal` or `sku`.
    pub attribute_type: String,
    /// Widget the seller center uses, like `text` or `singleSelect`.
    pub input_type: String,
    /// Allowed values, if restricted.
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<CategoryOption>,
    /// `1` when the attribute is a sale property.
    #[serde(rename = "is_sale_prop")]
    pub is_sale: i64,
}

/// An allowed value of a [`CategoryAttribute`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CategoryOption {
    /// Value.
    pub name: String,
}

/// Result of [`Client::migrate_image`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ImageResponse {
    /// The migrated image.
    #[serde(alias = "Image")]
    pub image: Image,
}

/// An image hosted by the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Image {
    /// Content hash.
    pub hash_code: String,
    /// Url to use in product payloads.
    pub url: String,
}

/// Result of [`Client::create_product`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CreateProductResponse {
    /// Id of the created item.
    pub item_id: i64,
    /// Skus created with the item.
    #[serde(deserialize_with = "null_as_default")]
    pub sku_list: Vec<SkuItem>,
}

/// A sku created by [`Client::create_product`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkuItem {
    /// Sku assigned by the platform.
    pub shop_sku: String,
    /// Sku assigned by the seller.
    pub seller_sku: String,
    /// Sku id.
    #[serde(deserialize_with = "string_or_number")]
    pub sku_id: String,
}

/// Result of [`Client::products`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductsResponse {
    /// Number of products matching the filter, ignoring pagination.
    pub total_products: i64,
    /// The current page.
    #[serde(deserialize_with = "null_as_default")]
    pub products: Vec<ProductItem>,
}

/// A product as returned by [`Client::products`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductItem {
    /// Item id.
    pub item_id: i64,
    /// Category id.
    pub primary_category: i64,
    /// Product level attributes.
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Variants.
    #[serde(deserialize_with = "null_as_default")]
    pub skus: Vec<ProductSku>,
}

/// A variant of a [`ProductItem`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProductSku {
    /// `active` or `inactive`.
    #[serde(rename = "Status")]
    pub status: String,
    /// Stock.
    pub quantity: i64,
    /// Weight of the product.
    pub product_weight: String,
    /// Image urls.
    #[serde(rename = "Images", deserialize_with = "null_as_default")]
    pub images: Vec<String>,
    /// Sku assigned by the seller.
    #[serde(rename = "SellerSku")]
    pub seller_sku: String,
    /// Sku assigned by the platform.
    #[serde(rename = "ShopSku")]
    pub shop_sku: String,
    /// Product page.
    #[serde(rename = "Url")]
    pub url: String,
    /// Package width.
    pub package_width: String,
    /// Package height.
    pub package_height: String,
    /// Package length.
    pub package_length: String,
    /// Package weight.
    pub package_weight: String,
    /// End of the special price.
    pub special_to_time: String,
    /// Start of the special price.
    pub special_from_time: String,
    /// End date of the special price.
    pub special_to_date: String,
    /// Discounted price.
    pub special_price: Decimal,
    /// Regular price.
    pub price: Decimal,
    /// Stock available for sale.
    #[serde(rename = "Available")]
    pub available: i64,
    /// Sku id.
    #[serde(rename = "SkuId")]
    pub sku_id: i64,
}

impl Client {
    /// List brands of the region.
    ///
    /// `None` uses [`Pagination::default`].
    pub async fn brands(&self, page: Option<Pagination>) -> Result<Vec<Brand>> {
        let path = with_query(GET_BRANDS, &page.unwrap_or_default())?;
        let req = self.new_request(Method::GET, &path)?;

        let (_, brands) = self.send(req).await?;
        Ok(brands.unwrap_or_default())
    }

    /// Get all categories of the region.
    pub async fn category_tree(&self) -> Result<Vec<CategoryTree>> {
        let req = self.new_request(Method::GET, CATEGORY_TREE)?;

        let (_, tree) = self.send(req).await?;
        Ok(tree.unwrap_or_default())
    }

    /// Get the attributes of the category `id`.
    pub async fn category_attributes(&self, id: i64) -> Result<Vec<CategoryAttribute>> {
        let path = format!("{CATEGORY_ATTRIBUTES}?primary_category_id={id}");
        let req = self.new_request(Method::GET, &path)?;

        let (_, attrs) = self.send(req).await?;
        Ok(attrs.unwrap_or_default())
    }

    /// Move a publicly reachable image into the platform.
    ///
    /// Requires a client bound to an access token.
    pub async fn migrate_image(&self, url: &str) -> Result<ImageResponse> {
        self.require_token()?;

        let req = self.new_payload_request(Method::POST, IMAGE_MIGRATE, &ImageRequest { url })?;
        let (_, image) = self.send(req).await?;
        Ok(image.unwrap_or_default())
    }

    /// Create a new product.
    ///
    /// Requires a client bound to an access token.
    pub async fn create_product(&self, product: &Product) -> Result<CreateProductResponse> {
        self.require_token()?;

        let req =
            self.new_payload_request(Method::POST, CREATE_PRODUCT, &ProductRequest(product))?;
        let (_, resp) = self.send(req).await?;
        Ok(resp.unwrap_or_default())
    }

    /// Update an existing product.
    ///
    /// Requires a client bound to an access token.
    pub async fn update_product(&self, product: &Product) -> Result<()> {
        self.require_token()?;

        let req =
            self.new_payload_request(Method::POST, UPDATE_PRODUCT, &ProductRequest(product))?;
        self.send_raw(req).await?;
        Ok(())
    }

    /// List products of the seller.
    ///
    /// `None` uses [`SearchOptions::default`], an empty filter means `live`.
    pub async fn products(&self, opts: Option<SearchOptions>) -> Result<ProductsResponse> {
        let mut opts = opts.unwrap_or_default();
        if opts.filter.is_empty() {
            opts.filter = "live".to_string();
        }

        let path = with_query(GET_PRODUCTS, &opts)?;
        let req = self.new_request(Method::GET, &path)?;

        let (_, resp) = self.send(req).await?;
        Ok(resp.unwrap_or_default())
    }
}

fn with_query(path: &str, opts: &impl Serialize) -> Result<String> {
    let query = serde_urlencoded::to_string(opts)
        .map_err(|e| Error::request_invalid("cant encode query").with_source(e))?;

    if query.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{path}?{query}"))
    }
}

fn string_or_number<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Value {
        String(String),
        Number(serde_json::Number),
    }

    Ok(match Option::<Value>::deserialize(de)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        None => String::new(),
    })
}
