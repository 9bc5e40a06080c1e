//! Upload an image and create a product with it.
//!
//! ```shell
//! LAZADA_APP_KEY=... LAZADA_APP_SECRET=... LAZADA_REGION=sg LAZADA_ACCESS_TOKEN=... \
//!     cargo run --example create_product -- https://example.com/shoe.jpg
//! ```

use anyhow::Result;
use lazop::{Client, Config, Product, Sku, StringMap};
use lazop_core::{Context, OsEnv};
use lazop_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let image = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: create_product <image url>"))?;

    let ctx = Context::new()
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);
    let client = Client::from_config(ctx.clone(), Config::new().from_env(&ctx)?)?;

    if client.access_token().is_none() {
        anyhow::bail!("LAZADA_ACCESS_TOKEN must be set");
    }
    println!("creating product in {}", client.region());

    let migrated = client.migrate_image(&image).await?;
    println!("image migrated to {}", migrated.image.url);

    let product = Product {
        primary_category: "10001958".to_string(),
        attributes: StringMap::from_iter([
            ("name", "test product creation"),
            ("brand", "No Brand"),
            ("short_description", "test product highlights"),
        ]),
        skus: vec![Sku {
            seller_sku: "test-product-creation-for-api".to_string(),
            images: vec![migrated.image.url],
            attributes: StringMap::from_iter([
                ("quantity", "1"),
                ("price", "23.0"),
                ("package_length", "1"),
                ("package_width", "1"),
                ("package_height", "1"),
                ("package_weight", "1"),
            ]),
        }],
    };

    let created = client.create_product(&product).await?;
    println!("created item {}", created.item_id);
    for sku in created.sku_list {
        println!("  {} -> {}", sku.seller_sku, sku.shop_sku);
    }
    Ok(())
}
