use std::time::Duration;

use anyhow::Result;
use lazop_core::{Context, Credential, Signer};
use lazop_http_send_reqwest::ReqwestHttpSend;
use reqwest::Client;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = env_logger::try_init();

    // The client owns the only deadline of a call.
    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent("lazop-example/0.1")
        .build()?;
    let ctx = Context::new().with_http_send(ReqwestHttpSend::new(client));

    let app_key = std::env::var("LAZADA_APP_KEY").unwrap_or_default();
    let app_secret = std::env::var("LAZADA_APP_SECRET").unwrap_or_default();
    let signer = Signer::new(Credential::new(app_key, app_secret));

    let req = http::Request::get("https://api.lazada.sg/rest/category/tree/get")
        .body(bytes::Bytes::new())?;
    let (mut parts, body) = req.into_parts();
    signer.sign_query(&mut parts)?;

    match ctx.http_send(http::Request::from_parts(parts, body)).await {
        Ok(resp) => {
            println!("Response status: {}", resp.status());
            println!("{}", String::from_utf8_lossy(resp.body()));
        }
        Err(e) => {
            eprintln!("Request failed: {e}");
        }
    }

    Ok(())
}
