//! Sign a call offline and print the url that would be sent.
//!
//! ```shell
//! LAZADA_APP_KEY=123456 LAZADA_APP_SECRET=secret cargo run --example sign_request
//! ```

use lazop_core::{Context, Credential, OsEnv, Result, Signer};

fn main() -> Result<()> {
    let _ = env_logger::try_init();

    let ctx = Context::new().with_env(OsEnv);
    let credential = Credential::new(
        ctx.env_var("LAZADA_APP_KEY").unwrap_or_default(),
        ctx.env_var("LAZADA_APP_SECRET").unwrap_or_default(),
    );
    let credential = if credential.is_valid() {
        credential
    } else {
        println!("LAZADA_APP_KEY and LAZADA_APP_SECRET are not set, using demo credential");
        Credential::new("123456", "testsecretnotarealsecret")
    };

    let signer = Signer::new(credential);
    let req = http::Request::get("https://api.lazada.sg/rest/brands/get?offset=0&limit=100")
        .body(())?;
    let (mut parts, _) = req.into_parts();
    signer.sign_query(&mut parts)?;

    println!("{}", parts.uri);
    Ok(())
}
