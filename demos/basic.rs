//! Resolve one identifier twice: with the default config, then with a
//! transport that enforces a 5 second timeout.
//!
//! ```text
//! cargo run --example basic -- s3://sentinel-s2-l1c/tiles
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use s3region::{ReqwestTransport, ResolverConfig, get_bucket_region};

#[tokio::main]
async fn main() -> Result<()> {
    let Some(input) = std::env::args().nth(1) else {
        println!("Usage: basic <s3-bucket-name-or-url>");
        println!("Example: basic testing-bucket/path/to/object");
        println!("Example: basic s3://testing-bucket/path/to/object");
        println!("Example: basic arn:aws:s3:::testing-bucket/path");
        println!("Example: basic https://testing-bucket.s3.amazonaws.com/path/to/object");
        std::process::exit(1);
    };

    let region = get_bucket_region(&input, &ResolverConfig::default()).await?;
    println!("Bucket region: {region}");

    let transport = ReqwestTransport::with_timeout(Duration::from_secs(5))
        .context("failed to build HTTP client")?;
    let config = ResolverConfig::new(Arc::new(transport));
    let region = get_bucket_region(&input, &config)
        .await
        .context("lookup with custom client failed")?;
    println!("Bucket region (custom client): {region}");

    Ok(())
}
