//! Find the AWS region of an S3 bucket without credentials or an SDK.
//!
//! A single unauthenticated `HEAD https://<bucket>.s3.amazonaws.com` is enough:
//! S3 reports the bucket's home region in the `x-amz-bucket-region` response
//! header. The entry points below accept a bucket in any of its usual textual
//! forms and normalize it first.
//!
//! ```no_run
//! # async fn run() -> Result<(), s3region::Error> {
//! use s3region::{ResolverConfig, get_bucket_region};
//!
//! let config = ResolverConfig::default();
//! let region = get_bucket_region("s3://sentinel-s2-l1c/tiles", &config).await?;
//! println!("{region}");
//! # Ok(())
//! # }
//! ```

pub mod bucket;
pub mod config;
pub mod error;
pub mod identifier;
pub mod resolver;
pub mod transport;

use std::future::Future;

use tracing::debug;

pub use bucket::{BucketName, BucketNameError};
pub use config::ResolverConfig;
pub use error::{Cause, Error, ErrorKind, Result};
pub use identifier::{Identifier, IdentifierError, IdentifierKind};
pub use resolver::{REGION_HEADER, endpoint_url, resolve_region};
pub use transport::{HeadResponse, HttpRequest, HttpTransport, ReqwestTransport, TransportError};

use identifier::{bucket_from_arn, bucket_from_http_url, bucket_from_s3_uri, validate_bucket};

/// Resolves the region for any supported identifier:
///
/// - bucket name: `my-bucket` or `my-bucket/path/to/object`
/// - S3 URI: `s3://my-bucket/path`
/// - ARN: `arn:aws:s3:::my-bucket/path`
/// - virtual-hosted URL: `https://my-bucket.s3.amazonaws.com/path`
/// - path-style URL: `https://s3.us-west-2.amazonaws.com/my-bucket/path`
pub async fn get_bucket_region(input: &str, config: &ResolverConfig) -> Result<String> {
    get_bucket_region_until(input, config, std::future::pending()).await
}

/// Like [`get_bucket_region`], but gives up with
/// [`TransportError::Cancelled`] as soon as `cancel` completes.
pub async fn get_bucket_region_until<F>(
    input: &str,
    config: &ResolverConfig,
    cancel: F,
) -> Result<String>
where
    F: Future<Output = ()>,
{
    const OP: &str = "get_bucket_region";
    let identifier = Identifier::parse(input).map_err(|e| Error::new(OP, input, None, e))?;
    debug!(input, kind = %identifier.kind, bucket = %identifier.bucket, "parsed identifier");
    lookup(OP, input, &identifier.bucket, config, cancel).await
}

/// Resolves a bare bucket name. No path stripping is done.
pub async fn get_bucket_region_by_name(name: &str, config: &ResolverConfig) -> Result<String> {
    const OP: &str = "get_bucket_region_by_name";
    let bucket = validate_bucket(name).map_err(|e| Error::new(OP, name, None, e))?;
    lookup(OP, name, &bucket, config, std::future::pending()).await
}

/// Resolves `s3://bucket[/key]`.
pub async fn get_bucket_region_from_s3_uri(uri: &str, config: &ResolverConfig) -> Result<String> {
    const OP: &str = "get_bucket_region_from_s3_uri";
    let bucket =
        validate_bucket(bucket_from_s3_uri(uri)).map_err(|e| Error::new(OP, uri, None, e))?;
    lookup(OP, uri, &bucket, config, std::future::pending()).await
}

/// Resolves `arn:aws:s3:::bucket[/key]`.
pub async fn get_bucket_region_from_arn(arn: &str, config: &ResolverConfig) -> Result<String> {
    const OP: &str = "get_bucket_region_from_arn";
    let bucket =
        validate_bucket(bucket_from_arn(arn)).map_err(|e| Error::new(OP, arn, None, e))?;
    lookup(OP, arn, &bucket, config, std::future::pending()).await
}

/// Resolves a virtual-hosted or path-style `http(s)://` URL. Any region in
/// the URL is ignored; the lookup always goes to the global endpoint.
pub async fn get_bucket_region_from_http_url(
    url: &str,
    config: &ResolverConfig,
) -> Result<String> {
    const OP: &str = "get_bucket_region_from_http_url";
    let bucket = bucket_from_http_url(url)
        .and_then(|(_, raw)| validate_bucket(raw))
        .map_err(|e| Error::new(OP, url, None, e))?;
    lookup(OP, url, &bucket, config, std::future::pending()).await
}

async fn lookup<F>(
    op: &'static str,
    input: &str,
    bucket: &BucketName,
    config: &ResolverConfig,
    cancel: F,
) -> Result<String>
where
    F: Future<Output = ()>,
{
    resolver::lookup(bucket, config, cancel)
        .await
        .map_err(|cause| Error::new(op, input, Some(bucket.as_str()), cause))
}
