//! Region lookup over HTTP.
//!
//! One unauthenticated HEAD request against the bucket's global endpoint.
//! S3 answers with `x-amz-bucket-region` for any existing bucket, even when
//! the request itself is refused (403) or redirected (301), and with 404 when
//! the name is not registered anywhere.

use std::future::Future;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::bucket::BucketName;
use crate::config::ResolverConfig;
use crate::error::{Cause, Error, Result};
use crate::transport::{HttpRequest, TransportError};

pub const REGION_HEADER: &str = "x-amz-bucket-region";
pub const S3_GLOBAL_DOMAIN: &str = "s3.amazonaws.com";

/// `https://<bucket>.s3.amazonaws.com`, with no path or query.
pub fn endpoint_url(bucket: &BucketName) -> String {
    format!("https://{bucket}.{S3_GLOBAL_DOMAIN}")
}

/// Resolves the region of an already validated bucket.
pub async fn resolve_region(bucket: &BucketName, config: &ResolverConfig) -> Result<String> {
    const OP: &str = "resolve_region";
    lookup(bucket, config, std::future::pending())
        .await
        .map_err(|cause| Error::new(OP, bucket.as_str(), Some(bucket.as_str()), cause))
}

/// Issues the HEAD request and applies the header policy. Fails with
/// [`TransportError::Cancelled`] if `cancel` completes first.
pub(crate) async fn lookup<F>(
    bucket: &BucketName,
    config: &ResolverConfig,
    cancel: F,
) -> std::result::Result<String, Cause>
where
    F: Future<Output = ()>,
{
    let url = endpoint_url(bucket);
    debug!(%bucket, %url, "sending HEAD request");

    let send = config.transport.send(HttpRequest::head(url));
    let exchange = async {
        match config.timeout {
            Some(limit) => match tokio::time::timeout(limit, send).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(limit)),
            },
            None => send.await,
        }
    };

    let response = tokio::select! {
        biased;
        () = cancel => Err(TransportError::Cancelled),
        result = exchange => result,
    }?;

    debug!(%bucket, status = %response.status, "received response");
    if response.status == StatusCode::NOT_FOUND {
        return Err(Cause::BucketNotFound);
    }

    let region = response
        .headers
        .get(REGION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|region| !region.is_empty());

    match region {
        Some(region) => {
            debug!(%bucket, region, "resolved bucket region");
            Ok(region.to_string())
        }
        None => {
            if expects_region_header(response.status) {
                warn!(%bucket, status = %response.status, "response has no {REGION_HEADER} header");
            } else {
                debug!(%bucket, status = %response.status, "response has no {REGION_HEADER} header");
            }
            Err(Cause::RegionHeaderMissing)
        }
    }
}

/// Statuses on which S3 always sets the region header.
fn expects_region_header(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}
