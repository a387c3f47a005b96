//! Identifier normalization
//!
//! Turns any supported textual form of an S3 location into a [`BucketName`].
//! Detection is prefix based and case-sensitive, first match wins:
//!
//! | Form                 | Example                                          |
//! |----------------------|--------------------------------------------------|
//! | ARN                  | `arn:aws:s3:::my-bucket/key`                     |
//! | S3 URI               | `s3://my-bucket/key`                             |
//! | Virtual-hosted URL   | `https://my-bucket.s3.us-west-2.amazonaws.com/k` |
//! | Path-style URL       | `https://s3.us-west-2.amazonaws.com/my-bucket/k` |
//! | Bucket name          | `my-bucket/key`                                  |
//!
//! Anything after the bucket (object keys, region hints in the host) is
//! dropped.

use std::fmt;

use crate::bucket::{BucketName, BucketNameError};

pub const ARN_PREFIX: &str = "arn:aws:s3:::";
pub const S3_URI_PREFIX: &str = "s3://";
const HTTPS_PREFIX: &str = "https://";
const HTTP_PREFIX: &str = "http://";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentifierError {
    #[error("invalid S3 bucket name: {name:?}")]
    InvalidBucketName {
        name: String,
        #[source]
        reason: BucketNameError,
    },

    #[error("path-style URL has no bucket segment")]
    MissingBucket,
}

/// The textual form an identifier was recognized as.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum IdentifierKind {
    BucketName,
    S3Uri,
    Arn,
    VirtualHostedUrl,
    PathStyleUrl,
}

impl fmt::Display for IdentifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::BucketName => "bucket name",
            Self::S3Uri => "S3 URI",
            Self::Arn => "ARN",
            Self::VirtualHostedUrl => "virtual-hosted URL",
            Self::PathStyleUrl => "path-style URL",
        };
        f.write_str(s)
    }
}

/// A classified identifier together with the bucket it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub kind: IdentifierKind,
    pub bucket: BucketName,
}

impl Identifier {
    /// Detects the form of `input` and extracts a validated bucket name.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let (kind, raw) = if input.starts_with(ARN_PREFIX) {
            (IdentifierKind::Arn, bucket_from_arn(input))
        } else if input.starts_with(S3_URI_PREFIX) {
            (IdentifierKind::S3Uri, bucket_from_s3_uri(input))
        } else if input.starts_with(HTTPS_PREFIX) || input.starts_with(HTTP_PREFIX) {
            bucket_from_http_url(input)?
        } else {
            (IdentifierKind::BucketName, bucket_from_plain(input))
        };

        Ok(Self {
            kind,
            bucket: validate_bucket(raw)?,
        })
    }
}

/// Runs the naming rules on an extracted name.
pub fn validate_bucket(raw: &str) -> Result<BucketName, IdentifierError> {
    BucketName::new(raw).map_err(|reason| IdentifierError::InvalidBucketName {
        name: raw.to_string(),
        reason,
    })
}

fn first_segment(s: &str) -> &str {
    s.split_once('/').map_or(s, |(head, _)| head)
}

/// `arn:aws:s3:::bucket[/key]` → `bucket`. Input without the prefix is taken
/// as-is.
pub fn bucket_from_arn(arn: &str) -> &str {
    first_segment(arn.strip_prefix(ARN_PREFIX).unwrap_or(arn))
}

/// `s3://bucket[/key]` → `bucket`. Input without the prefix is taken as-is.
pub fn bucket_from_s3_uri(uri: &str) -> &str {
    first_segment(uri.strip_prefix(S3_URI_PREFIX).unwrap_or(uri))
}

/// `bucket[/key]` → `bucket`.
pub fn bucket_from_plain(input: &str) -> &str {
    first_segment(input)
}

/// Splits an `http(s)://` URL into its style and bucket.
///
/// Virtual-hosted hosts contain `.s3.` or `.s3-` and carry the bucket before
/// the first `.s3`. Everything else is path-style and carries the bucket in
/// the first path segment. A host with no path at all is taken as the bucket
/// itself unless it is an S3 service endpoint.
pub fn bucket_from_http_url(url: &str) -> Result<(IdentifierKind, &str), IdentifierError> {
    let rest = url
        .strip_prefix(HTTPS_PREFIX)
        .or_else(|| url.strip_prefix(HTTP_PREFIX))
        .unwrap_or(url);
    let (host, path) = rest.split_once('/').unwrap_or((rest, ""));

    if host.contains(".s3.") || host.contains(".s3-") {
        if let Some(idx) = host.find(".s3") {
            return Ok((IdentifierKind::VirtualHostedUrl, &host[..idx]));
        }
    }

    if !path.is_empty() {
        let bucket = first_segment(path);
        if bucket.is_empty() {
            return Err(IdentifierError::MissingBucket);
        }
        return Ok((IdentifierKind::PathStyleUrl, bucket));
    }

    if is_service_endpoint(host) {
        return Err(IdentifierError::MissingBucket);
    }
    Ok((IdentifierKind::PathStyleUrl, host))
}

/// `s3.amazonaws.com`, `s3.<region>.amazonaws.com` or `s3-<region>.amazonaws.com`.
fn is_service_endpoint(host: &str) -> bool {
    (host.starts_with("s3.") || host.starts_with("s3-")) && host.ends_with(".amazonaws.com")
}
