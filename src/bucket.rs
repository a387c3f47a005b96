//! S3 bucket names
//!
//! [`BucketName`] is the only way a bucket name reaches the resolver, so the
//! endpoint URL built from it is always a well-formed host.

use std::fmt;
use std::str::FromStr;

const MIN_LEN: usize = 3;
const MAX_LEN: usize = 63;

/// Why a string was rejected as a bucket name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BucketNameError {
    #[error("must be between 3 and 63 characters long, got {0}")]
    Length(usize),

    #[error("must begin with a lowercase letter or number")]
    InvalidStart,

    #[error("must end with a lowercase letter or number")]
    InvalidEnd,

    #[error("invalid character {0:?}")]
    InvalidCharacter(char),

    #[error("must not contain two adjacent periods")]
    AdjacentPeriods,

    #[error("must not be formatted as an IP address")]
    IpAddress,
}

/// A validated S3 bucket name.
///
/// Guarantees:
/// - 3 to 63 characters
/// - only `[a-z0-9.-]`
/// - first and last characters are a lowercase letter or digit
/// - no `..`
/// - not a dotted-quad like `192.168.5.4`
///
/// ```
/// use s3region::BucketName;
///
/// let bucket: BucketName = "my-bucket".parse().unwrap();
/// assert_eq!(bucket.as_str(), "my-bucket");
///
/// assert!("ab".parse::<BucketName>().is_err());
/// assert!("192.168.1.1".parse::<BucketName>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketName(String);

impl BucketName {
    /// Validates `name` against the S3 naming rules.
    pub fn new(name: impl Into<String>) -> Result<Self, BucketNameError> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_alphanumeric(b: u8) -> bool {
    b.is_ascii_lowercase() || b.is_ascii_digit()
}

fn validate(name: &str) -> Result<(), BucketNameError> {
    let bytes = name.as_bytes();
    if !(MIN_LEN..=MAX_LEN).contains(&bytes.len()) {
        return Err(BucketNameError::Length(name.chars().count()));
    }

    if let Some(c) = name
        .chars()
        .find(|&c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-'))
    {
        return Err(BucketNameError::InvalidCharacter(c));
    }

    // Length and charset checks above make both indexes valid ASCII.
    if !is_alphanumeric(bytes[0]) {
        return Err(BucketNameError::InvalidStart);
    }
    if !is_alphanumeric(bytes[bytes.len() - 1]) {
        return Err(BucketNameError::InvalidEnd);
    }

    if name.contains("..") {
        return Err(BucketNameError::AdjacentPeriods);
    }

    if looks_like_ipv4(name) {
        return Err(BucketNameError::IpAddress);
    }

    Ok(())
}

/// Four non-empty, all-digit labels. Octet range is not checked: `999.1.1.1`
/// is rejected too.
fn looks_like_ipv4(name: &str) -> bool {
    let labels: Vec<&str> = name.split('.').collect();
    labels.len() == 4
        && labels
            .iter()
            .all(|label| !label.is_empty() && label.bytes().all(|b| b.is_ascii_digit()))
}

impl AsRef<str> for BucketName {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for BucketName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BucketName {
    type Err = BucketNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
