//! Error types for region resolution.

use std::error::Error as StdError;
use std::fmt;

use crate::identifier::IdentifierError;
use crate::transport::TransportError;

/// Coarse classification of a resolution failure.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// The input did not yield a valid bucket name. Fix the input.
    InvalidIdentifier,
    /// Network, DNS, TLS, timeout or cancellation. Safe to retry.
    TransportFailure,
    /// The endpoint answered 404: no bucket by that name exists.
    BucketNotFound,
    /// The response carried no usable `x-amz-bucket-region` header.
    RegionHeaderMissing,
}

/// What went wrong, with the lower-level error attached where there is one.
#[derive(Debug, thiserror::Error)]
pub enum Cause {
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    #[error("failed to perform HEAD request")]
    Transport(#[source] TransportError),

    #[error("aws s3 bucket not found")]
    BucketNotFound,

    #[error("x-amz-bucket-region header not found in response")]
    RegionHeaderMissing,
}

impl Cause {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidIdentifier(_) => ErrorKind::InvalidIdentifier,
            Self::Transport(_) => ErrorKind::TransportFailure,
            Self::BucketNotFound => ErrorKind::BucketNotFound,
            Self::RegionHeaderMissing => ErrorKind::RegionHeaderMissing,
        }
    }
}

impl From<TransportError> for Cause {
    fn from(err: TransportError) -> Self {
        Self::Transport(err)
    }
}

/// Error returned by every `get_bucket_region*` entry point.
///
/// Carries the entry point that failed, the caller's original input and, once
/// one has been derived, the bucket name.
///
/// Display already includes the [`Cause`], so `source()` continues from the
/// cause's own source and each message appears once in a chain.
#[derive(Debug)]
pub struct Error {
    op: &'static str,
    bucket_name: Option<String>,
    input: String,
    cause: Cause,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}): {}", self.op, self.input, self.cause)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause.source()
    }
}

impl Error {
    pub(crate) fn new(
        op: &'static str,
        input: &str,
        bucket_name: Option<&str>,
        cause: impl Into<Cause>,
    ) -> Self {
        Self {
            op,
            bucket_name: bucket_name.map(str::to_string),
            input: input.to_string(),
            cause: cause.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.cause.kind()
    }

    /// Name of the entry point, e.g. `get_bucket_region_from_arn`.
    #[must_use]
    pub fn op(&self) -> &'static str {
        self.op
    }

    #[must_use]
    pub fn bucket_name(&self) -> Option<&str> {
        self.bucket_name.as_deref()
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// The transport failure behind a [`ErrorKind::TransportFailure`].
    #[must_use]
    pub fn transport_error(&self) -> Option<&TransportError> {
        match &self.cause {
            Cause::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Convenience result type for region resolution.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bucket::BucketNameError;

    /// Display names the operation, quotes the input and appends the cause.
    #[test]
    fn display_format() {
        let err = Error::new(
            "get_bucket_region",
            "s3://nope",
            Some("nope"),
            Cause::BucketNotFound,
        );
        assert_eq!(
            err.to_string(),
            r#"get_bucket_region("s3://nope"): aws s3 bucket not found"#
        );
        assert_eq!(err.kind(), ErrorKind::BucketNotFound);
        assert_eq!(err.bucket_name(), Some("nope"));
        assert_eq!(err.input(), "s3://nope");
        assert_eq!(err.op(), "get_bucket_region");
    }

    /// The transport failure stays reachable through the source chain.
    #[test]
    fn transport_cause_is_inspectable() {
        let err = Error::new(
            "get_bucket_region_by_name",
            "my-bucket",
            Some("my-bucket"),
            TransportError::Cancelled,
        );
        assert_eq!(err.kind(), ErrorKind::TransportFailure);
        assert!(matches!(err.transport_error(), Some(TransportError::Cancelled)));

        let inner = err.source().unwrap();
        assert!(matches!(
            inner.downcast_ref::<TransportError>(),
            Some(TransportError::Cancelled)
        ));
    }

    #[test]
    fn identifier_errors_map_to_invalid_identifier() {
        let err = Error::new(
            "get_bucket_region",
            "ab",
            None,
            IdentifierError::InvalidBucketName {
                name: "ab".into(),
                reason: BucketNameError::Length(2),
            },
        );
        assert_eq!(err.kind(), ErrorKind::InvalidIdentifier);
        assert!(err.bucket_name().is_none());
        assert!(err.to_string().contains("invalid S3 bucket name"));
    }

    fn chain(err: &Error) -> Vec<String> {
        std::iter::successors(Some(err as &(dyn StdError + 'static)), |&e| e.source())
            .map(ToString::to_string)
            .collect()
    }

    /// Each message appears exactly once when the source chain is printed.
    #[test]
    fn chain_has_no_repeated_messages() {
        let err = Error::new(
            "get_bucket_region_by_name",
            "my-bucket",
            Some("my-bucket"),
            TransportError::other("connection reset"),
        );
        assert_eq!(
            chain(&err),
            [
                r#"get_bucket_region_by_name("my-bucket"): failed to perform HEAD request"#,
                "connection reset",
            ]
        );
        assert_eq!(
            format!("{:#}", anyhow::Error::new(err)),
            r#"get_bucket_region_by_name("my-bucket"): failed to perform HEAD request: connection reset"#
        );

        let err = Error::new(
            "get_bucket_region",
            "ab",
            None,
            IdentifierError::InvalidBucketName {
                name: "ab".into(),
                reason: BucketNameError::Length(2),
            },
        );
        assert_eq!(
            chain(&err),
            [
                r#"get_bucket_region("ab"): invalid S3 bucket name: "ab""#,
                "must be between 3 and 63 characters long, got 2",
            ]
        );
    }
}
