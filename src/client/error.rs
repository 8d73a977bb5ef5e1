//! Error types for mode 6 queries.

use std::io;

use crate::{
    auth::AuthError,
    fragment::ResourceExhausted,
    protocol::ServerErrorCode,
    request::EncodeError,
};

/// Errors returned by [`crate::client::Mode6Client`] and
/// [`crate::client::RetryController`].
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// No usable reply arrived before the wait expired.
    #[error("timed out, nothing received")]
    Timeout,
    /// Some fragments arrived but the response never completed.
    #[error("timed out with incomplete data")]
    Incomplete,
    /// The response exceeded the collector's bounds.
    #[error("response too large: {0}")]
    TooMuch(#[from] ResourceExhausted),
    /// The server answered with its error flag set.
    #[error("server error on association {association_id}: {code}")]
    Server {
        /// Code from the status word.
        code: ServerErrorCode,
        /// Association id echoed by the server.
        association_id: u16,
    },
    /// The request could not be authenticated.
    #[error("authentication failed: {0}")]
    Auth(#[source] AuthError),
    /// The request could not be encoded.
    #[error("failed to encode request: {0}")]
    Encode(#[source] EncodeError),
    /// The caller cancelled the query.
    #[error("query cancelled")]
    Cancelled,
    /// Sending or receiving failed.
    #[error("transport error: {0}")]
    Io(#[from] io::Error),
}

impl QueryError {
    /// Report whether the first attempt may be retried after this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use ntp_mode6::client::QueryError;
    ///
    /// assert!(QueryError::Timeout.is_retryable());
    /// assert!(!QueryError::Cancelled.is_retryable());
    /// ```
    #[must_use]
    pub const fn is_retryable(&self) -> bool { matches!(self, Self::Timeout | Self::Incomplete) }

    /// Short label naming the error kind, used for metrics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Incomplete => "incomplete",
            Self::TooMuch(_) => "too_much",
            Self::Server { .. } => "server",
            Self::Auth(_) => "auth",
            Self::Encode(_) => "encode",
            Self::Cancelled => "cancelled",
            Self::Io(_) => "io",
        }
    }
}

impl From<AuthError> for QueryError {
    fn from(err: AuthError) -> Self { Self::Auth(err) }
}

impl From<EncodeError> for QueryError {
    fn from(err: EncodeError) -> Self {
        match err {
            EncodeError::Auth(err) => Self::Auth(err),
            other => Self::Encode(other),
        }
    }
}
