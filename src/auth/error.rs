//! Errors raised while preparing authenticated requests.

use thiserror::Error;

/// Failures that stop an authenticated request before it reaches the network.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication was requested but no key is configured.
    #[error("authentication requested but no key is configured")]
    MissingKey,
    /// The key identifier is outside the usable range.
    #[error("invalid key identifier {0}")]
    InvalidKeyId(u32),
    /// The key secret is empty.
    #[error("invalid password: key secret is empty")]
    EmptySecret,
    /// The signing primitive could not produce a MAC.
    #[error("key {key_id} could not sign request: {reason}")]
    SigningFailed {
        /// Key that failed to sign.
        key_id: u32,
        /// Description supplied by the signer.
        reason: String,
    },
}
