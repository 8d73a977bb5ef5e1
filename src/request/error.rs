//! Errors produced while building request packets.

use thiserror::Error;

use crate::auth::AuthError;

/// Reasons a request could not be encoded.
///
/// None of these depend on the peer; they surface before anything is sent.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// The payload does not fit in a single request. This is a caller bug.
    #[error("request payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge {
        /// Length supplied by the caller.
        len: usize,
        /// Largest permitted payload.
        max: usize,
    },
    /// The signer produced a MAC of the wrong size for its algorithm.
    #[error("{actual} octet MAC, {expected} expected with {digest_len} octet digest")]
    MacLengthMismatch {
        /// Length of the MAC that was produced.
        actual: usize,
        /// Key id plus digest length the algorithm requires.
        expected: usize,
        /// Digest length of the key's algorithm.
        digest_len: usize,
    },
    /// Signing failed or no key was available.
    #[error(transparent)]
    Auth(#[from] AuthError),
}
