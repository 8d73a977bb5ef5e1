//! Request authentication seam.
//!
//! The MAC algorithm is opaque to the query engine: the encoder only needs a
//! key id, the expected digest length, and a way to sign the padded packet.
//! [`Md5Key`] supplies the classic NTP symmetric-key MAC for callers that do
//! not bring their own implementation.

mod error;
mod symmetric;

pub use error::AuthError;
pub use symmetric::Md5Key;

use crate::protocol::KEY_ID_LEN;

/// Largest key identifier accepted for symmetric keys.
pub const MAX_KEY_ID: u32 = 65_535;

/// Signing and verification keyed by a key id and key type.
///
/// `sign` receives the request padded to an 8-byte boundary and returns the
/// full MAC to append: the key id in network order followed by the digest.
pub trait AuthContext: Send + Sync {
    /// Identifier of the key used for signing.
    fn key_id(&self) -> u32;

    /// Name of the digest algorithm, for diagnostics.
    fn key_type(&self) -> &str;

    /// Length in bytes of the digest produced by this key's algorithm.
    fn digest_len(&self) -> usize;

    /// Produce a MAC over `packet`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when no MAC can be produced at all.
    fn sign(&self, packet: &[u8]) -> Result<Vec<u8>, AuthError>;

    /// Check a MAC previously attached to `packet`.
    fn verify(&self, packet: &[u8], mac: &[u8]) -> bool;

    /// Total MAC length (key id plus digest) this key must produce.
    fn mac_len(&self) -> usize { KEY_ID_LEN + self.digest_len() }
}

impl<A: AuthContext + ?Sized> AuthContext for std::sync::Arc<A> {
    fn key_id(&self) -> u32 { (**self).key_id() }

    fn key_type(&self) -> &str { (**self).key_type() }

    fn digest_len(&self) -> usize { (**self).digest_len() }

    fn sign(&self, packet: &[u8]) -> Result<Vec<u8>, AuthError> { (**self).sign(packet) }

    fn verify(&self, packet: &[u8], mac: &[u8]) -> bool { (**self).verify(packet, mac) }
}
