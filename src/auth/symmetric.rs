//! Classic NTP symmetric-key MAC: `key_id || MD5(secret || packet)`.

use md5::{Digest, Md5};

use super::{AuthContext, AuthError, MAX_KEY_ID};
use crate::{
    byte_order::{read_network_u32, write_network_u32},
    protocol::KEY_ID_LEN,
};

const DIGEST_LEN: usize = 16;

/// A trusted MD5 key.
///
/// # Examples
///
/// ```
/// use ntp_mode6::auth::{AuthContext, Md5Key};
///
/// let key = Md5Key::new(7, b"s3cret".to_vec()).expect("valid key");
/// let mac = key.sign(&[0_u8; 16]).expect("sign");
/// assert_eq!(mac.len(), 20);
/// assert!(key.verify(&[0_u8; 16], &mac));
/// ```
#[derive(Clone)]
pub struct Md5Key {
    key_id: u32,
    secret: Vec<u8>,
}

impl std::fmt::Debug for Md5Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Md5Key")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

impl Md5Key {
    /// Create a key from its identifier and secret.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidKeyId`] for key id 0 or ids above
    /// [`MAX_KEY_ID`], and [`AuthError::EmptySecret`] for an empty secret.
    pub fn new(key_id: u32, secret: Vec<u8>) -> Result<Self, AuthError> {
        if key_id == 0 || key_id > MAX_KEY_ID {
            return Err(AuthError::InvalidKeyId(key_id));
        }
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self { key_id, secret })
    }

    fn digest(&self, packet: &[u8]) -> [u8; DIGEST_LEN] {
        let mut hasher = Md5::new();
        hasher.update(&self.secret);
        hasher.update(packet);
        let mut digest = [0_u8; DIGEST_LEN];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }
}

impl AuthContext for Md5Key {
    fn key_id(&self) -> u32 { self.key_id }

    fn key_type(&self) -> &str { "MD5" }

    fn digest_len(&self) -> usize { DIGEST_LEN }

    fn sign(&self, packet: &[u8]) -> Result<Vec<u8>, AuthError> {
        let mut mac = Vec::with_capacity(KEY_ID_LEN + DIGEST_LEN);
        mac.extend_from_slice(&write_network_u32(self.key_id));
        mac.extend_from_slice(&self.digest(packet));
        Ok(mac)
    }

    fn verify(&self, packet: &[u8], mac: &[u8]) -> bool {
        let Some((key_id, digest)) = mac.split_first_chunk::<KEY_ID_LEN>() else {
            return false;
        };
        if read_network_u32(*key_id) != self.key_id || digest.len() != DIGEST_LEN {
            return false;
        }
        let expected = self.digest(packet);
        expected
            .iter()
            .zip(digest)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}
