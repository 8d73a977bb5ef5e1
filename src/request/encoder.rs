use bytes::{BufMut, Bytes, BytesMut};

use super::{EncodeError, RequestContext};
use crate::{
    auth::{AuthContext, AuthError},
    byte_order::pad_to,
    protocol::{ControlHeader, HEADER_LEN, MAX_REQUEST_DATA, ProtocolVersion},
};

/// Serialises [`RequestContext`]s into wire packets.
///
/// The encoder is cheap to construct and holds no state between calls.
#[derive(Clone, Copy)]
pub struct RequestEncoder<'a> {
    version: ProtocolVersion,
    auth: Option<&'a dyn AuthContext>,
}

impl std::fmt::Debug for RequestEncoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestEncoder")
            .field("version", &self.version)
            .field("auth_key_id", &self.auth.map(|auth| auth.key_id()))
            .finish()
    }
}

impl<'a> RequestEncoder<'a> {
    /// Create an encoder emitting packets stamped with `version`.
    #[must_use]
    pub const fn new(version: ProtocolVersion) -> Self {
        Self {
            version,
            auth: None,
        }
    }

    /// Attach the key used for authenticated requests.
    #[must_use]
    pub const fn with_auth(mut self, auth: &'a dyn AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Build the datagram for `context` carrying `payload`.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::PayloadTooLarge`] when `payload` exceeds
    /// [`MAX_REQUEST_DATA`], [`EncodeError::Auth`] when an authenticated
    /// request has no key or the key fails to sign, and
    /// [`EncodeError::MacLengthMismatch`] when the signer returns a MAC whose
    /// length disagrees with its algorithm.
    pub fn encode(&self, context: &RequestContext, payload: &[u8]) -> Result<Bytes, EncodeError> {
        let Ok(count) = u16::try_from(payload.len()) else {
            return Err(Self::too_large(payload.len()));
        };
        if payload.len() > MAX_REQUEST_DATA {
            return Err(Self::too_large(payload.len()));
        }

        let data_len = pad_to(HEADER_LEN + payload.len(), 4);
        let mut packet = BytesMut::with_capacity(pad_to(data_len, 8) + 64);
        ControlHeader::request(
            self.version,
            context.opcode(),
            context.sequence(),
            context.association_id(),
            count,
        )
        .encode(&mut packet);
        packet.put_slice(payload);
        packet.resize(data_len, 0);

        if !context.is_authenticated() {
            return Ok(packet.freeze());
        }

        let auth = self.auth.ok_or(AuthError::MissingKey)?;
        packet.resize(pad_to(data_len, 8), 0);
        let mac = auth.sign(&packet)?;
        let expected = auth.mac_len();
        if mac.len() != expected {
            return Err(EncodeError::MacLengthMismatch {
                actual: mac.len(),
                expected,
                digest_len: auth.digest_len(),
            });
        }
        packet.put_slice(&mac);
        Ok(packet.freeze())
    }

    const fn too_large(len: usize) -> EncodeError {
        EncodeError::PayloadTooLarge {
            len,
            max: MAX_REQUEST_DATA,
        }
    }
}
