//! Unit tests for request encoding, padding, and signing.

use rstest::rstest;

use super::{EncodeError, RequestContext, RequestEncoder};
use crate::{
    auth::{AuthContext, AuthError, Md5Key},
    protocol::{ControlHeader, HEADER_LEN, MAX_REQUEST_DATA, Opcode, ProtocolVersion},
};

/// Signer that returns a MAC one byte short of what its algorithm promises.
struct TruncatingSigner;

impl AuthContext for TruncatingSigner {
    fn key_id(&self) -> u32 { 3 }

    fn key_type(&self) -> &str { "TEST" }

    fn digest_len(&self) -> usize { 16 }

    fn sign(&self, _packet: &[u8]) -> Result<Vec<u8>, AuthError> { Ok(vec![0; 19]) }

    fn verify(&self, _packet: &[u8], _mac: &[u8]) -> bool { false }
}

/// Signer that cannot produce a MAC at all.
struct BrokenSigner;

impl AuthContext for BrokenSigner {
    fn key_id(&self) -> u32 { 4 }

    fn key_type(&self) -> &str { "TEST" }

    fn digest_len(&self) -> usize { 16 }

    fn sign(&self, _packet: &[u8]) -> Result<Vec<u8>, AuthError> {
        Err(AuthError::SigningFailed {
            key_id: 4,
            reason: "key not found".to_owned(),
        })
    }

    fn verify(&self, _packet: &[u8], _mac: &[u8]) -> bool { false }
}

fn context() -> RequestContext { RequestContext::new(Opcode::READ_VARIABLES, 0x1234, 77) }

#[rstest]
#[case(0, HEADER_LEN)]
#[case(1, HEADER_LEN + 4)]
#[case(4, HEADER_LEN + 4)]
#[case(5, HEADER_LEN + 8)]
#[case(MAX_REQUEST_DATA, HEADER_LEN + MAX_REQUEST_DATA)]
fn unauthenticated_payload_is_padded_to_four_bytes(#[case] len: usize, #[case] expected: usize) {
    let payload = vec![b'x'; len];
    let packet = RequestEncoder::new(ProtocolVersion::default())
        .encode(&context(), &payload)
        .expect("payload within limit");

    assert_eq!(packet.len(), expected);
    assert!(packet[HEADER_LEN + len..].iter().all(|b| *b == 0));
}

#[test]
fn header_carries_context_and_unpadded_count() {
    let packet = RequestEncoder::new(ProtocolVersion::NEWEST)
        .encode(&context(), b"abcde")
        .expect("encode");
    let header = ControlHeader::parse(&packet).expect("header");

    assert_eq!(header.version(), 4);
    assert_eq!(header.opcode(), Opcode::READ_VARIABLES);
    assert_eq!(header.sequence(), 77);
    assert_eq!(header.association_id(), 0x1234);
    assert_eq!(header.count(), 5);
    assert_eq!(header.offset(), 0);
    assert!(!header.flags().is_response());
    assert_eq!(&packet[HEADER_LEN..HEADER_LEN + 5], b"abcde");
}

#[test]
fn oversized_payload_is_rejected() {
    let payload = vec![0_u8; MAX_REQUEST_DATA + 1];
    let err = RequestEncoder::new(ProtocolVersion::default())
        .encode(&context(), &payload)
        .expect_err("payload above limit");
    assert_eq!(
        err,
        EncodeError::PayloadTooLarge {
            len: MAX_REQUEST_DATA + 1,
            max: MAX_REQUEST_DATA,
        }
    );
}

#[rstest]
#[case(0, 16)]
#[case(1, 16)]
#[case(5, 24)]
#[case(12, 24)]
fn authenticated_packet_is_padded_to_eight_then_signed(
    #[case] len: usize,
    #[case] signed_len: usize,
) {
    let key = Md5Key::new(42, b"hunter2".to_vec()).expect("valid key");
    let payload = vec![b'v'; len];
    let packet = RequestEncoder::new(ProtocolVersion::default())
        .with_auth(&key)
        .encode(&context().authenticated(true), &payload)
        .expect("encode");

    assert_eq!(packet.len(), signed_len + key.mac_len());
    let (body, mac) = packet.split_at(signed_len);
    assert_eq!(&mac[..4], &[0, 0, 0, 42]);
    assert!(key.verify(body, mac));
}

#[test]
fn authenticated_request_without_key_fails_before_encoding() {
    let err = RequestEncoder::new(ProtocolVersion::default())
        .encode(&context().authenticated(true), b"")
        .expect_err("no key configured");
    assert_eq!(err, EncodeError::Auth(AuthError::MissingKey));
}

#[test]
fn short_mac_is_reported_as_length_mismatch() {
    let err = RequestEncoder::new(ProtocolVersion::default())
        .with_auth(&TruncatingSigner)
        .encode(&context().authenticated(true), b"")
        .expect_err("short MAC");
    assert_eq!(
        err,
        EncodeError::MacLengthMismatch {
            actual: 19,
            expected: 20,
            digest_len: 16,
        }
    );
}

#[test]
fn signing_failure_propagates() {
    let err = RequestEncoder::new(ProtocolVersion::default())
        .with_auth(&BrokenSigner)
        .encode(&context().authenticated(true), b"")
        .expect_err("signer fails");
    assert!(matches!(
        err,
        EncodeError::Auth(AuthError::SigningFailed { key_id: 4, .. })
    ));
}

#[test]
fn unauthenticated_context_ignores_configured_key() {
    let key = Md5Key::new(1, b"k".to_vec()).expect("valid key");
    let packet = RequestEncoder::new(ProtocolVersion::default())
        .with_auth(&key)
        .encode(&context(), b"abcd")
        .expect("encode");
    assert_eq!(packet.len(), HEADER_LEN + 4);
}
