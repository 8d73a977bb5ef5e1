//! Reasons the collector declines or rejects inbound packets.
//!
//! Three tiers keep the retry policy simple: [`IgnoreReason`] covers expected
//! noise, [`ProtocolViolation`] covers packets that are well-formed enough to
//! belong to this exchange but whose contents cannot be trusted, and
//! [`ResourceExhausted`] ends the attempt outright.

use thiserror::Error;

use crate::protocol::Opcode;

/// Packets that are silently skipped.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Too short to carry a control header.
    #[error("short ({len} byte) packet received")]
    ShortPacket {
        /// Datagram length.
        len: usize,
    },
    /// Version outside the supported range.
    #[error("packet received with version {0}")]
    UnsupportedVersion(u8),
    /// Not a control-mode packet.
    #[error("packet received with mode {0}")]
    NotControl(u8),
    /// A request rather than a reply.
    #[error("received request packet, wanted response")]
    NotResponse,
    /// Reply to some other request.
    #[error("received sequence number {found}, wanted {expected}")]
    SequenceMismatch {
        /// Sequence of the outstanding request.
        expected: u16,
        /// Sequence carried by the reply.
        found: u16,
    },
    /// Reply for a different operation.
    #[error("received opcode {found}, wanted {expected} (sequence number okay)")]
    OpcodeMismatch {
        /// Opcode of the outstanding request.
        expected: Opcode,
        /// Opcode carried by the reply.
        found: Opcode,
    },
    /// A fragment already held at this offset.
    #[error("duplicate {count} octets at {offset} ignored, prior {prior_count} at {offset}")]
    DuplicateFragment {
        /// Offset shared with the held fragment.
        offset: u16,
        /// Size of the duplicate.
        count: u16,
        /// Size of the fragment already held.
        prior_count: u16,
    },
}

/// Packets that are dropped because their contents are inconsistent.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// Datagram length is not a multiple of four.
    #[error("response packet not padded, size = {len}")]
    Unpadded {
        /// Datagram length.
        len: usize,
    },
    /// Header claims more payload than the datagram holds.
    #[error("received count of {count} octets, data in packet is {available}")]
    CountExceedsPayload {
        /// Declared payload length.
        count: u16,
        /// Bytes following the header.
        available: usize,
    },
    /// A non-final fragment must carry data.
    #[error("received count of 0 in non-final fragment at offset {offset}")]
    EmptyNonFinal {
        /// Offset of the empty fragment.
        offset: u16,
    },
    /// A second fragment claims to be the last one.
    #[error("received second last fragment packet at offset {offset}")]
    DuplicateTerminal {
        /// Offset of the rejected fragment.
        offset: u16,
    },
    /// The fragment's byte range intersects one already held.
    #[error(
        "received {count} octet frag at {offset} overlaps with {existing_count} octet frag at \
         {existing_offset}"
    )]
    Overlap {
        /// Offset of the rejected fragment.
        offset: u16,
        /// Size of the rejected fragment.
        count: u16,
        /// Offset of the fragment it collides with.
        existing_offset: u16,
        /// Size of the fragment it collides with.
        existing_count: u16,
    },
}

/// Conditions that end the current attempt without a retry.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ResourceExhausted {
    /// The fragment set is full.
    #[error("number of fragments exceeds maximum {limit}")]
    TooManyFragments {
        /// Largest number of fragments that may be held.
        limit: usize,
    },
    /// A fragment reaches past the end of the response buffer.
    #[error("offset {offset}, count {count}, too big for {capacity} byte buffer")]
    ResponseTooLarge {
        /// Offset of the offending fragment.
        offset: u16,
        /// Size of the offending fragment.
        count: u16,
        /// Response buffer capacity.
        capacity: usize,
    },
    /// More packets were examined than any legitimate response needs.
    #[error("too many packets in response ({limit}); bailing out")]
    TooManyPackets {
        /// Packet budget for one attempt.
        limit: usize,
    },
}
