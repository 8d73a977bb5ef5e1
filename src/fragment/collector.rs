//! Per-attempt filtering of inbound response packets.

use bytes::Bytes;
use log::debug;

use super::{
    AssembledResponse,
    CollectorLimits,
    Fragment,
    FragmentSet,
    IgnoreReason,
    Insertion,
    ProtocolViolation,
    ResourceExhausted,
    ResponseAssembler,
};
use crate::{
    auth::AuthContext,
    byte_order::{pad_to, read_network_u32},
    protocol::{ControlHeader, HEADER_LEN, KEY_ID_LEN, MODE_CONTROL, ProtocolVersion, ServerErrorCode},
    request::RequestContext,
};

/// Whether the terminal fragment has been accepted, and its status word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CompletionState {
    last_fragment_seen: bool,
    status: u16,
}

impl CompletionState {
    /// State after accepting a terminal fragment carrying `status`.
    #[must_use]
    pub const fn terminal(status: u16) -> Self {
        Self {
            last_fragment_seen: true,
            status,
        }
    }

    /// Report whether a fragment without the "more" flag has been accepted.
    #[must_use]
    pub const fn last_fragment_seen(&self) -> bool { self.last_fragment_seen }

    /// Status word of the terminal fragment, zero until it arrives.
    #[must_use]
    pub const fn status(&self) -> u16 { self.status }
}

/// What became of one inbound datagram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentOutcome {
    /// Not a reply to the outstanding request, or a harmless repeat.
    Ignored(IgnoreReason),
    /// The server rejected the request; the attempt is over.
    ServerError {
        /// Code from the high byte of the status word.
        code: ServerErrorCode,
        /// Association id echoed by the server.
        association_id: u16,
    },
    /// The fragment was filed.
    Accepted,
    /// The packet belongs to this exchange but its contents are unusable.
    Invalid(ProtocolViolation),
}

/// Validates inbound datagrams against one [`RequestContext`] and gathers the
/// accepted fragments.
///
/// A collector serves a single attempt. A retry starts a new collector so
/// nothing from the abandoned attempt can leak into the next one.
pub struct FragmentCollector<'a> {
    context: RequestContext,
    limits: CollectorLimits,
    fragments: FragmentSet,
    completion: CompletionState,
    verifier: Option<&'a dyn AuthContext>,
    packets: usize,
}

impl std::fmt::Debug for FragmentCollector<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FragmentCollector")
            .field("context", &self.context)
            .field("limits", &self.limits)
            .field("fragments", &self.fragments)
            .field("completion", &self.completion)
            .field("verifier_key_id", &self.verifier.map(|auth| auth.key_id()))
            .field("packets", &self.packets)
            .finish()
    }
}

impl<'a> FragmentCollector<'a> {
    /// Create a collector for replies to `context`.
    #[must_use]
    pub fn new(context: RequestContext, limits: CollectorLimits) -> Self {
        let limits = limits.normalized();
        Self {
            context,
            limits,
            fragments: FragmentSet::with_capacity(limits.fragment_capacity()),
            completion: CompletionState::default(),
            verifier: None,
            packets: 0,
        }
    }

    /// Inspect trailing MACs on replies with `verifier`.
    ///
    /// Verification is reported in the logs only; it never changes the
    /// outcome of [`accept`](Self::accept).
    #[must_use]
    pub fn with_verifier(mut self, verifier: &'a dyn AuthContext) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Request this collector matches replies against.
    #[must_use]
    pub const fn context(&self) -> &RequestContext { &self.context }

    /// Fragments accepted so far.
    #[must_use]
    pub const fn fragments(&self) -> &FragmentSet { &self.fragments }

    /// Completion state so far.
    #[must_use]
    pub const fn completion(&self) -> CompletionState { self.completion }

    /// Number of packets admitted against the packet budget.
    #[must_use]
    pub const fn packets_examined(&self) -> usize { self.packets }

    /// Charge one packet wait against the attempt's packet budget.
    ///
    /// Call this before each receive; the budget is `2 * max_fragments`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceExhausted::TooManyPackets`] once the budget is spent.
    pub fn admit_packet(&mut self) -> Result<(), ResourceExhausted> {
        let limit = self.limits.packet_budget();
        if self.packets >= limit {
            return Err(ResourceExhausted::TooManyPackets { limit });
        }
        self.packets += 1;
        Ok(())
    }

    /// Validate `raw` and file its payload when it belongs to the response.
    ///
    /// Checks run in a fixed order and the first failure decides the
    /// outcome. Peer input never causes a panic.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceExhausted`] when a fragment reaches past the response
    /// buffer or the fragment set is full. Either ends the attempt.
    pub fn accept(&mut self, raw: Bytes) -> Result<FragmentOutcome, ResourceExhausted> {
        let Some(header) = ControlHeader::parse(&raw) else {
            return Ok(ignore(IgnoreReason::ShortPacket { len: raw.len() }));
        };
        if !ProtocolVersion::is_supported(header.version()) {
            return Ok(ignore(IgnoreReason::UnsupportedVersion(header.version())));
        }
        if header.mode() != MODE_CONTROL {
            return Ok(ignore(IgnoreReason::NotControl(header.mode())));
        }
        if !header.flags().is_response() {
            return Ok(ignore(IgnoreReason::NotResponse));
        }
        if header.sequence() != self.context.sequence() {
            return Ok(ignore(IgnoreReason::SequenceMismatch {
                expected: self.context.sequence(),
                found: header.sequence(),
            }));
        }
        if header.opcode() != self.context.opcode() {
            return Ok(ignore(IgnoreReason::OpcodeMismatch {
                expected: self.context.opcode(),
                found: header.opcode(),
            }));
        }

        if header.flags().is_error() {
            let code = ServerErrorCode::from_status(header.status());
            if header.flags().has_more() {
                debug!("error code {} received on not-final packet", code.code());
            }
            return Ok(FragmentOutcome::ServerError {
                code,
                association_id: header.association_id(),
            });
        }

        if header.association_id() != self.context.association_id() {
            debug!(
                "association id {} doesn't match expected {}",
                header.association_id(),
                self.context.association_id()
            );
        }

        let offset = header.offset();
        let count = header.count();
        let available = raw.len() - HEADER_LEN;
        if raw.len() % 4 != 0 {
            return Ok(invalid(ProtocolViolation::Unpadded { len: raw.len() }));
        }
        if usize::from(count) > available {
            return Ok(invalid(ProtocolViolation::CountExceedsPayload { count, available }));
        }
        self.inspect_mac(&raw, count);

        let terminal = !header.flags().has_more();
        if count == 0 && !terminal {
            return Ok(invalid(ProtocolViolation::EmptyNonFinal { offset }));
        }
        let capacity = self.limits.response_capacity;
        if usize::from(offset) + usize::from(count) > capacity {
            debug!("offset {offset}, count {count}, too big for buffer");
            return Err(ResourceExhausted::ResponseTooLarge {
                offset,
                count,
                capacity,
            });
        }
        if self.completion.last_fragment_seen && terminal {
            return Ok(invalid(ProtocolViolation::DuplicateTerminal { offset }));
        }

        let payload = raw.slice(HEADER_LEN..HEADER_LEN + usize::from(count));
        let Some(fragment) = Fragment::new(offset, payload) else {
            return Ok(invalid(ProtocolViolation::CountExceedsPayload { count, available }));
        };
        match self.fragments.insert(fragment)? {
            Insertion::Duplicate { prior_count } => {
                return Ok(ignore(IgnoreReason::DuplicateFragment {
                    offset,
                    count,
                    prior_count,
                }));
            }
            Insertion::Overlap {
                existing_offset,
                existing_count,
            } => {
                return Ok(invalid(ProtocolViolation::Overlap {
                    offset,
                    count,
                    existing_offset,
                    existing_count,
                }));
            }
            Insertion::Inserted => {}
        }

        if terminal {
            self.completion = CompletionState::terminal(header.status());
        }
        Ok(FragmentOutcome::Accepted)
    }

    /// The reassembled response, once every fragment has arrived.
    #[must_use]
    pub fn response(&self) -> Option<AssembledResponse> {
        let response = ResponseAssembler::assemble(&self.fragments, self.completion)?;
        debug!(
            "{} packets reassembled into response",
            response.fragment_count()
        );
        Some(response)
    }

    fn inspect_mac(&self, raw: &[u8], count: u16) {
        let Some(verifier) = self.verifier else {
            return;
        };
        let signed_len = pad_to(pad_to(HEADER_LEN + usize::from(count), 4), 8);
        let Some(mac) = raw.get(signed_len..).filter(|mac| mac.len() >= KEY_ID_LEN) else {
            return;
        };
        debug!(
            "packet shows signs of authentication: total={}, data={signed_len}, mac={}",
            raw.len(),
            mac.len()
        );
        let Some(key_id) = mac.first_chunk::<KEY_ID_LEN>().copied().map(read_network_u32) else {
            return;
        };
        if key_id != 0 && key_id != verifier.key_id() {
            debug!("reply authenticated with unknown key id {key_id}");
            return;
        }
        if verifier.verify(&raw[..signed_len], mac) {
            debug!("reply authenticated with key id {key_id}: auth okay");
        } else {
            debug!("reply authenticated with key id {key_id}: auth failed");
        }
    }
}

fn ignore(reason: IgnoreReason) -> FragmentOutcome {
    debug!("packet ignored: {reason}");
    FragmentOutcome::Ignored(reason)
}

fn invalid(violation: ProtocolViolation) -> FragmentOutcome {
    debug!("packet dropped: {violation}");
    FragmentOutcome::Invalid(violation)
}
