//! Builders for server-side control packets.

use bytes::{BufMut, Bytes, BytesMut};
use ntp_mode6::protocol::{ControlFlags, ControlHeader, Opcode, ProtocolVersion};

/// Fluent builder for one response datagram.
///
/// Defaults describe a terminal, error-free reply to `readvar` sequence 1 on
/// the system association.
///
/// ```
/// use ntp_mode6::protocol::{ControlHeader, Opcode};
/// use ntp_mode6_testing::ResponseBuilder;
///
/// let raw = ResponseBuilder::new(Opcode::READ_STATUS, 7)
///     .offset(4)
///     .more(true)
///     .payload(b"abc")
///     .build();
/// assert_eq!(raw.len(), 16);
/// let header = ControlHeader::parse(&raw).expect("header");
/// assert!(header.flags().has_more());
/// ```
#[derive(Clone, Debug)]
pub struct ResponseBuilder {
    version: ProtocolVersion,
    opcode: Opcode,
    sequence: u16,
    status: u16,
    association_id: u16,
    offset: u16,
    more: bool,
    error: bool,
    count: Option<u16>,
    payload: Vec<u8>,
    pad: bool,
    trailer: Vec<u8>,
}

impl ResponseBuilder {
    /// Start a reply to `opcode` carrying `sequence`.
    #[must_use]
    pub fn new(opcode: Opcode, sequence: u16) -> Self {
        Self {
            version: ProtocolVersion::default(),
            opcode,
            sequence,
            status: 0,
            association_id: 0,
            offset: 0,
            more: false,
            error: false,
            count: None,
            payload: Vec::new(),
            pad: true,
            trailer: Vec::new(),
        }
    }

    /// Set the version field.
    #[must_use]
    pub fn version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    /// Set the status word.
    #[must_use]
    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Set the association id.
    #[must_use]
    pub fn association(mut self, association_id: u16) -> Self {
        self.association_id = association_id;
        self
    }

    /// Set the fragment offset.
    #[must_use]
    pub fn offset(mut self, offset: u16) -> Self {
        self.offset = offset;
        self
    }

    /// Mark the fragment as non-terminal.
    #[must_use]
    pub fn more(mut self, more: bool) -> Self {
        self.more = more;
        self
    }

    /// Flag the reply as a server error carrying `code` in the status word.
    #[must_use]
    pub fn error(mut self, code: u8) -> Self {
        self.error = true;
        self.status = u16::from(code) << 8;
        self
    }

    /// Override the header's count field.
    #[must_use]
    pub fn count(mut self, count: u16) -> Self {
        self.count = Some(count);
        self
    }

    /// Set the fragment payload.
    #[must_use]
    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    /// Leave the datagram unpadded.
    #[must_use]
    pub fn unpadded(mut self) -> Self {
        self.pad = false;
        self
    }

    /// Append raw bytes after the padded payload, such as a MAC.
    #[must_use]
    pub fn trailer(mut self, trailer: &[u8]) -> Self {
        self.trailer = trailer.to_vec();
        self
    }

    /// Header this builder would emit.
    #[must_use]
    pub fn header(&self) -> ControlHeader {
        let mut flags = ControlFlags::NONE;
        if self.more {
            flags = flags.with(ControlFlags::MORE);
        }
        if self.error {
            flags = flags.with(ControlFlags::ERROR);
        }
        let count = self
            .count
            .unwrap_or_else(|| u16::try_from(self.payload.len()).unwrap_or(u16::MAX));
        ControlHeader::response(
            self.version,
            flags,
            self.opcode,
            self.sequence,
            self.status,
            self.association_id,
            self.offset,
            count,
        )
    }

    /// Serialise the datagram.
    #[must_use]
    pub fn build(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.header().encode(&mut buf);
        buf.put_slice(&self.payload);
        if self.pad {
            let padded = (buf.len() + 3) & !3;
            buf.resize(padded, 0);
        }
        buf.put_slice(&self.trailer);
        buf.freeze()
    }
}

/// Split `data` into terminal-marked reply fragments of at most `chunk`
/// bytes each, in offset order.
///
/// An empty `data` yields a single zero-length terminal fragment.
///
/// # Panics
///
/// Panics if `chunk` is zero or an offset does not fit in 16 bits.
#[must_use]
pub fn split_response(opcode: Opcode, sequence: u16, status: u16, data: &[u8], chunk: usize) -> Vec<Bytes> {
    assert!(chunk > 0, "chunk size must be non-zero");
    if data.is_empty() {
        return vec![ResponseBuilder::new(opcode, sequence).status(status).build()];
    }
    let pieces: Vec<&[u8]> = data.chunks(chunk).collect();
    let last = pieces.len() - 1;
    pieces
        .iter()
        .enumerate()
        .map(|(index, piece)| {
            let offset = u16::try_from(index * chunk).expect("offset fits u16");
            ResponseBuilder::new(opcode, sequence)
                .status(status)
                .offset(offset)
                .more(index != last)
                .payload(piece)
                .build()
        })
        .collect()
}
