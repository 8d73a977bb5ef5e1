use bytes::{Buf, BufMut};

use super::{HEADER_LEN, MODE_CONTROL, Opcode, ProtocolVersion};

/// Flag bits carried alongside the opcode in the `r_m_e_op` octet.
///
/// # Examples
///
/// ```
/// use ntp_mode6::protocol::ControlFlags;
///
/// let flags = ControlFlags::RESPONSE.with(ControlFlags::MORE);
/// assert!(flags.is_response());
/// assert!(flags.has_more());
/// assert!(!flags.is_error());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ControlFlags(u8);

impl ControlFlags {
    /// No flags set: a request.
    pub const NONE: Self = Self(0);
    /// Set on every packet sent by the server.
    pub const RESPONSE: Self = Self(0x80);
    /// Set when the status word carries an error code.
    pub const ERROR: Self = Self(0x40);
    /// Set on every fragment except the terminal one.
    pub const MORE: Self = Self(0x20);

    const ALL: u8 = 0xe0;

    /// Combine two flag sets.
    #[must_use]
    pub const fn with(self, other: Self) -> Self { Self(self.0 | other.0) }

    /// Return the raw flag bits.
    #[must_use]
    pub const fn bits(self) -> u8 { self.0 }

    /// Report whether the response bit is set.
    #[must_use]
    pub const fn is_response(self) -> bool { self.0 & Self::RESPONSE.0 != 0 }

    /// Report whether the error bit is set.
    #[must_use]
    pub const fn is_error(self) -> bool { self.0 & Self::ERROR.0 != 0 }

    /// Report whether more fragments follow this one.
    #[must_use]
    pub const fn has_more(self) -> bool { self.0 & Self::MORE.0 != 0 }

    const fn from_octet(octet: u8) -> Self { Self(octet & Self::ALL) }
}

/// The fixed 12-byte header shared by control requests and responses.
///
/// Parsing never validates semantics; it only splits the octets into fields
/// so the collector can apply its checks in a fixed order.
///
/// # Examples
///
/// ```
/// use bytes::BytesMut;
/// use ntp_mode6::protocol::{ControlFlags, ControlHeader, Opcode, ProtocolVersion};
///
/// let header = ControlHeader::request(ProtocolVersion::default(), Opcode::READ_VARIABLES, 7, 0, 5);
/// let mut buf = BytesMut::new();
/// header.encode(&mut buf);
/// assert_eq!(buf.len(), 12);
///
/// let parsed = ControlHeader::parse(&buf).expect("complete header");
/// assert_eq!(parsed, header);
/// assert_eq!(parsed.flags(), ControlFlags::NONE);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ControlHeader {
    li_vn_mode: u8,
    flags: ControlFlags,
    opcode: Opcode,
    sequence: u16,
    status: u16,
    association_id: u16,
    offset: u16,
    count: u16,
}

impl ControlHeader {
    /// Build the header of an outbound request.
    #[must_use]
    pub const fn request(
        version: ProtocolVersion,
        opcode: Opcode,
        sequence: u16,
        association_id: u16,
        count: u16,
    ) -> Self {
        Self {
            li_vn_mode: (version.get() << 3) | MODE_CONTROL,
            flags: ControlFlags::NONE,
            opcode,
            sequence,
            status: 0,
            association_id,
            offset: 0,
            count,
        }
    }

    /// Build the header of a response fragment.
    ///
    /// Clients never send these; the constructor exists for servers,
    /// simulators and tests.
    #[must_use]
    #[expect(
        clippy::too_many_arguments,
        reason = "mirrors the eight wire fields of a response header"
    )]
    pub const fn response(
        version: ProtocolVersion,
        flags: ControlFlags,
        opcode: Opcode,
        sequence: u16,
        status: u16,
        association_id: u16,
        offset: u16,
        count: u16,
    ) -> Self {
        Self {
            li_vn_mode: (version.get() << 3) | MODE_CONTROL,
            flags: flags.with(ControlFlags::RESPONSE),
            opcode,
            sequence,
            status,
            association_id,
            offset,
            count,
        }
    }

    /// Split the first [`HEADER_LEN`] bytes of `packet` into fields.
    ///
    /// Returns `None` when the packet is too short to hold a header.
    #[must_use]
    pub fn parse(packet: &[u8]) -> Option<Self> {
        if packet.len() < HEADER_LEN {
            return None;
        }
        let mut buf = &packet[..HEADER_LEN];
        let li_vn_mode = buf.get_u8();
        let r_m_e_op = buf.get_u8();
        Some(Self {
            li_vn_mode,
            flags: ControlFlags::from_octet(r_m_e_op),
            opcode: Opcode::new(r_m_e_op),
            sequence: buf.get_u16(),
            status: buf.get_u16(),
            association_id: buf.get_u16(),
            offset: buf.get_u16(),
            count: buf.get_u16(),
        })
    }

    /// Append the header in wire order to `buf`.
    pub fn encode(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.li_vn_mode);
        buf.put_u8(self.flags.bits() | self.opcode.get());
        buf.put_u16(self.sequence);
        buf.put_u16(self.status);
        buf.put_u16(self.association_id);
        buf.put_u16(self.offset);
        buf.put_u16(self.count);
    }

    /// Return a copy of the header with a different `li_vn_mode` octet.
    #[must_use]
    pub const fn with_li_vn_mode(mut self, li_vn_mode: u8) -> Self {
        self.li_vn_mode = li_vn_mode;
        self
    }

    /// Raw version field.
    #[must_use]
    pub const fn version(&self) -> u8 { (self.li_vn_mode >> 3) & 0x07 }

    /// Raw mode field.
    #[must_use]
    pub const fn mode(&self) -> u8 { self.li_vn_mode & 0x07 }

    /// Flag bits.
    #[must_use]
    pub const fn flags(&self) -> ControlFlags { self.flags }

    /// Operation code.
    #[must_use]
    pub const fn opcode(&self) -> Opcode { self.opcode }

    /// Correlation sequence number.
    #[must_use]
    pub const fn sequence(&self) -> u16 { self.sequence }

    /// Status word.
    #[must_use]
    pub const fn status(&self) -> u16 { self.status }

    /// Association the packet refers to.
    #[must_use]
    pub const fn association_id(&self) -> u16 { self.association_id }

    /// Byte offset of this fragment within the logical response.
    #[must_use]
    pub const fn offset(&self) -> u16 { self.offset }

    /// Number of payload bytes carried by this packet.
    #[must_use]
    pub const fn count(&self) -> u16 { self.count }
}
