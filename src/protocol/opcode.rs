use std::{fmt, str::FromStr};

use derive_more::Into;

/// Control-message operation code (the low five bits of `r_m_e_op`).
///
/// Unknown values are preserved so callers can issue vendor or future
/// opcodes without this crate having to know about them.
///
/// # Examples
///
/// ```
/// use ntp_mode6::protocol::Opcode;
///
/// assert_eq!(Opcode::READ_VARIABLES.get(), 2);
/// assert_eq!("readvar".parse::<Opcode>(), Ok(Opcode::READ_VARIABLES));
/// assert_eq!("17".parse::<Opcode>().map(Opcode::get), Ok(17));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Into)]
pub struct Opcode(u8);

impl Opcode {
    /// Mask selecting the opcode bits of `r_m_e_op`.
    pub const MASK: u8 = 0x1f;

    /// Unspecified operation.
    pub const UNSPECIFIED: Self = Self(0);
    /// Read the status word of the system or a peer.
    pub const READ_STATUS: Self = Self(1);
    /// Read system or peer variables.
    pub const READ_VARIABLES: Self = Self(2);
    /// Write system or peer variables.
    pub const WRITE_VARIABLES: Self = Self(3);
    /// Read reference clock variables.
    pub const READ_CLOCK: Self = Self(4);
    /// Write reference clock variables.
    pub const WRITE_CLOCK: Self = Self(5);
    /// Install a trap.
    pub const SET_TRAP: Self = Self(6);
    /// Asynchronous message (trap delivery).
    pub const ASYNC_MESSAGE: Self = Self(7);
    /// Runtime configuration.
    pub const CONFIGURE: Self = Self(8);
    /// Save the running configuration.
    pub const SAVE_CONFIG: Self = Self(9);
    /// Read the MRU list.
    pub const READ_MRU: Self = Self(10);
    /// Read an ordered list (interface or restriction statistics).
    pub const READ_ORDERED_LIST: Self = Self(11);
    /// Request a nonce for MRU retrieval.
    pub const REQUEST_NONCE: Self = Self(12);
    /// Remove a trap.
    pub const UNSET_TRAP: Self = Self(31);

    const NAMED: [(Self, &'static str); 14] = [
        (Self::UNSPECIFIED, "unspec"),
        (Self::READ_STATUS, "readstat"),
        (Self::READ_VARIABLES, "readvar"),
        (Self::WRITE_VARIABLES, "writevar"),
        (Self::READ_CLOCK, "readclock"),
        (Self::WRITE_CLOCK, "writeclock"),
        (Self::SET_TRAP, "settrap"),
        (Self::ASYNC_MESSAGE, "asyncmsg"),
        (Self::CONFIGURE, "configure"),
        (Self::SAVE_CONFIG, "saveconfig"),
        (Self::READ_MRU, "read_mru"),
        (Self::READ_ORDERED_LIST, "read_ordlist_a"),
        (Self::REQUEST_NONCE, "req_nonce"),
        (Self::UNSET_TRAP, "unsettrap"),
    ];

    /// Wrap a raw opcode, discarding bits outside [`Opcode::MASK`].
    #[must_use]
    pub const fn new(value: u8) -> Self { Self(value & Self::MASK) }

    /// Return the raw opcode value.
    #[must_use]
    pub const fn get(self) -> u8 { self.0 }

    /// Return the conventional name for well-known opcodes.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(opcode, _)| *opcode == self)
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "opcode {}", self.0),
        }
    }
}

/// Error returned when an opcode name cannot be parsed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown opcode `{0}`")]
pub struct UnknownOpcode(String);

impl FromStr for Opcode {
    type Err = UnknownOpcode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((opcode, _)) = Self::NAMED
            .iter()
            .find(|(_, name)| name.eq_ignore_ascii_case(s))
        {
            return Ok(*opcode);
        }
        match s.parse::<u8>() {
            Ok(value) if value <= Self::MASK => Ok(Self(value)),
            _ => Err(UnknownOpcode(s.to_owned())),
        }
    }
}
