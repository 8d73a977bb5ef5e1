//! Wire-level vocabulary of the NTP control protocol (mode 6).
//!
//! Every control packet starts with the same 12-byte header whether it is a
//! request or one fragment of a response. This module owns that header, the
//! opcode and error-code newtypes, and the fixed limits the reassembly engine
//! enforces.

mod error_code;
mod header;
mod opcode;
mod version;

pub use error_code::ServerErrorCode;
pub use header::{ControlHeader, ControlFlags};
pub use opcode::{Opcode, UnknownOpcode};
pub use version::ProtocolVersion;

/// Length of the fixed control header in bytes.
pub const HEADER_LEN: usize = 12;

/// Largest payload a single request may carry.
pub const MAX_REQUEST_DATA: usize = 468;

/// Maximum number of fragments a response may be split into.
pub const MAX_FRAGMENTS: usize = 32;

/// Upper bound on the size of a reassembled response.
pub const RESPONSE_CAPACITY: usize = MAX_FRAGMENTS * 480;

/// Length of the key identifier that prefixes every MAC.
pub const KEY_ID_LEN: usize = 4;

/// Association id addressing system-wide variables.
pub const SYSTEM_ASSOCIATION: u16 = 0;

/// Packet mode value for control messages.
pub const MODE_CONTROL: u8 = 6;

#[cfg(test)]
mod tests;
