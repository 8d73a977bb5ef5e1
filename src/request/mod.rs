//! Outbound request encoding.
//!
//! A request is one datagram: the control header, an optional payload padded
//! to a 4-byte boundary and, for authenticated requests, a MAC appended
//! after padding the packet to 8 bytes.
//!
//! ```
//! use ntp_mode6::{
//!     protocol::{Opcode, ProtocolVersion},
//!     request::{RequestContext, RequestEncoder},
//! };
//!
//! let context = RequestContext::new(Opcode::READ_VARIABLES, 0, 1);
//! let packet = RequestEncoder::new(ProtocolVersion::default())
//!     .encode(&context, b"version")
//!     .expect("payload fits in one request");
//! assert_eq!(packet.len(), 12 + 8);
//! ```

mod context;
mod encoder;
mod error;

pub use context::RequestContext;
pub use encoder::RequestEncoder;
pub use error::EncodeError;

#[cfg(test)]
mod tests;
