//! Response fragment collection and reassembly.
//!
//! A mode 6 response may be split across many datagrams that arrive in any
//! order, repeat, overlap or go missing. [`FragmentCollector`] filters the
//! inbound packets for one attempt and files their payloads into an ordered
//! [`FragmentSet`]; once the terminal fragment has been seen and the set is
//! gapless from offset zero, [`ResponseAssembler`] hands back the response.
//!
//! All state in this module lives for exactly one attempt.

pub mod assembler;
pub mod collector;
pub mod config;
pub mod error;
pub mod set;

pub use assembler::{AssembledResponse, ResponseAssembler};
pub use collector::{CompletionState, FragmentCollector, FragmentOutcome};
pub use config::CollectorLimits;
pub use error::{IgnoreReason, ProtocolViolation, ResourceExhausted};
pub use set::{Fragment, FragmentSet, Insertion};

#[cfg(test)]
mod tests;
