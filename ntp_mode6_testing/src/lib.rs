//! Test utilities for `ntp_mode6`.
//!
//! These helpers drive a [`Mode6Client`](ntp_mode6::client::Mode6Client)
//! against scripted or loopback servers and capture its logs and metrics.
//!
//! ```rust
//! use ntp_mode6::protocol::Opcode;
//! use ntp_mode6_testing::{ScriptedTransport, Step, split_response};
//!
//! let replies = split_response(Opcode::READ_VARIABLES, 1, 0, b"version=4", 4);
//! let transport = ScriptedTransport::new(replies.into_iter().map(Step::Deliver));
//! # let _ = transport;
//! ```

pub mod logging;
pub mod metrics;
pub mod packets;
pub mod transport;
pub mod udp_server;

pub use logging::{LoggerHandle, logger};
pub use metrics::{MetricEntry, counter_total, debugging_recorder_setup, snapshot};
pub use packets::{ResponseBuilder, split_response};
pub use transport::{ScriptedTransport, Step};
pub use udp_server::spawn_udp_responder;
