//! Client runtime for mode 6 queries.
//!
//! [`Mode6Client`] owns a [`Transport`] and the request sequence counter and
//! hands each query to a [`RetryController`], which encodes the request,
//! collects the response fragments and retries once when the first attempt
//! times out or ends incomplete. Every query runs inside a `client.query`
//! tracing span; each attempt inside a nested `client.attempt` span.

mod config;
mod error;
mod retry;
mod runtime;
mod tracing_config;
mod tracing_helpers;
mod transport;

pub use config::{DEFAULT_PRIMARY_TIMEOUT, DEFAULT_SECONDARY_TIMEOUT, QueryConfig};
pub use error::QueryError;
pub use retry::{MAX_ATTEMPTS, QueryState, RetryController};
pub use runtime::{Mode6Client, Query};
pub use tracing_config::TracingConfig;
pub use transport::{MAX_DATAGRAM, RecvError, Transport, UdpTransport};
