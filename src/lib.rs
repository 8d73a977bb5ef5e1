#![doc(html_root_url = "https://docs.rs/ntp_mode6/latest")]
//! Public API for the `ntp_mode6` library.
//!
//! This crate implements the client side of the NTP mode 6 control protocol:
//! encoding (optionally signed) requests, collecting response fragments that
//! may arrive out of order, duplicated or overlapping, reassembling them, and
//! retrying once when a reply times out or ends incomplete.
//!
//! The layers are usable on their own:
//!
//! - [`request::RequestEncoder`] turns a [`request::RequestContext`] and payload into a datagram.
//! - [`fragment::FragmentCollector`] validates inbound datagrams for one attempt.
//! - [`fragment::ResponseAssembler`] joins a complete fragment set.
//! - [`client::RetryController`] and [`client::Mode6Client`] drive the exchange over a
//!   [`client::Transport`].

pub mod auth;
pub mod byte_order;
pub mod client;
pub mod fragment;
pub mod metrics;
pub mod protocol;
pub mod request;

pub use auth::{AuthContext, AuthError, Md5Key};
pub use client::{Mode6Client, Query, QueryConfig, QueryError, RetryController, Transport};
pub use fragment::{AssembledResponse, CollectorLimits, FragmentCollector, ResponseAssembler};
pub use protocol::{ControlHeader, Opcode, ProtocolVersion, ServerErrorCode};
pub use request::{EncodeError, RequestContext, RequestEncoder};
