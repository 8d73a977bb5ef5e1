//! Mode 6 client runtime.

use std::{fmt, io, sync::Arc, time::Instant};

use tokio::net::ToSocketAddrs;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{
    QueryConfig,
    QueryError,
    RetryController,
    Transport,
    UdpTransport,
    tracing_helpers::{emit_timing_event, query_span},
};
use crate::{
    auth::AuthContext,
    fragment::AssembledResponse,
    metrics,
    protocol::{Opcode, SYSTEM_ASSOCIATION},
    request::RequestContext,
};

/// Parameters of one query.
///
/// # Examples
///
/// ```
/// use ntp_mode6::{client::Query, protocol::Opcode};
///
/// let query = Query::new(Opcode::READ_VARIABLES)
///     .association(12)
///     .payload(b"offset,jitter")
///     .authenticated(false);
/// assert_eq!(query.association_id(), 12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Query<'p> {
    opcode: Opcode,
    association_id: u16,
    payload: &'p [u8],
    authenticated: bool,
}

impl<'p> Query<'p> {
    /// An unauthenticated query of the system association with no payload.
    #[must_use]
    pub const fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            association_id: SYSTEM_ASSOCIATION,
            payload: &[],
            authenticated: false,
        }
    }

    /// Address a specific association.
    #[must_use]
    pub const fn association(mut self, association_id: u16) -> Self {
        self.association_id = association_id;
        self
    }

    /// Attach request data.
    #[must_use]
    pub const fn payload(mut self, payload: &'p [u8]) -> Self {
        self.payload = payload;
        self
    }

    /// Request a signed query.
    #[must_use]
    pub const fn authenticated(mut self, authenticated: bool) -> Self {
        self.authenticated = authenticated;
        self
    }

    /// Operation code.
    #[must_use]
    pub const fn opcode(&self) -> Opcode { self.opcode }

    /// Target association.
    #[must_use]
    pub const fn association_id(&self) -> u16 { self.association_id }

    /// Request data.
    #[must_use]
    pub const fn data(&self) -> &'p [u8] { self.payload }

    /// Report whether the query asks for signing.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool { self.authenticated }
}

/// Client issuing mode 6 queries to one server.
///
/// The client owns the request sequence counter. Each query advances it by
/// one before sending; a retry after an incomplete response advances it
/// again. Only one query is outstanding at a time.
///
/// # Examples
///
/// ```no_run
/// use ntp_mode6::{
///     client::{Mode6Client, Query, QueryConfig},
///     protocol::Opcode,
/// };
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut client = Mode6Client::connect("127.0.0.1:123", QueryConfig::default()).await?;
/// let response = client.query(Query::new(Opcode::READ_VARIABLES)).await?;
/// println!("{}", String::from_utf8_lossy(response.data()));
/// # Ok(())
/// # }
/// ```
pub struct Mode6Client<T> {
    transport: T,
    config: QueryConfig,
    auth: Option<Arc<dyn AuthContext>>,
    sequence: u16,
}

impl<T> fmt::Debug for Mode6Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mode6Client")
            .field("config", &self.config)
            .field("auth_key_id", &self.auth.as_ref().map(|auth| auth.key_id()))
            .field("sequence", &self.sequence)
            .finish_non_exhaustive()
    }
}

impl Mode6Client<UdpTransport> {
    /// Connect a UDP transport to `addr`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the address cannot be resolved or the socket
    /// cannot be set up.
    pub async fn connect(addr: impl ToSocketAddrs, config: QueryConfig) -> io::Result<Self> {
        let transport = UdpTransport::connect(addr).await?;
        Ok(Self::new(transport, config))
    }
}

impl<T: Transport> Mode6Client<T> {
    /// Create a client over `transport`.
    #[must_use]
    pub fn new(transport: T, config: QueryConfig) -> Self {
        Self {
            transport,
            config: config.normalized(),
            auth: None,
            sequence: 0,
        }
    }

    /// Use `auth` to sign requests and inspect reply MACs.
    #[must_use]
    pub fn with_auth(mut self, auth: Arc<dyn AuthContext>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Start the sequence counter at `sequence`; the next query uses
    /// `sequence + 1`.
    #[must_use]
    pub const fn with_sequence(mut self, sequence: u16) -> Self {
        self.sequence = sequence;
        self
    }

    /// Sequence number used by the most recent attempt.
    #[must_use]
    pub const fn sequence(&self) -> u16 { self.sequence }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &QueryConfig { &self.config }

    /// Borrow the underlying transport.
    pub fn transport_mut(&mut self) -> &mut T { &mut self.transport }

    /// Consume the client and return its transport.
    #[must_use]
    pub fn into_transport(self) -> T { self.transport }

    /// Issue `query` and wait for the reassembled response.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when no complete response is obtained.
    pub async fn query(&mut self, query: Query<'_>) -> Result<AssembledResponse, QueryError> {
        self.query_with_cancel(query, &CancellationToken::new()).await
    }

    /// Issue `query`, giving up early once `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Cancelled`] when `cancel` fires before the
    /// response completes, or any other [`QueryError`] the exchange ends with.
    pub async fn query_with_cancel(
        &mut self,
        query: Query<'_>,
        cancel: &CancellationToken,
    ) -> Result<AssembledResponse, QueryError> {
        self.sequence = self.sequence.wrapping_add(1);
        let context = RequestContext::new(query.opcode(), query.association_id(), self.sequence)
            .authenticated(query.is_authenticated());

        let span = query_span(self.config.tracing(), &context);
        let start = self.config.tracing().query_timing.then(Instant::now);
        let mut controller = RetryController::new(&self.config, context);
        if let Some(auth) = self.auth.as_deref() {
            controller = controller.with_auth(auth);
        }
        let result = controller
            .run(&mut self.transport, query.data(), cancel)
            .instrument(span.clone())
            .await;
        self.sequence = controller.context().sequence();
        let label = match &result {
            Ok(_) => "ok",
            Err(err) => err.kind(),
        };
        span.record("final_sequence", self.sequence);
        span.record("result", label);
        span.in_scope(|| emit_timing_event(start));

        metrics::inc_queries(label);
        result
    }
}
