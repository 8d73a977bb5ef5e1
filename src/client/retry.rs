//! One request/response exchange with a single built-in retry.

use std::time::Instant;

use log::{debug, trace, warn};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::{
    QueryConfig,
    QueryError,
    Transport,
    transport::RecvError,
    tracing_helpers::{attempt_span, emit_timing_event},
};
use crate::{
    auth::AuthContext,
    fragment::{AssembledResponse, FragmentCollector, FragmentOutcome},
    metrics::{self, PacketOutcome},
    request::{RequestContext, RequestEncoder},
};

/// Maximum number of attempts per query.
pub const MAX_ATTEMPTS: u8 = 2;

/// Where a [`RetryController`] is in its exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryState {
    /// Nothing sent yet.
    Idle,
    /// Request sent, no fragment accepted yet.
    Sent,
    /// At least one fragment accepted.
    Collecting,
    /// The response was reassembled.
    Complete,
    /// Nothing usable arrived in time.
    TimedOut,
    /// Fragments arrived but the response never completed.
    Incomplete,
    /// The server reported an error.
    ServerErrorTerminal,
    /// The response exceeded the collector's bounds.
    TooMuch,
    /// The caller cancelled the exchange.
    Cancelled,
    /// Encoding or the transport failed.
    Failed,
}

/// Drives one query: encode, send, collect, and retry once on timeout or an
/// incomplete response.
///
/// A retry after [`QueryError::Incomplete`] uses the next sequence number so
/// stragglers from the abandoned attempt are ignored; a retry after
/// [`QueryError::Timeout`] reuses the sequence. Every other failure is
/// terminal.
pub struct RetryController<'a> {
    config: &'a QueryConfig,
    auth: Option<&'a dyn AuthContext>,
    context: RequestContext,
    attempt: u8,
    state: QueryState,
}

impl std::fmt::Debug for RetryController<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryController")
            .field("context", &self.context)
            .field("attempt", &self.attempt)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<'a> RetryController<'a> {
    /// Create a controller for the request described by `context`.
    #[must_use]
    pub fn new(config: &'a QueryConfig, context: RequestContext) -> Self {
        let context = context.authenticated(context.is_authenticated() || config.always_authenticate());
        Self {
            config,
            auth: None,
            context,
            attempt: 0,
            state: QueryState::Idle,
        }
    }

    /// Sign requests and inspect reply MACs with `auth`.
    #[must_use]
    pub fn with_auth(mut self, auth: &'a dyn AuthContext) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Context of the current or most recent attempt.
    #[must_use]
    pub const fn context(&self) -> RequestContext { self.context }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> QueryState { self.state }

    /// Number of attempts started so far.
    #[must_use]
    pub const fn attempts(&self) -> u8 { self.attempt }

    /// Run the exchange to completion over `transport`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError`] when the exchange ends without a response. See
    /// [`QueryError::is_retryable`] for which errors trigger the retry.
    pub async fn run<T>(
        &mut self,
        transport: &mut T,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<AssembledResponse, QueryError>
    where
        T: Transport + ?Sized,
    {
        loop {
            self.attempt += 1;
            let span = attempt_span(self.config.tracing(), self.attempt, &self.context);
            let start = self.config.tracing().attempt_timing.then(Instant::now);
            let result = self
                .run_attempt(transport, payload, cancel)
                .instrument(span.clone())
                .await;
            span.in_scope(|| emit_timing_event(start));

            match result {
                Ok(response) => {
                    self.state = QueryState::Complete;
                    return Ok(response);
                }
                Err(err) if err.is_retryable() && self.attempt < MAX_ATTEMPTS => {
                    debug!("attempt {} failed, retrying: {err}", self.attempt);
                    metrics::inc_retries();
                    if matches!(err, QueryError::Incomplete) {
                        self.context = self.context.next();
                    }
                    self.state = QueryState::Idle;
                }
                Err(err) => {
                    self.state = terminal_state(&err);
                    return Err(err);
                }
            }
        }
    }

    async fn run_attempt<T>(
        &mut self,
        transport: &mut T,
        payload: &[u8],
        cancel: &CancellationToken,
    ) -> Result<AssembledResponse, QueryError>
    where
        T: Transport + ?Sized,
    {
        if cancel.is_cancelled() {
            return Err(QueryError::Cancelled);
        }

        let mut encoder = RequestEncoder::new(self.config.version());
        if let Some(auth) = self.auth {
            encoder = encoder.with_auth(auth);
        }
        let packet = encoder.encode(&self.context, payload)?;
        trace!("request packet: {}", hex_dump(&packet));
        transport.send(&packet).await?;
        self.state = QueryState::Sent;

        let mut collector = FragmentCollector::new(self.context, self.config.limits());
        if let Some(auth) = self.auth {
            collector = collector.with_verifier(auth);
        }

        loop {
            if let Err(exhausted) = collector.admit_packet() {
                warn!("{exhausted}");
                return Err(exhausted.into());
            }
            let wait = if collector.fragments().is_empty() {
                self.config.primary_timeout()
            } else {
                self.config.secondary_timeout()
            };

            let received = tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(QueryError::Cancelled),
                received = transport.recv_timeout(wait) => received,
            };
            let raw = match received {
                Ok(raw) => raw,
                Err(RecvError::Timeout) => return Err(self.timed_out(&collector)),
                Err(RecvError::Io(e)) => return Err(e.into()),
            };
            trace!("response packet: {}", hex_dump(&raw));

            match collector.accept(raw)? {
                FragmentOutcome::Ignored(_) => metrics::inc_packets(PacketOutcome::Ignored),
                FragmentOutcome::Invalid(_) => metrics::inc_packets(PacketOutcome::Invalid),
                FragmentOutcome::ServerError {
                    code,
                    association_id,
                } => {
                    metrics::inc_packets(PacketOutcome::ServerError);
                    return Err(QueryError::Server {
                        code,
                        association_id,
                    });
                }
                FragmentOutcome::Accepted => {
                    metrics::inc_packets(PacketOutcome::Accepted);
                    self.state = QueryState::Collecting;
                    tracing::Span::current().record("fragments", collector.fragments().len());
                    if let Some(response) = collector.response() {
                        return Ok(response);
                    }
                }
            }
        }
    }

    fn timed_out(&self, collector: &FragmentCollector<'_>) -> QueryError {
        let last_attempt = self.attempt >= MAX_ATTEMPTS;
        if collector.fragments().is_empty() {
            if last_attempt {
                warn!("timed out, nothing received");
            } else {
                debug!("timed out, nothing received");
            }
            return QueryError::Timeout;
        }

        if last_attempt {
            warn!("timed out with incomplete data");
        } else {
            debug!("timed out with incomplete data");
        }
        debug!("incomplete response, received fragments:");
        for (index, fragment) in collector.fragments().iter().enumerate() {
            debug!(
                "{index:2}: {:5} {:5}\t{:3} octets",
                fragment.offset(),
                fragment.end(),
                fragment.count()
            );
        }
        let seen = if collector.completion().last_fragment_seen() {
            ""
        } else {
            "not "
        };
        debug!("last fragment {seen}received");
        QueryError::Incomplete
    }
}

fn terminal_state(err: &QueryError) -> QueryState {
    match err {
        QueryError::Timeout => QueryState::TimedOut,
        QueryError::Incomplete => QueryState::Incomplete,
        QueryError::Server { .. } => QueryState::ServerErrorTerminal,
        QueryError::TooMuch(_) => QueryState::TooMuch,
        QueryError::Cancelled => QueryState::Cancelled,
        QueryError::Auth(_) | QueryError::Encode(_) | QueryError::Io(_) => QueryState::Failed,
    }
}

/// Render `bytes` as space-separated hex, sixteen octets per line.
fn hex_dump(bytes: &[u8]) -> String {
    use std::fmt::Write as _;

    let mut out = String::with_capacity(bytes.len() * 3 + bytes.len() / 16 + 1);
    for (index, chunk) in bytes.chunks(16).enumerate() {
        if index > 0 {
            out.push('\n');
        }
        for (i, byte) in chunk.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let _ = write!(out, "{byte:02x}");
        }
    }
    out
}
