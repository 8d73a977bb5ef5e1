//! In-memory [`Transport`] driven by a script of receive results.

use std::{collections::VecDeque, io, time::Duration};

use async_trait::async_trait;
use bytes::Bytes;
use ntp_mode6::{
    client::{RecvError, Transport},
    protocol::ControlHeader,
};

/// What one receive call yields.
#[derive(Clone, Debug)]
pub enum Step {
    /// Deliver a datagram.
    Deliver(Bytes),
    /// Report that the wait expired.
    Timeout,
    /// Fail with an I/O error of this kind.
    Fail(io::ErrorKind),
    /// Never complete; the caller must cancel.
    Hang,
}

type Responder = Box<dyn FnMut(&ControlHeader) -> Vec<Step> + Send>;

/// Scripted transport recording every send and every receive wait.
///
/// Receive calls consume queued [`Step`]s in order and time out once the
/// queue is empty. A responder, when set, sees each sent request header and
/// may queue further steps, which lets tests answer with the sequence number
/// actually used.
///
/// ```
/// use ntp_mode6_testing::{ScriptedTransport, Step};
///
/// let transport = ScriptedTransport::new([Step::Timeout, Step::Timeout]);
/// assert!(transport.sent().is_empty());
/// ```
#[derive(Default)]
pub struct ScriptedTransport {
    steps: VecDeque<Step>,
    responder: Option<Responder>,
    sent: Vec<Bytes>,
    waits: Vec<Duration>,
    send_error: Option<io::ErrorKind>,
}

impl std::fmt::Debug for ScriptedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedTransport")
            .field("steps", &self.steps)
            .field("sent", &self.sent.len())
            .field("waits", &self.waits)
            .finish_non_exhaustive()
    }
}

impl ScriptedTransport {
    /// Create a transport that plays `steps` in order.
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Create a transport that queues whatever `responder` returns after
    /// each request.
    pub fn responding<F>(responder: F) -> Self
    where
        F: FnMut(&ControlHeader) -> Vec<Step> + Send + 'static,
    {
        Self {
            responder: Some(Box::new(responder)),
            ..Self::default()
        }
    }

    /// Fail every send with `kind`.
    #[must_use]
    pub fn failing_send(mut self, kind: io::ErrorKind) -> Self {
        self.send_error = Some(kind);
        self
    }

    /// Queue more steps.
    pub fn push(&mut self, steps: impl IntoIterator<Item = Step>) { self.steps.extend(steps); }

    /// Requests sent so far.
    #[must_use]
    pub fn sent(&self) -> &[Bytes] { &self.sent }

    /// Headers of the requests sent so far.
    #[must_use]
    pub fn sent_headers(&self) -> Vec<ControlHeader> {
        self.sent
            .iter()
            .filter_map(|packet| ControlHeader::parse(packet))
            .collect()
    }

    /// Timeout passed to each receive call, in call order.
    #[must_use]
    pub fn waits(&self) -> &[Duration] { &self.waits }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&mut self, packet: &[u8]) -> io::Result<()> {
        if let Some(kind) = self.send_error {
            return Err(io::Error::new(kind, "scripted send failure"));
        }
        self.sent.push(Bytes::copy_from_slice(packet));
        if let (Some(responder), Some(header)) =
            (self.responder.as_mut(), ControlHeader::parse(packet))
        {
            let steps = responder(&header);
            self.steps.extend(steps);
        }
        Ok(())
    }

    async fn recv_timeout(&mut self, timeout: Duration) -> Result<Bytes, RecvError> {
        self.waits.push(timeout);
        match self.steps.pop_front() {
            Some(Step::Deliver(raw)) => Ok(raw),
            Some(Step::Timeout) | None => Err(RecvError::Timeout),
            Some(Step::Fail(kind)) => Err(RecvError::Io(io::Error::new(kind, "scripted receive failure"))),
            Some(Step::Hang) => std::future::pending().await,
        }
    }
}
