//! Datagram transport seam.

use std::{
    io,
    net::{Ipv4Addr, Ipv6Addr, SocketAddr},
    time::Duration,
};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::net::{ToSocketAddrs, UdpSocket, lookup_host};

/// Largest datagram read from the socket.
pub const MAX_DATAGRAM: usize = 2048;

/// Failure of a bounded receive.
#[derive(Debug, thiserror::Error)]
pub enum RecvError {
    /// Nothing arrived before the wait expired.
    #[error("receive timed out")]
    Timeout,
    /// The socket reported an error.
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A connected datagram channel to one server.
///
/// Implementations deliver whole datagrams; the query engine never sees
/// partial reads.
#[async_trait]
pub trait Transport: Send {
    /// Send one datagram.
    async fn send(&mut self, packet: &[u8]) -> io::Result<()>;

    /// Wait at most `timeout` for the next datagram.
    async fn recv_timeout(&mut self, timeout: Duration) -> Result<Bytes, RecvError>;
}

/// [`Transport`] over a connected tokio [`UdpSocket`].
#[derive(Debug)]
pub struct UdpTransport {
    socket: UdpSocket,
    buf: Box<[u8]>,
}

impl UdpTransport {
    /// Resolve `addr`, bind an ephemeral local port of the same family and
    /// connect to the first resolved address.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if resolution yields no address or binding or
    /// connecting the socket fails.
    pub async fn connect(addr: impl ToSocketAddrs) -> io::Result<Self> {
        let peer = lookup_host(addr).await?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::AddrNotAvailable, "no address resolved")
        })?;
        let local: SocketAddr = if peer.is_ipv6() {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        Ok(Self::from_socket(socket))
    }

    /// Wrap an already connected socket.
    #[must_use]
    pub fn from_socket(socket: UdpSocket) -> Self {
        Self {
            socket,
            buf: vec![0; MAX_DATAGRAM].into_boxed_slice(),
        }
    }

    /// Address of the server this transport talks to.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket is not connected.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> { self.socket.peer_addr() }
}

#[async_trait]
impl Transport for UdpTransport {
    async fn send(&mut self, packet: &[u8]) -> io::Result<()> {
        self.socket.send(packet).await.map(|_| ())
    }

    async fn recv_timeout(&mut self, timeout: Duration) -> Result<Bytes, RecvError> {
        match tokio::time::timeout(timeout, self.socket.recv(&mut self.buf)).await {
            Ok(Ok(n)) => Ok(Bytes::copy_from_slice(&self.buf[..n])),
            Ok(Err(e)) => Err(RecvError::Io(e)),
            Err(_) => Err(RecvError::Timeout),
        }
    }
}
