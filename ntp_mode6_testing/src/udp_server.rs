//! Loopback UDP responder for exercising the real socket transport.

use std::{io, net::SocketAddr};

use bytes::Bytes;
use ntp_mode6::protocol::ControlHeader;
use tokio::{net::UdpSocket, task::JoinHandle};

/// Bind a UDP socket on `127.0.0.1` and answer every parsable request with
/// the datagrams returned by `handler`.
///
/// Datagrams that do not carry a control header are dropped. The task runs
/// until aborted or until a socket error occurs.
///
/// # Errors
///
/// Returns an I/O error if the socket cannot be bound.
pub async fn spawn_udp_responder<F>(mut handler: F) -> io::Result<(SocketAddr, JoinHandle<()>)>
where
    F: FnMut(&ControlHeader, &[u8]) -> Vec<Bytes> + Send + 'static,
{
    let socket = UdpSocket::bind("127.0.0.1:0").await?;
    let addr = socket.local_addr()?;
    let handle = tokio::spawn(async move {
        let mut buf = vec![0_u8; 2048];
        while let Ok((n, peer)) = socket.recv_from(&mut buf).await {
            let request = &buf[..n];
            let Some(header) = ControlHeader::parse(request) else {
                continue;
            };
            for reply in handler(&header, request) {
                if socket.send_to(&reply, peer).await.is_err() {
                    return;
                }
            }
        }
    });
    Ok((addr, handle))
}
