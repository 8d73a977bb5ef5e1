//! Queries over a real loopback UDP socket.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use ntp_mode6::{
    client::{Mode6Client, Query, QueryConfig, QueryError, UdpTransport},
    protocol::{ControlHeader, Opcode},
};
use ntp_mode6_testing::{ResponseBuilder, spawn_udp_responder, split_response};

fn quick_config() -> QueryConfig {
    QueryConfig::default()
        .with_primary_timeout(Duration::from_millis(300))
        .with_secondary_timeout(Duration::from_millis(150))
}

#[tokio::test]
async fn fragmented_reply_round_trips_over_udp() {
    let (addr, server) = spawn_udp_responder(|request: &ControlHeader, _raw: &[u8]| {
        let mut replies = split_response(
            request.opcode(),
            request.sequence(),
            0x0615,
            b"version=\"ntpd 4.2.8\", stratum=2, refid=192.0.2.1",
            16,
        );
        replies.reverse();
        replies
    })
    .await
    .expect("bind responder");

    let mut client = Mode6Client::connect(addr, quick_config())
        .await
        .expect("connect");
    let response = client
        .query(Query::new(Opcode::READ_VARIABLES))
        .await
        .expect("response");

    assert_eq!(
        response.data().as_ref(),
        b"version=\"ntpd 4.2.8\", stratum=2, refid=192.0.2.1"
    );
    assert_eq!(response.status(), 0x0615);
    assert_eq!(
        client.transport_mut().peer_addr().expect("connected"),
        addr
    );
    server.abort();
}

#[tokio::test]
async fn silent_server_times_out_after_two_requests() {
    let requests = Arc::new(AtomicUsize::new(0));
    let counted = Arc::clone(&requests);
    let (addr, server) = spawn_udp_responder(move |_: &ControlHeader, _: &[u8]| {
        counted.fetch_add(1, Ordering::SeqCst);
        Vec::new()
    })
    .await
    .expect("bind responder");

    let config = QueryConfig::default()
        .with_primary_timeout(Duration::from_millis(50))
        .with_secondary_timeout(Duration::from_millis(20));
    let mut client = Mode6Client::connect(addr, config).await.expect("connect");

    let err = client
        .query(Query::new(Opcode::READ_STATUS))
        .await
        .expect_err("no reply");

    assert!(matches!(err, QueryError::Timeout));
    assert_eq!(requests.load(Ordering::SeqCst), 2);
    server.abort();
}

#[tokio::test]
async fn responder_sees_request_payload() {
    let (addr, server) = spawn_udp_responder(|request: &ControlHeader, raw: &[u8]| {
        let count = usize::from(request.count());
        let echoed = raw.get(12..12 + count).unwrap_or_default().to_vec();
        vec![
            ResponseBuilder::new(request.opcode(), request.sequence())
                .payload(&echoed)
                .build(),
        ]
    })
    .await
    .expect("bind responder");

    let socket = tokio::net::UdpSocket::bind("127.0.0.1:0")
        .await
        .expect("bind client socket");
    socket.connect(addr).await.expect("connect socket");
    let mut client = Mode6Client::new(UdpTransport::from_socket(socket), quick_config());

    let response = client
        .query(Query::new(Opcode::READ_VARIABLES).payload(b"offset,jitter"))
        .await
        .expect("echoed");

    assert_eq!(response.data().as_ref(), b"offset,jitter");
    server.abort();
}
