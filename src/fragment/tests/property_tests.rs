//! Generated checks for arrival-order independence and duplicate handling.

use bytes::Bytes;
use proptest::{
    collection::vec,
    prelude::{Strategy, any},
    prop_assert_eq,
    test_runner::{Config as ProptestConfig, RngAlgorithm, TestCaseError, TestRng, TestRunner},
};

use super::{context, fragment};
use crate::fragment::{CollectorLimits, FragmentCollector};

fn deterministic_runner(cases: u32) -> TestRunner {
    let config = ProptestConfig {
        cases,
        ..ProptestConfig::default()
    };
    TestRunner::new_with_rng(config, TestRng::deterministic_rng(RngAlgorithm::ChaCha))
}

/// Non-empty chunk payloads plus a shuffled delivery order over them.
fn chunked_response() -> impl Strategy<Value = (Vec<Vec<u8>>, Vec<usize>)> {
    vec(vec(any::<u8>(), 1..48), 1..20).prop_flat_map(|chunks| {
        let order: Vec<usize> = (0..chunks.len()).collect();
        (
            proptest::strategy::Just(chunks),
            proptest::strategy::Just(order).prop_shuffle(),
        )
    })
}

/// Wire packets for `chunks`, laid end to end from offset zero.
fn packets(chunks: &[Vec<u8>]) -> Vec<Bytes> {
    let mut offset = 0_u16;
    let last = chunks.len() - 1;
    chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            let packet = fragment(offset, chunk, index != last);
            offset += u16::try_from(chunk.len()).expect("chunk fits u16");
            packet
        })
        .collect()
}

fn collect(packets: impl IntoIterator<Item = Bytes>) -> Result<Bytes, TestCaseError> {
    let mut collector = FragmentCollector::new(context(), CollectorLimits::default());
    for packet in packets {
        collector
            .accept(packet)
            .map_err(|err| TestCaseError::fail(format!("attempt ended: {err}")))?;
    }
    collector
        .response()
        .map(|response| response.into_data())
        .ok_or_else(|| TestCaseError::fail("response incomplete".to_owned()))
}

#[test]
fn any_arrival_order_yields_the_same_response() {
    deterministic_runner(128)
        .run(&chunked_response(), |(chunks, order)| {
            let wire = packets(&chunks);
            let shuffled = order.iter().map(|&i| wire[i].clone());
            prop_assert_eq!(collect(shuffled)?.to_vec(), chunks.concat());
            Ok(())
        })
        .expect("shuffled fragments should reassemble");
}

#[test]
fn repeated_fragments_do_not_change_the_response() {
    deterministic_runner(128)
        .run(&chunked_response(), |(chunks, order)| {
            let wire = packets(&chunks);
            let mut collector = FragmentCollector::new(context(), CollectorLimits::default());
            for &i in order.iter().chain(order.iter()) {
                collector
                    .accept(wire[i].clone())
                    .map_err(|err| TestCaseError::fail(format!("attempt ended: {err}")))?;
            }
            let response = collector
                .response()
                .ok_or_else(|| TestCaseError::fail("response incomplete".to_owned()))?;
            prop_assert_eq!(response.data().to_vec(), chunks.concat());
            prop_assert_eq!(response.fragment_count(), chunks.len());
            Ok(())
        })
        .expect("duplicated fragments should be idempotent");
}
