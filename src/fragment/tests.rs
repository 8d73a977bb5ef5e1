//! Unit tests for fragment collection and reassembly.
//!
//! Tests are split into focused submodules; the packet builders below are
//! shared between them.

mod property_tests;
mod set_tests;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    byte_order::pad_to,
    protocol::{ControlFlags, ControlHeader, Opcode, ProtocolVersion},
    request::RequestContext,
};

const SEQUENCE: u16 = 9;
const ASSOCIATION: u16 = 0;
const STATUS: u16 = 0x0615;

fn context() -> RequestContext { RequestContext::new(Opcode::READ_VARIABLES, ASSOCIATION, SEQUENCE) }

fn response_header(flags: ControlFlags, offset: u16, count: u16) -> ControlHeader {
    ControlHeader::response(
        ProtocolVersion::default(),
        flags,
        Opcode::READ_VARIABLES,
        SEQUENCE,
        STATUS,
        ASSOCIATION,
        offset,
        count,
    )
}

/// Header followed by `payload`, without padding.
fn raw_frame(header: ControlHeader, payload: &[u8]) -> BytesMut {
    let mut buf = BytesMut::new();
    header.encode(&mut buf);
    buf.put_slice(payload);
    buf
}

/// Header followed by `payload`, zero-padded to four bytes.
fn frame(header: ControlHeader, payload: &[u8]) -> Bytes {
    let mut buf = raw_frame(header, payload);
    buf.resize(pad_to(buf.len(), 4), 0);
    buf.freeze()
}

/// A well-formed reply fragment for [`context`].
fn fragment(offset: u16, payload: &[u8], more: bool) -> Bytes {
    let flags = if more {
        ControlFlags::MORE
    } else {
        ControlFlags::NONE
    };
    let count = u16::try_from(payload.len()).expect("test payload fits u16");
    frame(response_header(flags, offset, count), payload)
}
