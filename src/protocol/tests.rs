//! Unit tests for header parsing and the protocol newtypes.

use bytes::BytesMut;
use rstest::rstest;

use super::*;

fn response_bytes(flags: ControlFlags, status: u16, offset: u16, count: u16) -> BytesMut {
    let header = ControlHeader::response(
        ProtocolVersion::NEWEST,
        flags,
        Opcode::READ_VARIABLES,
        0x0102,
        status,
        0x0304,
        offset,
        count,
    );
    let mut buf = BytesMut::new();
    header.encode(&mut buf);
    buf
}

#[test]
fn header_fields_are_big_endian_on_the_wire() {
    let buf = response_bytes(ControlFlags::MORE, 0x0615, 0x01e0, 0x01d4);
    assert_eq!(
        &buf[..],
        &[
            0x26, 0xa2, 0x01, 0x02, 0x06, 0x15, 0x03, 0x04, 0x01, 0xe0, 0x01, 0xd4
        ]
    );
}

#[test]
fn parse_splits_flags_from_opcode() {
    let buf = response_bytes(ControlFlags::MORE.with(ControlFlags::ERROR), 0, 0, 0);
    let header = ControlHeader::parse(&buf).expect("complete header");

    assert!(header.flags().is_response());
    assert!(header.flags().is_error());
    assert!(header.flags().has_more());
    assert_eq!(header.opcode(), Opcode::READ_VARIABLES);
    assert_eq!(header.version(), 4);
    assert_eq!(header.mode(), MODE_CONTROL);
    assert_eq!(header.sequence(), 0x0102);
    assert_eq!(header.association_id(), 0x0304);
}

#[test]
fn parse_rejects_short_input() {
    let buf = response_bytes(ControlFlags::NONE, 0, 0, 0);
    assert!(ControlHeader::parse(&buf[..HEADER_LEN - 1]).is_none());
}

#[test]
fn request_header_has_no_flags_and_zero_offset() {
    let header = ControlHeader::request(ProtocolVersion::default(), Opcode::READ_STATUS, 9, 3, 0);
    assert_eq!(header.flags(), ControlFlags::NONE);
    assert_eq!(header.offset(), 0);
    assert_eq!(header.status(), 0);
    assert_eq!(header.version(), 2);
}

#[rstest]
#[case(0, false)]
#[case(1, true)]
#[case(2, true)]
#[case(4, true)]
#[case(5, false)]
#[case(7, false)]
fn version_range_is_one_through_four(#[case] raw: u8, #[case] supported: bool) {
    assert_eq!(ProtocolVersion::is_supported(raw), supported);
    assert_eq!(ProtocolVersion::new(raw).is_some(), supported);
}

#[rstest]
#[case("readstat", Opcode::READ_STATUS)]
#[case("READVAR", Opcode::READ_VARIABLES)]
#[case("writevar", Opcode::WRITE_VARIABLES)]
#[case("read_mru", Opcode::READ_MRU)]
#[case("31", Opcode::UNSET_TRAP)]
fn opcode_parses_names_and_numbers(#[case] input: &str, #[case] expected: Opcode) {
    assert_eq!(input.parse::<Opcode>(), Ok(expected));
}

#[test]
fn opcode_rejects_out_of_range_numbers() {
    assert!("32".parse::<Opcode>().is_err());
    assert!("peers".parse::<Opcode>().is_err());
}

#[test]
fn opcode_display_falls_back_to_number() {
    assert_eq!(Opcode::READ_CLOCK.to_string(), "readclock");
    assert_eq!(Opcode::new(20).to_string(), "opcode 20");
}

#[rstest]
#[case(0, ServerErrorCode::Unspecified)]
#[case(1, ServerErrorCode::Permission)]
#[case(2, ServerErrorCode::BadFormat)]
#[case(3, ServerErrorCode::BadOpcode)]
#[case(4, ServerErrorCode::BadAssociation)]
#[case(5, ServerErrorCode::UnknownVariable)]
#[case(6, ServerErrorCode::BadValue)]
#[case(7, ServerErrorCode::Restricted)]
#[case(99, ServerErrorCode::Unknown(99))]
fn server_error_code_round_trips_wire_value(#[case] raw: u8, #[case] expected: ServerErrorCode) {
    let code = ServerErrorCode::from(raw);
    assert_eq!(code, expected);
    assert_eq!(code.code(), raw);
}

#[test]
fn server_error_code_reads_high_byte_of_status() {
    assert_eq!(
        ServerErrorCode::from_status(0x01ff),
        ServerErrorCode::Permission
    );
}

#[test]
fn newtypes_convert_back_to_raw_octets() {
    assert_eq!(u8::from(Opcode::READ_MRU), 10);
    assert_eq!(u8::from(ProtocolVersion::NEWEST), 4);
}
