//! End-to-end checks of the queue-status inquiry codec against
//! hand-assembled wire bytes.

use mqpcf_protocol::{
    build_inquire_queue_status, parse_queue_status_response, Cursor, NullSink, QueueHandleDetails,
};
use proptest::prelude::*;

fn be(n: u32) -> [u8; 4] {
    n.to_be_bytes()
}

fn header(message_type: u32, params: u32) -> Vec<u8> {
    let mut out = b"PCF\0".to_vec();
    out.extend_from_slice(&be(message_type));
    out.extend_from_slice(&be(0x60));
    out.extend_from_slice(&be(0));
    out.extend_from_slice(&be(params));
    out
}

fn group(out: &mut Vec<u8>) {
    out.extend_from_slice(&be(20));
    out.extend_from_slice(&be(0));
}

fn string(out: &mut Vec<u8>, id: u32, value: &[u8]) {
    let pad = (4 - value.len() % 4) % 4;
    out.extend_from_slice(&be(4));
    out.extend_from_slice(&be((8 + value.len() + pad) as u32));
    out.extend_from_slice(&be(id));
    out.extend_from_slice(&be(value.len() as u32));
    out.extend_from_slice(value);
    out.extend(std::iter::repeat(0u8).take(pad));
}

fn integer(out: &mut Vec<u8>, id: u32, value: i32) {
    out.extend_from_slice(&be(3));
    out.extend_from_slice(&be(12));
    out.extend_from_slice(&be(id));
    out.extend_from_slice(&be(0));
    out.extend_from_slice(&value.to_be_bytes());
}

fn parse(data: &[u8]) -> Vec<QueueHandleDetails> {
    parse_queue_status_response(data, &NullSink)
}

#[test]
fn test_two_groups_in_order() {
    let mut data = header(2, 5);
    group(&mut data);
    string(&mut data, 2016, b"Q1");
    group(&mut data);
    string(&mut data, 2016, b"Q2");
    integer(&mut data, 3002, 4242);

    let handles = parse(&data);
    assert_eq!(
        handles,
        vec![
            QueueHandleDetails {
                queue_name: "Q1".into(),
                ..Default::default()
            },
            QueueHandleDetails {
                queue_name: "Q2".into(),
                process_id: 4242,
                ..Default::default()
            },
        ]
    );
}

#[test]
fn test_trailing_group_without_queue_name_is_excluded() {
    let mut data = header(2, 4);
    group(&mut data);
    string(&mut data, 2016, b"Q1");
    group(&mut data);
    string(&mut data, 9999, b"unmapped");
    integer(&mut data, 1234, 5);

    let handles = parse(&data);
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].queue_name, "Q1");
}

#[test]
fn test_all_mapped_fields() {
    let mut data = header(2, 7);
    group(&mut data);
    string(&mut data, 2016, b"APP.REQUEST                                     ");
    string(&mut data, 3501, b"APP1.SVRCONN        ");
    string(&mut data, 3502, b"127.0.0.1");
    string(&mut data, 2549, b"el\\bin\\producer-consumer.exe");
    string(&mut data, 3000, b"atulk@DESKTOP-2G7OVO3\0\0\0");
    integer(&mut data, 3002, 24600);

    let handle = &parse(&data)[0];
    assert_eq!(handle.queue_name, "APP.REQUEST");
    assert_eq!(handle.channel_name, "APP1.SVRCONN");
    assert_eq!(handle.connection_name, "127.0.0.1");
    assert_eq!(handle.application_tag, "el\\bin\\producer-consumer.exe");
    assert_eq!(handle.user_id, "atulk@DESKTOP-2G7OVO3");
    assert_eq!(handle.process_id, 24600);
    assert_eq!(handle.input_mode, None);
    assert_eq!(handle.output_mode, None);
}

#[test]
fn test_negative_process_id() {
    let mut data = header(2, 3);
    group(&mut data);
    string(&mut data, 2016, b"Q1");
    integer(&mut data, 3002, -1);

    assert_eq!(parse(&data)[0].process_id, -1);
}

#[test]
fn test_parameter_count_does_not_bound_parsing() {
    let mut data = header(2, 0);
    group(&mut data);
    string(&mut data, 2016, b"Q1");
    group(&mut data);
    string(&mut data, 2016, b"Q2");

    assert_eq!(parse(&data).len(), 2);
}

#[test]
fn test_short_buffer_is_empty() {
    for len in 0..20 {
        let data = vec![0u8; len];
        assert!(parse(&data).is_empty(), "length {}", len);
    }
    let mut data = header(2, 0);
    data.pop();
    assert!(parse(&data).is_empty());
}

#[test]
fn test_bad_magic_is_empty() {
    let mut data = header(2, 2);
    data[0] = b'Q';
    group(&mut data);
    string(&mut data, 2016, b"Q1");

    assert!(parse(&data).is_empty());
}

// Only "PCF" is compared; the fourth magic byte is not checked.
#[test]
fn test_fourth_magic_byte_is_not_checked() {
    let mut data = header(2, 2);
    data[3] = 0xFF;
    group(&mut data);
    string(&mut data, 2016, b"Q1");

    assert_eq!(parse(&data).len(), 1);
}

#[test]
fn test_command_message_type_is_empty() {
    let mut data = header(1, 2);
    group(&mut data);
    string(&mut data, 2016, b"Q1");

    assert!(parse(&data).is_empty());
}

#[test]
fn test_truncated_tail_returns_partial() {
    let mut data = header(2, 4);
    group(&mut data);
    string(&mut data, 2016, b"Q1");
    group(&mut data);
    string(&mut data, 2016, b"Q2");
    data.truncate(data.len() - 1);

    let handles = parse(&data);
    assert_eq!(handles.len(), 1);
    assert_eq!(handles[0].queue_name, "Q1");
}

#[test]
fn test_queue_command_layout() {
    let buf = build_inquire_queue_status(b"TEST.QUEUE", &NullSink);
    assert_eq!(buf.len(), 48);

    let mut cursor = Cursor::at(&buf, 24);
    assert_eq!(cursor.read_u32().unwrap(), 28);
}

/// Decode a built command by hand, following the documented layout.
fn hand_decode_queue_name(buf: &[u8]) -> Vec<u8> {
    let mut cursor = Cursor::at(buf, 20);
    assert_eq!(cursor.read_u32().unwrap(), 4);
    let param_len = cursor.read_u32().unwrap() as usize;
    assert_eq!(cursor.read_u32().unwrap(), 2016);
    let len = cursor.read_u32().unwrap() as usize;
    let name = cursor.read_bytes(len).unwrap().to_vec();
    let pad = cursor.remaining();
    assert_eq!(param_len, 16 + len + pad);
    assert!(cursor.read_bytes(pad).unwrap().iter().all(|&b| b == 0));
    name
}

proptest! {
    #[test]
    fn prop_built_length(name in proptest::collection::vec(any::<u8>(), 0..256)) {
        let buf = build_inquire_queue_status(&name, &NullSink);
        let pad = (4 - name.len() % 4) % 4;

        prop_assert_eq!(buf.len(), 20 + 16 + name.len() + pad);
        prop_assert_eq!(buf.len() % 4, 0);
        prop_assert_eq!(&buf[0..4], &[0x50u8, 0x43, 0x46, 0x00][..]);
        prop_assert_eq!(&buf[4..8], &[0u8, 0, 0, 1][..]);
        prop_assert_eq!(&buf[8..12], &[0u8, 0, 0, 0x60][..]);
    }

    #[test]
    fn prop_hand_decode_recovers_name(name in "[A-Z0-9._/%]{0,48}") {
        let buf = build_inquire_queue_status(name.as_bytes(), &NullSink);
        prop_assert_eq!(hand_decode_queue_name(&buf), name.as_bytes().to_vec());
    }

    #[test]
    fn prop_parse_never_panics(tail in proptest::collection::vec(any::<u8>(), 0..512)) {
        let mut data = header(2, 0);
        data.extend_from_slice(&tail);
        let handles = parse(&data);
        prop_assert!(handles.iter().all(|h| !h.queue_name.is_empty()));
    }
}
