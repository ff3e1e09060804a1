//! PCF command builder

use bytes::{BufMut, BytesMut};

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::wire::{command_code, field_id, padding_for, parameter_type, Header, HEADER_SIZE};

/// Build an `INQUIRE_QUEUE_STATUS` command for `queue_name`.
///
/// Equivalent to MQSC `DIS QS(queue_name) TYPE(HANDLE) ALL`. The name is
/// not validated: any byte string yields a structurally valid buffer, even
/// one the queue manager will reject.
pub fn build_inquire_queue_status(queue_name: &[u8], sink: &dyn DiagnosticSink) -> BytesMut {
    let mut buf = BytesMut::with_capacity(
        HEADER_SIZE + string_parameter_len(queue_name.len()),
    );

    Header::command(command_code::INQUIRE_QUEUE_STATUS, 1).encode_into(&mut buf);
    put_string_parameter(&mut buf, field_id::QUEUE_NAME, queue_name);

    sink.emit(Diagnostic::CommandBuilt {
        queue_name: String::from_utf8_lossy(queue_name).into_owned(),
        message_size: buf.len(),
    });

    buf
}

/// Total encoded size of a string parameter carrying `len` bytes.
pub fn string_parameter_len(len: usize) -> usize {
    16 + len + padding_for(len)
}

/// Append a string parameter whose length field covers the whole parameter,
/// type tag and length field included.
pub fn put_string_parameter(buf: &mut BytesMut, id: u32, value: &[u8]) {
    let start = buf.len();

    buf.put_u32(parameter_type::STRING);
    let len_pos = buf.len();
    buf.put_u32(0);
    buf.put_u32(id);
    buf.put_u32(value.len() as u32);
    buf.put_slice(value);
    buf.put_bytes(0, padding_for(value.len()));

    let param_len = (buf.len() - start) as u32;
    buf[len_pos..len_pos + 4].copy_from_slice(&param_len.to_be_bytes());
}
