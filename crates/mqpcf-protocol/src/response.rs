//! Queue-status inquiry replies

use bytes::{BufMut, BytesMut};
use serde::Serialize;

use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::ProtocolError;
use crate::parameter::{Parameter, ParameterReader};
use crate::wire::{command_code, field_id, padding_for, parameter_type, Header};

/// One queue handle: an application holding the queue open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QueueHandleDetails {
    pub queue_name: String,
    /// e.g. `el\bin\producer-consumer.exe`
    pub application_tag: String,
    /// e.g. `APP1.SVRCONN`
    pub channel_name: String,
    /// e.g. `127.0.0.1`
    pub connection_name: String,
    pub user_id: String,
    pub process_id: i32,
    /// No mapped field ID fills this yet.
    pub input_mode: Option<String>,
    /// No mapped field ID fills this yet.
    pub output_mode: Option<String>,
}

/// Record field a string parameter can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringField {
    QueueName,
    ChannelName,
    ConnectionName,
    ApplicationTag,
    UserId,
    /// Recognized but not stored.
    ApplicationName,
}

/// Record field an integer parameter can land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegerField {
    ProcessId,
}

const STRING_FIELDS: &[(u32, StringField)] = &[
    (field_id::QUEUE_NAME, StringField::QueueName),
    (field_id::CHANNEL_NAME, StringField::ChannelName),
    (field_id::CONNECTION_NAME, StringField::ConnectionName),
    (field_id::APPL_NAME, StringField::ApplicationName),
    (field_id::APPL_TAG, StringField::ApplicationTag),
    (field_id::USER_ID, StringField::UserId),
];

const INTEGER_FIELDS: &[(u32, IntegerField)] = &[(field_id::PROCESS_ID, IntegerField::ProcessId)];

/// Look up the record field for a string parameter ID.
pub fn string_field_for(id: u32) -> Option<StringField> {
    STRING_FIELDS
        .iter()
        .find(|(field, _)| *field == id)
        .map(|(_, target)| *target)
}

/// Look up the record field for an integer parameter ID.
pub fn integer_field_for(id: u32) -> Option<IntegerField> {
    INTEGER_FIELDS
        .iter()
        .find(|(field, _)| *field == id)
        .map(|(_, target)| *target)
}

/// Strip trailing NUL and space padding and decode as text.
pub fn trim_padded(value: &[u8]) -> String {
    let end = value
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |pos| pos + 1);
    String::from_utf8_lossy(&value[..end]).into_owned()
}

impl QueueHandleDetails {
    pub fn set_string(&mut self, field: StringField, value: String) {
        match field {
            StringField::QueueName => self.queue_name = value,
            StringField::ChannelName => self.channel_name = value,
            StringField::ConnectionName => self.connection_name = value,
            StringField::ApplicationTag => self.application_tag = value,
            StringField::UserId => self.user_id = value,
            StringField::ApplicationName => {}
        }
    }

    pub fn set_integer(&mut self, field: IntegerField, value: i32) {
        match field {
            IntegerField::ProcessId => self.process_id = value,
        }
    }
}

/// Reassembles grouped records from the flat parameter stream.
#[derive(Default)]
struct HandleCollector {
    handles: Vec<QueueHandleDetails>,
    current: Option<QueueHandleDetails>,
}

impl HandleCollector {
    fn flush(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.queue_name.is_empty() {
                self.handles.push(handle);
            }
        }
    }

    fn apply(&mut self, param: Parameter<'_>) {
        match param {
            Parameter::Group => {
                self.flush();
                self.current = Some(QueueHandleDetails::default());
            }
            Parameter::String { id, value } => {
                if let (Some(handle), Some(field)) = (self.current.as_mut(), string_field_for(id)) {
                    handle.set_string(field, trim_padded(value));
                }
            }
            Parameter::Integer { id, value } => {
                if let (Some(handle), Some(field)) = (self.current.as_mut(), integer_field_for(id)) {
                    handle.set_integer(field, value);
                }
            }
            Parameter::Unknown { .. } => {}
        }
    }

    fn finish(mut self) -> Vec<QueueHandleDetails> {
        self.flush();
        self.handles
    }
}

/// Decode an `INQUIRE_QUEUE_STATUS` reply into queue handles.
///
/// Best effort: a short buffer, bad magic or non-response message type
/// yields an empty list; a truncated parameter stops parsing and keeps what
/// was collected; a malformed string or integer parameter is skipped. An
/// empty result therefore means "no data or unparseable", not "no handles".
///
/// Records are returned in the order their group markers appear. Parameters
/// before the first group marker belong to no record and are dropped, as is
/// any record without a queue name.
pub fn parse_queue_status_response(data: &[u8], sink: &dyn DiagnosticSink) -> Vec<QueueHandleDetails> {
    let header = match Header::decode(data) {
        Ok(header) => header,
        Err(ProtocolError::BadMagic { found }) => {
            sink.emit(Diagnostic::InvalidMagic {
                magic: String::from_utf8_lossy(&found).into_owned(),
            });
            return Vec::new();
        }
        Err(_) => return Vec::new(),
    };

    if !header.is_response() {
        sink.emit(Diagnostic::UnexpectedMessageType {
            message_type: header.message_type,
        });
        return Vec::new();
    }

    sink.emit(Diagnostic::ParameterCount {
        count: header.parameter_count,
    });

    let mut collector = HandleCollector::default();
    for item in ParameterReader::new(data) {
        let raw = match item {
            Ok(raw) => raw,
            Err(err) => {
                let offset = match err {
                    ProtocolError::TruncatedParameter { offset, .. } => offset,
                    _ => data.len(),
                };
                sink.emit(Diagnostic::halted(offset, &err));
                break;
            }
        };

        match Parameter::decode(raw) {
            Ok(param) => collector.apply(param),
            Err(err) => sink.emit(Diagnostic::skipped(raw.offset, &err)),
        }
    }

    let handles = collector.finish();
    sink.emit(Diagnostic::HandlesFound {
        count: handles.len(),
    });
    handles
}

/// Assembles `INQUIRE_QUEUE_STATUS` reply buffers.
///
/// Parameters are framed the way [`parse_queue_status_response`] reads
/// them: the length field holds the payload size after the 8-byte prefix.
/// The header's parameter count is filled in by [`ResponseBuilder::finish`].
#[derive(Debug)]
pub struct ResponseBuilder {
    buf: BytesMut,
    count: u32,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        let mut buf = BytesMut::with_capacity(256);
        Header::response(command_code::INQUIRE_QUEUE_STATUS, 0).encode_into(&mut buf);
        Self { buf, count: 0 }
    }

    /// Append a parameter with an arbitrary type tag and payload.
    pub fn raw(mut self, kind: u32, payload: &[u8]) -> Self {
        self.buf.put_u32(kind);
        self.buf.put_u32(payload.len() as u32);
        self.buf.put_slice(payload);
        self.count += 1;
        self
    }

    pub fn group(self) -> Self {
        self.raw(parameter_type::GROUP, &[])
    }

    pub fn string(self, id: u32, value: &[u8]) -> Self {
        let pad = padding_for(value.len());
        let mut payload = BytesMut::with_capacity(8 + value.len() + pad);
        payload.put_u32(id);
        payload.put_u32(value.len() as u32);
        payload.put_slice(value);
        payload.put_bytes(0, pad);
        self.raw(parameter_type::STRING, &payload)
    }

    pub fn integer(self, id: u32, value: i32) -> Self {
        let mut payload = BytesMut::with_capacity(12);
        payload.put_u32(id);
        payload.put_u32(0);
        payload.put_i32(value);
        self.raw(parameter_type::INTEGER, &payload)
    }

    /// Append a group marker followed by every mapped field of `handle`.
    pub fn handle(self, handle: &QueueHandleDetails) -> Self {
        self.group()
            .string(field_id::QUEUE_NAME, handle.queue_name.as_bytes())
            .string(field_id::APPL_TAG, handle.application_tag.as_bytes())
            .string(field_id::CHANNEL_NAME, handle.channel_name.as_bytes())
            .string(field_id::CONNECTION_NAME, handle.connection_name.as_bytes())
            .string(field_id::USER_ID, handle.user_id.as_bytes())
            .integer(field_id::PROCESS_ID, handle.process_id)
    }

    pub fn finish(mut self) -> BytesMut {
        self.buf[16..20].copy_from_slice(&self.count.to_be_bytes());
        self.buf
    }
}

impl Default for ResponseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
