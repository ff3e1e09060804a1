//! PCF parameter framing and typed decoding

use crate::cursor::Cursor;
use crate::error::{ProtocolError, ProtocolResult};
use crate::wire::{parameter_type, HEADER_SIZE, PARAMETER_HEADER_SIZE};

/// An undecoded parameter: its type tag and payload slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawParameter<'a> {
    /// Offset of the parameter's type tag within the message.
    pub offset: usize,
    pub kind: u32,
    pub payload: &'a [u8],
}

/// A decoded parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter<'a> {
    /// `{id:4, reserved:4, value:4}`
    Integer { id: u32, value: i32 },

    /// `{id:4, len:4, bytes:len, pad}`; `value` excludes the padding
    String { id: u32, value: &'a [u8] },

    /// Start of a new logical record
    Group,

    /// Any other type tag, passed through untouched
    Unknown { kind: u32, payload: &'a [u8] },
}

impl<'a> Parameter<'a> {
    pub const INTEGER_MIN_PAYLOAD: usize = 12;
    pub const STRING_MIN_PAYLOAD: usize = 8;

    /// Decode the payload of a raw parameter according to its type tag.
    pub fn decode(raw: RawParameter<'a>) -> ProtocolResult<Self> {
        match raw.kind {
            parameter_type::GROUP => Ok(Parameter::Group),
            parameter_type::STRING => {
                check_min(raw, Self::STRING_MIN_PAYLOAD)?;
                let mut cursor = Cursor::new(raw.payload);
                let id = cursor.read_u32()?;
                let len = cursor.read_u32()? as usize;
                let value = cursor.read_bytes(len).map_err(|_| ProtocolError::StringOverrun {
                    declared: len,
                    available: cursor.remaining(),
                })?;
                Ok(Parameter::String { id, value })
            }
            parameter_type::INTEGER => {
                check_min(raw, Self::INTEGER_MIN_PAYLOAD)?;
                let mut cursor = Cursor::new(raw.payload);
                let id = cursor.read_u32()?;
                cursor.skip(4)?;
                let value = cursor.read_i32()?;
                Ok(Parameter::Integer { id, value })
            }
            kind => Ok(Parameter::Unknown {
                kind,
                payload: raw.payload,
            }),
        }
    }
}

fn check_min(raw: RawParameter<'_>, min: usize) -> ProtocolResult<()> {
    if raw.payload.len() < min {
        return Err(ProtocolError::MalformedSubfield {
            kind: raw.kind,
            len: raw.payload.len(),
            min,
        });
    }
    Ok(())
}

/// Walks the parameter area of a message, yielding one [`RawParameter`]
/// per `{type, length, payload}` frame.
///
/// The declared length is taken as the size of the payload following the
/// 8-byte frame prefix. Iteration ends when fewer than 8 bytes remain, or
/// with a single [`ProtocolError::TruncatedParameter`] when a declared
/// length runs past the end of the buffer.
pub struct ParameterReader<'a> {
    cursor: Cursor<'a>,
    done: bool,
}

impl<'a> ParameterReader<'a> {
    /// Read parameters from a full message, skipping its header.
    pub fn new(message: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::at(message, HEADER_SIZE),
            done: false,
        }
    }

    /// Offset of the next unread byte.
    pub fn position(&self) -> usize {
        self.cursor.position()
    }

    fn read_next(&mut self) -> ProtocolResult<RawParameter<'a>> {
        let offset = self.cursor.position();
        let mut frame = self.cursor.clone();
        let kind = frame.read_u32()?;
        let declared = frame.read_u32()? as usize;
        let payload = frame.read_bytes(declared).map_err(|_| ProtocolError::TruncatedParameter {
            offset,
            declared,
            remaining: frame.remaining(),
        })?;
        self.cursor = frame;
        Ok(RawParameter {
            offset,
            kind,
            payload,
        })
    }
}

impl<'a> Iterator for ParameterReader<'a> {
    type Item = ProtocolResult<RawParameter<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.cursor.remaining() < PARAMETER_HEADER_SIZE {
            return None;
        }
        let item = self.read_next();
        if item.is_err() {
            self.done = true;
        }
        Some(item)
    }
}
