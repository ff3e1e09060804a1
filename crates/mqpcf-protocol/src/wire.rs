//! PCF wire format definitions.
//!
//! Every message starts with a fixed 20-byte header:
//! ```text
//! ┌─────────┬──────────┬──────────┬──────────┬─────────────┐
//! │ Magic   │ Msg type │ Command  │ Reserved │ Param count │
//! │ "PCF\0" │ u32 BE   │ u32 BE   │ u32 BE   │ u32 BE      │
//! └─────────┴──────────┴──────────┴──────────┴─────────────┘
//! ```
//!
//! followed by parameters framed as `{type:4, length:4, payload}`.
//! All multi-byte integers are Big Endian.

use bytes::{BufMut, BytesMut};

use crate::cursor::Cursor;
use crate::error::{ProtocolError, ProtocolResult};

/// Header size in bytes.
pub const HEADER_SIZE: usize = 20;

/// Size of the `{type, length}` prefix on every parameter.
pub const PARAMETER_HEADER_SIZE: usize = 8;

/// Magic bytes opening every PCF message.
pub const MAGIC: [u8; 4] = *b"PCF\0";

/// Message type codes.
pub mod message_type {
    /// MQCFT_COMMAND
    pub const COMMAND: u32 = 1;
    /// MQCFT_RESPONSE
    pub const RESPONSE: u32 = 2;
}

/// Command codes.
pub mod command_code {
    /// MQCMD_INQUIRE_QUEUE_STATUS
    pub const INQUIRE_QUEUE_STATUS: u32 = 0x60;
}

/// Parameter type tags.
pub mod parameter_type {
    /// MQCFT_INTEGER
    pub const INTEGER: u32 = 3;
    /// MQCFT_STRING
    pub const STRING: u32 = 4;
    /// MQCFT_GROUP, opens a new logical record.
    pub const GROUP: u32 = 20;
}

/// Parameter (field) identifiers.
pub mod field_id {
    /// MQCA_Q_NAME
    pub const QUEUE_NAME: u32 = 2016;
    /// MQCA_APPL_NAME (recognized, not stored)
    pub const APPL_NAME: u32 = 2024;
    /// MQCACF_APPL_TAG
    pub const APPL_TAG: u32 = 2549;
    /// MQCACF_USER_IDENTIFIER
    pub const USER_ID: u32 = 3000;
    /// MQIACF_PROCESS_ID
    pub const PROCESS_ID: u32 = 3002;
    /// MQCACH_CHANNEL_NAME
    pub const CHANNEL_NAME: u32 = 3501;
    /// MQCACH_CONNECTION_NAME
    pub const CONNECTION_NAME: u32 = 3502;
}

/// Zero bytes needed after `len` bytes to reach a 4-byte boundary.
#[inline]
pub fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Decoded 20-byte PCF header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub message_type: u32,
    pub command: u32,
    pub reserved: u32,
    /// Informational only; parsing is driven by buffer exhaustion.
    pub parameter_count: u32,
}

impl Header {
    pub fn command(command: u32, parameter_count: u32) -> Self {
        Self {
            message_type: message_type::COMMAND,
            command,
            reserved: 0,
            parameter_count,
        }
    }

    pub fn response(command: u32, parameter_count: u32) -> Self {
        Self {
            message_type: message_type::RESPONSE,
            command,
            reserved: 0,
            parameter_count,
        }
    }

    /// Encode the header, magic included, into `buf`.
    pub fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_slice(&MAGIC);
        buf.put_u32(self.message_type);
        buf.put_u32(self.command);
        buf.put_u32(self.reserved);
        buf.put_u32(self.parameter_count);
    }

    /// Decode a header without judging its message type.
    ///
    /// Only the first three magic bytes are compared; the trailing NUL is
    /// not checked.
    pub fn decode(data: &[u8]) -> ProtocolResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(ProtocolError::TooShort { len: data.len() });
        }

        let mut cursor = Cursor::new(data);
        let magic = cursor.read_bytes(4)?;
        if magic[..3] != MAGIC[..3] {
            return Err(ProtocolError::BadMagic {
                found: [magic[0], magic[1], magic[2]],
            });
        }

        Ok(Self {
            message_type: cursor.read_u32()?,
            command: cursor.read_u32()?,
            reserved: cursor.read_u32()?,
            parameter_count: cursor.read_u32()?,
        })
    }

    pub fn is_response(&self) -> bool {
        self.message_type == message_type::RESPONSE
    }
}
