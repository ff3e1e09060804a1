//! Protocol error types

use thiserror::Error;

/// Decode failures for PCF messages.
///
/// The public inquiry operations never return these; they degrade to an
/// empty or partial result and report the failure as a diagnostic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Message too short: {len} bytes, header needs 20")]
    TooShort { len: usize },

    #[error("Invalid PCF magic: {found:02x?}")]
    BadMagic { found: [u8; 3] },

    #[error("Not a PCF response: message type {0}")]
    WrongMessageType(u32),

    #[error("Read past end of buffer: needed {needed}, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("Truncated parameter at offset {offset}: declared {declared}, {remaining} remaining")]
    TruncatedParameter {
        offset: usize,
        declared: usize,
        remaining: usize,
    },

    #[error("Malformed parameter of type {kind}: payload {len} bytes, need at least {min}")]
    MalformedSubfield { kind: u32, len: usize, min: usize },

    #[error("String overruns parameter: declared {declared}, {available} available")]
    StringOverrun { declared: usize, available: usize },
}

/// Result type for protocol operations
pub type ProtocolResult<T> = Result<T, ProtocolError>;
