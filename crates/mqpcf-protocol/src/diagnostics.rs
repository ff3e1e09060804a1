//! Diagnostic events emitted by the codec
//!
//! Both inquiry operations report what they did through a [`DiagnosticSink`]
//! handed in by the caller instead of a process-wide logger. The default
//! [`TracingSink`] forwards events to `tracing`.

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::ProtocolError;

/// Informational events; none of them change the operation's result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An inquiry command was built.
    CommandBuilt {
        queue_name: String,
        message_size: usize,
    },

    /// The reply did not start with `PCF`.
    InvalidMagic { magic: String },

    /// The reply header carried a message type other than response.
    UnexpectedMessageType { message_type: u32 },

    /// Parameter count announced by the reply header.
    ParameterCount { count: u32 },

    /// A single parameter was skipped; parsing continued.
    ParameterSkipped { offset: usize, reason: String },

    /// Parsing stopped early; records gathered so far are kept.
    ParseHalted { offset: usize, reason: String },

    /// Parsing finished.
    HandlesFound { count: usize },
}

impl Diagnostic {
    pub(crate) fn skipped(offset: usize, err: &ProtocolError) -> Self {
        Diagnostic::ParameterSkipped {
            offset,
            reason: err.to_string(),
        }
    }

    pub(crate) fn halted(offset: usize, err: &ProtocolError) -> Self {
        Diagnostic::ParseHalted {
            offset,
            reason: err.to_string(),
        }
    }
}

/// Receiver for [`Diagnostic`] events.
///
/// Implementations must tolerate concurrent calls; the codec itself holds
/// no other state.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, event: Diagnostic);
}

/// Forwards events to `tracing` at debug level (trace for skipped parameters).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, event: Diagnostic) {
        match event {
            Diagnostic::CommandBuilt {
                queue_name,
                message_size,
            } => {
                tracing::debug!(
                    queue_name = %queue_name,
                    msg_size = message_size,
                    "Built INQUIRE_QUEUE_STATUS PCF command"
                );
            }
            Diagnostic::InvalidMagic { magic } => {
                tracing::debug!(magic = %magic, "Invalid PCF magic");
            }
            Diagnostic::UnexpectedMessageType { message_type } => {
                tracing::debug!(msg_type = message_type, "Not a PCF response");
            }
            Diagnostic::ParameterCount { count } => {
                tracing::debug!(param_count = count, "Parsing PCF response parameters");
            }
            Diagnostic::ParameterSkipped { offset, reason } => {
                tracing::trace!(offset = offset, reason = %reason, "Skipped PCF parameter");
            }
            Diagnostic::ParseHalted { offset, reason } => {
                tracing::debug!(offset = offset, reason = %reason, "Stopped parsing PCF response");
            }
            Diagnostic::HandlesFound { count } => {
                tracing::debug!(handles_found = count, "Parsed queue handles from PCF response");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _event: Diagnostic) {}
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events.lock().clone()
    }

    /// Remove and return the recorded events.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, event: Diagnostic) {
        self.events.lock().push(event);
    }
}
