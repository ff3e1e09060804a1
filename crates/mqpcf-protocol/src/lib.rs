//! PCF - Programmable Command Format
//!
//! Binary codec for the queue manager's administrative command format,
//! covering the `INQUIRE_QUEUE_STATUS` (handle) inquiry.
//!
//! ## Message Format
//! ```text
//! [magic "PCF\0"][type:4][command:4][reserved:4][param count:4]
//! [type:4][length:4][payload] ...
//! ```
//!
//! ## Parameters
//! ```text
//! string   [id:4][len:4][bytes:len][pad to 4]
//! integer  [id:4][reserved:4][value:4]
//! group    (no payload) starts a new record
//! ```
//!
//! Building never fails and parsing never errors: a malformed reply
//! degrades to an empty or partial list of [`QueueHandleDetails`]. Both
//! operations report what they saw to a [`DiagnosticSink`].

pub mod command;
pub mod cursor;
pub mod diagnostics;
pub mod error;
pub mod handler;
pub mod hexdump;
pub mod parameter;
pub mod response;
pub mod wire;

pub use command::build_inquire_queue_status;
pub use cursor::Cursor;
pub use diagnostics::{Diagnostic, DiagnosticSink, NullSink, RecordingSink, TracingSink};
pub use error::{ProtocolError, ProtocolResult};
pub use handler::InquiryHandler;
pub use hexdump::hex_dump;
pub use parameter::{Parameter, ParameterReader, RawParameter};
pub use response::{parse_queue_status_response, QueueHandleDetails, ResponseBuilder};
pub use wire::Header;
