//! Inquiry handler with an injected diagnostic sink

use std::sync::Arc;

use bytes::BytesMut;

use crate::command::build_inquire_queue_status;
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::response::{parse_queue_status_response, QueueHandleDetails};

/// Builds queue-status inquiries and parses their replies, reporting to a
/// shared sink. Cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct InquiryHandler {
    sink: Arc<dyn DiagnosticSink>,
}

impl InquiryHandler {
    /// Handler reporting through `tracing`.
    pub fn new() -> Self {
        Self::with_sink(Arc::new(TracingSink))
    }

    pub fn with_sink(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self { sink }
    }

    pub fn build_inquire_queue_status_cmd(&self, queue_name: impl AsRef<[u8]>) -> BytesMut {
        build_inquire_queue_status(queue_name.as_ref(), self.sink.as_ref())
    }

    pub fn parse_queue_status_response(&self, data: &[u8]) -> Vec<QueueHandleDetails> {
        parse_queue_status_response(data, self.sink.as_ref())
    }
}

impl Default for InquiryHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InquiryHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InquiryHandler").finish_non_exhaustive()
    }
}
