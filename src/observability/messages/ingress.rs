// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for HTTP ingress outcomes.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An ingress request failed; the caller received a server error.
///
/// The common cause is the end-to-end call-tree deadline expiring before
/// every downstream branch finished.
pub struct IngressRequestFailed<'a> {
    pub trace_id: &'a str,
    pub bench_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for IngressRequestFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ingress request {} failed: {}",
            self.trace_id, self.error
        )
    }
}

impl StructuredLog for IngressRequestFailed<'_> {
    fn log(&self) {
        tracing::error!(
            trace_id = self.trace_id,
            bench_id = self.bench_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "ingress_request_failed",
            span_name = name,
            trace_id = self.trace_id,
            error = %self.error,
        )
    }
}
