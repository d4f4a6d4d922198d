use std::backtrace::{Backtrace, BacktraceStatus};

use serde::Serialize;
use thiserror::Error;

use super::BoxError;
use super::code::{ErrorCode, FailureKind, Surface, Visibility};
use super::taxonomy;

/// A classified failure.
///
/// Message and visibility are derived from the code at construction and never
/// change afterwards. The optional cause carries the underlying platform error.
#[derive(Debug, Error)]
#[error("{code}: {message}")]
pub struct StructuredError {
    code: ErrorCode,
    message: &'static str,
    visibility: Visibility,
    #[source]
    cause: Option<BoxError>,
    trace: Option<String>,
}

impl StructuredError {
    pub fn new(code: ErrorCode) -> Self {
        let classification = taxonomy::classify(code);
        Self {
            code,
            message: classification.message,
            visibility: classification.visibility,
            cause: None,
            trace: capture_trace(),
        }
    }

    /// Attaches the underlying failure.
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    #[inline]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[inline]
    pub fn kind(&self) -> FailureKind {
        self.code.kind
    }

    #[inline]
    pub fn surface(&self) -> Surface {
        self.code.surface
    }

    /// User-facing message from the taxonomy table.
    #[inline]
    pub fn message(&self) -> &'static str {
        self.message
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn should_show_to_user(&self) -> bool {
        self.visibility.reaches_user()
    }

    pub fn should_log(&self) -> bool {
        self.visibility.reaches_log()
    }

    /// Flattened, serializable view shared by the logger and user-facing display.
    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            code: self.code,
            message: self.message,
            kind: self.code.kind,
            surface: self.code.surface,
            visibility: self.visibility,
            cause: self.cause.as_deref().map(|c| cause_chain(c)),
            trace: self.trace.clone(),
        }
    }
}

impl From<ErrorCode> for StructuredError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Serialized form of a [`StructuredError`].
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: &'static str,
    pub kind: FailureKind,
    pub surface: Surface,
    pub visibility: Visibility,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
}

impl ErrorReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

fn capture_trace() -> Option<String> {
    let bt = Backtrace::capture();
    match bt.status() {
        BacktraceStatus::Captured => Some(bt.to_string()),
        _ => None,
    }
}

/// `outer: inner: root`, same shape as anyhow's `{:#}`.
fn cause_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut next = err.source();
    while let Some(e) = next {
        out.push_str(": ");
        out.push_str(&e.to_string());
        next = e.source();
    }
    out
}
