use std::fmt;
use std::fmt::Write as _;
use std::sync::Arc;

use log::Level;

use crate::error::{ErrorReport, StructuredError};

/// Build flavor that decides whether the [`Logger`] emits anything.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BuildMode {
    Development,
    Production,
}

impl BuildMode {
    /// Mode of the current compilation (`debug_assertions`).
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            BuildMode::Development
        } else {
            BuildMode::Production
        }
    }
}

impl Default for BuildMode {
    fn default() -> Self {
        Self::current()
    }
}

/// One emitted record.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub level: Level,
    pub message: String,
    /// Present when the record was emitted for a [`StructuredError`].
    pub report: Option<ErrorReport>,
    pub context: Vec<(String, String)>,
}

impl LogRecord {
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Destination for records accepted by a [`Logger`].
pub trait LogSink: Send + Sync {
    fn write(&self, record: LogRecord);
}

/// What a record is about: free text or a classified error.
#[derive(Debug, Copy, Clone)]
pub enum LogPayload<'a> {
    Text(&'a str),
    Error(&'a StructuredError),
}

impl<'a> From<&'a str> for LogPayload<'a> {
    fn from(s: &'a str) -> Self {
        LogPayload::Text(s)
    }
}

impl<'a> From<&'a StructuredError> for LogPayload<'a> {
    fn from(e: &'a StructuredError) -> Self {
        LogPayload::Error(e)
    }
}

/// Explicitly configured logger handed to the pipeline and render loop.
///
/// Outside [`BuildMode::Development`] every call is a no-op. Cloning shares
/// the sink.
#[derive(Clone)]
pub struct Logger {
    mode: BuildMode,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(mode: BuildMode, sink: Arc<dyn LogSink>) -> Self {
        Self { mode, sink }
    }

    /// Logger writing through the `log` facade.
    pub fn facade(mode: BuildMode) -> Self {
        Self::new(mode, Arc::new(FacadeSink))
    }

    #[inline]
    pub fn mode(&self) -> BuildMode {
        self.mode
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.mode == BuildMode::Development
    }

    pub fn debug<'a>(&self, payload: impl Into<LogPayload<'a>>, context: &[(&str, &str)]) {
        self.emit(Level::Debug, payload.into(), context);
    }

    pub fn info<'a>(&self, payload: impl Into<LogPayload<'a>>, context: &[(&str, &str)]) {
        self.emit(Level::Info, payload.into(), context);
    }

    pub fn warn<'a>(&self, payload: impl Into<LogPayload<'a>>, context: &[(&str, &str)]) {
        self.emit(Level::Warn, payload.into(), context);
    }

    pub fn error<'a>(&self, payload: impl Into<LogPayload<'a>>, context: &[(&str, &str)]) {
        self.emit(Level::Error, payload.into(), context);
    }

    fn emit(&self, level: Level, payload: LogPayload<'_>, context: &[(&str, &str)]) {
        if !self.is_enabled() {
            return;
        }

        let (message, report) = match payload {
            LogPayload::Text(text) => (text.to_owned(), None),
            LogPayload::Error(err) => (err.to_string(), Some(err.report())),
        };

        self.sink.write(LogRecord {
            level,
            message,
            report,
            context: context
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        });
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").field("mode", &self.mode).finish_non_exhaustive()
    }
}

/// Sink forwarding to the `log` facade under target `glint`.
///
/// Renders `message key=value ...`, followed by the JSON error report when
/// there is one.
#[derive(Debug, Default, Copy, Clone)]
pub struct FacadeSink;

impl LogSink for FacadeSink {
    fn write(&self, record: LogRecord) {
        let mut line = record.message;
        for (k, v) in &record.context {
            let _ = write!(line, " {k}={v}");
        }
        if let Some(json) = record.report.as_ref().and_then(|r| r.to_json().ok()) {
            let _ = write!(line, " report={json}");
        }
        log::log!(target: "glint", record.level, "{line}");
    }
}
