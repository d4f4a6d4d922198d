//! Logging utilities.
//!
//! Two layers:
//! - [`init_logging`] installs `env_logger` behind the `log` facade
//! - [`Logger`] is the explicit, build-mode-gated handle the pipeline and render
//!   loop report through; it writes to a [`LogSink`]

mod capture;
mod init;
mod logger;

pub use capture::CaptureSink;
pub use init::{LoggingConfig, init_logging};
pub use logger::{BuildMode, FacadeSink, LogPayload, LogRecord, LogSink, Logger};

/// Context key tagging where a record originated.
pub const PHASE: &str = "phase";
pub const PHASE_MAIN_INITIALIZATION: &str = "main_initialization";
pub const PHASE_RENDER_FRAME: &str = "render_frame";
