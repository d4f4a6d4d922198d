use std::fmt;

use serde::Serialize;

/// What went wrong, independent of where.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Unavailable,
    NotFound,
    Failed,
    InitializationFailed,
}

impl FailureKind {
    pub const ALL: [FailureKind; 4] = [
        FailureKind::Unavailable,
        FailureKind::NotFound,
        FailureKind::Failed,
        FailureKind::InitializationFailed,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Unavailable => "unavailable",
            FailureKind::NotFound => "not_found",
            FailureKind::Failed => "failed",
            FailureKind::InitializationFailed => "initialization_failed",
        }
    }
}

/// Subsystem that raised a failure.
///
/// Not to be confused with `wgpu::Surface`: this names the layer responsible,
/// and drives who gets to see the error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    Api,
    Adapter,
    Device,
    Context,
    DisplayTarget,
    Pipeline,
}

impl Surface {
    pub const ALL: [Surface; 6] = [
        Surface::Api,
        Surface::Adapter,
        Surface::Device,
        Surface::Context,
        Surface::DisplayTarget,
        Surface::Pipeline,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Surface::Api => "api",
            Surface::Adapter => "adapter",
            Surface::Device => "device",
            Surface::Context => "context",
            Surface::DisplayTarget => "display_target",
            Surface::Pipeline => "pipeline",
        }
    }
}

/// Audience for an error.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Must reach the end user.
    User,
    /// Internal diagnostics only.
    Log,
    Both,
}

impl Visibility {
    #[inline]
    pub const fn reaches_user(self) -> bool {
        matches!(self, Visibility::User | Visibility::Both)
    }

    #[inline]
    pub const fn reaches_log(self) -> bool {
        matches!(self, Visibility::Log | Visibility::Both)
    }
}

/// Composite `(kind, surface)` key.
///
/// Displays as `kind:surface`, e.g. `not_found:adapter`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ErrorCode {
    pub kind: FailureKind,
    pub surface: Surface,
}

impl ErrorCode {
    pub const API_UNAVAILABLE: ErrorCode = ErrorCode::new(FailureKind::Unavailable, Surface::Api);
    pub const DISPLAY_TARGET_NOT_FOUND: ErrorCode =
        ErrorCode::new(FailureKind::NotFound, Surface::DisplayTarget);
    pub const ADAPTER_NOT_FOUND: ErrorCode = ErrorCode::new(FailureKind::NotFound, Surface::Adapter);
    pub const DEVICE_FAILED: ErrorCode = ErrorCode::new(FailureKind::Failed, Surface::Device);
    pub const CONTEXT_INIT_FAILED: ErrorCode =
        ErrorCode::new(FailureKind::InitializationFailed, Surface::Context);
    pub const PIPELINE_FAILED: ErrorCode = ErrorCode::new(FailureKind::Failed, Surface::Pipeline);

    #[inline]
    pub const fn new(kind: FailureKind, surface: Surface) -> Self {
        Self { kind, surface }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.surface.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
