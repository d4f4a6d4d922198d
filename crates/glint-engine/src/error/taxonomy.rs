use super::code::{ErrorCode, FailureKind, Surface, Visibility};

/// Message for any code without its own table entry.
pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again later.";

const MESSAGES: &[(ErrorCode, &str)] = &[
    (ErrorCode::API_UNAVAILABLE, "GPU rendering is not supported on this system."),
    (ErrorCode::DISPLAY_TARGET_NOT_FOUND, "Canvas element not found."),
    (ErrorCode::ADAPTER_NOT_FOUND, "No suitable GPU adapter found."),
    (ErrorCode::DEVICE_FAILED, "Failed to request a GPU device."),
    (ErrorCode::CONTEXT_INIT_FAILED, "Failed to initialize the rendering context."),
    (ErrorCode::PIPELINE_FAILED, "Failed to render a frame."),
];

/// Result of classifying an [`ErrorCode`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Classification {
    pub message: &'static str,
    pub visibility: Visibility,
}

/// Looks up the message and audience for `code`.
///
/// Total: unmapped codes get [`FALLBACK_MESSAGE`].
pub fn classify(code: ErrorCode) -> Classification {
    Classification {
        message: message_for(code),
        visibility: visibility_for(code.surface),
    }
}

pub fn message_for(code: ErrorCode) -> &'static str {
    MESSAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, m)| *m)
        .unwrap_or(FALLBACK_MESSAGE)
}

/// Audience policy. Depends on the surface only, never on the kind.
///
/// `Device` is log-only even though a device failure is fatal to startup.
pub const fn visibility_for(surface: Surface) -> Visibility {
    match surface {
        Surface::Api => Visibility::User,
        Surface::Adapter => Visibility::User,
        Surface::Device => Visibility::Log,
        Surface::Context => Visibility::User,
        Surface::DisplayTarget => Visibility::User,
        Surface::Pipeline => Visibility::Log,
    }
}

/// Every code that has a dedicated message.
pub fn mapped_codes() -> impl Iterator<Item = ErrorCode> {
    MESSAGES.iter().map(|(c, _)| *c)
}

/// Every `(kind, surface)` combination, mapped or not.
pub fn all_codes() -> impl Iterator<Item = ErrorCode> {
    FailureKind::ALL
        .into_iter()
        .flat_map(|k| Surface::ALL.into_iter().map(move |s| ErrorCode::new(k, s)))
}
