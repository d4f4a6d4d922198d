//! Error taxonomy.
//!
//! Every failure is an [`ErrorCode`] (`kind:surface`). Classification is a pure
//! table lookup producing the user-facing message and the audience
//! ([`Visibility`]). [`StructuredError`] is the single error value carried by
//! initialization and frame rendering.

mod code;
mod structured;
mod taxonomy;

pub use code::{ErrorCode, FailureKind, Surface, Visibility};
pub use structured::{ErrorReport, StructuredError};
pub use taxonomy::{
    Classification, FALLBACK_MESSAGE, all_codes, classify, mapped_codes, message_for,
    visibility_for,
};

/// Opaque platform failure wrapped as a cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
