//! Per-frame rendering.
//!
//! The loop only clears the presentable image; nothing is drawn.

mod color;
mod render_loop;
mod stop;

pub use color::ClearColor;
pub use render_loop::{FrameOutcome, RenderLoop};
pub use stop::StopSignal;
