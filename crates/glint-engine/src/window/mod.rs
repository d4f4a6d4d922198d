//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single window, runs GPU initialization
//! against it, and drives the render loop from redraw requests.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig};
