//! Glint engine crate.
//!
//! GPU context initialization, a resilient clear-color render loop, and the
//! error taxonomy that decides which failures reach the user.

pub mod device;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod render;
pub mod window;

#[cfg(test)]
mod testing;
