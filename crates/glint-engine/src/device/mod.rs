//! GPU device + surface management.
//!
//! [`GpuHost`] is the seam between the initialization pipeline / render loop
//! and the platform. [`WgpuHost`] implements it on top of wgpu + winit.

mod host;
mod init;
mod wgpu_host;

pub use host::{ContextConfig, FrameScheduler, GpuHost, GpuResources};
pub use init::GpuInit;
pub use wgpu_host::{WgpuContext, WgpuDevice, WgpuHost, WgpuImage};
