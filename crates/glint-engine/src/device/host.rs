use std::future::Future;

use crate::error::BoxError;
use crate::render::ClearColor;

/// Host facility that invokes the next frame before the next presentation.
pub trait FrameScheduler {
    fn request_frame(&mut self);
}

/// Parameters for configuring the presentation context.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ContextConfig {
    pub format: wgpu::TextureFormat,
    pub alpha_mode: wgpu::CompositeAlphaMode,
}

impl ContextConfig {
    /// The only alpha mode the context is ever configured with.
    pub const ALPHA_MODE: wgpu::CompositeAlphaMode = wgpu::CompositeAlphaMode::PreMultiplied;

    pub const fn new(format: wgpu::TextureFormat) -> Self {
        Self {
            format,
            alpha_mode: Self::ALPHA_MODE,
        }
    }
}

/// Platform services the GPU state is acquired from and frames are presented
/// through.
///
/// Initialization methods take `&mut self` and run once, in pipeline order.
/// Frame methods take `&self`; the acquired device and context are only read.
pub trait GpuHost {
    /// Resolved on-screen element the context is created on.
    type Target;
    type Adapter;
    type Device;
    type Context;
    /// Presentable image plus its view for one frame.
    type Image;
    /// Finished command buffer.
    type Commands;

    fn resolve_target(&mut self, id: &str) -> Option<Self::Target>;

    fn api_available(&self) -> bool;

    fn request_adapter(&mut self) -> impl Future<Output = Option<Self::Adapter>>;

    fn request_device(
        &mut self,
        adapter: &Self::Adapter,
    ) -> impl Future<Output = Result<Self::Device, BoxError>>;

    fn acquire_context(
        &mut self,
        target: &Self::Target,
        adapter: &Self::Adapter,
    ) -> Option<Self::Context>;

    /// Host-preferred presentation format; `None` if the context offers none.
    fn preferred_format(&self, context: &Self::Context) -> Option<wgpu::TextureFormat>;

    /// Configures `context` for presentation. The host keeps whatever it needs
    /// to reconfigure the same context later.
    fn configure_context(
        &mut self,
        context: &mut Self::Context,
        device: &Self::Device,
        config: &ContextConfig,
    ) -> Result<(), BoxError>;

    fn acquire_image(&self, context: &Self::Context) -> Result<Self::Image, BoxError>;

    /// Records one render pass clearing `image` to `color`, with no draws.
    fn record_clear_pass(
        &self,
        device: &Self::Device,
        image: &Self::Image,
        color: ClearColor,
    ) -> Result<Self::Commands, BoxError>;

    /// Submits `commands` and presents `image`. On error nothing is presented.
    fn submit(
        &self,
        device: &Self::Device,
        context: &Self::Context,
        commands: Self::Commands,
        image: Self::Image,
    ) -> Result<(), BoxError>;
}

/// GPU state produced by a successful initialization.
///
/// Lives for the rest of the session; never mutated after configuration.
pub struct GpuResources<H: GpuHost> {
    pub adapter: H::Adapter,
    pub device: H::Device,
    pub context: H::Context,
    pub config: ContextConfig,
}
