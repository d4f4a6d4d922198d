use std::collections::HashMap;
use std::sync::Arc;

use winit::window::Window;

use super::{ContextConfig, GpuHost, GpuInit};
use crate::error::BoxError;
use crate::render::ClearColor;

/// Native host backed by wgpu and winit windows.
///
/// Windows are registered under an identifier; the pipeline resolves its
/// display target by that identifier.
pub struct WgpuHost {
    instance: wgpu::Instance,
    init: GpuInit,
    targets: HashMap<String, Arc<Window>>,
}

/// Logical device and its queue.
pub struct WgpuDevice {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

/// Surface bound to a window, with the capabilities reported by the adapter.
///
/// `configured` is set once the surface is configured and reused when the
/// surface is lost or outdated.
pub struct WgpuContext {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    caps: wgpu::SurfaceCapabilities,
    configured: Option<Configured>,
}

struct Configured {
    device: wgpu::Device,
    config: wgpu::SurfaceConfiguration,
}

/// What to do with the surface after a failed acquisition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum SurfaceRecovery {
    /// Configure the surface again before the next frame.
    Reconfigure,
    /// Leave the surface alone; the next frame retries.
    SkipFrame,
}

/// Acquired surface texture and its view.
///
/// Holding this prevents acquisition of the next frame; it is consumed by
/// [`GpuHost::submit`].
pub struct WgpuImage {
    texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

impl WgpuHost {
    pub fn new(init: GpuInit) -> Self {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: init.backends,
            ..Default::default()
        });

        Self {
            instance,
            init,
            targets: HashMap::new(),
        }
    }

    /// Makes `window` resolvable as display target `id`.
    pub fn register_target(&mut self, id: impl Into<String>, window: Arc<Window>) {
        self.targets.insert(id.into(), window);
    }
}

impl GpuHost for WgpuHost {
    type Target = Arc<Window>;
    type Adapter = wgpu::Adapter;
    type Device = WgpuDevice;
    type Context = WgpuContext;
    type Image = WgpuImage;
    type Commands = wgpu::CommandBuffer;

    fn resolve_target(&mut self, id: &str) -> Option<Arc<Window>> {
        self.targets.get(id).cloned()
    }

    fn api_available(&self) -> bool {
        backends_available(self.init.backends)
    }

    async fn request_adapter(&mut self) -> Option<wgpu::Adapter> {
        let adapter = self
            .instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: self.init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        let info = adapter.get_info();
        log::info!("adapter: {} ({:?}, {:?})", info.name, info.backend, info.device_type);
        Some(adapter)
    }

    async fn request_device(&mut self, adapter: &wgpu::Adapter) -> Result<WgpuDevice, BoxError> {
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("glint device"),
                required_features: self.init.required_features,
                required_limits: self.init.required_limits.clone(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await?;

        Ok(WgpuDevice { device, queue })
    }

    fn acquire_context(
        &mut self,
        target: &Arc<Window>,
        adapter: &wgpu::Adapter,
    ) -> Option<WgpuContext> {
        let surface = match self.instance.create_surface(Arc::clone(target)) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("failed to create surface: {e}");
                return None;
            }
        };
        let caps = surface.get_capabilities(adapter);

        Some(WgpuContext {
            window: Arc::clone(target),
            surface,
            caps,
            configured: None,
        })
    }

    fn preferred_format(&self, context: &WgpuContext) -> Option<wgpu::TextureFormat> {
        choose_surface_format(&context.caps, self.init.prefer_srgb)
    }

    fn configure_context(
        &mut self,
        context: &mut WgpuContext,
        device: &WgpuDevice,
        config: &ContextConfig,
    ) -> Result<(), BoxError> {
        if !context.caps.alpha_modes.contains(&config.alpha_mode) {
            return Err(format!(
                "surface does not support {:?} alpha (supported: {:?})",
                config.alpha_mode, context.caps.alpha_modes
            )
            .into());
        }

        let size = context.window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: config.format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: self.init.present_mode,
            alpha_mode: config.alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: self.init.desired_maximum_frame_latency,
        };

        context.surface.configure(&device.device, &surface_config);
        context.configured = Some(Configured {
            device: device.device.clone(),
            config: surface_config,
        });
        Ok(())
    }

    fn acquire_image(&self, context: &WgpuContext) -> Result<WgpuImage, BoxError> {
        let texture = match context.surface.get_current_texture() {
            Ok(t) => t,
            Err(err) => {
                if surface_recovery(&err) == SurfaceRecovery::Reconfigure {
                    if let Some(c) = &context.configured {
                        log::debug!("surface {err:?}; reconfiguring");
                        context.surface.configure(&c.device, &c.config);
                    }
                }
                return Err(err.into());
            }
        };
        let view = texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(WgpuImage { texture, view })
    }

    fn record_clear_pass(
        &self,
        device: &WgpuDevice,
        image: &WgpuImage,
        color: ClearColor,
    ) -> Result<wgpu::CommandBuffer, BoxError> {
        let scope = device.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let mut encoder = device
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("glint frame encoder"),
            });

        // Pass ends when dropped.
        {
            let _rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("glint clear"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view:           &image.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load:  wgpu::LoadOp::Clear(color.to_wgpu()),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes:         None,
                occlusion_query_set:      None,
                multiview_mask:           None,
            });
        }

        let commands = encoder.finish();
        validation_result(scope)?;
        Ok(commands)
    }

    fn submit(
        &self,
        device: &WgpuDevice,
        context: &WgpuContext,
        commands: wgpu::CommandBuffer,
        image: WgpuImage,
    ) -> Result<(), BoxError> {
        let scope = device.device.push_error_scope(wgpu::ErrorFilter::Validation);
        device.queue.submit(std::iter::once(commands));
        // The texture is dropped unpresented on error.
        validation_result(scope)?;

        context.window.pre_present_notify();
        drop(image.view);
        image.texture.present();
        Ok(())
    }
}

/// Pops the innermost error scope. Scopes resolve immediately on native.
fn validation_result(scope: wgpu::ErrorScopeGuard) -> Result<(), BoxError> {
    match pollster::block_on(scope.pop()) {
        Some(err) => Err(err.to_string().into()),
        None => Ok(()),
    }
}

/// True if any of `requested` is compiled into this build of wgpu.
fn backends_available(requested: wgpu::Backends) -> bool {
    requested.intersects(wgpu::Instance::enabled_backend_features())
}

fn surface_recovery(err: &wgpu::SurfaceError) -> SurfaceRecovery {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => SurfaceRecovery::Reconfigure,
        _ => SurfaceRecovery::SkipFrame,
    }
}

fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    caps.formats.first().copied()
}
