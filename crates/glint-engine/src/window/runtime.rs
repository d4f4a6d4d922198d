use std::sync::Arc;

use anyhow::{Context, Result};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{FrameScheduler, GpuInit, WgpuHost};
use crate::error::ErrorReport;
use crate::logging::{BuildMode, Logger};
use crate::pipeline::{InitPipeline, report_initialization_failure};
use crate::render::{ClearColor, RenderLoop, StopSignal};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
    /// Identifier the window is registered under and the pipeline resolves.
    pub target_id: String,
    pub clear_color: ClearColor,
    pub gpu: GpuInit,
    pub build_mode: BuildMode,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "glint".to_string(),
            initial_size: LogicalSize::new(1280.0, 720.0),
            target_id: "gpu-canvas".to_string(),
            clear_color: ClearColor::default(),
            gpu: GpuInit::default(),
            build_mode: BuildMode::default(),
        }
    }
}

/// Frame scheduling through winit redraw requests.
struct RedrawScheduler<'a> {
    window: &'a Arc<Window>,
}

impl FrameScheduler for RedrawScheduler<'_> {
    fn request_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    /// Runs until the window is closed.
    ///
    /// Initialization failures do not end the run: the window stays open in
    /// its non-rendering state, showing the user-facing message when the error
    /// is meant for the user.
    pub fn run(config: RuntimeConfig) -> Result<()> {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

enum Session {
    /// Window not created yet.
    Pending,
    Running {
        window: Arc<Window>,
        render_loop: RenderLoop<WgpuHost>,
    },
    /// Initialization failed; nothing is rendered.
    Halted { window: Arc<Window> },
}

struct AppState {
    config: RuntimeConfig,
    logger: Logger,
    stop: StopSignal,
    session: Session,
}

impl AppState {
    fn new(config: RuntimeConfig) -> Self {
        let logger = Logger::facade(config.build_mode);
        Self {
            config,
            logger,
            stop: StopSignal::new(),
            session: Session::Pending,
        }
    }

    fn start_session(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = Arc::new(
            event_loop
                .create_window(attrs)
                .context("failed to create window")?,
        );

        let mut host = WgpuHost::new(self.config.gpu.clone());
        host.register_target(self.config.target_id.clone(), Arc::clone(&window));

        let mut pipeline = InitPipeline::new(self.config.target_id.clone(), self.logger.clone());
        let mut scheduler = RedrawScheduler { window: &window };

        self.session = match pollster::block_on(pipeline.run(&mut host, &mut scheduler)) {
            Ok(resources) => {
                let render_loop = RenderLoop::new(host, resources, self.logger.clone())
                    .with_clear_color(self.config.clear_color)
                    .with_stop_signal(self.stop.clone());
                Session::Running { window, render_loop }
            }
            Err(err) => {
                let title = &self.config.title;
                report_initialization_failure(&self.logger, &err, |report| {
                    show_to_user(&window, title, report);
                });
                Session::Halted { window }
            }
        };

        Ok(())
    }

    fn window_id(&self) -> Option<WindowId> {
        match &self.session {
            Session::Pending => None,
            Session::Running { window, .. } | Session::Halted { window } => Some(window.id()),
        }
    }
}

fn show_to_user(window: &Window, title: &str, report: &ErrorReport) {
    window.set_title(&format!("{title} - {}", report.message));
    eprintln!("{}", report.message);
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if !matches!(self.session, Session::Pending) {
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        if let Err(e) = self.start_session(event_loop) {
            log::error!("failed to create window: {e:#}");
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.window_id() != Some(window_id) {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.stop.stop();
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                if let Session::Running { window, render_loop } = &mut self.session {
                    let mut scheduler = RedrawScheduler { window };
                    render_loop.run_frame(&mut scheduler);
                }
            }

            _ => {}
        }
    }
}
