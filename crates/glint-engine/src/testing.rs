//! Scripted host and helpers shared by unit tests.

use std::cell::{Cell, RefCell};
use std::sync::Arc;

use thiserror::Error;

use crate::device::{ContextConfig, FrameScheduler, GpuHost};
use crate::error::BoxError;
use crate::logging::{BuildMode, CaptureSink, Logger};
use crate::render::ClearColor;

pub(crate) const TARGET_ID: &str = "gpu-canvas";

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct FakeError(pub &'static str);

#[derive(Debug)]
pub(crate) struct FakeAdapter;

#[derive(Debug)]
pub(crate) struct FakeDevice;

#[derive(Debug)]
pub(crate) struct FakeContext;

/// Host whose every step outcome is scripted by its public fields.
pub(crate) struct FakeHost {
    pub target: Option<&'static str>,
    pub api: bool,
    pub adapter: bool,
    pub device_error: Option<&'static str>,
    pub context: bool,
    pub formats: Vec<wgpu::TextureFormat>,
    pub premultiplied: bool,
    /// Zero-based acquisition attempts that fail.
    pub failing_acquisitions: Vec<u32>,
    /// Images whose clear pass fails to record.
    pub failing_records: Vec<u32>,
    /// Images whose submission fails.
    pub failing_submits: Vec<u32>,

    pub configured: Option<ContextConfig>,
    pub steps: RefCell<Vec<&'static str>>,
    pub submitted: RefCell<Vec<(u32, ClearColor)>>,
    pub acquisitions: Cell<u32>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self {
            target: Some(TARGET_ID),
            api: true,
            adapter: true,
            device_error: None,
            context: true,
            formats: vec![wgpu::TextureFormat::Bgra8Unorm],
            premultiplied: true,
            failing_acquisitions: Vec::new(),
            failing_records: Vec::new(),
            failing_submits: Vec::new(),
            configured: None,
            steps: RefCell::new(Vec::new()),
            submitted: RefCell::new(Vec::new()),
            acquisitions: Cell::new(0),
        }
    }
}

impl FakeHost {
    pub fn steps(&self) -> Vec<&'static str> {
        self.steps.borrow().clone()
    }

    pub fn submissions(&self) -> usize {
        self.submitted.borrow().len()
    }

    fn record(&self, step: &'static str) {
        self.steps.borrow_mut().push(step);
    }
}

impl GpuHost for FakeHost {
    type Target = &'static str;
    type Adapter = FakeAdapter;
    type Device = FakeDevice;
    type Context = FakeContext;
    type Image = u32;
    type Commands = (u32, ClearColor);

    fn resolve_target(&mut self, id: &str) -> Option<&'static str> {
        self.record("resolve_target");
        self.target.filter(|t| *t == id)
    }

    fn api_available(&self) -> bool {
        self.record("api_available");
        self.api
    }

    async fn request_adapter(&mut self) -> Option<FakeAdapter> {
        self.record("request_adapter");
        self.adapter.then_some(FakeAdapter)
    }

    async fn request_device(&mut self, _adapter: &FakeAdapter) -> Result<FakeDevice, BoxError> {
        self.record("request_device");
        match self.device_error {
            Some(msg) => Err(FakeError(msg).into()),
            None => Ok(FakeDevice),
        }
    }

    fn acquire_context(&mut self, _target: &&'static str, _adapter: &FakeAdapter) -> Option<FakeContext> {
        self.record("acquire_context");
        self.context.then_some(FakeContext)
    }

    fn preferred_format(&self, _context: &FakeContext) -> Option<wgpu::TextureFormat> {
        self.formats.first().copied()
    }

    fn configure_context(
        &mut self,
        _context: &mut FakeContext,
        _device: &FakeDevice,
        config: &ContextConfig,
    ) -> Result<(), BoxError> {
        self.record("configure_context");
        if !self.premultiplied {
            return Err(FakeError("premultiplied alpha unsupported").into());
        }
        self.configured = Some(*config);
        Ok(())
    }

    fn acquire_image(&self, _context: &FakeContext) -> Result<u32, BoxError> {
        self.record("acquire_image");
        let n = self.acquisitions.get();
        self.acquisitions.set(n + 1);
        if self.failing_acquisitions.contains(&n) {
            return Err(FakeError("surface outdated").into());
        }
        Ok(n)
    }

    fn record_clear_pass(
        &self,
        _device: &FakeDevice,
        image: &u32,
        color: ClearColor,
    ) -> Result<(u32, ClearColor), BoxError> {
        self.record("record_clear_pass");
        if self.failing_records.contains(image) {
            return Err(FakeError("invalid render pass").into());
        }
        Ok((*image, color))
    }

    fn submit(
        &self,
        _device: &FakeDevice,
        _context: &FakeContext,
        commands: (u32, ClearColor),
        image: u32,
    ) -> Result<(), BoxError> {
        self.record("submit");
        if self.failing_submits.contains(&image) {
            return Err(FakeError("queue submission rejected").into());
        }
        self.submitted.borrow_mut().push(commands);
        Ok(())
    }
}

/// Scheduler that only counts requests.
#[derive(Debug, Default)]
pub(crate) struct CountingScheduler {
    pub requests: u32,
}

impl FrameScheduler for CountingScheduler {
    fn request_frame(&mut self) {
        self.requests += 1;
    }
}

pub(crate) fn capture_logger() -> (Logger, Arc<CaptureSink>) {
    let sink = Arc::new(CaptureSink::new());
    (Logger::new(BuildMode::Development, sink.clone()), sink)
}
