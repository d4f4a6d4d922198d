use crate::device::{FrameScheduler, GpuHost, GpuResources};
use crate::error::{BoxError, ErrorCode, StructuredError};
use crate::logging::{Logger, PHASE, PHASE_RENDER_FRAME};

use super::{ClearColor, StopSignal};

/// Result of one [`RenderLoop::run_frame`] invocation.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Clear pass recorded and submitted.
    Submitted,
    /// The frame failed; the error was logged and the loop continues.
    Failed,
    /// Stop signal was raised; nothing rendered, nothing rescheduled.
    Stopped,
}

/// Self-rescheduling per-frame work: clear the presentable image and submit.
///
/// A failing frame is logged with `phase=render_frame` and dropped; the next
/// frame is requested regardless. Only the [`StopSignal`] ends the cycle.
pub struct RenderLoop<H: GpuHost> {
    host: H,
    resources: GpuResources<H>,
    logger: Logger,
    clear_color: ClearColor,
    stop: StopSignal,

    scheduled: bool,
    frame_index: u64,
    frames_submitted: u64,
    frames_failed: u64,
}

impl<H: GpuHost> RenderLoop<H> {
    /// Wraps the resources of a completed initialization.
    ///
    /// The pipeline has already requested the first frame, so the loop starts
    /// out scheduled.
    pub fn new(host: H, resources: GpuResources<H>, logger: Logger) -> Self {
        Self {
            host,
            resources,
            logger,
            clear_color: ClearColor::default(),
            stop: StopSignal::default(),
            scheduled: true,
            frame_index: 0,
            frames_submitted: 0,
            frames_failed: 0,
        }
    }

    pub fn with_clear_color(mut self, color: ClearColor) -> Self {
        self.clear_color = color;
        self
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Handle that halts the loop before its next reschedule.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }

    #[inline]
    pub fn frames_submitted(&self) -> u64 {
        self.frames_submitted
    }

    #[inline]
    pub fn frames_failed(&self) -> u64 {
        self.frames_failed
    }

    /// One scheduled invocation.
    ///
    /// The next frame is requested after the body completes, whether or not it
    /// failed, unless the stop signal is raised.
    pub fn run_frame<S: FrameScheduler>(&mut self, scheduler: &mut S) -> FrameOutcome {
        self.scheduled = false;
        if self.stop.is_stopped() {
            return FrameOutcome::Stopped;
        }

        let index = self.frame_index;
        self.frame_index = self.frame_index.wrapping_add(1);

        let outcome = match self.render() {
            Ok(()) => {
                self.frames_submitted += 1;
                FrameOutcome::Submitted
            }
            Err(err) => {
                self.frames_failed += 1;
                let frame = index.to_string();
                self.logger
                    .error(&err, &[(PHASE, PHASE_RENDER_FRAME), ("frame", frame.as_str())]);
                FrameOutcome::Failed
            }
        };

        if !self.stop.is_stopped() {
            scheduler.request_frame();
            self.scheduled = true;
        }

        outcome
    }

    fn render(&self) -> Result<(), StructuredError> {
        let GpuResources { device, context, .. } = &self.resources;

        let image = self.host.acquire_image(context).map_err(frame_failure)?;
        let commands = self
            .host
            .record_clear_pass(device, &image, self.clear_color)
            .map_err(frame_failure)?;
        self.host
            .submit(device, context, commands, image)
            .map_err(frame_failure)
    }
}

fn frame_failure(cause: BoxError) -> StructuredError {
    StructuredError::new(ErrorCode::PIPELINE_FAILED).with_cause(cause)
}
