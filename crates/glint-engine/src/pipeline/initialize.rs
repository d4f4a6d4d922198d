use crate::device::{ContextConfig, FrameScheduler, GpuHost, GpuResources};
use crate::error::{ErrorCode, ErrorReport, FailureKind, StructuredError, Surface};
use crate::logging::{Logger, PHASE, PHASE_MAIN_INITIALIZATION};

use super::PipelineState;

/// Reported when `run` is called on a pipeline that already left `Idle`.
const ALREADY_RUN: ErrorCode = ErrorCode::new(FailureKind::InitializationFailed, Surface::Pipeline);

/// One-shot, fail-fast GPU initialization.
///
/// Steps, in order: resolve the display target, check the graphics API,
/// request an adapter, request a device, acquire + configure the context.
/// The first failing step ends the run; nothing is retried.
#[derive(Debug)]
pub struct InitPipeline {
    target_id: String,
    logger: Logger,
    state: PipelineState,
}

impl InitPipeline {
    pub fn new(target_id: impl Into<String>, logger: Logger) -> Self {
        Self {
            target_id: target_id.into(),
            logger,
            state: PipelineState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Runs every step to completion or first failure.
    ///
    /// On success the state is `Running`, `scheduler` has received exactly one
    /// frame request, and the acquired resources are returned. On failure the
    /// state is `Failed(code)` and the scheduler is untouched.
    pub async fn run<H, S>(
        &mut self,
        host: &mut H,
        scheduler: &mut S,
    ) -> Result<GpuResources<H>, StructuredError>
    where
        H: GpuHost,
        S: FrameScheduler,
    {
        if self.state != PipelineState::Idle {
            return Err(StructuredError::new(ALREADY_RUN));
        }

        let Some(target) = host.resolve_target(&self.target_id) else {
            return Err(self.fail(ErrorCode::DISPLAY_TARGET_NOT_FOUND.into()));
        };
        self.advance(PipelineState::TargetResolved);

        if !host.api_available() {
            return Err(self.fail(ErrorCode::API_UNAVAILABLE.into()));
        }
        self.advance(PipelineState::CapabilityChecked);

        let Some(adapter) = host.request_adapter().await else {
            return Err(self.fail(ErrorCode::ADAPTER_NOT_FOUND.into()));
        };
        self.advance(PipelineState::AdapterAcquired);

        let device = match host.request_device(&adapter).await {
            Ok(device) => device,
            Err(cause) => {
                return Err(self.fail(StructuredError::new(ErrorCode::DEVICE_FAILED).with_cause(cause)));
            }
        };
        self.advance(PipelineState::DeviceAcquired);

        let Some(mut context) = host.acquire_context(&target, &adapter) else {
            return Err(self.fail(ErrorCode::CONTEXT_INIT_FAILED.into()));
        };
        let Some(format) = host.preferred_format(&context) else {
            return Err(self.fail(
                StructuredError::new(ErrorCode::CONTEXT_INIT_FAILED)
                    .with_cause("context reports no presentation formats"),
            ));
        };
        let config = ContextConfig::new(format);
        if let Err(cause) = host.configure_context(&mut context, &device, &config) {
            return Err(self.fail(StructuredError::new(ErrorCode::CONTEXT_INIT_FAILED).with_cause(cause)));
        }
        self.advance(PipelineState::ContextConfigured);

        self.advance(PipelineState::Running);
        scheduler.request_frame();

        Ok(GpuResources {
            adapter,
            device,
            context,
            config,
        })
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "illegal pipeline transition {:?} -> {:?}",
            self.state,
            next
        );
        self.state = next;

        let name = format!("{next:?}");
        self.logger.debug("initialization step complete", &[("state", name.as_str())]);
    }

    fn fail(&mut self, err: StructuredError) -> StructuredError {
        self.state = PipelineState::Failed(err.code());
        err
    }
}

/// Terminal reporting for an initialization failure.
///
/// Always logs with `phase=main_initialization`; hands the report to
/// `notify_user` only when the error's visibility reaches the user.
pub fn report_initialization_failure(
    logger: &Logger,
    err: &StructuredError,
    notify_user: impl FnOnce(&ErrorReport),
) {
    logger.error(err, &[(PHASE, PHASE_MAIN_INITIALIZATION)]);
    if err.should_show_to_user() {
        notify_user(&err.report());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingScheduler, FakeError, FakeHost, TARGET_ID, capture_logger};

    fn run(host: &mut FakeHost) -> (InitPipeline, CountingScheduler, Result<GpuResources<FakeHost>, StructuredError>) {
        let (logger, _) = capture_logger();
        let mut pipeline = InitPipeline::new(TARGET_ID, logger);
        let mut scheduler = CountingScheduler::default();
        let result = pollster::block_on(pipeline.run(host, &mut scheduler));
        (pipeline, scheduler, result)
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn missing_target_fails_first() {
        let mut host = FakeHost { target: None, ..Default::default() };
        let (pipeline, scheduler, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state(), PipelineState::Failed(ErrorCode::DISPLAY_TARGET_NOT_FOUND));
        assert_eq!(err.message(), "Canvas element not found.");
        assert!(err.should_show_to_user());
        assert_eq!(host.steps(), ["resolve_target"]);
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn target_lookup_uses_configured_id() {
        let mut host = FakeHost { target: Some("other-canvas"), ..Default::default() };
        let (pipeline, _, result) = run(&mut host);
        assert!(result.is_err());
        assert_eq!(pipeline.state().failure(), Some(ErrorCode::DISPLAY_TARGET_NOT_FOUND));
    }

    #[test]
    fn missing_api_is_unavailable() {
        let mut host = FakeHost { api: false, ..Default::default() };
        let (pipeline, _, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state(), PipelineState::Failed(ErrorCode::API_UNAVAILABLE));
        assert!(err.should_show_to_user());
        assert_eq!(host.steps(), ["resolve_target", "api_available"]);
    }

    #[test]
    fn missing_adapter_is_not_found() {
        let mut host = FakeHost { adapter: false, ..Default::default() };
        let (pipeline, scheduler, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state(), PipelineState::Failed(ErrorCode::ADAPTER_NOT_FOUND));
        assert_eq!(err.message(), "No suitable GPU adapter found.");
        assert!(err.should_show_to_user());
        assert!(!host.steps().contains(&"request_device"));
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn rejected_device_wraps_cause_and_stays_in_logs() {
        let mut host = FakeHost { device_error: Some("X"), ..Default::default() };
        let (pipeline, scheduler, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state(), PipelineState::Failed(ErrorCode::DEVICE_FAILED));
        assert_eq!(err.message(), "Failed to request a GPU device.");
        let cause = err.cause().expect("cause");
        assert_eq!(cause.to_string(), "X");
        assert!(cause.downcast_ref::<FakeError>().is_some());
        assert!(!err.should_show_to_user());
        assert!(err.should_log());
        assert!(!host.steps().contains(&"acquire_context"));
        assert_eq!(scheduler.requests, 0);
    }

    #[test]
    fn missing_context_fails_initialization() {
        let mut host = FakeHost { context: false, ..Default::default() };
        let (pipeline, _, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state(), PipelineState::Failed(ErrorCode::CONTEXT_INIT_FAILED));
        assert!(err.should_show_to_user());
        assert!(!host.steps().contains(&"configure_context"));
    }

    #[test]
    fn context_without_formats_fails_initialization() {
        let mut host = FakeHost { formats: vec![], ..Default::default() };
        let (pipeline, _, result) = run(&mut host);
        assert!(result.is_err());
        assert_eq!(pipeline.state().failure(), Some(ErrorCode::CONTEXT_INIT_FAILED));
    }

    #[test]
    fn unsupported_premultiplied_alpha_fails_initialization() {
        let mut host = FakeHost { premultiplied: false, ..Default::default() };
        let (pipeline, _, result) = run(&mut host);

        let err = result.err().expect("must fail");
        assert_eq!(pipeline.state().failure(), Some(ErrorCode::CONTEXT_INIT_FAILED));
        assert!(err.cause().is_some());
    }

    // ── success ───────────────────────────────────────────────────────────

    #[test]
    fn all_steps_succeed_and_schedule_once() {
        let mut host = FakeHost::default();
        let (pipeline, scheduler, result) = run(&mut host);

        let resources = result.ok().expect("must succeed");
        assert_eq!(pipeline.state(), PipelineState::Running);
        assert_eq!(scheduler.requests, 1);
        assert_eq!(resources.config.alpha_mode, wgpu::CompositeAlphaMode::PreMultiplied);
        assert_eq!(resources.config.format, wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(host.configured, Some(resources.config));
        assert_eq!(
            host.steps(),
            [
                "resolve_target",
                "api_available",
                "request_adapter",
                "request_device",
                "acquire_context",
                "configure_context",
            ]
        );
        assert!(!host.steps().contains(&"acquire_image"));
    }

    #[test]
    fn steps_are_logged_in_development() {
        let (logger, sink) = capture_logger();
        let mut pipeline = InitPipeline::new(TARGET_ID, logger);
        let mut host = FakeHost::default();
        let mut scheduler = CountingScheduler::default();
        assert!(pollster::block_on(pipeline.run(&mut host, &mut scheduler)).is_ok());

        let states: Vec<_> = sink
            .records()
            .iter()
            .filter_map(|r| r.context_value("state").map(str::to_owned))
            .collect();
        assert_eq!(states.first().map(String::as_str), Some("TargetResolved"));
        assert_eq!(states.last().map(String::as_str), Some("Running"));
        assert_eq!(states.len(), 6);
    }

    // ── reporting ─────────────────────────────────────────────────────────

    #[test]
    fn user_visible_failure_is_logged_and_shown() {
        let (logger, sink) = capture_logger();
        let err = StructuredError::new(ErrorCode::ADAPTER_NOT_FOUND);
        let mut shown = None;
        report_initialization_failure(&logger, &err, |r| shown = Some(r.message));

        assert_eq!(shown, Some("No suitable GPU adapter found."));
        assert_eq!(sink.tagged(PHASE, PHASE_MAIN_INITIALIZATION).len(), 1);
    }

    #[test]
    fn device_failure_is_logged_but_not_shown() {
        let (logger, sink) = capture_logger();
        let err = StructuredError::new(ErrorCode::DEVICE_FAILED).with_cause(FakeError("X"));
        let mut shown = false;
        report_initialization_failure(&logger, &err, |_| shown = true);

        assert!(!shown);
        let records = sink.tagged(PHASE, PHASE_MAIN_INITIALIZATION);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].report.as_ref().and_then(|r| r.cause.as_deref()), Some("X"));
    }
}
