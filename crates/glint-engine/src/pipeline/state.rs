use crate::error::ErrorCode;

/// Progress of GPU initialization.
///
/// Moves strictly forward through the acquisition steps; `Failed` is absorbing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PipelineState {
    Idle,
    TargetResolved,
    CapabilityChecked,
    AdapterAcquired,
    DeviceAcquired,
    ContextConfigured,
    Running,
    Failed(ErrorCode),
}

impl PipelineState {
    /// Position in the success path; `None` for `Failed`.
    const fn step(self) -> Option<u8> {
        match self {
            PipelineState::Idle => Some(0),
            PipelineState::TargetResolved => Some(1),
            PipelineState::CapabilityChecked => Some(2),
            PipelineState::AdapterAcquired => Some(3),
            PipelineState::DeviceAcquired => Some(4),
            PipelineState::ContextConfigured => Some(5),
            PipelineState::Running => Some(6),
            PipelineState::Failed(_) => None,
        }
    }

    /// Whether `next` is a legal successor: the following step, or a failure
    /// from any non-terminal state.
    pub fn can_advance_to(self, next: PipelineState) -> bool {
        match (self.step(), next) {
            (None, _) => false,
            (Some(6), _) => false,
            (Some(_), PipelineState::Failed(_)) => true,
            (Some(cur), next) => next.step() == Some(cur + 1),
        }
    }

    #[inline]
    pub fn is_running(self) -> bool {
        self == PipelineState::Running
    }

    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, PipelineState::Running | PipelineState::Failed(_))
    }

    pub fn failure(self) -> Option<ErrorCode> {
        match self {
            PipelineState::Failed(code) => Some(code),
            _ => None,
        }
    }
}
