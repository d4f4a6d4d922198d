use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag the render loop checks before rescheduling itself.
///
/// Defaults to "never stop". Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct StopSignal {
    stopped: Arc<AtomicBool>,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}
