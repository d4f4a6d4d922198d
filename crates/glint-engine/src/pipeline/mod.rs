//! GPU initialization state machine.

mod initialize;
mod state;

pub use initialize::{InitPipeline, report_initialization_failure};
pub use state::PipelineState;
