// core/src/flow/control.rs

/// Signal from a handler: keep going, or halt the pipeline here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  Continue,
  /// No further handlers in this step or later steps run.
  Stop,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  Completed,
  Stopped,
}
