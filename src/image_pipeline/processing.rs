//! Processing orchestration module
//!
//! Composes LUT loading, ingestion, the transform and encoding into the
//! public operations: full-resolution processing, plain preview and LUT
//! preview.

mod config;
mod processor;
mod report;
mod timing;

#[cfg(test)]
mod tests;

pub use config::{DEFAULT_PREVIEW_WIDTH, ProcessorConfig, ProcessorConfigBuilder};
pub use processor::LutProcessor;
pub use report::ProcessReport;
pub use timing::{PipelineTimings, StepTiming, Timer};
