//! Common utilities module
//!
//! Shared error taxonomy used by every stage of the LUT pipeline.

pub mod error;

pub use error::{PipelineError, Result};
