use std::path::PathBuf;

use serde::Serialize;

use crate::image_pipeline::common::error::Result;

/// Outcome of a full-resolution `process` call, shaped for a UI or JSON
/// consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Result<PathBuf>> for ProcessReport {
    fn from(result: Result<PathBuf>) -> Self {
        match result {
            Ok(path) => Self {
                success: true,
                output_path: Some(path),
                error: None,
            },
            Err(e) => Self {
                success: false,
                output_path: None,
                error: Some(e.to_string()),
            },
        }
    }
}
