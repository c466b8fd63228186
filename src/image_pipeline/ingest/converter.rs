use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::image_pipeline::common::error::Result;
use crate::image_pipeline::ingest::artifact::ConversionArtifact;

/// An external program plus any arguments that always precede the
/// per-call ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalTool {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl ExternalTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.leading_args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Runs the tool to completion. No retry: the error string is the reason
    /// the conversion failed.
    pub fn run<I, S>(&self, args: I) -> std::result::Result<(), String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(&self.leading_args).args(args);
        debug!("Running {:?}", command);

        let output = command
            .output()
            .map_err(|e| format!("could not start {}: {}", self.program.display(), e))?;

        if output.status.success() {
            Ok(())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(format!("{} exited with {}: {}", self.program.display(), output.status, stderr.trim()))
        }
    }
}

/// A strategy for turning a file the codec cannot read into one it can.
pub trait RawConverter: Send + Sync {
    /// Short tool name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Converts `input` at full resolution into a temp file owned by the caller.
    fn convert(&self, input: &Path) -> Result<ConversionArtifact>;

    /// Converts `input` with its larger dimension capped at the given size.
    /// Converters that cannot scale fall back to a full-resolution conversion.
    fn convert_scaled(&self, input: &Path, _max_dimension: u32) -> Result<ConversionArtifact> {
        self.convert(input)
    }
}
