use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "lutbox";
const TOKEN_LEN: usize = 10;

/// Builds a temp file path that is unique per call: millisecond timestamp plus
/// a random token. `extension` includes its leading dot, or is empty.
pub fn unique_temp_path(dir: &Path, kind: &str, extension: &str) -> PathBuf {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect();
    dir.join(format!("{TEMP_PREFIX}_{kind}_{millis}_{token}{extension}"))
}

/// A temporary file owned by whoever holds this guard.
///
/// The file is removed when the guard is dropped, on success and error paths
/// alike. A file that was never created is ignored; any other removal
/// failure is logged and swallowed so it cannot mask the operation's own
/// result.
#[derive(Debug)]
pub struct ConversionArtifact {
    path: PathBuf,
}

impl ConversionArtifact {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ConversionArtifact {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed temp file {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove temp file {}: {}", self.path.display(), e),
        }
    }
}
