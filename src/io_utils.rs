use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crate::GscError;

/// Suffix appended to compressed outputs.
pub const ARTIFACT_SUFFIX: &str = ".bin";
/// Suffix appended on decompression when the input lacks [`ARTIFACT_SUFFIX`].
pub const RESTORED_SUFFIX: &str = ".out";

#[derive(Debug)]
pub struct CliError {
    pub msg: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.msg.fmt(f)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Format a user friendly I/O error message with suggestions.
pub fn format_io_error(operation: &str, path: &Path, err: &io::Error) -> String {
    use io::ErrorKind::*;
    let suggestion = match err.kind() {
        NotFound => "Check that the file exists and the path is correct.",
        PermissionDenied => "Check permissions or run as a different user.",
        UnexpectedEof => "File appears truncated or corrupted.",
        WriteZero => "Disk may be full. Free up space and try again.",
        Other if err.raw_os_error() == Some(28) => "Disk may be full. Free up space and try again.",
        _ => "Check permissions or free up disk space.",
    };
    format!(
        "Error {} '{}': {}. {}",
        operation,
        path.display(),
        err,
        suggestion
    )
}

/// Convert an I/O error into a CLI error with context.
pub fn io_cli_error(operation: &str, path: &Path, err: io::Error) -> CliError {
    CliError {
        msg: format_io_error(operation, path, &err),
        source: Some(Box::new(err)),
    }
}

pub fn simple_cli_error(msg: &str) -> CliError {
    CliError {
        msg: msg.to_string(),
        source: None,
    }
}

/// Convert a library error into a CLI error with a hint.
pub fn gsc_cli_error(context: &str, err: GscError) -> CliError {
    CliError {
        msg: format!("{}: {}", context, cli_hint(&err)),
        source: Some(Box::new(err)),
    }
}

/// Return an actionable hint for a library error variant.
pub fn cli_hint(err: &GscError) -> String {
    use crate::GscError::*;
    match err {
        Io(io) => format!("{io}"),
        DeviceUnavailable(msg) => {
            format!("{msg}. Install an OpenCL runtime or use `compress` instead.")
        }
        KernelBuild(log) => format!("kernel failed to compile:\n{log}"),
        Device(msg) => format!("{msg}. The device path was aborted."),
        CorruptArtifact(msg) => format!("{msg}. Verify the file is intact."),
        Config(msg) => format!("{msg}. Invalid configuration."),
    }
}

/// `<input>.bin`
pub fn default_artifact_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_owned();
    name.push(ARTIFACT_SUFFIX);
    PathBuf::from(name)
}

/// Strip a trailing `.bin`, or append `.out` when there is none.
pub fn default_restored_path(artifact: &Path) -> PathBuf {
    let raw = artifact.to_string_lossy();
    match raw.strip_suffix(ARTIFACT_SUFFIX) {
        Some(stem) if !stem.is_empty() => PathBuf::from(stem),
        _ => {
            let mut name = artifact.as_os_str().to_owned();
            name.push(RESTORED_SUFFIX);
            PathBuf::from(name)
        }
    }
}
