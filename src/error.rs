use thiserror::Error;

#[derive(Error, Debug)]
pub enum GscError {
    /// Propagated I/O error (missing input, unreadable kernel source, ...).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No compute platform or device could be found.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The device program failed to compile. Carries the compiler log.
    #[error("kernel build failed:\n{0}")]
    KernelBuild(String),

    /// Any other device runtime failure (buffer, enqueue, read-back).
    #[error("device error: {0}")]
    Device(String),

    /// Artifact record that cannot be decoded: truncated, or carrying a
    /// bit count no compressor could have written.
    #[error("corrupt artifact: {0}")]
    CorruptArtifact(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

#[cfg(feature = "gpu")]
impl From<ocl::Error> for GscError {
    fn from(e: ocl::Error) -> Self {
        GscError::Device(format!("{e}"))
    }
}
