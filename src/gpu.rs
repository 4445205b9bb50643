use std::path::Path;

use crate::batch::BatchDevice;
use crate::GscError;

#[cfg(feature = "gpu")]
#[path = "gpu_impl.rs"]
mod gpu_impl;
#[cfg(feature = "gpu")]
pub use gpu_impl::{OpenClDevice, KERNEL_NAME, KERNEL_SOURCE};

#[path = "gpu_cpu.rs"]
mod gpu_cpu;
pub use gpu_cpu::HostDevice;

/// Open the first OpenCL GPU, building the embedded kernel or the one at
/// `kernel`.
#[cfg(feature = "gpu")]
pub fn open_device(kernel: Option<&Path>) -> Result<Box<dyn BatchDevice>, GscError> {
    let device = match kernel {
        Some(path) => OpenClDevice::from_path(path)?,
        None => OpenClDevice::new(KERNEL_SOURCE)?,
    };
    Ok(Box::new(device))
}

#[cfg(not(feature = "gpu"))]
pub fn open_device(kernel: Option<&Path>) -> Result<Box<dyn BatchDevice>, GscError> {
    if let Some(path) = kernel {
        // still surface a missing kernel file as an I/O error
        std::fs::metadata(path)?;
    }
    Err(GscError::DeviceUnavailable(
        "built without the `gpu` feature; rebuild with --features gpu".into(),
    ))
}
