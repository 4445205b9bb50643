use std::fs;
use std::path::Path;

use ocl::{flags, Buffer, Context, Device, Kernel, Platform, Program, Queue};
use tracing::info;

use crate::batch::BatchDevice;
use crate::search::SearchTarget;
use crate::GscError;

/// Embedded OpenCL program. Overridden by `OpenClDevice::from_path`.
pub const KERNEL_SOURCE: &str = include_str!("kernels/seed_search.cl");
/// Entry point: `(out_seed, target, bit_count, start_seed, found)`.
pub const KERNEL_NAME: &str = "seed_search";

const BUILD_OPTIONS: &str = "-cl-std=CL1.2";

/// OpenCL batch device on the first GPU of the first platform.
///
/// The output-seed and found-flag buffers live for the whole search; the
/// target buffer and kernel are created once in `load_target`.
pub struct OpenClDevice {
    device_name: String,
    queue: Queue,
    program: Program,
    out_seed: Buffer<u64>,
    found: Buffer<i32>,
    target: Option<Buffer<u64>>,
    kernel: Option<Kernel>,
}

impl OpenClDevice {
    /// Pick a device and build `source`. Build failures carry the compiler
    /// log in [`GscError::KernelBuild`].
    pub fn new(source: &str) -> Result<Self, GscError> {
        let platform = Platform::list()
            .into_iter()
            .next()
            .ok_or_else(|| GscError::DeviceUnavailable("no OpenCL platforms found".into()))?;
        let device = Device::list(platform, Some(flags::DEVICE_TYPE_GPU))
            .map_err(|e| GscError::DeviceUnavailable(format!("{e}")))?
            .into_iter()
            .next()
            .ok_or_else(|| GscError::DeviceUnavailable("no OpenCL GPU devices found".into()))?;
        let device_name = device.name().unwrap_or_else(|_| "unknown".into());

        let context = Context::builder()
            .platform(platform)
            .devices(device)
            .build()?;
        let queue = Queue::new(&context, device, None)?;
        let program = Program::builder()
            .src(source)
            .devices(device)
            .cmplr_opt(BUILD_OPTIONS)
            .build(&context)
            .map_err(|e| GscError::KernelBuild(format!("{e}")))?;

        let out_seed = Buffer::<u64>::builder()
            .queue(queue.clone())
            .flags(flags::MEM_WRITE_ONLY)
            .len(1)
            .build()?;
        let found = Buffer::<i32>::builder()
            .queue(queue.clone())
            .flags(flags::MEM_READ_WRITE)
            .len(1)
            .fill_val(0i32)
            .build()?;

        info!(device = %device_name, "OpenCL device ready");
        Ok(Self {
            device_name,
            queue,
            program,
            out_seed,
            found,
            target: None,
            kernel: None,
        })
    }

    /// Read the kernel source from `path` and build it.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, GscError> {
        let source = fs::read_to_string(path)?;
        Self::new(&source)
    }
}

impl BatchDevice for OpenClDevice {
    fn name(&self) -> &str {
        &self.device_name
    }

    fn load_target(&mut self, target: &SearchTarget) -> Result<(), GscError> {
        // zero-length buffers are invalid; an empty target never reads it
        let mut words = target.words().to_vec();
        if words.is_empty() {
            words.push(0);
        }
        let buf = Buffer::<u64>::builder()
            .queue(self.queue.clone())
            .flags(flags::MEM_READ_ONLY)
            .len(words.len())
            .copy_host_slice(&words)
            .build()?;
        let kernel = Kernel::builder()
            .program(&self.program)
            .name(KERNEL_NAME)
            .queue(self.queue.clone())
            .global_work_size(1)
            .arg(&self.out_seed)
            .arg(&buf)
            .arg(target.bit_count())
            .arg_named("start_seed", 0u64)
            .arg(&self.found)
            .build()?;
        self.target = Some(buf);
        self.kernel = Some(kernel);
        Ok(())
    }

    fn reset_found(&mut self) -> Result<(), GscError> {
        self.found.write(&[0i32][..]).enq()?;
        Ok(())
    }

    fn dispatch(&mut self, start_seed: u64, count: u64) -> Result<(), GscError> {
        let kernel = self
            .kernel
            .as_ref()
            .ok_or_else(|| GscError::Device("dispatch before load_target".into()))?;
        let work_items = usize::try_from(count)
            .map_err(|_| GscError::Config(format!("batch of {count} seeds exceeds usize")))?;
        kernel.set_arg("start_seed", start_seed)?;
        unsafe {
            kernel.cmd().global_work_size(work_items).enq()?;
        }
        self.queue.finish()?;
        Ok(())
    }

    fn read_found(&mut self) -> Result<bool, GscError> {
        let mut flag = vec![0i32];
        self.found.read(&mut flag).enq()?;
        Ok(flag[0] != 0)
    }

    fn read_seed(&mut self) -> Result<u64, GscError> {
        let mut seed = vec![0u64];
        self.out_seed.read(&mut seed).enq()?;
        Ok(seed[0])
    }
}
