use crate::GscError;

/// Default batch size for device dispatches.
pub const DEFAULT_CHUNK_SIZE: u64 = 1_000_000_000;
/// Seeds a CPU worker tests between progress updates.
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Runtime parameters shared by both search strategies.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of CPU worker threads.
    pub workers: usize,
    /// Seeds per worker between progress ticks.
    pub progress_interval: u64,
    /// Only test seeds below this value. `None` searches without bound and
    /// may never return.
    pub seed_limit: Option<u64>,
    /// Seeds per device dispatch.
    pub chunk_size: u64,
    /// Draw a progress spinner on stderr.
    pub show_progress: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seed_limit: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            show_progress: false,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), GscError> {
        if self.workers == 0 {
            return Err(GscError::Config("worker count must be at least 1".into()));
        }
        if self.chunk_size == 0 {
            return Err(GscError::Config("chunk size must be at least 1".into()));
        }
        if self.progress_interval == 0 {
            return Err(GscError::Config(
                "progress interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
