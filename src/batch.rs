//! Chunked device search.
//!
//! The host walks the seed space in fixed-size batches, strictly one after
//! another: reset the device found flag, dispatch `[start, start + chunk)`,
//! wait for completion, read the flag back. The first batch containing any
//! match ends the search. Which seed is reported when several seeds of one
//! batch match is decided by the device program, not here.
//!
//! Device buffers are set up once by [`BatchDevice::load_target`]; only the
//! start seed changes between dispatches.
//!
//! A reported seed is re-checked on the host before it is claimed: it must
//! lie inside the dispatched batch and reproduce the target with
//! [`crate::rng::Xoshiro1024pp`]. A device whose generator disagrees fails
//! with [`GscError::Device`] instead of yielding an unrestorable artifact.

use tracing::{debug, info};

use crate::config::{SearchConfig, DEFAULT_CHUNK_SIZE};
use crate::search::{SearchContext, SearchTarget, SeedSearchBackend};
use crate::GscError;

/// Execution substrate for one batch of the target predicate.
///
/// An implementation evaluates `generate_bits(start_seed + i, bit_count)`
/// against the loaded target for every `i < count` and must produce exactly
/// the same generator output as [`crate::rng::Xoshiro1024pp`].
pub trait BatchDevice {
    fn name(&self) -> &str;

    /// Upload the target once before the first dispatch.
    fn load_target(&mut self, target: &SearchTarget) -> Result<(), GscError>;

    fn reset_found(&mut self) -> Result<(), GscError>;

    /// Evaluate `[start_seed, start_seed + count)` and block until done.
    fn dispatch(&mut self, start_seed: u64, count: u64) -> Result<(), GscError>;

    fn read_found(&mut self) -> Result<bool, GscError>;

    /// Winning seed of the last dispatch. Only meaningful after
    /// [`read_found`](Self::read_found) returned true.
    fn read_seed(&mut self) -> Result<u64, GscError>;
}

impl<D: BatchDevice + ?Sized> BatchDevice for Box<D> {
    fn name(&self) -> &str {
        (**self).name()
    }
    fn load_target(&mut self, target: &SearchTarget) -> Result<(), GscError> {
        (**self).load_target(target)
    }
    fn reset_found(&mut self) -> Result<(), GscError> {
        (**self).reset_found()
    }
    fn dispatch(&mut self, start_seed: u64, count: u64) -> Result<(), GscError> {
        (**self).dispatch(start_seed, count)
    }
    fn read_found(&mut self) -> Result<bool, GscError> {
        (**self).read_found()
    }
    fn read_seed(&mut self) -> Result<u64, GscError> {
        (**self).read_seed()
    }
}

/// Backend issuing sequential batches to a [`BatchDevice`].
pub struct BatchDispatcher<D> {
    device: D,
    chunk_size: u64,
    seed_limit: Option<u64>,
}

impl<D: BatchDevice> BatchDispatcher<D> {
    pub fn new(device: D) -> Self {
        Self {
            device,
            chunk_size: DEFAULT_CHUNK_SIZE,
            seed_limit: None,
        }
    }

    pub fn from_config(device: D, config: &SearchConfig) -> Self {
        Self {
            device,
            chunk_size: config.chunk_size,
            seed_limit: config.seed_limit,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_seed_limit(mut self, limit: Option<u64>) -> Self {
        self.seed_limit = limit;
        self
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Size of the batch starting at `start`, or `None` once the bounded
    /// seed space is used up.
    fn batch_len(&self, start: u64) -> Option<u64> {
        let remaining = match self.seed_limit {
            Some(limit) if start >= limit => return None,
            Some(limit) => limit - start,
            None => (u64::MAX - start).saturating_add(1),
        };
        Some(self.chunk_size.min(remaining))
    }
}

impl<D: BatchDevice> SeedSearchBackend for BatchDispatcher<D> {
    fn name(&self) -> &'static str {
        "batch"
    }

    fn run(&mut self, target: &SearchTarget, ctx: &SearchContext) -> Result<(), GscError> {
        if self.chunk_size == 0 {
            return Err(GscError::Config("chunk size must be at least 1".into()));
        }
        info!(
            device = self.device.name(),
            chunk_size = self.chunk_size,
            "dispatching batches"
        );
        ctx.progress().set_message(format!(
            "{} bits on {}, {} seeds per batch",
            target.bit_count(),
            self.device.name(),
            self.chunk_size
        ));
        self.device.load_target(target)?;

        let mut start = 0u64;
        while let Some(count) = self.batch_len(start) {
            self.device.reset_found()?;
            self.device.dispatch(start, count)?;
            if self.device.read_found()? {
                let seed = self.device.read_seed()?;
                debug!(start, seed, "batch reported a match");
                verify_reported(target, seed, start, count)?;
                ctx.claim(seed);
                ctx.progress().advance((seed - start).saturating_add(1));
                break;
            }
            ctx.progress().advance(count);
            start = match start.checked_add(count) {
                Some(next) => next,
                None => break,
            };
            debug!(start, "seed progress");
        }
        Ok(())
    }
}

fn verify_reported(
    target: &SearchTarget,
    seed: u64,
    start: u64,
    count: u64,
) -> Result<(), GscError> {
    let last = start.saturating_add(count.saturating_sub(1));
    if seed < start || seed > last {
        return Err(GscError::Device(format!(
            "device reported seed {seed} outside dispatched batch [{start}, {last}]"
        )));
    }
    if !target.matches(seed) {
        return Err(GscError::Device(format!(
            "device reported seed {seed} but the host generator does not reproduce the input from it"
        )));
    }
    Ok(())
}
