//! Multi-threaded brute force over residue classes of the seed space.
//!
//! Worker `i` of `T` tests `i, i + T, i + 2T, ...`, so every seed belongs to
//! exactly one worker (`seed % T`) and the union covers the whole space.
//! Workers poll the shared found flag before every candidate and leave as
//! soon as anyone has claimed a match. Which of several simultaneous matches
//! is recorded depends on who takes the claim lock first; it is not
//! necessarily the smallest.

use std::iter::StepBy;
use std::ops::RangeInclusive;
use std::thread;

use tracing::debug;

use crate::config::{SearchConfig, DEFAULT_PROGRESS_INTERVAL};
use crate::search::{SearchContext, SearchTarget, SeedSearchBackend};
use crate::GscError;

/// Seeds assigned to `worker` out of `workers`, restricted to `[0, limit)`.
pub fn worker_seeds(
    worker: usize,
    workers: usize,
    limit: Option<u64>,
) -> StepBy<RangeInclusive<u64>> {
    let step = workers.max(1);
    let range = match limit {
        Some(0) => 1..=0,
        Some(l) => worker as u64..=l - 1,
        None => worker as u64..=u64::MAX,
    };
    range.step_by(step)
}

/// The worker responsible for `seed`.
pub fn worker_for_seed(seed: u64, workers: usize) -> usize {
    (seed % workers.max(1) as u64) as usize
}

/// CPU backend: one OS thread per residue class.
#[derive(Debug, Clone)]
pub struct ThreadedSearch {
    workers: usize,
    progress_interval: u64,
    seed_limit: Option<u64>,
}

impl ThreadedSearch {
    pub fn new(workers: usize) -> Self {
        Self {
            workers,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
            seed_limit: None,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            workers: config.workers,
            progress_interval: config.progress_interval,
            seed_limit: config.seed_limit,
        }
    }

    pub fn with_seed_limit(mut self, limit: Option<u64>) -> Self {
        self.seed_limit = limit;
        self
    }

    fn worker_loop(&self, worker: usize, target: &SearchTarget, ctx: &SearchContext) {
        let interval = self.progress_interval.max(1);
        let mut pending = 0u64;
        for seed in worker_seeds(worker, self.workers, self.seed_limit) {
            if ctx.is_claimed() {
                break;
            }
            if target.matches(seed) {
                if ctx.claim(seed) {
                    debug!(worker, seed, "claimed match");
                } else {
                    debug!(worker, seed, "match lost to another worker");
                }
                break;
            }
            pending += 1;
            if pending == interval {
                ctx.progress().advance(pending);
                pending = 0;
                debug!(worker, seed, "seed progress");
            }
        }
        ctx.progress().advance(pending);
    }
}

impl SeedSearchBackend for ThreadedSearch {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn run(&mut self, target: &SearchTarget, ctx: &SearchContext) -> Result<(), GscError> {
        if self.workers == 0 {
            return Err(GscError::Config("worker count must be at least 1".into()));
        }
        ctx.progress()
            .set_message(format!("{} bits, {} threads", target.bit_count(), self.workers));
        let this = &*self;
        thread::scope(|s| {
            for worker in 0..this.workers {
                s.spawn(move || this.worker_loop(worker, target, ctx));
            }
        });
        Ok(())
    }
}
