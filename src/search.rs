//! Shared search state and the backend abstraction.
//!
//! A search has no built-in termination other than a match: without a
//! `seed_limit` it runs until some seed reproduces the target, which for
//! inputs longer than a few bytes means effectively forever. That is the
//! nature of the scheme and is left as is.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::artifact::Artifact;
use crate::bits::{bytes_to_bits, word_count};
use crate::config::SearchConfig;
use crate::progress::SearchProgress;
use crate::rng::seed_matches;
use crate::GscError;

/// The packed bit pattern a seed has to reproduce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTarget {
    words: Vec<u64>,
    bit_count: u64,
}

impl SearchTarget {
    pub fn from_bytes(data: &[u8]) -> Self {
        let (words, bit_count) = bytes_to_bits(data);
        Self { words, bit_count }
    }

    /// Build from already packed words. The vector is resized to exactly
    /// `ceil(bit_count / 64)` words and masked.
    pub fn from_words(mut words: Vec<u64>, bit_count: u64) -> Self {
        words.resize(word_count(bit_count), 0);
        crate::bits::mask_tail(&mut words, bit_count);
        Self { words, bit_count }
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn bit_count(&self) -> u64 {
        self.bit_count
    }

    /// Exact word-for-word test of the masked generator output.
    #[inline]
    pub fn matches(&self, seed: u64) -> bool {
        seed_matches(seed, &self.words, self.bit_count)
    }
}

/// Found flag plus winning seed, shared by reference with every worker.
///
/// The flag is only ever set inside [`claim`](Self::claim) while the slot
/// lock is held, so the flag and the seed change together and the flag goes
/// from false to true exactly once.
pub struct SearchContext {
    found: AtomicBool,
    winner: Mutex<Option<u64>>,
    progress: SearchProgress,
}

impl SearchContext {
    pub fn new(progress: SearchProgress) -> Self {
        Self {
            found: AtomicBool::new(false),
            winner: Mutex::new(None),
            progress,
        }
    }

    /// Cheap poll used by workers between candidates.
    #[inline]
    pub fn is_claimed(&self) -> bool {
        self.found.load(Ordering::Acquire)
    }

    /// Try to record `seed` as the winner. Returns true only for the first
    /// caller; later claims leave the recorded seed untouched.
    pub fn claim(&self, seed: u64) -> bool {
        let mut slot = self.winner.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(seed);
        self.found.store(true, Ordering::Release);
        true
    }

    pub fn winner(&self) -> Option<u64> {
        *self.winner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn progress(&self) -> &SearchProgress {
        &self.progress
    }
}

/// A way of evaluating the target predicate over the seed space.
pub trait SeedSearchBackend {
    fn name(&self) -> &'static str;

    /// Search until a seed is claimed in `ctx` or the configured seed space
    /// is exhausted. Returning without a claim means no seed was found.
    fn run(&mut self, target: &SearchTarget, ctx: &SearchContext) -> Result<(), GscError>;
}

/// Run `backend` against `target` and return the resulting artifact, or
/// `None` if a bounded search found nothing.
pub fn search<B: SeedSearchBackend + ?Sized>(
    backend: &mut B,
    target: &SearchTarget,
    config: &SearchConfig,
) -> Result<Option<Artifact>, GscError> {
    config.validate()?;
    let ctx = SearchContext::new(SearchProgress::new(config.show_progress));
    info!(
        backend = backend.name(),
        bit_count = target.bit_count(),
        limit = ?config.seed_limit,
        "starting seed search"
    );
    let result = backend.run(target, &ctx);
    ctx.progress().finish();
    result?;
    let artifact = ctx
        .winner()
        .map(|seed| Artifact::new(seed, target.bit_count()));
    match &artifact {
        Some(a) => info!(seed = a.seed, tested = ctx.progress().tested(), "seed found"),
        None => info!(tested = ctx.progress().tested(), "seed space exhausted"),
    }
    Ok(artifact)
}
