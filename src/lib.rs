//! Generative seed compression.
//!
//! A file is "compressed" by brute-forcing a 64-bit seed whose xoshiro1024++
//! output, truncated to the file's bit length, reproduces the file exactly.
//! The artifact is just `(seed, bit_count)`; decompression replays the
//! generator. The seed space needed grows as `2^bit_count`, so only inputs
//! of a few bytes are practical, and an unbounded search on a longer input
//! may never finish.
//!
//! Two interchangeable search strategies implement [`SeedSearchBackend`]:
//! [`ThreadedSearch`] partitions seeds across CPU threads by residue class,
//! and [`BatchDispatcher`] walks them in fixed-size batches on a
//! [`BatchDevice`] (OpenCL with the `gpu` feature, or [`HostDevice`]).

pub mod artifact;
pub mod batch;
pub mod bits;
pub mod config;
pub mod cpu;
mod error;
pub mod gpu;
pub mod io_utils;
pub mod progress;
pub mod rng;
pub mod search;

pub use artifact::{reconstruct, Artifact, ARTIFACT_LEN, MAX_BIT_COUNT};
pub use batch::{BatchDevice, BatchDispatcher};
pub use bits::{bits_to_bytes, bytes_to_bits};
pub use config::SearchConfig;
pub use cpu::ThreadedSearch;
pub use error::GscError;
pub use gpu::HostDevice;
#[cfg(feature = "gpu")]
pub use gpu::OpenClDevice;
pub use progress::SearchProgress;
pub use rng::{generate_bits, Xoshiro1024pp};
pub use search::{search, SearchContext, SearchTarget, SeedSearchBackend};

/// Search for a seed reproducing `data` on CPU threads.
pub fn compress(data: &[u8], config: &SearchConfig) -> Result<Option<Artifact>, GscError> {
    let target = SearchTarget::from_bytes(data);
    let mut backend = ThreadedSearch::from_config(config);
    search(&mut backend, &target, config)
}

/// Search for a seed reproducing `data` with batches on `device`.
pub fn compress_batched<D: BatchDevice>(
    data: &[u8],
    device: D,
    config: &SearchConfig,
) -> Result<Option<Artifact>, GscError> {
    let target = SearchTarget::from_bytes(data);
    let mut backend = BatchDispatcher::from_config(device, config);
    search(&mut backend, &target, config)
}

/// Decode an artifact record and regenerate the original bytes.
pub fn decompress(artifact: &[u8]) -> Result<Vec<u8>, GscError> {
    Ok(Artifact::deserialize(artifact)?.reconstruct())
}
