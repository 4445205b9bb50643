//! The persisted `(seed, bit_count)` record.
//!
//! Layout: `[seed: u64 LE][bit_count: u64 LE]`, 16 bytes, no header, no
//! magic, no version. Both fields are fixed-width so records are portable
//! across word sizes and byte orders.
//!
//! Artifacts are always produced from whole bytes, so a valid `bit_count` is
//! a multiple of 8 and at most [`MAX_BIT_COUNT`]. Anything else is rejected
//! on decode, before `reconstruct` could size a buffer from it.

use std::fs;
use std::path::Path;

use bytemuck::{Pod, Zeroable};

use crate::bits::bits_to_bytes;
use crate::rng::generate_bits;
use crate::GscError;

/// Size of an encoded artifact in bytes.
pub const ARTIFACT_LEN: usize = std::mem::size_of::<RawArtifact>();

/// Largest restorable payload, 1 GiB.
pub const MAX_RESTORED_BYTES: u64 = 1 << 30;

/// Largest `bit_count` accepted by [`Artifact::deserialize`].
pub const MAX_BIT_COUNT: u64 = MAX_RESTORED_BYTES * 8;

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct RawArtifact {
    seed: [u8; 8],
    bit_count: [u8; 8],
}

/// A discovered seed together with the number of bits it reproduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Artifact {
    pub seed: u64,
    pub bit_count: u64,
}

impl Artifact {
    pub fn new(seed: u64, bit_count: u64) -> Self {
        Self { seed, bit_count }
    }

    /// Encode into the fixed 16-byte record.
    pub fn serialize(&self) -> [u8; ARTIFACT_LEN] {
        let raw = RawArtifact {
            seed: self.seed.to_le_bytes(),
            bit_count: self.bit_count.to_le_bytes(),
        };
        let mut out = [0u8; ARTIFACT_LEN];
        out.copy_from_slice(bytemuck::bytes_of(&raw));
        out
    }

    /// Decode from the front of `data`. Trailing bytes are ignored.
    pub fn deserialize(data: &[u8]) -> Result<Self, GscError> {
        if data.len() < ARTIFACT_LEN {
            return Err(GscError::CorruptArtifact(format!(
                "{} bytes, expected at least {ARTIFACT_LEN}",
                data.len()
            )));
        }
        let raw: RawArtifact = bytemuck::pod_read_unaligned(&data[..ARTIFACT_LEN]);
        let bit_count = u64::from_le_bytes(raw.bit_count);
        if bit_count % 8 != 0 {
            return Err(GscError::CorruptArtifact(format!(
                "bit count {bit_count} is not a whole number of bytes"
            )));
        }
        if bit_count > MAX_BIT_COUNT {
            return Err(GscError::CorruptArtifact(format!(
                "bit count {bit_count} exceeds the {MAX_BIT_COUNT}-bit limit"
            )));
        }
        Ok(Self {
            seed: u64::from_le_bytes(raw.seed),
            bit_count,
        })
    }

    /// Regenerate the original bytes from the seed.
    pub fn reconstruct(&self) -> Vec<u8> {
        reconstruct(self.seed, self.bit_count)
    }

    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> Result<(), GscError> {
        fs::write(path, self.serialize())?;
        Ok(())
    }

    pub fn read_from<P: AsRef<Path>>(path: P) -> Result<Self, GscError> {
        let data = fs::read(path)?;
        Self::deserialize(&data)
    }
}

/// `bits_to_bytes(generate_bits(seed, bit_count), bit_count)`.
pub fn reconstruct(seed: u64, bit_count: u64) -> Vec<u8> {
    bits_to_bytes(&generate_bits(seed, bit_count), bit_count)
}
