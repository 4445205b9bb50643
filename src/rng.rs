//! Seeded xoshiro1024++ word generator.
//!
//! The compressed artifact stores nothing but a seed, so the output of this
//! engine for a given seed is a wire format: the host implementation and
//! the OpenCL kernel in `kernels/seed_search.cl` must agree bit for bit, and
//! any change here invalidates every artifact ever written.

use crate::bits::{mask_tail, word_count};

const STATE_WORDS: usize = 16;
const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

const JUMP: [u64; STATE_WORDS] = [
    0x931197d8e3177f17,
    0xb59422e0b9138c5f,
    0xf06a6afb49d668bb,
    0xacb8a6412c8a1401,
    0x12304ec85f0b3468,
    0xb7dfe7079209891e,
    0x405b7eec77d9eb14,
    0x34ead68280c44e4a,
    0xe0e4ba3e0ac9e366,
    0x8f46eda8348905b7,
    0x328bf4dbad90d6ff,
    0xc8fd6fb31c9effc3,
    0xe899d452d4b67652,
    0x45f387286ade3205,
    0x03864f454a8920bd,
    0xa68fa28725b1b384,
];

const LONG_JUMP: [u64; STATE_WORDS] = [
    0x7374156360bbf00f,
    0x4630c2efa3b3c1f6,
    0x6654183a892786b1,
    0x94f7bfcbfb0f1661,
    0x27d8243d3d13eb2d,
    0x9701730f3dfb300f,
    0x2f293baae6f604ad,
    0xa661831cb60cd8b6,
    0x68280c77d9fe008c,
    0x50554160f5ba9459,
    0x2fc20b17ec7b2a9a,
    0x49189bbdc8ec9f8f,
    0x92a65bca41852cc1,
    0xf46820dd0509c12a,
    0x52b00c35fbf92185,
    0x1e5b3b7f589e03c1,
];

/// SplitMix64 finaliser applied to `z` without advancing it.
///
/// State word `i` is `splitmix64(seed + i * GOLDEN_GAMMA)`; seed 0 therefore
/// maps its first word to 0.
pub fn splitmix64(z: u64) -> u64 {
    let mut r = z;
    r = (r ^ (r >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    r = (r ^ (r >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    r ^ (r >> 31)
}

/// xoshiro1024++ with a 16-word state and rotation pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xoshiro1024pp {
    s: [u64; STATE_WORDS],
    p: usize,
}

impl Xoshiro1024pp {
    /// Expand a 64-bit seed into the full state.
    pub fn new(seed: u64) -> Self {
        let mut s = [0u64; STATE_WORDS];
        let mut z = seed;
        for word in s.iter_mut() {
            *word = splitmix64(z);
            z = z.wrapping_add(GOLDEN_GAMMA);
        }
        Self { s, p: 0 }
    }

    /// Advance the state and return the next output word.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let q = self.p;
        self.p = (self.p + 1) & (STATE_WORDS - 1);
        let s0 = self.s[self.p];
        let mut s15 = self.s[q];
        let result = s0.wrapping_add(s15).rotate_left(23).wrapping_add(s15);

        s15 ^= s0;
        self.s[q] = s0.rotate_left(25) ^ s15 ^ (s15 << 27);
        self.s[self.p] = s15.rotate_left(36);

        result
    }

    /// Advance by 2^512 calls to [`next_u64`](Self::next_u64).
    pub fn jump(&mut self) {
        self.apply_jump(&JUMP);
    }

    /// Advance by 2^768 calls to [`next_u64`](Self::next_u64).
    pub fn long_jump(&mut self) {
        self.apply_jump(&LONG_JUMP);
    }

    fn apply_jump(&mut self, poly: &[u64; STATE_WORDS]) {
        let mut t = [0u64; STATE_WORDS];
        for &word in poly {
            for b in 0..64 {
                if word & (1u64 << b) != 0 {
                    for (j, tj) in t.iter_mut().enumerate() {
                        *tj ^= self.s[(j + self.p) & (STATE_WORDS - 1)];
                    }
                }
                self.next_u64();
            }
        }
        for (i, ti) in t.iter().enumerate() {
            self.s[(i + self.p) & (STATE_WORDS - 1)] = *ti;
        }
    }

    /// Raw state words and rotation pointer.
    pub fn state(&self) -> (&[u64; STATE_WORDS], usize) {
        (&self.s, self.p)
    }
}

impl Iterator for Xoshiro1024pp {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.next_u64())
    }
}

/// Generate the masked bit vector for `seed`.
///
/// Draws `ceil(bit_count / 64)` words in order and clears the bits past
/// `bit_count` in the last one. This is the vector compared against the
/// packed target during search.
pub fn generate_bits(seed: u64, bit_count: u64) -> Vec<u64> {
    let mut words: Vec<u64> = Xoshiro1024pp::new(seed)
        .take(word_count(bit_count))
        .collect();
    mask_tail(&mut words, bit_count);
    words
}

/// Compare the generator output for `seed` against `target` without
/// allocating. Stops at the first differing word.
pub fn seed_matches(seed: u64, target: &[u64], bit_count: u64) -> bool {
    let n = word_count(bit_count);
    if target.len() < n {
        return false;
    }
    let tail = (bit_count % 64) as u32;
    let mut rng = Xoshiro1024pp::new(seed);
    for (i, want) in target[..n].iter().enumerate() {
        let mut got = rng.next_u64();
        if i + 1 == n && tail != 0 {
            got &= !0u64 << (64 - tail);
        }
        if got != *want {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_vectors() {
        let mut rng = Xoshiro1024pp::new(0);
        assert_eq!(rng.next_u64(), 0x1cbd8ee6d7f11054);
        assert_eq!(rng.next_u64(), 0x663ebcf2e79aae53);
        assert_eq!(rng.next_u64(), 0xe67b8d0545e54aa9);

        let words: Vec<u64> = Xoshiro1024pp::new(1).take(3).collect();
        assert_eq!(
            words,
            vec![0x5b5e9cce637ed407, 0x87851ba239ab7fa8, 0x29c6c20cffbeb33e]
        );

        let words: Vec<u64> = Xoshiro1024pp::new(42).take(3).collect();
        assert_eq!(
            words,
            vec![0xce5c191a30250eb0, 0x0c3f35aa3a5ec0d6, 0x38cc8cdad1de88dd]
        );
    }

    #[test]
    fn seed_expansion() {
        assert_eq!(splitmix64(0), 0);
        assert_eq!(splitmix64(1), 0x5692161d100b05e5);
        let rng = Xoshiro1024pp::new(0);
        let (state, p) = rng.state();
        assert_eq!(state[0], 0);
        assert_eq!(state[1], splitmix64(GOLDEN_GAMMA));
        assert_eq!(p, 0);
    }

    #[test]
    fn jumps() {
        let mut rng = Xoshiro1024pp::new(0);
        rng.jump();
        assert_eq!(rng.next_u64(), 0x588c480c5e431f8c);

        let mut rng = Xoshiro1024pp::new(0);
        rng.long_jump();
        assert_eq!(rng.next_u64(), 0x192d4b74818e64f4);
    }

    #[test]
    fn generate_bits_masks_tail() {
        assert_eq!(generate_bits(42, 8), vec![0xce00_0000_0000_0000]);
        assert_eq!(generate_bits(0, 64), vec![0x1cbd8ee6d7f11054]);
        assert_eq!(
            generate_bits(0, 72),
            vec![0x1cbd8ee6d7f11054, 0x6600_0000_0000_0000]
        );
        assert!(generate_bits(7, 0).is_empty());
    }

    #[test]
    fn matcher_agrees_with_generate_bits() {
        for seed in 0..200u64 {
            for bits in [8u64, 16, 64, 72, 130] {
                let target = generate_bits(seed, bits);
                assert!(seed_matches(seed, &target, bits));
                let next_equal = generate_bits(seed + 1, bits) == target;
                assert_eq!(seed_matches(seed + 1, &target, bits), next_equal);
            }
        }
    }

    #[test]
    fn short_target_never_matches() {
        assert!(!seed_matches(0, &[], 8));
    }
}
