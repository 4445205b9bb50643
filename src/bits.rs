//! Packing between byte sequences and MSB-first 64-bit word vectors.
//!
//! Bit `i` of a stream lives in word `i / 64` at bit position `63 - i % 64`.
//! Bytes are taken most significant bit first, so the big-endian bytes of
//! each word are exactly the original bytes in order. Bits past `bit_count`
//! inside the final word are always zero.

/// Number of 64-bit words needed to hold `bit_count` bits.
pub fn word_count(bit_count: u64) -> usize {
    bit_count.div_ceil(64) as usize
}

/// Number of bytes needed to hold `bit_count` bits.
pub fn byte_count(bit_count: u64) -> usize {
    bit_count.div_ceil(8) as usize
}

/// Zero every bit at index `>= bit_count`.
///
/// Only the word containing the boundary is partially masked; any words
/// past it are cleared as well.
pub fn mask_tail(words: &mut [u64], bit_count: u64) {
    let full = word_count(bit_count);
    let valid = (bit_count % 64) as u32;
    if valid != 0 {
        if let Some(last) = words.get_mut(full - 1) {
            *last &= !0u64 << (64 - valid);
        }
    }
    for w in words.iter_mut().skip(full) {
        *w = 0;
    }
}

/// Pack `data` into words. Returns the words and `8 * data.len()`.
pub fn bytes_to_bits(data: &[u8]) -> (Vec<u64>, u64) {
    let bit_count = data.len() as u64 * 8;
    let mut words: Vec<u64> = data
        .chunks(8)
        .map(|chunk| {
            let mut buf = [0u8; 8];
            buf[..chunk.len()].copy_from_slice(chunk);
            u64::from_be_bytes(buf)
        })
        .collect();
    mask_tail(&mut words, bit_count);
    (words, bit_count)
}

/// Unpack the first `bit_count` bits of `words` into bytes.
///
/// The output holds `ceil(bit_count / 8)` bytes; padding bits of the final
/// byte are zero. Words missing from `words` read as zero and any extra
/// words beyond `bit_count` are ignored.
pub fn bits_to_bytes(words: &[u64], bit_count: u64) -> Vec<u8> {
    let len = byte_count(bit_count);
    let mut out: Vec<u8> = (0..len)
        .map(|j| {
            let word = words.get(j / 8).copied().unwrap_or(0);
            word.to_be_bytes()[j % 8]
        })
        .collect();
    let tail = (bit_count % 8) as u32;
    if tail != 0 {
        if let Some(last) = out.last_mut() {
            *last &= 0xFFu8 << (8 - tail);
        }
    }
    out
}
