use gsc::{
    compress, decompress, generate_bits, reconstruct, Artifact, GscError, SearchConfig,
    MAX_BIT_COUNT,
};

fn bounded(limit: u64, workers: usize) -> SearchConfig {
    SearchConfig {
        workers,
        seed_limit: Some(limit),
        ..SearchConfig::default()
    }
}

#[test]
fn single_byte_0xac() {
    let art = compress(&[0xAC], &bounded(1 << 20, 4))
        .unwrap()
        .expect("0xAC is reachable below 2^20");
    assert_eq!(art.bit_count, 8);
    assert_eq!(generate_bits(art.seed, 8)[0] >> 56, 0xAC);

    let restored = decompress(&art.serialize()).unwrap();
    assert_eq!(restored, vec![0xAC]);
}

#[test]
fn two_bytes() {
    // "Hi" = 0x4869, first produced by seed 36442
    let art = compress(b"Hi", &bounded(1 << 18, 4)).unwrap().unwrap();
    assert_eq!(art.reconstruct(), b"Hi");
}

#[test]
fn single_worker_finds_the_smallest_seed() {
    let art = compress(&[0xAC], &bounded(1 << 16, 1)).unwrap().unwrap();
    assert_eq!(art.seed, 164);
}

#[test]
fn seed_42_is_stable_across_runs() {
    let bytes = Artifact::new(42, 8).serialize();
    let first = decompress(&bytes).unwrap();
    let second = decompress(&bytes).unwrap();
    assert_eq!(first, vec![0xce]);
    assert_eq!(first, second);
    assert_eq!(reconstruct(42, 8), first);
}

#[test]
fn bounded_search_can_fail() {
    assert_eq!(compress(&[0xAC], &bounded(164, 2)).unwrap(), None);
}

#[test]
fn empty_input_compresses_to_zero_bits() {
    let art = compress(&[], &bounded(1 << 10, 3)).unwrap().unwrap();
    assert_eq!(art.bit_count, 0);
    assert!(art.reconstruct().is_empty());
}

#[test]
fn random_single_bytes() {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(42);
    let cfg = bounded(1 << 16, 4);
    for _ in 0..16 {
        let byte: u8 = rng.gen();
        let art = compress(&[byte], &cfg).unwrap().unwrap();
        assert_eq!(art.reconstruct(), vec![byte]);
    }
}

#[test]
fn oversized_bit_count_fails_without_allocating() {
    let err = decompress(&Artifact::new(1, 1u64 << 40).serialize()).unwrap_err();
    assert!(matches!(err, GscError::CorruptArtifact(_)));
    let err = decompress(&Artifact::new(1, MAX_BIT_COUNT + 8).serialize()).unwrap_err();
    assert!(matches!(err, GscError::CorruptArtifact(_)));
    let err = decompress(&Artifact::new(42, 12).serialize()).unwrap_err();
    assert!(matches!(err, GscError::CorruptArtifact(_)));
}
