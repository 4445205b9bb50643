use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            if let Ok(art) = gsc::Artifact::deserialize(data) {
                assert!(data.len() >= gsc::ARTIFACT_LEN);
                assert_eq!(&art.serialize()[..], &data[..gsc::ARTIFACT_LEN]);
                assert!(art.bit_count % 8 == 0 && art.bit_count <= gsc::MAX_BIT_COUNT);
                let restored = art.reconstruct();
                assert_eq!(restored.len() as u64, art.bit_count / 8);
            }
        });
    }
}
