use honggfuzz::fuzz;

fn main() {
    loop {
        fuzz!(|data: &[u8]| {
            let (words, bits) = gsc::bytes_to_bits(data);
            assert_eq!(gsc::bits_to_bytes(&words, bits), data);
        });
    }
}
