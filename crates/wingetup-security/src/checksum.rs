use sha2::{Digest, Sha256};

/// Case-insensitive comparison of a computed digest against an expected
/// hex string; anything that is not 32 bytes of hex never matches.
pub fn sha256_matches(expected_hex: &str, actual_hex: &str) -> bool {
    match (hex::decode(expected_hex.trim()), hex::decode(actual_hex.trim())) {
        (Ok(expected), Ok(actual)) => expected.len() == 32 && expected == actual,
        _ => false,
    }
}

#[derive(Default)]
pub struct StreamingSha256 {
    hasher: Sha256,
}

impl StreamingSha256 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
    }

    pub fn finish_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
