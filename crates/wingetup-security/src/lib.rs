mod checksum;

pub use checksum::{sha256_matches, StreamingSha256};
