use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 of `bytes`, the key the file report endpoint is addressed by.
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(
            sha256_hex(b"hello world"),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn deterministic_and_content_sensitive() {
        assert_eq!(sha256_hex(b"sample"), sha256_hex(b"sample"));
        assert_ne!(sha256_hex(b"sample"), sha256_hex(b"sample!"));
    }
}
