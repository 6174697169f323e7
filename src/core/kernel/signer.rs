use md5::Md5;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 digest of the UTF-8 bytes of `input`
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Lowercase hex MD5 digest of the UTF-8 bytes of `input`
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// SHA-256 over the parts joined with `separator`
pub fn sha256_joined<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    let mut hasher = Sha256::new();
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            hasher.update(separator.as_bytes());
        }
        hasher.update(part.as_ref().as_bytes());
    }
    hex::encode(hasher.finalize())
}
