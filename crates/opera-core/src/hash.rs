//! Content hashing for decoded image data

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A SHA-256 hash of an image's decoded pixels and dimensions.
///
/// Two textures whose images hash equal show identical pixels, even if
/// they were decoded from different files. The editor uses this to report
/// which slots share an image after a texture has been reassigned.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Compute a hash from bytes
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash decoded pixels together with their dimensions, so a 2x8 and a
    /// 4x4 image with the same bytes do not collide
    pub fn from_pixels(width: u32, height: u32, pixels: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(width.to_le_bytes());
        hasher.update(height.to_le_bytes());
        hasher.update(pixels);
        Self(hasher.finalize().into())
    }

    /// Get the hash as a hex string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Get the hash as a prefixed hex string (e.g., "sha256:abcdef...")
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_pixels_same_hash() {
        let pixels = [255u8, 0, 0, 255];
        assert_eq!(
            ContentHash::from_pixels(1, 1, &pixels),
            ContentHash::from_pixels(1, 1, &pixels)
        );
    }

    #[test]
    fn test_dimensions_participate() {
        let pixels = [7u8; 64];
        assert_ne!(
            ContentHash::from_pixels(2, 8, &pixels),
            ContentHash::from_pixels(4, 4, &pixels)
        );
    }

    #[test]
    fn test_hex_output() {
        let h = ContentHash::from_bytes(b"hello");
        assert_eq!(h.to_hex().len(), 64);
        assert!(h.to_prefixed_hex().starts_with("sha256:"));
        assert_eq!(h.to_string().len(), 16);
    }
}
