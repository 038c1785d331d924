//! Canonical key derivation for duplicate detection.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::file::name::FileName;

/// SHA-256 digest of a marker-stripped filename, as 64 lowercase hex
/// characters.
///
/// Two filenames share a canonical key exactly when they differ only by
/// their duplicate marker: `photo.png` and `photo(2).png` map to the same
/// key. Derivation is a pure computation with no I/O. Unrelated names
/// colliding on the same digest is an accepted risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CanonicalKey(String);

impl CanonicalKey {
    /// Derive the canonical key for a parsed filename.
    ///
    /// The marker is stripped before hashing, so every version of a
    /// logical file maps to the same key.
    pub fn of(name: &FileName) -> Self {
        Self::digest(&name.without_marker().render())
    }

    /// Derive the key of the rendered name verbatim, marker included.
    ///
    /// Used when an uploaded name's own marker collides with an assigned
    /// version and the literal name has to start a family of its own.
    pub fn of_literal(name: &FileName) -> Self {
        Self::digest(&name.render())
    }

    /// View the key as its hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digest(rendered: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(rendered.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl fmt::Display for CanonicalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_sha256_of_unmarked_name() {
        let key = CanonicalKey::of(&FileName::parse("elvis.jpg"));
        assert_eq!(
            key.as_str(),
            "7eea1d40e862a143df738b00471d6f640481bdcfe4567daa27cbdf862e92d617"
        );
    }

    #[test]
    fn test_marked_and_unmarked_names_share_key() {
        let unmarked = CanonicalKey::of(&FileName::parse("photo.png"));
        let marked = CanonicalKey::of(&FileName::parse("photo(2).png"));
        assert_eq!(unmarked, marked);
        assert_eq!(
            unmarked.as_str(),
            "9c6d2a507163f05e9089c1c3ae157e3c40c1e381d5478034be40b7b71ad2d96b"
        );
    }

    #[test]
    fn test_different_names_have_different_keys() {
        let a = CanonicalKey::of(&FileName::parse("photo.png"));
        let b = CanonicalKey::of(&FileName::parse("photo.jpg"));
        assert_ne!(a, b);
    }

    #[test]
    fn test_literal_key_keeps_the_marker() {
        let name = FileName::parse("dog(2).jpg");
        let literal = CanonicalKey::of_literal(&name);
        assert_ne!(literal, CanonicalKey::of(&name));
        assert_eq!(
            literal.as_str(),
            "37ef0be53bbfb480592d1c5dc38337b8ec62378d51fcd89e88e17b2902d89c91"
        );
    }

    #[test]
    fn test_literal_key_anchors_the_nested_family() {
        // dog(2)(1).jpg is version 1 of the literal name dog(2).jpg.
        let nested = FileName::parse("dog(2)(1).jpg");
        let literal = CanonicalKey::of_literal(&FileName::parse("dog(2).jpg"));
        assert_eq!(CanonicalKey::of(&nested), literal);
    }
}
