//! State Hashing for Verification
//!
//! Provides deterministic hashing of turn state for:
//! - Integrity tags on broadcast snapshots
//! - Checking that undo restores the exact prior state

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type StateHash = [u8; 32];

/// Deterministic hasher for turn state.
///
/// Wraps SHA-256 with length-prefixed helpers so that adjacent
/// variable-length fields cannot collide. Order of updates is critical.
pub struct StateHasher {
    hasher: Sha256,
}

impl StateHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for turn state.
    pub fn for_turn_state() -> Self {
        Self::new(b"DANH_DEN_TURN_STATE_V1")
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed string.
    pub fn update_str(&mut self, value: &str) {
        self.update_u64(value.len() as u64);
        self.hasher.update(value.as_bytes());
    }

    /// Update with an optional string (tag byte, then the string if present).
    pub fn update_opt_str(&mut self, value: Option<&str>) {
        match value {
            Some(s) => {
                self.update_u8(1);
                self.update_str(s);
            }
            None => self.update_u8(0),
        }
    }

    /// Update with a count-prefixed sequence of strings.
    pub fn update_str_seq<'a>(&mut self, values: impl ExactSizeIterator<Item = &'a str>) {
        self.update_u64(values.len() as u64);
        for value in values {
            self.update_str(value);
        }
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> StateHash {
        self.hasher.finalize().into()
    }
}

/// Hex form of a hash, for logs and JSON payloads.
pub fn hash_hex(hash: &StateHash) -> String {
    hex::encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let mut h1 = StateHasher::for_turn_state();
        h1.update_u32(42);
        h1.update_str("An");

        let mut h2 = StateHasher::for_turn_state();
        h2.update_u32(42);
        h2.update_str("An");

        assert_eq!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_length_prefix_prevents_collision() {
        let mut h1 = StateHasher::for_turn_state();
        h1.update_str_seq(["ab", "c"].into_iter());

        let mut h2 = StateHasher::for_turn_state();
        h2.update_str_seq(["a", "bc"].into_iter());

        assert_ne!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_optional_tagging() {
        let mut h1 = StateHasher::for_turn_state();
        h1.update_opt_str(None);

        let mut h2 = StateHasher::for_turn_state();
        h2.update_opt_str(Some(""));

        assert_ne!(h1.finalize(), h2.finalize());
    }

    #[test]
    fn test_domain_separation() {
        let h1 = StateHasher::new(b"DOMAIN_A").finalize();
        let h2 = StateHasher::new(b"DOMAIN_B").finalize();
        assert_ne!(h1, h2);
        assert_eq!(hash_hex(&h1).len(), 64);
    }
}
