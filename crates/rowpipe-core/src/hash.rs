//! Stable hashing helpers: set fingerprints and the deterministic sampling coin.

use blake3::Hasher;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    pub fn to_hex(&self) -> String {
        let mut s = String::with_capacity(64);
        for b in &self.0 {
            use std::fmt::Write as _;
            let _ = write!(&mut s, "{:02x}", b);
        }
        s
    }

    /// First eight bytes as a little-endian integer.
    pub fn prefix_u64(&self) -> u64 {
        let mut head = [0u8; 8];
        head.copy_from_slice(&self.0[..8]);
        u64::from_le_bytes(head)
    }
}

impl std::fmt::Display for Hash256 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

pub fn hash_bytes(bytes: &[u8]) -> Hash256 {
    let mut h = Hasher::new();
    h.update(bytes);
    Hash256(h.finalize().into())
}

/// Hash any serde-serializable value deterministically (via JSON).
pub fn hash_serde<T: Serialize>(v: &T) -> Result<Hash256, crate::error::Error> {
    let bytes = serde_json::to_vec(v)?;
    Ok(hash_bytes(&bytes))
}

/// Uniform value in `[0, 1)` derived from `(seed, position)`.
///
/// The same pair always yields the same value, which keeps sampling
/// reproducible across runs.
pub fn unit_interval(seed: u64, position: u64) -> f64 {
    let mut h = Hasher::new();
    h.update(&seed.to_le_bytes());
    h.update(&position.to_le_bytes());
    let digest = Hash256(h.finalize().into());
    // 53 high bits fill an f64 mantissa exactly.
    (digest.prefix_u64() >> 11) as f64 / (1u64 << 53) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_interval_is_deterministic_and_bounded() {
        for pos in 0..256 {
            let a = unit_interval(42, pos);
            assert_eq!(a, unit_interval(42, pos));
            assert!((0.0..1.0).contains(&a));
        }
        assert_ne!(unit_interval(1, 0), unit_interval(2, 0));
    }

    #[test]
    fn hex_is_64_chars() {
        assert_eq!(hash_bytes(b"rowpipe").to_hex().len(), 64);
    }
}
