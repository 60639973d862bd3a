//! Deterministic fingerprints for score reports.
//!
//! A report fingerprint is a `u128` derived from the report's frame records. Two
//! reports with the same frames always produce the same fingerprint, on every
//! platform and in every process, so fingerprints can be stored alongside a game
//! and compared later to detect a scorer that has drifted.
//!
//! The record is serialized with bincode using fixed-width integers and the bytes
//! are hashed with 64-bit FNV-1a. The std `DefaultHasher` is randomly seeded and
//! cannot be used here.
//!
//! ```
//! use tenpin::checksum::compute_checksum;
//!
//! let report = tenpin::generate(&[10, 10, 10]).unwrap();
//! let a = compute_checksum(&report).unwrap();
//! let b = report.checksum().unwrap();
//! assert_eq!(a, b);
//! ```

use serde::Serialize;
use std::hash::Hasher;

/// FNV-1a 64-bit offset basis.
const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV-1a 64-bit prime.
const FNV_PRIME: u64 = 0x0100_0000_01b3;

fn config() -> impl bincode::config::Config {
    bincode::config::standard().with_fixed_int_encoding()
}

/// A seedless FNV-1a hasher.
///
/// ```
/// use tenpin::checksum::FnvHasher;
/// use std::hash::Hasher;
///
/// let mut hasher = FnvHasher::new();
/// hasher.write(&[10, 10, 10]);
/// let first = hasher.finish();
///
/// let mut again = FnvHasher::new();
/// again.write(&[10, 10, 10]);
/// assert_eq!(first, again.finish());
/// ```
#[derive(Debug, Clone)]
pub struct FnvHasher {
    state: u64,
}

impl FnvHasher {
    /// Creates a hasher seeded with the FNV-1a offset basis.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }
}

impl Default for FnvHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher for FnvHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u64::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }
}

/// Computes the deterministic fingerprint of any serializable value.
///
/// [`ScoreReport::checksum`](crate::ScoreReport::checksum) is this function applied
/// to the report.
pub fn compute_checksum<T: Serialize + ?Sized>(value: &T) -> Result<u128, ChecksumError> {
    let bytes = bincode::serde::encode_to_vec(value, config())
        .map_err(|e| ChecksumError::SerializationFailed(e.to_string()))?;
    Ok(hash_bytes_fnv1a(&bytes))
}

/// Hashes raw bytes with FNV-1a and widens the result to `u128`.
#[inline]
#[must_use]
pub fn hash_bytes_fnv1a(bytes: &[u8]) -> u128 {
    let mut hasher = FnvHasher::new();
    hasher.write(bytes);
    u128::from(hasher.finish())
}

/// Errors that can occur while fingerprinting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// The value could not be encoded.
    SerializationFailed(String),
}

impl std::fmt::Display for ChecksumError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SerializationFailed(msg) => write!(f, "checksum failed: {msg}"),
        }
    }
}

impl std::error::Error for ChecksumError {}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::generate;

    #[test]
    fn empty_input_hashes_to_offset_basis() {
        assert_eq!(hash_bytes_fnv1a(&[]), u128::from(FNV_OFFSET_BASIS));
    }

    #[test]
    fn single_byte_matches_reference() {
        // (basis ^ 0x61) * prime, the published FNV-1a 64 value for "a"
        assert_eq!(hash_bytes_fnv1a(b"a"), u128::from(0xaf63_dc4c_8601_ec8c_u64));
    }

    #[test]
    fn same_report_same_checksum() {
        let rolls = [1, 4, 4, 5, 6, 4, 5, 5, 10, 0, 1];
        let a = generate(&rolls).unwrap();
        let b = generate(&rolls).unwrap();
        assert_eq!(compute_checksum(&a).unwrap(), compute_checksum(&b).unwrap());
    }

    #[test]
    fn different_reports_differ() {
        let a = generate(&[3, 4]).unwrap();
        let b = generate(&[4, 3]).unwrap();
        assert_ne!(compute_checksum(&a).unwrap(), compute_checksum(&b).unwrap());
    }

    #[test]
    fn completion_changes_checksum() {
        // Same pins, but the second report's frame is closed.
        let open = generate(&[10]).unwrap();
        let closed = generate(&[10, 0, 0]).unwrap();
        assert_ne!(open.checksum().unwrap(), closed.checksum().unwrap());
    }

    #[test]
    fn checksum_error_display() {
        let err = ChecksumError::SerializationFailed("boom".to_owned());
        assert_eq!(err.to_string(), "checksum failed: boom");
    }
}

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: hashing is a pure function of the bytes
        #[test]
        fn prop_hash_bytes_deterministic(data in any::<Vec<u8>>()) {
            prop_assert_eq!(hash_bytes_fnv1a(&data), hash_bytes_fnv1a(&data));
        }

        /// Property: the widened result never exceeds 64 bits
        #[test]
        fn prop_hash_fits_u64(data in any::<Vec<u8>>()) {
            prop_assert!(hash_bytes_fnv1a(&data) <= u128::from(u64::MAX));
        }

        /// Property: open frames with one roll fingerprint by pin count
        #[test]
        fn prop_single_roll_reports_distinct(a in 0..10i32, b in 0..10i32) {
            prop_assume!(a != b);
            let ra = crate::generate(&[a]).expect("legal roll");
            let rb = crate::generate(&[b]).expect("legal roll");
            prop_assert_ne!(ra.checksum().expect("encodes"), rb.checksum().expect("encodes"));
        }
    }
}
