//! Shared case counts for property-based tests.
//!
//! Scoring a full game is cheap, so the default count is generous. Under Miri
//! every case is interpreted, and the counts drop sharply.
//!
//! ```ignore
//! use tenpin::test_config::case_count;
//!
//! proptest! {
//!     #![proptest_config(ProptestConfig {
//!         cases: case_count(),
//!         ..ProptestConfig::default()
//!     })]
//!     #[test]
//!     fn scores_never_decrease(raw in proptest::collection::vec(any::<u8>(), 0..24)) {
//!         // ...
//!     }
//! }
//! ```

/// Number of cases for a property test that scores one game per case.
#[must_use]
pub const fn case_count() -> u32 {
    if cfg!(miri) {
        5
    } else {
        256
    }
}

/// Number of cases for a property test that scores every prefix of a game,
/// roughly twenty times the work of [`case_count`].
#[must_use]
pub const fn prefix_case_count() -> u32 {
    if cfg!(miri) {
        2
    } else {
        64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_properties_run_fewer_cases() {
        assert!(prefix_case_count() <= case_count());
        assert!(prefix_case_count() > 0);
    }
}
