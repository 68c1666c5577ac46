//! Randomness boundary.
//!
//! The protocol never talks to an RNG directly; every draw goes through
//! [`RandomSource`], so the embedding decides where randomness comes from.
//! Production code hands in a CSPRNG, deterministic tests hand in a seeded
//! generator, and both sides see the same uniform-range interface.

use rand_core::RngCore;

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Uniform draw from `[0, upper)`.
    ///
    /// `upper` must be nonzero.
    fn random_below(&mut self, upper: u64) -> u64;

    /// Uniform draw from `[lo, hi)`.
    fn random_in(&mut self, lo: u64, hi: u64) -> u64 {
        assert!(lo < hi, "random_in: empty range [{lo}, {hi})");
        lo + self.random_below(hi - lo)
    }
}

/// Adapter exposing any [`rand_core::RngCore`] as a [`RandomSource`].
///
/// Draws 64-bit words and rejection-samples them into range, so the output
/// is exactly uniform rather than modulo-folded.
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn random_below(&mut self, upper: u64) -> u64 {
        assert!(upper > 0, "random_below: empty range");
        // reject the final partial block of [0, 2^64)
        let excess = (u64::MAX % upper).wrapping_add(1) % upper;
        let limit = u64::MAX - excess;
        loop {
            let v = self.0.next_u64();
            if v <= limit {
                return v % upper;
            }
        }
    }
}
