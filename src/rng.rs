//! Injectable Random Sources
//!
//! Randomize actions (notes, gates, random direction) draw from a
//! [`RandomSource`] owned by the sequencer instead of ambient global state, so
//! tests and hosts that need reproducible runs can seed it.
//!
//! [`Rng`] is a seedable Xorshift128+ generator. With the `std` feature,
//! [`ThreadRandom`] forwards to the `rand` crate's thread-local generator for
//! hosts that want process-wide entropy.

/// A source of uniform random numbers in `[0.0, 1.0)`.
pub trait RandomSource {
    /// Draw a uniform value in `[0.0, 1.0)`.
    fn uniform(&mut self) -> f64;

    /// Draw a boolean that is true with probability 0.5.
    fn coin(&mut self) -> bool {
        self.uniform() > 0.5
    }
}

/// A seedable random number generator using Xorshift128+.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rng {
    s0: u64,
    s1: u64,
}

impl Rng {
    /// Create a new RNG with the given state words.
    ///
    /// The seeds should not both be zero.
    #[inline]
    pub const fn new(s0: u64, s1: u64) -> Self {
        let s0 = if s0 == 0 && s1 == 0 { 1 } else { s0 };
        Self { s0, s1 }
    }

    /// Create a new RNG from a single 64-bit seed.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        let s0 = splitmix64(seed);
        let s1 = splitmix64(seed.wrapping_add(0x9e3779b97f4a7c15));
        Self::new(s0, s1)
    }

    /// Create a new RNG seeded from system time.
    pub fn from_system_time() -> Self {
        use std::time::{SystemTime, UNIX_EPOCH};

        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();

        Self::from_seed(duration.as_nanos() as u64)
    }

    /// Generate the next u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        let s0 = self.s0;
        let mut s1 = self.s1;
        let result = s0.wrapping_add(s1);

        s1 ^= s0;
        self.s0 = s0.rotate_left(24) ^ s1 ^ (s1 << 16);
        self.s1 = s1.rotate_left(37);

        result
    }

    /// Generate a random f64 in the range [0.0, 1.0).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // Upper 53 bits become the mantissa
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }
}

impl Default for Rng {
    fn default() -> Self {
        Self::from_system_time()
    }
}

impl RandomSource for Rng {
    #[inline]
    fn uniform(&mut self) -> f64 {
        self.next_f64()
    }
}

/// Splitmix64 mixing function for deriving state from seeds.
#[inline]
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

/// Process-wide random source backed by `rand::thread_rng()`.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

#[cfg(feature = "std")]
impl RandomSource for ThreadRandom {
    #[inline]
    fn uniform(&mut self) -> f64 {
        rand::random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// Useful for scripting the exact outcome of randomize actions.
#[derive(Debug, Clone, Default)]
pub struct SequenceRandom {
    values: Vec<f64>,
    position: usize,
}

impl SequenceRandom {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            position: 0,
        }
    }
}

impl RandomSource for SequenceRandom {
    fn uniform(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.position % self.values.len()];
        self.position = (self.position + 1) % self.values.len();
        value.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = Rng::from_seed(12345);
        let mut rng2 = Rng::from_seed(12345);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_rng_different_seeds() {
        let mut rng1 = Rng::from_seed(12345);
        let mut rng2 = Rng::from_seed(54321);

        assert_ne!(rng1.next_u64(), rng2.next_u64());
    }

    #[test]
    fn test_uniform_range() {
        let mut rng = Rng::from_seed(42);

        for _ in 0..1000 {
            let v = rng.uniform();
            assert!((0.0..1.0).contains(&v), "Value {} out of range", v);
        }
    }

    #[test]
    fn test_coin_distribution() {
        let mut rng = Rng::from_seed(7);
        let count = 10000;
        let heads = (0..count).filter(|_| rng.coin()).count();

        let ratio = heads as f64 / count as f64;
        assert!((ratio - 0.5).abs() < 0.03, "Ratio {} too far from 0.5", ratio);
    }

    #[test]
    fn test_zero_seed_handling() {
        let mut rng = Rng::new(0, 0);
        let v = rng.next_f64();
        assert!((0.0..1.0).contains(&v));
    }

    #[test]
    fn test_sequence_random_cycles() {
        let mut source = SequenceRandom::new(vec![0.1, 0.9]);
        assert_eq!(source.uniform(), 0.1);
        assert_eq!(source.uniform(), 0.9);
        assert_eq!(source.uniform(), 0.1);
        assert!(source.coin());
        assert!(!source.coin());
    }

    #[test]
    fn test_sequence_random_empty() {
        let mut source = SequenceRandom::default();
        assert_eq!(source.uniform(), 0.0);
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_thread_random_range() {
        let mut source = ThreadRandom;
        for _ in 0..100 {
            let v = source.uniform();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
