//! Deterministic pseudo-random numbers for layer variation.
//!
//! Every generation run owns its own `Rng`; nothing is shared between runs,
//! so batch generation can seed one instance per dial.

/// A fast, deterministic pseudo-random number generator.
///
/// Uses a Linear Congruential Generator (LCG) with the Knuth MMIX
/// parameters. The same seed always produces the same sequence of draws.
///
/// # Example
/// ```
/// use dial_etch::rng::Rng;
///
/// let mut rng = Rng::new(12345);
/// let lobes = 12 + rng.next_int(-2, 2);
/// assert!((10..=14).contains(&lobes));
/// ```
#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed.
    #[inline]
    pub fn new(seed: u64) -> Self {
        Self { state: seed.wrapping_add(1) }
    }

    /// Seed from a signed user value. Negative seeds are valid and distinct.
    #[inline]
    pub fn from_seed_i64(seed: i64) -> Self {
        Self::new(seed as u64)
    }

    /// Get the next raw u64 value.
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.state
    }

    /// Get a random f64 in the range [0, 1).
    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        // Use high bits for better distribution
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Get a random f64 in the range [lo, hi).
    ///
    /// Always consumes exactly one draw, even when `lo == hi`.
    #[inline]
    pub fn next_uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + self.next_f64() * (hi - lo)
    }

    /// Get a random integer in the inclusive range [lo, hi].
    ///
    /// Swapped bounds are reordered and the full `i64` range is accepted.
    /// Always consumes exactly one draw.
    #[inline]
    pub fn next_int(&mut self, lo: i64, hi: i64) -> i64 {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        let width = hi as i128 - lo as i128;
        let offset = (self.next_f64() * (width + 1) as f64) as i128;
        // f64 rounding can land exactly on width + 1 for huge ranges
        (lo as i128 + offset.min(width)) as i64
    }
}
