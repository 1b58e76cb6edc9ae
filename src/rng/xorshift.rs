//! xorshift64* random number generator
//!
//! Fast, high-quality PRNG suitable for simulation purposes. Same seed →
//! same sequence, which is what makes whole runs replayable: every draw for
//! bank assignment, purchase choice, and labor-market ordering comes from
//! one generator owned by the simulation.

use serde::{Deserialize, Serialize};

/// Deterministic random number generator using xorshift64*
///
/// # Example
/// ```
/// use econ_simulator_core_rs::RngManager;
///
/// let mut rng = RngManager::new(12345);
/// let value = rng.next_u64();
/// let unit = rng.next_f64(); // [0.0, 1.0)
/// assert!(unit >= 0.0 && unit < 1.0);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngManager {
    /// Internal state (64-bit)
    state: u64,
}

impl RngManager {
    /// Create a new RNG with the given seed
    ///
    /// A zero seed is mapped to 1 (xorshift requires nonzero state).
    pub fn new(seed: u64) -> Self {
        let state = if seed == 0 { 1 } else { seed };
        Self { state }
    }

    /// Generate the next random u64 value
    pub fn next_u64(&mut self) -> u64 {
        // xorshift64* algorithm
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    /// Generate a random f64 in [0.0, 1.0)
    pub fn next_f64(&mut self) -> f64 {
        let value = self.next_u64();
        (value >> 11) as f64 * (1.0 / ((1u64 << 53) as f64))
    }

    /// Pick an index from a weight table
    ///
    /// Probability of index `i` is `weights[i] / sum(weights)`. Non-positive
    /// weights contribute nothing and are never picked while any positive
    /// weight exists.
    ///
    /// # Panics
    /// Panics if `weights` is empty or no weight is positive.
    ///
    /// # Example
    /// ```
    /// use econ_simulator_core_rs::RngManager;
    ///
    /// let mut rng = RngManager::new(7);
    /// let idx = rng.weighted_index(&[0.0, 3.0, 1.0]);
    /// assert!(idx == 1 || idx == 2);
    /// ```
    pub fn weighted_index(&mut self, weights: &[f64]) -> usize {
        assert!(!weights.is_empty(), "weights must not be empty");
        let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
        assert!(total > 0.0, "at least one weight must be positive");

        let mut target = self.next_f64() * total;
        let mut last_positive = 0;
        for (i, w) in weights.iter().enumerate() {
            if *w <= 0.0 {
                continue;
            }
            last_positive = i;
            if target < *w {
                return i;
            }
            target -= w;
        }
        // Floating point rounding can leave a sliver of target unconsumed.
        last_positive
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        if items.len() < 2 {
            return;
        }
        for i in (1..items.len()).rev() {
            let j = (self.next_u64() % (i as u64 + 1)) as usize;
            items.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_converted_to_nonzero() {
        let mut rng = RngManager::new(0);
        // Must still produce values rather than sticking at zero state.
        assert_ne!(rng.next_u64(), rng.next_u64());
    }

    #[test]
    fn test_deterministic_sequence() {
        let mut rng1 = RngManager::new(99999);
        let mut rng2 = RngManager::new(99999);

        for _ in 0..100 {
            assert_eq!(rng1.next_u64(), rng2.next_u64());
        }
    }

    #[test]
    fn test_next_f64_in_range() {
        let mut rng = RngManager::new(12345);
        for _ in 0..1000 {
            let val = rng.next_f64();
            assert!((0.0..1.0).contains(&val), "value {} outside [0, 1)", val);
        }
    }

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut rng = RngManager::new(42);
        for _ in 0..500 {
            let idx = rng.weighted_index(&[0.0, 1.0, 0.0, 2.0]);
            assert!(idx == 1 || idx == 3);
        }
    }

    #[test]
    #[should_panic(expected = "at least one weight must be positive")]
    fn test_weighted_index_all_zero_panics() {
        let mut rng = RngManager::new(42);
        rng.weighted_index(&[0.0, 0.0]);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = RngManager::new(7);
        let mut items: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut items);

        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<u32>>());
    }
}
