//! Configuration bounds, the speed-to-delay mapping, and array supply.
//!
//! **Why**: Centralized constants and helpers used across the engine and
//! the demo binary. Out-of-range configuration is clamped here rather than
//! rejected with an error.

use std::time::Duration;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Smallest visualizable array.
pub const SIZE_MIN: usize = 5;
/// Largest visualizable array.
pub const SIZE_MAX: usize = 150;
/// Default array size for a fresh engine.
pub const SIZE_DEFAULT: usize = 40;

/// Slowest playback speed.
pub const SPEED_MIN: u32 = 1;
/// Fastest playback speed.
pub const SPEED_MAX: u32 = 150;
/// Default playback speed.
pub const SPEED_DEFAULT: u32 = 100;

/// Value range handed out by [`RandomSupplier`].
pub const VALUE_MIN: u32 = 5;
pub const VALUE_MAX: u32 = 100;

/// Clamp a requested array size into the supported range.
pub fn clamp_size(n: usize) -> usize {
    n.clamp(SIZE_MIN, SIZE_MAX)
}

/// Clamp a requested speed into the supported range.
pub fn clamp_speed(v: u32) -> u32 {
    v.clamp(SPEED_MIN, SPEED_MAX)
}

/// Inter-step delay for a playback speed: `clamp(650 - 6*speed, 10, 650)` ms.
///
/// Larger speed means shorter delay. The controller reads the speed live,
/// so a change takes effect on the very next step.
pub fn delay_from_speed(speed: u32) -> Duration {
    let ms = (650i64 - 6 * i64::from(speed)).clamp(10, 650);
    Duration::from_millis(ms as u64)
}

/// External array-supplier collaborator: produces the values to visualize.
///
/// How values are chosen is up to the implementation; the engine only
/// requires `n` positive values. Test code substitutes fixed sequences.
pub trait ArraySupplier: Send {
    fn supply(&mut self, n: usize) -> Vec<u32>;
}

/// Default supplier: uniform random values in `VALUE_MIN..=VALUE_MAX`.
pub struct RandomSupplier {
    rng: SmallRng,
}

impl RandomSupplier {
    /// Supplier seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Deterministic supplier for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSupplier {
    fn default() -> Self {
        Self::new()
    }
}

impl ArraySupplier for RandomSupplier {
    fn supply(&mut self, n: usize) -> Vec<u32> {
        (0..n)
            .map(|_| self.rng.random_range(VALUE_MIN..=VALUE_MAX))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_mapping_endpoints() {
        // speed 1 -> 644ms, speed 100 -> 50ms, speed 150 -> floor of 10ms
        assert_eq!(delay_from_speed(1), Duration::from_millis(644));
        assert_eq!(delay_from_speed(100), Duration::from_millis(50));
        assert_eq!(delay_from_speed(150), Duration::from_millis(10));
        // Out-of-range speeds still land inside [10, 650]
        assert_eq!(delay_from_speed(0), Duration::from_millis(650));
        assert_eq!(delay_from_speed(1000), Duration::from_millis(10));
    }

    #[test]
    fn test_clamps() {
        assert_eq!(clamp_size(0), SIZE_MIN);
        assert_eq!(clamp_size(40), 40);
        assert_eq!(clamp_size(10_000), SIZE_MAX);
        assert_eq!(clamp_speed(0), SPEED_MIN);
        assert_eq!(clamp_speed(151), SPEED_MAX);
    }

    #[test]
    fn test_random_supplier_bounds() {
        let mut supplier = RandomSupplier::seeded(7);
        let values = supplier.supply(200);
        assert_eq!(values.len(), 200);
        assert!(values.iter().all(|&v| (VALUE_MIN..=VALUE_MAX).contains(&v)));
    }

    #[test]
    fn test_seeded_supplier_is_reproducible() {
        let mut a = RandomSupplier::seeded(42);
        let mut b = RandomSupplier::seeded(42);
        assert_eq!(a.supply(32), b.supply(32));
    }
}
