//! Seedable random source for spawn positions, velocities, hues and jitter.

/// Anything that can hand out uniform floats in `[0, 1)`.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// Uniform float in `[min, max)`.
    fn range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

/// xorshift64* PRNG. Not crypto secure; plenty for visual noise.
#[derive(Clone, Debug)]
pub struct XorShiftRng {
    state: u64,
}

impl XorShiftRng {
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed },
        }
    }

    /// Seed from the browser crypto source when the `rng` feature is on,
    /// otherwise from the supplied fallback (usually `performance.now()`).
    pub fn from_entropy(fallback: f64) -> Self {
        #[cfg(feature = "rng")]
        {
            let mut buf = [0u8; 8];
            if getrandom::getrandom(&mut buf).is_ok() {
                return Self::new(u64::from_le_bytes(buf));
            }
            log::debug!("getrandom unavailable, seeding from clock");
        }
        Self::new(fallback.to_bits())
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl RandomSource for XorShiftRng {
    fn next_f64(&mut self) -> f64 {
        // top 53 bits -> [0, 1)
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        let mut rng = XorShiftRng::new(42);
        for _ in 0..10_000 {
            let v = rng.range(330.0, 344.0);
            assert!((330.0..344.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = XorShiftRng::new(7);
        let mut b = XorShiftRng::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f64().to_bits(), b.next_f64().to_bits());
        }
    }

    #[test]
    fn zero_seed_is_not_stuck() {
        let mut rng = XorShiftRng::new(0);
        let first = rng.next_f64();
        let second = rng.next_f64();
        assert_ne!(first, second);
    }
}
