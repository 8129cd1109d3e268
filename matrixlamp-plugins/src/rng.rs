//! Small deterministic PRNG (xorshift32)
//!
//! Good enough for visuals; not for anything else.

#[derive(Debug, Clone)]
pub struct Rng {
    state: u32,
}

impl Rng {
    /// Create a generator; a zero seed is replaced since xorshift would
    /// stay at zero forever
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform-ish value in `0..bound` (0 when `bound` is 0)
    pub fn below(&mut self, bound: u32) -> u32 {
        if bound == 0 {
            0
        } else {
            self.next_u32() % bound
        }
    }

    /// True with roughly `percent`% probability
    pub fn chance(&mut self, percent: u32) -> bool {
        self.below(100) < percent
    }

    /// Random panel coordinate
    pub fn cell(&mut self) -> (i16, i16) {
        let n = self.next_u32();
        ((n & 0x0F) as i16, ((n >> 4) & 0x0F) as i16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_seed_does_not_stick() {
        let mut rng = Rng::new(0);
        assert_ne!(rng.next_u32(), 0);
    }

    #[test]
    fn test_below_stays_in_range() {
        let mut rng = Rng::new(42);
        for _ in 0..1000 {
            assert!(rng.below(7) < 7);
            let (r, c) = rng.cell();
            assert!((0..16).contains(&r) && (0..16).contains(&c));
        }
        assert_eq!(rng.below(0), 0);
    }
}
