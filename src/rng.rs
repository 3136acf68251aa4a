//! Deterministic RNG used for tile shuffles.
//! A linear congruential generator with the classic 9301/49297/233280 constants.
//! Draws are `f64` in `[0, 1)` so shuffles match any implementation that divides
//! the state by the modulus in double precision.

const MULTIPLIER: u64 = 9301;
const INCREMENT: u64 = 49297;
const MODULUS: u64 = 233_280;

#[derive(Debug, Clone, Copy)]
pub struct LcgStream {
    state: u64,
}

impl LcgStream {
    pub fn with_seed(seed: u32) -> Self {
        Self { state: seed as u64 }
    }

    /// Advances the state and returns it, in `0..233280`.
    #[inline]
    pub fn next_state(&mut self) -> u32 {
        self.state = (self.state * MULTIPLIER + INCREMENT) % MODULUS;
        self.state as u32
    }

    #[inline]
    pub fn next_f64(&mut self) -> f64 {
        self.next_state() as f64 / MODULUS as f64
    }

    /// Uniform index in `0..bound`; `bound` must be non-zero.
    #[inline]
    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64).floor() as usize
    }

    /// Fisher-Yates, walking from the back.
    pub fn shuffle<T>(&mut self, data: &mut [T]) {
        for i in (1..data.len()).rev() {
            let j = self.below(i + 1);
            data.swap(i, j);
        }
    }
}

impl Iterator for LcgStream {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        Some(self.next_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_seed_is_valid() {
        let mut s = LcgStream::with_seed(0);
        assert_eq!(s.next_state(), 49297);
        assert!((s.next_f64() - 0.709_422_153_635_116_6).abs() < 1e-15);
    }

    #[test]
    fn state_never_leaves_the_modulus() {
        let mut s = LcgStream::with_seed(u32::MAX);
        for _ in 0..1000 {
            let v = s.next_f64();
            assert!((0.0..1.0).contains(&v));
        }
    }
}
