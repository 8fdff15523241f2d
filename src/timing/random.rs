use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform randomness for delays and message choice.
pub trait RandomSource {
    /// Uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform integer in `[lo, hi]`.
    fn range_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = f64::from(hi - lo) + 1.0;
        let offset = (self.next_f64() * span).floor() as u32;
        lo + offset.min(hi - lo)
    }

    /// Uniform integer in `[lo, hi)`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let offset = (self.next_f64() * f64::from(hi - lo)).floor() as u32;
        lo + offset.min(hi - lo - 1)
    }

    /// Uniform index into a collection of `len` items.
    fn pick(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        let index = (self.next_f64() * len as f64).floor() as usize;
        Some(index.min(len - 1))
    }
}

pub struct SeededRandom {
    rng: StdRng,
}

impl SeededRandom {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    #[cfg(test)]
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl RandomSource for SeededRandom {
    fn next_f64(&mut self) -> f64 {
        self.rng.gen::<f64>()
    }
}

/// Replays a fixed sequence of samples, wrapping around at the end.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    samples: Vec<f64>,
    cursor: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples, cursor: 0 }
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_f64(&mut self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sample = self.samples[self.cursor % self.samples.len()];
        self.cursor += 1;
        sample.clamp(0.0, 1.0 - f64::EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 25_000)]
    #[case(0.5, 42_500)]
    #[case(0.999_999, 60_000)]
    fn inclusive_range_covers_both_ends(#[case] sample: f64, #[case] expected: u32) {
        let mut random = ScriptedRandom::new(vec![sample]);
        assert_eq!(random.range_inclusive(25_000, 60_000), expected);
    }

    #[rstest]
    #[case(0.0, 2_000)]
    #[case(0.5, 3_000)]
    #[case(0.999_999, 3_999)]
    fn half_open_range_excludes_upper_bound(#[case] sample: f64, #[case] expected: u32) {
        let mut random = ScriptedRandom::new(vec![sample]);
        assert_eq!(random.range(2_000, 4_000), expected);
    }

    #[test]
    fn pick_handles_empty_and_bounds() {
        let mut random = ScriptedRandom::new(vec![0.0, 0.999_999]);
        assert_eq!(random.pick(0), None);
        assert_eq!(random.pick(3), Some(0));
        assert_eq!(random.pick(3), Some(2));
    }

    #[test]
    fn seeded_random_is_reproducible() {
        let mut a = SeededRandom::from_seed(7);
        let mut b = SeededRandom::from_seed(7);
        for _ in 0..32 {
            assert_eq!(a.next_f64(), b.next_f64());
        }
    }

    #[test]
    fn seeded_samples_stay_in_unit_interval() {
        let mut random = SeededRandom::from_seed(99);
        for _ in 0..1_000 {
            let sample = random.next_f64();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn scripted_random_wraps_around() {
        let mut random = ScriptedRandom::new(vec![0.1, 0.2]);
        assert_eq!(random.next_f64(), 0.1);
        assert_eq!(random.next_f64(), 0.2);
        assert_eq!(random.next_f64(), 0.1);
    }
}
