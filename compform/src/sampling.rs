//! Random and noise services consumed by selection and placement.
//!
//! The engine only talks to the [`Sampler`] trait. Swapping implementations
//! changes the drawn output, never the selection guarantees.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

const NOISE_LATTICE: usize = 256;
const NOISE_OCTAVES: u32 = 4;
const NOISE_FALLOFF: f32 = 0.5;

pub trait Sampler {
    /// Uniform real in [0, 1).
    fn random(&mut self) -> f32;

    /// Uniform integer in [0, len). `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Coherent noise in [0, 1]; nearby inputs give nearby outputs.
    fn noise(&mut self, x: f32) -> f32;

    /// Uniform real in [lo, hi). Returns `lo` when the range is empty.
    /// Finite bounds give a finite result even when `hi - lo` overflows.
    fn range(&mut self, lo: f32, hi: f32) -> f32 {
        if hi <= lo {
            return lo;
        }
        let r = self.random();
        let v = lo * (1.0 - r) + hi * r;
        if v < lo {
            lo
        } else if v > hi {
            hi
        } else {
            v
        }
    }

    /// Uniform integer in [lo, hi] (inclusive). Returns `lo` when hi < lo.
    fn int_inclusive(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as usize + 1;
        lo + self.index(span) as u32
    }

    fn coin(&mut self, p: f32) -> bool {
        self.random() < p
    }

    fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let i = self.index(items.len());
        items.get(i)
    }

    /// Fisher-Yates shuffle.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1);
            items.swap(i, j);
        }
    }
}

/// 1D value noise: a seeded lattice of random values, smoothly interpolated
/// and summed over a few octaves.
#[derive(Clone, Debug)]
pub struct ValueNoise {
    lattice: Vec<f32>,
}

impl ValueNoise {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let lattice = (0..NOISE_LATTICE).map(|_| rng.random::<f32>()).collect();
        ValueNoise { lattice }
    }

    fn octave(&self, x: f32) -> f32 {
        let xf = x.floor();
        let i = xf as i64;
        let frac = x - xf;
        let s = frac * frac * (3.0 - 2.0 * frac);
        let a = self.lattice[(i.rem_euclid(NOISE_LATTICE as i64)) as usize];
        let b = self.lattice[((i + 1).rem_euclid(NOISE_LATTICE as i64)) as usize];
        a + (b - a) * s
    }

    pub fn sample(&self, x: f32) -> f32 {
        let mut sum = 0.0;
        let mut amp = 1.0;
        let mut norm = 0.0;
        let mut freq = 1.0;
        for _ in 0..NOISE_OCTAVES {
            sum += amp * self.octave(x * freq);
            norm += amp;
            amp *= NOISE_FALLOFF;
            freq *= 2.0;
        }
        if !sum.is_finite() {
            return 0.5;
        }
        (sum / norm).max(0.0).min(1.0)
    }
}

/// Default sampler: PCG32 stream plus value noise drawn from the same seed.
#[derive(Clone, Debug)]
pub struct SeededSampler {
    rng: Pcg32,
    noise: ValueNoise,
}

impl SeededSampler {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let noise = ValueNoise::new(&mut rng);
        SeededSampler { rng, noise }
    }
}

impl Sampler for SeededSampler {
    fn random(&mut self) -> f32 {
        self.rng.random::<f32>()
    }

    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.rng.random_range(0..len)
    }

    fn noise(&mut self, x: f32) -> f32 {
        self.noise.sample(x)
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        items.shuffle(&mut self.rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SeededSampler::new(42);
        let mut b = SeededSampler::new(42);
        for _ in 0..64 {
            assert_eq!(a.random().to_bits(), b.random().to_bits());
        }
        assert_eq!(a.noise(3.7).to_bits(), b.noise(3.7).to_bits());
    }

    #[test]
    fn ranges_stay_in_bounds() {
        let mut s = SeededSampler::new(7);
        for _ in 0..1_000 {
            let r = s.range(-3.0, 5.0);
            assert!((-3.0..=5.0).contains(&r));
            let k = s.int_inclusive(2, 4);
            assert!((2..=4).contains(&k));
            let x = s.random() * 100.0;
            let n = s.noise(x);
            assert!((0.0..=1.0).contains(&n));
        }
        assert_eq!(s.range(4.0, 4.0), 4.0);
        assert_eq!(s.int_inclusive(9, 3), 9);
    }

    #[test]
    fn extreme_ranges_stay_finite() {
        let mut s = SeededSampler::new(12);
        for _ in 0..1_000 {
            let r = s.range(-3.0e38, 3.0e38);
            assert!(r.is_finite());
            assert!((-3.0e38..=3.0e38).contains(&r));
            let r = s.range(f32::MIN, f32::MAX);
            assert!(r.is_finite());
        }
    }

    #[test]
    fn noise_is_coherent() {
        let s = SeededSampler::new(11);
        let mut prev = s.noise.sample(0.0);
        let mut x = 0.0f32;
        for _ in 0..500 {
            x += 0.001;
            let n = s.noise.sample(x);
            assert!((n - prev).abs() < 0.05, "jump {} -> {}", prev, n);
            prev = n;
        }
    }

    #[test]
    fn shuffle_keeps_elements() {
        let mut s = SeededSampler::new(3);
        let mut v: Vec<u32> = (0..50).collect();
        s.shuffle(&mut v);
        let mut sorted = v.clone();
        sorted.sort();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }
}
