//! Seeded normal draws for path simulation.
//!
//! Every path owns a [`PricerRng`] derived from the run seed and the path
//! index, so a path's shocks do not depend on which thread generates it or
//! in which order paths are visited.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

/// Seeded pseudo-random generator for standard normal shocks.
///
/// # Examples
///
/// ```rust
/// use shortrate_simulation::rng::PricerRng;
///
/// let mut a = PricerRng::for_path(42, 7);
/// let mut b = PricerRng::for_path(42, 7);
/// assert_eq!(a.gen_normal(), b.gen_normal());
///
/// let mut other = PricerRng::for_path(42, 8);
/// assert_ne!(PricerRng::for_path(42, 7).gen_normal(), other.gen_normal());
/// ```
#[derive(Debug, Clone)]
pub struct PricerRng {
    inner: StdRng,
    seed: u64,
}

impl PricerRng {
    /// Generator initialised from `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Independent stream for path `path` of a run seeded with `seed`.
    #[inline]
    pub fn for_path(seed: u64, path: usize) -> Self {
        Self::from_seed(stream_seed(seed, path as u64))
    }

    /// Seed this generator was initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// One standard normal variate.
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fill `buffer` with standard normal variates.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}

/// Fresh run seed from the operating system.
pub fn entropy_seed() -> u64 {
    rand::random()
}

/// SplitMix64 finaliser over the run seed offset by the path index.
fn stream_seed(seed: u64, path: u64) -> u64 {
    let mut z = seed.wrapping_add(path.wrapping_add(1).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
