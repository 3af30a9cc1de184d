//! Seeded PRNG wrapper with derived per-batch streams.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// SplitMix64 finaliser.
#[inline]
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives the seed of stream `stream` from a request seed.
///
/// Distinct `(seed, stream)` pairs give well-separated seeds, so adjacent
/// batches never share a sequence.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::stream_seed;
///
/// assert_eq!(stream_seed(1234, 3), stream_seed(1234, 3));
/// assert_ne!(stream_seed(1234, 3), stream_seed(1234, 4));
/// ```
#[inline]
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    mix64(seed.wrapping_add(stream.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)))
}

/// Monte Carlo random number generator.
///
/// Seeded and reproducible: the same seed always yields the same sequence of
/// standard normal variates.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::rng::PricerRng;
///
/// let mut a = PricerRng::for_stream(42, 7);
/// let mut b = PricerRng::for_stream(42, 7);
///
/// let mut buffer = vec![0.0; 16];
/// a.fill_normal(&mut buffer);
/// assert_eq!(buffer[0], b.gen_normal());
/// ```
#[derive(Clone, Debug)]
pub struct PricerRng {
    inner: StdRng,
    seed: u64,
}

impl PricerRng {
    /// Creates a generator initialised with `seed`.
    #[inline]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    /// Creates the generator for batch `stream` of a request seeded with `seed`.
    #[inline]
    pub fn for_stream(seed: u64, stream: u64) -> Self {
        Self::from_seed(stream_seed(seed, stream))
    }

    /// Seed the generator was initialised with.
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Single standard normal variate (Ziggurat via `rand_distr::StandardNormal`).
    #[inline]
    pub fn gen_normal(&mut self) -> f64 {
        StandardNormal.sample(&mut self.inner)
    }

    /// Fills `buffer` with standard normal variates, in order.
    ///
    /// Zero allocation; an empty buffer is a no-op.
    #[inline]
    pub fn fill_normal(&mut self, buffer: &mut [f64]) {
        for value in buffer.iter_mut() {
            *value = StandardNormal.sample(&mut self.inner);
        }
    }
}
