//! Random number generation for path simulation.
//!
//! Every simulation request owns its random source. Paths are generated in
//! fixed-size batches and each batch draws from its own stream, derived from
//! the request seed and the batch index by [`stream_seed`]. The draws a path
//! receives therefore depend only on the seed and the path's position, not
//! on how many worker threads rayon happens to use.

mod prng;

pub use prng::{stream_seed, PricerRng};
