//! GBM path generation.
//!
//! Paths are stored row-major in a [`PathMatrix`]:
//! `data[path * (steps + 1) + step]`, with `step = 0` holding the initial
//! spot exactly.
//!
//! Rows are generated in batches of [`PATH_BATCH`] on the rayon pool. Batch
//! `b` draws from [`PricerRng::for_stream`]`(seed, b)` and fills its rows in
//! order, so the matrix is bit-identical for a given grid whatever the
//! thread count.

use std::time::Instant;

use pricer_core::types::PricingError;
use rayon::prelude::*;
use tracing::debug;

use super::config::{EvolutionScheme, SimulationGrid};
use crate::rng::PricerRng;

/// Paths per random stream.
pub const PATH_BATCH: usize = 512;

/// Simulated price paths, one row per trajectory.
///
/// Every entry is strictly positive and finite. Only [`simulate`] and
/// [`PathMatrix::from_rows`] construct one, and neither hands out mutable
/// access afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct PathMatrix {
    data: Vec<f64>,
    path_count: usize,
    step_count: usize,
}

impl PathMatrix {
    /// Builds a matrix from explicit rows.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if there are no rows, a row has fewer than two
    /// columns, rows differ in length or initial price, or an entry is not
    /// positive and finite.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PricingError> {
        let first = rows
            .first()
            .ok_or_else(|| PricingError::invalid("paths", "at least one path is required"))?;
        let columns = first.as_ref().len();
        let initial_price = first.as_ref().first().copied();
        if columns < 2 {
            return Err(PricingError::invalid(
                "paths",
                "each path needs an initial price and at least one step",
            ));
        }

        let mut data = Vec::with_capacity(rows.len() * columns);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(PricingError::invalid(
                    "paths",
                    format!("row {} has {} columns, expected {}", i, row.len(), columns),
                ));
            }
            if row.first().copied() != initial_price {
                return Err(PricingError::invalid(
                    "paths",
                    format!("row {} does not start at the common initial price", i),
                ));
            }
            if let Some(bad) = row.iter().find(|p| !p.is_finite() || **p <= 0.0) {
                return Err(PricingError::invalid(
                    "paths",
                    format!("row {} contains non-positive price {}", i, bad),
                ));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            data,
            path_count: rows.len(),
            step_count: columns - 1,
        })
    }

    /// Number of paths `M`.
    #[inline]
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Number of time steps `N`.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Columns per row, `N + 1`.
    #[inline]
    pub fn columns(&self) -> usize {
        self.step_count + 1
    }

    /// Row `index`, from t = 0 to maturity.
    ///
    /// # Panics
    ///
    /// If `index >= path_count()`.
    #[inline]
    pub fn path(&self, index: usize) -> &[f64] {
        let columns = self.columns();
        &self.data[index * columns..(index + 1) * columns]
    }

    /// Price of path `index` at maturity.
    #[inline]
    pub fn terminal(&self, index: usize) -> f64 {
        self.path(index)[self.step_count]
    }

    /// Iterator over rows.
    #[inline]
    pub fn paths(&self) -> std::slice::ChunksExact<'_, f64> {
        self.data.chunks_exact(self.columns())
    }

    /// Parallel iterator over rows, in row order.
    #[inline]
    pub fn par_paths(&self) -> rayon::slice::ChunksExact<'_, f64> {
        self.data.par_chunks_exact(self.columns())
    }

    /// Iterator over terminal prices.
    pub fn terminal_prices(&self) -> impl ExactSizeIterator<Item = f64> + '_ {
        let last = self.step_count;
        self.paths().map(move |row| row[last])
    }

    /// Flat row-major storage.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// Generates the path matrix described by `grid`.
///
/// # Errors
///
/// `NumericDegeneracy` if any simulated price overflows or underflows to a
/// non-positive value.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{simulate, SimulationGrid};
///
/// let grid = SimulationGrid::builder()
///     .initial_price(100.0)
///     .drift(0.05)
///     .volatility(0.2)
///     .horizon(1.0)
///     .step_count(12)
///     .path_count(1_000)
///     .seed(7)
///     .build()
///     .unwrap();
///
/// let paths = simulate(&grid).unwrap();
/// assert_eq!(paths.path_count(), 1_000);
/// assert!(paths.paths().all(|row| row[0] == 100.0));
/// assert_eq!(paths, simulate(&grid).unwrap());
/// ```
pub fn simulate(grid: &SimulationGrid) -> Result<PathMatrix, PricingError> {
    let started = Instant::now();
    let columns = grid.columns();
    let steps = grid.step_count();
    let s0 = grid.initial_price();
    let drift_dt = grid.drift_per_step();
    let vol_sqrt_dt = grid.diffusion_per_step();
    let scheme = grid.scheme();
    let seed = grid.seed();

    let mut data = vec![0.0; grid.path_count() * columns];
    data.par_chunks_mut(PATH_BATCH * columns)
        .enumerate()
        .for_each(|(batch, chunk)| {
            let mut rng = PricerRng::for_stream(seed, batch as u64);
            let mut draws = vec![0.0; steps];
            for row in chunk.chunks_exact_mut(columns) {
                rng.fill_normal(&mut draws);
                evolve(row, &draws, s0, drift_dt, vol_sqrt_dt, scheme);
            }
        });

    if let Some(index) = data.iter().position(|p| !p.is_finite() || *p <= 0.0) {
        return Err(PricingError::degenerate(format!(
            "simulated price {} on path {} step {} is not positive and finite",
            data[index],
            index / columns,
            index % columns
        )));
    }

    debug!(
        paths = grid.path_count(),
        steps,
        scheme = %scheme,
        batches = grid.path_count().div_ceil(PATH_BATCH),
        elapsed_us = started.elapsed().as_micros() as u64,
        "simulated GBM paths"
    );

    Ok(PathMatrix {
        data,
        path_count: grid.path_count(),
        step_count: steps,
    })
}

/// Generates GBM paths from a time step rather than a horizon.
///
/// Convenience over [`SimulationGrid::builder`] with the log-exact scheme.
///
/// # Errors
///
/// `InvalidParameter` for non-positive `s0`, `sigma`, `dt`, zero counts or a
/// negative dividend yield; `NumericDegeneracy` as for [`simulate`].
#[allow(clippy::too_many_arguments)]
pub fn simulate_paths(
    s0: f64,
    mu: f64,
    sigma: f64,
    dt: f64,
    step_count: usize,
    path_count: usize,
    dividend_yield: f64,
    seed: u64,
) -> Result<PathMatrix, PricingError> {
    let grid = SimulationGrid::builder()
        .initial_price(s0)
        .drift(mu)
        .volatility(sigma)
        .time_step(dt)
        .step_count(step_count)
        .path_count(path_count)
        .dividend_yield(dividend_yield)
        .seed(seed)
        .build()?;
    simulate(&grid)
}

#[inline]
fn evolve(
    row: &mut [f64],
    draws: &[f64],
    s0: f64,
    drift_dt: f64,
    vol_sqrt_dt: f64,
    scheme: EvolutionScheme,
) {
    row[0] = s0;
    match scheme {
        EvolutionScheme::LogExact => {
            let mut log_return = 0.0;
            for (price, z) in row[1..].iter_mut().zip(draws) {
                log_return += drift_dt + vol_sqrt_dt * z;
                *price = s0 * log_return.exp();
            }
        }
        EvolutionScheme::Stepwise => {
            for step in 0..draws.len() {
                row[step + 1] = row[step] * (drift_dt + vol_sqrt_dt * draws[step]).exp();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grid(paths: usize, steps: usize, seed: u64) -> SimulationGrid {
        SimulationGrid::builder()
            .initial_price(100.0)
            .drift(0.05)
            .volatility(0.2)
            .horizon(1.0)
            .step_count(steps)
            .path_count(paths)
            .seed(seed)
            .build()
            .unwrap()
    }

    #[test]
    fn test_shape_and_initial_column() {
        let paths = simulate(&grid(1_300, 10, 42)).unwrap();
        assert_eq!(paths.path_count(), 1_300);
        assert_eq!(paths.step_count(), 10);
        assert_eq!(paths.as_slice().len(), 1_300 * 11);
        for row in paths.paths() {
            assert_eq!(row[0], 100.0);
            assert!(row.iter().all(|p| *p > 0.0 && p.is_finite()));
        }
    }

    #[test]
    fn test_reproducible_with_seed() {
        let g = grid(2_000, 20, 1234);
        assert_eq!(simulate(&g).unwrap(), simulate(&g).unwrap());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = simulate(&grid(100, 5, 1)).unwrap();
        let b = simulate(&grid(100, 5, 2)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefix_rows_independent_of_path_count() {
        // Rows depend only on (seed, row index), not on the total count.
        let small = simulate(&grid(600, 8, 99)).unwrap();
        let large = simulate(&grid(1_500, 8, 99)).unwrap();
        for i in 0..small.path_count() {
            assert_eq!(small.path(i), large.path(i));
        }
    }

    #[test]
    fn test_schemes_agree() {
        let exact = grid(700, 30, 5);
        let stepwise = exact.to_builder().scheme(EvolutionScheme::Stepwise).build().unwrap();
        let a = simulate(&exact).unwrap();
        let b = simulate(&stepwise).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_relative_eq!(*x, *y, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_terminal_mean_matches_forward() {
        let g = SimulationGrid::builder()
            .initial_price(100.0)
            .drift(0.05)
            .volatility(0.2)
            .dividend_yield(0.02)
            .horizon(1.0)
            .step_count(4)
            .path_count(200_000)
            .seed(11)
            .build()
            .unwrap();
        let paths = simulate(&g).unwrap();
        let mean = paths.terminal_prices().sum::<f64>() / paths.path_count() as f64;
        // Forward 100 e^{0.03}, standard error about 0.05
        assert_relative_eq!(mean, 100.0 * 0.03_f64.exp(), epsilon = 0.25);
    }

    #[test]
    fn test_simulate_paths_uses_time_step() {
        let paths = simulate_paths(55.0, 0.06, 0.2, 1.0 / 252.0, 252, 10, 0.0, 1234).unwrap();
        assert_eq!(paths.columns(), 253);
        assert_eq!(paths.path(3)[0], 55.0);
    }

    #[test]
    fn test_simulate_paths_rejects_invalid() {
        let cases = [
            simulate_paths(100.0, 0.05, 0.0, 0.01, 10, 10, 0.0, 1),
            simulate_paths(100.0, 0.05, 0.2, 0.0, 10, 10, 0.0, 1),
            simulate_paths(100.0, 0.05, 0.2, 0.01, 0, 10, 0.0, 1),
            simulate_paths(100.0, 0.05, 0.2, 0.01, 10, 0, 0.0, 1),
        ];
        for result in cases {
            assert!(result.unwrap_err().is_invalid_parameter());
        }
    }

    #[test]
    fn test_overflow_is_degenerate() {
        let g = SimulationGrid::builder()
            .initial_price(1e300)
            .drift(500.0)
            .volatility(0.1)
            .horizon(10.0)
            .step_count(10)
            .path_count(4)
            .build()
            .unwrap();
        let err = simulate(&g).unwrap_err();
        assert!(matches!(err, PricingError::NumericDegeneracy(_)));
    }

    #[test]
    fn test_from_rows_validation() {
        let ok = PathMatrix::from_rows(&[vec![100.0, 101.0, 99.0], vec![100.0, 98.0, 97.0]]).unwrap();
        assert_eq!(ok.path_count(), 2);
        assert_eq!(ok.terminal(1), 97.0);

        let empty: [Vec<f64>; 0] = [];
        assert!(PathMatrix::from_rows(&empty).is_err());
        assert!(PathMatrix::from_rows(&[vec![100.0]]).is_err());
        assert!(PathMatrix::from_rows(&[vec![100.0, 1.0], vec![100.0]]).is_err());
        assert!(PathMatrix::from_rows(&[vec![100.0, 0.0]]).is_err());
    }

    #[test]
    fn test_from_rows_requires_common_initial_price() {
        let err = PathMatrix::from_rows(&[vec![100.0, 101.0], vec![99.0, 98.0]]).unwrap_err();
        assert_eq!(err.parameter(), Some("paths"));
        assert!(err.to_string().contains("row 1"));
    }
}
