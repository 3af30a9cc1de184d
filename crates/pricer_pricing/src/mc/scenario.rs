//! Spot-factor x tenor scenario sweeps.
//!
//! A [`ScenarioGrid`] lists spot multipliers (rows, labelled like `"90%"`)
//! and tenors (columns). [`sweep`] evaluates any cell pricer over every
//! (row, column) pair on the rayon pool and assembles a [`ScenarioTable`].
//! Cells share nothing; a failing cell is kept as an `Err` entry and the
//! rest of the sweep carries on.

use pricer_core::types::{ensure_positive, OptionType, PricingError};
use rayon::prelude::*;
use tracing::{debug, warn};

use super::config::{EvolutionScheme, SimulationGrid};
use super::pricer::{MonteCarloPricer, PricingResult};
use crate::path_dependent::BarrierSpec;

/// Row and column axes of a sweep.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::ScenarioGrid;
///
/// let grid = ScenarioGrid::new(vec![0.9, 1.0, 1.1], vec![0.5, 1.0]).unwrap();
/// assert_eq!(grid.labels(), &["90%", "100%", "110%"]);
/// assert_eq!(grid.cell_count(), 6);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ScenarioGrid {
    spot_factors: Vec<f64>,
    tenors: Vec<f64>,
    labels: Vec<String>,
}

impl ScenarioGrid {
    /// Creates a grid with percentage labels.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` for an empty list or a non-positive entry
    /// (`spot_factors`, `tenors`).
    pub fn new(spot_factors: Vec<f64>, tenors: Vec<f64>) -> Result<Self, PricingError> {
        let labels = spot_factors.iter().map(|f| percent_label(*f)).collect();
        Self::with_labels(spot_factors, tenors, labels)
    }

    /// Creates a grid with explicit row labels.
    ///
    /// # Errors
    ///
    /// As [`ScenarioGrid::new`], plus `InvalidParameter` (`labels`) when the
    /// label count differs from the spot-factor count.
    pub fn with_labels(
        spot_factors: Vec<f64>,
        tenors: Vec<f64>,
        labels: Vec<String>,
    ) -> Result<Self, PricingError> {
        validate_axis("spot_factors", &spot_factors)?;
        validate_axis("tenors", &tenors)?;
        if labels.len() != spot_factors.len() {
            return Err(PricingError::invalid(
                "labels",
                format!(
                    "{} labels for {} spot factors",
                    labels.len(),
                    spot_factors.len()
                ),
            ));
        }
        Ok(Self {
            spot_factors,
            tenors,
            labels,
        })
    }

    /// Spot multipliers, one per row.
    #[inline]
    pub fn spot_factors(&self) -> &[f64] {
        &self.spot_factors
    }

    /// Tenors in years, one per column.
    #[inline]
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }

    /// Row labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of cells.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.spot_factors.len() * self.tenors.len()
    }

    /// Cell at flat row-major `index`.
    fn point(&self, index: usize) -> ScenarioPoint {
        let row = index / self.tenors.len();
        let column = index % self.tenors.len();
        ScenarioPoint {
            row,
            column,
            spot_factor: self.spot_factors[row],
            tenor: self.tenors[column],
        }
    }
}

/// Coordinates of one sweep cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScenarioPoint {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub column: usize,
    /// Spot multiplier of the row.
    pub spot_factor: f64,
    /// Tenor of the column.
    pub tenor: f64,
}

/// Sweep results keyed by (spot-factor label, tenor).
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioTable<R> {
    labels: Vec<String>,
    tenors: Vec<f64>,
    cells: Vec<Result<R, PricingError>>,
}

impl<R> ScenarioTable<R> {
    /// Row labels.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Column tenors.
    #[inline]
    pub fn tenors(&self) -> &[f64] {
        &self.tenors
    }

    /// Number of rows.
    #[inline]
    pub fn row_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.tenors.len()
    }

    /// Cell at (`row`, `column`).
    pub fn get(&self, row: usize, column: usize) -> Option<&Result<R, PricingError>> {
        if row >= self.row_count() || column >= self.column_count() {
            return None;
        }
        self.cells.get(row * self.column_count() + column)
    }

    /// Cell by row label and column index.
    pub fn get_by_label(&self, label: &str, column: usize) -> Option<&Result<R, PricingError>> {
        let row = self.labels.iter().position(|l| l == label)?;
        self.get(row, column)
    }

    /// Rows in order, each with its label.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[Result<R, PricingError>])> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.cells.chunks(self.tenors.len().max(1)))
    }

    /// Failed cells as (row, column, error).
    pub fn failures(&self) -> Vec<(usize, usize, &PricingError)> {
        let columns = self.column_count();
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(i, cell)| cell.as_ref().err().map(|e| (i / columns, i % columns, e)))
            .collect()
    }

    /// True when every cell succeeded.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Result::is_ok)
    }

    /// Applies `f` to every successful cell.
    pub fn map<S, F: Fn(&R) -> S>(&self, f: F) -> ScenarioTable<S> {
        ScenarioTable {
            labels: self.labels.clone(),
            tenors: self.tenors.clone(),
            cells: self
                .cells
                .iter()
                .map(|cell| cell.as_ref().map(&f).map_err(Clone::clone))
                .collect(),
        }
    }
}

/// Evaluates `cell` at every point of `grid`, in parallel.
///
/// The table is assembled in row-major order regardless of scheduling.
/// Failed cells are logged at `warn` level and kept as `Err` entries.
///
/// # Examples
///
/// ```rust
/// use pricer_pricing::mc::{sweep, ScenarioGrid};
///
/// let grid = ScenarioGrid::new(vec![0.9, 1.1], vec![1.0, 2.0]).unwrap();
/// let table = sweep(&grid, |p| Ok(100.0 * p.spot_factor * p.tenor));
///
/// assert!(table.is_complete());
/// let cell = *table.get(1, 1).unwrap().as_ref().unwrap();
/// assert!((cell - 220.0).abs() < 1e-9);
/// ```
pub fn sweep<R, F>(grid: &ScenarioGrid, cell: F) -> ScenarioTable<R>
where
    R: Send,
    F: Fn(ScenarioPoint) -> Result<R, PricingError> + Sync,
{
    let cells: Vec<Result<R, PricingError>> = (0..grid.cell_count())
        .into_par_iter()
        .map(|index| cell(grid.point(index)))
        .collect();

    for (index, result) in cells.iter().enumerate() {
        if let Err(err) = result {
            let point = grid.point(index);
            warn!(
                label = %grid.labels[point.row],
                tenor = point.tenor,
                error = %err,
                "scenario cell failed"
            );
        }
    }
    debug!(cells = cells.len(), "scenario sweep complete");

    ScenarioTable {
        labels: grid.labels.clone(),
        tenors: grid.tenors.clone(),
        cells,
    }
}

/// Market and contract shared by every cell of a barrier sweep.
///
/// Each cell simulates `path_count` paths from `base_spot * spot_factor`
/// over the cell tenor with `max(1, round(steps_per_year * tenor))` steps
/// and the same seed.
#[derive(Clone, Debug, PartialEq)]
pub struct BarrierScenario {
    /// Spot before applying the row factor.
    pub base_spot: f64,
    /// Risk-free rate; drift and discounting.
    pub rate: f64,
    /// Continuous dividend yield.
    pub dividend_yield: f64,
    /// Volatility.
    pub volatility: f64,
    /// Strike.
    pub strike: f64,
    /// Call or put.
    pub option_type: OptionType,
    /// Barrier.
    pub barrier: BarrierSpec,
    /// Time steps per year of tenor.
    pub steps_per_year: usize,
    /// Paths per cell.
    pub path_count: usize,
    /// Seed shared by all cells.
    pub seed: u64,
    /// Evolution scheme.
    pub scheme: EvolutionScheme,
}

impl BarrierScenario {
    /// Step count for `tenor`.
    pub fn step_count(&self, tenor: f64) -> usize {
        let steps = (self.steps_per_year as f64 * tenor).round();
        if steps < 1.0 {
            1
        } else {
            steps as usize
        }
    }

    /// Simulation grid of one cell.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` when the cell's grid does not validate.
    pub fn cell_grid(&self, point: ScenarioPoint) -> Result<SimulationGrid, PricingError> {
        Ok(SimulationGrid::builder()
            .initial_price(self.base_spot * point.spot_factor)
            .drift(self.rate)
            .volatility(self.volatility)
            .dividend_yield(self.dividend_yield)
            .horizon(point.tenor)
            .step_count(self.step_count(point.tenor))
            .path_count(self.path_count)
            .seed(self.seed)
            .scheme(self.scheme)
            .build()?)
    }

    /// Prices one cell through the full pipeline.
    ///
    /// # Errors
    ///
    /// As [`MonteCarloPricer::price_barrier`].
    pub fn price_cell(&self, point: ScenarioPoint) -> Result<PricingResult, PricingError> {
        let grid = self.cell_grid(point)?;
        MonteCarloPricer::new(grid).price_barrier(self.option_type, self.strike, &self.barrier, self.rate)
    }
}

/// Sweeps a barrier option over `grid`, re-simulating every cell.
pub fn sweep_barrier(grid: &ScenarioGrid, scenario: &BarrierScenario) -> ScenarioTable<PricingResult> {
    sweep(grid, |point| scenario.price_cell(point))
}

/// `"90%"` for 0.9, `"102.5%"` for 1.025.
pub fn percent_label(factor: f64) -> String {
    let percent = factor * 100.0;
    if (percent - percent.round()).abs() < 1e-9 {
        format!("{:.0}%", percent.round())
    } else {
        let text = format!("{:.4}", percent);
        format!("{}%", text.trim_end_matches('0').trim_end_matches('.'))
    }
}

fn validate_axis(name: &'static str, values: &[f64]) -> Result<(), PricingError> {
    if values.is_empty() {
        return Err(PricingError::invalid(name, "must not be empty"));
    }
    for value in values {
        ensure_positive(name, *value)?;
    }
    Ok(())
}
