//! Barrier observation.
//!
//! Turns a [`PathMatrix`] into a [`HitVector`]: one flag per path saying
//! whether the barrier was touched. The geometric test is the same for
//! knock-in and knock-out; only the payoff stage reads the mode.
//!
//! - **Terminal**: only the maturity column is compared with the level.
//! - **Continuous**: every column is compared (path maximum for up
//!   barriers, path minimum for down barriers).
//!
//! Boundary equality counts as a hit in both policies.

use std::fmt;
use std::str::FromStr;

use pricer_core::types::{ensure_positive, BarrierDirection, BarrierMode, PricingError};
use rayon::prelude::*;

use super::observer::PathObserver;
use crate::mc::PathMatrix;

/// When the barrier is monitored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Observation {
    /// At maturity only ("European" monitoring).
    Terminal,
    /// At every simulated time step ("daily" monitoring).
    #[default]
    Continuous,
}

impl Observation {
    /// Lower-case name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Terminal => "terminal",
            Self::Continuous => "continuous",
        }
    }
}

impl fmt::Display for Observation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Observation {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminal" | "european" | "maturity" => Ok(Self::Terminal),
            "continuous" | "daily" => Ok(Self::Continuous),
            other => Err(PricingError::invalid(
                "observation",
                format!("unknown observation policy '{}'", other),
            )),
        }
    }
}

/// Barrier level, direction, mode and monitoring policy.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::{BarrierDirection, BarrierMode};
/// use pricer_pricing::path_dependent::{BarrierSpec, Observation};
///
/// let spec = BarrierSpec::new(
///     80.0,
///     BarrierDirection::Up,
///     BarrierMode::KnockOut,
///     Observation::Continuous,
/// )
/// .unwrap();
/// assert_eq!(spec.level(), 80.0);
/// assert!(BarrierSpec::new(0.0, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Continuous).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BarrierSpec {
    level: f64,
    direction: BarrierDirection,
    mode: BarrierMode,
    observation: Observation,
}

impl BarrierSpec {
    /// Creates a barrier specification.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` (`barrier_level`) unless `level` is positive and finite.
    pub fn new(
        level: f64,
        direction: BarrierDirection,
        mode: BarrierMode,
        observation: Observation,
    ) -> Result<Self, PricingError> {
        ensure_positive("barrier_level", level)?;
        Ok(Self {
            level,
            direction,
            mode,
            observation,
        })
    }

    /// Parses direction, mode and observation from their names.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` naming the malformed field, or the level.
    pub fn parse(
        level: f64,
        direction: &str,
        mode: &str,
        observation: &str,
    ) -> Result<Self, PricingError> {
        Self::new(level, direction.parse()?, mode.parse()?, observation.parse()?)
    }

    /// Barrier level.
    #[inline]
    pub fn level(&self) -> f64 {
        self.level
    }

    /// Crossing direction.
    #[inline]
    pub fn direction(&self) -> BarrierDirection {
        self.direction
    }

    /// Knock-in or knock-out.
    #[inline]
    pub fn mode(&self) -> BarrierMode {
        self.mode
    }

    /// Monitoring policy.
    #[inline]
    pub fn observation(&self) -> Observation {
        self.observation
    }

    /// Same barrier with another mode.
    #[inline]
    pub fn with_mode(self, mode: BarrierMode) -> Self {
        Self { mode, ..self }
    }

    /// Same barrier with another level.
    ///
    /// # Errors
    ///
    /// As [`BarrierSpec::new`].
    pub fn with_level(self, level: f64) -> Result<Self, PricingError> {
        Self::new(level, self.direction, self.mode, self.observation)
    }

    /// Tests a single path.
    #[inline]
    pub fn is_hit(&self, path: &[f64]) -> bool {
        is_hit(path, self.level, self.direction, self.observation)
    }
}

impl fmt::Display for BarrierSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-and-{} @ {} ({})",
            self.direction,
            match self.mode {
                BarrierMode::KnockIn => "in",
                BarrierMode::KnockOut => "out",
            },
            self.level,
            self.observation
        )
    }
}

/// Per-path barrier hit flags.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HitVector {
    hits: Vec<bool>,
}

impl HitVector {
    /// Wraps explicit flags.
    #[inline]
    pub fn from_flags(hits: Vec<bool>) -> Self {
        Self { hits }
    }

    /// Flags for `path_count` paths, none hit.
    #[inline]
    pub fn none(path_count: usize) -> Self {
        Self {
            hits: vec![false; path_count],
        }
    }

    /// Number of paths.
    #[inline]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// True when there are no paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Flag of path `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<bool> {
        self.hits.get(index).copied()
    }

    /// Flags in path order.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.hits
    }

    /// Iterator over flags.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        self.hits.iter().copied()
    }

    /// Number of hit paths.
    pub fn hit_count(&self) -> usize {
        self.hits.iter().filter(|h| **h).count()
    }

    /// Fraction of hit paths; 0 for an empty vector.
    pub fn hit_rate(&self) -> f64 {
        if self.hits.is_empty() {
            0.0
        } else {
            self.hit_count() as f64 / self.hits.len() as f64
        }
    }
}

/// Observes every path of `paths` against `spec`.
pub fn observe(paths: &PathMatrix, spec: &BarrierSpec) -> HitVector {
    observe_with(paths, spec.level, spec.direction, spec.observation)
}

/// Observes a barrier given by its parts.
///
/// # Errors
///
/// `InvalidParameter` (`barrier_level`) unless `level` is positive and finite.
///
/// # Examples
///
/// ```rust
/// use pricer_core::types::BarrierDirection;
/// use pricer_pricing::mc::PathMatrix;
/// use pricer_pricing::path_dependent::{observe_barrier, Observation};
///
/// let paths = PathMatrix::from_rows(&[
///     vec![100.0, 112.0, 104.0],
///     vec![100.0, 101.0, 110.0],
/// ])
/// .unwrap();
///
/// let daily = observe_barrier(&paths, 110.0, BarrierDirection::Up, Observation::Continuous).unwrap();
/// assert_eq!(daily.as_slice(), &[true, true]);
///
/// let european = observe_barrier(&paths, 110.0, BarrierDirection::Up, Observation::Terminal).unwrap();
/// assert_eq!(european.as_slice(), &[false, true]);
/// ```
pub fn observe_barrier(
    paths: &PathMatrix,
    level: f64,
    direction: BarrierDirection,
    observation: Observation,
) -> Result<HitVector, PricingError> {
    ensure_positive("barrier_level", level)?;
    Ok(observe_with(paths, level, direction, observation))
}

/// Index of the first column at which each path touches the barrier.
///
/// `None` for paths that never touch it. Column 0 counts, so a path starting
/// beyond the barrier reports `Some(0)`.
pub fn first_crossings(
    paths: &PathMatrix,
    level: f64,
    direction: BarrierDirection,
) -> Vec<Option<usize>> {
    paths
        .par_paths()
        .map(|path| path.iter().position(|p| direction.is_triggered(*p, level)))
        .collect()
}

fn observe_with(
    paths: &PathMatrix,
    level: f64,
    direction: BarrierDirection,
    observation: Observation,
) -> HitVector {
    let hits = paths
        .par_paths()
        .map(|path| is_hit(path, level, direction, observation))
        .collect();
    HitVector { hits }
}

#[inline]
fn is_hit(path: &[f64], level: f64, direction: BarrierDirection, observation: Observation) -> bool {
    match observation {
        Observation::Terminal => path
            .last()
            .is_some_and(|terminal| direction.is_triggered(*terminal, level)),
        Observation::Continuous => {
            let observer = PathObserver::from_path(path);
            match direction {
                BarrierDirection::Up => direction.is_triggered(observer.maximum(), level),
                BarrierDirection::Down => direction.is_triggered(observer.minimum(), level),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> PathMatrix {
        PathMatrix::from_rows(&[
            vec![100.0, 105.0, 120.0, 110.0],
            vec![100.0, 95.0, 90.0, 98.0],
            vec![100.0, 101.0, 102.0, 120.0],
            vec![100.0, 80.0, 79.0, 85.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_continuous_up() {
        let hits = observe_barrier(&paths(), 120.0, BarrierDirection::Up, Observation::Continuous).unwrap();
        assert_eq!(hits.as_slice(), &[true, false, true, false]);
        assert_eq!(hits.hit_count(), 2);
        assert_eq!(hits.hit_rate(), 0.5);
    }

    #[test]
    fn test_terminal_up() {
        let hits = observe_barrier(&paths(), 120.0, BarrierDirection::Up, Observation::Terminal).unwrap();
        assert_eq!(hits.as_slice(), &[false, false, true, false]);
    }

    #[test]
    fn test_continuous_down_inclusive() {
        let hits = observe_barrier(&paths(), 90.0, BarrierDirection::Down, Observation::Continuous).unwrap();
        assert_eq!(hits.as_slice(), &[false, true, false, true]);
    }

    #[test]
    fn test_terminal_down() {
        let hits = observe_barrier(&paths(), 90.0, BarrierDirection::Down, Observation::Terminal).unwrap();
        assert_eq!(hits.as_slice(), &[false, false, false, true]);
    }

    #[test]
    fn test_initial_column_counts_for_continuous() {
        let hits = observe_barrier(&paths(), 100.0, BarrierDirection::Up, Observation::Continuous).unwrap();
        assert!(hits.iter().all(|h| h));
    }

    #[test]
    fn test_observe_uses_spec() {
        let spec = BarrierSpec::parse(120.0, "up", "knock-out", "daily").unwrap();
        assert_eq!(observe(&paths(), &spec).as_slice(), &[true, false, true, false]);
    }

    #[test]
    fn test_invalid_level() {
        for level in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = observe_barrier(&paths(), level, BarrierDirection::Up, Observation::Terminal).unwrap_err();
            assert_eq!(err.parameter(), Some("barrier_level"));
        }
    }

    #[test]
    fn test_parse_rejects_malformed_names() {
        assert_eq!(
            BarrierSpec::parse(120.0, "sideways", "knock-out", "daily").unwrap_err().parameter(),
            Some("direction")
        );
        assert_eq!(
            BarrierSpec::parse(120.0, "up", "knock-around", "daily").unwrap_err().parameter(),
            Some("mode")
        );
        assert_eq!(
            BarrierSpec::parse(120.0, "up", "in", "weekly").unwrap_err().parameter(),
            Some("observation")
        );
    }

    #[test]
    fn test_first_crossings() {
        let crossings = first_crossings(&paths(), 105.0, BarrierDirection::Up);
        assert_eq!(crossings, vec![Some(1), None, Some(3), None]);
    }

    #[test]
    fn test_spec_display() {
        let spec = BarrierSpec::new(80.0, BarrierDirection::Up, BarrierMode::KnockOut, Observation::Continuous).unwrap();
        assert_eq!(spec.to_string(), "up-and-out @ 80 (continuous)");
    }

    #[test]
    fn test_hit_vector_empty() {
        let hits = HitVector::none(0);
        assert!(hits.is_empty());
        assert_eq!(hits.hit_rate(), 0.0);
        assert_eq!(HitVector::none(3).hit_count(), 0);
    }
}
