//! Streaming extrema accumulation along a single path.

/// Running maximum, minimum and terminal price of one path.
///
/// Prices are fed in time order through [`observe`](Self::observe). The
/// continuous barrier test only needs the extrema, so a path can be reduced
/// in one pass without keeping any state beyond this struct.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathObserver {
    running_max: f64,
    running_min: f64,
    terminal: f64,
    count: usize,
}

impl Default for PathObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PathObserver {
    /// Empty observer.
    #[inline]
    pub fn new() -> Self {
        Self {
            running_max: f64::NEG_INFINITY,
            running_min: f64::INFINITY,
            terminal: f64::NAN,
            count: 0,
        }
    }

    /// Observer that has seen every price of `path`.
    #[inline]
    pub fn from_path(path: &[f64]) -> Self {
        let mut observer = Self::new();
        for &price in path {
            observer.observe(price);
        }
        observer
    }

    /// Records the next price.
    #[inline]
    pub fn observe(&mut self, price: f64) {
        self.running_max = self.running_max.max(price);
        self.running_min = self.running_min.min(price);
        self.terminal = price;
        self.count += 1;
    }

    /// Largest price seen; `-inf` before any observation.
    #[inline]
    pub fn maximum(&self) -> f64 {
        self.running_max
    }

    /// Smallest price seen; `+inf` before any observation.
    #[inline]
    pub fn minimum(&self) -> f64 {
        self.running_min
    }

    /// Last price seen; NaN before any observation.
    #[inline]
    pub fn terminal(&self) -> f64 {
        self.terminal
    }

    /// Number of prices seen.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }
}
