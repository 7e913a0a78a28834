use std::ops::Deref;
use std::sync::Arc;

use super::error::{ReverbError, ReverbResult};

/// Frequencies (Hz) shared by every eigenverb of one propagation run.
///
/// Cloning only bumps a reference count, so all eigenverbs of a run point at
/// the same allocation and grid identity checks are a pointer comparison.
#[derive(Debug, Clone)]
pub struct FrequencyGrid {
    values: Arc<[f64]>,
}

impl FrequencyGrid {
    /// Creates a grid from strictly increasing, positive, finite frequencies.
    pub fn new(values: Vec<f64>) -> ReverbResult<Self> {
        if values.is_empty() {
            return Err(ReverbError::InvalidConfig(
                "frequency grid is empty".to_string(),
            ));
        }
        if values.iter().any(|f| !f.is_finite() || *f <= 0.0) {
            return Err(ReverbError::InvalidConfig(
                "frequencies must be positive and finite".to_string(),
            ));
        }
        if values.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ReverbError::InvalidConfig(
                "frequencies must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            values: values.into(),
        })
    }

    /// `n` frequencies `first, first + step, ...`.
    pub fn linear(first: f64, step: f64, n: usize) -> ReverbResult<Self> {
        Self::new((0..n).map(|i| first + step * i as f64).collect())
    }

    /// `n` frequencies `first, first * ratio, ...`.
    pub fn log(first: f64, ratio: f64, n: usize) -> ReverbResult<Self> {
        Self::new((0..n).map(|i| first * ratio.powi(i as i32)).collect())
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// True if both grids are the same allocation or hold identical values.
    pub fn same_grid(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values) || self.values[..] == other.values[..]
    }

    /// True if both grids share one allocation.
    pub fn shares_storage(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }
}

impl Deref for FrequencyGrid {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.values
    }
}
