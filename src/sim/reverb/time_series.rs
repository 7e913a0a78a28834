use super::frequency::FrequencyGrid;

/// Reverberation intensity sampled on a uniform time axis starting at zero.
///
/// Bin `i` holds the intensity arriving at `i * time_resolution`, one value
/// per frequency of the run's grid.
#[derive(Debug, Clone)]
pub struct ReverberationTimeSeries {
    /// Time resolution in seconds.
    pub time_resolution: f64,
    /// Latest time represented by the last bin (s).
    pub max_time: f64,
    frequencies: FrequencyGrid,
    /// Intensity per time bin per frequency: intensity[bin][frequency].
    intensity: Vec<Vec<f64>>,
}

impl ReverberationTimeSeries {
    /// Creates an all-zero series covering `[0, max_time]`.
    pub fn new(time_resolution: f64, max_time: f64, frequencies: FrequencyGrid) -> Self {
        let num_bins = (max_time / time_resolution).round() as usize + 1;
        let intensity = vec![vec![0.0; frequencies.len()]; num_bins];
        Self {
            time_resolution,
            max_time,
            frequencies,
            intensity,
        }
    }

    /// Bin nearest to `time`, or `None` if it lies outside `[0, max_time]`.
    pub fn bin_of(&self, time: f64) -> Option<usize> {
        if !(0.0..=self.max_time).contains(&time) {
            return None;
        }
        let bin = (time / self.time_resolution).round() as usize;
        (bin < self.intensity.len()).then_some(bin)
    }

    /// Adds per-frequency intensity at `time`.
    ///
    /// Returns `false` and drops the contribution when `time` is beyond the horizon.
    pub fn accumulate(&mut self, time: f64, values: &[f64]) -> bool {
        match self.bin_of(time) {
            Some(bin) => {
                for (acc, v) in self.intensity[bin].iter_mut().zip(values) {
                    *acc += v;
                }
                true
            }
            None => false,
        }
    }

    /// Adds another series with the same axis, bin by bin.
    pub fn merge(&mut self, other: &Self) {
        for (row, other_row) in self.intensity.iter_mut().zip(&other.intensity) {
            for (acc, v) in row.iter_mut().zip(other_row) {
                *acc += v;
            }
        }
    }

    pub fn frequencies(&self) -> &FrequencyGrid {
        &self.frequencies
    }

    /// Intensity per bin per frequency.
    pub fn intensity(&self) -> &[Vec<f64>] {
        &self.intensity
    }

    /// Number of time bins.
    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }

    /// Returns the time axis in seconds.
    pub fn time_axis(&self) -> Vec<f64> {
        (0..self.intensity.len())
            .map(|i| i as f64 * self.time_resolution)
            .collect()
    }

    /// Intensity over time at frequency index `f`.
    pub fn frequency_series(&self, f: usize) -> Vec<f64> {
        self.intensity.iter().map(|row| row[f]).collect()
    }

    /// Total intensity at frequency index `f`.
    pub fn frequency_energy(&self, f: usize) -> f64 {
        self.intensity.iter().map(|row| row[f]).sum()
    }

    /// Sum over frequencies per bin.
    pub fn broadband(&self) -> Vec<f64> {
        self.intensity.iter().map(|row| row.iter().sum()).collect()
    }

    /// Total intensity over all bins and frequencies.
    pub fn total_energy(&self) -> f64 {
        self.intensity.iter().flatten().sum()
    }

    /// Intensity in dB; empty bins map to negative infinity.
    pub fn to_db(&self) -> Vec<Vec<f64>> {
        self.intensity
            .iter()
            .map(|row| row.iter().map(|&v| 10.0 * v.log10()).collect())
            .collect()
    }
}

/// Reverberation of one run, split by boundary.
#[derive(Debug, Clone)]
pub struct Reverberation {
    pub surface: ReverberationTimeSeries,
    pub bottom: ReverberationTimeSeries,
    /// Elementwise sum of `surface` and `bottom`.
    pub total: ReverberationTimeSeries,
}

impl Reverberation {
    pub fn new(surface: ReverberationTimeSeries, bottom: ReverberationTimeSeries) -> Self {
        let mut total = surface.clone();
        total.merge(&bottom);
        Self {
            surface,
            bottom,
            total,
        }
    }
}
