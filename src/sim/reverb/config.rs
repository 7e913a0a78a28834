use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::eigenverb::{DEFAULT_PATH_ID, PathId};
use super::error::{ReverbError, ReverbResult};

/// Settings of one bistatic reverberation computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverbConfig {
    /// Width of a time bin (s).
    pub time_resolution: f64,
    /// Time-series horizon (s); later two-way arrivals are dropped.
    pub max_time: f64,
    /// Overlap weights below this value count as no overlap.
    pub overlap_cutoff: f64,
    /// Path identifier of rays launched from the source.
    pub source_id: PathId,
    /// Path identifier of rays launched from the receiver.
    pub receiver_id: PathId,
    /// Prune pairs with a horizontal grid before the exact overlap test.
    pub use_spatial_index: bool,
    /// Spread the pair loop over the rayon thread pool.
    pub parallel: bool,
}

impl ReverbConfig {
    /// Upper bound on the number of time bins of one series.
    pub const MAX_TIME_BINS: usize = 1_000_000;

    pub fn new() -> Self {
        Self {
            time_resolution: 0.1,
            max_time: 30.0,
            overlap_cutoff: 1e-6,
            source_id: 1,
            receiver_id: 2,
            use_spatial_index: true,
            parallel: true,
        }
    }

    pub fn validate(&self) -> ReverbResult<()> {
        let invalid = |msg: &str| Err(ReverbError::InvalidConfig(msg.to_string()));
        if !(self.time_resolution.is_finite() && self.time_resolution > 0.0) {
            return invalid("time_resolution must be positive");
        }
        if !(self.max_time.is_finite() && self.max_time >= 0.0) {
            return invalid("max_time must be non-negative");
        }
        if (self.max_time / self.time_resolution).round() >= Self::MAX_TIME_BINS as f64 {
            return invalid("max_time / time_resolution exceeds the time bin limit");
        }
        if !(self.overlap_cutoff > 0.0 && self.overlap_cutoff < 1.0) {
            return invalid("overlap_cutoff must lie in (0, 1)");
        }
        if self.source_id == self.receiver_id {
            return invalid("source_id and receiver_id must differ");
        }
        if self.receiver_id == DEFAULT_PATH_ID {
            return invalid("receiver_id cannot be the unspecified path id");
        }
        Ok(())
    }

    /// Parses a JSON configuration; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).context("Failed to parse reverberation config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a JSON configuration file.
    pub fn read_json(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse reverberation config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid reverberation config: {}", path.display()))?;
        Ok(config)
    }
}

impl Default for ReverbConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults() {
        let config = ReverbConfig::new();
        assert!((config.time_resolution - 0.1).abs() < 1e-12);
        assert!((config.max_time - 30.0).abs() < 1e-12);
        assert!(config.validate().is_ok());
        assert_eq!(config, ReverbConfig::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ReverbConfig::from_json_str(r#"{ "max_time": 5.0, "parallel": false }"#)
            .unwrap();
        assert!((config.max_time - 5.0).abs() < 1e-12);
        assert!(!config.parallel);
        assert_eq!(config.source_id, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut config = ReverbConfig::new();
        config.time_resolution = 0.0;
        assert!(config.validate().is_err());

        let mut config = ReverbConfig::new();
        config.receiver_id = config.source_id;
        assert!(config.validate().is_err());

        let mut config = ReverbConfig::new();
        config.overlap_cutoff = 1.0;
        assert!(config.validate().is_err());

        assert!(ReverbConfig::from_json_str(r#"{ "max_time": -1.0 }"#).is_err());
    }

    #[test]
    fn test_time_bin_limit() {
        let config = ReverbConfig {
            max_time: 1e9,
            time_resolution: 1e-9,
            ..ReverbConfig::new()
        };
        assert!(matches!(config.validate(), Err(ReverbError::InvalidConfig(_))));

        let config = ReverbConfig {
            max_time: 600.0,
            time_resolution: 1e-3,
            ..ReverbConfig::new()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_read_json_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("reverb.json");
        let mut file = File::create(&path).unwrap();
        write!(file, r#"{{ "time_resolution": 0.05, "receiver_id": 7 }}"#).unwrap();

        let config = ReverbConfig::read_json(&path).unwrap();
        assert!((config.time_resolution - 0.05).abs() < 1e-12);
        assert_eq!(config.receiver_id, 7);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();
        assert!(ReverbConfig::read_json(&dir.path().join("missing.json")).is_err());
    }
}
