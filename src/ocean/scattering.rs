use crate::Point;

/// Bistatic scattering strength of an ocean boundary.
pub trait ScatteringModel: Send + Sync {
    /// Linear scattering coefficient per frequency (Hz) for energy arriving at
    /// `incident_grazing` and leaving at `scattered_grazing` (both in radians).
    fn scattering(
        &self,
        position: Point,
        incident_grazing: f64,
        scattered_grazing: f64,
        frequencies: &[f64],
    ) -> Vec<f64>;
}

/// Same coefficient at every angle and frequency.
pub struct ScatteringConstant {
    pub coefficient: f64,
}

impl ScatteringConstant {
    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient: coefficient.max(0.0),
        }
    }
}

impl ScatteringModel for ScatteringConstant {
    fn scattering(
        &self,
        _position: Point,
        _incident_grazing: f64,
        _scattered_grazing: f64,
        frequencies: &[f64],
    ) -> Vec<f64> {
        vec![self.coefficient; frequencies.len()]
    }
}

/// Lambert's rule: `mu * sin(incident) * sin(scattered)`.
///
/// Commonly used for the sea floor with `mu` around -27 dB (0.002).
pub struct ScatteringLambert {
    pub mu: f64,
}

impl ScatteringLambert {
    pub fn new(mu: f64) -> Self {
        Self { mu: mu.max(0.0) }
    }

    /// Lambert parameter given in dB (e.g. -27 dB).
    pub fn from_db(mu_db: f64) -> Self {
        Self::new(10.0_f64.powf(mu_db / 10.0))
    }
}

impl ScatteringModel for ScatteringLambert {
    fn scattering(
        &self,
        _position: Point,
        incident_grazing: f64,
        scattered_grazing: f64,
        frequencies: &[f64],
    ) -> Vec<f64> {
        let value = self.mu * incident_grazing.sin().abs() * scattered_grazing.sin().abs();
        vec![value; frequencies.len()]
    }
}
