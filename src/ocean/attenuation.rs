use crate::Point;

/// Volume attenuation of sound in sea water.
pub trait AttenuationModel: Send + Sync {
    /// Attenuation in dB accumulated over `distance` meters, one value per frequency (Hz).
    ///
    /// `position` is where the path ends; models may use its depth.
    fn attenuation(&self, position: Point, frequencies: &[f64], distance: f64) -> Vec<f64>;
}

/// Attenuation proportional to frequency: `coefficient * f * distance` dB.
pub struct AttenuationConstant {
    /// dB per Hz per meter.
    pub coefficient: f64,
}

impl AttenuationConstant {
    pub fn new(coefficient: f64) -> Self {
        Self { coefficient }
    }

    /// No attenuation at any frequency.
    pub fn none() -> Self {
        Self { coefficient: 0.0 }
    }
}

impl AttenuationModel for AttenuationConstant {
    fn attenuation(&self, _position: Point, frequencies: &[f64], distance: f64) -> Vec<f64> {
        frequencies
            .iter()
            .map(|&f| self.coefficient * f * distance)
            .collect()
    }
}

/// Thorp's empirical sea water attenuation.
///
/// Uses the form from Jensen et al., "Computational Ocean Acoustics" (eq. 1.47):
///
/// ```text
/// alpha [dB/km] = 3.3e-3 + 0.11 f^2 / (1 + f^2) + 44 f^2 / (4100 + f^2) + 3.0e-4 f^2
/// ```
///
/// with `f` in kHz. The first term is the low-frequency floor, the next two are
/// boric acid and magnesium sulfate relaxations, the last is pure water viscosity.
pub struct AttenuationThorp;

impl AttenuationThorp {
    /// Attenuation coefficient in dB/km at `frequency` Hz.
    pub fn coefficient_db_per_km(frequency: f64) -> f64 {
        let f2 = (frequency * 1e-3).powi(2);
        3.3e-3 + 0.11 * f2 / (1.0 + f2) + 44.0 * f2 / (4100.0 + f2) + 3.0e-4 * f2
    }
}

impl AttenuationModel for AttenuationThorp {
    fn attenuation(&self, _position: Point, frequencies: &[f64], distance: f64) -> Vec<f64> {
        let km = distance * 1e-3;
        frequencies
            .iter()
            .map(|&f| Self::coefficient_db_per_km(f) * km)
            .collect()
    }
}

/// Converts a loss in dB to a linear intensity ratio.
pub fn db_to_intensity(db: f64) -> f64 {
    10.0_f64.powf(-db / 10.0)
}
