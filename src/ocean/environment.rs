use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::attenuation::{AttenuationConstant, AttenuationModel};
use super::scattering::{ScatteringConstant, ScatteringModel};
use crate::Point;

/// Ocean boundary struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Boundary {
    /// Sea surface, reached by rays travelling upward.
    Surface,
    /// Sea floor, reached by rays travelling downward.
    Bottom,
}

impl Boundary {
    pub const ALL: [Boundary; 2] = [Boundary::Surface, Boundary::Bottom];
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Boundary::Surface => write!(f, "surface"),
            Boundary::Bottom => write!(f, "bottom"),
        }
    }
}

/// Environment queries needed to turn eigenverb overlaps into reverberation.
pub struct OceanEnvironment {
    pub surface: Box<dyn ScatteringModel>,
    pub bottom: Box<dyn ScatteringModel>,
    /// Shared with the spreading model that converts travel paths into loss.
    pub attenuation: Arc<dyn AttenuationModel>,
}

impl OceanEnvironment {
    pub fn new(
        surface: Box<dyn ScatteringModel>,
        bottom: Box<dyn ScatteringModel>,
        attenuation: Arc<dyn AttenuationModel>,
    ) -> Self {
        Self {
            surface,
            bottom,
            attenuation,
        }
    }

    /// Lossless environment: unit scattering at both boundaries, no attenuation.
    pub fn unit() -> Self {
        Self::new(
            Box::new(ScatteringConstant::new(1.0)),
            Box::new(ScatteringConstant::new(1.0)),
            Arc::new(AttenuationConstant::none()),
        )
    }

    /// Scattering coefficients of `boundary` at `position`.
    pub fn scattering(
        &self,
        boundary: Boundary,
        position: Point,
        incident_grazing: f64,
        scattered_grazing: f64,
        frequencies: &[f64],
    ) -> Vec<f64> {
        let model = match boundary {
            Boundary::Surface => &self.surface,
            Boundary::Bottom => &self.bottom,
        };
        model.scattering(position, incident_grazing, scattered_grazing, frequencies)
    }
}

impl Default for OceanEnvironment {
    fn default() -> Self {
        Self::unit()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::scattering::ScatteringLambert;

    #[test]
    fn test_dispatch_by_boundary() {
        let env = OceanEnvironment::new(
            Box::new(ScatteringConstant::new(0.25)),
            Box::new(ScatteringLambert::new(1.0)),
            Arc::new(AttenuationConstant::none()),
        );
        let p = Point::new(0.0, 0.0, 0.0);
        let s = env.scattering(Boundary::Surface, p, 0.5, 0.5, &[100.0]);
        let b = env.scattering(Boundary::Bottom, p, 0.5, 0.5, &[100.0]);
        assert_eq!(s, vec![0.25]);
        assert!((b[0] - 0.5_f64.sin().powi(2)).abs() < 1e-15);
    }

    #[test]
    fn test_unit_environment() {
        let env = OceanEnvironment::unit();
        let p = Point::new(0.0, 0.0, -4000.0);
        for boundary in Boundary::ALL {
            assert_eq!(env.scattering(boundary, p, 0.1, 1.2, &[10.0, 20.0]), vec![1.0, 1.0]);
        }
        let atten = env.attenuation.attenuation(p, &[10.0, 20.0], 5000.0);
        assert_eq!(atten, vec![0.0, 0.0]);
    }
}
