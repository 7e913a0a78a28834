//! Spreading models: one-way transmission loss and footprint size of a ray
//! bundle at the moment it strikes a boundary.

use std::f64::consts::PI;
use std::sync::Arc;

use super::error::{ReverbError, ReverbResult};
use super::frequency::FrequencyGrid;
use crate::Point;
use crate::ocean::attenuation::{AttenuationModel, db_to_intensity};

/// Ranges below one meter are treated as one meter to keep losses finite.
const MIN_RANGE: f64 = 1.0;

/// Lower bound for `sin(grazing)` when stretching a footprint along track.
const MIN_SIN_GRAZING: f64 = 1e-3;

/// Lower bound for `cos(launch D/E)` when sizing a footprint across track.
const MIN_COS_LAUNCH: f64 = 1e-3;

/// Local state of the ray at the collision, as seen by a spreading model.
#[derive(Debug, Clone, Copy)]
pub struct RayState {
    pub de_index: usize,
    pub az_index: usize,
    /// Travel time from the launch point to the collision (s).
    pub travel_time: f64,
    /// Grazing angle at the boundary (rad).
    pub grazing: f64,
    /// Sound speed at the collision (m/s).
    pub sound_speed: f64,
    /// Collision position.
    pub position: Point,
    /// Launch depression/elevation angle of the ray (rad).
    pub launch_de: f64,
    /// Angular width of the ray bundle in D/E (rad).
    pub de_width: f64,
    /// Angular width of the ray bundle in AZ (rad).
    pub az_width: f64,
}

impl RayState {
    /// Straight-line estimate of the path length.
    pub fn range(&self) -> f64 {
        (self.sound_speed * self.travel_time).max(MIN_RANGE)
    }
}

/// Per-frequency loss and footprint of one eigenverb.
#[derive(Debug, Clone, PartialEq)]
pub struct Spread {
    /// One-way transmission loss as a linear intensity ratio.
    pub intensity: Vec<f64>,
    /// Gaussian sigma along the ray heading (m).
    pub length: Vec<f64>,
    /// Gaussian sigma across the ray heading (m).
    pub width: Vec<f64>,
}

impl Spread {
    /// Same loss and footprint at every frequency.
    pub fn uniform(n: usize, intensity: f64, length: f64, width: f64) -> Self {
        Self {
            intensity: vec![intensity; n],
            length: vec![length; n],
            width: vec![width; n],
        }
    }

    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }

    /// Largest footprint sigma over all frequencies.
    pub fn max_sigma(&self) -> f64 {
        self.length
            .iter()
            .chain(self.width.iter())
            .copied()
            .fold(0.0, f64::max)
    }

    /// Checks that every series has one finite, non-negative value per frequency.
    pub fn validate(&self, frequencies: usize) -> ReverbResult<()> {
        for series in [&self.intensity, &self.length, &self.width] {
            if series.len() != frequencies {
                return Err(ReverbError::SpreadShape {
                    frequencies,
                    spread: series.len(),
                });
            }
            if series.iter().any(|v| !v.is_finite() || *v < 0.0) {
                return Err(ReverbError::InvalidConfig(
                    "spreading model produced negative or non-finite values".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Computes one-way loss and footprint for a ray bundle at a collision.
///
/// The compute engine only sees this trait, so divergence models can be
/// swapped without touching collision bookkeeping.
pub trait SpreadingModel: Send + Sync {
    fn compute(&self, ray: &RayState, frequencies: &FrequencyGrid) -> Spread;
}

/// Loss shared by both built-in models: spherical spreading plus attenuation.
fn one_way_intensity(
    attenuation: &dyn AttenuationModel,
    ray: &RayState,
    frequencies: &FrequencyGrid,
) -> Vec<f64> {
    let range = ray.range();
    let spherical = 1.0 / (range * range);
    attenuation
        .attenuation(ray.position, frequencies, range)
        .into_iter()
        .map(|db| spherical * db_to_intensity(db))
        .collect()
}

/// Geometric (along, across) sigmas of a diverging ray bundle.
fn geometric_sigmas(ray: &RayState) -> (f64, f64) {
    let range = ray.range();
    let length = 0.5 * range * ray.de_width / ray.grazing.sin().max(MIN_SIN_GRAZING);
    let width = 0.5 * range * ray.az_width * ray.launch_de.cos().abs().max(MIN_COS_LAUNCH);
    (length, width)
}

/// Classic ray-bundle divergence.
///
/// The footprint grows linearly with range and does not depend on frequency.
pub struct SpreadingRay {
    attenuation: Arc<dyn AttenuationModel>,
}

impl SpreadingRay {
    pub fn new(attenuation: Arc<dyn AttenuationModel>) -> Self {
        Self { attenuation }
    }
}

impl SpreadingModel for SpreadingRay {
    fn compute(&self, ray: &RayState, frequencies: &FrequencyGrid) -> Spread {
        let n = frequencies.len();
        let (length, width) = geometric_sigmas(ray);
        Spread {
            intensity: one_way_intensity(self.attenuation.as_ref(), ray, frequencies),
            length: vec![length; n],
            width: vec![width; n],
        }
    }
}

/// Ray divergence widened by a diffraction floor.
///
/// Each sigma is `sqrt(sigma_geom^2 + lambda * r / (2 pi))`, so low
/// frequencies have wider footprints than the bare ray geometry suggests.
pub struct SpreadingHybridGaussian {
    attenuation: Arc<dyn AttenuationModel>,
}

impl SpreadingHybridGaussian {
    pub fn new(attenuation: Arc<dyn AttenuationModel>) -> Self {
        Self { attenuation }
    }
}

impl SpreadingModel for SpreadingHybridGaussian {
    fn compute(&self, ray: &RayState, frequencies: &FrequencyGrid) -> Spread {
        let range = ray.range();
        let (length, width) = geometric_sigmas(ray);
        let floor: Vec<f64> = frequencies
            .iter()
            .map(|&f| ray.sound_speed / f * range / (2.0 * PI))
            .collect();
        Spread {
            intensity: one_way_intensity(self.attenuation.as_ref(), ray, frequencies),
            length: floor.iter().map(|d| (length * length + d).sqrt()).collect(),
            width: floor.iter().map(|d| (width * width + d).sqrt()).collect(),
        }
    }
}

/// Launch angle grid of the wavefront (radians).
///
/// Supplies the launch D/E of each ray and the angular width of the bundle
/// it represents.
#[derive(Debug, Clone)]
pub struct RayFan {
    de: Vec<f64>,
    az: Vec<f64>,
}

impl RayFan {
    /// `de` needs at least two angles; a single `az` angle means a full circle.
    pub fn new(de: Vec<f64>, az: Vec<f64>) -> ReverbResult<Self> {
        if de.len() < 2 || az.is_empty() {
            return Err(ReverbError::InvalidConfig(
                "ray fan needs at least two D/E angles and one AZ angle".to_string(),
            ));
        }
        for angles in [&de, &az] {
            if angles.iter().any(|a| !a.is_finite()) || angles.windows(2).any(|w| w[1] <= w[0]) {
                return Err(ReverbError::InvalidConfig(
                    "ray fan angles must be finite and strictly increasing".to_string(),
                ));
            }
        }
        Ok(Self { de, az })
    }

    /// `n` evenly spaced angles in `[first, last]`.
    pub fn uniform(first: f64, last: f64, n: usize) -> Vec<f64> {
        if n < 2 {
            return vec![first; n];
        }
        let step = (last - first) / (n - 1) as f64;
        (0..n).map(|i| first + step * i as f64).collect()
    }

    pub fn de(&self) -> &[f64] {
        &self.de
    }

    pub fn az(&self) -> &[f64] {
        &self.az
    }

    /// Ray state for the given indices, or `None` if they fall outside the fan.
    pub fn ray_state(
        &self,
        de_index: usize,
        az_index: usize,
        travel_time: f64,
        grazing: f64,
        sound_speed: f64,
        position: Point,
    ) -> Option<RayState> {
        let launch_de = *self.de.get(de_index)?;
        if az_index >= self.az.len() {
            return None;
        }
        let az_width = if self.az.len() == 1 {
            2.0 * PI
        } else {
            Self::width(&self.az, az_index)
        };
        Some(RayState {
            de_index,
            az_index,
            travel_time,
            grazing,
            sound_speed,
            position,
            launch_de,
            de_width: Self::width(&self.de, de_index),
            az_width,
        })
    }

    // Average neighbour spacing, one-sided at the ends.
    fn width(angles: &[f64], i: usize) -> f64 {
        let last = angles.len() - 1;
        match i {
            0 => angles[1] - angles[0],
            i if i == last => angles[last] - angles[last - 1],
            i => 0.5 * (angles[i + 1] - angles[i - 1]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::attenuation::{AttenuationConstant, AttenuationThorp};

    fn ray(travel_time: f64, grazing: f64) -> RayState {
        RayState {
            de_index: 0,
            az_index: 0,
            travel_time,
            grazing,
            sound_speed: 1500.0,
            position: Point::at_depth(0.0, 0.0, 100.0),
            launch_de: 0.0,
            de_width: 0.01,
            az_width: 0.02,
        }
    }

    #[test]
    fn test_spherical_loss_without_attenuation() {
        let model = SpreadingRay::new(Arc::new(AttenuationConstant::none()));
        let grid = FrequencyGrid::new(vec![100.0, 1000.0]).unwrap();
        let spread = model.compute(&ray(1.0, 0.5), &grid);
        let expected = 1.0 / (1500.0 * 1500.0);
        for i in &spread.intensity {
            assert!((i - expected).abs() < expected * 1e-12);
        }
        assert!(spread.validate(grid.len()).is_ok());
    }

    #[test]
    fn test_attenuation_reduces_high_frequencies() {
        let model = SpreadingRay::new(Arc::new(AttenuationThorp));
        let grid = FrequencyGrid::log(100.0, 10.0, 3).unwrap();
        let spread = model.compute(&ray(10.0, 0.5), &grid);
        assert!(spread.intensity[0] > spread.intensity[1]);
        assert!(spread.intensity[1] > spread.intensity[2]);
    }

    #[test]
    fn test_ray_footprint_grows_with_range_and_shallow_grazing() {
        let model = SpreadingRay::new(Arc::new(AttenuationConstant::none()));
        let grid = FrequencyGrid::new(vec![1000.0]).unwrap();
        let near = model.compute(&ray(1.0, 0.5), &grid);
        let far = model.compute(&ray(2.0, 0.5), &grid);
        let shallow = model.compute(&ray(1.0, 0.1), &grid);
        assert!((far.length[0] / near.length[0] - 2.0).abs() < 1e-12);
        assert!((far.width[0] / near.width[0] - 2.0).abs() < 1e-12);
        assert!(shallow.length[0] > near.length[0]);
        assert!((shallow.width[0] - near.width[0]).abs() < 1e-12);
    }

    #[test]
    fn test_hybrid_is_wider_at_low_frequency() {
        let attenuation: Arc<dyn AttenuationModel> = Arc::new(AttenuationConstant::none());
        let hybrid = SpreadingHybridGaussian::new(attenuation.clone());
        let classic = SpreadingRay::new(attenuation);
        let grid = FrequencyGrid::log(10.0, 10.0, 3).unwrap();
        let r = ray(1.0, 0.5);
        let h = hybrid.compute(&r, &grid);
        let c = classic.compute(&r, &grid);
        assert!(h.width[0] > h.width[1] && h.width[1] > h.width[2]);
        for f in 0..grid.len() {
            assert!(h.length[f] >= c.length[f]);
            assert!(h.width[f] >= c.width[f]);
            assert_eq!(h.intensity[f], c.intensity[f]);
        }
    }

    #[test]
    fn test_spread_validate_shape() {
        let spread = Spread::uniform(2, 1.0, 10.0, 10.0);
        assert_eq!(
            spread.validate(3),
            Err(ReverbError::SpreadShape {
                frequencies: 3,
                spread: 2
            })
        );
    }

    #[test]
    fn test_ray_fan_widths() {
        let fan = RayFan::new(vec![-0.2, -0.1, 0.0, 0.2], vec![0.0]).unwrap();
        let p = Point::new(0.0, 0.0, 0.0);
        let first = fan.ray_state(0, 0, 1.0, 0.5, 1500.0, p).unwrap();
        let inner = fan.ray_state(2, 0, 1.0, 0.5, 1500.0, p).unwrap();
        let last = fan.ray_state(3, 0, 1.0, 0.5, 1500.0, p).unwrap();
        assert!((first.de_width - 0.1).abs() < 1e-12);
        assert!((inner.de_width - 0.15).abs() < 1e-12);
        assert!((last.de_width - 0.2).abs() < 1e-12);
        assert!((first.az_width - 2.0 * PI).abs() < 1e-12);
        assert!(fan.ray_state(4, 0, 1.0, 0.5, 1500.0, p).is_none());
        assert!(fan.ray_state(0, 1, 1.0, 0.5, 1500.0, p).is_none());
    }

    #[test]
    fn test_ray_fan_rejects_unsorted() {
        assert!(RayFan::new(vec![0.1, 0.0], vec![0.0]).is_err());
        assert!(RayFan::new(vec![0.0], vec![0.0]).is_err());
        assert!(RayFan::new(vec![0.0, 0.1], vec![]).is_err());
    }
}
