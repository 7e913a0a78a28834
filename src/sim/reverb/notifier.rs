//! Contract between a wavefront propagator and a reverberation model.
//!
//! Boundary orientation convention: an *upper* collision is a ray travelling
//! upward that strikes the boundary above it (the sea surface); a *lower*
//! collision is a ray travelling downward that strikes the boundary below it
//! (the sea floor). Scattering coefficients are looked up with the same
//! mapping.

use super::eigenverb::{DEFAULT_PATH_ID, PathId};
use super::error::ReverbResult;
use super::frequency::FrequencyGrid;
use super::time_series::Reverberation;
use crate::{Point, Vector};

/// One ray striking a boundary.
#[derive(Debug, Clone)]
pub struct Collision {
    /// D/E angle index number.
    pub de: usize,
    /// AZ angle index number.
    pub az: usize,
    /// Offset time to impact the boundary (s).
    pub time: f64,
    /// Grazing angle at the point of impact (rad).
    pub grazing: f64,
    /// Speed of sound at the point of collision (m/s).
    pub speed: f64,
    /// Frequencies over which to compute reverberation (Hz).
    pub frequencies: FrequencyGrid,
    /// Location at which the collision occurs.
    pub position: Point,
    /// Normalized direction at the point of collision.
    pub direction: Vector,
    /// Identifies the source, receiver or volume layer path.
    pub id: PathId,
}

impl Collision {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        de: usize,
        az: usize,
        time: f64,
        grazing: f64,
        speed: f64,
        frequencies: FrequencyGrid,
        position: Point,
        direction: Vector,
    ) -> Self {
        Self {
            de,
            az,
            time,
            grazing,
            speed,
            frequencies,
            position,
            direction,
            id: DEFAULT_PATH_ID,
        }
    }

    pub fn with_id(mut self, id: PathId) -> Self {
        self.id = id;
        self
    }
}

/// Receives boundary collisions from a wavefront.
///
/// `Ok(true)` means an eigenverb was recorded, `Ok(false)` means the collision
/// was rejected and the ray simply contributes nothing for this event.
/// `Err` is fatal for the reverberation computation, never for propagation.
pub trait CollisionNotifier {
    /// A ray travelling upward struck the sea surface.
    fn notify_upper_collision(&mut self, collision: &Collision) -> ReverbResult<bool>;

    /// A ray travelling downward struck the sea floor.
    fn notify_lower_collision(&mut self, collision: &Collision) -> ReverbResult<bool>;
}

/// A collision listener that turns what it heard into reverberation.
///
/// Propagators hold `&mut dyn ReverberationModel` and never see the concrete
/// strategy.
pub trait ReverberationModel: CollisionNotifier {
    /// Signals that the wavefront has finished; no more collisions follow.
    fn propagation_complete(&mut self);

    /// Computes the reverberation time series. Valid once per run.
    fn compute_reverberation(&mut self) -> ReverbResult<&Reverberation>;
}
