use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::ReverbResult;
use super::frequency::FrequencyGrid;
use super::overlap::Footprint;
use super::spreading::Spread;
use crate::ocean::Boundary;
use crate::{Point, Vector};

/// Identifier a propagator attaches to a collision to name its path.
pub type PathId = i32;

/// Path identifier used when the propagator does not name the path.
///
/// Routed to [`Origin::Source`].
pub const DEFAULT_PATH_ID: PathId = 999;

/// Which end of a bistatic geometry launched the ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Origin {
    Source,
    Receiver,
}

impl Origin {
    pub const ALL: [Origin; 2] = [Origin::Source, Origin::Receiver];
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Source => write!(f, "source"),
            Origin::Receiver => write!(f, "receiver"),
        }
    }
}

/// Gaussian energy patch left by one ray bundle striking a boundary.
///
/// Immutable after construction; the frequency grid is shared with every
/// other eigenverb of the run.
#[derive(Debug, Clone)]
pub struct Eigenverb {
    origin: Origin,
    boundary: Boundary,
    origin_id: PathId,
    de_index: usize,
    az_index: usize,
    travel_time: f64,
    grazing_angle: f64,
    sound_speed: f64,
    frequencies: FrequencyGrid,
    position: Point,
    direction: Vector,
    spread: Spread,
}

impl Eigenverb {
    /// Creates an eigenverb, checking that `spread` matches the frequency grid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        origin: Origin,
        boundary: Boundary,
        origin_id: PathId,
        de_index: usize,
        az_index: usize,
        travel_time: f64,
        grazing_angle: f64,
        sound_speed: f64,
        frequencies: FrequencyGrid,
        position: Point,
        direction: Vector,
        spread: Spread,
    ) -> ReverbResult<Self> {
        spread.validate(frequencies.len())?;
        Ok(Self {
            origin,
            boundary,
            origin_id,
            de_index,
            az_index,
            travel_time,
            grazing_angle,
            sound_speed,
            frequencies,
            position,
            direction,
            spread,
        })
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    pub fn origin_id(&self) -> PathId {
        self.origin_id
    }

    pub fn de_index(&self) -> usize {
        self.de_index
    }

    pub fn az_index(&self) -> usize {
        self.az_index
    }

    /// Travel time from the launch point to the boundary (s).
    pub fn travel_time(&self) -> f64 {
        self.travel_time
    }

    /// Grazing angle at the boundary (rad).
    pub fn grazing_angle(&self) -> f64 {
        self.grazing_angle
    }

    pub fn sound_speed(&self) -> f64 {
        self.sound_speed
    }

    pub fn frequencies(&self) -> &FrequencyGrid {
        &self.frequencies
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn direction(&self) -> Vector {
        self.direction
    }

    pub fn spread(&self) -> &Spread {
        &self.spread
    }

    /// Projected footprint at frequency index `f`.
    pub fn footprint(&self, f: usize) -> Footprint {
        Footprint::new(
            self.position.x,
            self.position.y,
            self.direction.heading(),
            self.spread.length[f],
            self.spread.width[f],
        )
    }
}
