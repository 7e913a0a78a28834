//! Eigenverb reverberation for underwater acoustic ray tracing.
//!
//! A wavefront propagator reports boundary collisions through
//! [`CollisionNotifier`]; [`EigenverbBistatic`] records them as eigenverbs and
//! turns them into a bistatic reverberation time series.

pub mod geom;
pub mod ocean;
pub mod sim;

// Prelude
pub use geom::point::Point;
pub use geom::vector::Vector;
pub use ocean::{Boundary, OceanEnvironment};
pub use sim::reverb::{
    Collision, CollisionNotifier, EigenverbBistatic, FrequencyGrid, RayFan, ReverbConfig,
    ReverbError, Reverberation, ReverberationModel, ReverberationTimeSeries,
};
