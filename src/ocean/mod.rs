//! Ocean environment collaborators queried by the reverberation engine.
//!
//! These are intentionally thin: volume attenuation along a path and
//! scattering strength at the two boundaries. Sound speed and bathymetry
//! belong to the propagator and only reach this crate through collision
//! notifications.

pub mod attenuation;
pub mod environment;
pub mod scattering;

pub use attenuation::{AttenuationConstant, AttenuationModel, AttenuationThorp, db_to_intensity};
pub use environment::{Boundary, OceanEnvironment};
pub use scattering::{ScatteringConstant, ScatteringLambert, ScatteringModel};
