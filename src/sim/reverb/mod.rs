//! Bistatic eigenverb reverberation.
//!
//! Rays launched from the source and from the receiver leave Gaussian energy
//! patches (eigenverbs) where they strike the surface or the bottom. Once
//! propagation ends, every source patch is overlapped with every receiver
//! patch on the same boundary and the product of their losses is binned at
//! the pair's two-way travel time.

pub mod bistatic;
pub mod collection;
pub mod config;
pub mod eigenverb;
pub mod error;
pub mod frequency;
pub mod module;
pub mod notifier;
pub mod overlap;
pub mod spatial_index;
pub mod spreading;
pub mod time_series;

pub use bistatic::{ComputeStats, EigenverbBistatic};
pub use collection::EigenverbCollections;
pub use config::ReverbConfig;
pub use eigenverb::{DEFAULT_PATH_ID, Eigenverb, Origin, PathId};
pub use error::{ReverbError, ReverbResult};
pub use frequency::FrequencyGrid;
pub use module::{CollisionBatch, CollisionTally, PropagationComplete, ReverberationModule};
pub use notifier::{Collision, CollisionNotifier, ReverberationModel};
pub use overlap::{Footprint, overlap_weight};
pub use spreading::{RayFan, RayState, Spread, SpreadingHybridGaussian, SpreadingModel, SpreadingRay};
pub use time_series::{Reverberation, ReverberationTimeSeries};
