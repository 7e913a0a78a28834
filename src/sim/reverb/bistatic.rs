use std::f64::consts::FRAC_PI_2;
use std::ops::{Add, AddAssign};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::collection::EigenverbCollections;
use super::config::ReverbConfig;
use super::eigenverb::{DEFAULT_PATH_ID, Eigenverb, Origin, PathId};
use super::error::{ReverbError, ReverbResult};
use super::frequency::FrequencyGrid;
use super::notifier::{Collision, CollisionNotifier, ReverberationModel};
use super::overlap::{overlap_weight, search_radius};
use super::spatial_index::SpatialIndex;
use super::spreading::{RayFan, SpreadingModel};
use super::time_series::{Reverberation, ReverberationTimeSeries};
use crate::Point;
use crate::ocean::{Boundary, OceanEnvironment};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Collecting,
    Complete,
    Computed,
}

/// Counters gathered while integrating eigenverb pairs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeStats {
    /// Pairs that reached the exact overlap test.
    pub pairs_tested: usize,
    /// Pairs with non-negligible overlap at one or more frequencies.
    pub pairs_overlapping: usize,
    /// Pairs whose two-way travel time lies beyond the horizon, counted over
    /// all source/receiver pairs whether or not the spatial index is used.
    pub pairs_beyond_horizon: usize,
}

impl Add for ComputeStats {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self {
            pairs_tested: self.pairs_tested + other.pairs_tested,
            pairs_overlapping: self.pairs_overlapping + other.pairs_overlapping,
            pairs_beyond_horizon: self.pairs_beyond_horizon + other.pairs_beyond_horizon,
        }
    }
}

impl AddAssign for ComputeStats {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

/// Bistatic eigenverb reverberation model.
///
/// Listens for boundary collisions of rays launched from the source and from
/// the receiver, records each as an eigenverb, and once propagation is
/// complete overlaps source-side against receiver-side eigenverbs at each
/// boundary to build the reverberation time series.
pub struct EigenverbBistatic {
    config: ReverbConfig,
    environment: Arc<OceanEnvironment>,
    spreading: Box<dyn SpreadingModel>,
    fan: RayFan,
    frequencies: FrequencyGrid,
    collections: EigenverbCollections,
    phase: Phase,
    poisoned: Option<ReverbError>,
    reverberation: Option<Reverberation>,
    stats: ComputeStats,
}

impl EigenverbBistatic {
    pub fn new(
        config: ReverbConfig,
        environment: Arc<OceanEnvironment>,
        spreading: Box<dyn SpreadingModel>,
        fan: RayFan,
        frequencies: FrequencyGrid,
    ) -> ReverbResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            environment,
            spreading,
            fan,
            frequencies,
            collections: EigenverbCollections::new(),
            phase: Phase::Collecting,
            poisoned: None,
            reverberation: None,
            stats: ComputeStats::default(),
        })
    }

    pub fn config(&self) -> &ReverbConfig {
        &self.config
    }

    /// Frequency grid every collision of this run must carry.
    pub fn frequencies(&self) -> &FrequencyGrid {
        &self.frequencies
    }

    pub fn collections(&self) -> &EigenverbCollections {
        &self.collections
    }

    /// Result of [`compute_reverberation`](ReverberationModel::compute_reverberation), once available.
    pub fn reverberation(&self) -> Option<&Reverberation> {
        self.reverberation.as_ref()
    }

    pub fn statistics(&self) -> ComputeStats {
        self.stats
    }

    /// Fatal error that ended this computation, if any.
    pub fn poisoned(&self) -> Option<&ReverbError> {
        self.poisoned.as_ref()
    }

    fn poison(&mut self, err: ReverbError) -> ReverbError {
        warn!("Reverberation computation aborted: {err}");
        self.poisoned = Some(err.clone());
        err
    }

    fn origin_of(&self, id: PathId) -> Option<Origin> {
        if id == self.config.receiver_id {
            Some(Origin::Receiver)
        } else if id == self.config.source_id || id == DEFAULT_PATH_ID {
            Some(Origin::Source)
        } else {
            None
        }
    }

    fn notify(&mut self, boundary: Boundary, collision: &Collision) -> ReverbResult<bool> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }
        if self.phase != Phase::Collecting {
            return Err(ReverbError::CollectionsFrozen);
        }
        if !collision.frequencies.same_grid(&self.frequencies) {
            return Err(self.poison(ReverbError::FrequencyMismatch {
                expected: self.frequencies.len(),
                actual: collision.frequencies.len(),
            }));
        }

        if !(collision.grazing > 0.0 && collision.grazing <= FRAC_PI_2) {
            debug!(
                de = collision.de,
                az = collision.az,
                grazing = collision.grazing,
                "Rejected {boundary} collision: grazing angle out of range"
            );
            return Ok(false);
        }
        let geometry_ok = collision.time.is_finite()
            && collision.time >= 0.0
            && collision.speed.is_finite()
            && collision.speed > 0.0
            && collision.position.is_finite()
            && collision.direction.is_finite();
        let Some(direction) = collision.direction.normalize().filter(|_| geometry_ok) else {
            debug!(
                de = collision.de,
                az = collision.az,
                "Rejected {boundary} collision: invalid geometry"
            );
            return Ok(false);
        };
        let Some(origin) = self.origin_of(collision.id) else {
            debug!(id = collision.id, "Rejected {boundary} collision: unknown path id");
            return Ok(false);
        };
        let Some(ray) = self.fan.ray_state(
            collision.de,
            collision.az,
            collision.time,
            collision.grazing,
            collision.speed,
            collision.position,
        ) else {
            debug!(
                de = collision.de,
                az = collision.az,
                "Rejected {boundary} collision: ray index outside the fan"
            );
            return Ok(false);
        };

        let spread = self.spreading.compute(&ray, &self.frequencies);
        let verb = Eigenverb::new(
            origin,
            boundary,
            collision.id,
            collision.de,
            collision.az,
            collision.time,
            collision.grazing,
            collision.speed,
            self.frequencies.clone(),
            collision.position,
            direction,
            spread,
        )
        .map_err(|err| self.poison(err))?;
        self.collections.push(verb)?;
        Ok(true)
    }

    fn empty_series(&self) -> ReverberationTimeSeries {
        ReverberationTimeSeries::new(
            self.config.time_resolution,
            self.config.max_time,
            self.frequencies.clone(),
        )
    }

    /// Intensity one source/receiver pair adds per frequency, or `None` when
    /// the footprints do not overlap at any frequency.
    fn pair_contribution(
        &self,
        boundary: Boundary,
        source: &Eigenverb,
        receiver: &Eigenverb,
    ) -> Option<Vec<f64>> {
        let cutoff = self.config.overlap_cutoff;
        let weights: Vec<f64> = (0..self.frequencies.len())
            .map(|f| {
                let w = overlap_weight(&source.footprint(f), &receiver.footprint(f));
                if w < cutoff { 0.0 } else { w }
            })
            .collect();
        if weights.iter().all(|&w| w == 0.0) {
            return None;
        }

        let (s, r) = (source.position(), receiver.position());
        let midpoint = Point::new(0.5 * (s.x + r.x), 0.5 * (s.y + r.y), 0.5 * (s.z + r.z));
        let scattering = self.environment.scattering(
            boundary,
            midpoint,
            source.grazing_angle(),
            receiver.grazing_angle(),
            &self.frequencies,
        );

        let s_loss = &source.spread().intensity;
        let r_loss = &receiver.spread().intensity;
        Some(
            (0..self.frequencies.len())
                .map(|f| s_loss[f] * r_loss[f] * weights[f] * scattering[f])
                .collect(),
        )
    }

    /// Integrates one source eigenverb against the receivers of its boundary.
    ///
    /// `receiver_times` holds the receiver travel times in ascending order, so
    /// beyond-horizon pairs are counted over every receiver even when the
    /// index only yields nearby candidates.
    #[allow(clippy::too_many_arguments)]
    fn accumulate_source(
        &self,
        boundary: Boundary,
        source: &Eigenverb,
        receivers: &[Eigenverb],
        receiver_times: &[f64],
        index: Option<&SpatialIndex>,
        series: &mut ReverberationTimeSeries,
        stats: &mut ComputeStats,
    ) {
        let in_horizon = receiver_times
            .partition_point(|&t| series.bin_of(source.travel_time() + t).is_some());
        stats.pairs_beyond_horizon += receiver_times.len() - in_horizon;

        let mut visit = |receiver: &Eigenverb| {
            let time = source.travel_time() + receiver.travel_time();
            if series.bin_of(time).is_none() {
                return;
            }
            stats.pairs_tested += 1;
            if let Some(values) = self.pair_contribution(boundary, source, receiver) {
                stats.pairs_overlapping += 1;
                series.accumulate(time, &values);
            }
        };

        match index {
            Some(index) => {
                for r in index.candidates(source.position()) {
                    visit(&receivers[r]);
                }
            }
            None => receivers.iter().for_each(visit),
        }
    }

    /// Overlap-integrates the source and receiver eigenverbs of one boundary.
    fn compute_boundary(&self, boundary: Boundary) -> (ReverberationTimeSeries, ComputeStats) {
        let sources = self.collections.get(Origin::Source, boundary);
        let receivers = self.collections.get(Origin::Receiver, boundary);
        if sources.is_empty() || receivers.is_empty() {
            return (self.empty_series(), ComputeStats::default());
        }

        let max_sigma = sources
            .iter()
            .chain(receivers)
            .map(|v| v.spread().max_sigma())
            .fold(0.0, f64::max);
        let radius = search_radius(max_sigma, self.config.overlap_cutoff);
        let extent = sources
            .iter()
            .chain(receivers)
            .map(|v| v.position().x.abs().max(v.position().y.abs()))
            .fold(0.0, f64::max);
        let index = (self.config.use_spatial_index && SpatialIndex::supports(radius, extent))
            .then(|| SpatialIndex::new(receivers.iter().map(Eigenverb::position), radius));
        if self.config.use_spatial_index && index.is_none() {
            debug!(%boundary, radius, extent, "Spatial index skipped for this footprint scale");
        }

        let mut receiver_times: Vec<f64> = receivers.iter().map(Eigenverb::travel_time).collect();
        receiver_times.sort_by(f64::total_cmp);

        if self.config.parallel {
            sources
                .par_iter()
                .fold(
                    || (self.empty_series(), ComputeStats::default()),
                    |(mut series, mut stats), source| {
                        self.accumulate_source(
                            boundary,
                            source,
                            receivers,
                            &receiver_times,
                            index.as_ref(),
                            &mut series,
                            &mut stats,
                        );
                        (series, stats)
                    },
                )
                .reduce(
                    || (self.empty_series(), ComputeStats::default()),
                    |(mut a, sa), (b, sb)| {
                        a.merge(&b);
                        (a, sa + sb)
                    },
                )
        } else {
            let mut series = self.empty_series();
            let mut stats = ComputeStats::default();
            for source in sources {
                self.accumulate_source(
                    boundary,
                    source,
                    receivers,
                    &receiver_times,
                    index.as_ref(),
                    &mut series,
                    &mut stats,
                );
            }
            (series, stats)
        }
    }
}

impl CollisionNotifier for EigenverbBistatic {
    fn notify_upper_collision(&mut self, collision: &Collision) -> ReverbResult<bool> {
        self.notify(Boundary::Surface, collision)
    }

    fn notify_lower_collision(&mut self, collision: &Collision) -> ReverbResult<bool> {
        self.notify(Boundary::Bottom, collision)
    }
}

impl ReverberationModel for EigenverbBistatic {
    fn propagation_complete(&mut self) {
        if self.phase == Phase::Collecting {
            self.phase = Phase::Complete;
            self.collections.freeze();
        }
    }

    fn compute_reverberation(&mut self) -> ReverbResult<&Reverberation> {
        if let Some(err) = &self.poisoned {
            return Err(err.clone());
        }
        match self.phase {
            Phase::Collecting => return Err(ReverbError::PropagationIncomplete),
            Phase::Computed => return Err(ReverbError::AlreadyComputed),
            Phase::Complete => {}
        }

        let (surface, surface_stats) = self.compute_boundary(Boundary::Surface);
        let (bottom, bottom_stats) = self.compute_boundary(Boundary::Bottom);
        self.stats = surface_stats + bottom_stats;
        self.phase = Phase::Computed;

        info!(
            eigenverbs = self.collections.total_len(),
            pairs_tested = self.stats.pairs_tested,
            pairs_overlapping = self.stats.pairs_overlapping,
            pairs_beyond_horizon = self.stats.pairs_beyond_horizon,
            "Computed bistatic reverberation"
        );
        Ok(&*self.reverberation.insert(Reverberation::new(surface, bottom)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Vector;
    use crate::sim::reverb::spreading::{RayState, Spread};

    /// Fixed loss and circular footprint, regardless of the ray.
    struct FixedSpreading {
        intensity: f64,
        sigma: f64,
    }

    impl SpreadingModel for FixedSpreading {
        fn compute(&self, _ray: &RayState, frequencies: &FrequencyGrid) -> Spread {
            Spread::uniform(frequencies.len(), self.intensity, self.sigma, self.sigma)
        }
    }

    fn grid() -> FrequencyGrid {
        FrequencyGrid::new(vec![1000.0, 2000.0]).unwrap()
    }

    fn engine_with_sigma(frequencies: &FrequencyGrid, sigma: f64) -> EigenverbBistatic {
        let fan = RayFan::new(RayFan::uniform(-0.5, 0.5, 11), vec![0.0]).unwrap();
        EigenverbBistatic::new(
            ReverbConfig::new(),
            Arc::new(OceanEnvironment::unit()),
            Box::new(FixedSpreading {
                intensity: 1.0,
                sigma,
            }),
            fan,
            frequencies.clone(),
        )
        .unwrap()
    }

    fn engine(frequencies: &FrequencyGrid) -> EigenverbBistatic {
        engine_with_sigma(frequencies, 50.0)
    }

    fn collision(frequencies: &FrequencyGrid, time: f64, grazing: f64, id: PathId) -> Collision {
        Collision::new(
            5,
            0,
            time,
            grazing,
            1500.0,
            frequencies.clone(),
            Point::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.3),
        )
        .with_id(id)
    }

    #[test]
    fn test_upper_and_lower_route_by_origin() {
        let g = grid();
        let mut e = engine(&g);
        assert_eq!(e.notify_upper_collision(&collision(&g, 1.0, 0.3, 1)), Ok(true));
        assert_eq!(e.notify_lower_collision(&collision(&g, 1.0, 0.3, 2)), Ok(true));
        assert_eq!(
            e.notify_lower_collision(&collision(&g, 1.0, 0.3, DEFAULT_PATH_ID)),
            Ok(true)
        );

        let c = e.collections();
        assert_eq!(c.len(Origin::Source, Boundary::Surface), 1);
        assert_eq!(c.len(Origin::Receiver, Boundary::Bottom), 1);
        assert_eq!(c.len(Origin::Source, Boundary::Bottom), 1);
        assert_eq!(c.len(Origin::Receiver, Boundary::Surface), 0);
        assert!(c.get(Origin::Source, Boundary::Surface)[0]
            .frequencies()
            .shares_storage(&g));
    }

    #[test]
    fn test_invalid_collisions_are_rejected_without_mutation() {
        let g = grid();
        let mut e = engine(&g);
        for grazing in [0.0, -0.1, FRAC_PI_2 + 1e-9, f64::NAN] {
            assert_eq!(e.notify_upper_collision(&collision(&g, 1.0, grazing, 1)), Ok(false));
        }
        assert_eq!(e.notify_upper_collision(&collision(&g, 1.0, FRAC_PI_2, 1)), Ok(true));
        assert_eq!(e.notify_upper_collision(&collision(&g, -1.0, 0.3, 1)), Ok(false));
        assert_eq!(e.notify_upper_collision(&collision(&g, 1.0, 0.3, 42)), Ok(false));

        let mut outside_fan = collision(&g, 1.0, 0.3, 1);
        outside_fan.de = 11;
        assert_eq!(e.notify_upper_collision(&outside_fan), Ok(false));

        let mut no_direction = collision(&g, 1.0, 0.3, 1);
        no_direction.direction = Vector::new(0.0, 0.0, 0.0);
        assert_eq!(e.notify_upper_collision(&no_direction), Ok(false));

        assert_eq!(e.collections().total_len(), 1);
        assert!(e.poisoned().is_none());
    }

    #[test]
    fn test_frequency_mismatch_is_fatal() {
        let g = grid();
        let mut e = engine(&g);
        let other = FrequencyGrid::new(vec![1000.0, 3000.0]).unwrap();
        let err = e
            .notify_upper_collision(&collision(&other, 1.0, 0.3, 1))
            .unwrap_err();
        assert_eq!(
            err,
            ReverbError::FrequencyMismatch {
                expected: 2,
                actual: 2
            }
        );
        assert!(e.collections().is_empty());
        assert_eq!(e.notify_upper_collision(&collision(&g, 1.0, 0.3, 1)), Err(err.clone()));
        e.propagation_complete();
        assert_eq!(e.compute_reverberation().unwrap_err(), err);
    }

    #[test]
    fn test_equal_grid_from_another_allocation_is_accepted() {
        let g = grid();
        let mut e = engine(&g);
        assert_eq!(e.notify_upper_collision(&collision(&grid(), 1.0, 0.3, 1)), Ok(true));
    }

    #[test]
    fn test_compute_lifecycle() {
        let g = grid();
        let mut e = engine(&g);
        assert_eq!(
            e.compute_reverberation().unwrap_err(),
            ReverbError::PropagationIncomplete
        );
        e.propagation_complete();
        assert_eq!(
            e.notify_upper_collision(&collision(&g, 1.0, 0.3, 1)),
            Err(ReverbError::CollectionsFrozen)
        );
        assert!(e.compute_reverberation().is_ok());
        assert!(e.reverberation().is_some());
        assert_eq!(
            e.compute_reverberation().unwrap_err(),
            ReverbError::AlreadyComputed
        );
    }

    #[test]
    fn test_overlapping_pair_lands_in_two_way_bin() {
        let g = grid();
        let mut e = engine(&g);
        e.notify_upper_collision(&collision(&g, 0.5, 0.3, 1)).unwrap();
        e.notify_upper_collision(&collision(&g, 0.7, 0.3, 2)).unwrap();
        e.propagation_complete();
        let reverb = e.compute_reverberation().unwrap();

        let bin = reverb.total.bin_of(1.2).unwrap();
        assert_eq!(bin, 12);
        for (i, row) in reverb.total.intensity().iter().enumerate() {
            for &v in row {
                if i == bin {
                    assert!((v - 1.0).abs() < 1e-12);
                } else {
                    assert_eq!(v, 0.0);
                }
            }
        }
        assert_eq!(reverb.bottom.total_energy(), 0.0);
        assert_eq!(
            e.statistics(),
            ComputeStats {
                pairs_tested: 1,
                pairs_overlapping: 1,
                pairs_beyond_horizon: 0
            }
        );
    }

    #[test]
    fn test_tiny_footprints_with_spatial_index() {
        let g = grid();
        let mut e = engine_with_sigma(&g, 1e-20);
        assert!(e.config().use_spatial_index);
        let mut source = collision(&g, 0.5, 0.3, 1);
        source.position = Point::new(1.0, 0.0, 0.0);
        e.notify_upper_collision(&source).unwrap();
        for x in [0.0, 1.0] {
            let mut receiver = collision(&g, 0.7, 0.3, 2);
            receiver.position = Point::new(x, 0.0, 0.0);
            e.notify_upper_collision(&receiver).unwrap();
        }
        e.propagation_complete();
        let reverb = e.compute_reverberation().unwrap();

        // Only the coincident receiver overlaps
        assert!((reverb.total.total_energy() - g.len() as f64).abs() < 1e-12);
        assert_eq!(e.statistics().pairs_overlapping, 1);
        assert_eq!(e.statistics().pairs_tested, 2);
    }
}
