use anyhow::{Result, ensure};
use tracing::debug;

use super::bistatic::EigenverbBistatic;
use super::notifier::{Collision, CollisionNotifier, ReverberationModel};
use crate::sim::framework::{Bus, SimContext, SimModule};

/// Collisions reported by a propagator during one step.
#[derive(Debug, Clone, Default)]
pub struct CollisionBatch {
    /// Rays that struck the sea surface from below.
    pub upper: Vec<Collision>,
    /// Rays that struck the sea floor from above.
    pub lower: Vec<Collision>,
}

/// Marker a propagator puts on the bus after its last step.
#[derive(Debug, Clone, Copy)]
pub struct PropagationComplete;

/// Running totals of accepted and rejected collisions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionTally {
    pub accepted: usize,
    pub rejected: usize,
}

/// Runs an [`EigenverbBistatic`] inside a [`Pipeline`](crate::sim::framework::Pipeline).
///
/// Each step drains the [`CollisionBatch`] from the bus. When
/// [`PropagationComplete`] appears, the reverberation is computed and a clone
/// of the [`Reverberation`](super::Reverberation) is published on the bus
/// together with the final [`CollisionTally`].
pub struct ReverberationModule {
    engine: EigenverbBistatic,
    tally: CollisionTally,
}

impl ReverberationModule {
    pub fn new(engine: EigenverbBistatic) -> Self {
        Self {
            engine,
            tally: CollisionTally::default(),
        }
    }

    pub fn engine(&self) -> &EigenverbBistatic {
        &self.engine
    }

    pub fn into_engine(self) -> EigenverbBistatic {
        self.engine
    }

    pub fn tally(&self) -> CollisionTally {
        self.tally
    }

    fn record(&mut self, accepted: bool) {
        if accepted {
            self.tally.accepted += 1;
        } else {
            self.tally.rejected += 1;
        }
    }
}

impl SimModule for ReverberationModule {
    fn name(&self) -> &'static str {
        "eigenverb_bistatic"
    }

    fn init(&mut self, ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        ensure!(
            ctx.frequencies.same_grid(self.engine.frequencies()),
            "ReverberationModule frequency grid differs from the pipeline grid"
        );
        Ok(())
    }

    fn step(&mut self, _ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        if let Some(batch) = bus.take::<CollisionBatch>() {
            for collision in &batch.upper {
                let accepted = self.engine.notify_upper_collision(collision)?;
                self.record(accepted);
            }
            for collision in &batch.lower {
                let accepted = self.engine.notify_lower_collision(collision)?;
                self.record(accepted);
            }
            debug!(
                upper = batch.upper.len(),
                lower = batch.lower.len(),
                "Consumed collision batch"
            );
        }

        if bus.take::<PropagationComplete>().is_some() {
            self.engine.propagation_complete();
            let reverberation = self.engine.compute_reverberation()?.clone();
            bus.put(reverberation);
            bus.put(self.tally);
        }
        Ok(())
    }
}
