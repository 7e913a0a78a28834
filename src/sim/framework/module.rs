use anyhow::Result;

use super::{Bus, SimContext};

/// A composable simulation module.
///
/// Communication with other modules goes through the [`Bus`].
pub trait SimModule {
    /// Human-readable identifier for debugging / telemetry.
    fn name(&self) -> &'static str;

    /// Optional one-time initialization hook.
    fn init(&mut self, _ctx: &SimContext, _bus: &mut Bus) -> Result<()> {
        Ok(())
    }

    /// Advances the module by one step.
    fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::reverb::{FrequencyGrid, RayFan};

    struct CountRays;
    impl SimModule for CountRays {
        fn name(&self) -> &'static str {
            "count_rays"
        }

        fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
            bus.put(ctx.fan.de().len() * ctx.fan.az().len());
            Ok(())
        }
    }

    #[test]
    fn test_default_init_is_ok() {
        let frequencies = FrequencyGrid::new(vec![1000.0]).unwrap();
        let fan = RayFan::new(vec![-0.1, 0.0, 0.1], vec![0.0, 1.0]).unwrap();
        let ctx = SimContext::new(&frequencies, &fan);

        let mut bus = Bus::new();
        let mut m = CountRays;

        m.init(&ctx, &mut bus).unwrap();
        m.step(&ctx, &mut bus).unwrap();
        assert_eq!(bus.get::<usize>(), Some(&6));
    }
}
