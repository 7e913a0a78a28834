use anyhow::{Context, Result};

use super::{Bus, SimContext, SimModule};

/// Ordered chain of modules driven once per propagation step.
///
/// A propagator module usually comes first and posts collisions on the
/// [`Bus`]; reverberation modules after it consume them within the same step.
pub struct Pipeline {
    modules: Vec<Box<dyn SimModule>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self { modules: vec![] }
    }

    /// Appends `module`; it runs after every module already added.
    pub fn with_module<M: SimModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    /// Checks every module against the run's frequency grid and ray fan.
    pub fn init(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        for module in self.modules.iter_mut() {
            let name = module.name();
            module
                .init(ctx, bus)
                .with_context(|| format!("Module {name} rejected the propagation run"))?;
        }
        Ok(())
    }

    /// Advances the run by one step. The first module error stops the step.
    pub fn step(&mut self, ctx: &SimContext, bus: &mut Bus) -> Result<()> {
        for module in self.modules.iter_mut() {
            let name = module.name();
            module
                .step(ctx, bus)
                .with_context(|| format!("Module {name} failed during propagation step"))?;
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}
