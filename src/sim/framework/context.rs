use crate::sim::reverb::{FrequencyGrid, RayFan};

/// Read-only run description shared by all modules of a pipeline.
///
/// Every module of one propagation run sees the same frequency grid and ray
/// fan; collisions published on the bus must use them.
pub struct SimContext<'a> {
    pub frequencies: &'a FrequencyGrid,
    pub fan: &'a RayFan,
}

impl<'a> SimContext<'a> {
    pub fn new(frequencies: &'a FrequencyGrid, fan: &'a RayFan) -> Self {
        Self { frequencies, fan }
    }
}
