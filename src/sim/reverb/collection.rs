use super::eigenverb::{Eigenverb, Origin};
use super::error::{ReverbError, ReverbResult};
use crate::ocean::Boundary;

const NUM_COLLECTIONS: usize = Origin::ALL.len() * Boundary::ALL.len();

/// Eigenverbs of one run, partitioned by origin and boundary.
///
/// Collections only grow while propagation runs and are frozen before the
/// reverberation is computed.
#[derive(Debug, Clone, Default)]
pub struct EigenverbCollections {
    table: [Vec<Eigenverb>; NUM_COLLECTIONS],
    frozen: bool,
}

impl EigenverbCollections {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(origin: Origin, boundary: Boundary) -> usize {
        let o = match origin {
            Origin::Source => 0,
            Origin::Receiver => 1,
        };
        let b = match boundary {
            Boundary::Surface => 0,
            Boundary::Bottom => 1,
        };
        o * Boundary::ALL.len() + b
    }

    /// Appends an eigenverb to the collection matching its origin and boundary.
    pub fn push(&mut self, verb: Eigenverb) -> ReverbResult<()> {
        if self.frozen {
            return Err(ReverbError::CollectionsFrozen);
        }
        let slot = Self::slot(verb.origin(), verb.boundary());
        self.table[slot].push(verb);
        Ok(())
    }

    pub fn get(&self, origin: Origin, boundary: Boundary) -> &[Eigenverb] {
        &self.table[Self::slot(origin, boundary)]
    }

    pub fn len(&self, origin: Origin, boundary: Boundary) -> usize {
        self.get(origin, boundary).len()
    }

    pub fn total_len(&self) -> usize {
        self.table.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total_len() == 0
    }

    /// Stops accepting eigenverbs.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Iterates over `(origin, boundary, eigenverbs)` for all four collections.
    pub fn iter(&self) -> impl Iterator<Item = (Origin, Boundary, &[Eigenverb])> + '_ {
        Origin::ALL.into_iter().flat_map(move |origin| {
            Boundary::ALL
                .into_iter()
                .map(move |boundary| (origin, boundary, self.get(origin, boundary)))
        })
    }
}
