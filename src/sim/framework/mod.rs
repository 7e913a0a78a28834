//! Small runtime for composing simulation modules.
//!
//! A propagator module publishes collision batches on the [`Bus`]; listeners
//! such as the reverberation module consume them. Modules never reference
//! each other directly.

pub mod bus;
pub mod context;
pub mod module;
pub mod pipeline;

pub use bus::Bus;
pub use context::SimContext;
pub use module::SimModule;
pub use pipeline::Pipeline;
