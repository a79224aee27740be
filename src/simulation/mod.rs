//! Simulation context and tick orchestration

pub mod context;
pub mod events;
pub mod tick;

pub use context::{Corpse, SimulationContext, Unit};
pub use events::{BattleEvent, BattleOutcome};
