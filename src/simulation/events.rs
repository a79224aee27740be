//! Events generated during a simulation tick
//!
//! These are returned by `SimulationContext::advance` so the host can drive
//! its presentation from them. `ArrowRemoved` and `CorpseFaded` double as
//! the removal hook for the rendering collaborator: once one arrives, the
//! entity is gone from the simulation and its sprite should be released.

use crate::core::types::{Allegiance, ArrowId, SoldierId, Tick};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BattleEvent {
    /// An arrow left a shooter's bow
    ArrowLaunched {
        arrow: ArrowId,
        shooter: SoldierId,
        target: SoldierId,
    },
    /// An arrow struck a soldier
    ArrowImpact {
        arrow: ArrowId,
        target: SoldierId,
        damage: f32,
    },
    /// An arrow left the simulation (impact, out of bounds, or spent)
    ArrowRemoved { arrow: ArrowId },
    /// A melee blow landed
    MeleeStrike {
        attacker: SoldierId,
        target: SoldierId,
        damage: f32,
    },
    /// A soldier went down and was moved to the corpse collection
    SoldierDied { soldier: SoldierId, tick: Tick },
    /// A corpse finished fading and was purged
    CorpseFaded { soldier: SoldierId },
}

/// Outcome of the battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    InProgress,
    /// One side still has soldiers standing, the other does not
    Victory { winner: Allegiance },
    /// Mutual destruction
    Stalemate,
}
