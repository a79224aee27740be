//! Armies - real-time battle simulation core
//!
//! Two opposing formations of autonomous soldiers fight with melee and
//! ranged combat. The host loop calls [`SimulationContext::advance`] once
//! per frame and drives its presentation from the returned events.

pub mod combat;
pub mod core;
pub mod entity;
pub mod formation;
pub mod simulation;
pub mod spatial;

pub use crate::core::config::{CollisionStrategy, SimulationConfig};
pub use crate::core::error::{BattleError, Result};
pub use crate::core::types::{Allegiance, ArrowId, SoldierClass, SoldierId, UnitId, Vec2};
pub use crate::entity::{Arrow, ArrowState, Soldier, VisualState, WeaponMode};
pub use crate::formation::FormationTemplate;
pub use crate::simulation::{BattleEvent, BattleOutcome, SimulationContext};
