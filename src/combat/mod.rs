//! Targeting and combat resolution

pub mod attack;
pub mod targeting;

pub use attack::{resolve_attack, wants_to_attack, AttackAction, AttackResolution};
pub use targeting::{get_closest, random_living};
