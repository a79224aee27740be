//! Attack resolution and probabilistic scheduling
//!
//! Resolution is pure: it inspects the attacker and the rival roster and
//! returns what should happen. The tick orchestrator applies the result
//! (damage, ammunition, arrow spawn), so nothing here mutates a roster.

use rand::Rng;

use crate::combat::targeting::{get_closest, random_living};
use crate::core::config::SimulationConfig;
use crate::core::random::{chance, probability};
use crate::core::types::SoldierId;
use crate::entity::soldier::{Soldier, WeaponMode};

/// What an attack decision resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackAction {
    /// Rival strictly inside the hard melee radius: direct damage
    MeleeStrike { target: SoldierId, damage: f32 },
    /// Committed to melee but the rival is still out of reach
    MeleeCommit { target: SoldierId },
    /// Loose an arrow at a randomly chosen living rival
    Loose { target: SoldierId },
    /// Nothing to do: no living rival, or ranged with an empty quiver
    Hold,
}

/// Result of one attack decision. The caller applies it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackResolution {
    /// Weapon mode the soldier committed to this decision
    pub weapon: WeaponMode,
    /// Attrition roll: the attacker's own strength degrades by one
    pub degrade_strength: bool,
    pub action: AttackAction,
}

/// Decide what an attacking soldier does this tick.
///
/// The melee commit threshold is an integer drawn in a band around the
/// melee range, so individual soldiers switch weapons at slightly different
/// distances instead of on a knife edge.
pub fn resolve_attack(
    attacker: &Soldier,
    rivals: &[SoldierId],
    soldiers: &[Soldier],
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> AttackResolution {
    let Some((nearest, distance)) = get_closest(attacker.position, rivals, soldiers) else {
        return AttackResolution {
            weapon: attacker.weapon,
            degrade_strength: false,
            action: AttackAction::Hold,
        };
    };

    let degrade_strength = chance(rng, config.attrition_one_in);

    let range = config.melee_range.round() as i32;
    let threshold = rng.gen_range(range - config.melee_range_jitter..=range + config.melee_range_jitter);

    if distance < threshold as f32 {
        let action = if distance < config.melee_range {
            AttackAction::MeleeStrike {
                target: nearest,
                damage: attacker.strength as f32 * config.melee_multiplier,
            }
        } else {
            AttackAction::MeleeCommit { target: nearest }
        };
        return AttackResolution {
            weapon: WeaponMode::Melee,
            degrade_strength,
            action,
        };
    }

    let action = if attacker.ammunition > 0 {
        match random_living(rng, rivals, soldiers) {
            Some(target) => AttackAction::Loose { target },
            None => AttackAction::Hold,
        }
    } else {
        AttackAction::Hold
    };

    AttackResolution {
        weapon: WeaponMode::Ranged,
        degrade_strength,
        action,
    }
}

/// Probabilistic attack scheduling.
///
/// Per tick each soldier rolls `class rate / unit roster size`, so a unit's
/// total fire rate stays roughly constant as it shrinks. Attacks are gated
/// on a living rival existing and on the in-flight projectile cap.
pub fn wants_to_attack(
    soldier: &Soldier,
    unit_roster_len: usize,
    arrows_in_flight: usize,
    has_living_rival: bool,
    config: &SimulationConfig,
    rng: &mut impl Rng,
) -> bool {
    if !has_living_rival || arrows_in_flight >= config.max_arrows_in_flight {
        return false;
    }
    let rate = config.attack_rate_for(soldier.class) / unit_roster_len.max(1) as f32;
    probability(rng, rate)
}
