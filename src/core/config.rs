//! Simulation configuration with documented constants
//!
//! All tunable values are collected here with explanations of their purpose
//! and how they interact with each other. Nothing in the combat or collision
//! code hard-codes these numbers.

use serde::{Deserialize, Serialize};

use crate::core::error::{BattleError, Result};
use crate::core::types::SoldierClass;

/// Collision strategy selector for the kernel
///
/// All strategies return the same intersecting set; the choice is purely a
/// performance trade-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionStrategy {
    /// Pick per query: spatial hash when an index is available, bulk filter
    /// above `auto_threshold` members, brute force otherwise
    #[default]
    Auto,
    /// Test against every member. Fine up to ~1500 members.
    BruteForce,
    /// Uniform grid keyed by cell coordinates; members re-hash every tick.
    SpatialHash,
    /// One bounding-box rejection pass over the whole collection, then exact
    /// tests on survivors. Pays off for very large collections.
    BulkFilter,
}

/// Configuration for the battle simulation
///
/// These values have been tuned to produce battles that resolve in a few
/// thousand ticks with visually plausible arrow flight. Changing them will
/// affect pacing and feel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    // === PLAYFIELD ===
    /// Playfield width in world units. Arrows leaving any edge are removed.
    pub playfield_width: f32,
    /// Playfield height in world units.
    pub playfield_height: f32,
    /// Fixed simulation step in seconds. `advance(delta_time)` ignores the
    /// caller's delta and steps by this much; the parameter exists for host
    /// loop compatibility.
    pub tick_seconds: f32,

    // === FORMATION ===
    /// Grid spacing between soldiers placed by the formation builder.
    pub soldier_spacing: f32,

    // === MELEE ===
    /// Hard melee radius. A rival strictly inside this range takes direct
    /// melee damage.
    pub melee_range: f32,
    /// Jitter band around `melee_range` for the commit decision. Each attack
    /// draws an integer threshold in melee_range ± this value, so soldiers
    /// switch to melee at slightly different distances.
    pub melee_range_jitter: i32,
    /// Melee damage is strength times this multiplier.
    pub melee_multiplier: f32,
    /// 1-in-n chance per attack that the attacker's own strength degrades
    /// by one (weapon wear and exhaustion).
    pub attrition_one_in: u32,

    // === ATTACK SCHEDULING ===
    /// Expected attacks per archer unit per tick. The per-soldier
    /// probability is this divided by the unit's live roster size, so a
    /// unit's total fire rate stays roughly constant as it takes losses.
    pub attack_rate_archer: f32,
    /// Expected attacks per infantry unit per tick.
    pub attack_rate_infantry: f32,
    /// Cap on concurrently in-flight arrows. Bounds simulation cost and
    /// visual clutter; attacks are skipped while the cap is reached.
    pub max_arrows_in_flight: usize,

    // === ARROWS ===
    /// Damage constant. Impact damage is this scaled by the larger velocity
    /// component relative to the class speed cap, floored at 1.
    pub arrow_damage: f32,
    /// Speed cap for arrows fired by non-archers (world units/second).
    pub arrow_speed_cap: f32,
    /// Speed cap for arrows fired by archers. Archers loose harder.
    pub arrow_speed_cap_archer: f32,
    /// Launch speed for non-archer arrows.
    pub arrow_launch_speed: f32,
    /// Launch speed for archer arrows.
    pub arrow_launch_speed_archer: f32,
    /// Speed gained per tick while ramping toward the cap.
    pub arrow_acceleration: f32,
    /// Speed lost per tick to drag once the cap has been reached. When the
    /// speed decays to zero the arrow is removed, so flight time is bounded.
    pub arrow_drag: f32,
    /// Accuracy jitter radius applied to the aim point at launch.
    pub arrow_accuracy: f32,
    /// Archers aim tighter: their jitter radius is scaled by this factor.
    pub archer_accuracy_factor: f32,

    // === SOLDIERS ===
    /// Advance speed of a melee-committed soldier (world units/second).
    pub soldier_speed: f32,
    /// 1-in-n chance per tick that a soldier colliding with a rival shoves
    /// them one unit sideways (crowd pressure in the press).
    pub shove_one_in: u32,
    /// 1-in-n chance per tick of +1 passive health regeneration while alive.
    pub regen_one_in: u32,
    /// Health below which the renderer shows the wounded tint.
    pub wounded_threshold: f32,
    /// Ticks a corpse lingers before it fades and is purged.
    pub corpse_fade_ticks: u64,
    /// Starting strength for every class.
    pub default_strength: i32,
    /// Starting ammunition for archers. Non-archers carry none.
    pub archer_ammunition: u32,

    // === COLLISION KERNEL ===
    /// Strategy selector for roster collision queries.
    pub collision_strategy: CollisionStrategy,
    /// Member count above which Auto switches from brute force to the bulk
    /// filter when no spatial hash is available.
    pub collision_auto_threshold: usize,
    /// Cell size of the spatial hash grid. Should comfortably exceed the
    /// largest hit-box so most entities cover few cells.
    pub collision_cell_size: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            playfield_width: 1300.0,
            playfield_height: 900.0,
            tick_seconds: 1.0 / 60.0,

            soldier_spacing: 10.0,

            melee_range: 20.0,
            melee_range_jitter: 10,
            melee_multiplier: 3.0,
            attrition_one_in: 5,

            attack_rate_archer: 0.05,
            attack_rate_infantry: 0.02,
            max_arrows_in_flight: 20,

            arrow_damage: 20.0,
            arrow_speed_cap: 1000.0,
            arrow_speed_cap_archer: 1200.0,
            arrow_launch_speed: 30.0,
            arrow_launch_speed_archer: 42.0,
            arrow_acceleration: 60.0,
            arrow_drag: 20.0,
            arrow_accuracy: 10.0,
            archer_accuracy_factor: 0.5,

            soldier_speed: 90.0,
            shove_one_in: 5,
            regen_one_in: 1000,
            wounded_threshold: 40.0,
            corpse_fade_ticks: 600,
            default_strength: 10,
            archer_ammunition: 50,

            collision_strategy: CollisionStrategy::Auto,
            collision_auto_threshold: 1500,
            collision_cell_size: 64.0,
        }
    }
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.playfield_width <= 0.0 || self.playfield_height <= 0.0 {
            return Err(BattleError::InvalidConfig(
                "playfield dimensions must be positive".into(),
            ));
        }

        if self.tick_seconds <= 0.0 {
            return Err(BattleError::InvalidConfig(
                "tick_seconds must be positive".into(),
            ));
        }

        if self.soldier_spacing <= 0.0 {
            return Err(BattleError::InvalidConfig(
                "soldier_spacing must be positive".into(),
            ));
        }

        // The jitter band must not reach below zero distance, or the melee
        // commit threshold could never fire for adjacent soldiers.
        if self.melee_range_jitter < 0 || self.melee_range_jitter as f32 > self.melee_range {
            return Err(BattleError::InvalidConfig(format!(
                "melee_range_jitter ({}) must be in [0, melee_range ({})]",
                self.melee_range_jitter, self.melee_range
            )));
        }

        if self.arrow_launch_speed > self.arrow_speed_cap
            || self.arrow_launch_speed_archer > self.arrow_speed_cap_archer
        {
            return Err(BattleError::InvalidConfig(
                "arrow launch speeds must not exceed their class caps".into(),
            ));
        }

        if self.arrow_acceleration <= 0.0 || self.arrow_drag <= 0.0 {
            return Err(BattleError::InvalidConfig(
                "arrow acceleration and drag must be positive".into(),
            ));
        }

        if self.attrition_one_in == 0 || self.shove_one_in == 0 || self.regen_one_in == 0 {
            return Err(BattleError::InvalidConfig(
                "1-in-n chances must have n >= 1".into(),
            ));
        }

        if self.max_arrows_in_flight == 0 {
            return Err(BattleError::InvalidConfig(
                "max_arrows_in_flight must be at least 1".into(),
            ));
        }

        if self.collision_cell_size <= 0.0 {
            return Err(BattleError::InvalidConfig(
                "collision_cell_size must be positive".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.archer_accuracy_factor) {
            return Err(BattleError::InvalidConfig(
                "archer_accuracy_factor must be in [0, 1]".into(),
            ));
        }

        Ok(())
    }

    /// Speed cap for arrows fired by a soldier of the given class
    pub fn arrow_speed_cap_for(&self, class: SoldierClass) -> f32 {
        if class.is_archer() {
            self.arrow_speed_cap_archer
        } else {
            self.arrow_speed_cap
        }
    }

    /// Launch speed for arrows fired by a soldier of the given class
    pub fn arrow_launch_speed_for(&self, class: SoldierClass) -> f32 {
        if class.is_archer() {
            self.arrow_launch_speed_archer
        } else {
            self.arrow_launch_speed
        }
    }

    /// Accuracy jitter radius for a soldier of the given class
    pub fn arrow_accuracy_for(&self, class: SoldierClass) -> f32 {
        if class.is_archer() {
            self.arrow_accuracy * self.archer_accuracy_factor
        } else {
            self.arrow_accuracy
        }
    }

    /// Expected attacks per unit per tick for the given class
    pub fn attack_rate_for(&self, class: SoldierClass) -> f32 {
        if class.is_archer() {
            self.attack_rate_archer
        } else {
            self.attack_rate_infantry
        }
    }

    /// Starting ammunition for the given class
    pub fn ammunition_for(&self, class: SoldierClass) -> u32 {
        if class.is_archer() {
            self.archer_ammunition
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_jitter_wider_than_range_rejected() {
        let config = SimulationConfig {
            melee_range: 20.0,
            melee_range_jitter: 25,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_launch_speed_above_cap_rejected() {
        let config = SimulationConfig {
            arrow_launch_speed: 2000.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_archer_class_lookups() {
        let config = SimulationConfig::default();
        assert_eq!(
            config.arrow_speed_cap_for(SoldierClass::Archer),
            config.arrow_speed_cap_archer
        );
        assert_eq!(
            config.arrow_speed_cap_for(SoldierClass::LightInfantry),
            config.arrow_speed_cap
        );
        assert!(
            config.arrow_accuracy_for(SoldierClass::Archer)
                < config.arrow_accuracy_for(SoldierClass::HeavyInfantry)
        );
        assert_eq!(config.ammunition_for(SoldierClass::Archer), 50);
        assert_eq!(config.ammunition_for(SoldierClass::LightInfantry), 0);
    }
}
