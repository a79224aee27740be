//! Soldier entity and lifecycle
//!
//! Simulation state only: the renderer consumes position, rotation, visual
//! state, and the hit-box through read-only accessors, and owns its own
//! sprite attachment. Lifecycle runs Alive -> Dead -> Removed; "wounded" is
//! a cosmetic tint, not a state transition.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Allegiance, SoldierClass, SoldierId, Tick, UnitId, Vec2};
use crate::spatial::geometry::{Collider, Polygon};

/// Weapon currently committed, re-derived on every attack decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponMode {
    Melee,
    #[default]
    Ranged,
}

/// What the renderer should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualState {
    Normal,
    /// Low health tint; purely cosmetic
    Wounded,
    /// Downed representation for corpses
    Downed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum LifeState {
    Alive,
    Dead { since: Tick },
    Removed,
}

/// An autonomous combatant owned by the simulation context's arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Soldier {
    pub id: SoldierId,
    pub unit: UnitId,
    pub allegiance: Allegiance,
    pub class: SoldierClass,
    pub position: Vec2,
    /// Radians, for the renderer; tracks the nearest rival
    pub facing: f32,
    health: f32,
    pub strength: i32,
    pub ammunition: u32,
    pub weapon: WeaponMode,
    /// Last rival this soldier committed an attack against
    pub target: Option<SoldierId>,
    hit_box: Polygon,
    state: LifeState,
}

/// Hit-box half extents per class. Heavies are bulkier, archers slighter.
fn hit_box_for(class: SoldierClass) -> Polygon {
    match class {
        SoldierClass::LightInfantry => Polygon::rectangle(4.0, 4.0),
        SoldierClass::HeavyInfantry => Polygon::rectangle(5.0, 5.0),
        SoldierClass::Archer => Polygon::rectangle(3.5, 3.5),
    }
}

impl Soldier {
    pub fn new(
        id: SoldierId,
        unit: UnitId,
        allegiance: Allegiance,
        class: SoldierClass,
        position: Vec2,
        config: &SimulationConfig,
    ) -> Self {
        Self {
            id,
            unit,
            allegiance,
            class,
            position,
            facing: Vec2::new(0.0, allegiance.facing()).angle(),
            health: 100.0,
            strength: config.default_strength,
            ammunition: config.ammunition_for(class),
            weapon: WeaponMode::default(),
            target: None,
            hit_box: hit_box_for(class),
            state: LifeState::Alive,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        matches!(self.state, LifeState::Alive)
    }

    pub fn is_removed(&self) -> bool {
        matches!(self.state, LifeState::Removed)
    }

    pub fn died_at(&self) -> Option<Tick> {
        match self.state {
            LifeState::Dead { since } => Some(since),
            _ => None,
        }
    }

    /// Apply damage, clamped so health stays in [0, 100].
    ///
    /// Returns true when this hit brought health to zero. Dead soldiers are
    /// unaffected; the transition to dead happens exactly once, in the tick
    /// sweep.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() || amount <= 0.0 {
            return false;
        }
        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, 100.0);
        before > 0.0 && self.health == 0.0
    }

    /// Passive regeneration, only while alive
    pub fn regenerate(&mut self, amount: f32) {
        if self.is_alive() && amount > 0.0 {
            self.health = (self.health + amount).clamp(0.0, 100.0);
        }
    }

    /// Mark dead. Idempotent: only an alive soldier transitions.
    pub fn mark_dead(&mut self, tick: Tick) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.health = 0.0;
        self.state = LifeState::Dead { since: tick };
        true
    }

    /// Final transition when the corpse fades out
    pub fn mark_removed(&mut self) {
        self.state = LifeState::Removed;
    }

    /// Weapon wear and exhaustion; strength never goes negative
    pub fn degrade_strength(&mut self) {
        self.strength = (self.strength - 1).max(0);
    }

    /// Spend one arrow. Ammunition is consumed at launch, not at impact.
    pub fn consume_ammunition(&mut self) -> bool {
        if self.ammunition == 0 {
            return false;
        }
        self.ammunition -= 1;
        true
    }

    pub fn visual_state(&self, config: &SimulationConfig) -> VisualState {
        if !self.is_alive() {
            VisualState::Downed
        } else if self.health < config.wounded_threshold {
            VisualState::Wounded
        } else {
            VisualState::Normal
        }
    }

    /// Renderer rotation in radians
    pub fn rotation(&self) -> f32 {
        self.facing
    }

    pub fn face_toward(&mut self, target: Vec2) {
        let dir = target - self.position;
        if dir.length() > 0.0001 {
            self.facing = dir.angle();
        }
    }

    /// Step toward a point at the given speed for one tick
    pub fn advance_toward(&mut self, target: Vec2, config: &SimulationConfig) {
        let step = config.soldier_speed * config.tick_seconds;
        let dir = (target - self.position).normalize();
        self.position = self.position + dir * step;
    }
}

impl Collider for Soldier {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn hit_box(&self) -> &Polygon {
        &self.hit_box
    }
}
