//! Arrow projectile state machine
//!
//! Arrows launch at the shooter's position with their aim point frozen
//! (rival position plus accuracy jitter). Speed ramps toward a
//! class-dependent cap, then drag decays it; when it reaches zero the arrow
//! has spent itself and is removed, so flight time is always bounded.

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::types::{Allegiance, ArrowId, SoldierClass, SoldierId, Vec2};
use crate::entity::soldier::Soldier;
use crate::spatial::geometry::{Collider, Polygon};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrowState {
    /// Spawned this tick, not yet advanced
    Launched,
    Flying,
    /// Hit something; damage has been attributed
    Impact,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arrow {
    pub id: ArrowId,
    /// Attribution only; the shooter is never dereferenced after launch
    pub shooter: SoldierId,
    pub allegiance: Allegiance,
    shooter_class: SoldierClass,
    pub position: Vec2,
    /// Target position at launch time, jitter applied. Never re-aimed.
    aim: Vec2,
    heading: Vec2,
    speed: f32,
    decelerating: bool,
    past_aim: bool,
    state: ArrowState,
    hit_box: Polygon,
}

impl Arrow {
    /// Spawn at the shooter's position. The caller decrements ammunition.
    pub fn launch(
        id: ArrowId,
        shooter: &Soldier,
        target_position: Vec2,
        jitter: Vec2,
        config: &SimulationConfig,
    ) -> Self {
        let position = shooter.position;
        let aim = target_position + jitter;
        let direction = aim - position;
        let heading = if direction.length() > 0.0001 {
            direction.normalize()
        } else {
            // Point-blank launch: fall back to the shooter's facing
            Vec2::new(0.0, shooter.allegiance.facing())
        };

        Self {
            id,
            shooter: shooter.id,
            allegiance: shooter.allegiance,
            shooter_class: shooter.class,
            position,
            aim,
            heading,
            speed: config.arrow_launch_speed_for(shooter.class),
            decelerating: false,
            past_aim: false,
            state: ArrowState::Launched,
            hit_box: Polygon::rectangle(3.0, 1.0),
        }
    }

    pub fn state(&self) -> ArrowState {
        self.state
    }

    /// Still moving and collidable
    pub fn in_flight(&self) -> bool {
        matches!(self.state, ArrowState::Launched | ArrowState::Flying)
    }

    pub fn is_removed(&self) -> bool {
        self.state == ArrowState::Removed
    }

    pub fn current_speed(&self) -> f32 {
        self.speed
    }

    /// Renderer rotation in radians
    pub fn rotation(&self) -> f32 {
        self.heading.angle()
    }

    /// Advance one tick of flight.
    ///
    /// The heading is recomputed toward the frozen aim point until the arrow
    /// passes it, then held so the arrow flies on rather than orbiting.
    pub fn advance(&mut self, config: &SimulationConfig) {
        if !self.in_flight() {
            return;
        }
        self.state = ArrowState::Flying;

        let cap = config.arrow_speed_cap_for(self.shooter_class);
        if self.decelerating {
            self.speed -= config.arrow_drag;
            if self.speed <= 0.0 {
                self.speed = 0.0;
                self.state = ArrowState::Removed;
                return;
            }
        } else {
            self.speed += config.arrow_acceleration;
            if self.speed >= cap {
                self.speed = cap;
                self.decelerating = true;
            }
        }

        let step = self.speed * config.tick_seconds;
        if !self.past_aim {
            let to_aim = self.aim - self.position;
            if to_aim.length() <= step {
                self.past_aim = true;
            } else {
                self.heading = to_aim.normalize();
            }
        }

        self.position = self.position + self.heading * step;
    }

    /// Inside the playfield rectangle
    pub fn in_bounds(&self, config: &SimulationConfig) -> bool {
        self.position.x >= 0.0
            && self.position.x <= config.playfield_width
            && self.position.y >= 0.0
            && self.position.y <= config.playfield_height
    }

    /// Damage dealt on impact: the damage constant scaled by the larger
    /// velocity component relative to the class cap, floored at one so an
    /// arrow is never harmless.
    pub fn impact_damage(&self, config: &SimulationConfig) -> f32 {
        let cap = config.arrow_speed_cap_for(self.shooter_class);
        let velocity = self.heading * self.speed;
        let component = velocity.x.abs().max(velocity.y.abs());
        (config.arrow_damage * component / cap).max(1.0)
    }

    pub fn mark_impact(&mut self) {
        self.state = ArrowState::Impact;
    }

    pub fn mark_removed(&mut self) {
        self.state = ArrowState::Removed;
    }
}

impl Collider for Arrow {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn hit_box(&self) -> &Polygon {
        &self.hit_box
    }
}
