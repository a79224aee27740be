//! Simulation context: the owner of all battle state
//!
//! The context holds the soldier arena, both side rosters, the corpse
//! collection, and every in-flight arrow. Soldiers and arrows refer to each
//! other by id, never by pointer, so there are no ownership cycles: a unit's
//! "rival roster" is just the opposing side's roster looked up through the
//! context. Everything that needs randomness draws from the context's seeded
//! ChaCha8 stream, so whole battles replay deterministically from a seed.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::{CollisionStrategy, SimulationConfig};
use crate::core::error::Result;
use crate::core::types::{Allegiance, SoldierId, Tick, UnitId, Vec2};
use crate::entity::arrow::Arrow;
use crate::entity::soldier::Soldier;
use crate::formation::builder::place_formation;
use crate::formation::template::FormationTemplate;
use crate::simulation::events::BattleOutcome;
use crate::spatial::collision::CollisionKernel;
use crate::spatial::geometry::Collider;
use crate::spatial::hash::SpatialHash;

/// A formation of soldiers fighting for one side
#[derive(Debug, Clone)]
pub struct Unit {
    pub id: UnitId,
    pub allegiance: Allegiance,
    /// Live members in placement order, pruned as soldiers die
    pub roster: Vec<SoldierId>,
    pub template: FormationTemplate,
}

/// A dead soldier awaiting fade-out
#[derive(Debug, Clone, Copy)]
pub struct Corpse {
    pub soldier: SoldierId,
    pub since: Tick,
}

pub struct SimulationContext {
    pub(crate) config: SimulationConfig,
    pub(crate) kernel: CollisionKernel,
    pub(crate) soldiers: Vec<Soldier>,
    pub(crate) units: Vec<Unit>,
    pub(crate) player_roster: Vec<SoldierId>,
    pub(crate) enemy_roster: Vec<SoldierId>,
    pub(crate) corpses: Vec<Corpse>,
    pub(crate) arrows: Vec<Arrow>,
    pub(crate) next_arrow: u32,
    pub(crate) player_hash: SpatialHash<SoldierId>,
    pub(crate) enemy_hash: SpatialHash<SoldierId>,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) tick: Tick,
}

impl SimulationContext {
    /// Context with a randomly seeded RNG stream
    pub fn new(config: SimulationConfig) -> Result<Self> {
        Self::from_rng(config, ChaCha8Rng::from_entropy())
    }

    /// Deterministic context for replays and tests
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Result<Self> {
        Self::from_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(config: SimulationConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let cell_size = config.collision_cell_size;
        Ok(Self {
            kernel: CollisionKernel::from_config(&config),
            config,
            soldiers: Vec::new(),
            units: Vec::new(),
            player_roster: Vec::new(),
            enemy_roster: Vec::new(),
            corpses: Vec::new(),
            arrows: Vec::new(),
            next_arrow: 0,
            player_hash: SpatialHash::new(cell_size),
            enemy_hash: SpatialHash::new(cell_size),
            rng,
            tick: 0,
        })
    }

    /// Build a unit from a template and register its soldiers.
    ///
    /// The template was validated at construction, so placement cannot fail.
    pub fn spawn_unit(
        &mut self,
        template: FormationTemplate,
        allegiance: Allegiance,
        anchor: Vec2,
    ) -> UnitId {
        let unit_id = UnitId(self.units.len() as u32);
        let placements =
            place_formation(&template, allegiance, anchor, self.config.soldier_spacing);

        let mut roster = Vec::with_capacity(placements.len());
        for (class, position) in placements {
            let id = SoldierId(self.soldiers.len() as u32);
            self.soldiers.push(Soldier::new(
                id,
                unit_id,
                allegiance,
                class,
                position,
                &self.config,
            ));
            roster.push(id);
            self.roster_mut(allegiance).push(id);
        }

        tracing::info!(
            "Spawned {:?} unit {:?} with {} soldiers at ({}, {})",
            allegiance,
            unit_id,
            roster.len(),
            anchor.x,
            anchor.y
        );

        self.units.push(Unit {
            id: unit_id,
            allegiance,
            roster,
            template,
        });
        unit_id
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tick(&self) -> Tick {
        self.tick
    }

    pub fn soldiers(&self) -> &[Soldier] {
        &self.soldiers
    }

    pub fn soldier(&self, id: SoldierId) -> &Soldier {
        &self.soldiers[id.index()]
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        &self.units[id.index()]
    }

    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn corpses(&self) -> &[Corpse] {
        &self.corpses
    }

    /// Live roster for one side
    pub fn roster(&self, allegiance: Allegiance) -> &[SoldierId] {
        match allegiance {
            Allegiance::Player => &self.player_roster,
            Allegiance::Enemy => &self.enemy_roster,
        }
    }

    /// The roster a member of `allegiance` fights against
    pub fn rival_roster(&self, allegiance: Allegiance) -> &[SoldierId] {
        self.roster(allegiance.rival())
    }

    pub(crate) fn roster_mut(&mut self, allegiance: Allegiance) -> &mut Vec<SoldierId> {
        match allegiance {
            Allegiance::Player => &mut self.player_roster,
            Allegiance::Enemy => &mut self.enemy_roster,
        }
    }

    /// Spatial index over one side's roster, when the strategy keeps one
    pub(crate) fn hash_for(&self, allegiance: Allegiance) -> Option<&SpatialHash<SoldierId>> {
        if !matches!(
            self.config.collision_strategy,
            CollisionStrategy::SpatialHash | CollisionStrategy::Auto
        ) {
            return None;
        }
        Some(match allegiance {
            Allegiance::Player => &self.player_hash,
            Allegiance::Enemy => &self.enemy_hash,
        })
    }

    /// Re-hash both rosters. Members must re-hash on every position change,
    /// so the tick rebuilds after each movement phase.
    pub(crate) fn rebuild_spatial_hashes(&mut self) {
        if !matches!(
            self.config.collision_strategy,
            CollisionStrategy::SpatialHash | CollisionStrategy::Auto
        ) {
            return;
        }
        let soldiers = &self.soldiers;
        self.player_hash.rebuild(
            self.player_roster
                .iter()
                .map(|&id| (id, soldiers[id.index()].aabb())),
        );
        self.enemy_hash.rebuild(
            self.enemy_roster
                .iter()
                .map(|&id| (id, soldiers[id.index()].aabb())),
        );
    }

    /// Battle outcome from the live rosters
    pub fn outcome(&self) -> BattleOutcome {
        match (self.player_roster.is_empty(), self.enemy_roster.is_empty()) {
            (false, false) => BattleOutcome::InProgress,
            (true, true) => BattleOutcome::Stalemate,
            (false, true) => BattleOutcome::Victory {
                winner: Allegiance::Player,
            },
            (true, false) => BattleOutcome::Victory {
                winner: Allegiance::Enemy,
            },
        }
    }
}
