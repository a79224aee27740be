//! Tick orchestration
//!
//! One call to `advance` runs the whole fixed-order frame: arrows move and
//! may impact, soldiers act, the newly dead migrate to the corpse
//! collection, spent arrows and faded corpses are purged. The order
//! guarantees an arrow can move and impact within the same tick it was
//! advanced, and that damage applied this tick is visible to every later
//! targeting decision.

use crate::combat::attack::{resolve_attack, wants_to_attack, AttackAction};
use crate::combat::targeting::get_closest;
use crate::core::random::{chance, jitter};
use crate::core::types::{Allegiance, ArrowId, SoldierId};
use crate::entity::arrow::Arrow;
use crate::entity::soldier::WeaponMode;
use crate::simulation::context::{Corpse, SimulationContext};
use crate::simulation::events::BattleEvent;

impl SimulationContext {
    /// Advance the battle one fixed step.
    ///
    /// `delta_time` is informational for host-loop compatibility; the
    /// simulation always steps by `config.tick_seconds`.
    pub fn advance(&mut self, _delta_time: f32) -> Vec<BattleEvent> {
        self.tick += 1;
        let mut events = Vec::new();

        self.rebuild_spatial_hashes();
        self.advance_arrows(&mut events);
        self.update_soldiers(&mut events);
        self.sweep_dead(&mut events);
        self.purge_removed(&mut events);

        events
    }

    /// Phase 1: every live arrow moves, then checks collision against the
    /// roster opposing its shooter, then the playfield bounds.
    fn advance_arrows(&mut self, events: &mut Vec<BattleEvent>) {
        let config = self.config.clone();

        for i in 0..self.arrows.len() {
            if !self.arrows[i].in_flight() {
                continue;
            }
            self.arrows[i].advance(&config);

            if self.arrows[i].is_removed() {
                // Drag spent it mid-air
                events.push(BattleEvent::ArrowRemoved {
                    arrow: self.arrows[i].id,
                });
                continue;
            }

            let rival_side = self.arrows[i].allegiance.rival();
            let hit = {
                let arrow = &self.arrows[i];
                let soldiers = &self.soldiers;
                let rivals: &[SoldierId] = match rival_side {
                    Allegiance::Player => &self.player_roster,
                    Allegiance::Enemy => &self.enemy_roster,
                };
                self.kernel
                    .query(
                        arrow,
                        None,
                        rivals,
                        |id| &soldiers[id.index()],
                        self.hash_for(rival_side),
                    )
                    .into_iter()
                    .find(|id| soldiers[id.index()].is_alive())
            };

            if let Some(target) = hit {
                let damage = self.arrows[i].impact_damage(&config);
                let arrow_id = self.arrows[i].id;
                self.soldiers[target.index()].apply_damage(damage);
                self.arrows[i].mark_impact();
                self.arrows[i].mark_removed();
                events.push(BattleEvent::ArrowImpact {
                    arrow: arrow_id,
                    target,
                    damage,
                });
                events.push(BattleEvent::ArrowRemoved { arrow: arrow_id });
                tracing::debug!(
                    "arrow {:?} struck {:?} for {:.1} damage",
                    arrow_id,
                    target,
                    damage
                );
                continue;
            }

            if !self.arrows[i].in_bounds(&config) {
                let arrow_id = self.arrows[i].id;
                self.arrows[i].mark_removed();
                events.push(BattleEvent::ArrowRemoved { arrow: arrow_id });
            }
        }
    }

    /// Phase 2: per-soldier updates. Movement first so the spatial hashes
    /// can re-hash before any collision-driven interaction, then crowd
    /// shoving and probabilistic attack scheduling.
    fn update_soldiers(&mut self, events: &mut Vec<BattleEvent>) {
        let config = self.config.clone();
        let ids: Vec<SoldierId> = self
            .player_roster
            .iter()
            .chain(self.enemy_roster.iter())
            .copied()
            .collect();

        for &id in &ids {
            if !self.soldiers[id.index()].is_alive() {
                continue;
            }

            if chance(&mut self.rng, config.regen_one_in) {
                self.soldiers[id.index()].regenerate(1.0);
            }

            let allegiance = self.soldiers[id.index()].allegiance;
            let position = self.soldiers[id.index()].position;
            let rivals: &[SoldierId] = match allegiance.rival() {
                Allegiance::Player => &self.player_roster,
                Allegiance::Enemy => &self.enemy_roster,
            };
            let Some((nearest, distance)) = get_closest(position, rivals, &self.soldiers) else {
                continue;
            };

            let target_position = self.soldiers[nearest.index()].position;
            let soldier = &mut self.soldiers[id.index()];
            soldier.face_toward(target_position);
            if soldier.weapon == WeaponMode::Melee && distance >= config.melee_range {
                soldier.advance_toward(target_position, &config);
            }
        }

        // Positions changed above; members re-hash before collision queries
        self.rebuild_spatial_hashes();

        let mut in_flight = self.arrows.iter().filter(|a| a.in_flight()).count();
        for &id in &ids {
            if !self.soldiers[id.index()].is_alive() {
                continue;
            }
            let allegiance = self.soldiers[id.index()].allegiance;
            let rival_side = allegiance.rival();

            // Crowd pressure: occasionally shove a colliding rival sideways
            let touching = {
                let soldiers = &self.soldiers;
                let rivals: &[SoldierId] = match rival_side {
                    Allegiance::Player => &self.player_roster,
                    Allegiance::Enemy => &self.enemy_roster,
                };
                self.kernel.query(
                    &soldiers[id.index()],
                    None,
                    rivals,
                    |rid| &soldiers[rid.index()],
                    self.hash_for(rival_side),
                )
            };
            for rival in touching {
                if chance(&mut self.rng, config.shove_one_in) {
                    self.soldiers[rival.index()].position.y += 1.0;
                }
            }

            let has_living_rival = {
                let rivals: &[SoldierId] = match rival_side {
                    Allegiance::Player => &self.player_roster,
                    Allegiance::Enemy => &self.enemy_roster,
                };
                get_closest(self.soldiers[id.index()].position, rivals, &self.soldiers).is_some()
            };

            let unit_len = {
                let unit = self.soldiers[id.index()].unit;
                self.units[unit.index()].roster.len()
            };

            if !wants_to_attack(
                &self.soldiers[id.index()],
                unit_len,
                in_flight,
                has_living_rival,
                &config,
                &mut self.rng,
            ) {
                continue;
            }

            let resolution = {
                let rivals: &[SoldierId] = match rival_side {
                    Allegiance::Player => &self.player_roster,
                    Allegiance::Enemy => &self.enemy_roster,
                };
                resolve_attack(
                    &self.soldiers[id.index()],
                    rivals,
                    &self.soldiers,
                    &config,
                    &mut self.rng,
                )
            };

            self.soldiers[id.index()].weapon = resolution.weapon;
            if resolution.degrade_strength {
                self.soldiers[id.index()].degrade_strength();
            }

            match resolution.action {
                AttackAction::MeleeStrike { target, damage } => {
                    self.soldiers[id.index()].target = Some(target);
                    self.soldiers[target.index()].apply_damage(damage);
                    events.push(BattleEvent::MeleeStrike {
                        attacker: id,
                        target,
                        damage,
                    });
                    tracing::debug!(
                        "{:?} struck {:?} in melee for {:.1} damage",
                        id,
                        target,
                        damage
                    );
                }
                AttackAction::MeleeCommit { target } => {
                    self.soldiers[id.index()].target = Some(target);
                }
                AttackAction::Loose { target } => {
                    self.soldiers[id.index()].target = Some(target);
                    if self.soldiers[id.index()].consume_ammunition() {
                        let radius = config.arrow_accuracy_for(self.soldiers[id.index()].class);
                        let spread = jitter(&mut self.rng, radius);
                        let target_position = self.soldiers[target.index()].position;
                        let arrow = Arrow::launch(
                            ArrowId(self.next_arrow),
                            &self.soldiers[id.index()],
                            target_position,
                            spread,
                            &config,
                        );
                        self.next_arrow += 1;
                        events.push(BattleEvent::ArrowLaunched {
                            arrow: arrow.id,
                            shooter: id,
                            target,
                        });
                        self.arrows.push(arrow);
                        in_flight += 1;
                    }
                }
                AttackAction::Hold => {}
            }
        }
    }

    /// Phase 3: migrate the newly dead out of every roster into the corpse
    /// collection. Exactly one transition per soldier.
    fn sweep_dead(&mut self, events: &mut Vec<BattleEvent>) {
        let tick = self.tick;
        let newly_dead: Vec<SoldierId> = self
            .player_roster
            .iter()
            .chain(self.enemy_roster.iter())
            .copied()
            .filter(|id| {
                let soldier = &self.soldiers[id.index()];
                soldier.is_alive() && soldier.health() == 0.0
            })
            .collect();

        for id in newly_dead {
            self.soldiers[id.index()].mark_dead(tick);
            self.corpses.push(Corpse { soldier: id, since: tick });
            self.player_roster.retain(|&x| x != id);
            self.enemy_roster.retain(|&x| x != id);
            let unit = self.soldiers[id.index()].unit;
            self.units[unit.index()].roster.retain(|&x| x != id);
            events.push(BattleEvent::SoldierDied { soldier: id, tick });
            tracing::debug!("soldier {:?} fell on tick {}", id, tick);
        }
    }

    /// Phase 4: drop removed arrows and fade out old corpses
    fn purge_removed(&mut self, events: &mut Vec<BattleEvent>) {
        self.arrows.retain(|arrow| !arrow.is_removed());

        let fade = self.config.corpse_fade_ticks;
        let tick = self.tick;
        let mut faded = Vec::new();
        self.corpses.retain(|corpse| {
            if tick.saturating_sub(corpse.since) >= fade {
                faded.push(corpse.soldier);
                false
            } else {
                true
            }
        });
        for id in faded {
            self.soldiers[id.index()].mark_removed();
            events.push(BattleEvent::CorpseFaded { soldier: id });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::Vec2;
    use crate::formation::template::FormationTemplate;
    use crate::simulation::events::BattleOutcome;

    /// Rates high enough that every eligible soldier attacks every tick
    fn eager_config() -> SimulationConfig {
        SimulationConfig {
            attack_rate_archer: 1000.0,
            attack_rate_infantry: 1000.0,
            ..Default::default()
        }
    }

    fn single(code: u8) -> FormationTemplate {
        FormationTemplate::new(vec![vec![code]]).unwrap()
    }

    #[test]
    fn test_melee_battle_two_on_one() {
        let mut ctx = SimulationContext::with_seed(eager_config(), 7).unwrap();
        // Two player infantry in melee reach of one enemy
        ctx.spawn_unit(
            FormationTemplate::new(vec![vec![1, 1]]).unwrap(),
            Allegiance::Player,
            Vec2::new(100.0, 100.0),
        );
        ctx.spawn_unit(single(1), Allegiance::Enemy, Vec2::new(100.0, 115.0));

        let mut saw_melee = false;
        for _ in 0..100 {
            let events = ctx.advance(1.0 / 60.0);
            saw_melee |= events
                .iter()
                .any(|e| matches!(e, BattleEvent::MeleeStrike { .. }));
            if ctx.outcome() != BattleOutcome::InProgress {
                break;
            }
        }

        assert!(saw_melee);
        assert_eq!(
            ctx.outcome(),
            BattleOutcome::Victory {
                winner: Allegiance::Player
            }
        );
        assert_eq!(ctx.corpses().len(), 1);
        assert!(ctx.roster(Allegiance::Enemy).is_empty());
    }

    #[test]
    fn test_death_migrates_to_corpses_same_tick() {
        let mut ctx = SimulationContext::with_seed(SimulationConfig::default(), 7).unwrap();
        ctx.spawn_unit(single(1), Allegiance::Player, Vec2::new(100.0, 100.0));
        ctx.spawn_unit(single(1), Allegiance::Enemy, Vec2::new(400.0, 800.0));
        let victim = ctx.roster(Allegiance::Enemy)[0];

        ctx.soldiers[victim.index()].apply_damage(150.0);
        let events = ctx.advance(1.0 / 60.0);

        assert!(events
            .iter()
            .any(|e| matches!(e, BattleEvent::SoldierDied { soldier, .. } if *soldier == victim)));
        assert!(ctx.roster(Allegiance::Enemy).is_empty());
        assert_eq!(ctx.corpses().len(), 1);
        assert_eq!(ctx.corpses()[0].soldier, victim);
        assert!(!ctx.soldier(victim).is_alive());
        // The victim's unit roster is pruned too
        assert!(ctx.unit(ctx.soldier(victim).unit).roster.is_empty());
    }

    #[test]
    fn test_dead_soldiers_invisible_to_targeting_next_decision() {
        let mut ctx = SimulationContext::with_seed(SimulationConfig::default(), 7).unwrap();
        ctx.spawn_unit(single(1), Allegiance::Player, Vec2::new(100.0, 100.0));
        ctx.spawn_unit(single(1), Allegiance::Enemy, Vec2::new(400.0, 800.0));
        let victim = ctx.roster(Allegiance::Enemy)[0];

        ctx.soldiers[victim.index()].apply_damage(150.0);
        ctx.advance(1.0 / 60.0);

        let player = ctx.roster(Allegiance::Player)[0];
        let rivals = ctx.rival_roster(Allegiance::Player);
        assert!(get_closest(ctx.soldier(player).position, rivals, ctx.soldiers()).is_none());
    }

    #[test]
    fn test_archery_duel_runs_to_victory() {
        // Slow arrows so each flight step is smaller than a hit-box: no
        // tunneling, every volley connects while passing the target.
        let config = SimulationConfig {
            attack_rate_archer: 1000.0,
            attack_rate_infantry: 1000.0,
            arrow_speed_cap: 300.0,
            arrow_speed_cap_archer: 300.0,
            max_arrows_in_flight: 1,
            ..Default::default()
        };
        let mut ctx = SimulationContext::with_seed(config, 21).unwrap();
        ctx.spawn_unit(single(3), Allegiance::Player, Vec2::new(100.0, 100.0));
        // Unarmed rival out of melee reach: it can only stand and be shot
        ctx.spawn_unit(single(1), Allegiance::Enemy, Vec2::new(100.0, 140.0));

        let archer = ctx.roster(Allegiance::Player)[0];
        let mut saw_launch = false;
        let mut saw_impact = false;
        for _ in 0..5000 {
            let events = ctx.advance(1.0 / 60.0);
            for event in &events {
                match event {
                    BattleEvent::ArrowLaunched { .. } => saw_launch = true,
                    BattleEvent::ArrowImpact { damage, .. } => {
                        saw_impact = true;
                        assert!(*damage >= 1.0);
                    }
                    _ => {}
                }
            }
            assert!(ctx.arrows().len() <= ctx.config().max_arrows_in_flight);
            if ctx.outcome() != BattleOutcome::InProgress {
                break;
            }
        }

        assert!(saw_launch);
        assert!(saw_impact);
        assert_eq!(
            ctx.outcome(),
            BattleOutcome::Victory {
                winner: Allegiance::Player
            }
        );
        // Ammunition went at launch time
        assert!(ctx.soldier(archer).ammunition < 50);
    }

    #[test]
    fn test_stray_arrow_leaves_playfield() {
        let mut ctx = SimulationContext::with_seed(SimulationConfig::default(), 7).unwrap();
        ctx.spawn_unit(single(3), Allegiance::Player, Vec2::new(100.0, 870.0));
        let shooter = ctx.roster(Allegiance::Player)[0];

        // Hand-launched arrow aimed just shy of the top edge: it passes its
        // aim point and flies out of bounds with nothing to hit.
        let arrow = Arrow::launch(
            ArrowId(999),
            ctx.soldier(shooter),
            Vec2::new(100.0, 890.0),
            Vec2::default(),
            ctx.config(),
        );
        ctx.arrows.push(arrow);

        let mut removed = false;
        let mut impacted = false;
        for _ in 0..200 {
            let events = ctx.advance(1.0 / 60.0);
            for event in &events {
                match event {
                    BattleEvent::ArrowRemoved { .. } => removed = true,
                    BattleEvent::ArrowImpact { .. } => impacted = true,
                    _ => {}
                }
            }
            if ctx.arrows().is_empty() {
                break;
            }
        }

        assert!(removed);
        assert!(!impacted);
        assert!(ctx.arrows().is_empty());
    }

    #[test]
    fn test_corpse_fades_after_delay() {
        let config = SimulationConfig {
            corpse_fade_ticks: 5,
            ..Default::default()
        };
        let mut ctx = SimulationContext::with_seed(config, 7).unwrap();
        ctx.spawn_unit(single(1), Allegiance::Player, Vec2::new(100.0, 100.0));
        let victim = ctx.roster(Allegiance::Player)[0];

        ctx.soldiers[victim.index()].apply_damage(150.0);
        ctx.advance(1.0 / 60.0);
        assert_eq!(ctx.corpses().len(), 1);

        let mut faded = false;
        for _ in 0..6 {
            let events = ctx.advance(1.0 / 60.0);
            faded |= events
                .iter()
                .any(|e| matches!(e, BattleEvent::CorpseFaded { soldier } if *soldier == victim));
        }

        assert!(faded);
        assert!(ctx.corpses().is_empty());
        assert!(ctx.soldier(victim).is_removed());
    }

    #[test]
    fn test_health_stays_clamped_through_battle() {
        let mut ctx = SimulationContext::with_seed(eager_config(), 3).unwrap();
        ctx.spawn_unit(
            FormationTemplate::uniform(2, 4, 1).unwrap(),
            Allegiance::Player,
            Vec2::new(200.0, 100.0),
        );
        ctx.spawn_unit(
            FormationTemplate::uniform(2, 4, 1).unwrap(),
            Allegiance::Enemy,
            Vec2::new(200.0, 118.0),
        );

        for _ in 0..500 {
            ctx.advance(1.0 / 60.0);
            for soldier in ctx.soldiers() {
                assert!((0.0..=100.0).contains(&soldier.health()));
            }
            // Rosters never hold the dead after a sweep
            for &id in ctx.roster(Allegiance::Player).iter() {
                assert!(ctx.soldier(id).is_alive());
            }
            for &id in ctx.roster(Allegiance::Enemy).iter() {
                assert!(ctx.soldier(id).is_alive());
            }
            if ctx.outcome() != BattleOutcome::InProgress {
                break;
            }
        }
    }
}
