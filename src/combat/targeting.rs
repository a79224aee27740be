//! Distance-based target selection

use rand::Rng;

use crate::core::types::{SoldierId, Vec2};
use crate::entity::soldier::Soldier;

/// Nearest living roster member and its distance.
///
/// Linear scan; an empty roster (or one with no living members) yields
/// `None` and the caller simply skips its attack. Dead members can appear in
/// the roster transiently within a tick, before the sweep migrates them, so
/// they are filtered here rather than trusted away.
pub fn get_closest(
    from: Vec2,
    roster: &[SoldierId],
    soldiers: &[Soldier],
) -> Option<(SoldierId, f32)> {
    let mut best: Option<(SoldierId, f32)> = None;
    for &id in roster {
        let rival = &soldiers[id.index()];
        if !rival.is_alive() {
            continue;
        }
        let distance = from.distance(&rival.position);
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((id, distance));
        }
    }
    best
}

/// Uniformly random living roster member.
///
/// Ranged attacks deliberately aim at *any* living rival rather than the
/// nearest, which keeps unit fire spread out and imperfect.
pub fn random_living(
    rng: &mut impl Rng,
    roster: &[SoldierId],
    soldiers: &[Soldier],
) -> Option<SoldierId> {
    let living: Vec<SoldierId> = roster
        .iter()
        .copied()
        .filter(|id| soldiers[id.index()].is_alive())
        .collect();
    if living.is_empty() {
        return None;
    }
    Some(living[rng.gen_range(0..living.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::core::types::{Allegiance, SoldierClass, UnitId};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn soldier_at(id: u32, x: f32, y: f32) -> Soldier {
        Soldier::new(
            SoldierId(id),
            UnitId(0),
            Allegiance::Enemy,
            SoldierClass::LightInfantry,
            Vec2::new(x, y),
            &SimulationConfig::default(),
        )
    }

    #[test]
    fn test_closest_of_several() {
        let soldiers = vec![
            soldier_at(0, 500.0, 0.0),
            soldier_at(1, 50.0, 0.0),
            soldier_at(2, 100.0, 100.0),
        ];
        let roster = vec![SoldierId(0), SoldierId(1), SoldierId(2)];

        let (id, distance) = get_closest(Vec2::default(), &roster, &soldiers).unwrap();
        assert_eq!(id, SoldierId(1));
        assert!((distance - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_roster_yields_none() {
        assert!(get_closest(Vec2::default(), &[], &[]).is_none());
    }

    #[test]
    fn test_dead_members_are_skipped() {
        let mut soldiers = vec![soldier_at(0, 10.0, 0.0), soldier_at(1, 90.0, 0.0)];
        soldiers[0].apply_damage(200.0);
        soldiers[0].mark_dead(1);
        let roster = vec![SoldierId(0), SoldierId(1)];

        let (id, _) = get_closest(Vec2::default(), &roster, &soldiers).unwrap();
        assert_eq!(id, SoldierId(1));

        soldiers[1].mark_dead(1);
        assert!(get_closest(Vec2::default(), &roster, &soldiers).is_none());
    }

    #[test]
    fn test_random_living_skips_dead() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut soldiers = vec![soldier_at(0, 10.0, 0.0), soldier_at(1, 90.0, 0.0)];
        soldiers[0].mark_dead(1);
        let roster = vec![SoldierId(0), SoldierId(1)];

        for _ in 0..16 {
            assert_eq!(
                random_living(&mut rng, &roster, &soldiers),
                Some(SoldierId(1))
            );
        }

        soldiers[1].mark_dead(1);
        assert_eq!(random_living(&mut rng, &roster, &soldiers), None);
    }
}
