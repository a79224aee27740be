//! Grid placement for formation templates
//!
//! Placement is pure: template + allegiance + anchor + spacing in, ordered
//! (class, position) placements out. The simulation context turns
//! placements into arena soldiers when a unit is spawned.

use crate::core::types::{Allegiance, SoldierClass, Vec2};
use crate::formation::template::FormationTemplate;

/// Compute soldier placements for a template.
///
/// Columns are centered on the anchor so the block is symmetric about x.
/// Row 0 is the front line at the anchor; deeper rows extend away from the
/// direction the allegiance faces. Empty cells place nothing.
pub fn place_formation(
    template: &FormationTemplate,
    allegiance: Allegiance,
    anchor: Vec2,
    spacing: f32,
) -> Vec<(SoldierClass, Vec2)> {
    let mut placements = Vec::with_capacity(template.soldier_count());
    let half_span = (template.columns().saturating_sub(1)) as f32 / 2.0;

    for row in 0..template.rows() {
        for col in 0..template.columns() {
            let Some(class) = template.class_at(row, col) else {
                continue;
            };
            let position = Vec2::new(
                anchor.x + (col as f32 - half_span) * spacing,
                anchor.y - allegiance.facing() * row as f32 * spacing,
            );
            placements.push((class, position));
        }
    }

    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_template_places_every_cell() {
        let template = FormationTemplate::new(vec![vec![1, 2, 3], vec![3, 2, 1]]).unwrap();
        let placements =
            place_formation(&template, Allegiance::Player, Vec2::new(0.0, 0.0), 10.0);

        assert_eq!(placements.len(), 6);
        assert_eq!(placements[0].0, SoldierClass::LightInfantry);
        assert_eq!(placements[1].0, SoldierClass::HeavyInfantry);
        assert_eq!(placements[2].0, SoldierClass::Archer);
        assert_eq!(placements[3].0, SoldierClass::Archer);
    }

    #[test]
    fn test_single_cell_lands_on_anchor() {
        let template = FormationTemplate::new(vec![vec![1]]).unwrap();
        let placements =
            place_formation(&template, Allegiance::Player, Vec2::new(100.0, 100.0), 10.0);

        assert_eq!(placements.len(), 1);
        assert_eq!(placements[0].0, SoldierClass::LightInfantry);
        assert_eq!(placements[0].1, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_block_is_symmetric_about_anchor_x() {
        let template = FormationTemplate::uniform(2, 5, 1).unwrap();
        let anchor = Vec2::new(650.0, 250.0);
        let placements = place_formation(&template, Allegiance::Player, anchor, 10.0);

        let mean_x: f32 =
            placements.iter().map(|(_, p)| p.x).sum::<f32>() / placements.len() as f32;
        assert!((mean_x - anchor.x).abs() < 1e-3);

        let min_x = placements.iter().map(|(_, p)| p.x).fold(f32::MAX, f32::min);
        let max_x = placements.iter().map(|(_, p)| p.x).fold(f32::MIN, f32::max);
        assert!((anchor.x - min_x - (max_x - anchor.x)).abs() < 1e-3);
    }

    #[test]
    fn test_depth_extends_away_from_facing() {
        let template = FormationTemplate::uniform(3, 1, 1).unwrap();

        // Player faces +y: deeper rows sit below the anchor
        let player = place_formation(&template, Allegiance::Player, Vec2::new(0.0, 250.0), 10.0);
        assert_eq!(player[0].1.y, 250.0);
        assert_eq!(player[1].1.y, 240.0);
        assert_eq!(player[2].1.y, 230.0);

        // Enemy faces -y: deeper rows sit above the anchor
        let enemy = place_formation(&template, Allegiance::Enemy, Vec2::new(0.0, 800.0), 10.0);
        assert_eq!(enemy[0].1.y, 800.0);
        assert_eq!(enemy[1].1.y, 810.0);
        assert_eq!(enemy[2].1.y, 820.0);
    }

    #[test]
    fn test_empty_cells_and_empty_template() {
        let template = FormationTemplate::new(vec![vec![1, 0, 1]]).unwrap();
        let placements =
            place_formation(&template, Allegiance::Player, Vec2::new(0.0, 0.0), 10.0);
        assert_eq!(placements.len(), 2);
        // The gap stays a gap: outer columns only
        assert_eq!(placements[0].1.x, -10.0);
        assert_eq!(placements[1].1.x, 10.0);

        let empty = FormationTemplate::new(vec![]).unwrap();
        assert!(place_formation(&empty, Allegiance::Player, Vec2::default(), 10.0).is_empty());
    }
}
