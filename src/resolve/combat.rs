//! Melee combat between adjacent units.
//!
//! An attacker hits the adjacent enemy with the fewest hit points, reading
//! order breaking ties. A unit whose hit points fall to zero or below is
//! removed from the grid at once, so it cannot act or be hit again later in
//! the same round.

use tracing::debug;

use crate::board::{by_hit_points_then_reading_order, GridWorld, Position, UnitId};

/// The result of a single attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: UnitId,
    pub target: UnitId,
    pub damage: i32,
    /// Hit points the target has left; zero or below means it died.
    pub remaining: i32,
    pub killed: bool,
}

/// Living enemies on the four tiles around `id`.
pub fn adjacent_enemies(world: &GridWorld, id: UnitId) -> Vec<UnitId> {
    let unit = world.unit(id);
    unit.position
        .neighbors()
        .filter_map(|p: Position| world.unit_at(p))
        .filter(|&other| world.unit(other).is_enemy_of(unit))
        .collect()
}

/// Returns true if any living enemy stands next to `id`.
pub fn has_adjacent_enemy(world: &GridWorld, id: UnitId) -> bool {
    let unit = world.unit(id);
    unit.position
        .neighbors()
        .filter_map(|p| world.unit_at(p))
        .any(|other| world.unit(other).is_enemy_of(unit))
}

/// Picks which adjacent enemy `id` would attack.
pub fn choose_target(world: &GridWorld, id: UnitId) -> Option<UnitId> {
    adjacent_enemies(world, id)
        .into_iter()
        .min_by(|&a, &b| by_hit_points_then_reading_order(world.unit(a), world.unit(b)))
}

/// Attacks the chosen adjacent enemy, if there is one.
///
/// Returns `None` when no enemy is adjacent; that is a normal outcome.
pub fn attack(world: &mut GridWorld, id: UnitId) -> Option<AttackReport> {
    let target = choose_target(world, id)?;
    let damage = world.attack_power(world.unit(id).faction);
    let remaining = world.damage_unit(target, damage);
    let killed = remaining <= 0;
    if killed {
        world.remove_unit(target);
        debug!(
            attacker = id,
            victim = target,
            at = %world.unit(target).position,
            "unit killed"
        );
    }
    Some(AttackReport {
        attacker: id,
        target,
        damage,
        remaining,
        killed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Faction, INITIAL_HIT_POINTS};
    use crate::protocol::map::parse_map;

    /// E in the middle of four goblins.
    const SURROUNDED: &str = "\
#####
##G##
#GEG#
##G##
#####
";

    fn set_hp(world: &mut GridWorld, id: UnitId, hp: i32) {
        let current = world.unit(id).hit_points;
        world.damage_unit(id, current - hp);
    }

    #[test]
    fn finds_all_adjacent_enemies() {
        let world = parse_map(SURROUNDED).unwrap();
        let e = world.unit_at(Position::new(2, 2)).unwrap();
        let mut enemies = adjacent_enemies(&world, e);
        enemies.sort();
        assert_eq!(enemies.len(), 4);
        assert!(has_adjacent_enemy(&world, e));
    }

    #[test]
    fn friends_are_not_enemies() {
        let world = parse_map("#####\n#EE.#\n#####\n").unwrap();
        assert!(adjacent_enemies(&world, 0).is_empty());
        assert!(!has_adjacent_enemy(&world, 0));
        assert_eq!(choose_target(&world, 0), None);
    }

    #[test]
    fn lowest_hit_points_wins() {
        let mut world = parse_map(SURROUNDED).unwrap();
        let e = world.unit_at(Position::new(2, 2)).unwrap();
        let down = world.unit_at(Position::new(2, 3)).unwrap();
        set_hp(&mut world, down, 50);
        assert_eq!(choose_target(&world, e), Some(down));
    }

    #[test]
    fn ties_go_to_reading_order() {
        let mut world = parse_map(SURROUNDED).unwrap();
        let e = world.unit_at(Position::new(2, 2)).unwrap();
        let left = world.unit_at(Position::new(1, 2)).unwrap();
        let right = world.unit_at(Position::new(3, 2)).unwrap();
        let down = world.unit_at(Position::new(2, 3)).unwrap();
        set_hp(&mut world, left, 9);
        set_hp(&mut world, right, 9);
        set_hp(&mut world, down, 9);
        assert_eq!(choose_target(&world, e), Some(left));

        let up = world.unit_at(Position::new(2, 1)).unwrap();
        set_hp(&mut world, up, 9);
        assert_eq!(choose_target(&world, e), Some(up));
    }

    #[test]
    fn attack_applies_faction_power() {
        let mut world = parse_map("####\n#EG#\n####\n").unwrap();
        world.set_attack_power(Faction::A, 15);

        let report = attack(&mut world, 0).unwrap();
        assert_eq!(report.target, 1);
        assert_eq!(report.damage, 15);
        assert_eq!(world.unit(1).hit_points, INITIAL_HIT_POINTS - 15);
        assert!(!report.killed);

        let report = attack(&mut world, 1).unwrap();
        assert_eq!(report.damage, 3);
        assert_eq!(world.unit(0).hit_points, INITIAL_HIT_POINTS - 3);
    }

    #[test]
    fn lethal_attack_removes_target_immediately() {
        let mut world = parse_map("#####\n#EG.#\n#####\n").unwrap();
        set_hp(&mut world, 1, 3);

        let report = attack(&mut world, 0).unwrap();
        assert!(report.killed);
        assert_eq!(report.remaining, 0);
        assert!(!world.unit(1).alive);
        assert_eq!(world.unit_at(Position::new(2, 1)), None);
        assert!(world.is_free(Position::new(2, 1)));
        assert_eq!(attack(&mut world, 0), None);
    }

    #[test]
    fn overkill_still_removes() {
        let mut world = parse_map("####\n#EG#\n####\n").unwrap();
        world.set_attack_power(Faction::A, 500);
        let report = attack(&mut world, 0).unwrap();
        assert!(report.killed);
        assert!(report.remaining < 0);
        assert_eq!(world.winner(), Some(Faction::A));
    }

    #[test]
    fn no_enemy_no_attack() {
        let mut world = parse_map("######\n#E..G#\n######\n").unwrap();
        assert_eq!(attack(&mut world, 0), None);
        assert_eq!(world.unit(1).hit_points, INITIAL_HIT_POINTS);
    }
}
