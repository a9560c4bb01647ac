//! Randomized checks of movement and bookkeeping.
//!
//! Movement is compared against a brute-force reference that computes
//! all-pairs shortest paths with Floyd-Warshall and applies reading order
//! by sorting, on many seeded random grids.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use bandits::board::{Faction, GridWorld, Position, Tile, UnitId};
use bandits::engine::{SimConfig, SimError, Simulation};
use bandits::movegen::{choose_target, next_step};

const INF: usize = usize::MAX / 4;

/// Builds a walled rectangle with random interior walls and units.
fn random_world(rng: &mut SmallRng) -> GridWorld {
    let width = rng.gen_range(4..10);
    let height = rng.gen_range(4..10);
    let mut world = GridWorld::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let border = x == 0 || y == 0 || x == width - 1 || y == height - 1;
            if border || rng.gen_bool(0.2) {
                world.set_tile(Position::new(x, y), Tile::Wall);
            }
        }
    }
    for y in 1..height - 1 {
        for x in 1..width - 1 {
            if rng.gen_bool(0.15) {
                let faction = if rng.gen_bool(0.5) { Faction::A } else { Faction::B };
                world.spawn_unit(faction, Position::new(x, y));
            }
        }
    }
    world
}

/// Reference step choice: `None` to stay, or the chosen target and step.
fn brute_force(world: &GridWorld, id: UnitId) -> Option<(Position, usize, Position)> {
    let unit = world.unit(id);
    let enemies: Vec<Position> = world
        .living_units()
        .filter(|u| u.faction != unit.faction)
        .map(|u| u.position)
        .collect();
    if enemies.iter().any(|&e| e.is_adjacent(unit.position)) {
        return None;
    }

    let mut cells = Vec::new();
    for y in 0..world.height() {
        for x in 0..world.width() {
            let p = Position::new(x, y);
            if world.is_free(p) {
                cells.push(p);
            }
        }
    }
    let n = cells.len();
    let mut d = vec![vec![INF; n]; n];
    for i in 0..n {
        d[i][i] = 0;
        for j in 0..n {
            if cells[i].is_adjacent(cells[j]) {
                d[i][j] = 1;
            }
        }
    }
    for k in 0..n {
        for i in 0..n {
            for j in 0..n {
                if d[i][k] + d[k][j] < d[i][j] {
                    d[i][j] = d[i][k] + d[k][j];
                }
            }
        }
    }

    let first_steps: Vec<usize> = (0..n).filter(|&i| cells[i].is_adjacent(unit.position)).collect();
    let mut targets: Vec<(usize, usize, usize, usize)> = (0..n)
        .filter(|&t| enemies.iter().any(|&e| e.is_adjacent(cells[t])))
        .filter_map(|t| {
            let best = first_steps.iter().map(|&s| d[s][t]).min()?;
            (best < INF).then(|| (best + 1, cells[t].y, cells[t].x, t))
        })
        .collect();
    targets.sort();
    let &(dist, _, _, t) = targets.first()?;

    let mut steps: Vec<(usize, usize, usize, usize)> = first_steps
        .iter()
        .filter(|&&s| d[s][t] < INF)
        .map(|&s| (d[s][t], cells[s].y, cells[s].x, s))
        .collect();
    steps.sort();
    let &(_, _, _, s) = steps.first()?;
    Some((cells[t], dist, cells[s]))
}

#[test]
fn movement_matches_brute_force() {
    let mut checked = 0;
    for seed in 0..300 {
        let mut rng = SmallRng::seed_from_u64(seed);
        let world = random_world(&mut rng);
        for unit in world.living_units() {
            let expected = brute_force(&world, unit.id);
            let actual = next_step(&world, unit.id);
            assert_eq!(
                actual,
                expected.map(|(_, _, step)| step),
                "seed {} unit {}",
                seed,
                unit.id
            );
            if let Some((target, dist, _)) = expected {
                assert_eq!(choose_target(&world, unit.id), Some((target, dist)));
                checked += 1;
            }
        }
    }
    assert!(checked > 30, "too few moving units exercised: {}", checked);
}

/// Every living unit is indexed at its position and nothing else is.
fn assert_consistent(world: &GridWorld) {
    let mut occupied = 0;
    for y in 0..world.height() {
        for x in 0..world.width() {
            let p = Position::new(x, y);
            if let Some(id) = world.unit_at(p) {
                occupied += 1;
                let unit = world.unit(id);
                assert!(unit.alive);
                assert_eq!(unit.position, p);
                assert_eq!(world.tile_at(p), Tile::Open);
                assert!(unit.hit_points > 0);
            }
        }
    }
    assert_eq!(occupied, world.living_units().count());
}

#[test]
fn random_battles_keep_occupancy_consistent() {
    for seed in 0..100 {
        let mut rng = SmallRng::seed_from_u64(1000 + seed);
        let world = random_world(&mut rng);
        let ids_before: Vec<UnitId> = world.units().iter().map(|u| u.id).collect();

        let mut sim = Simulation::with_config(world, SimConfig { max_rounds: Some(300) });
        let result = sim.run_with_observer(|w, _| assert_consistent(w));
        assert_consistent(sim.world());

        let ids_after: Vec<UnitId> = sim.world().units().iter().map(|u| u.id).collect();
        assert_eq!(ids_before, ids_after, "ids must never be renumbered");
        for (i, unit) in sim.world().units().iter().enumerate() {
            assert_eq!(unit.id, i);
            assert_eq!(unit.alive, unit.hit_points > 0);
        }

        match result {
            Ok(outcome) => assert_eq!(sim.world().winner(), Some(outcome.winner)),
            Err(SimError::RoundLimit(_)) | Err(SimError::NoUnits) => {}
        }
    }
}

#[test]
fn random_battles_are_deterministic() {
    for seed in 0..50 {
        let mut rng = SmallRng::seed_from_u64(5000 + seed);
        let world = random_world(&mut rng);
        let config = SimConfig { max_rounds: Some(300) };
        let first = Simulation::with_config(world.clone(), config.clone()).run().ok();
        let second = Simulation::with_config(world, config).run().ok();
        assert_eq!(first, second, "seed {}", seed);
    }
}
