//! Colony demonstration: critters graze a grass field while flora regrows it.
//!
//! Run with: cargo run --example colony_demo

use loam_sim::{
    Actor, ActorId, ActorKind, BiMap, GameMode, Grid, SimConfig, SimWorld, TickHook, Tile,
    TileCoord, TileKind, TileOptions, TileRule, Verdict,
};
use std::sync::Arc;

const WIDTH: i32 = 16;
const HEIGHT: i32 = 12;

/// Keeps the pond permanent and re-derives flags from the committed kind.
struct Fertility;

impl TileRule for Fertility {
    fn before_commit(&self, tile: &mut Tile, proposed: &mut TileOptions) {
        if tile.kind == TileKind::Water {
            proposed.kind = TileKind::Water;
            return;
        }
        tile.blocked = proposed.kind.default_blocked();
        tile.has_food = proposed.kind.grows_food();
    }
}

/// Host context the actors and hooks mutate.
struct Colony {
    grid: Arc<Grid>,
    /// Spawn sites queued by hooks; the host registers critters for them
    /// between steps.
    spawn_requests: Vec<TileCoord>,
    grazed: u32,
    regrown: u32,
    ticks: u64,
}

impl GameMode for Colony {
    fn init(&mut self) {
        println!("Colony founded on a {}x{} field.\n", WIDTH, HEIGHT);
    }

    fn update(&mut self, _dt: f32) {
        self.ticks += 1;
    }

    fn shutdown(&mut self) {
        println!(
            "\nColony disbanded: {} tiles grazed, {} regrown.",
            self.grazed, self.regrown
        );
    }
}

fn main() {
    env_logger::init();

    println!("=== Loam - Colony Demo ===\n");

    let grid = Arc::new(Grid::with_rule(
        WIDTH,
        HEIGHT,
        TileKind::Grass,
        Arc::new(Fertility),
    ));
    // A small pond. The rule keeps it in place from here on.
    for (x, y) in [(5, 4), (6, 4), (5, 5), (6, 5)] {
        grid.set(TileCoord::new(x, y), |options| {
            options.kind = TileKind::Water
        });
    }
    // Run every tile through the rule once so the field starts fertile.
    grid.set_all(|_options| {});

    let hooks: Vec<TickHook<Colony>> = vec![Box::new(|colony, _dt| {
        if colony.ticks % 8 == 0 {
            let x = (colony.ticks as i32) % WIDTH;
            colony.spawn_requests.push(TileCoord::new(x, 0));
        }
    })];
    let config = SimConfig {
        fixed_timestep: 0.05,
        action_budget: 6,
        ..Default::default()
    };
    let mut world = SimWorld::with_grid(config, hooks, Arc::clone(&grid));

    let mut colony = Colony {
        grid,
        spawn_requests: Vec::new(),
        grazed: 0,
        regrown: 0,
        ticks: 0,
    };
    world.start(&mut colony);

    let mut labels: BiMap<u64, String> = BiMap::new();
    let mut next_id = 0u64;
    for _ in 0..4 {
        let at = TileCoord::new((next_id as i32) * 3 + 1, HEIGHT - 2);
        world.register(critter(next_id, at));
        labels
            .insert(next_id, format!("drifter-{}", next_id))
            .unwrap();
        next_id += 1;
    }
    world.register(flora(1000, TileCoord::new(4, 4)));
    world.register(flora(1001, TileCoord::new(10, 7)));

    println!("Running 120 ticks at 20 ticks/sec...\n");
    for frame in 0..120 {
        world.step(&mut colony, 0.05);

        // Honor hook spawn requests between steps.
        for at in std::mem::take(&mut colony.spawn_requests) {
            if world.register(critter(next_id, at)) {
                labels
                    .insert(next_id, format!("drifter-{}", next_id))
                    .unwrap();
                next_id += 1;
            }
        }

        if frame == 60 {
            println!("--- Dry season: exposed dirt bakes to sand ---\n");
            colony.grid.set_all(|options| {
                if options.kind == TileKind::Dirt {
                    options.kind = TileKind::Sand;
                }
            });
        }

        if (frame + 1) % 24 == 0 {
            print_status(&world, &colony);
        }
    }

    println!("\n--- Survivors ---");
    let mut survivors: Vec<(u64, TileCoord)> = world
        .active(ActorKind::Critter)
        .map(|state| (state.id().0, state.position))
        .collect();
    survivors.sort_unstable_by_key(|(id, _)| *id);
    for (id, at) in survivors {
        match labels.get_by_left(&id) {
            Some(name) => println!("  {} at ({}, {})", name, at.x, at.y),
            None => println!("  critter {} at ({}, {})", id, at.x, at.y),
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    println!("{}", world.snapshot().to_json_pretty().unwrap());

    world.shutdown(&mut colony);
}

/// Grazer: eats the food underfoot, otherwise drifts to a walkable
/// neighbor. Runs behind the flora in the schedule.
fn critter(id: u64, at: TileCoord) -> Actor<Colony> {
    Actor::new(ActorId(id), ActorKind::Critter, at, |state, colony: &mut Colony, _dt| {
        let here = state.position;
        match colony.grid.get(here) {
            Some(tile) if tile.has_food => {
                colony.grid.set(here, |options| options.kind = TileKind::Dirt);
                colony.grazed += 1;
            }
            _ => {
                let next = wander(here, state.id().0, colony.ticks);
                if colony.grid.get(next).map_or(false, |tile| !tile.blocked) {
                    state.position = next;
                }
            }
        }
        Verdict::Continue(1)
    })
    .with_priority(1)
}

/// Gardener: turns one bare neighbor back to grass per turn. Scheduled
/// ahead of the critters so regrowth never starves under budget pressure.
fn flora(id: u64, at: TileCoord) -> Actor<Colony> {
    Actor::new(ActorId(id), ActorKind::Flora, at, |state, colony: &mut Colony, _dt| {
        let here = state.position;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let coord = TileCoord::new(here.x + dx, here.y + dy);
                if coord.x < 0 || coord.x >= WIDTH || coord.y < 0 || coord.y >= HEIGHT {
                    continue;
                }
                if colony
                    .grid
                    .get(coord)
                    .map_or(false, |tile| tile.kind == TileKind::Dirt)
                {
                    colony.grid.set(coord, |options| options.kind = TileKind::Grass);
                    colony.regrown += 1;
                    return Verdict::Continue(0);
                }
            }
        }
        Verdict::Continue(0)
    })
}

fn wander(from: TileCoord, seed: u64, tick: u64) -> TileCoord {
    let roll = seed.wrapping_mul(0x9E37_79B9).wrapping_add(tick);
    let (dx, dy) = match roll % 4 {
        0 => (1, 0),
        1 => (-1, 0),
        2 => (0, 1),
        _ => (0, -1),
    };
    TileCoord::new(
        (from.x + dx).clamp(0, WIDTH - 1),
        (from.y + dy).clamp(0, HEIGHT - 1),
    )
}

fn print_status(world: &SimWorld<Colony>, colony: &Colony) {
    println!(
        "--- Tick {} (t={:.1}s) ---",
        world.current_tick(),
        world.current_time()
    );
    println!(
        "  critters={} flora={} grazed={} regrown={}",
        world.count(ActorKind::Critter),
        world.count(ActorKind::Flora),
        colony.grazed,
        colony.regrown
    );
}
