//! Headless симуляция арены
//!
//! Земля + игрок + AI агенты, N кадров без рендера, в конце сводка по живым/мёртвым.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use arena_simulation::{
    create_headless_app, log_info, spawn_character, spawn_obstacle, AmmoKind, Behavior,
    CharacterDied, CharacterKind, CharacterStatus, CombatState, ProjectilePool, SimulationPlugin,
};

const SEED: u64 = 42;
const AI_AGENTS: usize = 4;
const FRAMES: u32 = 3_600;

/// Счётчик смертей за прогон
#[derive(Resource, Default)]
struct KillCount(u32);

fn count_deaths(mut deaths: EventReader<CharacterDied>, mut kills: ResMut<KillCount>) {
    kills.0 += deaths.read().count() as u32;
}

fn main() {
    let mut app = create_headless_app(SEED);
    app.add_plugins(SimulationPlugin)
        .init_resource::<KillCount>()
        .add_systems(Last, count_deaths);

    log_info(&format!("Starting headless arena simulation (seed: {})", SEED));

    let world = app.world_mut();
    spawn_obstacle(world, Collider::cuboid(50.0, 0.5, 50.0), Transform::from_xyz(0.0, -0.5, 0.0));

    let mut characters = Vec::new();
    for kind in std::iter::once(CharacterKind::Player)
        .chain(std::iter::repeat(CharacterKind::AIAgent).take(AI_AGENTS))
    {
        match spawn_character(world, kind) {
            Ok(entity) => characters.push(entity),
            Err(err) => {
                log_info(&format!("Spawn failed: {}", err));
                return;
            }
        }
    }

    for frame in 0..FRAMES {
        app.update();

        if frame % 600 == 0 {
            let world = app.world_mut();
            let alive = world
                .query::<&CombatState>()
                .iter(world)
                .filter(|state| state.is_alive())
                .count();
            let in_flight = world.resource::<ProjectilePool>().active_count(AmmoKind::Bullet);
            log_info(&format!("Frame {}: {} alive, {} bullets in flight", frame, alive, in_flight));
        }
    }

    let world = app.world_mut();
    for entity in &characters {
        let Some(status) = CharacterStatus::of(world, *entity) else {
            continue;
        };
        let role = match world.get::<Behavior>(*entity) {
            Some(Behavior::Player(_)) => "player",
            _ => "ai",
        };
        log_info(&format!(
            "{:?} ({}): health {:.0}/{:.0}, ammo {:?}",
            entity,
            role,
            status.health,
            status.max_health,
            status.weapon.map(|weapon| weapon.ammo)
        ));
    }

    log_info(&format!(
        "Simulation complete: {} frames, {} deaths",
        FRAMES,
        world.resource::<KillCount>().0
    ));
}
