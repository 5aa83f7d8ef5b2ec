//! Спавн персонажей и препятствий в World

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::actor::behavior::{Behavior, PlayerIntent};
use crate::actor::components::{Character, CharacterBody, CharacterKind, Loadout};
use crate::ai::AiBrain;
use crate::combat::{CombatState, Weapon};
use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::logger;
use crate::movement::Locomotion;
use crate::world::{Arena, Obstacle};
use crate::DeterministicRng;

/// Bundle персонажа по конфигу
pub fn character_bundle(config: &SimulationConfig, kind: CharacterKind, position: Vec3) -> impl Bundle {
    let behavior = match kind {
        CharacterKind::Player => Behavior::Player(PlayerIntent::default()),
        CharacterKind::AIAgent => Behavior::Ai(AiBrain::new(config.ai.clone())),
    };

    (
        Character { kind },
        Transform::from_translation(position),
        CombatState::new(config.character.max_health),
        Locomotion::new(config.character.move_speed, config.character.rotation_speed),
        CharacterBody {
            radius: config.character.radius,
            height: config.character.height,
        },
        Weapon::new(config.loadout.clone()),
        Loadout(config.loadout.clone()),
        behavior,
    )
}

/// Спавн в заданной точке
pub fn spawn_character_at(world: &mut World, kind: CharacterKind, position: Vec3) -> Entity {
    let config = world.get_resource::<SimulationConfig>().cloned().unwrap_or_default();
    let entity = world.spawn(character_bundle(&config, kind, position)).id();

    logger::log(&format!("✅ Spawned {:?} {:?} at {:?}", kind, entity, position));
    entity
}

/// Спавн в случайной точке арены
pub fn spawn_character(world: &mut World, kind: CharacterKind) -> Result<Entity, SimulationError> {
    let arena = world
        .get_resource::<Arena>()
        .cloned()
        .ok_or(SimulationError::EmptyArena)?;
    let position = match world.get_resource_mut::<DeterministicRng>() {
        Some(mut rng) => arena.random_point(&mut rng.rng),
        None => arena.points()[0],
    };

    Ok(spawn_character_at(world, kind, position))
}

/// Статическое препятствие (земля, стена) для spatial queries
pub fn spawn_obstacle(world: &mut World, collider: Collider, transform: Transform) -> Entity {
    world.spawn((Obstacle, collider, transform)).id()
}
