//! Arena Simulation Core
//!
//! ECS-симуляция top-down arena shooter на Bevy 0.16:
//! персонажи (player + AI) двигаются, целятся, стреляют, умирают и возрождаются.
//!
//! Порядок кадра (SimulationSet, chain):
//! Decide → Respawn → Locomotion → Physics → Weapons → Projectiles → Reactions
//!
//! Урон, нанесённый в кадре N, behavior логика видит только в кадре N+1.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod config;
pub mod error;
pub mod logger;
pub mod movement;
pub mod projectile;
pub mod world;

// Re-export основных типов
pub use actor::{
    spawn_character, spawn_character_at, spawn_obstacle, ActorPlugin, AnimationState, Behavior,
    Character, CharacterBody, CharacterKind, CharacterStatus, Loadout, PlayerIntent,
};
pub use ai::{AIConfig, AIState, AiBrain};
pub use combat::{
    AmmoKind, AmmoStock, AmmoSupply, AmmoSupplyService, CharacterDied, CharacterHit,
    CharacterRespawned, CombatPlugin, CombatState, FireMode, HitOutcome, RespawnRequest,
    UnlimitedAmmo, Weapon, WeaponConfig,
};
pub use config::{CharacterConfig, SimulationConfig};
pub use error::SimulationError;
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use movement::{Locomotion, MovementMode, MovementPlugin};
pub use projectile::{ProjectileConfig, ProjectileHandle, ProjectilePlugin, ProjectilePool};
pub use world::{
    Arena, CollisionWorld, DirectPathService, NavigationService, Obstacle, PathService, SpatialQuery,
};

/// Фазы кадра симуляции (выполняются строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Player intent / AI brain → Locomotion + Weapon
    Decide,
    Respawn,
    Locomotion,
    /// Пересборка CollisionWorld из новых позиций
    Physics,
    Weapons,
    Projectiles,
    /// onDead реакции на смерти этого кадра
    Reactions,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Ресурсы, которых нет в App, вставляются по умолчанию:
/// SimulationConfig, Arena, ProjectilePool, CollisionWorld, NavigationService,
/// AmmoSupplyService, DeterministicRng(42).
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        // Ошибка конфига: ошибка программиста, дальше ехать нельзя
        if let Err(err) = config.validate() {
            log_error(&format!("Invalid simulation config: {}", err));
            panic!("invalid simulation config: {}", err);
        }

        if !app.world().contains_resource::<Arena>() {
            match Arena::new(config.spawn_points.clone()) {
                Ok(arena) => {
                    app.insert_resource(arena);
                }
                Err(err) => panic!("invalid simulation config: {}", err),
            }
        }
        if !app.world().contains_resource::<ProjectilePool>() {
            app.insert_resource(ProjectilePool::new(&config.projectiles));
        }
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.insert_resource(config)
            .init_resource::<CollisionWorld>()
            .init_resource::<NavigationService>()
            .init_resource::<AmmoSupplyService>();

        app.configure_sets(
            Update,
            (
                SimulationSet::Decide,
                SimulationSet::Respawn,
                SimulationSet::Locomotion,
                SimulationSet::Physics,
                SimulationSet::Weapons,
                SimulationSet::Projectiles,
                SimulationSet::Reactions,
            )
                .chain(),
        );

        app.add_systems(Update, world::sync_collision_world.in_set(SimulationSet::Physics));

        // Подсистемы
        app.add_plugins((ActorPlugin, MovementPlugin, CombatPlugin, ProjectilePlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Шаг по умолчанию для headless прогона (60 кадров/сек)
pub const DEFAULT_STEP: Duration = Duration::from_nanos(16_666_667);

/// Создаёт minimal Bevy App для headless симуляции
///
/// SimulationPlugin НЕ добавляется: тест сначала кладёт свой SimulationConfig.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with_step(seed, DEFAULT_STEP)
}

/// Headless App с фиксированной длительностью кадра `step`
pub fn create_headless_app_with_step(seed: u64, step: Duration) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .insert_resource(DeterministicRng::new(seed));

    // Длинные кадры не должны обрезаться (по умолчанию Virtual max_delta = 250ms)
    let max_delta = step.max(Duration::from_millis(250));
    app.world_mut()
        .resource_mut::<Time<Virtual>>()
        .set_max_delta(max_delta);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Debug-формат как простейшая сериализация
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
