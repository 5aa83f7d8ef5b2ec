//! Combat module: здоровье, оружие, патроны
//!
//! ECS ответственность:
//! - CombatState: health, hit → wounded/killed
//! - Weapon: fire/reload state machine, sub-frame накопление выстрелов
//! - AmmoSupply: откуда берутся патроны при reload
//! - Events: CharacterHit, CharacterDied, CharacterRespawned, RespawnRequest
//!
//! Урон наносит projectile module (`advance_projectiles`), здесь только выстрелы.

use bevy::prelude::*;

use crate::logger;
use crate::projectile::ProjectilePool;
use crate::{DeterministicRng, SimulationSet};

pub mod ammo;
pub mod health;
pub mod weapon;


// Re-export основных типов
pub use ammo::{AmmoKind, AmmoStock, AmmoSupply, AmmoSupplyService, UnlimitedAmmo};
pub use health::{
    CharacterDied, CharacterHit, CharacterRespawned, CombatState, HitOutcome, RespawnRequest,
};
pub use weapon::{scatter_direction, FireMode, Shot, Weapon, WeaponConfig};

/// Combat Plugin
///
/// Регистрирует combat события и `fire_weapons` (SimulationSet::Weapons).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CharacterHit>()
            .add_event::<CharacterDied>()
            .add_event::<CharacterRespawned>()
            .add_event::<RespawnRequest>();

        app.add_systems(Update, fire_weapons.in_set(SimulationSet::Weapons));
    }
}

/// Система: шаг оружия + спавн пуль из пула
///
/// Точка вылета = Transform персонажа + `muzzle_offset` (в локальных координатах).
/// Мёртвые не стреляют: взведённый запрос снимается.
pub fn fire_weapons(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut supply: ResMut<AmmoSupplyService>,
    mut pool: ResMut<ProjectilePool>,
    mut weapons: Query<(Entity, &Transform, &CombatState, &mut Weapon)>,
    mut shots: Local<Vec<Shot>>,
) {
    let dt = time.delta_secs();

    for (entity, transform, state, mut weapon) in weapons.iter_mut() {
        if state.is_dead() {
            weapon.cancel_fire();
            continue;
        }

        shots.clear();
        weapon.set_up(transform.rotation * Vec3::Y);
        weapon.advance(dt, &mut rng.rng, supply.0.as_mut(), &mut shots);
        if shots.is_empty() {
            continue;
        }

        let muzzle = transform.translation + transform.rotation * weapon.config().muzzle_offset;
        let kind = weapon.ammo_kind();

        for shot in shots.iter() {
            let handle = match pool.acquire(kind) {
                Ok(handle) => handle,
                Err(err) => {
                    logger::log_error(&format!("{:?} cannot fire: {}", entity, err));
                    break;
                }
            };
            if let Some(projectile) = pool.get_mut(handle) {
                projectile.init(muzzle, shot.direction, Some(entity), shot.sub_frame_offset);
            }
        }
    }
}
