//! Projectile systems: полёт + попадания

use bevy::prelude::*;

use crate::combat::{CharacterDied, CharacterHit, CombatState, HitOutcome};
use crate::logger;
use crate::projectile::ballistic::BallisticOutcome;
use crate::projectile::pool::{ProjectileHandle, ProjectilePool};
use crate::world::CollisionWorld;

/// Система: шаг всех активных пуль
///
/// Пули обрабатываются последовательно: если первая пуля кадра убила цель,
/// следующие уже видят её мёртвой и пролетают насквозь.
pub fn advance_projectiles(
    time: Res<Time>,
    mut pool: ResMut<ProjectilePool>,
    spatial: Res<CollisionWorld>,
    mut targets: Query<&mut CombatState>,
    mut hit_events: EventWriter<CharacterHit>,
    mut death_events: EventWriter<CharacterDied>,
    mut handles: Local<Vec<ProjectileHandle>>,
) {
    let dt = time.delta_secs();

    pool.collect_active_handles(&mut handles);
    for &handle in handles.iter() {
        let Some(projectile) = pool.get_mut(handle) else {
            continue;
        };

        let outcome = projectile.advance(dt, &*spatial, |entity| {
            targets.get(entity).is_ok_and(|state| state.is_dead())
        });
        let owner = projectile.owner();
        let damage = projectile.damage();

        match outcome {
            BallisticOutcome::Flying => continue,
            BallisticOutcome::Expired | BallisticOutcome::Impact { target: None, .. } => {}
            BallisticOutcome::Impact {
                target: Some(target),
                ..
            } => {
                if let Ok(mut state) = targets.get_mut(target) {
                    match state.hit(damage) {
                        HitOutcome::Ignored => {}
                        HitOutcome::Wounded => {
                            hit_events.write(CharacterHit {
                                target,
                                instigator: owner,
                                damage,
                            });
                        }
                        HitOutcome::Killed => {
                            hit_events.write(CharacterHit {
                                target,
                                instigator: owner,
                                damage,
                            });
                            death_events.write(CharacterDied {
                                entity: target,
                                killer: owner,
                            });
                            logger::log(&format!("💀 {:?} killed by {:?}", target, owner));
                        }
                    }
                }
            }
        }

        if let Err(err) = pool.release(handle) {
            logger::log_error(&format!("Projectile release failed: {}", err));
        }
    }
}
