//! Actor systems: решения (player/AI), respawn, реакция на смерть

use bevy::prelude::*;

use crate::actor::behavior::Behavior;
use crate::actor::components::{AnimationState, CharacterBody, Loadout};
use crate::ai::{AiContext, CharacterRoster, CharacterView};
use crate::combat::{CharacterDied, CharacterHit, CharacterRespawned, CombatState, RespawnRequest, Weapon};
use crate::logger;
use crate::movement::Locomotion;
use crate::world::{Arena, CollisionWorld, NavigationService};
use crate::DeterministicRng;

/// Система: decide-шаг (intent игрока / AI brain → Locomotion + Weapon)
///
/// Попадания прошлого кадра (`CharacterHit`) доходят до AI здесь: сразу
/// переключают цель на стрелявшего.
pub fn decide_behaviors(
    time: Res<Time>,
    mut hits: EventReader<CharacterHit>,
    spatial: Res<CollisionWorld>,
    navigation: Res<NavigationService>,
    arena: Res<Arena>,
    mut rng: ResMut<DeterministicRng>,
    mut respawns: EventWriter<RespawnRequest>,
    mut characters: Query<(
        Entity,
        &Transform,
        &CharacterBody,
        &CombatState,
        &mut Behavior,
        &mut Locomotion,
        Option<&mut Weapon>,
    )>,
) {
    let dt = time.delta_secs();

    let roster = CharacterRoster::new(
        characters
            .iter()
            .map(|(entity, transform, body, state, ..)| CharacterView {
                entity,
                position: transform.translation,
                center: body.center(transform.translation),
                radius: body.radius,
                alive: state.is_alive(),
            })
            .collect(),
    );

    for hit in hits.read() {
        if let Ok((entity, _, _, _, mut behavior, _, _)) = characters.get_mut(hit.target) {
            if let Behavior::Ai(brain) = &mut *behavior {
                brain.on_hit(entity, hit.instigator);
            }
        }
    }

    for (entity, _, _, _, mut behavior, mut locomotion, mut weapon) in characters.iter_mut() {
        let Some(me) = roster.get(entity) else {
            continue;
        };

        let respawn = match &mut *behavior {
            Behavior::Player(intent) => intent.apply(me, &mut locomotion, weapon.as_deref_mut()),
            Behavior::Ai(brain) => {
                let mut ctx = AiContext {
                    spatial: &*spatial,
                    paths: navigation.0.as_ref(),
                    arena: &*arena,
                    roster: &roster,
                    rng: &mut rng.rng,
                };
                brain.think(dt, me, &mut locomotion, weapon.as_deref_mut(), &mut ctx)
            }
        };

        if respawn {
            respawns.write(RespawnRequest { entity });
        }
    }
}

/// Система: respawn по запросам
///
/// Health = max, новая spawn точка, все таймеры (reload, fire budget, respawn) сброшены,
/// оружие из Loadout выдаётся заново. Запросы для живых игнорируются.
pub fn respawn_characters(
    mut commands: Commands,
    mut requests: EventReader<RespawnRequest>,
    arena: Res<Arena>,
    mut rng: ResMut<DeterministicRng>,
    mut respawned: EventWriter<CharacterRespawned>,
    mut characters: Query<(
        &mut Transform,
        &mut CombatState,
        &mut Locomotion,
        &mut Behavior,
        Option<&Loadout>,
        Option<&mut Weapon>,
        Option<&mut AnimationState>,
    )>,
) {
    for request in requests.read() {
        let Ok((mut transform, mut state, mut locomotion, mut behavior, loadout, weapon, animation)) =
            characters.get_mut(request.entity)
        else {
            continue;
        };
        if state.is_alive() {
            continue;
        }

        let position = arena.random_point(&mut rng.rng);
        state.respawn();
        transform.translation = position;
        locomotion.reset();
        transform.rotation = locomotion.rotation();
        behavior.on_respawn();

        if let Some(Loadout(config)) = loadout {
            match weapon {
                Some(mut weapon) => *weapon = Weapon::new(config.clone()),
                None => {
                    commands.entity(request.entity).insert(Weapon::new(config.clone()));
                }
            }
        }
        if let Some(mut animation) = animation {
            *animation = AnimationState::default();
        }

        logger::log_info(&format!("♻️ {:?} respawned at {:?}", request.entity, position));
        respawned.write(CharacterRespawned {
            entity: request.entity,
            position,
        });
    }
}

/// Система (onDead): стоп движения и огня, AI уходит в ожидание respawn
pub fn react_to_deaths(
    mut deaths: EventReader<CharacterDied>,
    mut characters: Query<(
        &mut Behavior,
        &mut Locomotion,
        Option<&mut Weapon>,
        Option<&mut AnimationState>,
    )>,
) {
    for death in deaths.read() {
        let Ok((mut behavior, mut locomotion, weapon, animation)) = characters.get_mut(death.entity) else {
            continue;
        };

        locomotion.stop();
        behavior.on_dead();
        if let Some(mut weapon) = weapon {
            weapon.cancel_fire();
        }
        if let Some(mut animation) = animation {
            animation.dead = true;
            animation.movement = Default::default();
            animation.turning = false;
        }
    }
}
