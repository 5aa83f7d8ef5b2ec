//! Movement domain: locomotion персонажей
//!
//! Содержит:
//! - Locomotion (движение + плавный поворот корпуса)
//! - MovementMode (классификация для анимации)
//! - angle helpers (yaw, кратчайший поворот)

use bevy::prelude::*;

use crate::actor::AnimationState;
use crate::combat::CombatState;
use crate::SimulationSet;

pub mod angle;
pub mod locomotion;

#[cfg(test)]
mod locomotion_tests;

pub use angle::{delta_angle, direction_from_yaw, move_towards_angle, signed_angle, yaw_from_direction};
pub use locomotion::{Locomotion, LocomotionFrame, MovementMode};

pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, integrate_locomotion.in_set(SimulationSet::Locomotion));
    }
}

/// Система: Locomotion → Transform (позиция + yaw корпуса)
///
/// Мёртвые стоят: intent движения сбрасывается каждый кадр, пока dead.
/// `AnimationState.dead` выставляется по CombatState, не только по `CharacterDied`.
pub fn integrate_locomotion(
    time: Res<Time>,
    mut movers: Query<(
        &mut Transform,
        &mut Locomotion,
        &CombatState,
        Option<&mut AnimationState>,
    )>,
) {
    let dt = time.delta_secs();

    for (mut transform, mut locomotion, state, animation) in movers.iter_mut() {
        if state.is_dead() {
            locomotion.stop();
            if let Some(mut animation) = animation {
                animation.dead = true;
                animation.movement = MovementMode::None;
                animation.turning = false;
            }
            continue;
        }

        let frame = locomotion.advance(dt, &mut transform.translation);
        transform.rotation = locomotion.rotation();

        if let Some(mut animation) = animation {
            animation.movement = frame.mode;
            animation.turning = frame.turning;
        }
    }
}
