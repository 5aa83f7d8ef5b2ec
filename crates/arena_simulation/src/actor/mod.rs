//! Actor domain: персонажи арены
//!
//! Содержит:
//! - Character / CharacterBody / Loadout / AnimationState (компоненты)
//! - Behavior (player intent или AI brain)
//! - decide / respawn / death системы
//! - spawn helpers

use bevy::prelude::*;

use crate::SimulationSet;

pub mod behavior;
pub mod components;
pub mod spawn;
pub mod systems;


pub use behavior::{Behavior, PlayerIntent};
pub use components::{
    AnimationState, Character, CharacterBody, CharacterKind, CharacterStatus, Loadout, WeaponStatus,
};
pub use spawn::{character_bundle, spawn_character, spawn_character_at, spawn_obstacle};
pub use systems::{decide_behaviors, react_to_deaths, respawn_characters};

/// Actor Plugin
///
/// Порядок в кадре:
/// 1. decide_behaviors (Decide): intent → Locomotion/Weapon
/// 2. respawn_characters (Respawn)
/// 3. react_to_deaths (Reactions): смерти этого кадра
pub struct ActorPlugin;

impl Plugin for ActorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Character>()
            .register_type::<CharacterBody>()
            .register_type::<AnimationState>();

        app.add_systems(
            Update,
            (
                decide_behaviors.in_set(SimulationSet::Decide),
                respawn_characters.in_set(SimulationSet::Respawn),
                react_to_deaths.in_set(SimulationSet::Reactions),
            ),
        );
    }
}
