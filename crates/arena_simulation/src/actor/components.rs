//! Компоненты персонажей: вид, тело, loadout, animation sink, HUD status

use bevy::prelude::*;

use crate::combat::{CombatState, FireMode, Weapon, WeaponConfig};
use crate::movement::{Locomotion, MovementMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum CharacterKind {
    Player,
    #[default]
    AIAgent,
}

/// Персонаж арены (player или AI)
///
/// Автоматически добавляет CombatState, Locomotion, CharacterBody, AnimationState
/// через Required Components.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform, CombatState, Locomotion, CharacterBody, AnimationState)]
pub struct Character {
    pub kind: CharacterKind,
}

/// Capsule персонажа: Transform.translation = ноги
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CharacterBody {
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
        }
    }
}

impl CharacterBody {
    /// Центр capsule (отсюда стартует LOS-луч)
    pub fn center(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * (self.height * 0.5)
    }
}

/// Оружие по умолчанию: выдаётся заново при каждом respawn
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Loadout(pub WeaponConfig);

/// Presentation sink: симуляция только пишет, никогда не читает
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct AnimationState {
    pub movement: MovementMode,
    pub turning: bool,
    pub dead: bool,
}

/// HUD view персонажа (здоровье + оружие)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterStatus {
    pub health: f32,
    pub max_health: f32,
    pub dead: bool,
    /// None: персонаж без оружия
    pub weapon: Option<WeaponStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponStatus {
    pub ammo: u32,
    pub magazine: u32,
    pub mode: FireMode,
    pub reloading: bool,
}

impl CharacterStatus {
    pub fn new(state: &CombatState, weapon: Option<&Weapon>) -> Self {
        Self {
            health: state.health(),
            max_health: state.max_health(),
            dead: state.is_dead(),
            weapon: weapon.map(|weapon| WeaponStatus {
                ammo: weapon.ammo(),
                magazine: weapon.magazine(),
                mode: weapon.mode(),
                reloading: weapon.is_reloading(),
            }),
        }
    }

    /// Собрать status из компонентов entity (None: не персонаж)
    pub fn of(world: &World, entity: Entity) -> Option<Self> {
        let entity = world.get_entity(entity).ok()?;
        let state = entity.get::<CombatState>()?;
        Some(Self::new(state, entity.get::<Weapon>()))
    }
}
