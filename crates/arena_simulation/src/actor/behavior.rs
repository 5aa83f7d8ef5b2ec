//! Behavior strategy: player intent или AI brain (выбирается при спавне)

use bevy::prelude::*;

use crate::ai::{AiBrain, CharacterView};
use crate::combat::{FireMode, Weapon};
use crate::movement::Locomotion;

/// Intent игрока на кадр (пишет input layer)
///
/// `fire_held`: для Auto, `fire_pressed`: edge для Single.
/// One-shot флаги (`fire_pressed`, `reload`, `switch_mode`, `respawn`) сбрасываются после чтения.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerIntent {
    pub movement: Vec3,
    /// Точка прицела в мире (None: держим прежний прицел)
    pub aim_target: Option<Vec3>,
    pub fire_held: bool,
    pub fire_pressed: bool,
    pub reload: bool,
    pub switch_mode: bool,
    pub respawn: bool,
}

impl PlayerIntent {
    /// Перевести intent в вызовы Locomotion/Weapon. `true`: запрошен respawn.
    ///
    /// Мёртвый игрок может только запросить respawn.
    pub fn apply(
        &mut self,
        me: &CharacterView,
        locomotion: &mut Locomotion,
        weapon: Option<&mut Weapon>,
    ) -> bool {
        let respawn = std::mem::take(&mut self.respawn);
        let fire_pressed = std::mem::take(&mut self.fire_pressed);
        let reload = std::mem::take(&mut self.reload);
        let switch_mode = std::mem::take(&mut self.switch_mode);

        if !me.alive {
            locomotion.stop();
            return respawn;
        }

        locomotion.set_move_direction(self.movement);

        let aim = self
            .aim_target
            .map(|target| target - me.center)
            .and_then(|offset| Vec3::new(offset.x, 0.0, offset.z).try_normalize());
        if let Some(aim) = aim {
            locomotion.set_body_direction(aim);
        }

        if let Some(weapon) = weapon {
            if let Some(aim) = aim {
                weapon.set_direction(aim);
            }
            if switch_mode {
                weapon.switch_mode();
            }
            if reload {
                weapon.reload();
            }
            let trigger = match weapon.mode() {
                FireMode::Single => fire_pressed,
                FireMode::Auto => self.fire_held,
            };
            if trigger {
                weapon.fire();
            }
        }

        false
    }

    /// Сброс после смерти/respawn
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Кто принимает решения за персонажа
#[derive(Component, Debug, Clone)]
pub enum Behavior {
    Player(PlayerIntent),
    Ai(AiBrain),
}

impl Behavior {
    pub fn as_ai(&self) -> Option<&AiBrain> {
        match self {
            Behavior::Ai(brain) => Some(brain),
            Behavior::Player(_) => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerIntent> {
        match self {
            Behavior::Player(intent) => Some(intent),
            Behavior::Ai(_) => None,
        }
    }

    /// onDead
    pub fn on_dead(&mut self) {
        match self {
            Behavior::Player(intent) => intent.clear(),
            Behavior::Ai(brain) => brain.on_dead(),
        }
    }

    /// onRespawn
    pub fn on_respawn(&mut self) {
        match self {
            Behavior::Player(intent) => intent.clear(),
            Behavior::Ai(brain) => brain.on_respawn(),
        }
    }
}
