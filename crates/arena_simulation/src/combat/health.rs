//! CombatState: здоровье персонажа, урон, смерть/respawn
//!
//! Уведомления onHit/onDead/onRespawn: события (`CharacterHit`, `CharacterDied`,
//! `CharacterRespawned`), их пишут системы по результату `hit()` / `respawn()`.

use bevy::prelude::*;

/// Здоровье персонажа
///
/// Инвариант: health растёт только через `respawn()`.
/// Health может уйти в минус (overkill): `is_dead()` это health ≤ 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct CombatState {
    max_health: f32,
    health: f32,
}

impl Default for CombatState {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Результат `CombatState::hit`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Уже мёртв: ничего не изменилось
    Ignored,
    /// Урон применён, персонаж жив
    Wounded,
    /// Этот удар убил персонажа (ровно один раз за жизнь)
    Killed,
}

impl CombatState {
    pub fn new(max_health: f32) -> Self {
        Self {
            max_health,
            health: max_health,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn max_health(&self) -> f32 {
        self.max_health
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    pub fn hit(&mut self, damage: f32) -> HitOutcome {
        if self.is_dead() {
            return HitOutcome::Ignored;
        }
        self.health -= damage;
        if self.is_dead() {
            HitOutcome::Killed
        } else {
            HitOutcome::Wounded
        }
    }

    pub fn respawn(&mut self) {
        self.health = self.max_health;
    }
}

/// Событие: персонаж получил попадание (onHit)
///
/// Пишется ДО смерти (если удар смертельный, следом идёт `CharacterDied`).
/// Behavior логика читает его на следующем кадре.
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterHit {
    pub target: Entity,
    /// Владелец пули (None: владелец неизвестен)
    pub instigator: Option<Entity>,
    pub damage: f32,
}

/// Событие: health ≤ 0 (onDead), ровно один раз за жизнь
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Событие: персонаж возрождён (onRespawn)
#[derive(Event, Debug, Clone, Copy)]
pub struct CharacterRespawned {
    pub entity: Entity,
    pub position: Vec3,
}

/// Запрос respawn (AI по таймеру, player: явным действием)
#[derive(Event, Debug, Clone, Copy)]
pub struct RespawnRequest {
    pub entity: Entity,
}
