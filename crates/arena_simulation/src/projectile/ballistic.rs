//! BallisticBody: прямолинейный полёт пули + разрешение попадания
//!
//! Каждый кадр: lifetime → ray cast длиной `speed × dt` → flying / impact / expired.
//! Пуля не знает про урон и пул: результат (`BallisticOutcome`) разбирает система.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::world::{SpatialQuery, SurfaceKind, HIT_MASK};

/// Параметры пули одного ammo kind (prototype в пуле)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ProjectileConfig {
    pub damage: f32,
    /// м/с
    pub speed: f32,
    /// Максимальное время жизни (секунды)
    pub lifetime: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self::bullet()
    }
}

impl ProjectileConfig {
    pub fn bullet() -> Self {
        Self {
            damage: 10.0,
            speed: 60.0,
            lifetime: 10.0,
        }
    }

    pub fn slug() -> Self {
        Self {
            damage: 35.0,
            speed: 40.0,
            lifetime: 6.0,
        }
    }
}

/// Чем закончился кадр полёта
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallisticOutcome {
    /// Летит дальше
    Flying,
    /// Lifetime истёк: в пул, без урона
    Expired,
    /// Попадание. `target = None`: земля/препятствие
    Impact { point: Vec3, target: Option<Entity> },
}

/// Пуля (живёт в слоте `ProjectilePool`)
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    config: ProjectileConfig,
    /// Weak ссылка: только чтобы не попасть в себя
    owner: Option<Entity>,
    position: Vec3,
    direction: Vec3,
    rotation: Quat,
    elapsed: f32,
}

impl Projectile {
    pub fn new(config: ProjectileConfig) -> Self {
        Self {
            config,
            owner: None,
            position: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            rotation: Quat::IDENTITY,
            elapsed: 0.0,
        }
    }

    /// Активация из пула
    ///
    /// Позиция сдвигается вперёд на `speed × sub_frame_offset`: пули одной очереди,
    /// выпущенные за один длинный кадр, не стоят в одной точке.
    pub fn init(&mut self, origin: Vec3, direction: Vec3, owner: Option<Entity>, sub_frame_offset: f32) {
        let direction = direction.try_normalize().unwrap_or(Vec3::NEG_Z);

        self.owner = owner;
        self.direction = direction;
        self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
        self.position = origin + direction * self.config.speed * sub_frame_offset.max(0.0);
        self.elapsed = 0.0;
    }

    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Ориентация: -Z смотрит вдоль полёта
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn damage(&self) -> f32 {
        self.config.damage
    }

    /// Шаг полёта на `dt`
    ///
    /// Попадание в владельца или в мёртвого персонажа игнорируется: пуля пролетает
    /// полную дистанцию кадра.
    pub fn advance(
        &mut self,
        dt: f32,
        spatial: &dyn SpatialQuery,
        is_dead: impl Fn(Entity) -> bool,
    ) -> BallisticOutcome {
        self.elapsed += dt;
        if self.elapsed > self.config.lifetime {
            return BallisticOutcome::Expired;
        }

        let distance = self.config.speed * dt;
        let hit = spatial.cast_ray(self.position, self.direction, distance, HIT_MASK, self.owner);

        match hit.map(|hit| (hit.surface, hit.point)) {
            None => {}
            Some((SurfaceKind::Ground, point)) => {
                return BallisticOutcome::Impact { point, target: None };
            }
            Some((SurfaceKind::Character(target), point)) => {
                if Some(target) != self.owner && !is_dead(target) {
                    return BallisticOutcome::Impact {
                        point,
                        target: Some(target),
                    };
                }
            }
        }

        self.position += self.direction * distance;
        BallisticOutcome::Flying
    }
}
