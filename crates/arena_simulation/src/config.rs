//! Конфигурация симуляции (tuning арены, персонажей, оружия, AI)
//!
//! Ошибки конфигурации считаются programmer error. `SimulationPlugin` вызывает `validate()`
//! при сборке App и падает с сообщением.

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::AIConfig;
use crate::combat::{AmmoKind, WeaponConfig};
use crate::error::SimulationError;
use crate::projectile::ProjectileConfig;

/// Параметры персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConfig {
    pub max_health: f32,
    /// м/с
    pub move_speed: f32,
    /// градусы/сек
    pub rotation_speed: f32,
    pub radius: f32,
    pub height: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            move_speed: 5.0,
            rotation_speed: 360.0,
            radius: 0.5,
            height: 2.0,
        }
    }
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Prototype пули для каждого ammo kind
    pub projectiles: BTreeMap<AmmoKind, ProjectileConfig>,
    pub character: CharacterConfig,
    /// Оружие, которое получает каждый персонаж при спавне/respawn
    pub loadout: WeaponConfig,
    pub ai: AIConfig,
    pub spawn_points: Vec<Vec3>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let mut projectiles = BTreeMap::new();
        projectiles.insert(AmmoKind::Bullet, ProjectileConfig::bullet());
        projectiles.insert(AmmoKind::Slug, ProjectileConfig::slug());

        Self {
            projectiles,
            character: CharacterConfig::default(),
            loadout: WeaponConfig::rifle(),
            ai: AIConfig::default(),
            spawn_points: vec![
                Vec3::new(-10.0, 0.0, -10.0),
                Vec3::new(10.0, 0.0, -10.0),
                Vec3::new(-10.0, 0.0, 10.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 0.0),
            ],
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SimulationError {
    SimulationError::InvalidConfig {
        field,
        reason: reason.into(),
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.character.max_health <= 0.0 {
            return Err(invalid("character.max_health", "must be > 0"));
        }
        if self.character.move_speed < 0.0 || self.character.rotation_speed <= 0.0 {
            return Err(invalid("character", "speeds must be positive"));
        }
        if self.character.radius <= 0.0 || self.character.height < self.character.radius * 2.0 {
            return Err(invalid("character.height", "capsule must fit its radius"));
        }

        let weapon = &self.loadout;
        if !(1..=600).contains(&weapon.rate) {
            return Err(invalid("loadout.rate", format!("{} not in 1..=600", weapon.rate)));
        }
        if !(0.0..=30.0).contains(&weapon.scatter_angle) {
            return Err(invalid(
                "loadout.scatter_angle",
                format!("{} not in 0..=30", weapon.scatter_angle),
            ));
        }
        if weapon.magazine == 0 {
            return Err(invalid("loadout.magazine", "must be > 0"));
        }
        if weapon.reload_time < 0.0 {
            return Err(invalid("loadout.reload_time", "must be >= 0"));
        }
        if !self.projectiles.contains_key(&weapon.ammo_kind) {
            return Err(SimulationError::UnknownAmmoKind(weapon.ammo_kind));
        }

        for (kind, projectile) in &self.projectiles {
            if projectile.speed <= 0.0 || projectile.lifetime <= 0.0 || projectile.damage < 0.0 {
                return Err(invalid("projectiles", format!("bad prototype for {:?}", kind)));
            }
        }

        if self.spawn_points.is_empty() {
            return Err(SimulationError::EmptyArena);
        }
        Ok(())
    }
}
