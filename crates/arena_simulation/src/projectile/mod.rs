//! Projectile module: пул пуль + баллистика
//!
//! - pool: `ProjectilePool` (слоты + free list по ammo kind)
//! - ballistic: `Projectile` (полёт, ray cast, разрешение попадания)
//! - systems: `advance_projectiles` (урон через `CombatState::hit`)
//!
//! Пули НЕ entities: живут в слотах пула, чтобы активация не аллоцировала.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod ballistic;
pub mod pool;
pub mod systems;


pub use ballistic::{BallisticOutcome, Projectile, ProjectileConfig};
pub use pool::{ProjectileHandle, ProjectilePool};
pub use systems::advance_projectiles;

/// Projectile Plugin
///
/// `ProjectilePool` вставляет `SimulationPlugin` (нужен `SimulationConfig`).
pub struct ProjectilePlugin;

impl Plugin for ProjectilePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, advance_projectiles.in_set(SimulationSet::Projectiles));
    }
}
