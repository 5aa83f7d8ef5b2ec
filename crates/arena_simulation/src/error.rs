//! Ошибки симуляции
//!
//! Только programmer/config ошибки. Запрещённые запросы (fire во время reload и т.п.)
//! ошибками не считаются: методы просто возвращают `false`.

use core::fmt;

use crate::combat::AmmoKind;
use crate::projectile::ProjectileHandle;

#[derive(Clone, Debug, PartialEq)]
pub enum SimulationError {
    /// Для ammo kind нет projectile prototype в пуле
    UnknownAmmoKind(AmmoKind),
    /// Arena без spawn points
    EmptyArena,
    /// Handle уже возвращён в пул (или от предыдущей активации слота)
    StaleProjectileHandle(ProjectileHandle),
    InvalidConfig { field: &'static str, reason: String },
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownAmmoKind(kind) => write!(f, "no projectile prototype for ammo kind {:?}", kind),
            Self::EmptyArena => write!(f, "arena has no spawn points"),
            Self::StaleProjectileHandle(handle) => write!(
                f,
                "stale projectile handle {:?}#{} (generation {})",
                handle.kind, handle.index, handle.generation
            ),
            Self::InvalidConfig { field, reason } => write!(f, "invalid config `{}`: {}", field, reason),
        }
    }
}

impl std::error::Error for SimulationError {}
