//! Ammo kinds + ammo supply (откуда weapon берёт патроны при reload)

use std::collections::BTreeMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Категория боеприпаса: выбирает projectile pool/prototype
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Reflect, Serialize, Deserialize,
)]
pub enum AmmoKind {
    #[default]
    Bullet,
    /// Тяжёлая медленная пуля (дробовик с пулевым патроном)
    Slug,
}

impl AmmoKind {
    pub const ALL: [AmmoKind; 2] = [AmmoKind::Bullet, AmmoKind::Slug];
}

/// Ammo supply: сколько патронов выдано на запрос `requested`
pub trait AmmoSupply: Send + Sync {
    fn grant(&mut self, kind: AmmoKind, requested: u32) -> u32;
}

/// Бесконечные патроны: отдаём сколько просили
#[derive(Debug, Clone, Copy, Default)]
pub struct UnlimitedAmmo;

impl AmmoSupply for UnlimitedAmmo {
    fn grant(&mut self, _kind: AmmoKind, requested: u32) -> u32 {
        requested
    }
}

/// Конечный запас патронов по видам
#[derive(Debug, Clone, Default)]
pub struct AmmoStock {
    reserve: BTreeMap<AmmoKind, u32>,
}

impl AmmoStock {
    pub fn with(mut self, kind: AmmoKind, amount: u32) -> Self {
        self.reserve.insert(kind, amount);
        self
    }

    pub fn remaining(&self, kind: AmmoKind) -> u32 {
        self.reserve.get(&kind).copied().unwrap_or(0)
    }
}

impl AmmoSupply for AmmoStock {
    fn grant(&mut self, kind: AmmoKind, requested: u32) -> u32 {
        let Some(left) = self.reserve.get_mut(&kind) else {
            return 0;
        };
        let granted = requested.min(*left);
        *left -= granted;
        granted
    }
}

/// Resource-обёртка: ammo supply для всех персонажей
#[derive(Resource)]
pub struct AmmoSupplyService(pub Box<dyn AmmoSupply>);

impl Default for AmmoSupplyService {
    fn default() -> Self {
        Self(Box::new(UnlimitedAmmo))
    }
}

impl AmmoSupplyService {
    pub fn new(supply: impl AmmoSupply + 'static) -> Self {
        Self(Box::new(supply))
    }
}
