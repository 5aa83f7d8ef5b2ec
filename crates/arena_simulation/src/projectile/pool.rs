//! ProjectilePool: arena-of-slots с free list и generation index
//!
//! Слот либо active (летит), либо pooled (в free list), никогда оба.
//! `release` инкрементирует generation: старый handle после этого stale.
//! Слоты никогда не удаляются: active + pooled по виду только растёт.

use std::collections::BTreeMap;

use bevy::prelude::*;

use crate::combat::AmmoKind;
use crate::error::SimulationError;
use crate::logger;
use crate::projectile::ballistic::{Projectile, ProjectileConfig};

/// Стабильная ссылка на слот пула
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileHandle {
    pub kind: AmmoKind,
    pub index: u32,
    pub generation: u32,
}

#[derive(Debug, Clone)]
struct Slot {
    generation: u32,
    active: bool,
    projectile: Projectile,
}

#[derive(Debug, Clone)]
struct KindPool {
    prototype: ProjectileConfig,
    slots: Vec<Slot>,
    /// LIFO: последний возвращённый слот переиспользуется первым
    free: Vec<u32>,
}

#[derive(Resource, Debug, Clone, Default)]
pub struct ProjectilePool {
    kinds: BTreeMap<AmmoKind, KindPool>,
}

impl ProjectilePool {
    pub fn new(prototypes: &BTreeMap<AmmoKind, ProjectileConfig>) -> Self {
        let kinds = prototypes
            .iter()
            .map(|(kind, prototype)| {
                (
                    *kind,
                    KindPool {
                        prototype: *prototype,
                        slots: Vec::new(),
                        free: Vec::new(),
                    },
                )
            })
            .collect();
        Self { kinds }
    }

    pub fn supports(&self, kind: AmmoKind) -> bool {
        self.kinds.contains_key(&kind)
    }

    /// Взять слот из free list, или создать новый
    pub fn acquire(&mut self, kind: AmmoKind) -> Result<ProjectileHandle, SimulationError> {
        let pool = self
            .kinds
            .get_mut(&kind)
            .ok_or(SimulationError::UnknownAmmoKind(kind))?;

        let index = match pool.free.pop() {
            Some(index) => index,
            None => {
                pool.slots.push(Slot {
                    generation: 0,
                    active: false,
                    projectile: Projectile::new(pool.prototype),
                });
                let index = (pool.slots.len() - 1) as u32;
                logger::log(&format!("🧱 Projectile pool {:?} grew to {} slots", kind, pool.slots.len()));
                index
            }
        };

        let slot = &mut pool.slots[index as usize];
        slot.active = true;
        Ok(ProjectileHandle {
            kind,
            index,
            generation: slot.generation,
        })
    }

    /// Вернуть активный слот в пул
    pub fn release(&mut self, handle: ProjectileHandle) -> Result<(), SimulationError> {
        let pool = self
            .kinds
            .get_mut(&handle.kind)
            .ok_or(SimulationError::UnknownAmmoKind(handle.kind))?;

        match pool.slots.get_mut(handle.index as usize) {
            Some(slot) if slot.active && slot.generation == handle.generation => {
                slot.active = false;
                slot.generation = slot.generation.wrapping_add(1);
                pool.free.push(handle.index);
                Ok(())
            }
            _ => Err(SimulationError::StaleProjectileHandle(handle)),
        }
    }

    fn slot(&self, handle: ProjectileHandle) -> Option<&Slot> {
        self.kinds
            .get(&handle.kind)?
            .slots
            .get(handle.index as usize)
            .filter(|slot| slot.active && slot.generation == handle.generation)
    }

    pub fn get(&self, handle: ProjectileHandle) -> Option<&Projectile> {
        self.slot(handle).map(|slot| &slot.projectile)
    }

    pub fn get_mut(&mut self, handle: ProjectileHandle) -> Option<&mut Projectile> {
        self.kinds
            .get_mut(&handle.kind)?
            .slots
            .get_mut(handle.index as usize)
            .filter(|slot| slot.active && slot.generation == handle.generation)
            .map(|slot| &mut slot.projectile)
    }

    pub fn active_count(&self, kind: AmmoKind) -> usize {
        self.kinds
            .get(&kind)
            .map_or(0, |pool| pool.slots.len() - pool.free.len())
    }

    pub fn pooled_count(&self, kind: AmmoKind) -> usize {
        self.kinds.get(&kind).map_or(0, |pool| pool.free.len())
    }

    /// active + pooled
    pub fn total(&self, kind: AmmoKind) -> usize {
        self.kinds.get(&kind).map_or(0, |pool| pool.slots.len())
    }

    /// Handles всех активных пуль в стабильном порядке (kind, index), в переиспользуемый буфер
    pub fn collect_active_handles(&self, out: &mut Vec<ProjectileHandle>) {
        out.clear();
        out.extend(self.iter_active().map(|(handle, _)| handle));
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (ProjectileHandle, &Projectile)> + '_ {
        self.kinds.iter().flat_map(|(kind, pool)| {
            pool.slots
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.active)
                .map(move |(index, slot)| {
                    (
                        ProjectileHandle {
                            kind: *kind,
                            index: index as u32,
                            generation: slot.generation,
                        },
                        &slot.projectile,
                    )
                })
        })
    }
}
