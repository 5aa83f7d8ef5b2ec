//! WeaponController: fire/reload state machine с sub-frame накоплением выстрелов
//!
//! Состояния: Idle / Firing / Reloading.
//! - `fire()` взводит запрос на ТЕКУЩИЙ кадр (auto-fire = вызывать каждый кадр)
//! - `advance(dt)` превращает накопленное время в выстрелы (`Shot`)
//! - reload и стрельба взаимоисключающие
//!
//! Burst catch-up: если кадр длиннее интервала между выстрелами, за кадр выходит
//! несколько пуль, каждая сдвинута вперёд на свой sub-frame offset.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::ammo::{AmmoKind, AmmoSupply};

/// Запас на float-дрейф при сравнении бюджета с интервалом выстрела
const SHOT_EPSILON: f32 = 1e-5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum FireMode {
    /// Один выстрел на каждый запрос
    Single,
    /// Очередь, пока запрос держится
    #[default]
    Auto,
}

impl FireMode {
    pub fn toggled(self) -> Self {
        match self {
            FireMode::Single => FireMode::Auto,
            FireMode::Auto => FireMode::Single,
        }
    }
}

/// Параметры оружия (prefab)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct WeaponConfig {
    pub ammo_kind: AmmoKind,
    /// Режим при экипировке
    pub mode: FireMode,
    /// Выстрелов в секунду (1..=600)
    pub rate: u32,
    /// Половина угла конуса разброса (градусы, 0..=30)
    pub scatter_angle: f32,
    pub magazine: u32,
    /// Длительность перезарядки (секунды)
    pub reload_time: f32,
    /// Точка вылета пули в локальных координатах тела (-Z = вперёд)
    pub muzzle_offset: Vec3,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self::rifle()
    }
}

impl WeaponConfig {
    /// Автомат: 10 выстр/сек, магазин 60
    pub fn rifle() -> Self {
        Self {
            ammo_kind: AmmoKind::Bullet,
            mode: FireMode::Auto,
            rate: 10,
            scatter_angle: 10.0,
            magazine: 60,
            reload_time: 0.5,
            muzzle_offset: Vec3::new(0.25, 1.2, -0.6),
        }
    }

    /// Дробовик с пулевым патроном (Slug, магазин 8)
    pub fn shotgun_slug() -> Self {
        Self {
            ammo_kind: AmmoKind::Slug,
            mode: FireMode::Single,
            rate: 2,
            scatter_angle: 3.0,
            magazine: 8,
            reload_time: 1.5,
            muzzle_offset: Vec3::new(0.25, 1.2, -0.8),
        }
    }

    /// Интервал между выстрелами (секунды)
    pub fn shot_interval(&self) -> f32 {
        1.0 / self.rate.max(1) as f32
    }
}

/// Выстрел, который должен превратиться в projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shot {
    /// Направление с учётом разброса (normalized)
    pub direction: Vec3,
    /// Сколько секунд пуля "уже летит" к концу кадра (≥ 0)
    pub sub_frame_offset: f32,
}

/// Оружие персонажа (ровно одно; замена = новый компонент)
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Weapon {
    config: WeaponConfig,
    mode: FireMode,
    ammo: u32,
    direction: Vec3,
    /// Локальный up владельца: ось наклона разброса ⟂ (direction, up)
    up: Vec3,
    fire_requested: bool,
    reloading: bool,
    reload_timer: f32,
    /// Накопленный бюджет времени на выстрелы (idle → стремится к 0 снизу)
    spawn_time: f32,
}

impl Default for Weapon {
    fn default() -> Self {
        Self::new(WeaponConfig::default())
    }
}

impl Weapon {
    /// Новое оружие с полным магазином
    pub fn new(config: WeaponConfig) -> Self {
        Self {
            mode: config.mode,
            ammo: config.magazine,
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fire_requested: false,
            reloading: false,
            reload_timer: 0.0,
            spawn_time: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &WeaponConfig {
        &self.config
    }

    pub fn mode(&self) -> FireMode {
        self.mode
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn magazine(&self) -> u32 {
        self.config.magazine
    }

    pub fn ammo_kind(&self) -> AmmoKind {
        self.config.ammo_kind
    }

    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn is_reloading(&self) -> bool {
        self.reloading
    }

    pub fn is_fire_requested(&self) -> bool {
        self.fire_requested
    }

    pub fn spawn_budget(&self) -> f32 {
        self.spawn_time
    }

    pub fn set_direction(&mut self, direction: Vec3) {
        let direction = direction.normalize_or_zero();
        if direction != Vec3::ZERO {
            self.direction = direction;
        }
    }

    /// Up из ориентации точки вылета (обычно `rotation * Y` персонажа)
    pub fn set_up(&mut self, up: Vec3) {
        if let Some(up) = up.try_normalize() {
            self.up = up;
        }
    }

    /// Взвести выстрел на текущий кадр. `false`: запрос отклонён
    /// (уже взведён, идёт reload или магазин пуст).
    pub fn fire(&mut self) -> bool {
        if self.fire_requested || self.reloading || self.ammo == 0 {
            return false;
        }
        self.fire_requested = true;
        true
    }

    /// Начать перезарядку. `false`: уже перезаряжаемся или магазин полный.
    pub fn reload(&mut self) -> bool {
        if self.reloading || self.ammo >= self.config.magazine {
            return false;
        }
        self.reload_timer = 0.0;
        self.reloading = true;
        true
    }

    /// Single ↔ Auto, патроны и бюджет не трогаем
    pub fn switch_mode(&mut self) {
        self.mode = self.mode.toggled();
    }

    /// Снять взведённый выстрел (смерть владельца)
    pub fn cancel_fire(&mut self) {
        self.fire_requested = false;
    }

    /// Шаг оружия на `dt`. Выстрелы дописываются в `shots`.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        rng: &mut R,
        supply: &mut dyn AmmoSupply,
        shots: &mut Vec<Shot>,
    ) {
        if self.fire_requested && !self.reloading && self.ammo > 0 {
            self.spawn_time += dt;
            let interval = self.config.shot_interval();

            match self.mode {
                FireMode::Single => {
                    let offset = self.spawn_time.max(0.0);
                    shots.push(self.make_shot(rng, offset));
                    self.spawn_time -= interval;
                    self.ammo -= 1;
                }
                FireMode::Auto => {
                    while self.ammo > 0 && self.spawn_time + SHOT_EPSILON >= interval {
                        self.spawn_time -= interval;
                        let offset = self.spawn_time.max(0.0);
                        shots.push(self.make_shot(rng, offset));
                        self.ammo -= 1;
                    }
                }
            }

            if self.ammo == 0 {
                self.spawn_time = 0.0;
            }
        } else {
            // Idle оружие не копит очередь впрок
            self.spawn_time = (self.spawn_time + dt).min(0.0);
        }
        self.fire_requested = false;

        if self.reloading {
            self.reload_timer += dt;
            if self.reload_timer > self.config.reload_time {
                self.reload_timer = 0.0;
                self.reloading = false;
                let missing = self.config.magazine - self.ammo;
                let granted = supply.grant(self.config.ammo_kind, missing);
                self.ammo += granted.min(missing);
            }
        }
    }

    fn make_shot<R: Rng + ?Sized>(&self, rng: &mut R, sub_frame_offset: f32) -> Shot {
        Shot {
            direction: scatter_direction(self.direction, self.up, self.config.scatter_angle, rng),
            sub_frame_offset,
        }
    }
}

/// Разброс: наклон на [-scatter, scatter] вокруг оси ⟂ (aim, up),
/// затем поворот на [0°, 360°) вокруг самого aim: круглый конус, не веер.
///
/// `up`: локальный up точки вылета, не мировой Y.
pub fn scatter_direction<R: Rng + ?Sized>(aim: Vec3, up: Vec3, scatter_angle: f32, rng: &mut R) -> Vec3 {
    let aim = match aim.try_normalize() {
        Some(aim) => aim,
        None => Vec3::NEG_Z,
    };
    let axis = match aim.cross(up).try_normalize() {
        Some(axis) => axis,
        None => aim.any_orthonormal_vector(),
    };

    let tilt = rng.gen_range(-scatter_angle..=scatter_angle);
    let spin = rng.gen_range(0.0..360.0_f32);

    let tilted = Quat::from_axis_angle(axis, tilt.to_radians()) * aim;
    (Quat::from_axis_angle(aim, spin.to_radians()) * tilted).normalize()
}
