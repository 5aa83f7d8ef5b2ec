//! AI brain: выбор цели, line-of-sight, прицеливание, патруль по случайным точкам
//!
//! Решение пересчитывается каждый кадр с нуля (ничего не ставится в очередь),
//! поэтому неудачный path query или потерянная видимость лечатся на следующем кадре.

use bevy::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::ai::path::{PathFollower, PathProgress};
use crate::combat::Weapon;
use crate::logger;
use crate::movement::{signed_angle, Locomotion};
use crate::world::{Arena, PathService, SpatialQuery, HIT_MASK};

/// AI FSM состояния
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AIState {
    /// Нет цели: идём к случайной точке арены
    #[default]
    SeekingPoint,
    /// Цель жива и (на прошлой проверке) видна
    Engaging { target: Entity },
    /// Мёртв, ждём respawn
    Dead { respawn_timer: f32 },
}

/// Параметры AI
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct AIConfig {
    /// Задержка до respawn (секунды)
    pub respawn_delay: f32,
    /// Радиус поиска целей (м)
    pub detection_radius: f32,
    /// Длина LOS-луча (м)
    pub visibility_distance: f32,
    /// Допуск прицеливания (градусы)
    pub aim_tolerance: f32,
    /// Период сканирования целей (секунды)
    pub scan_interval: f32,
    /// Waypoint считается пройденным на этой дистанции (м)
    pub waypoint_tolerance: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            respawn_delay: 3.0,
            detection_radius: 15.0,
            visibility_distance: 15.0,
            aim_tolerance: 5.0,
            scan_interval: 0.25,
            waypoint_tolerance: 0.3,
        }
    }
}

/// Снимок персонажа на начало кадра (то, что AI знает о других)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterView {
    pub entity: Entity,
    pub position: Vec3,
    /// Центр capsule (position + половина роста)
    pub center: Vec3,
    pub radius: f32,
    pub alive: bool,
}

/// Все персонажи кадра (стабильный порядок)
#[derive(Debug, Clone, Default)]
pub struct CharacterRoster {
    views: Vec<CharacterView>,
}

impl CharacterRoster {
    pub fn new(views: Vec<CharacterView>) -> Self {
        Self { views }
    }

    pub fn get(&self, entity: Entity) -> Option<&CharacterView> {
        self.views.iter().find(|view| view.entity == entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterView> {
        self.views.iter()
    }
}

/// Сервисы, которые brain получает на кадр
pub struct AiContext<'a> {
    pub spatial: &'a dyn SpatialQuery,
    pub paths: &'a dyn PathService,
    pub arena: &'a Arena,
    pub roster: &'a CharacterRoster,
    pub rng: &'a mut dyn RngCore,
}

/// Behavior controller одного AI агента
#[derive(Debug, Clone, Default)]
pub struct AiBrain {
    config: AIConfig,
    state: AIState,
    path: PathFollower,
    scan_timer: f32,
    destinations_requested: u32,
}

impl AiBrain {
    pub fn new(config: AIConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &AIConfig {
        &self.config
    }

    pub fn state(&self) -> AIState {
        self.state
    }

    pub fn target(&self) -> Option<Entity> {
        match self.state {
            AIState::Engaging { target } => Some(target),
            _ => None,
        }
    }

    /// Сколько раз запрашивалась новая случайная точка
    pub fn destinations_requested(&self) -> u32 {
        self.destinations_requested
    }

    pub fn destination(&self) -> Option<Vec3> {
        self.path.destination()
    }

    /// onHit: стрелявший сразу становится целью
    pub fn on_hit(&mut self, me: Entity, instigator: Option<Entity>) {
        if matches!(self.state, AIState::Dead { .. }) {
            return;
        }
        if let Some(instigator) = instigator.filter(|instigator| *instigator != me) {
            if self.target() != Some(instigator) {
                logger::log(&format!("🎯 AI {:?}: hit by {:?} → engaging", me, instigator));
            }
            self.state = AIState::Engaging { target: instigator };
        }
    }

    /// onDead: стоп, без цели, запускаем respawn таймер
    pub fn on_dead(&mut self) {
        // Повторное уведомление не перезапускает таймер
        if matches!(self.state, AIState::Dead { .. }) {
            return;
        }
        self.path.stop();
        self.scan_timer = 0.0;
        self.state = AIState::Dead { respawn_timer: 0.0 };
    }

    /// onRespawn: все таймеры и маршрут сброшены
    pub fn on_respawn(&mut self) {
        self.path.stop();
        self.scan_timer = 0.0;
        self.state = AIState::SeekingPoint;
    }

    /// Решение на кадр. Возвращает `true`, когда пора respawn'иться.
    pub fn think(
        &mut self,
        dt: f32,
        me: &CharacterView,
        locomotion: &mut Locomotion,
        weapon: Option<&mut Weapon>,
        ctx: &mut AiContext,
    ) -> bool {
        // Смерть без CharacterDied (урон мимо projectile системы): onDead здесь
        if !me.alive && !matches!(self.state, AIState::Dead { .. }) {
            logger::log(&format!("AI {:?}: dead without notification", me.entity));
            self.on_dead();
        }

        if let AIState::Dead { respawn_timer } = &mut self.state {
            locomotion.stop();
            *respawn_timer += dt;
            return *respawn_timer > self.config.respawn_delay;
        }

        // Цель умерла / исчезла → обратно в патруль
        if let AIState::Engaging { target } = self.state {
            if !ctx.roster.get(target).is_some_and(|view| view.alive) {
                logger::log(&format!("AI {:?}: target {:?} is gone", me.entity, target));
                self.state = AIState::SeekingPoint;
            }
        }

        if self.state == AIState::SeekingPoint {
            self.scan_timer -= dt;
            if self.scan_timer <= 0.0 {
                self.scan_timer = self.config.scan_interval;
                if let Some(target) = self.scan(me, ctx) {
                    logger::log(&format!("🎯 AI {:?}: spotted {:?}", me.entity, target));
                    self.state = AIState::Engaging { target };
                }
            }
        }

        let steering = self.steer(me.position, ctx);
        locomotion.set_move_direction(steering);

        match self.state {
            AIState::Engaging { target } => {
                if !self.engage(target, me, locomotion, weapon, ctx) {
                    logger::log(&format!("AI {:?}: lost sight of {:?}", me.entity, target));
                    self.state = AIState::SeekingPoint;
                    locomotion.set_body_direction(steering);
                }
            }
            _ => {
                // Свободное движение: смотрим куда идём, перезаряжаемся впрок
                locomotion.set_body_direction(steering);
                if let Some(weapon) = weapon {
                    weapon.set_direction(locomotion.facing());
                    weapon.reload();
                }
            }
        }

        false
    }

    /// Первый живой персонаж (не я) в радиусе обнаружения
    fn scan(&self, me: &CharacterView, ctx: &AiContext) -> Option<Entity> {
        ctx.spatial
            .overlap_characters(me.position, self.config.detection_radius)
            .into_iter()
            .filter(|candidate| *candidate != me.entity)
            .find(|candidate| ctx.roster.get(*candidate).is_some_and(|view| view.alive))
    }

    /// Направление движения по маршруту; закончился/сломался: новая случайная точка
    fn steer(&mut self, position: Vec3, ctx: &mut AiContext) -> Vec3 {
        if let PathProgress::Steering(direction) =
            self.path.advance(position, self.config.waypoint_tolerance)
        {
            return direction;
        }

        let destination = ctx.arena.random_point(&mut *ctx.rng);
        self.destinations_requested += 1;
        self.path.move_to(ctx.paths.find_path(position, destination));

        match self.path.advance(position, self.config.waypoint_tolerance) {
            PathProgress::Steering(direction) => direction,
            _ => Vec3::ZERO,
        }
    }

    /// LOS + прицеливание. `false`: цель не видна.
    fn engage(
        &self,
        target: Entity,
        me: &CharacterView,
        locomotion: &mut Locomotion,
        weapon: Option<&mut Weapon>,
        ctx: &AiContext,
    ) -> bool {
        let Some(view) = ctx.roster.get(target) else {
            return false;
        };
        let Some(direction) = (view.center - me.center).try_normalize() else {
            return true;
        };

        let origin = me.center + direction * me.radius;
        let visible = ctx
            .spatial
            .cast_ray(origin, direction, self.config.visibility_distance, HIT_MASK, Some(me.entity))
            .is_some_and(|hit| hit.entity == target);
        if !visible {
            return false;
        }

        // Поворачиваемся к цели всегда, стреляем только когда довернулись
        locomotion.set_body_direction(direction);
        let aligned = signed_angle(locomotion.facing(), direction)
            .is_some_and(|angle| angle.abs() <= self.config.aim_tolerance);

        if let Some(weapon) = weapon {
            weapon.set_direction(direction);
            if aligned {
                weapon.fire();
            }
            if weapon.ammo() == 0 {
                weapon.reload();
            }
        }
        true
    }
}
