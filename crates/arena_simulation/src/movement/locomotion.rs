//! LocomotionController: вектор движения → смещение, плавный поворот корпуса
//!
//! Классификация движения (Forward/Back/Left/Right) только для анимации,
//! на физику не влияет.

use bevy::prelude::*;

use crate::movement::angle::{
    delta_angle, direction_from_yaw, move_towards_angle, signed_angle, yaw_from_direction,
};

/// Порог "ещё поворачивается" (градусы)
const TURN_THRESHOLD: f32 = 0.5;

/// Вектор движения короче этого считается нулевым
const MOVE_EPSILON: f32 = 1e-4;

/// Режим движения относительно корпуса (для animation sink)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum MovementMode {
    #[default]
    None,
    Forward,
    Back,
    Left,
    Right,
}

impl MovementMode {
    /// Bucket по знаковому углу (движение относительно facing)
    pub fn from_signed_angle(angle: f32) -> Self {
        if (-45.0..45.0).contains(&angle) {
            MovementMode::Forward
        } else if (45.0..135.0).contains(&angle) {
            MovementMode::Left
        } else if (-135.0..-45.0).contains(&angle) {
            MovementMode::Right
        } else {
            MovementMode::Back
        }
    }
}

/// Результат шага locomotion
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionFrame {
    pub mode: MovementMode,
    pub turning: bool,
}

/// Движение + поворот корпуса
///
/// `move_direction` и `body_direction` задаются каждый кадр извне
/// (AI brain или PlayerIntent).
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    /// м/с
    pub move_speed: f32,
    /// градусы/сек
    pub rotation_speed: f32,
    move_direction: Vec3,
    body_direction: Vec3,
    /// Текущий yaw корпуса (градусы)
    current_angle: f32,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self::new(5.0, 360.0)
    }
}

impl Locomotion {
    pub fn new(move_speed: f32, rotation_speed: f32) -> Self {
        Self {
            move_speed,
            rotation_speed,
            move_direction: Vec3::ZERO,
            body_direction: Vec3::NEG_Z,
            current_angle: 0.0,
        }
    }

    pub fn set_move_direction(&mut self, direction: Vec3) {
        self.move_direction = Vec3::new(direction.x, 0.0, direction.z);
    }

    /// Нулевой/вертикальный вектор игнорируется (держим прежнее направление)
    pub fn set_body_direction(&mut self, direction: Vec3) {
        if yaw_from_direction(direction).is_some() {
            self.body_direction = Vec3::new(direction.x, 0.0, direction.z).normalize();
        }
    }

    pub fn move_direction(&self) -> Vec3 {
        self.move_direction
    }

    pub fn body_direction(&self) -> Vec3 {
        self.body_direction
    }

    pub fn yaw(&self) -> f32 {
        self.current_angle
    }

    /// Куда сейчас смотрит корпус
    pub fn facing(&self) -> Vec3 {
        direction_from_yaw(self.current_angle)
    }

    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.current_angle.to_radians())
    }

    pub fn stop(&mut self) {
        self.move_direction = Vec3::ZERO;
    }

    /// Сброс после respawn: стоим, смотрим туда же, куда целимся
    pub fn reset(&mut self) {
        self.stop();
        self.body_direction = self.facing();
    }

    /// Шаг на `dt`: смещает `position`, доворачивает корпус
    pub fn advance(&mut self, dt: f32, position: &mut Vec3) -> LocomotionFrame {
        let mut frame = LocomotionFrame::default();

        if self.move_direction.length() > MOVE_EPSILON {
            let direction = self.move_direction.normalize();
            *position += direction * self.move_speed * dt;
            if let Some(angle) = signed_angle(self.facing(), direction) {
                frame.mode = MovementMode::from_signed_angle(angle);
            }
        }

        if let Some(target) = yaw_from_direction(self.body_direction) {
            let remaining = delta_angle(self.current_angle, target);
            frame.turning = remaining.abs() > TURN_THRESHOLD;
            self.current_angle =
                move_towards_angle(self.current_angle, target, self.rotation_speed * dt);
        }

        frame
    }
}
