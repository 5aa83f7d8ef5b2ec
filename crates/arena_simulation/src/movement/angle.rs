//! Yaw math (градусы, горизонтальная плоскость)
//!
//! Соглашение: yaw = 0° смотрит в -Z, положительный yaw: поворот против часовой
//! стрелки, если смотреть сверху (вокруг +Y). -X = +90°, +X = -90°.

use bevy::prelude::*;

/// Угол в [-180, 180)
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Кратчайшая разница `to - from` в [-180, 180)
pub fn delta_angle(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Поворот `current` к `target` не больше чем на `max_delta`, без перелёта
pub fn move_towards_angle(current: f32, target: f32, max_delta: f32) -> f32 {
    let delta = delta_angle(current, target);
    if delta.abs() <= max_delta {
        wrap_angle(target)
    } else {
        wrap_angle(current + delta.signum() * max_delta)
    }
}

/// Yaw горизонтальной проекции направления (None: вектор вырожден)
pub fn yaw_from_direction(direction: Vec3) -> Option<f32> {
    let flat = Vec2::new(direction.x, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(f32::atan2(-direction.x, -direction.z).to_degrees())
}

/// Единичный горизонтальный вектор для yaw
pub fn direction_from_yaw(yaw: f32) -> Vec3 {
    let radians = yaw.to_radians();
    Vec3::new(-radians.sin(), 0.0, -radians.cos())
}

/// Знаковый угол между двумя направлениями в горизонтальной плоскости
pub fn signed_angle(from: Vec3, to: Vec3) -> Option<f32> {
    Some(delta_angle(yaw_from_direction(from)?, yaw_from_direction(to)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaw_convention() {
        assert!(yaw_from_direction(Vec3::NEG_Z).unwrap().abs() < 1e-4);
        assert!((yaw_from_direction(Vec3::NEG_X).unwrap() - 90.0).abs() < 1e-4);
        assert!((yaw_from_direction(Vec3::X).unwrap() + 90.0).abs() < 1e-4);
        assert!(yaw_from_direction(Vec3::Y).is_none());

        for yaw in [-170.0, -90.0, 0.0, 33.0, 120.0] {
            let back = yaw_from_direction(direction_from_yaw(yaw)).unwrap();
            assert!(delta_angle(back, yaw).abs() < 1e-3);
        }
    }

    #[test]
    fn test_rotation_matches_yaw() {
        // Quat::from_rotation_y(yaw) переводит -Z в direction_from_yaw(yaw)
        for yaw in [-135.0_f32, -30.0, 0.0, 75.0, 179.0] {
            let rotated = Quat::from_rotation_y(yaw.to_radians()) * Vec3::NEG_Z;
            assert!((rotated - direction_from_yaw(yaw)).length() < 1e-4);
        }
    }

    #[test]
    fn test_shortest_path_wraps() {
        assert!((delta_angle(170.0, -170.0) - 20.0).abs() < 1e-4);
        assert!((delta_angle(-170.0, 170.0) + 20.0).abs() < 1e-4);
        assert!((move_towards_angle(170.0, -170.0, 5.0) - 175.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_towards_never_overshoots() {
        let mut angle = 0.0;
        for _ in 0..100 {
            let next = move_towards_angle(angle, 90.0, 7.0);
            assert!(next <= 90.0 + 1e-4);
            assert!(next >= angle);
            angle = next;
        }
        assert!((angle - 90.0).abs() < 1e-4);
    }
}
