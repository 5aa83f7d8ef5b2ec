//! Tests for Locomotion.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::locomotion::{Locomotion, MovementMode};

    #[test]
    fn test_moves_at_move_speed() {
        let mut locomotion = Locomotion::new(5.0, 360.0);
        let mut position = Vec3::ZERO;

        locomotion.set_move_direction(Vec3::new(3.0, 0.0, 4.0)); // не нормализован
        locomotion.advance(0.5, &mut position);

        assert!((position.length() - 2.5).abs() < 1e-4);
        assert!(position.y.abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_does_not_move() {
        let mut locomotion = Locomotion::default();
        let mut position = Vec3::new(1.0, 0.0, 1.0);

        let frame = locomotion.advance(1.0, &mut position);
        assert_eq!(position, Vec3::new(1.0, 0.0, 1.0));
        assert_eq!(frame.mode, MovementMode::None);
    }

    #[test]
    fn test_movement_mode_buckets() {
        // Корпус смотрит в -Z
        let cases = [
            (Vec3::NEG_Z, MovementMode::Forward),
            (Vec3::Z, MovementMode::Back),
            (Vec3::NEG_X, MovementMode::Left),
            (Vec3::X, MovementMode::Right),
            (Vec3::new(-0.2, 0.0, -1.0), MovementMode::Forward),
            (Vec3::new(1.0, 0.0, 0.9), MovementMode::Right),
        ];

        for (direction, expected) in cases {
            let mut locomotion = Locomotion::default();
            let mut position = Vec3::ZERO;
            locomotion.set_move_direction(direction);
            let frame = locomotion.advance(0.016, &mut position);
            assert_eq!(frame.mode, expected, "direction {:?}", direction);
        }
    }

    #[test]
    fn test_rotation_eases_without_overshoot() {
        let mut locomotion = Locomotion::new(5.0, 90.0);
        let mut position = Vec3::ZERO;
        locomotion.set_body_direction(Vec3::NEG_X); // yaw 90°

        let frame = locomotion.advance(0.5, &mut position);
        assert!(frame.turning);
        assert!((locomotion.yaw() - 45.0).abs() < 1e-3);

        let frame = locomotion.advance(0.5, &mut position);
        assert!(frame.turning); // флаг считается до поворота
        assert!((locomotion.yaw() - 90.0).abs() < 1e-3);

        let frame = locomotion.advance(10.0, &mut position);
        assert!(!frame.turning);
        assert!((locomotion.yaw() - 90.0).abs() < 1e-3);
        assert!((locomotion.facing() - Vec3::NEG_X).length() < 1e-4);
    }

    #[test]
    fn test_rotation_takes_shortest_path() {
        let mut locomotion = Locomotion::new(5.0, 10.0);
        let mut position = Vec3::ZERO;
        // 170° → -170° через 180°, а не через 0°
        locomotion.set_body_direction(Vec3::new(-0.17364818, 0.0, 0.98480775));
        locomotion.advance(100.0, &mut position);
        assert!((locomotion.yaw() - 170.0).abs() < 1e-2);

        locomotion.set_body_direction(Vec3::new(0.17364818, 0.0, 0.98480775));
        locomotion.advance(1.0, &mut position);
        assert!(locomotion.yaw() > 170.0 || locomotion.yaw() < -170.0);
    }

    #[test]
    fn test_rotation_matches_facing() {
        let mut locomotion = Locomotion::default();
        let mut position = Vec3::ZERO;
        locomotion.set_body_direction(Vec3::new(1.0, 0.0, -1.0));
        locomotion.advance(1.0, &mut position);

        let forward = locomotion.rotation() * Vec3::NEG_Z;
        assert!((forward - locomotion.facing()).length() < 1e-4);
    }
}
