//! Tests for AI brain (targeting, LOS, патруль).

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use bevy::prelude::*;
    use bevy_rapier3d::prelude::Collider;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::super::brain::{AIConfig, AIState, AiBrain, AiContext, CharacterRoster, CharacterView};
    use crate::actor::CharacterBody;
    use crate::combat::{Weapon, WeaponConfig};
    use crate::movement::Locomotion;
    use crate::world::{Arena, CollisionWorld, DirectPathService, PathQuery, PathService, PathStatus};

    const DT: f32 = 1.0 / 60.0;

    fn me() -> Entity {
        Entity::from_raw(1)
    }

    fn enemy() -> Entity {
        Entity::from_raw(2)
    }

    fn view(entity: Entity, position: Vec3, alive: bool) -> CharacterView {
        let body = CharacterBody::default();
        CharacterView {
            entity,
            position,
            center: body.center(position),
            radius: body.radius,
            alive,
        }
    }

    fn world_of(views: &[CharacterView]) -> CollisionWorld {
        let mut world = CollisionWorld::default();
        for view in views {
            world.insert_character(view.entity, view.position, &CharacterBody::default());
        }
        world
    }

    /// Navmesh, который первые `failures` запросов не находит маршрут
    struct FlakyPathService {
        failures: u32,
        status: PathStatus,
        calls: AtomicU32,
    }

    impl FlakyPathService {
        fn new(failures: u32, status: PathStatus) -> Self {
            Self {
                failures,
                status,
                calls: AtomicU32::new(0),
            }
        }
    }

    impl PathService for FlakyPathService {
        fn find_path(&self, start: Vec3, destination: Vec3) -> PathQuery {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return match self.status {
                    PathStatus::Partial => PathQuery {
                        status: PathStatus::Partial,
                        waypoints: vec![start, (start + destination) * 0.5],
                    },
                    _ => PathQuery::invalid(),
                };
            }
            DirectPathService.find_path(start, destination)
        }
    }

    fn arena() -> Arena {
        Arena::new(vec![Vec3::new(-4.0, 0.0, 4.0), Vec3::new(4.0, 0.0, 4.0)]).unwrap()
    }

    #[test]
    fn test_without_targets_never_fires_and_keeps_wandering() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        let mut weapon = Weapon::new(WeaponConfig::rifle());
        let mut position = Vec3::ZERO;

        for _ in 0..1_200 {
            let views = [view(me(), position, true)];
            let spatial = world_of(&views);
            let roster = CharacterRoster::new(views.to_vec());
            let mut ctx = AiContext {
                spatial: &spatial,
                paths: &DirectPathService,
                arena: &arena,
                roster: &roster,
                rng: &mut rng,
            };

            let respawn = brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);
            assert!(!respawn);
            assert!(!weapon.is_fire_requested());
            assert_eq!(brain.state(), AIState::SeekingPoint);

            locomotion.advance(DT, &mut position);
        }

        // 20 секунд по 5 м/с между точками в 8 м: точка сменилась много раз
        assert!(brain.destinations_requested() > 5, "{}", brain.destinations_requested());
        assert_eq!(weapon.ammo(), weapon.magazine());
    }

    #[test]
    fn test_spots_visible_target_and_fires_when_aligned() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        let mut weapon = Weapon::new(WeaponConfig::rifle());

        let views = [
            view(me(), Vec3::ZERO, true),
            view(enemy(), Vec3::new(0.0, 0.0, -8.0), true),
        ];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);

        assert_eq!(brain.state(), AIState::Engaging { target: enemy() });
        assert!(weapon.is_fire_requested());
        assert!((weapon.direction() - Vec3::NEG_Z).length() < 1e-4);
    }

    #[test]
    fn test_turns_before_firing() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::new(5.0, 360.0);
        let mut weapon = Weapon::new(WeaponConfig::rifle());

        let views = [
            view(me(), Vec3::ZERO, true),
            view(enemy(), Vec3::new(8.0, 0.0, 0.0), true),
        ];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);
        assert_eq!(brain.target(), Some(enemy()));
        assert!(!weapon.is_fire_requested()); // смотрим в -Z, цель на +X

        // Доворот на 90° при 360°/с
        let mut position = Vec3::ZERO;
        locomotion.advance(0.25, &mut position);
        weapon.cancel_fire();

        brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);
        assert!(weapon.is_fire_requested());
    }

    #[test]
    fn test_wall_blocks_line_of_sight() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        let mut weapon = Weapon::new(WeaponConfig::rifle());

        let views = [
            view(me(), Vec3::ZERO, true),
            view(enemy(), Vec3::new(0.0, 0.0, -8.0), true),
        ];
        let mut spatial = world_of(&views);
        spatial.insert_obstacle(
            Entity::from_raw(3),
            Collider::cuboid(3.0, 2.0, 0.25),
            &Transform::from_xyz(0.0, 1.0, -4.0),
        );
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);

        assert_eq!(brain.state(), AIState::SeekingPoint);
        assert!(!weapon.is_fire_requested());
    }

    #[test]
    fn test_dead_target_is_dropped_and_not_reacquired() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        let mut weapon = Weapon::new(WeaponConfig::rifle());

        brain.on_hit(me(), Some(enemy()));
        assert_eq!(brain.target(), Some(enemy()));

        let views = [
            view(me(), Vec3::ZERO, true),
            view(enemy(), Vec3::new(0.0, 0.0, -8.0), false),
        ];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        for _ in 0..60 {
            brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);
            assert_eq!(brain.target(), None);
            assert!(!weapon.is_fire_requested());
        }
    }

    #[test]
    fn test_hit_acquires_instigator_but_not_self() {
        let mut brain = AiBrain::new(AIConfig::default());

        brain.on_hit(me(), Some(me()));
        assert_eq!(brain.target(), None);

        brain.on_hit(me(), None);
        assert_eq!(brain.target(), None);

        brain.on_hit(me(), Some(enemy()));
        assert_eq!(brain.target(), Some(enemy()));
    }

    #[test]
    fn test_respawn_after_delay() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        locomotion.set_move_direction(Vec3::X);

        let views = [view(me(), Vec3::ZERO, false)];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        brain.on_dead();
        brain.on_hit(me(), Some(enemy())); // мёртвым цель не нужна
        assert!(matches!(brain.state(), AIState::Dead { .. }));

        let mut frames = 0;
        while !brain.think(0.5, &views[0], &mut locomotion, None, &mut ctx) {
            frames += 1;
            assert!(frames < 100);
        }
        // 3 секунды по 0.5: respawn когда таймер > 3.0 → на 7-м кадре
        assert_eq!(frames, 6);
        assert_eq!(locomotion.move_direction(), Vec3::ZERO);

        brain.on_respawn();
        assert_eq!(brain.state(), AIState::SeekingPoint);
    }

    #[test]
    fn test_failed_path_requests_new_destination_every_frame() {
        for status in [PathStatus::Invalid, PathStatus::Partial] {
            let arena = arena();
            let mut rng = ChaCha8Rng::seed_from_u64(11);
            let paths = FlakyPathService::new(u32::MAX, status);
            let mut brain = AiBrain::new(AIConfig::default());
            let mut locomotion = Locomotion::default();
            let mut weapon = Weapon::new(WeaponConfig::rifle());

            let views = [view(me(), Vec3::ZERO, true)];
            let spatial = world_of(&views);
            let roster = CharacterRoster::new(views.to_vec());
            let mut ctx = AiContext {
                spatial: &spatial,
                paths: &paths,
                arena: &arena,
                roster: &roster,
                rng: &mut rng,
            };

            for frame in 1..=30 {
                let respawn = brain.think(DT, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx);
                assert!(!respawn);
                assert_eq!(brain.state(), AIState::SeekingPoint);
                assert_eq!(brain.destination(), None);
                assert_eq!(locomotion.move_direction(), Vec3::ZERO);
                assert_eq!(brain.destinations_requested(), frame, "{:?}", status);
            }
        }
    }

    #[test]
    fn test_recovers_when_path_service_starts_answering() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let paths = FlakyPathService::new(3, PathStatus::Invalid);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();

        let views = [view(me(), Vec3::ZERO, true)];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &paths,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        for _ in 0..3 {
            brain.think(DT, &views[0], &mut locomotion, None, &mut ctx);
            assert_eq!(locomotion.move_direction(), Vec3::ZERO);
        }

        brain.think(DT, &views[0], &mut locomotion, None, &mut ctx);
        assert_eq!(brain.destinations_requested(), 4);
        let destination = brain.destination().expect("complete path after failures");
        let expected = Vec3::new(destination.x, 0.0, destination.z).normalize();
        assert!((locomotion.move_direction() - expected).length() < 1e-4);

        // Маршрут есть: новых запросов нет, пока не дошли
        brain.think(DT, &views[0], &mut locomotion, None, &mut ctx);
        assert_eq!(brain.destinations_requested(), 4);
    }

    #[test]
    fn test_death_without_notification_starts_respawn_timer() {
        let arena = arena();
        let mut rng = ChaCha8Rng::seed_from_u64(13);
        let mut brain = AiBrain::new(AIConfig::default());
        let mut locomotion = Locomotion::default();
        let mut weapon = Weapon::new(WeaponConfig::rifle());

        let views = [view(me(), Vec3::ZERO, false)];
        let spatial = world_of(&views);
        let roster = CharacterRoster::new(views.to_vec());
        let mut ctx = AiContext {
            spatial: &spatial,
            paths: &DirectPathService,
            arena: &arena,
            roster: &roster,
            rng: &mut rng,
        };

        // on_dead() не вызывался: brain узнаёт о смерти из roster
        assert_eq!(brain.state(), AIState::SeekingPoint);
        assert!(!brain.think(0.5, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx));
        assert_eq!(brain.state(), AIState::Dead { respawn_timer: 0.5 });

        // Запоздавший CharacterDied того же кадра не сбрасывает таймер
        brain.on_dead();
        assert_eq!(brain.state(), AIState::Dead { respawn_timer: 0.5 });
        assert!(!weapon.is_fire_requested());
        assert_eq!(locomotion.move_direction(), Vec3::ZERO);

        let mut frames = 1;
        while !brain.think(0.5, &views[0], &mut locomotion, Some(&mut weapon), &mut ctx) {
            frames += 1;
            assert!(frames < 100);
        }
        assert_eq!(frames, 6);
    }
}
