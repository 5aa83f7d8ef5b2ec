//! Spatial queries: ray cast + overlap по collider'ам арены
//!
//! ## Layers (битовая маска):
//! - `LAYER_CHARACTER`: capsule персонажей (player + AI)
//! - `LAYER_GROUND`: земля, стены, препятствия (`Obstacle`)
//!
//! Пули и LOS-лучи используют `HIT_MASK` (characters + ground).
//!
//! `CollisionWorld` пересобирается каждый кадр из Transform'ов (после locomotion),
//! запросы: brute force по всем телам (персонажей на арене единицы).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::actor::CharacterBody;

/// Layer: персонажи
pub const LAYER_CHARACTER: u32 = 0b01;

/// Layer: земля и препятствия
pub const LAYER_GROUND: u32 = 0b10;

/// Mask: всё, во что попадает пуля / что перекрывает видимость
pub const HIT_MASK: u32 = LAYER_CHARACTER | LAYER_GROUND;

/// Категория поверхности, в которую попал луч
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    Ground,
    Character(Entity),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub surface: SurfaceKind,
    pub distance: f32,
    pub point: Vec3,
}

/// Spatial query service
///
/// `direction`: нормализованный вектор. `exclude`: collider, который луч игнорирует
/// (LOS-луч стартует на поверхности собственной capsule).
pub trait SpatialQuery {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit>;

    /// Все character collider'ы в радиусе (порядок стабильный)
    fn overlap_characters(&self, center: Vec3, radius: f32) -> Vec<Entity>;
}

/// Marker: статическое препятствие/земля (Collider + Transform)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Obstacle;

#[derive(Clone)]
struct CollisionBody {
    entity: Entity,
    layer: u32,
    collider: Collider,
    translation: Vec3,
    rotation: Quat,
}

#[derive(Resource, Default, Clone)]
pub struct CollisionWorld {
    bodies: Vec<CollisionBody>,
}

impl CollisionWorld {
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn insert_obstacle(&mut self, entity: Entity, collider: Collider, transform: &Transform) {
        self.bodies.push(CollisionBody {
            entity,
            layer: LAYER_GROUND,
            collider,
            translation: transform.translation,
            rotation: transform.rotation,
        });
    }

    /// Capsule от ног (position) до макушки (position + height)
    pub fn insert_character(&mut self, entity: Entity, position: Vec3, body: &CharacterBody) {
        let half_segment = (body.height * 0.5 - body.radius).max(0.0);
        self.bodies.push(CollisionBody {
            entity,
            layer: LAYER_CHARACTER,
            collider: Collider::capsule_y(half_segment, body.radius),
            translation: body.center(position),
            rotation: Quat::IDENTITY,
        });
    }
}

impl SpatialQuery for CollisionWorld {
    fn cast_ray(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: u32,
        exclude: Option<Entity>,
    ) -> Option<RayHit> {
        let mut nearest: Option<(f32, &CollisionBody)> = None;

        for body in &self.bodies {
            if body.layer & mask == 0 || Some(body.entity) == exclude {
                continue;
            }
            let Some(toi) = body.collider.cast_ray(
                body.translation,
                body.rotation,
                origin,
                direction,
                max_distance,
                true,
            ) else {
                continue;
            };
            if nearest.map_or(true, |(best, _)| toi < best) {
                nearest = Some((toi, body));
            }
        }

        nearest.map(|(distance, body)| RayHit {
            entity: body.entity,
            surface: if body.layer == LAYER_CHARACTER {
                SurfaceKind::Character(body.entity)
            } else {
                SurfaceKind::Ground
            },
            distance,
            point: origin + direction * distance,
        })
    }

    fn overlap_characters(&self, center: Vec3, radius: f32) -> Vec<Entity> {
        self.bodies
            .iter()
            .filter(|body| body.layer == LAYER_CHARACTER)
            .filter(|body| {
                body.collider
                    .distance_to_point(body.translation, body.rotation, center, true)
                    <= radius
            })
            .map(|body| body.entity)
            .collect()
    }
}

/// Система: пересборка CollisionWorld из текущих Transform'ов
///
/// Запускается после locomotion: пули этого кадра видят актуальные позиции.
pub fn sync_collision_world(
    mut world: ResMut<CollisionWorld>,
    obstacles: Query<(Entity, &Transform, &Collider), With<Obstacle>>,
    characters: Query<(Entity, &Transform, &CharacterBody)>,
) {
    world.clear();

    for (entity, transform, collider) in obstacles.iter() {
        world.insert_obstacle(entity, collider.clone(), transform);
    }

    for (entity, transform, body) in characters.iter() {
        world.insert_character(entity, transform.translation, body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena_with_wall() -> (CollisionWorld, Entity, Entity) {
        let wall = Entity::from_raw(1);
        let character = Entity::from_raw(2);
        let mut world = CollisionWorld::default();

        // Стена 1m толщиной на z = -10
        world.insert_obstacle(
            wall,
            Collider::cuboid(5.0, 2.0, 0.5),
            &Transform::from_xyz(0.0, 2.0, -10.0),
        );
        world.insert_character(character, Vec3::new(0.0, 0.0, -5.0), &CharacterBody::default());
        (world, wall, character)
    }

    #[test]
    fn test_ray_hits_nearest_surface() {
        let (world, _wall, character) = arena_with_wall();

        let hit = world
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, 20.0, HIT_MASK, None)
            .expect("ray should hit character first");

        assert_eq!(hit.surface, SurfaceKind::Character(character));
        assert!((hit.distance - 4.5).abs() < 1e-3, "distance = {}", hit.distance);
    }

    #[test]
    fn test_ray_mask_and_exclude() {
        let (world, wall, character) = arena_with_wall();
        let origin = Vec3::new(0.0, 1.0, 0.0);

        let ground_only = world
            .cast_ray(origin, Vec3::NEG_Z, 20.0, LAYER_GROUND, None)
            .expect("wall hit");
        assert_eq!(ground_only.entity, wall);
        assert_eq!(ground_only.surface, SurfaceKind::Ground);

        let excluded = world
            .cast_ray(origin, Vec3::NEG_Z, 20.0, HIT_MASK, Some(character))
            .expect("wall hit");
        assert_eq!(excluded.entity, wall);
        assert!((excluded.distance - 9.5).abs() < 1e-3);
    }

    #[test]
    fn test_ray_respects_max_distance() {
        let (world, _, _) = arena_with_wall();
        assert!(world
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Z, 2.0, HIT_MASK, None)
            .is_none());
        assert!(world
            .cast_ray(Vec3::new(0.0, 1.0, 0.0), Vec3::Z, 50.0, HIT_MASK, None)
            .is_none());
    }

    #[test]
    fn test_overlap_characters_radius() {
        let (world, _, character) = arena_with_wall();

        assert_eq!(world.overlap_characters(Vec3::ZERO, 15.0), vec![character]);
        assert!(world.overlap_characters(Vec3::new(0.0, 0.0, 20.0), 15.0).is_empty());
    }
}
