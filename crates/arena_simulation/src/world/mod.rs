//! Мир арены: spawn points, spatial queries, навигация
//!
//! Arena, physics и navmesh: ресурсы/trait'ы, которые явно передаются в simulation step
//! (никаких глобальных singleton'ов).
//!
//! - arena: набор spawn/wander точек
//! - collision: collision layers, `SpatialQuery` trait, `CollisionWorld` (rapier shapes)
//! - navigation: `PathService` trait + прямолинейная реализация по умолчанию

pub mod arena;
pub mod collision;
pub mod navigation;

pub use arena::Arena;
pub use collision::{
    sync_collision_world, CollisionWorld, Obstacle, RayHit, SpatialQuery, SurfaceKind, HIT_MASK,
    LAYER_CHARACTER, LAYER_GROUND,
};
pub use navigation::{DirectPathService, NavigationService, PathQuery, PathService, PathStatus};
