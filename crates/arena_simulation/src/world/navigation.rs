//! Path service: внешний pathfinding (navmesh), здесь только интерфейс
//!
//! Маршрут пересчитывается целиком на каждый новый destination, не инкрементально.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStatus {
    /// Маршрут до destination найден полностью
    Complete,
    /// Маршрут ведёт только до ближайшей достижимой точки
    Partial,
    /// Маршрута нет
    Invalid,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    pub status: PathStatus,
    /// Упорядоченные waypoints (включая стартовую точку)
    pub waypoints: Vec<Vec3>,
}

impl PathQuery {
    pub fn invalid() -> Self {
        Self {
            status: PathStatus::Invalid,
            waypoints: Vec::new(),
        }
    }
}

pub trait PathService: Send + Sync {
    fn find_path(&self, start: Vec3, destination: Vec3) -> PathQuery;
}

/// Прямой маршрут start → destination (арена без препятствий / headless тесты)
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectPathService;

impl PathService for DirectPathService {
    fn find_path(&self, start: Vec3, destination: Vec3) -> PathQuery {
        PathQuery {
            status: PathStatus::Complete,
            waypoints: vec![start, destination],
        }
    }
}

/// Resource-обёртка: path service, который использует AI
#[derive(Resource)]
pub struct NavigationService(pub Box<dyn PathService>);

impl Default for NavigationService {
    fn default() -> Self {
        Self(Box::new(DirectPathService))
    }
}

impl NavigationService {
    pub fn new(service: impl PathService + 'static) -> Self {
        Self(Box::new(service))
    }
}
