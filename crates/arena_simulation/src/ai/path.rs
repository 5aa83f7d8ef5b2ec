//! PathFollower: ведёт по waypoints маршрута из PathService

use bevy::prelude::*;

use crate::world::{PathQuery, PathStatus};

/// Что path follower сообщает brain'у за кадр
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathProgress {
    /// Маршрута нет
    Idle,
    /// Двигаться в этом направлении (горизонтальный unit vector)
    Steering(Vec3),
    /// Последний waypoint достигнут
    Arrived,
    /// PathService не нашёл маршрут
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FollowStatus {
    #[default]
    Idle,
    Following,
    Failed,
}

#[derive(Debug, Clone, Default)]
pub struct PathFollower {
    waypoints: Vec<Vec3>,
    next: usize,
    status: FollowStatus,
}

impl PathFollower {
    /// Принять новый маршрут. Partial/Invalid: провал (следующий `advance` вернёт Failed).
    pub fn move_to(&mut self, query: PathQuery) -> bool {
        self.next = 0;
        if query.status == PathStatus::Complete && !query.waypoints.is_empty() {
            self.waypoints = query.waypoints;
            self.status = FollowStatus::Following;
            true
        } else {
            self.waypoints.clear();
            self.status = FollowStatus::Failed;
            false
        }
    }

    pub fn stop(&mut self) {
        self.waypoints.clear();
        self.next = 0;
        self.status = FollowStatus::Idle;
    }

    pub fn is_following(&self) -> bool {
        self.status == FollowStatus::Following
    }

    pub fn destination(&self) -> Option<Vec3> {
        match self.status {
            FollowStatus::Following => self.waypoints.last().copied(),
            _ => None,
        }
    }

    /// Следующий шаг. Waypoint считается пройденным в пределах `tolerance` (по горизонтали).
    pub fn advance(&mut self, position: Vec3, tolerance: f32) -> PathProgress {
        match self.status {
            FollowStatus::Idle => PathProgress::Idle,
            FollowStatus::Failed => {
                self.status = FollowStatus::Idle;
                PathProgress::Failed
            }
            FollowStatus::Following => {
                while let Some(waypoint) = self.waypoints.get(self.next) {
                    let offset = *waypoint - position;
                    let flat = Vec3::new(offset.x, 0.0, offset.z);
                    if flat.length() > tolerance {
                        return PathProgress::Steering(flat.normalize());
                    }
                    self.next += 1;
                }
                self.stop();
                PathProgress::Arrived
            }
        }
    }
}
