//! Arena: неизменяемый набор spawn/wander точек

use bevy::prelude::*;
use rand::Rng;

use crate::error::SimulationError;

/// Набор точек арены (spawn, respawn, случайные точки патруля AI)
///
/// Инвариант: не пустой (проверяется при создании).
#[derive(Resource, Debug, Clone)]
pub struct Arena {
    points: Vec<Vec3>,
}

impl Arena {
    pub fn new(points: Vec<Vec3>) -> Result<Self, SimulationError> {
        if points.is_empty() {
            return Err(SimulationError::EmptyArena);
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    /// Равномерно случайная точка из набора
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        self.points[rng.gen_range(0..self.points.len())]
    }
}
