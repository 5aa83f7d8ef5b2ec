//! AI module: behavior controller агентов
//!
//! - brain: FSM (SeekingPoint → Engaging → Dead), LOS, прицеливание
//! - path: следование по маршруту из PathService
//!
//! Системы, которые вызывают `AiBrain::think`, живут в actor module
//! (общий decide-шаг для player и AI).

pub mod brain;
pub mod path;

#[cfg(test)]
mod brain_tests;

pub use brain::{AIConfig, AIState, AiBrain, AiContext, CharacterRoster, CharacterView};
pub use path::{PathFollower, PathProgress};
