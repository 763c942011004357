//! Discrete multi-objective environments.

pub mod living_room;

pub use living_room::LivingRoom;

use crate::types::StepResult;

/// An episodic environment with discrete observations and actions and a
/// vector-valued reward.
///
/// # Lifecycle
///
/// 1. Call [`reset`](Environment::reset) to begin an episode.
/// 2. Call [`step`](Environment::step) with actions until the result is terminal.
pub trait Environment {
    /// Number of distinct observations; observations lie in `0..num_observations()`.
    fn num_observations(&self) -> usize;

    /// Number of distinct actions.
    fn num_actions(&self) -> usize;

    /// Length of every reward vector.
    fn num_objectives(&self) -> usize;

    /// Starts a new episode and returns the first observation.
    fn reset(&mut self) -> usize;

    /// Applies `action` and returns the transition.
    fn step(&mut self, action: usize) -> StepResult;
}
