//! Episodic agent interface.

use super::AgentError;

/// An agent driven one episode at a time.
///
/// # Lifecycle
///
/// 1. [`start`](Self::start) with the first observation; returns the first action.
/// 2. [`step`](Self::step) with each reward vector and observation until the
///    environment reports a terminal transition.
/// 3. [`end`](Self::end) with the terminal reward.
///
/// Control messages may be sent between episodes.
pub trait EpisodicAgent: Send {
    /// Begins an episode and returns the first action.
    fn start(&mut self, observation: usize) -> usize;

    /// Observes a non-terminal transition and returns the next action.
    ///
    /// # Arguments
    ///
    /// * `reward` - One reward per objective, most important first
    /// * `observation` - Observation reached by the previous action
    fn step(&mut self, reward: &[f64], observation: usize) -> usize;

    /// Observes the terminal transition.
    fn end(&mut self, reward: &[f64]);

    /// Handles a text control message and returns the reply.
    fn message(&mut self, message: &str) -> Result<String, AgentError>;

    /// Returns a human-readable name for this agent.
    fn name(&self) -> &str;
}
