//! Random agent for testing and baselines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::interface::EpisodicAgent;
use super::messages::ControlMessage;
use super::AgentError;

/// Uniformly random action selection.
///
/// Ignores observations and rewards. Used for sanity checks and as a
/// lower-bound baseline.
pub struct RandomAgent {
    num_actions: usize,
    rng: StdRng,
}

impl RandomAgent {
    /// Creates a new random agent.
    ///
    /// # Arguments
    ///
    /// * `num_actions` - Number of possible actions.
    /// * `seed` - Random seed for reproducible runs.
    pub fn new(num_actions: usize, seed: u64) -> Self {
        Self {
            num_actions,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn act(&mut self) -> usize {
        self.rng.gen_range(0..self.num_actions)
    }
}

impl EpisodicAgent for RandomAgent {
    fn start(&mut self, _observation: usize) -> usize {
        self.act()
    }

    fn step(&mut self, _reward: &[f64], _observation: usize) -> usize {
        self.act()
    }

    fn end(&mut self, _reward: &[f64]) {}

    fn message(&mut self, message: &str) -> Result<String, AgentError> {
        Ok(match message.parse::<ControlMessage>()? {
            ControlMessage::GetAgentName => self.name().to_string(),
            _ => format!("{} does not understand your message.", self.name()),
        })
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_agent_actions_in_range() {
        let mut agent = RandomAgent::new(4, 1);
        assert!(agent.start(0) < 4);
        for _ in 0..100 {
            assert!(agent.step(&[0.0], 0) < 4);
        }
    }

    #[test]
    fn random_agent_covers_actions() {
        let mut agent = RandomAgent::new(3, 2);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[agent.step(&[], 0)] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn random_agent_answers_name() {
        let mut agent = RandomAgent::new(2, 3);
        assert_eq!(agent.message("get_agent_name").unwrap(), "random");
        assert!(agent
            .message("freeze_learning")
            .unwrap()
            .contains("does not understand"));
    }
}
