//! Episode runner and evaluation metrics.
//!
//! Drives an [`EpisodicAgent`] through an [`Environment`] and aggregates
//! per-objective returns over multiple episodes.

use std::fmt;

use crate::agent::EpisodicAgent;
use crate::environment::Environment;

/// Result of one episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeOutcome {
    /// Undiscounted return per objective.
    pub returns: Vec<f64>,
    /// Environment steps taken.
    pub steps: u32,
    /// Whether the environment reached a terminal state within the step limit.
    pub completed: bool,
}

/// Runs one episode of at most `max_steps` environment steps.
///
/// An episode cut off by the step limit is abandoned without calling
/// [`EpisodicAgent::end`], so no terminal update is made for it.
pub fn run_episode(
    env: &mut dyn Environment,
    agent: &mut dyn EpisodicAgent,
    max_steps: u32,
) -> EpisodeOutcome {
    let mut returns = vec![0.0; env.num_objectives()];
    let mut action = agent.start(env.reset());
    let mut steps = 0;

    while steps < max_steps {
        let result = env.step(action);
        steps += 1;
        for (total, r) in returns.iter_mut().zip(&result.reward) {
            *total += r;
        }
        if result.terminal {
            agent.end(&result.reward);
            return EpisodeOutcome {
                returns,
                steps,
                completed: true,
            };
        }
        if steps < max_steps {
            action = agent.step(&result.reward, result.observation);
        }
    }

    EpisodeOutcome {
        returns,
        steps,
        completed: false,
    }
}

/// Runs `n_episodes` episodes back to back.
pub fn run_episodes(
    env: &mut dyn Environment,
    agent: &mut dyn EpisodicAgent,
    n_episodes: usize,
    max_steps: u32,
) -> Vec<EpisodeOutcome> {
    (0..n_episodes)
        .map(|_| run_episode(env, agent, max_steps))
        .collect()
}

/// Aggregated evaluation metrics over multiple episodes.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    /// Mean return per objective.
    pub mean_returns: Vec<f64>,
    /// Mean episode length in steps.
    pub mean_steps: f64,
    /// Percentage of episodes that reached a terminal state.
    pub pct_completed: f64,
    /// Number of episodes evaluated.
    pub n_episodes: usize,
}

impl EvaluationMetrics {
    /// Aggregates finished episodes.
    pub fn from_outcomes(outcomes: &[EpisodeOutcome]) -> Self {
        let n = outcomes.len().max(1) as f64;
        let objectives = outcomes.first().map_or(0, |o| o.returns.len());
        let mean_returns = (0..objectives)
            .map(|i| outcomes.iter().map(|o| o.returns[i]).sum::<f64>() / n)
            .collect();
        let mean_steps = outcomes.iter().map(|o| f64::from(o.steps)).sum::<f64>() / n;
        let pct_completed = outcomes.iter().filter(|o| o.completed).count() as f64 / n * 100.0;

        Self {
            mean_returns,
            mean_steps,
            pct_completed,
            n_episodes: outcomes.len(),
        }
    }

    /// Evaluates an agent over multiple episodes and returns aggregated metrics.
    ///
    /// # Arguments
    ///
    /// * `env` - The environment to evaluate in
    /// * `agent` - The agent to evaluate; freeze it first for a pure evaluation
    /// * `n_episodes` - Number of episodes to run
    /// * `max_steps` - Step limit per episode
    pub fn evaluate(
        env: &mut dyn Environment,
        agent: &mut dyn EpisodicAgent,
        n_episodes: usize,
        max_steps: u32,
    ) -> Self {
        Self::from_outcomes(&run_episodes(env, agent, n_episodes, max_steps))
    }
}

impl fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "=== Evaluation Metrics ({} episodes) ===",
            self.n_episodes
        )?;
        for (i, r) in self.mean_returns.iter().enumerate() {
            writeln!(f, "  Mean return [{i}]:      {r:.2}")?;
        }
        writeln!(f, "  Mean episode length:  {:.1}", self.mean_steps)?;
        write!(f, "  Episodes completed:   {:.1}%", self.pct_completed)
    }
}
