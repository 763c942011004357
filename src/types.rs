//! Core types shared by the learning engine.
//!
//! Defines the exploration strategies understood by the action selector and
//! the transition record passed between an environment and an agent.

use std::fmt;

use thiserror::Error;

/// An integer strategy code outside `0..=2`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Unknown exploration strategy code: {0}")]
pub struct UnknownStrategyCode(pub i32);

/// Exploration strategy used when the policy is not frozen.
///
/// The integer codes match the `set_learning_parameters` control message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExplorationStrategy {
    /// Uniform random action with probability ε, greedy otherwise.
    #[default]
    EGreedy,
    /// Boltzmann draw over TLO dominance (tournament) scores.
    SoftmaxTournament,
    /// Boltzmann draw over inverse additive-epsilon scores.
    SoftmaxAdditiveEpsilon,
}

impl ExplorationStrategy {
    /// Returns all strategies in code order.
    pub fn all() -> [ExplorationStrategy; 3] {
        [
            ExplorationStrategy::EGreedy,
            ExplorationStrategy::SoftmaxTournament,
            ExplorationStrategy::SoftmaxAdditiveEpsilon,
        ]
    }

    /// Returns the wire code of this strategy (0, 1 or 2).
    pub fn code(&self) -> i32 {
        match self {
            ExplorationStrategy::EGreedy => 0,
            ExplorationStrategy::SoftmaxTournament => 1,
            ExplorationStrategy::SoftmaxAdditiveEpsilon => 2,
        }
    }

    /// Resolves a wire code.
    ///
    /// Unknown codes are a fatal configuration error: the caller must not be
    /// allowed to continue selecting actions with an undefined strategy.
    pub fn from_code(code: i32) -> Result<Self, UnknownStrategyCode> {
        Self::all()
            .into_iter()
            .find(|s| s.code() == code)
            .ok_or(UnknownStrategyCode(code))
    }

    /// True for the two softmax variants, whose parameter is a temperature.
    pub fn uses_temperature(&self) -> bool {
        !matches!(self, ExplorationStrategy::EGreedy)
    }
}

impl fmt::Display for ExplorationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExplorationStrategy::EGreedy => write!(f, "eGreedy"),
            ExplorationStrategy::SoftmaxTournament => write!(f, "softmax_tournament"),
            ExplorationStrategy::SoftmaxAdditiveEpsilon => write!(f, "softmax_additive_epsilon"),
        }
    }
}

/// Outcome of one environment transition as seen by an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Discrete observation after the transition.
    pub observation: usize,
    /// One reward per objective, most important first.
    pub reward: Vec<f64>,
    /// Whether the episode ended with this transition.
    pub terminal: bool,
}

impl StepResult {
    /// Creates a non-terminal result.
    pub fn new(observation: usize, reward: Vec<f64>) -> Self {
        Self {
            observation,
            reward,
            terminal: false,
        }
    }

    /// Creates a terminal result.
    pub fn terminal(observation: usize, reward: Vec<f64>) -> Self {
        Self {
            observation,
            reward,
            terminal: true,
        }
    }
}
