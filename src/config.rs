//! Configuration for satisficing agents.
//!
//! Defaults reproduce the living-room side-effects experiments: four reward
//! channels of which the first three drive action selection, a three-bucket
//! augmentation of the primary reward, and eight threshold presets.

use std::path::PathBuf;

use thiserror::Error;

use crate::augment::{BucketChannel, StateAugmenter};
use crate::environment::Environment;
use crate::trace::TraceStack;
use crate::types::ExplorationStrategy;

/// Errors detected by [`AgentConfig::validate`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Dimension `{0}` must be non-zero")]
    EmptyDimension(&'static str),

    #[error("Expected {expected} initial values (one per objective), found {found}")]
    InitValuesLength { expected: usize, found: usize },

    #[error("Selection objectives ({selection}) must be between 1 and the number of objectives ({objectives})")]
    SelectionObjectives { selection: usize, objectives: usize },

    #[error("{thresholds} thresholds exceed the {selection} selection objectives")]
    ThresholdLength { thresholds: usize, selection: usize },

    #[error("Augmentation channel reads objective {objective}, but only {selection} objectives are accumulated")]
    AugmentObjective { objective: usize, selection: usize },

    #[error("Augmentation boundaries for objective {0} must be strictly descending")]
    AugmentBoundaries(usize),
}

/// Learning-rate, trace-decay and discount parameters.
///
/// None of these are range-checked; values outside `[0, 1]` diverge quietly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LearningParameters {
    /// Step size α.
    pub alpha: f64,
    /// Eligibility-trace decay λ.
    pub lambda: f64,
    /// Discount factor γ.
    pub gamma: f64,
    /// Strategy used while learning.
    pub exploration: ExplorationStrategy,
}

impl Default for LearningParameters {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            lambda: 0.95,
            gamma: 1.0,
            exploration: ExplorationStrategy::SoftmaxTournament,
        }
    }
}

/// Threshold presets and adjustment bounds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdConfig {
    /// Selectable threshold vectors.
    pub presets: Vec<Vec<f64>>,
    /// Lower bound per thresholded objective.
    pub minimum: Vec<f64>,
    /// Upper bound per thresholded objective.
    pub maximum: Vec<f64>,
    /// Adjustment step per thresholded objective.
    pub step: Vec<f64>,
    /// Preset active at construction and after each trial reset.
    pub initial_preset: usize,
}

impl ThresholdConfig {
    /// Builds the `2^k` presets formed by choosing, per objective, its maximum
    /// or minimum. Preset 0 is all maxima, the last is all minima, and the
    /// first objective varies slowest.
    pub fn from_bounds(minimum: Vec<f64>, maximum: Vec<f64>, step: Vec<f64>) -> Self {
        let k = minimum.len().min(maximum.len());
        let presets = (0..1usize << k)
            .map(|mask| {
                (0..k)
                    .map(|i| {
                        if mask & (1 << (k - 1 - i)) == 0 {
                            maximum[i]
                        } else {
                            minimum[i]
                        }
                    })
                    .collect()
            })
            .collect();
        Self {
            presets,
            minimum,
            maximum,
            step,
            initial_preset: 0,
        }
    }

    /// Number of thresholded objectives.
    pub fn len(&self) -> usize {
        self.minimum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.minimum.is_empty()
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::from_bounds(
            vec![-1000.0, -50.0, -50.0],
            vec![35.0, 0.0, 0.0],
            vec![103.5, 5.0, 5.0],
        )
    }
}

/// Accumulated-reward channels folded into the table state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AugmentConfig {
    pub channels: Vec<BucketChannel>,
}

impl AugmentConfig {
    /// No augmentation: the table is indexed by observation alone.
    pub fn none() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Builds the augmenter for `num_base_states` observations.
    pub fn augmenter(&self, num_base_states: usize) -> StateAugmenter {
        StateAugmenter::new(num_base_states, self.channels.clone())
    }
}

impl Default for AugmentConfig {
    fn default() -> Self {
        Self {
            channels: vec![BucketChannel::default()],
        }
    }
}

/// Full configuration of a [`crate::agent::TraceAgent`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentConfig {
    // --- Identity ---
    /// Reply to `get_agent_name`.
    pub agent_name: String,

    // --- Problem dimensions ---
    /// Reward channels learned by the table.
    pub num_objectives: usize,
    /// Discrete actions.
    pub num_actions: usize,
    /// Environment observations before augmentation.
    pub num_base_states: usize,
    /// Leading objectives consulted by action selection and accumulated
    /// during an episode. Later objectives are learned but hidden.
    pub selection_objectives: usize,

    // --- Table ---
    /// Initial value per objective.
    pub init_values: Vec<f64>,
    /// Maximum eligibility-trace length.
    pub trace_capacity: usize,
    pub augment: AugmentConfig,

    // --- Thresholds ---
    pub thresholds: ThresholdConfig,

    // --- Learning ---
    pub learning: LearningParameters,
    /// ε at the start of each trial.
    pub starting_epsilon: f64,
    /// Episodes over which ε decays linearly to zero.
    pub epsilon_decay_episodes: u32,
    /// Softmax temperature at the start of each trial.
    pub starting_temperature: f64,
    /// Episodes over which the temperature decays geometrically to 0.01.
    pub temperature_decay_episodes: u32,

    // --- Runtime ---
    /// Seed for the agent's random source; `None` seeds from entropy.
    pub seed: Option<u64>,
    /// Directory for `save_vf` / `load_vf` files.
    pub value_function_dir: PathBuf,
}

impl AgentConfig {
    /// Sized for `env`, with every other field at its default.
    ///
    /// Selection covers as many leading objectives as the default threshold
    /// vector has entries; any further objectives are hidden. Environments
    /// with fewer objectives need their own `thresholds`.
    pub fn for_environment<E: Environment + ?Sized>(env: &E) -> Self {
        let defaults = Self::default();
        let num_objectives = env.num_objectives();
        let selection_objectives = num_objectives.min(defaults.thresholds.len()).max(1);
        Self {
            num_objectives,
            num_actions: env.num_actions(),
            num_base_states: env.num_observations(),
            selection_objectives,
            init_values: vec![0.0; num_objectives],
            ..defaults
        }
    }

    /// Number of table states after augmentation.
    pub fn num_states(&self) -> usize {
        self.augment.augmenter(self.num_base_states).num_states()
    }

    /// Checks dimensional consistency. Threshold vector internals are checked
    /// by [`crate::thresholds::ThresholdAdapter::new`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_objectives == 0 {
            return Err(ConfigError::EmptyDimension("num_objectives"));
        }
        if self.num_actions == 0 {
            return Err(ConfigError::EmptyDimension("num_actions"));
        }
        if self.num_base_states == 0 {
            return Err(ConfigError::EmptyDimension("num_base_states"));
        }
        if self.trace_capacity == 0 {
            return Err(ConfigError::EmptyDimension("trace_capacity"));
        }
        if self.init_values.len() != self.num_objectives {
            return Err(ConfigError::InitValuesLength {
                expected: self.num_objectives,
                found: self.init_values.len(),
            });
        }
        if self.selection_objectives == 0 || self.selection_objectives > self.num_objectives {
            return Err(ConfigError::SelectionObjectives {
                selection: self.selection_objectives,
                objectives: self.num_objectives,
            });
        }
        if self.thresholds.len() > self.selection_objectives {
            return Err(ConfigError::ThresholdLength {
                thresholds: self.thresholds.len(),
                selection: self.selection_objectives,
            });
        }
        for channel in &self.augment.channels {
            if channel.objective >= self.selection_objectives {
                return Err(ConfigError::AugmentObjective {
                    objective: channel.objective,
                    selection: self.selection_objectives,
                });
            }
            if channel.boundaries.windows(2).any(|w| !(w[0] > w[1])) {
                return Err(ConfigError::AugmentBoundaries(channel.objective));
            }
        }
        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            agent_name: "SatisficingMO".to_string(),
            num_objectives: 4,
            num_actions: 4,
            num_base_states: 512,
            selection_objectives: 3,
            init_values: vec![0.0; 4],
            trace_capacity: TraceStack::DEFAULT_CAPACITY,
            augment: AugmentConfig::default(),
            thresholds: ThresholdConfig::default(),
            learning: LearningParameters::default(),
            starting_epsilon: 0.9,
            epsilon_decay_episodes: 5000,
            starting_temperature: 10.0,
            temperature_decay_episodes: 5000,
            seed: None,
            value_function_dir: PathBuf::from("."),
        }
    }
}
