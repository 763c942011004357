//! satisficer - tabular multi-objective reinforcement learning with
//! thresholded lexicographic ordering.
//!
//! Agents learn one Q-table per objective with replacing-trace Q(λ) and choose
//! actions by satisficing: each ranked objective only needs to reach its
//! threshold before the next objective is allowed to decide. Thresholds can
//! be switched between presets or adapted when an objective is at fault.

pub mod agent;
pub mod augment;
pub mod config;
pub mod environment;
pub mod metrics;
pub mod selection;
pub mod session;
pub mod thresholds;
pub mod trace;
pub mod types;
pub mod value_table;

pub use agent::{AgentError, EpisodicAgent, RandomAgent, TraceAgent};
pub use config::{AgentConfig, LearningParameters, ThresholdConfig};
pub use environment::{Environment, LivingRoom};
pub use selection::ActionSelector;
pub use thresholds::{determine_fault, ThresholdAdapter};
pub use types::{ExplorationStrategy, StepResult, UnknownStrategyCode};
pub use value_table::ValueTable;
