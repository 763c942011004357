use thiserror::Error;

use super::messages::MessageError;
use crate::config::ConfigError;
use crate::thresholds::ThresholdError;
use crate::types::UnknownStrategyCode;
use crate::value_table::TableError;

/// Errors surfaced by agents.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error(transparent)]
    UnknownExplorationStrategy(#[from] UnknownStrategyCode),

    #[error("Invalid agent configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Threshold error: {0}")]
    Threshold(#[from] ThresholdError),

    #[error("Value function error: {0}")]
    Table(#[from] TableError),

    #[error("Malformed control message: {0}")]
    Message(#[from] MessageError),

    #[error("Agent session closed")]
    SessionClosed,
}
