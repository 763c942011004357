//! Text control messages understood by agents.
//!
//! A message is a command word followed by arguments, separated by `:` or
//! whitespace (`save_vf:0:3`, `set_learning_parameters 0.1 0.95 1.0 1`).
//! Commands are case-sensitive.

use std::str::FromStr;

use thiserror::Error;

/// A recognised command with malformed arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("`{command}` expects an argument at position {position}")]
    MissingArgument { command: String, position: usize },

    #[error("`{command}` could not parse argument `{value}`")]
    InvalidArgument { command: String, value: String },
}

/// Parsed control message.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlMessage {
    GetAgentName,
    SetLearningParameters {
        alpha: f64,
        lambda: f64,
        gamma: f64,
        strategy_code: i32,
    },
    SetEgreedyParameters {
        starting_epsilon: f64,
        episodes: u32,
    },
    SetSoftmaxParameters {
        starting_temperature: f64,
        episodes: u32,
    },
    FreezeLearning,
    UnfreezeLearning,
    StartNewTrial(Option<u32>),
    SaveValueFunction {
        trial: u32,
        index: usize,
    },
    LoadValueFunction {
        trial: u32,
        index: usize,
    },
    AverageValueFunction {
        trial: u32,
    },
    /// Negative presets keep the current thresholds.
    UpdateThreshold {
        preset: i64,
        suppressed: bool,
    },
    AdjustThreshold(usize),
    StartDebugging,
    StopDebugging,
    ChangeWeights,
    /// Anything not listed above.
    Unrecognized(String),
}

struct Args<'a> {
    command: &'a str,
    tokens: Vec<&'a str>,
    position: usize,
}

impl<'a> Args<'a> {
    fn next<T: FromStr>(&mut self) -> Result<T, MessageError> {
        self.position += 1;
        let raw = self
            .tokens
            .get(self.position)
            .ok_or_else(|| MessageError::MissingArgument {
                command: self.command.to_string(),
                position: self.position,
            })?;
        raw.parse().map_err(|_| MessageError::InvalidArgument {
            command: self.command.to_string(),
            value: raw.to_string(),
        })
    }

    fn optional<T: FromStr>(&mut self) -> Result<Option<T>, MessageError> {
        if self.position + 1 < self.tokens.len() {
            self.next().map(Some)
        } else {
            Ok(None)
        }
    }
}

impl FromStr for ControlMessage {
    type Err = MessageError;

    fn from_str(message: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = message
            .split(|c: char| c == ':' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .collect();
        let command = tokens.first().copied().unwrap_or("");
        let mut args = Args {
            command,
            tokens,
            position: 0,
        };

        let parsed = match command {
            "get_agent_name" => Self::GetAgentName,
            "set_learning_parameters" => Self::SetLearningParameters {
                alpha: args.next()?,
                lambda: args.next()?,
                gamma: args.next()?,
                strategy_code: args.next()?,
            },
            "set_egreedy_parameters" => Self::SetEgreedyParameters {
                starting_epsilon: args.next()?,
                episodes: args.next()?,
            },
            "set_softmax_parameters" => Self::SetSoftmaxParameters {
                starting_temperature: args.next()?,
                episodes: args.next()?,
            },
            "freeze_learning" => Self::FreezeLearning,
            "unfreeze_learning" => Self::UnfreezeLearning,
            "start_new_trial" => Self::StartNewTrial(args.optional()?),
            "save_vf" => Self::SaveValueFunction {
                trial: args.next()?,
                index: args.next()?,
            },
            "load_vf" => Self::LoadValueFunction {
                trial: args.next()?,
                index: args.next()?,
            },
            "average_vf" => Self::AverageValueFunction {
                trial: args.next()?,
            },
            "update_threshold" => Self::UpdateThreshold {
                preset: args.next()?,
                suppressed: false,
            },
            "update_threshold_suppressed" => Self::UpdateThreshold {
                preset: args.next()?,
                suppressed: true,
            },
            "adjust_threshold" => Self::AdjustThreshold(args.next()?),
            "start-debugging" => Self::StartDebugging,
            "stop-debugging" => Self::StopDebugging,
            c if c.starts_with("change_weights") => Self::ChangeWeights,
            _ => Self::Unrecognized(message.to_string()),
        };
        Ok(parsed)
    }
}

/// File name used by `save_vf` / `load_vf` for a trial and preset index.
pub fn value_function_file_name(trial: u32, index: usize) -> String {
    format!("ValueFunction_T{trial}_I{index}.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<ControlMessage, MessageError> {
        s.parse()
    }

    #[test]
    fn colon_and_space_delimiters() {
        assert_eq!(
            parse("save_vf:2:5").unwrap(),
            ControlMessage::SaveValueFunction { trial: 2, index: 5 }
        );
        assert_eq!(
            parse("set_learning_parameters 0.1 0.95 1.0 1").unwrap(),
            ControlMessage::SetLearningParameters {
                alpha: 0.1,
                lambda: 0.95,
                gamma: 1.0,
                strategy_code: 1
            }
        );
    }

    #[test]
    fn negative_preset_parses() {
        assert_eq!(
            parse("update_threshold:-1").unwrap(),
            ControlMessage::UpdateThreshold {
                preset: -1,
                suppressed: false
            }
        );
        assert_eq!(
            parse("update_threshold_suppressed:3").unwrap(),
            ControlMessage::UpdateThreshold {
                preset: 3,
                suppressed: true
            }
        );
    }

    #[test]
    fn optional_trial_id() {
        assert_eq!(parse("start_new_trial").unwrap(), ControlMessage::StartNewTrial(None));
        assert_eq!(
            parse("start_new_trial:4").unwrap(),
            ControlMessage::StartNewTrial(Some(4))
        );
    }

    #[test]
    fn commands_are_case_sensitive() {
        assert!(matches!(
            parse("Freeze_Learning").unwrap(),
            ControlMessage::Unrecognized(_)
        ));
        assert!(matches!(parse("").unwrap(), ControlMessage::Unrecognized(_)));
    }

    #[test]
    fn missing_argument_reported() {
        assert_eq!(
            parse("set_egreedy_parameters 0.5"),
            Err(MessageError::MissingArgument {
                command: "set_egreedy_parameters".to_string(),
                position: 2
            })
        );
    }

    #[test]
    fn invalid_argument_reported() {
        assert_eq!(
            parse("adjust_threshold:x"),
            Err(MessageError::InvalidArgument {
                command: "adjust_threshold".to_string(),
                value: "x".to_string()
            })
        );
    }

    #[test]
    fn change_weights_prefix() {
        assert_eq!(
            parse("change_weights 1 0 0").unwrap(),
            ControlMessage::ChangeWeights
        );
    }

    #[test]
    fn file_name_format() {
        assert_eq!(value_function_file_name(0, 7), "ValueFunction_T0_I7.txt");
    }
}
