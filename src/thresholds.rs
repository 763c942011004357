//! Threshold presets and fault-driven threshold adaptation.

use thiserror::Error;
use tracing::info;

use crate::config::ThresholdConfig;

/// Errors raised by [`ThresholdAdapter`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ThresholdError {
    #[error("Threshold vectors disagree in length: {field} has {found}, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Threshold preset {index} out of range ({available} presets)")]
    PresetOutOfRange { index: usize, available: usize },

    #[error("Objective {objective} is not thresholded ({len} thresholds)")]
    ObjectiveOutOfRange { objective: usize, len: usize },
}

/// Owns the active threshold vector.
///
/// The vector is replaced wholesale by [`set_preset`](Self::set_preset) or
/// [`set_from_sensitivities`](Self::set_from_sensitivities), and nudged one
/// objective at a time by [`adjust_on_fault`](Self::adjust_on_fault). Every
/// change is appended to [`history`](Self::history) tagged with the episode
/// it happened in.
#[derive(Debug, Clone)]
pub struct ThresholdAdapter {
    config: ThresholdConfig,
    active: Vec<f64>,
    preset: Option<usize>,
    episode: u32,
    history: Vec<(u32, Vec<f64>)>,
}

impl ThresholdAdapter {
    /// Creates an adapter at the configured initial preset.
    pub fn new(config: ThresholdConfig) -> Result<Self, ThresholdError> {
        let k = config.minimum.len();
        for (field, found) in [("maximum", config.maximum.len()), ("step", config.step.len())] {
            if found != k {
                return Err(ThresholdError::LengthMismatch {
                    field,
                    expected: k,
                    found,
                });
            }
        }
        if let Some(bad) = config.presets.iter().find(|p| p.len() != k) {
            return Err(ThresholdError::LengthMismatch {
                field: "presets",
                expected: k,
                found: bad.len(),
            });
        }
        let initial = config.initial_preset;
        let active = config
            .presets
            .get(initial)
            .cloned()
            .ok_or(ThresholdError::PresetOutOfRange {
                index: initial,
                available: config.presets.len(),
            })?;

        Ok(Self {
            history: vec![(0, active.clone())],
            config,
            active,
            preset: Some(initial),
            episode: 0,
        })
    }

    /// The active threshold vector.
    pub fn active(&self) -> &[f64] {
        &self.active
    }

    /// Index of the preset in force, or `None` once the vector has been
    /// adjusted away from it.
    pub fn preset_index(&self) -> Option<usize> {
        self.preset
    }

    pub fn num_presets(&self) -> usize {
        self.config.presets.len()
    }

    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Every threshold vector taken, with the episode it was set in.
    pub fn history(&self) -> &[(u32, Vec<f64>)] {
        &self.history
    }

    /// Episode number attached to subsequent history entries.
    pub fn set_episode(&mut self, episode: u32) {
        self.episode = episode;
    }

    /// Replaces the active vector with preset `index`.
    pub fn set_preset(&mut self, index: usize) -> Result<(), ThresholdError> {
        let preset = self
            .config
            .presets
            .get(index)
            .ok_or(ThresholdError::PresetOutOfRange {
                index,
                available: self.config.presets.len(),
            })?;
        self.active.clone_from(preset);
        self.preset = Some(index);
        self.record("preset");
        Ok(())
    }

    /// Restores the configured initial preset and clears the history.
    pub fn reset(&mut self) {
        let initial = self.config.initial_preset;
        if let Some(preset) = self.config.presets.get(initial) {
            self.active.clone_from(preset);
        }
        self.preset = Some(initial);
        self.episode = 0;
        self.history.clear();
        self.history.push((0, self.active.clone()));
    }

    /// Raises the faulted objective's threshold by one step and relaxes every
    /// other objective by half a step, within the configured bounds.
    pub fn adjust_on_fault(&mut self, objective: usize) -> Result<(), ThresholdError> {
        let len = self.active.len();
        if objective >= len {
            return Err(ThresholdError::ObjectiveOutOfRange { objective, len });
        }
        let ThresholdConfig {
            minimum,
            maximum,
            step,
            ..
        } = &self.config;
        for (i, t) in self.active.iter_mut().enumerate() {
            *t = if i == objective {
                (*t + step[i]).min(maximum[i])
            } else {
                (*t - 0.5 * step[i]).max(minimum[i])
            };
        }
        self.preset = None;
        self.record("fault adjustment");
        Ok(())
    }

    /// Sets sensitive objectives to their maximum and all others to their
    /// minimum. Missing flags count as insensitive.
    pub fn set_from_sensitivities(&mut self, sensitive: &[bool]) {
        let ThresholdConfig {
            minimum, maximum, ..
        } = &self.config;
        for (i, t) in self.active.iter_mut().enumerate() {
            *t = if sensitive.get(i).copied().unwrap_or(false) {
                maximum[i]
            } else {
                minimum[i]
            };
        }
        self.preset = None;
        self.record("sensitivity reset");
    }

    fn record(&mut self, cause: &str) {
        info!(
            episode = self.episode,
            thresholds = ?self.active,
            "thresholds changed by {cause}"
        );
        self.history.push((self.episode, self.active.clone()));
    }
}

/// Objective most in need of repair given per-objective accumulated rewards.
///
/// Returns the index of the most negative entry, the lowest index on ties, or
/// `None` when nothing is negative.
pub fn determine_fault(accumulated: &[f64]) -> Option<usize> {
    let mut fault = None;
    let mut worst = 0.0;
    for (i, &r) in accumulated.iter().enumerate() {
        if r < worst {
            worst = r;
            fault = Some(i);
        }
    }
    fault
}
