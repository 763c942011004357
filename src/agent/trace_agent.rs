//! Satisficing TLO Q(λ) agent with replacing eligibility traces.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use super::interface::EpisodicAgent;
use super::messages::{value_function_file_name, ControlMessage};
use super::AgentError;
use crate::augment::StateAugmenter;
use crate::config::{AgentConfig, LearningParameters};
use crate::selection::ActionSelector;
use crate::thresholds::ThresholdAdapter;
use crate::trace::{TraceEntry, TraceStack};
use crate::types::ExplorationStrategy;
use crate::value_table::ValueTable;

/// Final temperature reached after the configured number of decay episodes.
const FINAL_TEMPERATURE: f64 = 0.01;

/// Tabular multi-objective agent that learns with Q(λ) and acts under
/// thresholded lexicographic ordering.
///
/// The table is indexed by augmented state: the environment observation
/// combined with a discretisation of the reward accumulated so far this
/// episode. Accumulated rewards are also added to the table values before
/// comparison, so the agent judges whole-episode outcomes against its
/// thresholds.
///
/// # Lifecycle
///
/// 1. Create with [`TraceAgent::new`].
/// 2. Per episode: [`start`](Self::start), then [`step`](Self::step) until the
///    environment terminates, then [`end`](Self::end).
/// 3. Between episodes: freeze, switch thresholds, save or load the table,
///    or begin a new trial, directly or via [`handle_message`](Self::handle_message).
#[derive(Debug)]
pub struct TraceAgent {
    config: AgentConfig,
    table: ValueTable,
    augmenter: StateAugmenter,
    thresholds: ThresholdAdapter,
    trace: TraceStack,
    accumulators: Vec<f64>,
    learning: LearningParameters,

    // --- Exploration schedule ---
    starting_epsilon: f64,
    epsilon_decay: f64,
    epsilon: f64,
    starting_temperature: f64,
    temperature_decay_ratio: f64,
    temperature: f64,

    frozen: bool,
    debugging: bool,
    trial: u32,
    episode: u32,
    step: u32,
    rng: StdRng,
}

impl TraceAgent {
    /// Creates an agent from a validated configuration.
    pub fn new(config: AgentConfig) -> Result<Self, AgentError> {
        config.validate()?;
        let augmenter = config.augment.augmenter(config.num_base_states);
        let table = ValueTable::with_initial_values(
            config.num_actions,
            augmenter.num_states(),
            &config.init_values,
        );
        let thresholds = ThresholdAdapter::new(config.thresholds.clone())?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut agent = Self {
            table,
            augmenter,
            thresholds,
            trace: TraceStack::new(config.trace_capacity),
            accumulators: vec![0.0; config.selection_objectives],
            learning: config.learning,
            starting_epsilon: 0.0,
            epsilon_decay: 0.0,
            epsilon: 0.0,
            starting_temperature: 0.0,
            temperature_decay_ratio: 1.0,
            temperature: 0.0,
            frozen: false,
            debugging: false,
            trial: 0,
            episode: 0,
            step: 0,
            rng,
            config,
        };
        agent.set_egreedy_parameters(agent.config.starting_epsilon, agent.config.epsilon_decay_episodes);
        agent.set_softmax_parameters(
            agent.config.starting_temperature,
            agent.config.temperature_decay_episodes,
        );
        Ok(agent)
    }

    // --- Accessors ---

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn thresholds(&self) -> &ThresholdAdapter {
        &self.thresholds
    }

    /// Mutable access for callers that drive threshold adaptation directly.
    pub fn thresholds_mut(&mut self) -> &mut ThresholdAdapter {
        &mut self.thresholds
    }

    /// Reward accumulated this episode on each selection objective.
    pub fn accumulators(&self) -> &[f64] {
        &self.accumulators
    }

    pub fn trace_len(&self) -> usize {
        self.trace.len()
    }

    pub fn learning_parameters(&self) -> LearningParameters {
        self.learning
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Completed episodes in the current trial.
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Steps taken in the current episode.
    pub fn step_count(&self) -> u32 {
        self.step
    }

    pub fn trial(&self) -> u32 {
        self.trial
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    // --- Parameters ---

    pub fn set_learning_parameters(&mut self, learning: LearningParameters) {
        info!(
            alpha = learning.alpha,
            lambda = learning.lambda,
            gamma = learning.gamma,
            exploration = %learning.exploration,
            "learning parameters set"
        );
        self.learning = learning;
    }

    /// ε starts at `starting_epsilon` and falls linearly to zero over
    /// `episodes` episodes.
    pub fn set_egreedy_parameters(&mut self, starting_epsilon: f64, episodes: u32) {
        self.starting_epsilon = starting_epsilon;
        self.epsilon_decay = starting_epsilon / f64::from(episodes.max(1));
        self.epsilon = starting_epsilon;
    }

    /// The temperature starts at `starting_temperature` and decays
    /// geometrically to 0.01 over `episodes` episodes.
    pub fn set_softmax_parameters(&mut self, starting_temperature: f64, episodes: u32) {
        self.starting_temperature = starting_temperature;
        self.temperature_decay_ratio = if starting_temperature > 0.0 {
            (FINAL_TEMPERATURE / starting_temperature).powf(1.0 / f64::from(episodes.max(1)))
        } else {
            1.0
        };
        self.temperature = starting_temperature;
    }

    fn exploration_parameter(&self) -> f64 {
        if self.learning.exploration.uses_temperature() {
            self.temperature
        } else {
            self.epsilon
        }
    }

    /// Stops table updates; every decision becomes greedy.
    pub fn freeze(&mut self) {
        self.frozen = true;
        info!("learning paused");
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
        info!("learning resumed");
    }

    pub fn set_debugging(&mut self, enabled: bool) {
        self.debugging = enabled;
    }

    /// Resets everything learned in a trial: the table returns to its initial
    /// values, exploration to its starting values and thresholds to the
    /// configured preset.
    pub fn start_new_trial(&mut self, trial: u32) {
        self.trial = trial;
        self.table.reset_all(&self.config.init_values);
        self.thresholds.reset();
        self.trace.clear();
        self.accumulators.fill(0.0);
        self.frozen = false;
        self.epsilon = self.starting_epsilon;
        self.temperature = self.starting_temperature;
        self.episode = 0;
        self.step = 0;
        info!(trial, "new trial started");
    }

    // --- Episode control ---

    /// Table state for `observation` given the current accumulators.
    pub fn augmented_state(&self, observation: usize) -> usize {
        self.augmenter.state_index(observation, &self.accumulators)
    }

    fn selector(&self) -> ActionSelector<'_> {
        ActionSelector::new(&self.table, self.thresholds.active(), &self.accumulators)
    }

    /// Greedy action at `state` under the current thresholds and accumulators.
    pub fn greedy_action(&self, state: usize) -> usize {
        self.selector().greedy_action(state)
    }

    fn choose_action(&mut self, state: usize) -> usize {
        if self.frozen {
            return self.selector().greedy_action(state);
        }
        let strategy = self.learning.exploration;
        let parameter = self.exploration_parameter();
        let selector = ActionSelector::new(&self.table, self.thresholds.active(), &self.accumulators);
        selector.choose_possibly_exploratory_action(strategy, parameter, state, &mut self.rng)
    }

    fn accumulate(&mut self, reward: &[f64]) {
        for (acc, r) in self.accumulators.iter_mut().zip(reward) {
            *acc += r;
        }
    }

    /// Credits `td_errors` to every pair on the trace.
    fn backward_pass(&mut self, td_errors: &[f64]) {
        let LearningParameters { alpha, lambda, .. } = self.learning;
        self.trace.apply_backward(&mut self.table, td_errors, lambda, alpha);
    }

    /// Begins an episode and returns the first action.
    pub fn start(&mut self, observation: usize) -> usize {
        self.accumulators.fill(0.0);
        self.trace.clear();
        self.step = 0;

        let state = self.augmented_state(observation);
        let action = self.choose_action(state);
        self.trace.push(TraceEntry::new(state, action));

        if self.debugging {
            debug!(
                episode = self.episode,
                state,
                greedy = self.greedy_action(state),
                action,
                epsilon = self.epsilon,
                temperature = self.temperature,
                "episode start"
            );
        }
        action
    }

    /// Learns from one non-terminal transition and returns the next action.
    pub fn step(&mut self, reward: &[f64], observation: usize) -> usize {
        self.step += 1;
        self.accumulate(reward);

        let state = self.augmented_state(observation);
        if !self.frozen {
            if let Some(last) = self.trace.most_recent() {
                let next_greedy = self.greedy_action(state);
                let errors = self.table.td_errors(
                    last.action,
                    last.state,
                    next_greedy,
                    state,
                    self.learning.gamma,
                    reward,
                );
                self.backward_pass(&errors);
            }
        }

        let action = self.choose_action(state);
        if !self.selector().is_greedy(state, action) {
            // exploratory action: earlier pairs no longer lie on the greedy path
            self.trace.clear();
        }
        self.trace.push(TraceEntry::new(state, action));

        if self.debugging {
            debug!(
                episode = self.episode,
                step = self.step,
                state,
                greedy = self.greedy_action(state),
                action,
                reward = ?reward,
                "step"
            );
        }
        action
    }

    /// Learns from the terminal transition and decays exploration.
    pub fn end(&mut self, reward: &[f64]) {
        self.step += 1;
        self.accumulate(reward);

        if !self.frozen {
            if let Some(last) = self.trace.most_recent() {
                let errors = self.table.terminal_td_errors(last.action, last.state, reward);
                self.backward_pass(&errors);
            }
        }

        self.epsilon = (self.epsilon - self.epsilon_decay).max(0.0);
        self.temperature *= self.temperature_decay_ratio;
        self.episode += 1;
        self.thresholds.set_episode(self.episode);

        if self.debugging {
            debug!(
                episode = self.episode,
                steps = self.step,
                accumulated = ?self.accumulators,
                "episode end"
            );
        }
    }

    // --- Value-function files ---

    /// Path of the file for `trial` and preset `index` in the configured directory.
    pub fn value_function_path(&self, trial: u32, index: usize) -> PathBuf {
        self.config
            .value_function_dir
            .join(value_function_file_name(trial, index))
    }

    pub fn save_value_function(&self, path: impl AsRef<Path>) -> Result<(), AgentError> {
        self.table.save(path.as_ref())?;
        info!(path = %path.as_ref().display(), "value function saved");
        Ok(())
    }

    /// Replaces the table with the file's contents. On error the table is
    /// left untouched.
    pub fn load_value_function(&mut self, path: impl AsRef<Path>) -> Result<(), AgentError> {
        self.table.load_from_path(path.as_ref())?;
        info!(path = %path.as_ref().display(), "value function loaded");
        Ok(())
    }

    /// Replaces the table with the element-wise mean of several files.
    pub fn average_value_functions<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), AgentError> {
        let shape = self.table.shape();
        let tables = paths
            .iter()
            .map(|p| ValueTable::load(p.as_ref(), shape))
            .collect::<Result<Vec<_>, _>>()?;
        self.table = ValueTable::average(&tables)?;
        info!(files = paths.len(), "value functions averaged");
        Ok(())
    }

    // --- Control messages ---

    /// Executes a control message and returns its reply.
    ///
    /// Malformed arguments, unknown strategy codes and threshold errors are
    /// returned as `Err`. File failures are logged and reported in the reply,
    /// leaving the table unchanged.
    pub fn handle_message(&mut self, message: &str) -> Result<String, AgentError> {
        let reply = match message.parse::<ControlMessage>()? {
            ControlMessage::GetAgentName => self.config.agent_name.clone(),
            ControlMessage::SetLearningParameters {
                alpha,
                lambda,
                gamma,
                strategy_code,
            } => {
                let exploration = ExplorationStrategy::from_code(strategy_code)?;
                self.set_learning_parameters(LearningParameters {
                    alpha,
                    lambda,
                    gamma,
                    exploration,
                });
                "Learning parameters set".to_string()
            }
            ControlMessage::SetEgreedyParameters {
                starting_epsilon,
                episodes,
            } => {
                self.set_egreedy_parameters(starting_epsilon, episodes);
                "egreedy parameters changed".to_string()
            }
            ControlMessage::SetSoftmaxParameters {
                starting_temperature,
                episodes,
            } => {
                self.set_softmax_parameters(starting_temperature, episodes);
                "softmax parameters changed".to_string()
            }
            ControlMessage::FreezeLearning => {
                self.freeze();
                "message understood, policy frozen".to_string()
            }
            ControlMessage::UnfreezeLearning => {
                self.unfreeze();
                "message understood, policy unfrozen".to_string()
            }
            ControlMessage::StartNewTrial(trial) => {
                let trial = trial.unwrap_or(self.trial.saturating_add(1));
                self.start_new_trial(trial);
                "New trial started: Q-values and other variables reset".to_string()
            }
            ControlMessage::SaveValueFunction { trial, index } => {
                let path = self.value_function_path(trial, index);
                match self.save_value_function(&path) {
                    Ok(()) => "message understood, vf saved".to_string(),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "value function not saved");
                        format!("message understood, vf not saved: {e}")
                    }
                }
            }
            ControlMessage::LoadValueFunction { trial, index } => {
                let path = self.value_function_path(trial, index);
                let result = self.load_value_function(&path);
                self.freeze();
                match result {
                    Ok(()) => "message understood, vf loaded".to_string(),
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "value function not loaded");
                        format!("message understood, vf not loaded: {e}")
                    }
                }
            }
            ControlMessage::AverageValueFunction { trial } => {
                let paths: Vec<PathBuf> = (0..self.thresholds.num_presets())
                    .map(|index| self.value_function_path(trial, index))
                    .collect();
                let result = self.average_value_functions(&paths);
                self.freeze();
                match result {
                    Ok(()) => "message understood, vf aggregated".to_string(),
                    Err(e) => {
                        warn!(trial, error = %e, "value functions not aggregated");
                        format!("message understood, vf not aggregated: {e}")
                    }
                }
            }
            ControlMessage::UpdateThreshold { preset, suppressed } => match usize::try_from(preset) {
                Ok(index) => {
                    self.thresholds.set_preset(index)?;
                    if !suppressed {
                        info!(preset = index, thresholds = ?self.thresholds.active(), "threshold preset selected");
                    }
                    "message understood, threshold updated".to_string()
                }
                Err(_) => "message understood, threshold retained".to_string(),
            },
            ControlMessage::AdjustThreshold(objective) => {
                self.thresholds.adjust_on_fault(objective)?;
                "message understood, threshold adjusted".to_string()
            }
            ControlMessage::StartDebugging => {
                self.set_debugging(true);
                "Debugging enabled in agent".to_string()
            }
            ControlMessage::StopDebugging => {
                self.set_debugging(false);
                "Debugging disabled in agent".to_string()
            }
            ControlMessage::ChangeWeights => {
                format!("{}: Weights can not be changed", self.config.agent_name)
            }
            ControlMessage::Unrecognized(message) => {
                warn!(%message, "unknown control message");
                format!("{} does not understand your message.", self.config.agent_name)
            }
        };
        Ok(reply)
    }
}

impl EpisodicAgent for TraceAgent {
    fn start(&mut self, observation: usize) -> usize {
        TraceAgent::start(self, observation)
    }

    fn step(&mut self, reward: &[f64], observation: usize) -> usize {
        TraceAgent::step(self, reward, observation)
    }

    fn end(&mut self, reward: &[f64]) {
        TraceAgent::end(self, reward)
    }

    fn message(&mut self, message: &str) -> Result<String, AgentError> {
        self.handle_message(message)
    }

    fn name(&self) -> &str {
        &self.config.agent_name
    }
}
