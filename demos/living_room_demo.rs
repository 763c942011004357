//! Trains a satisficing agent on the living-room task, then evaluates the
//! frozen policy under each threshold preset.
//!
//! ```text
//! RUST_LOG=satisficer=info cargo run --example living_room_demo
//! ```

use satisficer::metrics::{run_episodes, EvaluationMetrics};
use satisficer::{AgentConfig, AgentError, LivingRoom, TraceAgent};
use tracing_subscriber::EnvFilter;

const ONLINE_EPISODES: usize = 2000;
const OFFLINE_EPISODES: usize = 10;
const MAX_EPISODE_LENGTH: u32 = 1000;

fn main() -> Result<(), AgentError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut env = LivingRoom::new();
    let config = AgentConfig {
        seed: Some(471),
        value_function_dir: std::env::temp_dir(),
        ..AgentConfig::for_environment(&env)
    };
    let mut agent = TraceAgent::new(config)?;
    agent.handle_message(&format!("set_softmax_parameters 10 {ONLINE_EPISODES}"))?;

    for preset in 0..agent.thresholds().num_presets() {
        agent.handle_message("start_new_trial:0")?;
        agent.handle_message(&format!("update_threshold:{preset}"))?;

        let online = run_episodes(&mut env, &mut agent, ONLINE_EPISODES, MAX_EPISODE_LENGTH);
        let tail = &online[online.len().saturating_sub(100)..];
        println!(
            "preset {preset} {:?}: last 100 online episodes\n{}",
            agent.thresholds().active(),
            EvaluationMetrics::from_outcomes(tail)
        );

        agent.handle_message("freeze_learning")?;
        let offline = EvaluationMetrics::evaluate(&mut env, &mut agent, OFFLINE_EPISODES, MAX_EPISODE_LENGTH);
        println!("preset {preset}: frozen policy\n{offline}\n");
        agent.handle_message(&format!("save_vf:0:{preset}"))?;
    }

    println!("{}", agent.handle_message("average_vf:0")?);
    Ok(())
}
