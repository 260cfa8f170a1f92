use gridworld::{EnvConfig, Environment};
use lwm::{Agent, AgentConfig, LossMonitor, TrainConfig, Trainer};
use std::error::Error;
use tracing::info;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let env_config = EnvConfig::default();
    let agent_config = AgentConfig::default();
    let train_config = TrainConfig::default();
    info!(config = %serde_json::to_string(&env_config)?, "environment");
    info!(config = %serde_json::to_string(&agent_config)?, "agent");
    info!(config = %serde_json::to_string(&train_config)?, "training");

    let env = Environment::new(env_config)?;
    let agent = Agent::with_reference_modules(&agent_config)?;
    let learner = LossMonitor::from_config(&train_config);

    let report = Trainer::new(train_config, env, agent, learner)?.run()?;
    println!(
        "Episodes: {}, Best test success rate: {:.3}, Elapsed: {}s",
        report.episodes,
        report.best_test_success_rate,
        (report.finished_at - report.started_at).num_seconds()
    );
    println!("{}", serde_json::to_string_pretty(&report.intervals)?);

    Ok(())
}
