extern crate gridworld;

use gridworld::{EnvConfig, Environment, GridVariant};
use std::path::PathBuf;

/// Writes the speaker's and the listener's view for every corridor placement.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let out_dir = PathBuf::from("observations");
    std::fs::create_dir_all(&out_dir)?;

    for variant in [GridVariant::A, GridVariant::B] {
        let mut env = Environment::new(EnvConfig {
            variant,
            seed: Some(2718),
            ..EnvConfig::default()
        })?;

        let mut done = Vec::new();
        while done.len() < variant.corridor_positions().len() {
            env.reset();
            let reward = env.reward_position();
            if done.contains(&reward) {
                continue;
            }
            done.push(reward);

            let stem = format!("{variant}_{}_{}", reward.row, reward.column);
            env.render(false)
                .save_png(out_dir.join(format!("{stem}_full.png")))?;
            env.render(true)
                .save_png(out_dir.join(format!("{stem}_partial.png")))?;
            println!("{}\n", env.render_ansi());
        }
    }

    println!("Observations written to {}", out_dir.display());
    Ok(())
}
