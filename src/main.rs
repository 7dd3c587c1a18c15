//! Thin CLI wrapper for local experimentation against the stub
//! evaluator. Not a production entry point: a real evaluator is supplied
//! by the orchestrating process, not by this binary.

use clap::Parser;
use corintho_engine::config::{Cli, Command};
use corintho_engine::coordinator::Coordinator;
use corintho_engine::evaluator::UniformEvaluator;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let config = cli.command.to_config()?;
    let coordinator = Coordinator::new(config)?;
    let evaluator = UniformEvaluator;

    match cli.command {
        Command::Train { num_games, .. } => {
            let report = coordinator.run_training(&evaluator);
            println!(
                "ran {num_games} games, collected {} samples, average mate length {:.1} ply",
                report.samples.len(),
                report.average_mate_length(),
            );
        }
        Command::Tournament { .. } => {
            let report = coordinator.run_tournament(&evaluator, &evaluator);
            println!("{}", report.scoreboard());
        }
    }

    Ok(())
}
