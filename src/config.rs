//! Typed configuration surface, with validation raised as `anyhow::Error`
//! at construction time since these are boundary-supplied values (CLI
//! flags, orchestration-layer parameters) rather than internal
//! invariants, and a `clap`-derived CLI wrapping it for local
//! experimentation.

use anyhow::{bail, Context, Result};

use crate::searcher::{DEFAULT_C_PUCT, DEFAULT_EPSILON, DEFAULT_MAX_SEARCHES, DEFAULT_SEARCHES_PER_EVAL};

/// Coordinator-level parameters, validated as a unit so a bad
/// combination (e.g. `searches_per_eval > max_searches`) is caught once
/// rather than re-checked at every call site.
#[derive(Debug, Clone)]
pub struct Config {
    pub num_games: u32,
    pub max_searches: u32,
    pub searches_per_eval: usize,
    pub c_puct: f32,
    pub epsilon: f32,
    pub num_logged: u32,
    pub num_threads: usize,
    pub testing: bool,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_games: 1,
            max_searches: DEFAULT_MAX_SEARCHES,
            searches_per_eval: DEFAULT_SEARCHES_PER_EVAL,
            c_puct: DEFAULT_C_PUCT,
            epsilon: DEFAULT_EPSILON,
            num_logged: 0,
            num_threads: 1,
            testing: false,
            seed: 0,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.num_games < 1 {
            bail!("num_games must be at least 1, got {}", self.num_games);
        }
        if self.max_searches < 2 {
            bail!("max_searches must be at least 2, got {}", self.max_searches);
        }
        if self.searches_per_eval < 1 || self.searches_per_eval as u32 > self.max_searches {
            bail!(
                "searches_per_eval must be in [1, max_searches] ({}), got {}",
                self.max_searches,
                self.searches_per_eval
            );
        }
        if !(self.c_puct > 0.0) {
            bail!("c_puct must be positive, got {}", self.c_puct);
        }
        if !(0.0..=1.0).contains(&self.epsilon) {
            bail!("epsilon must be in [0, 1], got {}", self.epsilon);
        }
        if self.num_logged > self.num_games {
            bail!("num_logged ({}) cannot exceed num_games ({})", self.num_logged, self.num_games);
        }
        if self.num_threads < 1 {
            bail!("num_threads must be at least 1, got {}", self.num_threads);
        }
        Ok(())
    }
}

/// Local experimentation CLI: run self-play training ticks against the
/// deterministic stub evaluator, or a small tournament between two
/// instances of it, and print the resulting scoreboard. Not a production
/// entry point — a real evaluator is supplied by the orchestrating
/// process, not by this binary.
#[derive(clap_derive::Parser, Debug)]
#[command(name = "corintho-engine", about = "Self-play search engine CLI (stub evaluator only)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap_derive::Subcommand, Debug)]
pub enum Command {
    /// Run self-play games and report sample/mate-length statistics.
    Train {
        #[arg(long, default_value_t = 4)]
        num_games: u32,
        #[arg(long, default_value_t = DEFAULT_MAX_SEARCHES)]
        max_searches: u32,
        #[arg(long, default_value_t = DEFAULT_SEARCHES_PER_EVAL)]
        searches_per_eval: usize,
        #[arg(long, default_value_t = 1)]
        num_threads: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
    /// Run a tournament between two stub-evaluator searchers and print a scoreboard.
    Tournament {
        #[arg(long, default_value_t = 10)]
        num_games: u32,
        #[arg(long, default_value_t = DEFAULT_MAX_SEARCHES)]
        max_searches: u32,
        #[arg(long, default_value_t = DEFAULT_SEARCHES_PER_EVAL)]
        searches_per_eval: usize,
        #[arg(long, default_value_t = 1)]
        num_threads: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

impl Command {
    pub fn to_config(&self) -> Result<Config> {
        let config = match self {
            Command::Train { num_games, max_searches, searches_per_eval, num_threads, seed } => Config {
                num_games: *num_games,
                max_searches: *max_searches,
                searches_per_eval: *searches_per_eval,
                num_threads: *num_threads,
                seed: *seed,
                testing: false,
                ..Config::default()
            },
            Command::Tournament { num_games, max_searches, searches_per_eval, num_threads, seed } => Config {
                num_games: *num_games,
                max_searches: *max_searches,
                searches_per_eval: *searches_per_eval,
                num_threads: *num_threads,
                seed: *seed,
                testing: true,
                ..Config::default()
            },
        };
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn searches_per_eval_above_max_searches_is_rejected() {
        let config = Config { searches_per_eval: 100, max_searches: 10, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_games_is_rejected() {
        let config = Config { num_games: 0, ..Config::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn epsilon_out_of_range_is_rejected() {
        let config = Config { epsilon: 1.5, ..Config::default() };
        assert!(config.validate().is_err());
    }
}
