//! Runs many games in parallel and aggregates their outputs: training
//! samples, per-game scores, average solved-mate-length, and a
//! human-readable scoreboard. Training mode self-plays one evaluator
//! against itself; testing mode pits two evaluators against each other,
//! flipping which one moves first by game parity so both are exercised
//! as first mover across the pool.
//!
//! Games run to completion independently rather than in the tick-by-tick
//! lockstep the single-process protocol would require, so staggering
//! here means bounding how many games are in flight at once (one wave
//! per `num_threads` games) instead of staggering individual search
//! iterations; this keeps peak live-node count down without requiring a
//! shared mid-game suspension point between games.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use tracing::info;

use crate::config::Config;
use crate::driver::{Driver, Outcome, Seat};
use crate::evaluator::Evaluator;
use crate::position::Position;
use crate::sample::Sample;
use crate::searcher::{Searcher, SearcherConfig};

#[derive(Debug, Clone, Copy)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub ply_count: u32,
}

pub struct TrainingReport {
    pub samples: Vec<Sample>,
    pub summaries: Vec<GameSummary>,
}

impl TrainingReport {
    pub fn average_mate_length(&self) -> f32 {
        if self.summaries.is_empty() {
            return 0.0;
        }
        let total: u32 = self.summaries.iter().map(|s| s.ply_count).sum();
        total as f32 / self.summaries.len() as f32
    }
}

pub struct TournamentReport {
    pub num_games: u32,
    /// Sum of evaluator A's score (1 win, 0.5 draw, 0 loss) across every game.
    pub score_a: f32,
}

impl TournamentReport {
    pub fn win_rate_a(&self) -> f32 {
        self.score_a / self.num_games as f32
    }

    pub fn scoreboard(&self) -> String {
        format!(
            "evaluator A: {:.1}/{} ({:.1}%)  evaluator B: {:.1}/{} ({:.1}%)",
            self.score_a,
            self.num_games,
            self.win_rate_a() * 100.0,
            self.num_games as f32 - self.score_a,
            self.num_games,
            (1.0 - self.win_rate_a()) * 100.0,
        )
    }
}

pub struct Coordinator {
    config: Config,
}

impl Coordinator {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    fn searcher_config(&self) -> SearcherConfig {
        SearcherConfig {
            c_puct: self.config.c_puct,
            epsilon: self.config.epsilon,
            max_searches: self.config.max_searches,
            searches_per_eval: self.config.searches_per_eval,
        }
    }

    /// Run `num_games` self-play games against `evaluator`, waved in
    /// chunks of `num_threads` to bound peak concurrently-live trees.
    pub fn run_training(&self, evaluator: &dyn Evaluator) -> TrainingReport {
        let mut samples = Vec::new();
        let mut summaries = Vec::new();

        for wave in chunk_indices(self.config.num_games, self.config.num_threads) {
            let wave_results: Vec<(Vec<Sample>, GameSummary)> = wave
                .into_par_iter()
                .map(|game_idx| self.play_training_game(game_idx, evaluator))
                .collect();
            for (game_samples, summary) in wave_results {
                samples.extend(game_samples);
                summaries.push(summary);
            }
        }

        info!(games = summaries.len(), samples = samples.len(), "training run complete");
        TrainingReport { samples, summaries }
    }

    fn play_training_game(&self, game_idx: u32, evaluator: &dyn Evaluator) -> (Vec<Sample>, GameSummary) {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(game_idx as u64));
        let config = self.searcher_config();
        let mut driver = Driver::with_searchers(config, evaluator, evaluator, false);
        let outcome = driver.run(&mut rng);
        let summary = GameSummary { outcome, ply_count: driver.ply() };
        let samples = driver.into_samples().into_iter().flat_map(|s| s.expand_symmetries()).collect();
        (samples, summary)
    }

    /// Run a tournament between `evaluator_a` and `evaluator_b`,
    /// alternating which plays first by game parity.
    pub fn run_tournament(&self, evaluator_a: &dyn Evaluator, evaluator_b: &dyn Evaluator) -> TournamentReport {
        let mut score_a = 0.0;

        for wave in chunk_indices(self.config.num_games, self.config.num_threads) {
            let wave_scores: Vec<f32> = wave
                .into_par_iter()
                .map(|game_idx| self.play_tournament_game(game_idx, evaluator_a, evaluator_b))
                .collect();
            score_a += wave_scores.iter().sum::<f32>();
        }

        info!(games = self.config.num_games, score_a, "tournament complete");
        TournamentReport { num_games: self.config.num_games, score_a }
    }

    fn play_tournament_game(&self, game_idx: u32, evaluator_a: &dyn Evaluator, evaluator_b: &dyn Evaluator) -> f32 {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(game_idx as u64));
        let config = self.searcher_config();
        let a_first = game_idx % 2 == 0;
        let (first, second) = if a_first { (evaluator_a, evaluator_b) } else { (evaluator_b, evaluator_a) };
        let seats = [
            Seat::Search(Searcher::new(Position::new(), config), first),
            Seat::Search(Searcher::new(Position::new(), config), second),
        ];
        let mut driver = Driver::new(seats, true);
        let outcome = driver.run(&mut rng);
        let score_for_first = outcome.score();
        if a_first { score_for_first } else { 1.0 - score_for_first }
    }
}

fn chunk_indices(total: u32, chunk_size: usize) -> Vec<Vec<u32>> {
    let chunk_size = chunk_size.max(1) as u32;
    (0..total)
        .collect::<Vec<u32>>()
        .chunks(chunk_size as usize)
        .map(|c| c.to_vec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;

    #[test]
    fn training_run_produces_samples_and_summaries() {
        let config = Config { num_games: 2, max_searches: 8, searches_per_eval: 4, num_threads: 2, ..Config::default() };
        let coordinator = Coordinator::new(config).unwrap();
        let report = coordinator.run_training(&UniformEvaluator);
        assert_eq!(report.summaries.len(), 2);
        assert!(!report.samples.is_empty());
    }

    #[test]
    fn tournament_score_is_within_bounds() {
        let config = Config { num_games: 3, max_searches: 8, searches_per_eval: 4, num_threads: 2, testing: true, ..Config::default() };
        let coordinator = Coordinator::new(config).unwrap();
        let report = coordinator.run_tournament(&UniformEvaluator, &UniformEvaluator);
        assert!(report.score_a >= 0.0 && report.score_a <= report.num_games as f32);
    }

    #[test]
    fn chunk_indices_covers_every_game_exactly_once() {
        let chunks = chunk_indices(7, 3);
        let flat: Vec<u32> = chunks.into_iter().flatten().collect();
        assert_eq!(flat, vec![0, 1, 2, 3, 4, 5, 6]);
    }
}
