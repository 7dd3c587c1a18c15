//! One game from start to finish: two players (each either a searcher or
//! a uniformly-random stand-in) alternately moving, with training
//! samples collected along the way and an outcome surfaced at the end.

use rand::Rng;

use crate::evaluator::Evaluator;
use crate::position::{GAME_STATE_SIZE, Position};
use crate::sample::{Sample, attach_outcomes};
use crate::searcher::{Searcher, SearcherConfig};

/// A game's result from player 0's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

impl Outcome {
    fn from_result_value(value: f32) -> Self {
        if value > 0.0 {
            Outcome::Win
        } else if value < 0.0 {
            Outcome::Loss
        } else {
            Outcome::Draw
        }
    }

    pub fn score(self) -> f32 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Loss => 0.0,
            Outcome::Draw => 0.5,
        }
    }
}

/// One seat at the board: a searching player backed by an evaluator, or
/// a uniformly-random stand-in used to benchmark a searcher against.
/// Each seat's evaluator is a trait object so a testing-mode match can
/// pit two differently-backed searchers against each other.
pub enum Seat<'a> {
    Search(Searcher, &'a dyn Evaluator),
    Random,
}

pub struct Driver<'a> {
    seats: [Seat<'a>; 2],
    position: Position,
    testing: bool,
    samples: Vec<Sample>,
    ply: u32,
}

impl<'a> Driver<'a> {
    pub fn new(seats: [Seat<'a>; 2], testing: bool) -> Self {
        Self { seats, position: Position::new(), testing, samples: Vec::new(), ply: 0 }
    }

    pub fn with_searchers(config: SearcherConfig, evaluator_a: &'a dyn Evaluator, evaluator_b: &'a dyn Evaluator, testing: bool) -> Self {
        let seats = [
            Seat::Search(Searcher::new(Position::new(), config), evaluator_a),
            Seat::Search(Searcher::new(Position::new(), config), evaluator_b),
        ];
        Self::new(seats, testing)
    }

    /// Play the game to completion, returning the outcome from player
    /// 0's perspective. Samples accumulated along the way (when not in
    /// `testing` mode) are available afterward via [`Self::into_samples`].
    pub fn run<R: Rng>(&mut self, rng: &mut R) -> Outcome {
        loop {
            let to_play = self.position.to_play();
            let (mask, has_line) = self.position.legal_moves();
            if mask.is_empty() {
                let result_for_mover = if has_line { -1.0 } else { 0.0 };
                let result_for_player0 = if to_play.as_index() == 0 { result_for_mover } else { -result_for_mover };
                attach_outcomes(&mut self.samples, result_for_player0);
                return Outcome::from_result_value(result_for_player0);
            }

            let chosen = match &mut self.seats[to_play.as_index()] {
                Seat::Random => {
                    let legal: Vec<u8> = mask.iter_legal().collect();
                    legal[rng.random_range(0..legal.len())]
                }
                Seat::Search(searcher, evaluator) => {
                    searcher.search(*evaluator, rng);
                    let (mv, probs) = searcher.decide(self.ply, self.testing, rng);
                    if !self.testing {
                        let mut features = [0.0f32; GAME_STATE_SIZE];
                        self.position.write_features(&mut features);
                        self.samples.push(Sample::new(features, probs, to_play));
                    }
                    mv
                }
            };

            for seat in &mut self.seats {
                if let Seat::Search(searcher, _) = seat {
                    if searcher.root_position() == &self.position {
                        searcher.advance(chosen);
                    }
                }
            }
            self.position.do_move(chosen);
            self.ply += 1;
        }
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn random_vs_random_terminates_with_some_outcome() {
        let mut driver = Driver::new([Seat::Random, Seat::Random], true);
        let mut rng = StdRng::seed_from_u64(7);
        let outcome = driver.run(&mut rng);
        assert!(matches!(outcome, Outcome::Win | Outcome::Loss | Outcome::Draw));
    }

    #[test]
    fn searcher_vs_random_collects_samples_when_not_testing() {
        let eval = UniformEvaluator;
        let config = SearcherConfig { max_searches: 8, searches_per_eval: 4, ..Default::default() };
        let searcher = Searcher::new(Position::new(), config);
        let mut driver = Driver::new([Seat::Search(searcher, &eval), Seat::Random], false);
        let mut rng = StdRng::seed_from_u64(3);
        driver.run(&mut rng);
        assert!(!driver.samples.is_empty());
    }
}
