//! Training samples: a position's feature tensor, the move-visit
//! distribution search produced for it, and (once the game ends) the
//! outcome from that position's side to play, filled in after the fact
//! once the game concludes.

use crate::mv::NUM_MOVES;
use crate::piece::Player;
use crate::position::GAME_STATE_SIZE;
use crate::symmetry::Symmetry;

#[derive(Debug, Clone)]
pub struct Sample {
    pub features: [f32; GAME_STATE_SIZE],
    pub probabilities: [f32; NUM_MOVES],
    /// The player to move when this sample was recorded, so the terminal
    /// result can be oriented correctly regardless of which plies a game
    /// actually recorded samples on.
    to_play: Player,
    /// Filled in once the game this sample came from has a known result,
    /// from the perspective of the player to move when the sample was
    /// recorded: +1 win, -1 loss, 0 draw.
    pub result: Option<f32>,
}

impl Sample {
    pub fn new(features: [f32; GAME_STATE_SIZE], probabilities: [f32; NUM_MOVES], to_play: Player) -> Self {
        Self { features, probabilities, to_play, result: None }
    }

    /// Attach the terminal outcome once play concludes. `outcome` is
    /// already oriented to this sample's side to play.
    pub fn attach_result(&mut self, outcome: f32) {
        self.result = Some(outcome);
    }

    /// Expand this sample across the full 8-element symmetry group,
    /// multiplying the effective size of a self-play game's training
    /// data without re-running search from each orientation.
    pub fn expand_symmetries(&self) -> Vec<Sample> {
        Symmetry::all()
            .map(|sym| Sample {
                features: sym.apply_features(&self.features),
                probabilities: sym.apply_policy(&self.probabilities),
                to_play: self.to_play,
                result: self.result,
            })
            .collect()
    }
}

/// Back-attach a terminal result to every sample recorded along one
/// game, orienting the sign by each sample's own recorded side to play
/// rather than assuming samples alternate sides: a searcher facing a
/// random opponent only ever records samples on its own plies, which all
/// share one parity.
pub fn attach_outcomes(samples: &mut [Sample], result_for_player0: f32) {
    for sample in samples.iter_mut() {
        let oriented = if sample.to_play == Player::First { result_for_player0 } else { -result_for_player0 };
        sample.attach_result(oriented);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_symmetries_yields_eight_variants_with_shared_result() {
        let mut sample = Sample::new([0.0; GAME_STATE_SIZE], [1.0 / NUM_MOVES as f32; NUM_MOVES], Player::First);
        sample.attach_result(1.0);
        let expanded = sample.expand_symmetries();
        assert_eq!(expanded.len(), 8);
        assert!(expanded.iter().all(|s| s.result == Some(1.0)));
    }

    #[test]
    fn attach_outcomes_orients_by_each_samples_own_side_to_play() {
        let mut samples = vec![
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::First),
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::Second),
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::First),
        ];
        attach_outcomes(&mut samples, 1.0);
        assert_eq!(samples[0].result, Some(1.0));
        assert_eq!(samples[1].result, Some(-1.0));
        assert_eq!(samples[2].result, Some(1.0));
    }

    #[test]
    fn attach_outcomes_does_not_assume_alternation() {
        // All samples recorded on player 0's plies only (as when a searcher
        // seat faces a random opponent): every sample should get the same
        // sign, not an alternating one.
        let mut samples = vec![
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::First),
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::First),
            Sample::new([0.0; GAME_STATE_SIZE], [0.0; NUM_MOVES], Player::First),
        ];
        attach_outcomes(&mut samples, -1.0);
        assert!(samples.iter().all(|s| s.result == Some(-1.0)));
    }
}
