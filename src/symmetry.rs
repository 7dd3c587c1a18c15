//! The 8-element dihedral symmetry group of the 4x4 board, used to
//! replicate every training sample across all the board's orientations.
//! Each element is a (row, col) -> (row, col) coordinate transform, and
//! move ids are remapped by decoding, transforming the endpoints, and
//! re-encoding.

use crate::mv::{self, Move, Space, BOARD_SIZE};
use crate::position::GAME_STATE_SIZE;
use strum_macros::EnumIter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum Symmetry {
    Identity,
    Rotate90,
    Rotate180,
    Rotate270,
    FlipHorizontal,
    FlipVertical,
    FlipMainDiagonal,
    FlipAntiDiagonal,
}

impl Symmetry {
    pub fn all() -> impl Iterator<Item = Symmetry> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    const LAST: usize = BOARD_SIZE - 1;

    /// Map a board coordinate under this symmetry.
    pub fn apply_coord(self, row: usize, col: usize) -> (usize, usize) {
        match self {
            Symmetry::Identity => (row, col),
            Symmetry::Rotate90 => (col, Self::LAST - row),
            Symmetry::Rotate180 => (Self::LAST - row, Self::LAST - col),
            Symmetry::Rotate270 => (Self::LAST - col, row),
            Symmetry::FlipHorizontal => (row, Self::LAST - col),
            Symmetry::FlipVertical => (Self::LAST - row, col),
            Symmetry::FlipMainDiagonal => (col, row),
            Symmetry::FlipAntiDiagonal => (Self::LAST - col, Self::LAST - row),
        }
    }

    fn apply_space(self, space: Space) -> Space {
        let (row, col) = self.apply_coord(space.row, space.col);
        Space::new(row, col)
    }

    /// Remap a move id through this symmetry.
    pub fn apply_move(self, id: u8) -> u8 {
        let mv = mv::decode(id as i32).expect("move ids passed to apply_move must be valid");
        let transformed = match mv {
            Move::Place(piece, space) => Move::Place(piece, self.apply_space(space)),
            Move::Slide(from, to) => Move::Slide(self.apply_space(from), self.apply_space(to)),
        };
        mv::encode(transformed)
    }

    /// Remap a 70-element feature tensor: the 64 board bits move with the
    /// board, the 6 trailing piece counts are orientation-independent.
    pub fn apply_features(self, features: &[f32; GAME_STATE_SIZE]) -> [f32; GAME_STATE_SIZE] {
        let mut out = [0.0f32; GAME_STATE_SIZE];
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let (tr, tc) = self.apply_coord(row, col);
                for plane in 0..4 {
                    out[tr * 16 + tc * 4 + plane] = features[row * 16 + col * 4 + plane];
                }
            }
        }
        out[64..70].copy_from_slice(&features[64..70]);
        out
    }

    /// Remap a dense policy vector (one probability per move id).
    pub fn apply_policy(self, policy: &[f32; mv::NUM_MOVES]) -> [f32; mv::NUM_MOVES] {
        let mut out = [0.0f32; mv::NUM_MOVES];
        for id in 0..mv::NUM_MOVES as u8 {
            out[self.apply_move(id) as usize] = policy[id as usize];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_symmetry_is_a_bijection_on_move_ids() {
        for sym in Symmetry::all() {
            let mut seen = [false; mv::NUM_MOVES];
            for id in 0..mv::NUM_MOVES as u8 {
                let mapped = sym.apply_move(id) as usize;
                assert!(!seen[mapped], "{sym:?} collided at {mapped}");
                seen[mapped] = true;
            }
        }
    }

    #[test]
    fn identity_is_truly_identity() {
        for id in 0..mv::NUM_MOVES as u8 {
            assert_eq!(Symmetry::Identity.apply_move(id), id);
        }
    }

    #[test]
    fn four_quarter_rotations_return_to_identity() {
        for id in 0..mv::NUM_MOVES as u8 {
            let mut cur = id;
            for _ in 0..4 {
                cur = Symmetry::Rotate90.apply_move(cur);
            }
            assert_eq!(cur, id);
        }
    }

    #[test]
    fn flips_are_involutions() {
        for sym in [Symmetry::FlipHorizontal, Symmetry::FlipVertical, Symmetry::FlipMainDiagonal, Symmetry::FlipAntiDiagonal] {
            for id in 0..mv::NUM_MOVES as u8 {
                assert_eq!(sym.apply_move(sym.apply_move(id)), id);
            }
        }
    }
}
