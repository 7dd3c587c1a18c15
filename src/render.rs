//! Human-readable rendering: the board as a text grid and the
//! coordinator's tournament results as a scoreboard line.

use std::fmt;

use crate::mv::BOARD_SIZE;
use crate::piece::PieceType;
use crate::position::Position;

fn piece_glyph(piece: PieceType) -> char {
    match piece {
        PieceType::Base => 'b',
        PieceType::Column => 'c',
        PieceType::Capital => 'C',
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "to play: {}", self.to_play().to_str())?;
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let cell = match self.top_at(row, col) {
                    Some(piece) => piece_glyph(piece),
                    None => '.',
                };
                let marker = if self.is_frozen_at(row, col) { '*' } else { ' ' };
                write!(f, "{cell}{marker}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_board_renders_as_all_dots() {
        let pos = Position::new();
        let rendered = format!("{pos}");
        assert_eq!(rendered.matches('.').count(), 16);
    }
}
