//! Piece types and player identity.

use strum_macros::EnumIter;

/// The three piece types a stack may contain, bottom-up order is
/// `Base < Column < Capital`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum PieceType {
    Base = 0,
    Column = 1,
    Capital = 2,
}

impl PieceType {
    pub fn iter() -> impl Iterator<Item = Self> {
        <Self as strum::IntoEnumIterator>::iter()
    }

    pub fn as_index(self) -> usize {
        self as usize
    }
}

/// One of the two players in a Corintho match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    pub fn as_index(self) -> usize {
        self as usize
    }

    pub fn to_str(self) -> &'static str {
        match self {
            Player::First => "1",
            Player::Second => "2",
        }
    }
}
