//! The pieces, squares and grid of a generalized board game
//!
//! Pieces don't know anything about chess: each one carries a [`Mover`] built from an ordered
//! list of [`Pattern`]s, and the [`Board`] asks the piece whether a [`Move`] fits those patterns.

use core::{fmt, str::FromStr};
use std::error;

use serde::{Deserialize, Serialize};

mod grid;
mod movement;
mod mover;
mod pattern;
mod piece;
pub mod records;
mod setup;
mod square;
pub mod variants;

pub use crate::grid::{Board, LayoutError, MAX_SQUARES};
pub use crate::movement::{Directions, Move, MoveFromStrErr};
pub use crate::mover::Mover;
pub use crate::pattern::{Pattern, PatternKind};
pub use crate::piece::Piece;
pub use crate::records::RecordError;
pub use crate::setup::{ArchetypeRef, SetupPosition};
pub use crate::square::{Square, SquareColor, SquareState};

/// The sides that can own a piece
///
/// Archetypes (the templates a game copies pieces from) are owned by [`Player::Either`]; placed
/// pieces always belong to one side.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    White,
    Black,
    Either,
}
impl Player {
    /// The players who take turns in a normal two-player game, in turn order
    pub const SIDES: [Player; 2] = [Self::White, Self::Black];

    pub const fn other(self) -> Self {
        match self {
            Player::White => Player::Black,
            Player::Black => Player::White,
            Player::Either => Player::Either,
        }
    }

    /// The change in rank of a step "forward" for this player
    ///
    /// ```
    /// use board::Player;
    /// assert_eq!(Player::White.forward(), 1);
    /// assert_eq!(Player::Black.forward(), -1);
    /// ```
    pub const fn forward(self) -> i32 {
        match self {
            Player::White | Player::Either => 1,
            Player::Black => -1,
        }
    }

    /// The integer code used when persisting this player
    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::White),
            1 => Some(Self::Black),
            2 => Some(Self::Either),
            _ => None,
        }
    }
}
impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
            Self::Either => "either",
        })
    }
}

/// Identifies a piece archetype in a game's roster
///
/// Placed pieces keep the id of the archetype they were copied from.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PieceId(pub u32);
impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A location on a board, counted from zero
///
/// Positions are plain coordinates: whether one is actually on a given board is a question for
/// [`Board::contains_square`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub rank: i32,
    pub file: i32,
}
impl Position {
    pub const fn new(rank: i32, file: i32) -> Self {
        Self { rank, file }
    }

    /// Offset the given number of ranks and files.
    ///
    /// ```rust
    /// use board::Position;
    /// assert_eq!(Position::new(1, 3), Position::new(0, 0).offset(1, 3));
    /// assert_eq!(Position::new(0, 0), Position::new(1, 3).offset(-1, -3));
    /// assert_eq!(Position::new(-1, 4), Position::new(0, 4).offset(-1, 0));
    /// ```
    pub const fn offset(self, ranks: i32, files: i32) -> Self {
        Self {
            rank: self.rank + ranks,
            file: self.file + files,
        }
    }

    /// Gets the offset which takes `self` to `other`
    pub const fn offset_to(self, other: Self) -> Offset {
        Offset {
            ranks: other.rank.saturating_sub(self.rank),
            files: other.file.saturating_sub(self.file),
        }
    }
}
impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({}, {})", self.rank, self.file)
    }
}
/// Formats as `rank,file`, the same format [`FromStr`] accepts
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.rank, self.file)
    }
}
#[derive(Debug, PartialEq, Eq)]
pub struct PositionFromStrErr;
impl fmt::Display for PositionFromStrErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("position string was not of the form `rank,file`")
    }
}
impl error::Error for PositionFromStrErr {}
impl FromStr for Position {
    type Err = PositionFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rank, file) = s.split_once(',').ok_or(PositionFromStrErr)?;
        Ok(Self {
            rank: rank.trim().parse().map_err(|_| PositionFromStrErr)?,
            file: file.trim().parse().map_err(|_| PositionFromStrErr)?,
        })
    }
}

/// The difference between two positions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offset {
    pub ranks: i32,
    pub files: i32,
}
impl Offset {
    /// The offsets corresponding to all possible knight moves
    pub const KNIGHT_MOVES: [Offset; 8] = [
        Self::new(2, 1),
        Self::new(2, -1),
        Self::new(-2, 1),
        Self::new(-2, -1),
        Self::new(1, 2),
        Self::new(1, -2),
        Self::new(-1, 2),
        Self::new(-1, -2),
    ];

    pub const fn new(ranks: i32, files: i32) -> Self {
        Self { ranks, files }
    }

    /// Gets the taxicab distance metric for this offset
    pub const fn taxicab_distance(self) -> u32 {
        self.ranks.unsigned_abs() + self.files.unsigned_abs()
    }

    /// Gets the Chebyshev distance for this offset
    ///
    /// This is the number of squares moved in one direction, for whichever direction is larger.
    pub const fn chebyshev_distance(self) -> u32 {
        let ranks = self.ranks.unsigned_abs();
        let files = self.files.unsigned_abs();
        if ranks > files {
            ranks
        } else {
            files
        }
    }
}
