use core::{fmt, str::FromStr};

use crate::{Offset, Position, PositionFromStrErr};

bitflags::bitflags! {
    /// The net direction(s) a move travels in
    ///
    /// "Up" is towards higher ranks and "right" is towards higher files. A diagonal move has one
    /// vertical and one horizontal flag set.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Directions: u8 {
        const Up = 0b0000_0001;
        const Down = 0b0000_0010;
        const Left = 0b0000_0100;
        const Right = 0b0000_1000;
    }
}

/// Errors from parsing a [`Move`]
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum MoveFromStrErr {
    #[error("move string was not of the form `rank,file rank,file`")]
    Format,
    #[error(transparent)]
    Position(#[from] PositionFromStrErr),
    #[error("a move must end somewhere other than where it starts")]
    SameSquare,
}

/// A piece going from one position to a different one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    start: Position,
    end: Position,
}
impl Move {
    /// Make a move between the given positions
    ///
    /// Returns `None` if `start == end`, as a piece must go somewhere.
    ///
    /// ```
    /// use board::{Move, Position};
    /// assert!(Move::new(Position::new(1, 4), Position::new(3, 4)).is_some());
    /// assert!(Move::new(Position::new(1, 4), Position::new(1, 4)).is_none());
    /// ```
    pub fn new(start: Position, end: Position) -> Option<Self> {
        (start != end).then_some(Self { start, end })
    }

    pub const fn start(self) -> Position {
        self.start
    }

    pub const fn end(self) -> Position {
        self.end
    }

    /// The same move, going the other way
    pub const fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }

    /// The signed number of ranks moved (positive is up)
    pub const fn rank_distance(self) -> i32 {
        self.end.rank.saturating_sub(self.start.rank)
    }

    /// The signed number of files moved (positive is right)
    pub const fn file_distance(self) -> i32 {
        self.end.file.saturating_sub(self.start.file)
    }

    pub const fn vertical_distance(self) -> u32 {
        self.end.rank.abs_diff(self.start.rank)
    }

    pub const fn horizontal_distance(self) -> u32 {
        self.end.file.abs_diff(self.start.file)
    }

    pub const fn offset(self) -> Offset {
        self.start.offset_to(self.end)
    }

    /// The directions this move heads in, with at most one vertical and one horizontal
    pub fn directions(self) -> Directions {
        let mut directions = Directions::empty();
        match self.rank_distance().signum() {
            1 => directions |= Directions::Up,
            -1 => directions |= Directions::Down,
            _ => {}
        }
        match self.file_distance().signum() {
            1 => directions |= Directions::Right,
            -1 => directions |= Directions::Left,
            _ => {}
        }
        directions
    }

    /// Whether the move runs along a rank, a file, or a diagonal
    pub const fn is_straight(self) -> bool {
        let ranks = self.vertical_distance();
        let files = self.horizontal_distance();
        ranks == 0 || files == 0 || ranks == files
    }

    /// The positions strictly between the start and end of a straight move
    ///
    /// This does not contain the start or end squares. For a move that isn't straight, this is
    /// empty.
    pub fn intermediate(self) -> impl Iterator<Item = Position> {
        let rank_step = self.rank_distance().signum();
        let file_step = self.file_distance().signum();
        let steps = if self.is_straight() {
            self.vertical_distance().max(self.horizontal_distance())
        } else {
            0
        };
        let start = self.start;
        (1..steps).map(move |step| {
            let step = step as i32;
            start.offset(rank_step * step, file_step * step)
        })
    }
}
/// Formats as the two positions separated by a space, the same format [`FromStr`] accepts
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.end)
    }
}
impl FromStr for Move {
    type Err = MoveFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s.trim().split_once(' ').ok_or(MoveFromStrErr::Format)?;
        Self::new(start.parse()?, end.parse()?).ok_or(MoveFromStrErr::SameSquare)
    }
}
