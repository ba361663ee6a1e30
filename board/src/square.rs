use crate::{ArchetypeRef, Piece, Position};

/// What a square holds
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SquareState {
    /// A gap in the board, which no piece can ever stand on
    Nonexistent,
    Empty,
    Occupied,
}
impl SquareState {
    /// The integer code used when persisting this state
    pub const fn code(self) -> u8 {
        match self {
            Self::Nonexistent => 0,
            Self::Empty => 1,
            Self::Occupied => 2,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Nonexistent),
            1 => Some(Self::Empty),
            2 => Some(Self::Occupied),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SquareColor {
    Light,
    Dark,
}
impl SquareColor {
    /// The usual checkering, with the corner at `(0, 0)` dark
    pub const fn of(position: Position) -> Self {
        if (position.rank + position.file).rem_euclid(2) == 0 {
            Self::Dark
        } else {
            Self::Light
        }
    }

    /// The integer code used when persisting this color
    pub const fn code(self) -> u8 {
        match self {
            Self::Light => 0,
            Self::Dark => 1,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Light),
            1 => Some(Self::Dark),
            _ => None,
        }
    }
}

/// One cell of a [`Board`](crate::Board)
///
/// A square only holds a piece if it exists, and a held piece's position is always the square's
/// position: [`Square::set_piece`] is the only way to put a piece on a square.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Square {
    position: Position,
    exists: bool,
    piece: Option<Piece>,
    pub color: SquareColor,
    /// Which archetype the game's starting layout puts here, if any
    pub archetype: Option<ArchetypeRef>,
}
impl Square {
    /// An empty square at the given position
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            exists: true,
            piece: None,
            color: SquareColor::of(position),
            archetype: None,
        }
    }

    /// A gap in the board at the given position
    pub const fn nonexistent(position: Position) -> Self {
        Self {
            position,
            exists: false,
            piece: None,
            color: SquareColor::of(position),
            archetype: None,
        }
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn state(&self) -> SquareState {
        match (self.exists, &self.piece) {
            (false, _) => SquareState::Nonexistent,
            (true, None) => SquareState::Empty,
            (true, Some(_)) => SquareState::Occupied,
        }
    }

    pub const fn piece(&self) -> Option<&Piece> {
        self.piece.as_ref()
    }

    /// Put a piece on this square, moving the piece to this square's position
    ///
    /// Returns the piece that was here before. If the square doesn't exist, the piece is handed
    /// back instead and nothing changes.
    pub(crate) fn set_piece(&mut self, mut piece: Piece) -> Result<Option<Piece>, Piece> {
        if !self.exists {
            return Err(piece);
        }
        piece.position = self.position;
        Ok(self.piece.replace(piece))
    }

    pub(crate) fn take_piece(&mut self) -> Option<Piece> {
        self.piece.take()
    }

    /// Make this square exist or not, removing any piece from a square that no longer exists
    pub(crate) fn set_exists(&mut self, exists: bool) {
        self.exists = exists;
        if !exists {
            self.piece = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Mover, PieceId, Player};

    #[test]
    fn test_set_piece_stamps_position() {
        let mut square = Square::new(Position::new(2, 5));
        let piece = Piece::new(PieceId(1), "Stone", Mover::default())
            .owned_by(Player::Black)
            .at(Position::new(7, 7));
        assert_eq!(square.set_piece(piece), Ok(None));
        assert_eq!(square.state(), SquareState::Occupied);
        assert_eq!(square.piece().unwrap().position(), Position::new(2, 5));
        let taken = square.take_piece().unwrap();
        assert_eq!(taken.owner, Player::Black);
        assert_eq!(square.state(), SquareState::Empty);
    }

    #[test]
    fn test_nonexistent_square_refuses_pieces() {
        let mut square = Square::nonexistent(Position::new(0, 0));
        let piece = Piece::new(PieceId(1), "Stone", Mover::default());
        assert!(square.set_piece(piece).is_err());
        assert_eq!(square.state(), SquareState::Nonexistent);
    }

    #[test]
    fn test_colors_alternate() {
        assert_eq!(SquareColor::of(Position::new(0, 0)), SquareColor::Dark);
        assert_eq!(SquareColor::of(Position::new(0, 1)), SquareColor::Light);
        assert_eq!(SquareColor::of(Position::new(7, 7)), SquareColor::Dark);
        assert_eq!(SquareColor::of(Position::new(-1, 0)), SquareColor::Light);
    }

    #[test]
    fn test_state_codes_round_trip() {
        for state in [SquareState::Nonexistent, SquareState::Empty, SquareState::Occupied] {
            assert_eq!(SquareState::from_code(state.code()), Some(state));
        }
        assert_eq!(SquareState::from_code(3), None);
    }
}
