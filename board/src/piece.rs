use crate::{Board, Move, Mover, PieceId, Player, Position, SquareState};

/// A piece, either placed on a board or kept as an archetype in a game's roster
///
/// Archetypes and placed pieces are the same type: an archetype is owned by [`Player::Either`]
/// and its position is meaningless until a copy is placed on a [`Board`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Piece {
    pub id: PieceId,
    pub name: String,
    pub owner: Player,
    /// Only a [`Square`](crate::Square) sets this for a placed piece, so it always matches the
    /// square the piece is on.
    pub(crate) position: Position,
    pub has_moved: bool,
    /// Whether losing this piece loses the game (a king, in chess)
    pub is_important: bool,
    /// How the piece moves once it has moved at least once, and how it always captures
    pub mover: Mover,
    /// How the piece moves (but not captures) before it has ever moved
    pub first_move_mover: Mover,
    /// Squares on which this piece may promote
    pub promotion_zone: Vec<Position>,
    /// The archetypes this piece may promote into
    pub promotion_pieces: Vec<PieceId>,
}
impl Piece {
    /// Create an archetype that moves the same way on its first move as on every other move
    pub fn new(id: PieceId, name: impl Into<String>, mover: Mover) -> Self {
        Self {
            id,
            name: name.into(),
            owner: Player::Either,
            position: Position::new(0, 0),
            has_moved: false,
            is_important: false,
            first_move_mover: mover.clone(),
            mover,
            promotion_zone: Vec::new(),
            promotion_pieces: Vec::new(),
        }
    }

    pub fn owned_by(mut self, owner: Player) -> Self {
        self.owner = owner;
        self
    }

    /// Set the position of a piece which isn't on a board
    pub fn at(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_first_move(mut self, first_move_mover: Mover) -> Self {
        self.first_move_mover = first_move_mover;
        self
    }

    pub fn important(mut self) -> Self {
        self.is_important = true;
        self
    }

    pub fn promoting(mut self, zone: Vec<Position>, into: Vec<PieceId>) -> Self {
        self.promotion_zone = zone;
        self.promotion_pieces = into;
        self
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    /// Whether this piece, where it stands, may go to `to` on the given board
    ///
    /// This only considers the piece's own rules: whether the move leaves an important piece
    /// threatened is the game's concern.
    ///  - Landing on an opponent's piece uses [`Mover::can_capture`] of [`Self::mover`].
    ///  - Landing on an empty square uses [`Mover::can_move`] of [`Self::first_move_mover`] until
    ///    the piece has moved, and of [`Self::mover`] afterwards.
    ///  - Landing on a friendly piece, a nonexistent square, or off the board is never allowed.
    pub fn can_move(&self, to: Position, board: &Board) -> bool {
        let Some(mv) = Move::new(self.position, to) else {
            return false;
        };
        let Some(target) = board.square(to) else {
            return false;
        };
        match (target.state(), target.piece()) {
            (SquareState::Occupied, Some(other)) if other.owner == self.owner => false,
            (SquareState::Occupied, Some(_)) => self.mover.can_capture(mv, board),
            (SquareState::Nonexistent, _) => false,
            _ => {
                if self.has_moved {
                    self.mover.can_move(mv, board)
                } else {
                    self.first_move_mover.can_move(mv, board)
                }
            }
        }
    }

    /// Whether this piece is standing somewhere it can promote from
    pub fn can_promote(&self) -> bool {
        !self.promotion_pieces.is_empty() && self.promotion_zone.contains(&self.position)
    }
}
