//! The geometric rules a piece's movement is built from

use crate::{Board, Directions, Move, Offset, SquareState};

/// The shape of one movement rule
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PatternKind {
    /// Exactly one of the listed offsets, ignoring anything in the way
    Custom(Vec<Offset>),
    /// Any distance along the rank, if nothing is in the way
    Horizontal,
    /// Any distance along the file, if nothing is in the way
    Vertical,
    /// Any distance along a diagonal going up and to the right (or down and to the left), if
    /// nothing is in the way
    ForwardDiagonal,
    /// Any distance along a diagonal going up and to the left (or down and to the right), if
    /// nothing is in the way
    BackDiagonal,
    /// Moving no more than the given number of ranks and files
    WithinDistance { ranks: u32, files: u32 },
    /// Moving more than the given number of ranks or files
    OutsideDistance { ranks: u32, files: u32 },
    /// Heading in any of the given directions
    InDirections(Directions),
    /// One rank forward
    Pawn,
    /// Two ranks forward, over an empty square
    PawnFirstMove,
    /// One rank forward, diagonally
    PawnCapture,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PatternKind {
    /// The name used for this kind of pattern in persisted records
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Custom(_) => "custom",
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
            Self::ForwardDiagonal => "forward_diagonal",
            Self::BackDiagonal => "back_diagonal",
            Self::WithinDistance { .. } => "within_distance",
            Self::OutsideDistance { .. } => "outside_distance",
            Self::InDirections(_) => "in_directions",
            Self::Pawn => "pawn",
            Self::PawnFirstMove => "pawn_first_move",
            Self::PawnCapture => "pawn_capture",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }

    /// Whether the move has this shape on the given board
    ///
    /// Sliding shapes also require every square strictly between the start and the end to be
    /// empty. Pawn shapes go "forward" for the owner of whatever piece stands at the start of the
    /// move.
    pub fn matches(&self, mv: Move, board: &Board) -> bool {
        let ranks = mv.rank_distance();
        let files = mv.file_distance();
        match self {
            Self::Custom(offsets) => offsets.contains(&mv.offset()),
            Self::Horizontal => ranks == 0 && path_is_clear(mv, board),
            Self::Vertical => files == 0 && path_is_clear(mv, board),
            Self::ForwardDiagonal => ranks == files && path_is_clear(mv, board),
            Self::BackDiagonal => ranks == -files && path_is_clear(mv, board),
            Self::WithinDistance {
                ranks: max_ranks,
                files: max_files,
            } => mv.vertical_distance() <= *max_ranks && mv.horizontal_distance() <= *max_files,
            Self::OutsideDistance {
                ranks: max_ranks,
                files: max_files,
            } => mv.vertical_distance() > *max_ranks || mv.horizontal_distance() > *max_files,
            Self::InDirections(directions) => mv.directions().intersects(*directions),
            Self::Pawn => files == 0 && ranks == forward(mv, board),
            Self::PawnFirstMove => {
                files == 0 && ranks == 2 * forward(mv, board) && path_is_clear(mv, board)
            }
            Self::PawnCapture => files.unsigned_abs() == 1 && ranks == forward(mv, board),
            Self::Knight => {
                mv.vertical_distance().checked_mul(mv.horizontal_distance()) == Some(2)
            }
            Self::Bishop => {
                Self::ForwardDiagonal.matches(mv, board) || Self::BackDiagonal.matches(mv, board)
            }
            Self::Rook => Self::Horizontal.matches(mv, board) || Self::Vertical.matches(mv, board),
            Self::Queen => Self::Rook.matches(mv, board) || Self::Bishop.matches(mv, board),
            Self::King => mv.vertical_distance() <= 1 && mv.horizontal_distance() <= 1,
        }
    }
}

/// One movement rule, which either allows moves or (if restricting) rules them out
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern {
    pub kind: PatternKind,
    /// If set, [`Pattern::can_move`] is the negation of the shape matching
    pub is_restricting: bool,
}
impl Pattern {
    /// A pattern allowing the moves of the given shape
    pub const fn new(kind: PatternKind) -> Self {
        Self {
            kind,
            is_restricting: false,
        }
    }

    /// A pattern ruling out the moves of the given shape
    pub const fn restricting(kind: PatternKind) -> Self {
        Self {
            kind,
            is_restricting: true,
        }
    }

    pub fn can_move(&self, mv: Move, board: &Board) -> bool {
        self.kind.matches(mv, board) != self.is_restricting
    }
}
impl From<PatternKind> for Pattern {
    fn from(kind: PatternKind) -> Self {
        Self::new(kind)
    }
}

/// Every square strictly between the ends of the move is empty
///
/// Positions off the board and nonexistent squares count as blocking.
fn path_is_clear(mv: Move, board: &Board) -> bool {
    mv.intermediate().all(|position| {
        board.square(position).map(|square| square.state()) == Some(SquareState::Empty)
    })
}

/// The rank change that is "forward" for the piece making this move
fn forward(mv: Move, board: &Board) -> i32 {
    board
        .piece(mv.start())
        .map_or(1, |piece| piece.owner.forward())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Mover, Piece, PieceId, Player, Position};

    fn mv(start: (i32, i32), end: (i32, i32)) -> Move {
        Move::new(Position::new(start.0, start.1), Position::new(end.0, end.1)).unwrap()
    }

    fn blocker(owner: Player) -> Piece {
        Piece::new(PieceId(99), "Blocker", Mover::default()).owned_by(owner)
    }

    #[test]
    fn test_knight_accepts_exactly_eight_squares() {
        let board = Board::new(8, 8);
        let start = Position::new(3, 3);
        let accepted: Vec<_> = board
            .positions()
            .filter_map(|end| Move::new(start, end))
            .filter(|&mv| PatternKind::Knight.matches(mv, &board))
            .collect();
        assert_eq!(accepted.len(), 8);
        for mv in accepted {
            assert_eq!(mv.vertical_distance() * mv.horizontal_distance(), 2);
            assert!(Offset::KNIGHT_MOVES.contains(&mv.offset()));
        }
        // Same Manhattan distance, wrong shape
        assert!(!PatternKind::Knight.matches(mv((3, 3), (6, 3)), &board));
        assert!(PatternKind::Knight.matches(mv((3, 3), (1, 2)).reversed(), &board));
        assert!(!PatternKind::Knight.matches(mv((3, 3), (4, 4)), &board));
        assert!(!PatternKind::Knight.matches(mv((3, 3), (3, 6)), &board));
    }

    #[test]
    fn test_sliding_patterns_are_blocked() {
        let mut board = Board::new(8, 8);
        assert!(PatternKind::Vertical.matches(mv((0, 0), (7, 0)), &board));
        assert!(board.place_piece(blocker(Player::Black), Position::new(4, 0)));
        assert!(!PatternKind::Vertical.matches(mv((0, 0), (7, 0)), &board));
        // Landing on the blocker is still the right shape; capturing is the mover's business
        assert!(PatternKind::Vertical.matches(mv((0, 0), (4, 0)), &board));
        assert!(PatternKind::Rook.matches(mv((0, 0), (3, 0)), &board));
        assert!(!PatternKind::Rook.matches(mv((0, 0), (3, 1)), &board));
    }

    #[test]
    fn test_nonexistent_squares_block_sliders() {
        let board = Board::with_shape(&["....", ".#..", "....", "...."]).unwrap();
        // The hole is at rank 2, file 1
        assert!(!PatternKind::ForwardDiagonal.matches(mv((1, 0), (3, 2)), &board));
        assert!(!PatternKind::BackDiagonal.matches(mv((3, 0), (1, 2)), &board));
        assert!(!PatternKind::Bishop.matches(mv((1, 2), (3, 0)), &board));
        assert!(PatternKind::BackDiagonal.matches(mv((3, 1), (1, 3)), &board));
    }

    #[test]
    fn test_adjacent_diagonals() {
        let board = Board::new(3, 3);
        assert!(PatternKind::ForwardDiagonal.matches(mv((0, 0), (1, 1)), &board));
        assert!(!PatternKind::ForwardDiagonal.matches(mv((0, 1), (1, 0)), &board));
        assert!(PatternKind::BackDiagonal.matches(mv((0, 1), (1, 0)), &board));
    }

    #[test]
    fn test_distance_patterns() {
        let board = Board::new(8, 8);
        let within = PatternKind::WithinDistance { ranks: 1, files: 2 };
        let outside = PatternKind::OutsideDistance { ranks: 1, files: 2 };
        for (end, inside) in [((4, 5), true), ((3, 1), true), ((5, 3), false), ((3, 6), false)] {
            let mv = mv((3, 3), end);
            assert_eq!(within.matches(mv, &board), inside, "{mv:?}");
            assert_eq!(outside.matches(mv, &board), !inside, "{mv:?}");
        }
    }

    #[test]
    fn test_in_directions() {
        let board = Board::new(8, 8);
        let upwards = PatternKind::InDirections(Directions::Up);
        assert!(upwards.matches(mv((3, 3), (4, 3)), &board));
        assert!(upwards.matches(mv((3, 3), (5, 0)), &board));
        assert!(!upwards.matches(mv((3, 3), (3, 4)), &board));
        assert!(!upwards.matches(mv((3, 3), (1, 4)), &board));
    }

    #[test]
    fn test_pawn_direction_follows_owner() {
        let mut board = Board::new(8, 8);
        board.place_piece(blocker(Player::White), Position::new(1, 4));
        board.place_piece(blocker(Player::Black), Position::new(6, 4));
        assert!(PatternKind::Pawn.matches(mv((1, 4), (2, 4)), &board));
        assert!(!PatternKind::Pawn.matches(mv((1, 4), (0, 4)), &board));
        assert!(PatternKind::Pawn.matches(mv((6, 4), (5, 4)), &board));
        assert!(!PatternKind::Pawn.matches(mv((6, 4), (7, 4)), &board));
        assert!(PatternKind::PawnFirstMove.matches(mv((1, 4), (3, 4)), &board));
        assert!(PatternKind::PawnFirstMove.matches(mv((6, 4), (4, 4)), &board));
        assert!(!PatternKind::PawnFirstMove.matches(mv((1, 4), (4, 4)), &board));
        assert!(PatternKind::PawnCapture.matches(mv((6, 4), (5, 3)), &board));
        assert!(!PatternKind::PawnCapture.matches(mv((6, 4), (7, 3)), &board));
    }

    #[test]
    fn test_pawn_first_move_is_blocked() {
        let mut board = Board::new(8, 8);
        board.place_piece(blocker(Player::White), Position::new(1, 4));
        board.place_piece(blocker(Player::Black), Position::new(2, 4));
        assert!(!PatternKind::PawnFirstMove.matches(mv((1, 4), (3, 4)), &board));
    }

    #[test]
    fn test_custom_offsets_are_literal() {
        let board = Board::new(8, 8);
        let camel = PatternKind::Custom(vec![Offset::new(3, 1), Offset::new(-3, -1)]);
        assert!(camel.matches(mv((2, 2), (5, 3)), &board));
        assert!(camel.matches(mv((5, 3), (2, 2)), &board));
        assert!(!camel.matches(mv((2, 2), (5, 1)), &board));
    }

    #[test]
    fn test_far_apart_positions() {
        let board = Board::new(8, 8);
        let far = mv((0, 0), (70_000, 70_000));
        assert!(!PatternKind::Knight.matches(far, &board));
        assert!(!PatternKind::King.matches(far, &board));
        assert!(!PatternKind::PawnCapture.matches(far, &board));
        assert!(!PatternKind::Bishop.matches(far, &board));
        let extreme = mv((i32::MIN, i32::MIN), (i32::MAX, i32::MAX));
        assert!(!PatternKind::Knight.matches(extreme, &board));
        assert!(!PatternKind::Queen.matches(extreme, &board));
        assert!(PatternKind::OutsideDistance { ranks: 1, files: 1 }.matches(extreme, &board));
    }

    #[test]
    fn test_restricting_negates() {
        let board = Board::new(8, 8);
        let far = Pattern::restricting(PatternKind::OutsideDistance { ranks: 1, files: 1 });
        assert!(far.can_move(mv((3, 3), (4, 4)), &board));
        assert!(!far.can_move(mv((3, 3), (5, 3)), &board));
        assert!(Pattern::new(PatternKind::Vertical).can_move(mv((3, 3), (5, 3)), &board));
    }
}
