use core::fmt;

use crate::{ArchetypeRef, Move, Piece, Player, Position, Square, SquareState};

/// Errors from reading a board or layout drawn as text
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("no rows given")]
    Empty,
    #[error("rows have different lengths")]
    RaggedRows,
    #[error("unknown symbol {symbol:?} at rank {rank}, file {file}")]
    UnknownSymbol { symbol: char, rank: i32, file: i32 },
    #[error("layout has {found:?} ranks and files, expected {expected:?}")]
    WrongSize {
        expected: (usize, usize),
        found: (usize, usize),
    },
    #[error("a {ranks}x{files} board has more than {} squares", MAX_SQUARES)]
    TooLarge { ranks: usize, files: usize },
}

/// The most squares a board may have, nonexistent ones included
pub const MAX_SQUARES: usize = 1 << 16;

/// How many squares a grid of this size holds, or `None` past [`MAX_SQUARES`]
pub(crate) fn square_count(ranks: usize, files: usize) -> Option<usize> {
    ranks.checked_mul(files).filter(|&count| count <= MAX_SQUARES)
}

/// A rectangular grid of squares
///
/// Irregular boards are rectangles with some [nonexistent](SquareState::Nonexistent) squares.
/// Boards are values: [`Board::after_move`] builds a new board rather than changing this one, so
/// a move can be tried out and thrown away.
///
/// Squares are stored rank by rank, so the square at `(rank, file)` is at index
/// `rank * files + file`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    ranks: usize,
    files: usize,
    squares: Vec<Square>,
}
impl Board {
    /// A board of empty squares
    ///
    /// Sizes from outside the program should go through [`Board::try_new`] instead, which
    /// refuses boards larger than [`MAX_SQUARES`].
    pub fn new(ranks: usize, files: usize) -> Self {
        let squares = (0..ranks)
            .flat_map(|rank| (0..files).map(move |file| (rank, file)))
            .map(|(rank, file)| Square::new(Position::new(rank as i32, file as i32)))
            .collect();
        Self {
            ranks,
            files,
            squares,
        }
    }

    /// A board of empty squares, as long as it has at most [`MAX_SQUARES`] squares
    pub fn try_new(ranks: usize, files: usize) -> Result<Self, LayoutError> {
        square_count(ranks, files).ok_or(LayoutError::TooLarge { ranks, files })?;
        Ok(Self::new(ranks, files))
    }

    /// A board drawn as one row of text per rank, highest rank first
    ///
    /// `#` marks a square which doesn't exist; any other character is an empty square.
    ///
    /// ```
    /// use board::{Board, Position};
    /// let board = Board::with_shape(&[".#.", "..."]).unwrap();
    /// assert_eq!((board.ranks(), board.files()), (2, 3));
    /// assert!(!board.contains_square(Position::new(1, 1)));
    /// assert!(board.contains_square(Position::new(0, 1)));
    /// ```
    pub fn with_shape(rows: &[impl AsRef<str>]) -> Result<Self, LayoutError> {
        let files = rows.first().ok_or(LayoutError::Empty)?.as_ref().chars().count();
        if files == 0 {
            return Err(LayoutError::Empty);
        }
        let mut board = Self::try_new(rows.len(), files)?;
        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.chars().count() != files {
                return Err(LayoutError::RaggedRows);
            }
            let rank = (rows.len() - 1 - row_idx) as i32;
            for (file, symbol) in row.chars().enumerate() {
                if symbol == '#' {
                    board.set_exists(Position::new(rank, file as i32), false);
                }
            }
        }
        Ok(board)
    }

    /// Build a board from already-made squares
    ///
    /// The squares must be in storage order, with their positions filled in.
    pub(crate) fn from_squares(ranks: usize, files: usize, squares: Vec<Square>) -> Self {
        debug_assert_eq!(squares.len(), ranks * files);
        Self {
            ranks,
            files,
            squares,
        }
    }

    pub const fn ranks(&self) -> usize {
        self.ranks
    }

    pub const fn files(&self) -> usize {
        self.files
    }

    fn index(&self, at: Position) -> Option<usize> {
        let rank = usize::try_from(at.rank).ok()?;
        let file = usize::try_from(at.file).ok()?;
        (rank < self.ranks && file < self.files).then(|| rank * self.files + file)
    }

    /// The square at the position, or `None` if it's outside the grid
    pub fn square(&self, at: Position) -> Option<&Square> {
        self.squares.get(self.index(at)?)
    }

    fn square_mut(&mut self, at: Position) -> Option<&mut Square> {
        let idx = self.index(at)?;
        self.squares.get_mut(idx)
    }

    /// Every square, including nonexistent ones, rank by rank
    pub fn squares(&self) -> impl Iterator<Item = &Square> {
        self.squares.iter()
    }

    /// Every position in the grid, including those of nonexistent squares
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        self.squares.iter().map(Square::position)
    }

    /// Whether the position is inside the grid and its square exists
    pub fn contains_square(&self, at: Position) -> bool {
        self.square(at)
            .is_some_and(|square| square.state() != SquareState::Nonexistent)
    }

    pub fn piece(&self, at: Position) -> Option<&Piece> {
        self.square(at)?.piece()
    }

    /// All pieces on the board owned by the given player
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = &Piece> {
        self.all_pieces().filter(move |piece| piece.owner == player)
    }

    pub fn all_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.iter().filter_map(Square::piece)
    }

    /// Put a piece on the square at the given position, replacing any piece there
    ///
    /// Returns false (and drops the piece) if there's no such square.
    pub fn place_piece(&mut self, piece: Piece, at: Position) -> bool {
        self.square_mut(at)
            .is_some_and(|square| square.set_piece(piece).is_ok())
    }

    pub fn remove_piece(&mut self, at: Position) -> Option<Piece> {
        self.square_mut(at)?.take_piece()
    }

    /// Take every piece off the board
    pub fn clear_pieces(&mut self) {
        for square in &mut self.squares {
            square.take_piece();
        }
    }

    /// Forget which archetypes the starting layout put where
    pub fn clear_archetypes(&mut self) {
        for square in &mut self.squares {
            square.archetype = None;
        }
    }

    /// Make a square exist or not
    ///
    /// A square that stops existing loses its piece. Returns false if the position is outside
    /// the grid.
    pub fn set_exists(&mut self, at: Position, exists: bool) -> bool {
        match self.square_mut(at) {
            Some(square) => {
                square.set_exists(exists);
                true
            }
            None => false,
        }
    }

    /// Record which archetype the starting layout puts on a square
    pub fn set_archetype(&mut self, at: Position, archetype: Option<ArchetypeRef>) -> bool {
        match self.square_mut(at) {
            Some(square) => {
                square.archetype = archetype;
                true
            }
            None => false,
        }
    }

    /// The board after the piece at the start of the move makes it
    ///
    /// Returns `None` if there's no piece at the start, if the end is off the board, or if the
    /// piece can't make this move. The moved piece is marked as having moved, and anything it
    /// lands on is removed.
    pub fn after_move(&self, mv: Move) -> Option<Board> {
        let piece = self.piece(mv.start())?;
        self.index(mv.end())?;
        if !piece.can_move(mv.end(), self) {
            return None;
        }
        let mut board = self.clone();
        let mut piece = board.remove_piece(mv.start())?;
        piece.has_moved = true;
        board.place_piece(piece, mv.end()).then_some(board)
    }

    /// Make the move on this board, if the piece at its start can make it
    ///
    /// Returns whether the move was made. Nothing changes if it wasn't.
    pub fn make_move(&mut self, mv: Move) -> bool {
        match self.after_move(mv) {
            Some(board) => {
                *self = board;
                true
            }
            None => false,
        }
    }

    /// The board after moving the piece at the start of the move to its end, ignoring how the
    /// piece moves
    ///
    /// This is for rearranging a layout before a game, so the piece isn't marked as moved and the
    /// starting-layout archetype reference moves with it. Returns `None` if there's no piece at
    /// the start or no square at the end.
    pub fn after_setup_move(&self, mv: Move) -> Option<Board> {
        if !self.contains_square(mv.end()) {
            return None;
        }
        let mut board = self.clone();
        let piece = board.remove_piece(mv.start())?;
        let archetype = board.square_mut(mv.start())?.archetype.take();
        board.place_piece(piece, mv.end());
        board.set_archetype(mv.end(), archetype);
        Some(board)
    }

    /// Draw the board as text, highest rank first
    ///
    /// Nonexistent squares are drawn as `#` and empty squares as `.`; pieces are drawn with
    /// whatever `symbol` returns for them.
    pub fn render(&self, symbol: impl Fn(&Piece) -> char) -> String {
        let mut out = String::with_capacity((self.files + 1) * self.ranks);
        for rank in (0..self.ranks).rev() {
            for file in 0..self.files {
                let idx = rank * self.files + file;
                let square = &self.squares[idx];
                out.push(match (square.state(), square.piece()) {
                    (SquareState::Nonexistent, _) => '#',
                    (_, Some(piece)) => symbol(piece),
                    (_, None) => '.',
                });
            }
            out.push('\n');
        }
        out
    }
}
/// Draws pieces by the first letter of their name: uppercase for white, lowercase otherwise
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.render(|piece| {
            let letter = piece.name.chars().next().unwrap_or('?');
            match piece.owner {
                Player::White => letter.to_ascii_uppercase(),
                _ => letter.to_ascii_lowercase(),
            }
        });
        f.write_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{Mover, Pattern, PatternKind, PieceId};

    use quickcheck::quickcheck;

    fn rook(owner: Player) -> Piece {
        Piece::new(
            PieceId(4),
            "Rook",
            Mover::symmetric(vec![Pattern::new(PatternKind::Rook)]),
        )
        .owned_by(owner)
    }

    fn mv(start: (i32, i32), end: (i32, i32)) -> Move {
        Move::new(Position::new(start.0, start.1), Position::new(end.0, end.1)).unwrap()
    }

    quickcheck! {
        fn test_rook_round_trip(rank: u8, file: u8) -> bool {
            let mut board = Board::new(8, 8);
            board.place_piece(rook(Player::White), Position::new(3, 3));
            let end = Position::new((rank % 8).into(), (file % 8).into());
            let Some(mv) = Move::new(Position::new(3, 3), end) else {
                return true;
            };
            match board.after_move(mv) {
                None => mv.rank_distance() != 0 && mv.file_distance() != 0,
                Some(after) => {
                    let back = after.after_move(mv.reversed()).unwrap();
                    let piece = back.piece(mv.start()).unwrap();
                    piece.position() == mv.start()
                        && piece.has_moved
                        && back.square(mv.start()).unwrap().state() == SquareState::Occupied
                        && back.square(mv.end()).unwrap().state() == SquareState::Empty
                }
            }
        }
    }

    #[test]
    fn test_out_of_bounds_lookups() {
        let board = Board::new(2, 3);
        assert!(board.square(Position::new(2, 0)).is_none());
        assert!(board.square(Position::new(0, 3)).is_none());
        assert!(board.square(Position::new(-1, 0)).is_none());
        assert!(board.square(Position::new(1, 2)).is_some());
        assert!(!board.contains_square(Position::new(0, -1)));
        assert_eq!(board.positions().count(), 6);
    }

    #[test]
    fn test_after_move_leaves_original_alone() {
        let mut board = Board::new(8, 8);
        board.place_piece(rook(Player::White), Position::new(0, 0));
        board.place_piece(rook(Player::Black), Position::new(5, 0));
        let before = board.clone();
        let after = board.after_move(mv((0, 0), (5, 0))).unwrap();
        assert_eq!(board, before);
        assert_eq!(after.square(Position::new(0, 0)).unwrap().state(), SquareState::Empty);
        let captor = after.piece(Position::new(5, 0)).unwrap();
        assert_eq!(captor.owner, Player::White);
        assert!(captor.has_moved);
        assert_eq!(after.pieces(Player::Black).count(), 0);
        assert_eq!(after.pieces(Player::White).count(), 1);
    }

    #[test]
    fn test_after_move_failures() {
        let mut board = Board::new(8, 8);
        board.place_piece(rook(Player::White), Position::new(0, 0));
        board.place_piece(rook(Player::Black), Position::new(5, 0));
        // No piece at the start
        assert!(board.after_move(mv((1, 1), (2, 1))).is_none());
        // Off the board
        assert!(board.after_move(mv((0, 0), (0, 8))).is_none());
        // Blocked
        assert!(board.after_move(mv((0, 0), (7, 0))).is_none());
        // Wrong shape
        assert!(board.after_move(mv((0, 0), (1, 1))).is_none());
    }

    #[test]
    fn test_make_move() {
        let mut board = Board::new(8, 8);
        board.place_piece(rook(Player::White), Position::new(0, 0));
        let before = board.clone();
        assert!(!board.make_move(mv((0, 0), (1, 1))));
        assert_eq!(board, before);
        assert!(board.make_move(mv((0, 0), (0, 7))));
        assert_ne!(board, before);
        assert!(board.piece(Position::new(0, 7)).is_some());
    }

    #[test]
    fn test_setup_move_ignores_rules() {
        let mut board = Board::with_shape(&["...#", "....", "....", "...."]).unwrap();
        board.place_piece(rook(Player::White), Position::new(0, 0));
        board.set_archetype(
            Position::new(0, 0),
            Some(ArchetypeRef::new(PieceId(4), Player::White)),
        );
        let after = board.after_setup_move(mv((0, 0), (2, 1))).unwrap();
        let moved = after.piece(Position::new(2, 1)).unwrap();
        assert!(!moved.has_moved);
        assert_eq!(moved.position(), Position::new(2, 1));
        assert!(after.square(Position::new(0, 0)).unwrap().archetype.is_none());
        assert!(after.square(Position::new(2, 1)).unwrap().archetype.is_some());
        assert!(board.after_setup_move(mv((0, 0), (3, 3))).is_none());
        assert!(board.after_setup_move(mv((1, 0), (2, 2))).is_none());
    }

    #[test]
    fn test_with_shape_errors() {
        let no_rows: [&str; 0] = [];
        assert_eq!(Board::with_shape(&no_rows), Err(LayoutError::Empty));
        assert_eq!(Board::with_shape(&["...", ".."]), Err(LayoutError::RaggedRows));
    }

    #[test]
    fn test_try_new_refuses_huge_boards() {
        assert_eq!(Board::try_new(8, 8), Ok(Board::new(8, 8)));
        assert_eq!(Board::try_new(0, 0).map(|board| board.squares().count()), Ok(0));
        assert_eq!(
            Board::try_new(usize::MAX, 2),
            Err(LayoutError::TooLarge {
                ranks: usize::MAX,
                files: 2
            })
        );
        assert!(Board::try_new(MAX_SQUARES, 1).is_ok());
        assert!(Board::try_new(MAX_SQUARES + 1, 1).is_err());
    }

    #[test]
    fn test_render() {
        let mut board = Board::with_shape(&["#..", "..."]).unwrap();
        board.place_piece(rook(Player::White), Position::new(0, 0));
        board.place_piece(rook(Player::Black), Position::new(1, 2));
        assert_eq!(board.to_string(), "#.r\nR..\n");
    }
}
