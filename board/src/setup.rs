use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::{Board, LayoutError, Move, PieceId, Player, Position};

/// Which archetype goes on a square, and for whom
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeRef {
    pub archetype: PieceId,
    pub owner: Player,
}
impl ArchetypeRef {
    pub const fn new(archetype: PieceId, owner: Player) -> Self {
        Self { archetype, owner }
    }
}

/// A starting layout: which archetype stands where, independent of any board
///
/// There is at most one entry per position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SetupPosition {
    pieces: BTreeMap<Position, ArchetypeRef>,
}
impl SetupPosition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a layout from one row of text per rank, one character per file
    ///
    /// Rows are listed from the highest rank down to rank 0, as a board is usually drawn. `.` and
    /// ` ` are empty squares; every other character is looked up in `legend`.
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use board::{ArchetypeRef, PieceId, Player, Position, SetupPosition};
    ///
    /// let legend = HashMap::from([
    ///     ('K', ArchetypeRef::new(PieceId(6), Player::White)),
    ///     ('k', ArchetypeRef::new(PieceId(6), Player::Black)),
    /// ]);
    /// let setup = SetupPosition::from_text(&["..k", "...", "K.."], &legend).unwrap();
    /// assert_eq!(setup.len(), 2);
    /// assert_eq!(setup.get(Position::new(0, 0)).unwrap().owner, Player::White);
    /// assert_eq!(setup.get(Position::new(2, 2)).unwrap().owner, Player::Black);
    /// ```
    pub fn from_text(
        rows: &[impl AsRef<str>],
        legend: &HashMap<char, ArchetypeRef>,
    ) -> Result<Self, LayoutError> {
        let mut setup = Self::new();
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = (rows.len() - 1 - row_idx) as i32;
            for (file, symbol) in row.as_ref().chars().enumerate() {
                let file = file as i32;
                match symbol {
                    '.' | ' ' => {}
                    _ => {
                        let Some(&entry) = legend.get(&symbol) else {
                            return Err(LayoutError::UnknownSymbol { symbol, rank, file });
                        };
                        setup.pieces.insert(Position::new(rank, file), entry);
                    }
                }
            }
        }
        Ok(setup)
    }

    /// Collect the archetype references recorded on a board's squares
    pub fn from_board(board: &Board) -> Self {
        Self {
            pieces: board
                .squares()
                .filter_map(|square| Some((square.position(), square.archetype?)))
                .collect(),
        }
    }

    /// Put the archetype at the given position, replacing whatever was there
    pub fn add_piece(&mut self, archetype: PieceId, at: Position, owner: Player) {
        self.pieces.insert(at, ArchetypeRef::new(archetype, owner));
    }

    pub fn remove_piece(&mut self, at: Position) -> Option<ArchetypeRef> {
        self.pieces.remove(&at)
    }

    pub fn get(&self, at: Position) -> Option<ArchetypeRef> {
        self.pieces.get(&at).copied()
    }

    /// Move the entry at the start of the move to its end, replacing anything there
    ///
    /// Nothing happens (and this returns false) if there's no entry at the start, or if `board`
    /// has no square at the end of the move. The board itself is left alone.
    pub fn apply_move(&mut self, mv: Move, board: &Board) -> bool {
        if !board.contains_square(mv.end()) {
            return false;
        }
        let Some(entry) = self.pieces.remove(&mv.start()) else {
            return false;
        };
        self.pieces.insert(mv.end(), entry);
        true
    }

    /// Every entry, in rank then file order
    pub fn pieces(&self) -> impl Iterator<Item = (PieceId, Position, Player)> + '_ {
        self.pieces
            .iter()
            .map(|(&position, entry)| (entry.archetype, position, entry.owner))
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn legend() -> HashMap<char, ArchetypeRef> {
        HashMap::from([
            ('R', ArchetypeRef::new(PieceId(4), Player::White)),
            ('r', ArchetypeRef::new(PieceId(4), Player::Black)),
        ])
    }

    #[test]
    fn test_one_entry_per_position() {
        let mut setup = SetupPosition::new();
        setup.add_piece(PieceId(1), Position::new(0, 0), Player::White);
        setup.add_piece(PieceId(2), Position::new(0, 0), Player::Black);
        assert_eq!(setup.len(), 1);
        assert_eq!(
            setup.get(Position::new(0, 0)),
            Some(ArchetypeRef::new(PieceId(2), Player::Black)),
        );
        assert!(setup.remove_piece(Position::new(0, 0)).is_some());
        assert!(setup.is_empty());
    }

    #[test]
    fn test_apply_move_replaces_target() {
        let board = Board::new(4, 4);
        let mut setup = SetupPosition::from_text(&["r...", "....", "....", "R..."], &legend()).unwrap();
        let mv = Move::new(Position::new(0, 0), Position::new(3, 0)).unwrap();
        assert!(setup.apply_move(mv, &board));
        assert_eq!(setup.len(), 1);
        assert_eq!(setup.get(Position::new(3, 0)).unwrap().owner, Player::White);
        // Nothing left at the start to move
        assert!(!setup.apply_move(mv, &board));
    }

    #[test]
    fn test_apply_move_needs_target_square() {
        let board = Board::with_shape(&["...#", "....", "....", "...."]).unwrap();
        let mut setup = SetupPosition::new();
        setup.add_piece(PieceId(4), Position::new(0, 3), Player::White);
        let onto_hole = Move::new(Position::new(0, 3), Position::new(3, 3)).unwrap();
        let off_board = Move::new(Position::new(0, 3), Position::new(0, 4)).unwrap();
        assert!(!setup.apply_move(onto_hole, &board));
        assert!(!setup.apply_move(off_board, &board));
        assert_eq!(setup.get(Position::new(0, 3)).unwrap().archetype, PieceId(4));
    }

    #[test]
    fn test_unknown_symbol() {
        let err = SetupPosition::from_text(&["..", "x."], &legend()).unwrap_err();
        assert_eq!(
            err,
            LayoutError::UnknownSymbol {
                symbol: 'x',
                rank: 0,
                file: 0
            }
        );
    }

    #[test]
    fn test_pieces_in_order() {
        let setup = SetupPosition::from_text(&["r.r", "...", ".R."], &legend()).unwrap();
        let positions: Vec<_> = setup.pieces().map(|(_, position, _)| position).collect();
        assert_eq!(
            positions,
            vec![Position::new(0, 1), Position::new(2, 0), Position::new(2, 2)],
        );
    }
}
