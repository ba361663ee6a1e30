//! Which pieces could be captured on the next move

use board::{Board, Piece, Player};

/// Whether any piece of another player could move onto the square `target` stands on
pub fn is_threatened(board: &Board, target: &Piece) -> bool {
    board
        .all_pieces()
        .filter(|attacker| attacker.owner != target.owner)
        .any(|attacker| attacker.can_move(target.position(), board))
}

/// The number of `player`'s important pieces that some opposing piece could capture
///
/// Each important piece counts once, however many pieces threaten it.
pub fn important_pieces_threatened(board: &Board, player: Player) -> usize {
    board
        .pieces(player)
        .filter(|piece| piece.is_important && is_threatened(board, piece))
        .count()
}
