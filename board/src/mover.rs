use crate::{Board, Move, Pattern};

/// The rules for where a piece may go, split into moving and capturing
///
/// Each list of patterns is folded, in order, into a single predicate. Starting from "nothing is
/// allowed":
///  1. A normal pattern widens what's allowed so far (`allowed || pattern`).
///  2. A restricting pattern narrows everything allowed so far (`pattern && allowed`).
///
/// This makes the order matter: a restriction only constrains the patterns listed before it, so
/// `[vertical, horizontal, restriction]` and `[restriction, vertical, horizontal]` usually
/// describe different pieces.
///
/// Two movers are equal if their pattern lists are equal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Mover {
    move_patterns: Vec<Pattern>,
    capture_patterns: Vec<Pattern>,
}
impl Mover {
    pub fn new(move_patterns: Vec<Pattern>, capture_patterns: Vec<Pattern>) -> Self {
        Self {
            move_patterns,
            capture_patterns,
        }
    }

    /// A mover which captures the same way it moves
    pub fn symmetric(patterns: Vec<Pattern>) -> Self {
        Self {
            capture_patterns: patterns.clone(),
            move_patterns: patterns,
        }
    }

    /// The patterns for moving onto an empty square
    pub fn move_patterns(&self) -> &[Pattern] {
        &self.move_patterns
    }

    /// The patterns for moving onto an opponent's piece
    pub fn capture_patterns(&self) -> &[Pattern] {
        &self.capture_patterns
    }

    pub fn can_move(&self, mv: Move, board: &Board) -> bool {
        fold_patterns(&self.move_patterns, mv, board)
    }

    pub fn can_capture(&self, mv: Move, board: &Board) -> bool {
        fold_patterns(&self.capture_patterns, mv, board)
    }

    /// A copy of this mover with the given patterns added to the end of both lists
    pub fn appending_patterns(&self, patterns: &[Pattern]) -> Self {
        let mut mover = self.clone();
        mover.move_patterns.extend_from_slice(patterns);
        mover.capture_patterns.extend_from_slice(patterns);
        mover
    }

    /// A copy of this mover with the given pattern added to the end of both lists
    pub fn appending_pattern(&self, pattern: Pattern) -> Self {
        self.appending_patterns(&[pattern])
    }
}

fn fold_patterns(patterns: &[Pattern], mv: Move, board: &Board) -> bool {
    patterns.iter().fold(false, |allowed, pattern| {
        if pattern.is_restricting {
            allowed && pattern.can_move(mv, board)
        } else {
            allowed || pattern.can_move(mv, board)
        }
    })
}
