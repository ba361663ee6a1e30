//! Plain records for persisting boards, pieces and layouts
//!
//! Records hold what storage holds: integer codes, optional parameters, unordered lists. Turning
//! a record back into a domain value checks all of that, and fails with a [`RecordError`] rather
//! than building something inconsistent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{
    grid, ArchetypeRef, Board, Directions, Mover, Offset, Pattern, PatternKind, Piece, PieceId, Player,
    Position, SetupPosition, Square, SquareColor, SquareState,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RecordError {
    #[error("no squares in board record")]
    NoSquares,
    #[error("square position {0} is negative")]
    NegativePosition(Position),
    #[error("more than one square at {0}")]
    DuplicateSquare(Position),
    #[error("unknown square state code {0}")]
    UnknownState(u8),
    #[error("unknown square color code {0}")]
    UnknownColor(u8),
    #[error("unknown owner code {0}")]
    UnknownOwner(u8),
    #[error("square at {0} has an archetype but no owner")]
    ArchetypeWithoutOwner(Position),
    #[error("unknown pattern kind {0:?}")]
    UnknownPattern(String),
    #[error("pattern {kind:?} is missing its {parameter} parameter")]
    MissingParameter {
        kind: &'static str,
        parameter: &'static str,
    },
    #[error("invalid direction bits {0:#06b}")]
    InvalidDirections(u8),
    #[error("a board reaching rank {max_rank}, file {max_file} is too large")]
    TooLarge { max_rank: i32, max_file: i32 },
}

/// One square of a persisted board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareRecord {
    pub state: u8,
    pub color: u8,
    pub rank: i32,
    pub file: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archetype: Option<PieceId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<u8>,
}
impl From<&Square> for SquareRecord {
    fn from(square: &Square) -> Self {
        let position = square.position();
        Self {
            state: square.state().code(),
            color: square.color.code(),
            rank: position.rank,
            file: position.file,
            archetype: square.archetype.map(|entry| entry.archetype),
            owner: square.archetype.map(|entry| entry.owner.code()),
        }
    }
}

/// A persisted board: its squares, in no particular order
///
/// Pieces aren't stored. Each square remembers which archetype the starting layout put there,
/// which is enough for a game to set the pieces up again.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    pub squares: Vec<SquareRecord>,
}
impl From<&Board> for BoardRecord {
    fn from(board: &Board) -> Self {
        Self {
            squares: board.squares().map(SquareRecord::from).collect(),
        }
    }
}
/// The grid is as large as the largest rank and file seen, and any square not in the record
/// doesn't exist.
impl TryFrom<BoardRecord> for Board {
    type Error = RecordError;

    fn try_from(record: BoardRecord) -> Result<Self, Self::Error> {
        let mut max_rank = None;
        let mut max_file = None;
        for square in &record.squares {
            let position = Position::new(square.rank, square.file);
            if square.rank < 0 || square.file < 0 {
                return Err(RecordError::NegativePosition(position));
            }
            max_rank = max_rank.max(Some(square.rank));
            max_file = max_file.max(Some(square.file));
        }
        let (Some(max_rank), Some(max_file)) = (max_rank, max_file) else {
            return Err(RecordError::NoSquares);
        };
        let too_large = RecordError::TooLarge { max_rank, max_file };
        let ranks = usize::try_from(max_rank).map_err(|_| too_large.clone())? + 1;
        let files = usize::try_from(max_file).map_err(|_| too_large.clone())? + 1;
        grid::square_count(ranks, files).ok_or(too_large)?;
        let mut squares: Vec<Square> = (0..ranks * files)
            .map(|idx| Square::nonexistent(Position::new((idx / files) as i32, (idx % files) as i32)))
            .collect();
        let mut seen = HashSet::with_capacity(record.squares.len());
        for square in record.squares {
            let position = Position::new(square.rank, square.file);
            if !seen.insert(position) {
                return Err(RecordError::DuplicateSquare(position));
            }
            let state =
                SquareState::from_code(square.state).ok_or(RecordError::UnknownState(square.state))?;
            let color =
                SquareColor::from_code(square.color).ok_or(RecordError::UnknownColor(square.color))?;
            let archetype = match (square.archetype, square.owner) {
                (None, _) => None,
                (Some(_), None) => return Err(RecordError::ArchetypeWithoutOwner(position)),
                (Some(archetype), Some(owner)) => Some(ArchetypeRef::new(
                    archetype,
                    Player::from_code(owner).ok_or(RecordError::UnknownOwner(owner))?,
                )),
            };
            let target = &mut squares[square.rank as usize * files + square.file as usize];
            target.set_exists(state != SquareState::Nonexistent);
            target.color = color;
            target.archetype = archetype;
        }
        Ok(Board::from_squares(ranks, files, squares))
    }
}

/// One persisted pattern, with whichever parameters its kind needs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRecord {
    pub kind: String,
    #[serde(default)]
    pub is_restricting: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<u32>,
    /// Bits of [`Directions`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directions: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offsets: Option<Vec<Offset>>,
}
impl From<&Pattern> for PatternRecord {
    fn from(pattern: &Pattern) -> Self {
        let mut record = Self {
            kind: pattern.kind.name().to_string(),
            is_restricting: pattern.is_restricting,
            ranks: None,
            files: None,
            directions: None,
            offsets: None,
        };
        match &pattern.kind {
            PatternKind::Custom(offsets) => record.offsets = Some(offsets.clone()),
            PatternKind::WithinDistance { ranks, files }
            | PatternKind::OutsideDistance { ranks, files } => {
                record.ranks = Some(*ranks);
                record.files = Some(*files);
            }
            PatternKind::InDirections(directions) => record.directions = Some(directions.bits()),
            _ => {}
        }
        record
    }
}
impl TryFrom<PatternRecord> for Pattern {
    type Error = RecordError;

    fn try_from(record: PatternRecord) -> Result<Self, Self::Error> {
        /// Pull out a parameter that the kind requires
        fn required<T>(value: Option<T>, kind: &'static str, parameter: &'static str) -> Result<T, RecordError> {
            value.ok_or(RecordError::MissingParameter { kind, parameter })
        }

        let kind = match record.kind.as_str() {
            "custom" => PatternKind::Custom(required(record.offsets, "custom", "offsets")?),
            "horizontal" => PatternKind::Horizontal,
            "vertical" => PatternKind::Vertical,
            "forward_diagonal" => PatternKind::ForwardDiagonal,
            "back_diagonal" => PatternKind::BackDiagonal,
            "within_distance" => PatternKind::WithinDistance {
                ranks: required(record.ranks, "within_distance", "ranks")?,
                files: required(record.files, "within_distance", "files")?,
            },
            "outside_distance" => PatternKind::OutsideDistance {
                ranks: required(record.ranks, "outside_distance", "ranks")?,
                files: required(record.files, "outside_distance", "files")?,
            },
            "in_directions" => {
                let bits = required(record.directions, "in_directions", "directions")?;
                PatternKind::InDirections(
                    Directions::from_bits(bits).ok_or(RecordError::InvalidDirections(bits))?,
                )
            }
            "pawn" => PatternKind::Pawn,
            "pawn_first_move" => PatternKind::PawnFirstMove,
            "pawn_capture" => PatternKind::PawnCapture,
            "knight" => PatternKind::Knight,
            "bishop" => PatternKind::Bishop,
            "rook" => PatternKind::Rook,
            "queen" => PatternKind::Queen,
            "king" => PatternKind::King,
            _ => return Err(RecordError::UnknownPattern(record.kind)),
        };
        Ok(Self {
            kind,
            is_restricting: record.is_restricting,
        })
    }
}

fn patterns_from_records(records: Vec<PatternRecord>) -> Result<Vec<Pattern>, RecordError> {
    records.into_iter().map(Pattern::try_from).collect()
}

fn records_from_patterns(patterns: &[Pattern]) -> Vec<PatternRecord> {
    patterns.iter().map(PatternRecord::from).collect()
}

/// A persisted piece or archetype
///
/// If the first-move patterns are left out, the piece moves the same way on its first move as on
/// every other.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceRecord {
    pub id: PieceId,
    pub name: String,
    /// Defaults to [`Player::Either`], as for an archetype
    #[serde(default = "either_code")]
    pub owner: u8,
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub file: i32,
    #[serde(default)]
    pub has_moved: bool,
    #[serde(default)]
    pub is_important: bool,
    pub move_patterns: Vec<PatternRecord>,
    pub capture_patterns: Vec<PatternRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_move_patterns: Option<Vec<PatternRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_move_capture_patterns: Option<Vec<PatternRecord>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotion_zone: Vec<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub promotion_pieces: Vec<PieceId>,
}

const fn either_code() -> u8 {
    Player::Either.code()
}

impl From<&Piece> for PieceRecord {
    fn from(piece: &Piece) -> Self {
        let (first_move_patterns, first_move_capture_patterns) =
            if piece.first_move_mover == piece.mover {
                (None, None)
            } else {
                (
                    Some(records_from_patterns(piece.first_move_mover.move_patterns())),
                    Some(records_from_patterns(piece.first_move_mover.capture_patterns())),
                )
            };
        Self {
            id: piece.id,
            name: piece.name.clone(),
            owner: piece.owner.code(),
            rank: piece.position.rank,
            file: piece.position.file,
            has_moved: piece.has_moved,
            is_important: piece.is_important,
            move_patterns: records_from_patterns(piece.mover.move_patterns()),
            capture_patterns: records_from_patterns(piece.mover.capture_patterns()),
            first_move_patterns,
            first_move_capture_patterns,
            promotion_zone: piece.promotion_zone.clone(),
            promotion_pieces: piece.promotion_pieces.clone(),
        }
    }
}
impl TryFrom<PieceRecord> for Piece {
    type Error = RecordError;

    fn try_from(record: PieceRecord) -> Result<Self, Self::Error> {
        let owner = Player::from_code(record.owner).ok_or(RecordError::UnknownOwner(record.owner))?;
        let mover = Mover::new(
            patterns_from_records(record.move_patterns)?,
            patterns_from_records(record.capture_patterns)?,
        );
        let first_move_mover = match (record.first_move_patterns, record.first_move_capture_patterns) {
            (None, None) => mover.clone(),
            (moves, captures) => Mover::new(
                moves.map(patterns_from_records).transpose()?.unwrap_or_default(),
                captures.map(patterns_from_records).transpose()?.unwrap_or_default(),
            ),
        };
        Ok(Piece {
            id: record.id,
            name: record.name,
            owner,
            position: Position::new(record.rank, record.file),
            has_moved: record.has_moved,
            is_important: record.is_important,
            mover,
            first_move_mover,
            promotion_zone: record.promotion_zone,
            promotion_pieces: record.promotion_pieces,
        })
    }
}

/// One entry of a persisted starting layout
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupEntryRecord {
    pub archetype: PieceId,
    pub rank: i32,
    pub file: i32,
    pub owner: u8,
}

/// A persisted starting layout, in no particular order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupRecord {
    pub pieces: Vec<SetupEntryRecord>,
}
impl From<&SetupPosition> for SetupRecord {
    fn from(setup: &SetupPosition) -> Self {
        Self {
            pieces: setup
                .pieces()
                .map(|(archetype, position, owner)| SetupEntryRecord {
                    archetype,
                    rank: position.rank,
                    file: position.file,
                    owner: owner.code(),
                })
                .collect(),
        }
    }
}
/// Later entries for the same position replace earlier ones.
impl TryFrom<SetupRecord> for SetupPosition {
    type Error = RecordError;

    fn try_from(record: SetupRecord) -> Result<Self, Self::Error> {
        let mut setup = SetupPosition::new();
        for entry in record.pieces {
            let owner = Player::from_code(entry.owner).ok_or(RecordError::UnknownOwner(entry.owner))?;
            setup.add_piece(entry.archetype, Position::new(entry.rank, entry.file), owner);
        }
        Ok(setup)
    }
}
